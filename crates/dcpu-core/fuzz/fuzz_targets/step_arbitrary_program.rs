#![no_main]

use dcpu_core::{disassemble_range, words_from_bytes, ByteOrder, Decoder, Machine};
use libfuzzer_sys::fuzz_target;

const MAX_STEPS: usize = 1024;

fuzz_target!(|data: &[u8]| {
    let Some((&selector, image)) = data.split_first() else {
        return;
    };
    let order = if selector & 1 == 0 {
        ByteOrder::Big
    } else {
        ByteOrder::Little
    };
    let Ok(words) = words_from_bytes(image, order) else {
        return;
    };

    for word in &words {
        let _ = Decoder::decode(*word);
    }
    let _ = disassemble_range(0, words.len(), &words);

    let mut machine = Machine::new();
    if machine.load_words(0, &words).is_err() {
        return;
    }
    if selector & 2 != 0 {
        machine.regs.set_ia(0x8000);
        let _ = machine.raise_interrupt(u16::from(selector));
    }
    let _ = machine.run(MAX_STEPS);
});
