//! Deterministic execution fingerprint for cross-host comparison.

use std::cell::Cell;
use std::rc::Rc;

use dcpu_core::{
    pack_instruction_word, BasicOpcode, ExtendedOpcode, HookKind, Machine, Register, StepOutcome,
};
use log as _;
use proptest as _;
use rstest as _;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;

const STEPS: usize = 256;

const fn lit(value: u8) -> u8 {
    0x20 + value
}

fn hash_bytes(hash: &mut u64, bytes: &[u8]) {
    for byte in bytes {
        *hash ^= u64::from(*byte);
        *hash = hash.wrapping_mul(0x1000_0000_01B3);
    }
}

/// Counts to 16 through a subroutine, raising a software interrupt on the way.
fn program() -> Vec<u16> {
    let set = BasicOpcode::Set.code();
    vec![
        pack_instruction_word(0, ExtendedOpcode::Ias.code(), 0x1F),
        0x0040,
        pack_instruction_word(0, ExtendedOpcode::Int.code(), lit(7)),
        // loop: JSR 0x0020 ; IFN A, 16 ; SET PC, loop ; SET PC, halt
        pack_instruction_word(0, ExtendedOpcode::Jsr.code(), lit(0x10)),
        pack_instruction_word(BasicOpcode::Ifn.code(), 0x00, lit(0x10)),
        pack_instruction_word(set, 0x1C, lit(3)),
        pack_instruction_word(set, 0x1C, lit(6)),
    ]
}

fn subroutine() -> Vec<u16> {
    vec![
        // ADD A, 1 ; MUL [0x1000+A], 3 ; SET PC, POP
        pack_instruction_word(BasicOpcode::Add.code(), 0x00, lit(1)),
        pack_instruction_word(BasicOpcode::Mul.code(), 0x10, lit(3)),
        0x1000,
        pack_instruction_word(BasicOpcode::Set.code(), 0x1C, 0x18),
    ]
}

fn handler() -> Vec<u16> {
    vec![
        // SET [0x2000], A ; RFI 0
        pack_instruction_word(BasicOpcode::Set.code(), 0x1E, 0x00),
        0x2000,
        pack_instruction_word(0, ExtendedOpcode::Rfi.code(), lit(0)),
    ]
}

fn fingerprint() -> String {
    let mut machine = Machine::new();
    machine.load_words(0x0000, &program()).expect("program fits");
    machine.load_words(0x0010, &subroutine()).expect("subroutine fits");
    machine.load_words(0x0040, &handler()).expect("handler fits");
    for offset in 0..=0x10_u16 {
        machine.memory_mut()[usize::from(0x1000 + offset)] = offset;
    }

    let writes = Rc::new(Cell::new(0_u64));
    let sink = Rc::clone(&writes);
    machine
        .register_hook(0x1000, 0x2FFF, move |_addr: u16, _kind: HookKind| {
            sink.set(sink.get() + 1);
        })
        .expect("valid range");

    let mut hash = 0xcbf2_9ce4_8422_2325_u64;
    for _ in 0..STEPS {
        match machine.step() {
            StepOutcome::Retired { pc, .. } => {
                hash_bytes(&mut hash, &[0x10]);
                hash_bytes(&mut hash, &pc.to_le_bytes());
            }
            StepOutcome::Skipped { pc, .. } => {
                hash_bytes(&mut hash, &[0x11]);
                hash_bytes(&mut hash, &pc.to_le_bytes());
            }
            StepOutcome::Reserved { pc, word } => {
                hash_bytes(&mut hash, &[0x12]);
                hash_bytes(&mut hash, &pc.to_le_bytes());
                hash_bytes(&mut hash, &word.to_le_bytes());
            }
            StepOutcome::InterruptDispatched { message } => {
                hash_bytes(&mut hash, &[0x13]);
                hash_bytes(&mut hash, &message.to_le_bytes());
            }
        }
    }

    for reg in Register::ALL {
        hash_bytes(&mut hash, &machine.regs.gpr(reg).to_le_bytes());
    }
    hash_bytes(&mut hash, &machine.regs.pc().to_le_bytes());
    hash_bytes(&mut hash, &machine.regs.sp().to_le_bytes());
    hash_bytes(&mut hash, &machine.regs.ex().to_le_bytes());
    hash_bytes(&mut hash, &machine.regs.ia().to_le_bytes());
    for word in machine.memory() {
        hash_bytes(&mut hash, &word.to_le_bytes());
    }
    hash_bytes(&mut hash, &writes.get().to_le_bytes());

    format!("{hash:016x}")
}

fn main() {
    println!("{}", fingerprint());
}
