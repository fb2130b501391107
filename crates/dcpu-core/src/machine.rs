//! The DCPU-16 machine: registers, memory, skip flag, hooks and interrupt queue.

use std::fmt;

use crate::error::{HookError, ImageError, InterruptError};
use crate::hooks::{HookId, HookKind, HookRegistry, WriteObserver};
use crate::interrupt::InterruptController;
use crate::memory::{new_word_store, words_from_bytes, ByteOrder, WORD_COUNT};
use crate::state::{Register, RegisterFile, SkipState};
use crate::{MachineConfig, StepOutcome};

/// Special registers addressable by operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[allow(missing_docs)]
pub enum SpecialRegister {
    Pc,
    Sp,
    Ex,
    Ia,
}

/// Storage locator produced by operand resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Location {
    /// A general-purpose register.
    Register(Register),
    /// A memory word.
    Memory(u16),
    /// `PC`, `SP`, `EX` or `IA`.
    Special(SpecialRegister),
    /// Absorbs writes and reads as zero.
    Discard,
}

/// A DCPU-16 machine instance.
pub struct Machine {
    /// Register file.
    pub regs: RegisterFile,
    memory: Box<[u16]>,
    skip: SkipState,
    hooks: HookRegistry,
    interrupts: InterruptController,
    config: MachineConfig,
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Machine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Machine")
            .field("regs", &self.regs)
            .field("skip", &self.skip)
            .field("hooks", &self.hooks)
            .field("interrupts", &self.interrupts)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Machine {
    /// Creates a machine with zeroed memory and registers.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(MachineConfig::default())
    }

    /// Creates a machine with an explicit configuration.
    #[must_use]
    pub fn with_config(config: MachineConfig) -> Self {
        Self {
            regs: RegisterFile::default(),
            memory: new_word_store(),
            skip: SkipState::Normal,
            hooks: HookRegistry::new(),
            interrupts: InterruptController::with_capacity(config.interrupt_queue_capacity),
            config,
        }
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &MachineConfig {
        &self.config
    }

    /// The full 64K-word memory.
    #[must_use]
    pub fn memory(&self) -> &[u16] {
        &self.memory
    }

    /// Mutable memory access for hosts. Writes made here bypass hooks.
    pub fn memory_mut(&mut self) -> &mut [u16] {
        &mut self.memory
    }

    /// Reads one memory word.
    #[must_use]
    pub fn read_word(&self, addr: u16) -> u16 {
        self.memory[usize::from(addr)]
    }

    /// Reads through a storage locator.
    #[must_use]
    pub fn read(&self, location: Location) -> u16 {
        match location {
            Location::Register(reg) => self.regs.gpr(reg),
            Location::Memory(addr) => self.read_word(addr),
            Location::Special(SpecialRegister::Pc) => self.regs.pc(),
            Location::Special(SpecialRegister::Sp) => self.regs.sp(),
            Location::Special(SpecialRegister::Ex) => self.regs.ex(),
            Location::Special(SpecialRegister::Ia) => self.regs.ia(),
            Location::Discard => 0,
        }
    }

    /// Writes through a storage locator.
    ///
    /// Memory writes notify every covering hook; register and discard writes
    /// never do.
    pub fn store(&mut self, location: Location, value: u16) {
        match location {
            Location::Register(reg) => self.regs.set_gpr(reg, value),
            Location::Memory(addr) => {
                self.memory[usize::from(addr)] = value;
                self.hooks.notify(addr, HookKind::Write);
            }
            Location::Special(SpecialRegister::Pc) => self.regs.set_pc(value),
            Location::Special(SpecialRegister::Sp) => self.regs.set_sp(value),
            Location::Special(SpecialRegister::Ex) => self.regs.set_ex(value),
            Location::Special(SpecialRegister::Ia) => self.regs.set_ia(value),
            Location::Discard => {}
        }
    }

    /// Reads the word at `PC` and advances `PC` by one.
    pub fn consume_word(&mut self) -> u16 {
        let pc = self.regs.pc();
        self.regs.set_pc(pc.wrapping_add(1));
        self.read_word(pc)
    }

    /// Pushes `value` onto the stack (`SP -= 1`, then store).
    pub fn push(&mut self, value: u16) {
        let sp = self.regs.sp().wrapping_sub(1);
        self.regs.set_sp(sp);
        self.store(Location::Memory(sp), value);
    }

    /// Pops the word at `SP` and increments `SP`.
    pub fn pop(&mut self) -> u16 {
        let sp = self.regs.sp();
        self.regs.set_sp(sp.wrapping_add(1));
        self.read_word(sp)
    }

    /// Current skip state.
    #[must_use]
    pub const fn skip_state(&self) -> SkipState {
        self.skip
    }

    /// Returns `true` while the next instruction is being skipped.
    #[must_use]
    pub const fn is_skipping(&self) -> bool {
        self.skip.is_skipping()
    }

    /// Overrides the skip state.
    pub const fn set_skip_state(&mut self, state: SkipState) {
        self.skip = state;
    }

    /// Registers a write observer for `low..=high`.
    ///
    /// # Errors
    ///
    /// Returns [`HookError::InvertedRange`] when `low > high`.
    pub fn register_hook<O>(
        &mut self,
        low: u16,
        high: u16,
        observer: O,
    ) -> Result<HookId, HookError>
    where
        O: WriteObserver + 'static,
    {
        self.hooks.register(low, high, Box::new(observer))
    }

    /// Removes a write observer. Returns `false` if `id` is unknown.
    pub fn unregister_hook(&mut self, id: HookId) -> bool {
        self.hooks.unregister(id)
    }

    /// Registered write observers.
    #[must_use]
    pub const fn hooks(&self) -> &HookRegistry {
        &self.hooks
    }

    /// Raises an interrupt. See [`crate::interrupt::raise_interrupt`].
    ///
    /// # Errors
    ///
    /// Returns [`InterruptError::QueueFull`] when the pending queue is at capacity.
    pub fn raise_interrupt(&mut self, message: u16) -> Result<(), InterruptError> {
        crate::interrupt::raise_interrupt(self, message)
    }

    /// Removes the oldest pending interrupt without dispatching it.
    pub fn take_pending_interrupt(&mut self) -> Option<u16> {
        self.interrupts.dequeue()
    }

    /// Interrupt queue state.
    #[must_use]
    pub const fn interrupts(&self) -> &InterruptController {
        &self.interrupts
    }

    /// Mutable interrupt queue state.
    pub const fn interrupts_mut(&mut self) -> &mut InterruptController {
        &mut self.interrupts
    }

    /// Copies `words` into memory starting at `origin`. Hooks are not notified.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::TooLarge`] when the words would run past `0xFFFF`.
    pub fn load_words(&mut self, origin: u16, words: &[u16]) -> Result<(), ImageError> {
        let start = usize::from(origin);
        let end = start + words.len();
        if end > WORD_COUNT {
            return Err(ImageError::TooLarge {
                origin,
                words: words.len(),
            });
        }
        self.memory[start..end].copy_from_slice(words);
        Ok(())
    }

    /// Converts a byte image and loads it at address zero.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError`] when the image has an odd length or does not fit.
    pub fn load_image(&mut self, bytes: &[u8], order: ByteOrder) -> Result<(), ImageError> {
        let words = words_from_bytes(bytes, order)?;
        self.load_words(0, &words)
    }

    /// Executes one step. See [`crate::step_one`].
    pub fn step(&mut self) -> StepOutcome {
        crate::execute::step_one(self)
    }

    /// Executes `steps` steps and returns how many retired an instruction.
    pub fn run(&mut self, steps: usize) -> usize {
        (0..steps).filter(|_| self.step().is_retired()).count()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::{Location, Machine, SpecialRegister};
    use crate::error::ImageError;
    use crate::hooks::HookKind;
    use crate::memory::ByteOrder;
    use crate::state::Register;

    #[test]
    fn new_machine_is_zeroed() {
        let machine = Machine::new();
        assert_eq!(machine.memory().len(), 0x1_0000);
        assert!(machine.memory().iter().all(|word| *word == 0));
        assert_eq!(machine.regs.pc(), 0);
        assert!(!machine.is_skipping());
        assert!(machine.hooks().is_empty());
    }

    #[test]
    fn store_and_read_cover_every_location_kind() {
        let mut machine = Machine::new();
        let locations = [
            Location::Register(Register::Z),
            Location::Memory(0xFFFF),
            Location::Special(SpecialRegister::Pc),
            Location::Special(SpecialRegister::Sp),
            Location::Special(SpecialRegister::Ex),
            Location::Special(SpecialRegister::Ia),
        ];
        for (value, location) in (0x100_u16..).zip(locations) {
            machine.store(location, value);
            assert_eq!(machine.read(location), value);
        }

        machine.store(Location::Discard, 0xBEEF);
        assert_eq!(machine.read(Location::Discard), 0);
    }

    #[test]
    fn only_memory_stores_notify_hooks() {
        let mut machine = Machine::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        machine
            .register_hook(0, u16::MAX, move |addr: u16, kind: HookKind| {
                sink.borrow_mut().push((addr, kind));
            })
            .expect("full range is valid");

        machine.store(Location::Register(Register::A), 1);
        machine.store(Location::Special(SpecialRegister::Sp), 1);
        machine.store(Location::Discard, 1);
        machine.store(Location::Memory(0x0300), 0);
        machine.store(Location::Memory(0x0300), 0);

        assert_eq!(
            *seen.borrow(),
            vec![(0x0300, HookKind::Write), (0x0300, HookKind::Write)]
        );
    }

    #[test]
    fn consume_word_wraps_program_counter() {
        let mut machine = Machine::new();
        machine.memory_mut()[0xFFFF] = 0x1234;
        machine.regs.set_pc(0xFFFF);
        assert_eq!(machine.consume_word(), 0x1234);
        assert_eq!(machine.regs.pc(), 0x0000);
    }

    #[test]
    fn push_and_pop_wrap_stack_pointer() {
        let mut machine = Machine::new();
        machine.push(0xCAFE);
        assert_eq!(machine.regs.sp(), 0xFFFF);
        assert_eq!(machine.memory()[0xFFFF], 0xCAFE);
        assert_eq!(machine.pop(), 0xCAFE);
        assert_eq!(machine.regs.sp(), 0x0000);
    }

    #[test]
    fn load_words_rejects_images_past_end_of_memory() {
        let mut machine = Machine::new();
        machine
            .load_words(0xFFFE, &[1, 2])
            .expect("fits exactly at the top");
        assert_eq!(&machine.memory()[0xFFFE..], &[1, 2]);

        assert_eq!(
            machine.load_words(0xFFFF, &[1, 2]),
            Err(ImageError::TooLarge {
                origin: 0xFFFF,
                words: 2
            })
        );
    }

    #[test]
    fn load_image_converts_bytes_at_origin_zero() {
        let mut machine = Machine::new();
        machine
            .load_image(&[0x01, 0x7C, 0x30, 0x00], ByteOrder::Little)
            .expect("even image");
        assert_eq!(&machine.memory()[..2], &[0x7C01, 0x0030]);
    }
}
