//! Instruction execution core for the DCPU-16 virtual CPU.

/// Word-addressed memory and program image helpers.
pub mod memory;
pub use memory::{new_word_store, words_from_bytes, ByteOrder, WORD_COUNT};

/// Error types surfaced at the host-facing boundary.
pub mod error;
pub use error::{HookError, ImageError, InterruptError};

/// Host-facing configuration and step reporting.
pub mod api;
pub use api::{MachineConfig, StepOutcome, DEFAULT_INTERRUPT_QUEUE_CAPACITY};

/// Register file and skip controller.
pub mod state;
pub use state::{arm_skip, skip_guard, Register, RegisterFile, SkipState, GENERAL_REGISTER_COUNT};

/// Opcode tables and instruction word layout.
pub mod encoding;
pub use encoding::{
    classify_basic_opcode, classify_extended_opcode, pack_instruction_word,
    split_instruction_word, BasicOpcode, ExtendedOpcode, BASIC_OPCODE_TABLE,
    EXTENDED_OPCODE_TABLE,
};

/// Instruction and operand decoding.
pub mod decoder;
pub use decoder::{DecodedInstruction, DecodedOrReserved, Decoder, Operand, MAX_INLINE_LITERAL};

/// Machine state and storage locators.
pub mod machine;
pub use machine::{Location, Machine, SpecialRegister};

/// Operand resolution.
pub mod resolver;
pub use resolver::{resolve_location, resolve_value, resolve_value_once};

/// Memory write hooks.
pub mod hooks;
pub use hooks::{HookId, HookKind, HookRegistry, WriteObserver};

/// Interrupt queue and dispatch.
pub mod interrupt;
pub use interrupt::{dispatch_pending, raise_interrupt, InterruptController};

/// Instruction execution.
pub mod execute;
pub use execute::{
    compute_arithmetic, compute_overflow, condition_holds, execute_instruction, step_one,
    ArithmeticOp, ArithmeticResult, Condition, ExFlag, FlowOp,
};

/// Disassembly for debuggers and tracers.
pub mod disasm;
pub use disasm::{disassemble_one, disassemble_range, DisassemblyRow};

#[cfg(test)]
use proptest as _;
#[cfg(test)]
use rstest as _;
