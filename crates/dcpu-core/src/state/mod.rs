//! Register file and conditional-skip state.

/// Register identifiers and the register file.
pub mod registers;
/// Skip controller.
pub mod skip;

pub use registers::{Register, RegisterFile, GENERAL_REGISTER_COUNT};
pub use skip::{arm_skip, skip_guard, SkipState};
