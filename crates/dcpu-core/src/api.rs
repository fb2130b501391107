//! Host-facing configuration and step reporting types.

use crate::decoder::DecodedInstruction;

/// Default bound on pending interrupt messages.
pub const DEFAULT_INTERRUPT_QUEUE_CAPACITY: usize = 256;

/// Immutable configuration for a [`crate::Machine`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct MachineConfig {
    /// Dispatch queued interrupts at instruction boundaries.
    ///
    /// When disabled, messages still queue and hosts drain them with
    /// [`crate::Machine::take_pending_interrupt`].
    pub interrupt_dispatch: bool,
    /// Maximum number of pending interrupt messages.
    pub interrupt_queue_capacity: usize,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            interrupt_dispatch: true,
            interrupt_queue_capacity: DEFAULT_INTERRUPT_QUEUE_CAPACITY,
        }
    }
}

/// Result of one call to [`crate::step_one`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum StepOutcome {
    /// Instruction executed with its full effect.
    Retired {
        /// Address of the instruction word.
        pc: u16,
        /// The executed instruction.
        instruction: DecodedInstruction,
    },
    /// Instruction was skipped by a failed conditional; only its words were consumed.
    Skipped {
        /// Address of the instruction word.
        pc: u16,
        /// The skipped instruction.
        instruction: DecodedInstruction,
    },
    /// Unassigned extended opcode executed as a no-op.
    ///
    /// Reported even when a skip was pending, since a reserved word has no
    /// decoded instruction to carry in [`StepOutcome::Skipped`].
    Reserved {
        /// Address of the instruction word.
        pc: u16,
        /// Raw instruction word.
        word: u16,
    },
    /// A queued interrupt was dispatched instead of fetching an instruction.
    InterruptDispatched {
        /// Message loaded into register `A`.
        message: u16,
    },
}

impl StepOutcome {
    /// Returns `true` when the step ran an instruction to completion.
    #[must_use]
    pub const fn is_retired(self) -> bool {
        matches!(self, Self::Retired { .. })
    }
}
