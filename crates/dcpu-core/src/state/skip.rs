use crate::Machine;

/// Conditional-skip state carried between instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum SkipState {
    /// The next instruction executes normally.
    #[default]
    Normal,
    /// The next instruction only consumes its words.
    Skipping,
}

impl SkipState {
    /// Returns `true` while the next instruction is being skipped.
    #[must_use]
    pub const fn is_skipping(self) -> bool {
        matches!(self, Self::Skipping)
    }
}

/// Ends a pending skip.
///
/// Returns `true` when the current instruction was being skipped, in which
/// case the caller must stop after its operand words have been consumed.
pub const fn skip_guard(machine: &mut Machine) -> bool {
    let skipping = machine.is_skipping();
    machine.set_skip_state(SkipState::Normal);
    skipping
}

/// Arms a skip of the next instruction when `condition` does not hold.
pub const fn arm_skip(machine: &mut Machine, condition: bool) {
    let state = if condition {
        SkipState::Normal
    } else {
        SkipState::Skipping
    };
    machine.set_skip_state(state);
}
