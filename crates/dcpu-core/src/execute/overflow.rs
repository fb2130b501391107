//! `EX` overflow model for `ADD` and `SUB`.

/// Value written to `EX` by an additive opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum ExFlag {
    /// Result fit in 16 bits.
    #[default]
    NoFlow,
    /// Result exceeded `0xFFFF`.
    Overflow,
    /// Result went below zero.
    Underflow,
}

impl ExFlag {
    /// Register value for this flag.
    #[must_use]
    pub const fn value(self) -> u16 {
        match self {
            Self::NoFlow => 0x0000,
            Self::Overflow => 0x0001,
            Self::Underflow => 0xFFFF,
        }
    }
}

/// Additive operation checked for overflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowOp {
    /// `b + a`
    Add,
    /// `b - a`
    Sub,
}

/// Classifies `b op a` computed in a wide signed intermediate.
#[must_use]
pub fn compute_overflow(op: FlowOp, b: u16, a: u16) -> ExFlag {
    let wide = match op {
        FlowOp::Add => i32::from(b) + i32::from(a),
        FlowOp::Sub => i32::from(b) - i32::from(a),
    };

    if wide < 0 {
        ExFlag::Underflow
    } else if wide > i32::from(u16::MAX) {
        ExFlag::Overflow
    } else {
        ExFlag::NoFlow
    }
}
