//! Pure result computation for arithmetic and conditional opcodes.

#![allow(clippy::pedantic, clippy::nursery, unknown_lints, missing_docs)]

use super::overflow::{compute_overflow, FlowOp};
use crate::encoding::BasicOpcode;

/// Read-modify-write opcodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Shl,
    Shr,
    And,
    Bor,
    Xor,
}

/// Conditional opcodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    Equal,
    NotEqual,
    Greater,
    BitsSet,
}

/// Stored value plus the new `EX`, when the opcode writes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArithmeticResult {
    pub value: u16,
    pub ex: Option<u16>,
}

impl ArithmeticResult {
    const fn with_ex(value: u16, ex: u16) -> Self {
        Self {
            value,
            ex: Some(ex),
        }
    }

    const fn keep_ex(value: u16) -> Self {
        Self { value, ex: None }
    }
}

/// Computes `b op a` with 16-bit wraparound.
pub fn compute_arithmetic(op: ArithmeticOp, b: u16, a: u16) -> ArithmeticResult {
    match op {
        ArithmeticOp::Add => ArithmeticResult::with_ex(
            b.wrapping_add(a),
            compute_overflow(FlowOp::Add, b, a).value(),
        ),
        ArithmeticOp::Sub => ArithmeticResult::with_ex(
            b.wrapping_sub(a),
            compute_overflow(FlowOp::Sub, b, a).value(),
        ),
        ArithmeticOp::Mul => {
            let product = u32::from(b) * u32::from(a);
            ArithmeticResult::with_ex(low_word(product), low_word(product >> 16))
        }
        ArithmeticOp::Div => {
            if a == 0 {
                ArithmeticResult::with_ex(0, 0)
            } else {
                let fraction = (u32::from(b) << 16) / u32::from(a);
                ArithmeticResult::with_ex(b / a, low_word(fraction))
            }
        }
        ArithmeticOp::Mod => ArithmeticResult::keep_ex(if a == 0 { 0 } else { b % a }),
        ArithmeticOp::Shl => {
            let shifted = u32::from(b).checked_shl(u32::from(a)).unwrap_or(0);
            ArithmeticResult::with_ex(low_word(shifted), low_word(shifted >> 16))
        }
        ArithmeticOp::Shr => {
            let amount = u32::from(a);
            let value = u32::from(b).checked_shr(amount).unwrap_or(0);
            let spill = (u32::from(b) << 16).checked_shr(amount).unwrap_or(0);
            ArithmeticResult::with_ex(low_word(value), low_word(spill))
        }
        ArithmeticOp::And => ArithmeticResult::keep_ex(b & a),
        ArithmeticOp::Bor => ArithmeticResult::keep_ex(b | a),
        ArithmeticOp::Xor => ArithmeticResult::keep_ex(b ^ a),
    }
}

/// Evaluates a conditional test.
pub const fn condition_holds(condition: Condition, b: u16, a: u16) -> bool {
    match condition {
        Condition::Equal => b == a,
        Condition::NotEqual => b != a,
        Condition::Greater => b > a,
        Condition::BitsSet => (b & a) != 0,
    }
}

/// Splits basic opcodes into their handler families.
pub const fn classify(opcode: BasicOpcode) -> OpcodeFamily {
    match opcode {
        BasicOpcode::Set => OpcodeFamily::Assign,
        BasicOpcode::Add => OpcodeFamily::Arithmetic(ArithmeticOp::Add),
        BasicOpcode::Sub => OpcodeFamily::Arithmetic(ArithmeticOp::Sub),
        BasicOpcode::Mul => OpcodeFamily::Arithmetic(ArithmeticOp::Mul),
        BasicOpcode::Div => OpcodeFamily::Arithmetic(ArithmeticOp::Div),
        BasicOpcode::Mod => OpcodeFamily::Arithmetic(ArithmeticOp::Mod),
        BasicOpcode::Shl => OpcodeFamily::Arithmetic(ArithmeticOp::Shl),
        BasicOpcode::Shr => OpcodeFamily::Arithmetic(ArithmeticOp::Shr),
        BasicOpcode::And => OpcodeFamily::Arithmetic(ArithmeticOp::And),
        BasicOpcode::Bor => OpcodeFamily::Arithmetic(ArithmeticOp::Bor),
        BasicOpcode::Xor => OpcodeFamily::Arithmetic(ArithmeticOp::Xor),
        BasicOpcode::Ife => OpcodeFamily::Conditional(Condition::Equal),
        BasicOpcode::Ifn => OpcodeFamily::Conditional(Condition::NotEqual),
        BasicOpcode::Ifg => OpcodeFamily::Conditional(Condition::Greater),
        BasicOpcode::Ifb => OpcodeFamily::Conditional(Condition::BitsSet),
    }
}

/// Handler family of a basic opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpcodeFamily {
    Assign,
    Arithmetic(ArithmeticOp),
    Conditional(Condition),
}

const fn low_word(value: u32) -> u16 {
    (value & 0xFFFF) as u16
}
