//! Instruction decoder for the DCPU-16 word format.
//!
//! Every 16-bit word decodes: the two operand fields cover all 64 operand
//! codes, and extended codes missing from the opcode table come back as
//! [`DecodedOrReserved::Reserved`] rather than a fault.

use crate::encoding::{
    classify_basic_opcode, classify_extended_opcode, pack_instruction_word,
    split_instruction_word, BasicOpcode, ExtendedOpcode,
};
use crate::state::Register;

/// Largest value an in-word literal operand can carry.
pub const MAX_INLINE_LITERAL: u8 = 0x1F;

/// Operand addressing class selected by a 6-bit operand code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Operand {
    /// `0x00..=0x07`: the register itself.
    Register(Register),
    /// `0x08..=0x0F`: `[register]`.
    Indirect(Register),
    /// `0x10..=0x17`: `[register + next word]`.
    IndirectOffset(Register),
    /// `0x18`: `[SP++]`.
    Pop,
    /// `0x19`: `[SP]`.
    Peek,
    /// `0x1A`: `[--SP]`.
    Push,
    /// `0x1B`: the `SP` register.
    Sp,
    /// `0x1C`: the `PC` register.
    Pc,
    /// `0x1D`: the `EX` register.
    Ex,
    /// The `IA` register. Only reachable through `IAG`/`IAS`; it has no operand code.
    Ia,
    /// `0x1E`: `[next word]`.
    NextWord,
    /// `0x1F`: the next word as an immediate value.
    NextWordLiteral,
    /// `0x20..=0x3F`: literal `0..=0x1F` packed into the instruction word.
    Literal(u8),
}

impl Operand {
    /// Decodes the low six bits of `bits`. Total over every 6-bit value.
    #[must_use]
    pub const fn from_u6(bits: u8) -> Self {
        let code = bits & 0x3F;
        match code {
            0x00..=0x07 => Self::Register(Register::from_low_bits(code)),
            0x08..=0x0F => Self::Indirect(Register::from_low_bits(code)),
            0x10..=0x17 => Self::IndirectOffset(Register::from_low_bits(code)),
            0x18 => Self::Pop,
            0x19 => Self::Peek,
            0x1A => Self::Push,
            0x1B => Self::Sp,
            0x1C => Self::Pc,
            0x1D => Self::Ex,
            0x1E => Self::NextWord,
            0x1F => Self::NextWordLiteral,
            _ => Self::Literal(code - 0x20),
        }
    }

    /// Decodes an operand code, rejecting values wider than six bits.
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        if code > 0x3F {
            return None;
        }
        Some(Self::from_u6(code))
    }

    /// Encoded operand code, or `None` for operands with no encoding.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn code(self) -> Option<u8> {
        let code = match self {
            Self::Register(reg) => reg.index() as u8,
            Self::Indirect(reg) => 0x08 + reg.index() as u8,
            Self::IndirectOffset(reg) => 0x10 + reg.index() as u8,
            Self::Pop => 0x18,
            Self::Peek => 0x19,
            Self::Push => 0x1A,
            Self::Sp => 0x1B,
            Self::Pc => 0x1C,
            Self::Ex => 0x1D,
            Self::NextWord => 0x1E,
            Self::NextWordLiteral => 0x1F,
            Self::Literal(value) => {
                if value > MAX_INLINE_LITERAL {
                    return None;
                }
                0x20 + value
            }
            Self::Ia => return None,
        };
        Some(code)
    }

    /// Returns `true` when the operand reads a trailing word after the instruction.
    #[must_use]
    pub const fn consumes_next_word(self) -> bool {
        matches!(
            self,
            Self::IndirectOffset(_) | Self::NextWord | Self::NextWordLiteral
        )
    }

    /// Returns `true` for operands whose storage locator is always the discard slot.
    #[must_use]
    pub const fn is_literal(self) -> bool {
        matches!(self, Self::NextWordLiteral | Self::Literal(_))
    }
}

/// Fully decoded instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum DecodedInstruction {
    /// Two-operand form. `b` is the destination, `a` the source.
    Basic {
        /// Decoded opcode.
        opcode: BasicOpcode,
        /// Destination operand.
        b: Operand,
        /// Source operand.
        a: Operand,
    },
    /// Single-operand form.
    Extended {
        /// Decoded opcode.
        opcode: ExtendedOpcode,
        /// The only operand.
        a: Operand,
    },
}

impl DecodedInstruction {
    /// Re-encodes this instruction to its first word.
    ///
    /// `None` when an operand has no encoding (`IA` or an oversized literal).
    #[must_use]
    pub const fn encode(self) -> Option<u16> {
        match self {
            Self::Basic { opcode, b, a } => {
                let (Some(b), Some(a)) = (b.code(), a.code()) else {
                    return None;
                };
                Some(pack_instruction_word(opcode.code(), b, a))
            }
            Self::Extended { opcode, a } => {
                let Some(a) = a.code() else {
                    return None;
                };
                Some(pack_instruction_word(0, opcode.code(), a))
            }
        }
    }

    /// Number of trailing words the operands consume.
    #[must_use]
    #[allow(clippy::cast_lossless)]
    pub const fn trailing_words(self) -> u16 {
        match self {
            Self::Basic { b, a, .. } => {
                b.consumes_next_word() as u16 + a.consumes_next_word() as u16
            }
            Self::Extended { a, .. } => a.consumes_next_word() as u16,
        }
    }

    /// Total length in words, including the instruction word itself.
    #[must_use]
    pub const fn word_count(self) -> u16 {
        1 + self.trailing_words()
    }

    /// Assembly mnemonic.
    #[must_use]
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Basic { opcode, .. } => opcode.mnemonic(),
            Self::Extended { opcode, .. } => opcode.mnemonic(),
        }
    }
}

/// Result of decoding an instruction word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum DecodedOrReserved {
    /// Assigned opcode.
    Instruction(DecodedInstruction),
    /// Unassigned extended opcode. Its operand still consumes words.
    Reserved {
        /// The 6-bit extended code.
        code: u8,
        /// The operand that follows it.
        a: Operand,
    },
}

impl DecodedOrReserved {
    /// Returns the decoded instruction if the opcode is assigned.
    #[must_use]
    pub const fn instruction(self) -> Option<DecodedInstruction> {
        match self {
            Self::Instruction(instruction) => Some(instruction),
            Self::Reserved { .. } => None,
        }
    }

    /// Returns `true` for unassigned extended opcodes.
    #[must_use]
    pub const fn is_reserved(self) -> bool {
        matches!(self, Self::Reserved { .. })
    }
}

/// Instruction decoder.
pub struct Decoder;

impl Decoder {
    /// Decodes a 16-bit instruction word.
    #[must_use]
    pub fn decode(word: u16) -> DecodedOrReserved {
        let (o, b, a) = split_instruction_word(word);
        let a = Operand::from_u6(a);

        if let Some(opcode) = classify_basic_opcode(o) {
            return DecodedOrReserved::Instruction(DecodedInstruction::Basic {
                opcode,
                b: Operand::from_u6(b),
                a,
            });
        }

        classify_extended_opcode(b).map_or(
            DecodedOrReserved::Reserved { code: b, a },
            |opcode| DecodedOrReserved::Instruction(DecodedInstruction::Extended { opcode, a }),
        )
    }
}
