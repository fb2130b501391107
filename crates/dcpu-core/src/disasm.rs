//! Instruction disassembly for the DCPU-16.
//!
//! Rows are produced straight from memory words, so trailing operand words
//! are shown with their values (`[0x1000+A]`, `0x0030`). Reading past the end
//! of the supplied slice stops disassembly; addresses otherwise wrap.

use crate::decoder::{DecodedInstruction, DecodedOrReserved, Decoder, Operand};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single disassembled instruction row.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisassemblyRow {
    /// Address of the instruction word.
    pub addr_start: u16,
    /// Length in words, including trailing operand words.
    pub len_words: u8,
    /// Raw words in memory order.
    pub words: Vec<u16>,
    /// Mnemonic (`SET`, `JSR`, or `.word` for reserved opcodes).
    pub mnemonic: String,
    /// Formatted operands, destination first.
    pub operands: String,
    /// Whether the opcode is unassigned.
    pub is_reserved: bool,
}

/// Disassembles the instruction starting at `addr`.
///
/// Returns `None` when `addr` or a trailing word lies outside `memory`.
#[must_use]
pub fn disassemble_one(addr: u16, memory: &[u16]) -> Option<DisassemblyRow> {
    let word = *memory.get(usize::from(addr))?;
    let mut cursor = TrailingWords {
        memory,
        next: addr.wrapping_add(1),
        words: vec![word],
    };

    let (mnemonic, operands, is_reserved) = match Decoder::decode(word) {
        DecodedOrReserved::Instruction(DecodedInstruction::Basic { opcode, b, a }) => {
            let b = format_operand(b, &mut cursor)?;
            let a = format_operand(a, &mut cursor)?;
            (opcode.mnemonic().to_string(), format!("{b}, {a}"), false)
        }
        DecodedOrReserved::Instruction(DecodedInstruction::Extended { opcode, a }) => {
            let a = format_operand(a, &mut cursor)?;
            (opcode.mnemonic().to_string(), a, false)
        }
        DecodedOrReserved::Reserved { a, .. } => {
            format_operand(a, &mut cursor)?;
            (
                ".word".to_string(),
                format!("0x{word:04X} ; RESERVED"),
                true,
            )
        }
    };

    Some(DisassemblyRow {
        addr_start: addr,
        len_words: u8::try_from(cursor.words.len()).unwrap_or(u8::MAX),
        words: cursor.words,
        mnemonic,
        operands,
        is_reserved,
    })
}

/// Disassembles up to `count` consecutive instructions starting at `start`.
#[must_use]
pub fn disassemble_range(start: u16, count: usize, memory: &[u16]) -> Vec<DisassemblyRow> {
    let mut rows = Vec::with_capacity(count);
    let mut addr = start;

    for _ in 0..count {
        let Some(row) = disassemble_one(addr, memory) else {
            break;
        };
        addr = addr.wrapping_add(u16::from(row.len_words));
        rows.push(row);
    }

    rows
}

struct TrailingWords<'a> {
    memory: &'a [u16],
    next: u16,
    words: Vec<u16>,
}

impl TrailingWords<'_> {
    fn take(&mut self) -> Option<u16> {
        let word = *self.memory.get(usize::from(self.next))?;
        self.next = self.next.wrapping_add(1);
        self.words.push(word);
        Some(word)
    }
}

fn format_operand(operand: Operand, cursor: &mut TrailingWords<'_>) -> Option<String> {
    let text = match operand {
        Operand::Register(reg) => reg.name().to_string(),
        Operand::Indirect(reg) => format!("[{}]", reg.name()),
        Operand::IndirectOffset(reg) => format!("[0x{:04X}+{}]", cursor.take()?, reg.name()),
        Operand::Pop => "POP".to_string(),
        Operand::Peek => "PEEK".to_string(),
        Operand::Push => "PUSH".to_string(),
        Operand::Sp => "SP".to_string(),
        Operand::Pc => "PC".to_string(),
        Operand::Ex => "EX".to_string(),
        Operand::Ia => "IA".to_string(),
        Operand::NextWord => format!("[0x{:04X}]", cursor.take()?),
        Operand::NextWordLiteral => format!("0x{:04X}", cursor.take()?),
        Operand::Literal(value) => format!("0x{value:02X}"),
    };
    Some(text)
}
