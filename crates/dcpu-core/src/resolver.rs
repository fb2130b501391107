//! Operand resolution.
//!
//! Operands are resolved in encoding order: the destination first, then the
//! source. Indexed and immediate operands consume the word at `PC` even while
//! skipping, so a skipped instruction leaves `PC` exactly where a normal one
//! would. Nothing else changes while skipping.

use crate::decoder::Operand;
use crate::machine::{Location, SpecialRegister};
use crate::Machine;

/// Resolves `operand` to the location an instruction writes.
///
/// Literal operands resolve to [`Location::Discard`]. `PUSH` and `POP`
/// adjust `SP` here, once per instruction.
pub fn resolve_location(machine: &mut Machine, operand: Operand) -> Location {
    if machine.is_skipping() {
        if operand.consumes_next_word() {
            machine.consume_word();
        }
        return Location::Discard;
    }

    match operand {
        Operand::Register(reg) => Location::Register(reg),
        Operand::Indirect(reg) => Location::Memory(machine.regs.gpr(reg)),
        Operand::IndirectOffset(reg) => {
            let offset = machine.consume_word();
            Location::Memory(machine.regs.gpr(reg).wrapping_add(offset))
        }
        Operand::Pop => {
            let sp = machine.regs.sp();
            machine.regs.set_sp(sp.wrapping_add(1));
            Location::Memory(sp)
        }
        Operand::Peek => Location::Memory(machine.regs.sp()),
        Operand::Push => {
            let sp = machine.regs.sp().wrapping_sub(1);
            machine.regs.set_sp(sp);
            Location::Memory(sp)
        }
        Operand::Sp => Location::Special(SpecialRegister::Sp),
        Operand::Pc => Location::Special(SpecialRegister::Pc),
        Operand::Ex => Location::Special(SpecialRegister::Ex),
        Operand::Ia => Location::Special(SpecialRegister::Ia),
        Operand::NextWord => Location::Memory(machine.consume_word()),
        Operand::NextWordLiteral => {
            machine.consume_word();
            Location::Discard
        }
        Operand::Literal(_) => Location::Discard,
    }
}

/// Resolves `operand` to the value an instruction reads.
///
/// While skipping, consumes trailing words and returns zero.
pub fn resolve_value(machine: &mut Machine, operand: Operand) -> u16 {
    if machine.is_skipping() {
        if operand.consumes_next_word() {
            machine.consume_word();
        }
        return 0;
    }

    match operand {
        Operand::Literal(value) => u16::from(value),
        Operand::NextWordLiteral => machine.consume_word(),
        _ => {
            let location = resolve_location(machine, operand);
            machine.read(location)
        }
    }
}

/// Reads the current value of an operand already passed to [`resolve_location`].
///
/// Recovers the trailing word from `PC - 1` and the stack slot from `SP`
/// instead of repeating their side effects.
#[must_use]
pub fn resolve_value_once(machine: &Machine, operand: Operand) -> u16 {
    let pc = machine.regs.pc();
    let sp = machine.regs.sp();
    let trailing = machine.read_word(pc.wrapping_sub(1));

    match operand {
        Operand::Register(reg) => machine.regs.gpr(reg),
        Operand::Indirect(reg) => machine.read_word(machine.regs.gpr(reg)),
        Operand::IndirectOffset(reg) => {
            machine.read_word(machine.regs.gpr(reg).wrapping_add(trailing))
        }
        Operand::Pop => machine.read_word(sp.wrapping_sub(1)),
        Operand::Peek | Operand::Push => machine.read_word(sp),
        Operand::Sp => sp,
        Operand::Pc => pc,
        Operand::Ex => machine.regs.ex(),
        Operand::Ia => machine.regs.ia(),
        Operand::NextWord => machine.read_word(trailing),
        Operand::NextWordLiteral => trailing,
        Operand::Literal(value) => u16::from(value),
    }
}
