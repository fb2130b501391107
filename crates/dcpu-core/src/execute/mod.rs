//! Instruction execution for the DCPU-16.
//!
//! Each handler follows the same order:
//! 1. Resolve the destination location
//! 2. For read-modify-write opcodes, re-read the destination's current value
//! 3. Resolve the source value
//! 4. Stop here if the instruction is being skipped
//! 5. Compute, store through the location (notifying hooks) and update `EX`
//!
//! `SET` has no step 4: while skipping its location is the discard slot.

#![allow(
    clippy::pedantic,
    clippy::nursery,
    clippy::similar_names,
    unknown_lints,
    missing_docs
)]

mod helpers;
mod overflow;

pub use helpers::{compute_arithmetic, condition_holds, ArithmeticOp, ArithmeticResult, Condition};
pub use overflow::{compute_overflow, ExFlag, FlowOp};

use helpers::{classify, OpcodeFamily};
use log::{debug, warn};

use crate::decoder::{DecodedInstruction, DecodedOrReserved, Decoder, Operand};
use crate::encoding::{BasicOpcode, ExtendedOpcode};
use crate::interrupt::{dispatch_pending, raise_interrupt};
use crate::machine::Location;
use crate::resolver::{resolve_location, resolve_value, resolve_value_once};
use crate::state::{arm_skip, skip_guard, Register, SkipState};
use crate::{Machine, StepOutcome};

/// Registers zeroed by `HWQ` while no device is attached.
const HWQ_RESULT_REGISTERS: [Register; 5] =
    [Register::A, Register::B, Register::C, Register::X, Register::Y];

/// Executes a decoded instruction whose word has already been consumed.
pub fn execute_instruction(machine: &mut Machine, instruction: DecodedInstruction) {
    match instruction {
        DecodedInstruction::Basic { opcode, b, a } => execute_basic(machine, opcode, b, a),
        DecodedInstruction::Extended { opcode, a } => execute_extended(machine, opcode, a),
    }
}

fn execute_basic(machine: &mut Machine, opcode: BasicOpcode, b: Operand, a: Operand) {
    match classify(opcode) {
        OpcodeFamily::Assign => execute_set(machine, b, a),
        OpcodeFamily::Arithmetic(op) => execute_arithmetic(machine, op, b, a),
        OpcodeFamily::Conditional(condition) => execute_conditional(machine, condition, b, a),
    }
}

fn execute_extended(machine: &mut Machine, opcode: ExtendedOpcode, a: Operand) {
    match opcode {
        ExtendedOpcode::Jsr => execute_jsr(machine, a),
        ExtendedOpcode::Int => execute_int(machine, a),
        ExtendedOpcode::Iag => execute_set(machine, a, Operand::Ia),
        ExtendedOpcode::Ias => execute_set(machine, Operand::Ia, a),
        ExtendedOpcode::Rfi => execute_rfi(machine, a),
        ExtendedOpcode::Iaq => execute_iaq(machine, a),
        ExtendedOpcode::Hwn => execute_hwn(machine, a),
        ExtendedOpcode::Hwq => execute_hwq(machine, a),
        ExtendedOpcode::Hwi => execute_hwi(machine, a),
    }
}

fn execute_set(machine: &mut Machine, b: Operand, a: Operand) {
    let target = resolve_location(machine, b);
    let value = resolve_value(machine, a);
    machine.store(target, value);
    machine.set_skip_state(SkipState::Normal);
}

fn execute_arithmetic(machine: &mut Machine, op: ArithmeticOp, b: Operand, a: Operand) {
    let target = resolve_location(machine, b);
    let val_b = resolve_value_once(machine, b);
    let val_a = resolve_value(machine, a);
    if skip_guard(machine) {
        return;
    }

    let result = compute_arithmetic(op, val_b, val_a);
    machine.store(target, result.value);
    if let Some(ex) = result.ex {
        machine.regs.set_ex(ex);
    }
}

fn execute_conditional(machine: &mut Machine, condition: Condition, b: Operand, a: Operand) {
    let val_b = resolve_value(machine, b);
    let val_a = resolve_value(machine, a);
    if skip_guard(machine) {
        return;
    }
    arm_skip(machine, condition_holds(condition, val_b, val_a));
}

fn execute_jsr(machine: &mut Machine, a: Operand) {
    let target = resolve_value(machine, a);
    if skip_guard(machine) {
        return;
    }
    let return_address = machine.regs.pc();
    machine.push(return_address);
    machine.regs.set_pc(target);
}

fn execute_int(machine: &mut Machine, a: Operand) {
    let message = resolve_value(machine, a);
    if skip_guard(machine) {
        return;
    }
    if let Err(err) = raise_interrupt(machine, message) {
        warn!("INT {message:#06x} dropped: {err}");
    }
}

fn execute_rfi(machine: &mut Machine, a: Operand) {
    resolve_value(machine, a);
    if skip_guard(machine) {
        return;
    }
    machine.interrupts_mut().set_queueing(false);
    let saved_a = machine.pop();
    machine.regs.set_gpr(Register::A, saved_a);
    let saved_pc = machine.pop();
    machine.regs.set_pc(saved_pc);
}

fn execute_iaq(machine: &mut Machine, a: Operand) {
    let value = resolve_value(machine, a);
    if skip_guard(machine) {
        return;
    }
    machine.interrupts_mut().set_queueing(value != 0);
}

fn execute_hwn(machine: &mut Machine, a: Operand) {
    let target = resolve_location(machine, a);
    machine.store(target, 0);
    machine.set_skip_state(SkipState::Normal);
}

fn execute_hwq(machine: &mut Machine, a: Operand) {
    resolve_value(machine, a);
    if skip_guard(machine) {
        return;
    }
    for reg in HWQ_RESULT_REGISTERS {
        machine.store(Location::Register(reg), 0);
    }
}

fn execute_hwi(machine: &mut Machine, a: Operand) {
    resolve_value(machine, a);
    skip_guard(machine);
}

fn execute_reserved(machine: &mut Machine, code: u8, a: Operand) {
    resolve_value(machine, a);
    if !skip_guard(machine) {
        debug!("reserved extended opcode {code:#04x} executed as no-op");
    }
}

/// Runs one step: dispatches a pending interrupt, or fetches, decodes and
/// executes the instruction at `PC`.
pub fn step_one(machine: &mut Machine) -> StepOutcome {
    if let Some(message) = dispatch_pending(machine) {
        return StepOutcome::InterruptDispatched { message };
    }

    let pc = machine.regs.pc();
    let skipped = machine.is_skipping();
    let word = machine.consume_word();

    match Decoder::decode(word) {
        DecodedOrReserved::Instruction(instruction) => {
            execute_instruction(machine, instruction);
            if skipped {
                StepOutcome::Skipped { pc, instruction }
            } else {
                StepOutcome::Retired { pc, instruction }
            }
        }
        // Reported as reserved even while skipping: there is no decoded instruction.
        DecodedOrReserved::Reserved { code, a } => {
            execute_reserved(machine, code, a);
            StepOutcome::Reserved { pc, word }
        }
    }
}
