//! Multi-instruction programs exercising the stack, hooks and interrupts.

#![allow(clippy::pedantic, clippy::nursery)]

use std::cell::RefCell;
use std::rc::Rc;

use dcpu_core::{
    pack_instruction_word, BasicOpcode, ByteOrder, ExtendedOpcode, HookKind, InterruptError,
    Machine, MachineConfig, Register, StepOutcome,
};
use log as _;
use proptest as _;
use rstest as _;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;

const REG_A: u8 = 0x00;
const REG_B: u8 = 0x01;
const REG_C: u8 = 0x02;
const POP: u8 = 0x18;
const PUSH: u8 = 0x1A;
const PC: u8 = 0x1C;
const NEXT_WORD: u8 = 0x1E;
const NEXT_LITERAL: u8 = 0x1F;

const fn lit(value: u8) -> u8 {
    0x20 + value
}

fn basic(opcode: BasicOpcode, b: u8, a: u8) -> u16 {
    pack_instruction_word(opcode.code(), b, a)
}

fn extended(opcode: ExtendedOpcode, a: u8) -> u16 {
    pack_instruction_word(0, opcode.code(), a)
}

fn loaded(origin: u16, program: &[u16]) -> Machine {
    let mut machine = Machine::new();
    machine.load_words(origin, program).expect("program fits");
    machine.regs.set_pc(origin);
    machine
}

#[test]
fn jsr_pushes_return_address_and_set_pc_pop_returns() {
    let mut machine = loaded(0x1000, &[extended(ExtendedOpcode::Jsr, NEXT_LITERAL), 0x2000]);
    machine
        .load_words(0x2000, &[basic(BasicOpcode::Set, PC, POP)])
        .expect("subroutine fits");
    machine.regs.set_sp(0x8000);

    assert!(machine.step().is_retired());
    assert_eq!(machine.regs.pc(), 0x2000);
    assert_eq!(machine.regs.sp(), 0x7FFF);
    assert_eq!(machine.memory()[0x7FFF], 0x1002);

    assert!(machine.step().is_retired());
    assert_eq!(machine.regs.pc(), 0x1002);
    assert_eq!(machine.regs.sp(), 0x8000);
}

#[test]
fn skipped_jsr_leaves_stack_alone() {
    let mut machine = loaded(
        0,
        &[
            basic(BasicOpcode::Ife, REG_A, lit(1)),
            extended(ExtendedOpcode::Jsr, NEXT_LITERAL),
            0x2000,
        ],
    );

    machine.run(2);

    assert_eq!(machine.regs.pc(), 3);
    assert_eq!(machine.regs.sp(), 0);
    assert_eq!(machine.memory()[0xFFFF], 0);
}

#[test]
fn read_modify_write_on_push_moves_sp_once() {
    let mut machine = loaded(0, &[basic(BasicOpcode::Add, PUSH, lit(5))]);
    machine.regs.set_sp(0x8000);
    machine.memory_mut()[0x7FFF] = 10;

    machine.step();

    assert_eq!(machine.regs.sp(), 0x7FFF);
    assert_eq!(machine.memory()[0x7FFF], 15);
}

#[test]
fn read_modify_write_on_pop_moves_sp_once() {
    let mut machine = loaded(0, &[basic(BasicOpcode::Add, POP, lit(5))]);
    machine.regs.set_sp(0x7FFF);
    machine.memory_mut()[0x7FFF] = 10;

    machine.step();

    assert_eq!(machine.regs.sp(), 0x8000);
    assert_eq!(machine.memory()[0x7FFF], 15);
}

#[test]
fn read_modify_write_with_two_trailing_words() {
    let mut machine = loaded(
        0,
        &[basic(BasicOpcode::Add, NEXT_WORD, NEXT_LITERAL), 0x1000, 0x0003],
    );
    machine.memory_mut()[0x1000] = 4;

    machine.step();

    assert_eq!(machine.memory()[0x1000], 7);
    assert_eq!(machine.regs.pc(), 3);
}

#[test]
fn counting_loop_runs_to_completion() {
    let mut machine = loaded(
        0,
        &[
            basic(BasicOpcode::Set, REG_A, lit(0)),
            basic(BasicOpcode::Add, REG_A, lit(1)),
            basic(BasicOpcode::Ifn, REG_A, lit(10)),
            basic(BasicOpcode::Set, PC, lit(1)),
            basic(BasicOpcode::Set, REG_B, REG_A),
            basic(BasicOpcode::Set, PC, lit(5)),
        ],
    );

    machine.run(64);

    assert_eq!(machine.regs.gpr(Register::A), 10);
    assert_eq!(machine.regs.gpr(Register::B), 10);
    assert_eq!(machine.regs.pc(), 5);
}

#[test]
fn big_endian_image_runs_from_address_zero() {
    let mut machine = Machine::new();
    // SET A, 0x0030
    machine
        .load_image(&[0x7C, 0x01, 0x00, 0x30], ByteOrder::Big)
        .expect("even image");

    machine.step();

    assert_eq!(machine.regs.gpr(Register::A), 0x0030);
}

#[test]
fn hooks_fire_in_registration_order_for_covered_memory_only() {
    let mut machine = loaded(
        0,
        &[
            basic(BasicOpcode::Set, NEXT_WORD, lit(1)),
            0x1000,
            basic(BasicOpcode::Set, NEXT_WORD, lit(2)),
            0x1080,
            basic(BasicOpcode::Set, REG_A, lit(3)),
            basic(BasicOpcode::Set, lit(3), REG_A),
            basic(BasicOpcode::Set, NEXT_WORD, lit(1)),
            0x1000,
            basic(BasicOpcode::Set, NEXT_WORD, lit(1)),
            0x2000,
        ],
    );
    let events = Rc::new(RefCell::new(Vec::new()));

    let wide = Rc::clone(&events);
    machine
        .register_hook(0x1000, 0x10FF, move |addr: u16, kind: HookKind| {
            wide.borrow_mut().push(("wide", addr, kind));
        })
        .expect("valid range");
    let exact = Rc::clone(&events);
    let exact_id = machine
        .register_hook(0x1000, 0x1000, move |addr: u16, kind: HookKind| {
            exact.borrow_mut().push(("exact", addr, kind));
        })
        .expect("valid range");

    machine.run(6);

    assert_eq!(
        *events.borrow(),
        vec![
            ("wide", 0x1000, HookKind::Write),
            ("exact", 0x1000, HookKind::Write),
            ("wide", 0x1080, HookKind::Write),
            ("wide", 0x1000, HookKind::Write),
            ("exact", 0x1000, HookKind::Write),
        ]
    );

    events.borrow_mut().clear();
    assert!(machine.unregister_hook(exact_id));
    assert!(!machine.unregister_hook(exact_id));
    machine.regs.set_pc(0);
    machine.step();
    assert_eq!(*events.borrow(), vec![("wide", 0x1000, HookKind::Write)]);
}

#[test]
fn skipped_memory_write_notifies_nobody() {
    let mut machine = loaded(
        0,
        &[
            basic(BasicOpcode::Ife, REG_A, lit(1)),
            basic(BasicOpcode::Set, NEXT_WORD, lit(7)),
            0x1000,
        ],
    );
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    machine
        .register_hook(0, u16::MAX, move |addr: u16, _kind: HookKind| {
            sink.borrow_mut().push(addr);
        })
        .expect("valid range");

    machine.run(2);

    assert!(events.borrow().is_empty());
    assert_eq!(machine.memory()[0x1000], 0);
}

#[test]
fn software_interrupt_round_trip_through_rfi() {
    let mut machine = loaded(
        0,
        &[
            extended(ExtendedOpcode::Ias, NEXT_LITERAL),
            0x0010,
            extended(ExtendedOpcode::Int, NEXT_LITERAL),
            0x0042,
            basic(BasicOpcode::Set, REG_C, lit(1)),
            basic(BasicOpcode::Set, PC, lit(5)),
        ],
    );
    machine
        .load_words(
            0x0010,
            &[
                basic(BasicOpcode::Set, REG_B, REG_A),
                extended(ExtendedOpcode::Rfi, lit(0)),
            ],
        )
        .expect("handler fits");
    machine.regs.set_gpr(Register::A, 0x0AAA);

    machine.run(2);
    assert_eq!(machine.interrupts().len(), 1);

    assert_eq!(
        machine.step(),
        StepOutcome::InterruptDispatched { message: 0x0042 }
    );
    assert_eq!(machine.regs.pc(), 0x0010);
    assert_eq!(machine.regs.gpr(Register::A), 0x0042);
    assert_eq!(machine.regs.sp(), 0xFFFE);
    assert_eq!(machine.memory()[0xFFFF], 0x0004);
    assert_eq!(machine.memory()[0xFFFE], 0x0AAA);
    assert!(machine.interrupts().is_queueing());

    machine.run(2);
    assert_eq!(machine.regs.gpr(Register::B), 0x0042);
    assert_eq!(machine.regs.gpr(Register::A), 0x0AAA);
    assert_eq!(machine.regs.pc(), 0x0004);
    assert_eq!(machine.regs.sp(), 0x0000);
    assert!(!machine.interrupts().is_queueing());

    machine.step();
    assert_eq!(machine.regs.gpr(Register::C), 1);
}

#[test]
fn int_with_zero_ia_is_dropped() {
    let mut machine = loaded(0, &[extended(ExtendedOpcode::Int, lit(7))]);

    assert!(machine.step().is_retired());
    assert!(machine.interrupts().is_empty());
    assert_eq!(machine.regs.sp(), 0);
    assert_eq!(machine.regs.pc(), 1);
}

#[test]
fn host_drains_queue_when_dispatch_is_disabled() {
    let mut machine = Machine::with_config(MachineConfig {
        interrupt_dispatch: false,
        interrupt_queue_capacity: 1,
    });
    machine
        .load_words(0, &[basic(BasicOpcode::Set, REG_A, lit(0))])
        .expect("program fits");
    machine.regs.set_ia(0x0100);

    machine.raise_interrupt(1).expect("room for one");
    assert_eq!(
        machine.raise_interrupt(2),
        Err(InterruptError::QueueFull { capacity: 1 })
    );

    assert!(machine.step().is_retired());
    assert_eq!(machine.regs.pc(), 1);
    assert_eq!(machine.take_pending_interrupt(), Some(1));
    assert_eq!(machine.take_pending_interrupt(), None);
}

#[test]
fn dispatch_waits_while_skipping() {
    let mut machine = loaded(
        0,
        &[
            basic(BasicOpcode::Ife, REG_A, lit(1)),
            basic(BasicOpcode::Set, REG_C, lit(2)),
        ],
    );
    machine.regs.set_ia(0x0100);

    machine.step();
    machine.raise_interrupt(9).expect("queue has room");

    assert!(matches!(machine.step(), StepOutcome::Skipped { pc: 1, .. }));
    assert_eq!(
        machine.step(),
        StepOutcome::InterruptDispatched { message: 9 }
    );
    assert_eq!(machine.regs.gpr(Register::C), 0);
}

#[test]
fn int_on_full_queue_drops_the_message_and_continues() {
    let mut machine = Machine::with_config(MachineConfig {
        interrupt_dispatch: false,
        interrupt_queue_capacity: 1,
    });
    machine
        .load_words(
            0,
            &[
                extended(ExtendedOpcode::Int, lit(1)),
                extended(ExtendedOpcode::Int, lit(2)),
            ],
        )
        .expect("program fits");
    machine.regs.set_ia(0x0100);

    assert_eq!(machine.run(2), 2);

    assert_eq!(machine.regs.pc(), 2);
    assert_eq!(machine.interrupts().len(), 1);
    assert_eq!(machine.take_pending_interrupt(), Some(1));
}

#[test]
fn hwn_into_memory_notifies_the_covering_hook() {
    let mut machine = loaded(0, &[extended(ExtendedOpcode::Hwn, NEXT_WORD), 0x1000]);
    machine.memory_mut()[0x1000] = 5;
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    machine
        .register_hook(0x1000, 0x1000, move |addr: u16, _kind: HookKind| {
            sink.borrow_mut().push(addr);
        })
        .expect("valid range");

    assert!(machine.step().is_retired());

    assert_eq!(machine.memory()[0x1000], 0);
    assert_eq!(*events.borrow(), vec![0x1000]);
    assert_eq!(machine.regs.pc(), 2);
}

#[test]
fn skipped_hwn_consumes_its_word_and_writes_nothing() {
    let mut machine = loaded(
        0,
        &[
            basic(BasicOpcode::Ife, REG_A, lit(1)),
            extended(ExtendedOpcode::Hwn, NEXT_WORD),
            0x1000,
            basic(BasicOpcode::Set, REG_B, lit(3)),
        ],
    );
    machine.memory_mut()[0x1000] = 5;
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    machine
        .register_hook(0, u16::MAX, move |addr: u16, _kind: HookKind| {
            sink.borrow_mut().push(addr);
        })
        .expect("valid range");

    machine.step();
    assert!(matches!(machine.step(), StepOutcome::Skipped { pc: 1, .. }));

    assert_eq!(machine.regs.pc(), 3);
    assert_eq!(machine.memory()[0x1000], 5);
    assert!(events.borrow().is_empty());
    assert!(!machine.is_skipping());

    machine.step();
    assert_eq!(machine.regs.gpr(Register::B), 3);
}

#[test]
fn skipped_reserved_opcode_reports_reserved_and_ends_the_skip() {
    let reserved = pack_instruction_word(0, 0x02, NEXT_LITERAL);
    let mut machine = loaded(
        0,
        &[
            basic(BasicOpcode::Ife, REG_A, lit(1)),
            reserved,
            0x1234,
            basic(BasicOpcode::Set, REG_B, lit(4)),
        ],
    );

    machine.step();
    assert_eq!(
        machine.step(),
        StepOutcome::Reserved {
            pc: 1,
            word: reserved
        }
    );
    assert_eq!(machine.regs.pc(), 3);
    assert!(!machine.is_skipping());

    machine.step();
    assert_eq!(machine.regs.gpr(Register::B), 4);
}
