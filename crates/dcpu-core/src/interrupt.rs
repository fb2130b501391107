//! Interrupt queue and dispatch.
//!
//! Messages raised while `IA` is zero are dropped. Queued messages are
//! dispatched one per step boundary when dispatch is enabled, queueing is
//! off, and no skip is pending.

use std::collections::VecDeque;

use log::{debug, trace};

use crate::error::InterruptError;
use crate::state::Register;
use crate::Machine;

/// FIFO of pending interrupt messages plus the queueing flag.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct InterruptController {
    pending: VecDeque<u16>,
    queueing: bool,
    capacity: usize,
}

impl InterruptController {
    /// Creates an empty controller holding at most `capacity` messages.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            pending: VecDeque::with_capacity(capacity.min(64)),
            queueing: false,
            capacity,
        }
    }

    /// Appends a message.
    ///
    /// # Errors
    ///
    /// Returns [`InterruptError::QueueFull`] when `capacity` messages are pending.
    pub fn enqueue(&mut self, message: u16) -> Result<(), InterruptError> {
        if self.pending.len() >= self.capacity {
            return Err(InterruptError::QueueFull {
                capacity: self.capacity,
            });
        }
        self.pending.push_back(message);
        Ok(())
    }

    /// Removes the oldest pending message.
    pub fn dequeue(&mut self) -> Option<u16> {
        self.pending.pop_front()
    }

    /// Number of pending messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Returns `true` when nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Queue bound.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns `true` while dispatch is held back by `IAQ` or an active handler.
    #[must_use]
    pub const fn is_queueing(&self) -> bool {
        self.queueing
    }

    /// Sets the queueing flag.
    pub const fn set_queueing(&mut self, queueing: bool) {
        self.queueing = queueing;
    }
}

/// Raises an interrupt with `message`.
///
/// Dropped silently when `IA` is zero.
///
/// # Errors
///
/// Returns [`InterruptError::QueueFull`] when the pending queue is at capacity.
pub fn raise_interrupt(machine: &mut Machine, message: u16) -> Result<(), InterruptError> {
    if machine.regs.ia() == 0 {
        debug!("interrupt {message:#06x} dropped: IA is zero");
        return Ok(());
    }
    machine.interrupts_mut().enqueue(message)
}

/// Dispatches the oldest pending interrupt if the machine can take it.
///
/// Pushes `PC` then `A`, jumps to `IA` with the message in `A`, and turns
/// queueing on until `RFI`. Returns the dispatched message.
pub fn dispatch_pending(machine: &mut Machine) -> Option<u16> {
    if !machine.config().interrupt_dispatch
        || machine.is_skipping()
        || machine.interrupts().is_queueing()
    {
        return None;
    }

    let message = machine.interrupts_mut().dequeue()?;
    let ia = machine.regs.ia();
    if ia == 0 {
        debug!("pending interrupt {message:#06x} dropped: IA cleared before dispatch");
        return None;
    }

    machine.interrupts_mut().set_queueing(true);
    let pc = machine.regs.pc();
    machine.push(pc);
    let a = machine.regs.gpr(Register::A);
    machine.push(a);
    machine.regs.set_pc(ia);
    machine.regs.set_gpr(Register::A, message);
    trace!("interrupt {message:#06x} dispatched to {ia:#06x} from {pc:#06x}");
    Some(message)
}
