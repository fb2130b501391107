//! Write hooks over memory address ranges.
//!
//! Observers are called inline on the executing thread, in registration
//! order, once per memory write. They see only the address and the kind of
//! access, never the machine.

use std::fmt;

use crate::error::HookError;

/// Kind of memory access reported to an observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[non_exhaustive]
pub enum HookKind {
    /// A word was stored, even if the value did not change.
    Write,
}

/// Observer of memory writes.
pub trait WriteObserver {
    /// Records a write to `addr`.
    fn on_write(&mut self, addr: u16, kind: HookKind);
}

impl<F> WriteObserver for F
where
    F: FnMut(u16, HookKind),
{
    fn on_write(&mut self, addr: u16, kind: HookKind) {
        self(addr, kind);
    }
}

/// Handle returned by hook registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct HookId(u64);

struct HookEntry {
    id: HookId,
    low: u16,
    high: u16,
    observer: Box<dyn WriteObserver>,
}

impl HookEntry {
    const fn covers(&self, addr: u16) -> bool {
        self.low <= addr && addr <= self.high
    }
}

/// Ordered set of write observers.
#[derive(Default)]
pub struct HookRegistry {
    entries: Vec<HookEntry>,
    next_id: u64,
}

impl fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(
                self.entries
                    .iter()
                    .map(|entry| (entry.id, entry.low..=entry.high)),
            )
            .finish()
    }
}

impl HookRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `observer` for writes to `low..=high`.
    ///
    /// Overlapping ranges are allowed; every covering observer fires.
    ///
    /// # Errors
    ///
    /// Returns [`HookError::InvertedRange`] when `low > high`.
    pub fn register(
        &mut self,
        low: u16,
        high: u16,
        observer: Box<dyn WriteObserver>,
    ) -> Result<HookId, HookError> {
        if low > high {
            return Err(HookError::InvertedRange { low, high });
        }

        let id = HookId(self.next_id);
        self.next_id += 1;
        self.entries.push(HookEntry {
            id,
            low,
            high,
            observer,
        });
        Ok(id)
    }

    /// Removes a registration. Returns `false` if `id` is unknown.
    pub fn unregister(&mut self, id: HookId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() != before
    }

    /// Number of registered observers.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no observer is registered.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Calls every observer whose range covers `addr`, in registration order.
    pub fn notify(&mut self, addr: u16, kind: HookKind) {
        for entry in &mut self.entries {
            if entry.covers(addr) {
                entry.observer.on_write(addr, kind);
            }
        }
    }
}
