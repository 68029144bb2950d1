//! The execution tape and the per-thread active-tape slot.

use std::{cell::RefCell, fmt, rc::Rc};

use crate::errors::{ADError, Result};
use crate::history::History;

struct Book {
    records: Vec<History>,
    epoch: u64,
}

/// An append-only log of recorded operations.
///
/// `Tape` is a cheap handle: clones refer to the same log. Every thread has
/// one *active* tape which the operation builders append to; a different tape
/// can be made active for a scope with [`Tape::activate`].
#[derive(Clone)]
pub struct Tape {
    book: Rc<RefCell<Book>>,
}

thread_local! {
    static ACTIVE: RefCell<Tape> = RefCell::new(Tape::new());
}

impl Default for Tape {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Tape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let book = self.book.borrow();
        write!(
            f,
            "Tape {{ addr: {:?}, len: {}, epoch: {} }}",
            Rc::as_ptr(&self.book),
            book.records.len(),
            book.epoch
        )
    }
}

impl Tape {
    /// Creates an empty tape.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty tape with room for `records` operations.
    pub fn with_capacity(records: usize) -> Self {
        Tape {
            book: Rc::new(RefCell::new(Book {
                records: Vec::with_capacity(records),
                epoch: 0,
            })),
        }
    }

    /// Returns the active tape of the current thread.
    pub fn active() -> Tape {
        ACTIVE.with(|t| t.borrow().clone())
    }

    /// Makes this tape the active one until the returned guard is dropped.
    #[must_use = "the previous tape is restored as soon as the guard is dropped"]
    pub fn activate(&self) -> TapeGuard {
        let prev = ACTIVE.with(|t| t.replace(self.clone()));
        TapeGuard { prev: Some(prev) }
    }

    /// Number of recorded operations.
    pub fn len(&self) -> usize {
        self.book.borrow().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether both handles refer to the same log.
    pub fn ptr_eq(&self, other: &Tape) -> bool {
        Rc::ptr_eq(&self.book, &other.book)
    }

    /// Drops every record. Variables recorded before the reset can no longer
    /// run a backward pass.
    pub fn clear(&self) {
        let mut book = self.book.borrow_mut();
        log::debug!(
            "clearing tape with {} records (epoch {})",
            book.records.len(),
            book.epoch
        );
        book.records.clear();
        book.epoch += 1;
    }

    /// Zeroes every gradient cell referenced by the tape.
    pub fn reset_gradients(&self) {
        for record in &self.book.borrow().records {
            for cell in record.grad_cells() {
                cell.set(0.0);
            }
        }
    }

    pub fn debug_print(&self) {
        for (i, record) in self.book.borrow().records.iter().enumerate() {
            log::debug!("{}: {:?}", i, record);
        }
    }

    pub(crate) fn record(&self, history: History) -> Position {
        let mut book = self.book.borrow_mut();
        let index = book.records.len();
        log::trace!("tape[{}] <- {}", index, history.name());
        book.records.push(history);
        Position {
            tape: self.clone(),
            index,
            epoch: book.epoch,
        }
    }

    fn propagate_from(&self, start: usize) {
        let book = self.book.borrow();
        log::debug!("backward pass over {} records", start + 1);
        for record in book.records[..=start].iter().rev() {
            record.propagate_into();
        }
    }
}

/// Restores the previously active tape when dropped.
pub struct TapeGuard {
    prev: Option<Tape>,
}

impl Drop for TapeGuard {
    fn drop(&mut self) {
        if let Some(prev) = self.prev.take() {
            ACTIVE.with(|t| *t.borrow_mut() = prev);
        }
    }
}

/// Where a variable's defining operation sits on which tape.
#[derive(Clone, Debug)]
pub(crate) struct Position {
    pub(crate) tape: Tape,
    pub(crate) index: usize,
    epoch: u64,
}

impl Position {
    /// Fails when the tape has been cleared since this position was recorded.
    pub(crate) fn validate(&self) -> Result<()> {
        let book = self.tape.book.borrow();
        if book.epoch != self.epoch || self.index >= book.records.len() {
            return Err(ADError::StalePosition { index: self.index });
        }
        Ok(())
    }

    /// Replays every record from this position down to the start of the tape.
    pub(crate) fn propagate(&self) {
        self.tape.propagate_from(self.index);
    }
}

/// Clears the active tape of the current thread.
pub fn clear_gradient_tape() {
    Tape::active().clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::var::Var;

    #[test]
    fn guard_swaps_and_restores_active_tape() {
        let outer = Tape::active();
        let inner = Tape::new();
        {
            let _guard = inner.activate();
            assert!(Tape::active().ptr_eq(&inner));
            let _ = Var::new(1.0) + Var::new(2.0);
        }
        assert!(Tape::active().ptr_eq(&outer));
        assert_eq!(inner.len(), 1);
    }

    #[test]
    fn clear_invalidates_positions() {
        let tape = Tape::with_capacity(8);
        let _guard = tape.activate();
        let c = Var::new(2.0) * Var::new(3.0);
        assert_eq!(tape.len(), 1);
        tape.clear();
        assert!(tape.is_empty());
        assert_eq!(
            c.backward(),
            Err(ADError::StalePosition { index: 0 })
        );
        assert_eq!(c.grad(), 0.0);
    }

    #[test]
    fn reset_gradients_zeroes_every_cell() {
        let tape = Tape::new();
        let _guard = tape.activate();
        let a = Var::new(2.0);
        let b = Var::new(3.0);
        let c = &a * &b;
        c.backward().unwrap();
        assert_eq!(a.grad(), 3.0);
        tape.reset_gradients();
        assert_eq!(a.grad(), 0.0);
        assert_eq!(b.grad(), 0.0);
        assert_eq!(c.grad(), 0.0);
        tape.debug_print();
    }
}
