//! The differentiable scalar type.

use std::{cell::Cell, cmp::Ordering, fmt, rc::Rc};

use crate::errors::Result;
use crate::history::{History, Slot};
use crate::rules::{BinaryRule, UnaryRule};
use crate::tape::{Position, Tape};

#[inline]
fn slot(v: f64) -> Slot {
    Rc::new(Cell::new(v))
}

/// A scalar whose operations are recorded on the active tape.
///
/// Clones share the value and gradient cells: gradient accumulated through
/// one clone is visible through every other.
///
/// A `Var` recorded on another tape can still be used while a different tape
/// is active. The active tape treats it as a leaf: gradient reaches its
/// gradient cell, but its own history is only replayed by its own tape.
#[derive(Clone)]
pub struct Var {
    value: Slot,
    grad: Slot,
    position: Option<Position>,
}

impl Default for Var {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Debug for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Var({}, grad: {}, position: {:?})",
            self.value(),
            self.grad(),
            self.tape_position()
        )
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Var({})", self.value())
    }
}

impl From<f64> for Var {
    fn from(v: f64) -> Self {
        Var::new(v)
    }
}

impl Var {
    /// Creates a leaf holding `v` with a zero gradient.
    pub fn new(v: f64) -> Self {
        Var {
            value: slot(v),
            grad: slot(0.0),
            position: None,
        }
    }

    /// Creates a leaf holding zero.
    pub fn zero() -> Self {
        Self::new(0.0)
    }

    #[inline]
    pub fn value(&self) -> f64 {
        self.value.get()
    }

    #[inline]
    /// The gradient accumulated so far.
    pub fn grad(&self) -> f64 {
        self.grad.get()
    }

    /// Overwrites the value cell. Records already on the tape read the new
    /// value on the next backward pass.
    pub fn set_value(&self, v: f64) {
        self.value.set(v);
    }

    pub fn set_grad(&self, g: f64) {
        self.grad.set(g);
    }

    /// Resets the gradient to zero. Gradients are never cleared implicitly.
    pub fn zero_grad(&self) {
        self.grad.set(0.0);
    }

    /// Index of the record that produced this variable, `None` for a leaf.
    pub fn tape_position(&self) -> Option<usize> {
        self.position.as_ref().map(|p| p.index)
    }

    pub fn is_leaf(&self) -> bool {
        self.position.is_none()
    }

    /// Seeds this variable's gradient with 1 and replays the tape from its
    /// position down to the start.
    ///
    /// Every record up to the position is replayed, including ones that are
    /// not ancestors of `self`. Gradients add onto whatever the cells already
    /// hold, so repeated passes sum unless the caller resets them.
    pub fn backward(&self) -> Result<()> {
        match &self.position {
            None => self.grad.set(1.0),
            Some(pos) => {
                pos.validate()?;
                self.grad.set(1.0);
                pos.propagate();
            }
        }
        Ok(())
    }

    /// Turns the receiver into `R(self, rhs)`, recording the operation.
    pub(crate) fn apply_binary<R: BinaryRule>(&mut self, rhs: &Var) {
        let tape = recording_tape(&[&*self, rhs]);
        let value = R::eval(self.value(), rhs.value());
        let result_grad = slot(0.0);
        let position = tape.record(History::binary::<R>(
            self.value.clone(),
            rhs.value.clone(),
            self.grad.clone(),
            rhs.grad.clone(),
            result_grad.clone(),
        ));
        self.value = slot(value);
        self.grad = result_grad;
        self.position = Some(position);
    }

    /// Returns `R(self, rhs)` and leaves both operands untouched.
    pub(crate) fn binary<R: BinaryRule>(&self, rhs: &Var) -> Var {
        let mut out = self.clone();
        out.apply_binary::<R>(rhs);
        out
    }

    /// Returns `R(self)`, recording the operation.
    pub(crate) fn unary<R: UnaryRule>(&self) -> Var {
        let tape = recording_tape(&[self]);
        let out = Var::new(R::eval(self.value()));
        let position = tape.record(History::unary::<R>(
            self.value.clone(),
            self.grad.clone(),
            out.grad.clone(),
        ));
        Var {
            position: Some(position),
            ..out
        }
    }
}

/// The active tape. Operands recorded on another tape act as its leaves.
fn recording_tape(operands: &[&Var]) -> Tape {
    let tape = Tape::active();
    for pos in operands.iter().filter_map(|v| v.position.as_ref()) {
        if !pos.tape.ptr_eq(&tape) {
            log::trace!("operand from {:?} recorded as a leaf of {:?}", pos.tape, tape);
        }
    }
    tape
}

impl PartialEq for Var {
    fn eq(&self, o: &Self) -> bool {
        self.value() == o.value()
    }
}
impl PartialOrd for Var {
    fn partial_cmp(&self, o: &Self) -> Option<Ordering> {
        self.value().partial_cmp(&o.value())
    }
}
impl PartialEq<f64> for Var {
    fn eq(&self, rhs: &f64) -> bool {
        self.value() == *rhs
    }
}
impl PartialOrd<f64> for Var {
    fn partial_cmp(&self, rhs: &f64) -> Option<Ordering> {
        self.value().partial_cmp(rhs)
    }
}
