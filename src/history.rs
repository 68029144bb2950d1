//! History records stored on the tape.

use std::{cell::Cell, fmt, rc::Rc};

use crate::rules::{BinaryRule, UnaryRule};

/// Shared storage for a value or a gradient.
pub type Slot = Rc<Cell<f64>>;

type BinaryFn = fn(f64, f64, &Cell<f64>, &Cell<f64>, f64);
type UnaryFn = fn(f64, &Cell<f64>, f64);

enum Operands {
    Unary {
        value: Slot,
        grad: Slot,
        rule: UnaryFn,
    },
    Binary {
        lhs_value: Slot,
        rhs_value: Slot,
        lhs_grad: Slot,
        rhs_grad: Slot,
        rule: BinaryFn,
    },
}

/// One recorded operation: the operand cells, the result's gradient cell and
/// the rule that maps the latter onto the former.
pub struct History {
    operands: Operands,
    result_grad: Slot,
    name: &'static str,
}

impl History {
    /// Binds a two-operand rule to its cells.
    pub(crate) fn binary<R: BinaryRule>(
        lhs_value: Slot,
        rhs_value: Slot,
        lhs_grad: Slot,
        rhs_grad: Slot,
        result_grad: Slot,
    ) -> Self {
        Self {
            operands: Operands::Binary {
                lhs_value,
                rhs_value,
                lhs_grad,
                rhs_grad,
                rule: R::accumulate,
            },
            result_grad,
            name: R::NAME,
        }
    }

    /// Binds a one-operand rule to its cells.
    pub(crate) fn unary<R: UnaryRule>(value: Slot, grad: Slot, result_grad: Slot) -> Self {
        Self {
            operands: Operands::Unary {
                value,
                grad,
                rule: R::accumulate,
            },
            result_grad,
            name: R::NAME,
        }
    }

    /// Name of the rule this record applies.
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline(always)]
    /// Pushes the result gradient into the operand gradient cells.
    pub fn propagate_into(&self) {
        let d = self.result_grad.get();
        match &self.operands {
            Operands::Unary { value, grad, rule } => rule(value.get(), grad, d),
            Operands::Binary {
                lhs_value,
                rhs_value,
                lhs_grad,
                rhs_grad,
                rule,
            } => rule(lhs_value.get(), rhs_value.get(), lhs_grad, rhs_grad, d),
        }
    }

    /// Every gradient cell this record touches, result first.
    pub(crate) fn grad_cells(&self) -> Vec<&Slot> {
        match &self.operands {
            Operands::Unary { grad, .. } => vec![&self.result_grad, grad],
            Operands::Binary {
                lhs_grad, rhs_grad, ..
            } => vec![&self.result_grad, lhs_grad, rhs_grad],
        }
    }
}

impl fmt::Debug for History {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.operands {
            Operands::Unary { value, grad, .. } => write!(
                f,
                "History {{ op: {}, a: {}, a_grad: {}, result_grad: {} }}",
                self.name,
                value.get(),
                grad.get(),
                self.result_grad.get()
            ),
            Operands::Binary {
                lhs_value,
                rhs_value,
                lhs_grad,
                rhs_grad,
                ..
            } => write!(
                f,
                "History {{ op: {}, a: {}, b: {}, a_grad: {}, b_grad: {}, result_grad: {} }}",
                self.name,
                lhs_value.get(),
                rhs_value.get(),
                lhs_grad.get(),
                rhs_grad.get(),
                self.result_grad.get()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{Div, Sin};

    fn slot(v: f64) -> Slot {
        Rc::new(Cell::new(v))
    }

    #[test]
    fn binary_record_reads_cells_at_propagation_time() {
        let (a, b, ag, bg, cg) = (slot(2.0), slot(5.0), slot(0.0), slot(0.0), slot(1.0));
        let h = History::binary::<Div>(a.clone(), b.clone(), ag.clone(), bg.clone(), cg.clone());
        h.propagate_into();
        assert_eq!(ag.get(), 0.2);
        assert!((bg.get() + 0.08).abs() < 1e-15);

        cg.set(0.0);
        h.propagate_into();
        assert_eq!(ag.get(), 0.2);
        assert_eq!(h.name(), "Div");
    }

    #[test]
    fn unary_record_touches_single_operand() {
        let (a, ag, cg) = (slot(0.0), slot(0.0), slot(3.0));
        let h = History::unary::<Sin>(a, ag.clone(), cg);
        h.propagate_into();
        assert_eq!(ag.get(), 3.0);
        assert_eq!(h.grad_cells().len(), 2);
        assert!(format!("{:?}", h).starts_with("History { op: Sin"));
    }
}
