//! Elementary functions over [`Var`].
//!
//! Each builder evaluates eagerly and appends a single record to the active
//! tape. Domain errors are not checked; NaN and infinities flow through both
//! passes like they would for plain `f64`.

use std::borrow::Borrow;

use crate::rules::{Abs, Cos, Exp, Log, Pow, Sin, Sqrt, Tan};
use crate::var::Var;

impl Var {
    pub fn exp(&self) -> Var {
        self.unary::<Exp>()
    }

    /// Natural logarithm.
    pub fn ln(&self) -> Var {
        self.unary::<Log>()
    }

    pub fn sin(&self) -> Var {
        self.unary::<Sin>()
    }

    pub fn cos(&self) -> Var {
        self.unary::<Cos>()
    }

    pub fn tan(&self) -> Var {
        self.unary::<Tan>()
    }

    pub fn sqrt(&self) -> Var {
        self.unary::<Sqrt>()
    }

    pub fn abs(&self) -> Var {
        self.unary::<Abs>()
    }

    /// `self^exponent`, differentiable in both arguments.
    pub fn pow(&self, exponent: &Var) -> Var {
        self.binary::<Pow>(exponent)
    }

    /// `self^exponent` for a constant exponent.
    pub fn powf(&self, exponent: f64) -> Var {
        self.binary::<Pow>(&Var::new(exponent))
    }
}

pub fn exp<V: Borrow<Var>>(v: V) -> Var {
    v.borrow().exp()
}

/// Natural logarithm.
pub fn log<V: Borrow<Var>>(v: V) -> Var {
    v.borrow().ln()
}

pub fn sin<V: Borrow<Var>>(v: V) -> Var {
    v.borrow().sin()
}

pub fn cos<V: Borrow<Var>>(v: V) -> Var {
    v.borrow().cos()
}

pub fn tan<V: Borrow<Var>>(v: V) -> Var {
    v.borrow().tan()
}

pub fn sqrt<V: Borrow<Var>>(v: V) -> Var {
    v.borrow().sqrt()
}

pub fn abs<V: Borrow<Var>>(v: V) -> Var {
    v.borrow().abs()
}

/// `base^exponent`. The exponent's gradient lands in the exponent's own
/// gradient cell; its value cell is only read.
pub fn pow<B: Borrow<Var>, E: Borrow<Var>>(base: B, exponent: E) -> Var {
    base.borrow().pow(exponent.borrow())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tape::Tape;
    use approx::assert_relative_eq;

    fn with_tape_test<F: FnOnce()>(f: F) {
        let tape = Tape::new();
        let _guard = tape.activate();
        f();
    }

    #[test]
    fn check_exp_derivative() {
        with_tape_test(|| {
            let a = Var::new(1.0);
            let c = exp(&a);
            c.backward().unwrap();
            assert_relative_eq!(c.value(), std::f64::consts::E);
            assert_relative_eq!(a.grad(), std::f64::consts::E);
        });
    }

    #[test]
    fn check_log_derivative() {
        with_tape_test(|| {
            let x = Var::new(2.0);
            let out = log(&x);
            out.backward().unwrap();
            assert_eq!(x.grad(), 0.5);
            assert_eq!(out.grad(), 1.0);
        });
    }

    #[test]
    fn check_trig_derivatives() {
        with_tape_test(|| {
            let x = Var::new(0.0);
            sin(&x).backward().unwrap();
            assert_eq!(x.grad(), 1.0);
        });
        with_tape_test(|| {
            let x = Var::new(0.0);
            cos(&x).backward().unwrap();
            assert_eq!(x.grad(), 0.0);
        });
        with_tape_test(|| {
            let x = Var::new(0.0);
            tan(x.clone()).backward().unwrap();
            assert_eq!(x.grad(), 1.0);
        });
    }

    #[test]
    fn check_sqrt_and_abs_derivatives() {
        with_tape_test(|| {
            let x = Var::new(4.0);
            sqrt(&x).backward().unwrap();
            assert_eq!(x.grad(), 0.25);
        });
        with_tape_test(|| {
            let x = Var::new(-3.0);
            let out = abs(&x);
            out.backward().unwrap();
            assert_eq!(out.value(), 3.0);
            assert_eq!(x.grad(), -1.0);
        });
    }

    #[test]
    fn pow_routes_exponent_gradient_to_gradient_cell() {
        with_tape_test(|| {
            let base = Var::new(2.0);
            let exponent = Var::new(3.0);
            let out = pow(&base, &exponent);
            out.backward().unwrap();
            assert_eq!(out.value(), 8.0);
            assert_relative_eq!(base.grad(), 12.0);
            assert_relative_eq!(exponent.grad(), 2f64.ln() * 8.0);
            assert_eq!(exponent.value(), 3.0);
            assert_eq!(base.value(), 2.0);
        });
    }

    #[test]
    fn powf_treats_exponent_as_constant() {
        with_tape_test(|| {
            let x = Var::new(3.0);
            let out = x.powf(2.0);
            out.backward().unwrap();
            assert_eq!(out.value(), 9.0);
            assert_relative_eq!(x.grad(), 6.0);
        });
    }

    #[test]
    fn domain_errors_propagate_as_nan() {
        with_tape_test(|| {
            let x = Var::new(-1.0);
            let out = log(&x);
            assert!(out.value().is_nan());
            out.backward().unwrap();
            assert_eq!(x.grad(), -1.0);

            let zero = Var::new(0.0);
            let inf = Var::new(1.0) / &zero;
            assert!(inf.value().is_infinite());
            inf.backward().unwrap();
            assert!(zero.grad().is_infinite());
        });
    }
}
