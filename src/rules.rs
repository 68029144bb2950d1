//! Elementary derivative rules.
//!
//! Every rule knows how to evaluate its operation and how to distribute an
//! incoming result gradient `d` into the operands' gradient cells, given the
//! operand values. Rules only ever add into the cells they are handed.

use std::cell::Cell;

#[inline(always)]
fn bump(cell: &Cell<f64>, by: f64) {
    cell.set(cell.get() + by);
}

/// A two-operand rule.
pub trait BinaryRule {
    /// Name shown in tape dumps.
    const NAME: &'static str;
    /// Evaluates the operation on the operand values.
    fn eval(a: f64, b: f64) -> f64;
    /// Accumulates `d` into the operand gradients `ag` and `bg`.
    fn accumulate(a: f64, b: f64, ag: &Cell<f64>, bg: &Cell<f64>, d: f64);
}

/// A one-operand rule.
pub trait UnaryRule {
    /// Name shown in tape dumps.
    const NAME: &'static str;
    /// Evaluates the operation on the operand value.
    fn eval(a: f64) -> f64;
    /// Accumulates `d` into the operand gradient `ag`.
    fn accumulate(a: f64, ag: &Cell<f64>, d: f64);
}

macro_rules! bin_rule {
    ($name:ident, $doc:expr, $eval:expr, $da:expr, $db:expr) => {
        #[doc = $doc]
        #[derive(Clone, Copy, Debug)]
        pub struct $name;
        impl BinaryRule for $name {
            const NAME: &'static str = stringify!($name);
            #[inline]
            fn eval(a: f64, b: f64) -> f64 {
                $eval(a, b)
            }
            #[inline]
            fn accumulate(a: f64, b: f64, ag: &Cell<f64>, bg: &Cell<f64>, d: f64) {
                bump(ag, $da(a, b, d));
                bump(bg, $db(a, b, d));
            }
        }
    };
}

macro_rules! un_rule {
    ($name:ident, $doc:expr, $eval:expr, $da:expr) => {
        #[doc = $doc]
        #[derive(Clone, Copy, Debug)]
        pub struct $name;
        impl UnaryRule for $name {
            const NAME: &'static str = stringify!($name);
            #[inline]
            fn eval(a: f64) -> f64 {
                $eval(a)
            }
            #[inline]
            fn accumulate(a: f64, ag: &Cell<f64>, d: f64) {
                bump(ag, $da(a, d));
            }
        }
    };
}

bin_rule!(
    Add,
    "Addition.",
    |a: f64, b: f64| a + b,
    |_a: f64, _b: f64, d: f64| d,
    |_a: f64, _b: f64, d: f64| d
);
bin_rule!(
    Sub,
    "Subtraction.",
    |a: f64, b: f64| a - b,
    |_a: f64, _b: f64, d: f64| d,
    |_a: f64, _b: f64, d: f64| -d
);
bin_rule!(
    Mul,
    "Multiplication.",
    |a: f64, b: f64| a * b,
    |_a: f64, b: f64, d: f64| d * b,
    |a: f64, _b: f64, d: f64| d * a
);
bin_rule!(
    Div,
    "Division.",
    |a: f64, b: f64| a / b,
    |_a: f64, b: f64, d: f64| d / b,
    |a: f64, b: f64, d: f64| -d * a / (b * b)
);
bin_rule!(
    Pow,
    "Power `a^b` with both base and exponent differentiable.",
    f64::powf,
    |a: f64, b: f64, d: f64| d * b * a.powf(b - 1.0),
    |a: f64, b: f64, d: f64| d * a.ln() * a.powf(b)
);

un_rule!(Exp, "Exponential.", f64::exp, |a: f64, d: f64| d * a.exp());
un_rule!(Log, "Natural logarithm.", f64::ln, |a: f64, d: f64| d / a);
un_rule!(Sin, "Sine.", f64::sin, |a: f64, d: f64| d * a.cos());
un_rule!(Cos, "Cosine.", f64::cos, |a: f64, d: f64| d * -a.sin());
un_rule!(
    Tan,
    "Tangent.",
    f64::tan,
    |a: f64, d: f64| d * (1.0 + a.tan().powi(2))
);
un_rule!(Neg, "Negation.", |a: f64| -a, |_a: f64, d: f64| -d);
un_rule!(Sqrt, "Square root.", f64::sqrt, |a: f64, d: f64| d * 0.5 / a.sqrt());
un_rule!(
    Abs,
    "Absolute value. The derivative at zero is taken as +1.",
    f64::abs,
    |a: f64, d: f64| if a >= 0.0 { d } else { -d }
);
