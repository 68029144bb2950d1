//! Closure-based entry points that run on a private tape.

use crate::errors::Result;
use crate::tape::Tape;
use crate::var::Var;

/// Evaluates `f` at `x` and returns `(f(x), ∇f(x))`.
///
/// The computation is recorded on a fresh tape that is active only for the
/// duration of the call, so it neither sees nor disturbs the caller's tape.
///
/// ```
/// let (v, g) = rust_autograd::value_and_grad(|x| &x[0] * &x[1], &[3.0, 4.0]).unwrap();
/// assert_eq!(v, 12.0);
/// assert_eq!(g, vec![4.0, 3.0]);
/// ```
pub fn value_and_grad(f: impl FnOnce(&[Var]) -> Var, x: &[f64]) -> Result<(f64, Vec<f64>)> {
    let tape = Tape::with_capacity(x.len() * 10);
    let _guard = tape.activate();

    let inputs: Vec<Var> = x.iter().map(|&v| Var::new(v)).collect();
    let output = f(&inputs);
    output.backward()?;

    Ok((output.value(), inputs.iter().map(Var::grad).collect()))
}

/// Gradient of a scalar function `f : R^n → R` at `x`.
///
/// ```
/// let g = rust_autograd::grad(|x| &x[0] * &x[0] + &x[1] * &x[1], &[3.0, 4.0]).unwrap();
/// assert!((g[0] - 6.0).abs() < 1e-10);
/// assert!((g[1] - 8.0).abs() < 1e-10);
/// ```
pub fn grad(f: impl FnOnce(&[Var]) -> Var, x: &[f64]) -> Result<Vec<f64>> {
    value_and_grad(f, x).map(|(_, g)| g)
}
