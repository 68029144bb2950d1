//! Reverse-mode automatic differentiation over scalar values.
//!
//! Arithmetic on [`Var`] is evaluated eagerly and recorded on a tape. Calling
//! [`Var::backward`] replays the tape in reverse and accumulates the partial
//! derivatives into every participating variable's gradient cell.
//!
//! ```
//! use rust_autograd::prelude::*;
//!
//! let a = Var::new(2.0);
//! let b = Var::new(3.0);
//! let c = &a * &b;
//! c.backward().unwrap();
//! assert_eq!((a.grad(), b.grad()), (3.0, 2.0));
//! ```

pub mod api;
pub mod errors;
pub mod functions;
pub mod history;
pub mod prelude;
pub mod rules;
pub mod tape;
pub mod var;
mod overloads;

pub use api::{grad, value_and_grad};
