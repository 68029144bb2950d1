pub use crate::errors::{ADError, Result};
pub use crate::functions::{abs, cos, exp, log, pow, sin, sqrt, tan};
pub use crate::tape::{clear_gradient_tape, Tape, TapeGuard};
pub use crate::var::Var;
