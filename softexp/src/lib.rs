//! Range-reduced quadratic approximation of `exp(x)` for softmax, and the
//! harness that measures it against `f64::exp`.

pub mod constants;
pub mod error;
pub mod harness;
pub mod kernel;
pub mod sweep;

pub use constants::FitConstants;
pub use error::{Error, Result};
pub use harness::{relative_error_pct, Harness, Record, Summary};
pub use kernel::{exp_poly, ExpPoly};
pub use sweep::Sweep;
