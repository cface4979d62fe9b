pub mod float_ext;
pub mod log_setup;
pub mod test_utils;

pub use float_ext::FloatExt;
pub use log_setup::setup_logging;

pub const EPSILON: f64 = 1e-6;
