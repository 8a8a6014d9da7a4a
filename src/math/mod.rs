//! Mathematical utilities: interval clamping and quasi-steady-state helpers.

pub mod bounds;
pub mod steady_state;

pub use bounds::*;
pub use steady_state::*;

