//! Model implementations: proxy mapping and the core equations.
//!
//! Both are small, pure functions over plain values so the pipeline can compose
//! them without shared state.

pub mod equations;
pub mod proxy;

pub use equations::*;
pub use proxy::*;

