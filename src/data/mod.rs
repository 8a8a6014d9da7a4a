//! Synthetic inputs derived from a base case (sensitivity sweeps).

pub mod perturb;

pub use perturb::*;
