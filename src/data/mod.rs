//! Synthetic sample generation.

mod generator;

pub use generator::{generate, generate_pair, Family, SampleSpec};
