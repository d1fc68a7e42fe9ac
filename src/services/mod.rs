//! Service implementations for the Discovery Engine API.

pub mod answer;

pub use answer::*;
