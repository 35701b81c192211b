//! Ranking and digest algorithms

pub mod digest;
pub mod ranking;

pub use digest::report_data;
pub use ranking::{rank, Ranking};
