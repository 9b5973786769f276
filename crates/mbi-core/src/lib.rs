//! MBI-Core: Foundation types for the multi-band integrator
//!
//! Stream identity, per-block sample storage, and error types shared by the
//! processing and simulation crates.

pub mod block;
pub mod error;
pub mod stream;

pub use block::*;
pub use error::{IntegratorError, IntegratorResult};
pub use stream::*;
