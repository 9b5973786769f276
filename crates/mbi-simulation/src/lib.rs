//! MBI-Simulation: deterministic biosignal generation for tests and demos

pub mod signal;

pub use signal::{GeneratorConfig, SignalGenerator, TestSignal};
