//! MBI-DSP: streaming multi-band envelope extraction
//!
//! Combines up to three independently filtered frequency bands into a
//! weighted composite and smooths its sample-to-sample variability with a
//! rolling average, producing a power signal for spectrally structured
//! events such as absence-like seizures.

pub mod bandpass;
pub mod config;
pub mod integrator;
pub mod params;
pub mod rolling;
pub mod stream_state;

pub use bandpass::{BandpassFilter, FILTER_ORDER};
pub use config::{BandConfig, IntegratorConfig};
pub use integrator::MultiBandIntegrator;
pub use params::{ApplyOutcome, Parameter};
pub use rolling::RollingAverage;
pub use stream_state::{Band, BandSlot, StreamState};
