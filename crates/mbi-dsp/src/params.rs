//! Live parameter application
//!
//! Replaces the usual stringly-typed parameter dispatch with a tagged enum
//! and one exhaustive match, so the validation rules are directly
//! executable. Rejected edits leave every stored value and all filter state
//! untouched; rejection is reported as a value, never as an error.

use crate::config::{
    MAX_CUTOFF_HZ, MAX_GAIN, MAX_WINDOW_MS, MIN_CUTOFF_HZ, MIN_GAIN, MIN_WINDOW_MS,
};
use crate::stream_state::{window_samples, BandSlot, StreamState};
use tracing::debug;

/// A typed parameter edit for one stream
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Parameter {
    /// Select the local input channel, or `None` to disable the stream
    Channel(Option<usize>),
    /// Rolling window duration in milliseconds
    WindowMs(i32),
    /// Low cutoff of one band in Hz
    BandLow(BandSlot, f32),
    /// High cutoff of one band in Hz
    BandHigh(BandSlot, f32),
    /// Gain multiplier of one band
    BandGain(BandSlot, f32),
}

/// Result of applying a parameter edit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The edit took effect
    Applied,
    /// The edit would have violated `low < high`; previous values kept
    Rejected,
}

impl StreamState {
    /// Validate and apply one parameter edit at the stream's sample rate
    pub fn apply_parameter(&mut self, sample_rate: f32, param: Parameter) -> ApplyOutcome {
        match param {
            Parameter::Channel(channel) => {
                self.input_channel = channel;
                self.prev_composite = None;
                ApplyOutcome::Applied
            }

            Parameter::WindowMs(window_ms) => {
                let window_ms = window_ms.clamp(MIN_WINDOW_MS, MAX_WINDOW_MS);
                self.window_ms = window_ms;
                // Lossy: prior rolling history is discarded
                self.rolling
                    .set_size(window_samples(sample_rate, window_ms));
                self.prev_composite = None;
                debug!(window_ms, samples = self.rolling.len(), "rolling window resized");
                ApplyOutcome::Applied
            }

            Parameter::BandLow(slot, low_cut) => {
                let low_cut = low_cut.clamp(MIN_CUTOFF_HZ, MAX_CUTOFF_HZ);
                let band = self.band_mut(slot);

                if low_cut >= band.high_cut {
                    debug!(%slot, low_cut, high_cut = band.high_cut, "low cut edit rejected");
                    return ApplyOutcome::Rejected;
                }

                band.low_cut = low_cut;
                band.redesign(sample_rate);
                debug!(%slot, low_cut, "band filter redesigned");
                ApplyOutcome::Applied
            }

            Parameter::BandHigh(slot, high_cut) => {
                let high_cut = high_cut.clamp(MIN_CUTOFF_HZ, MAX_CUTOFF_HZ);
                let band = self.band_mut(slot);

                if high_cut <= band.low_cut {
                    debug!(%slot, high_cut, low_cut = band.low_cut, "high cut edit rejected");
                    return ApplyOutcome::Rejected;
                }

                band.high_cut = high_cut;
                band.redesign(sample_rate);
                debug!(%slot, high_cut, "band filter redesigned");
                ApplyOutcome::Applied
            }

            Parameter::BandGain(slot, gain) => {
                // Takes effect on the next processed sample; no redesign
                self.band_mut(slot).gain = gain.clamp(MIN_GAIN, MAX_GAIN);
                ApplyOutcome::Applied
            }
        }
    }
}
