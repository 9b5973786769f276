//! Per-stream processing state
//!
//! Each stream owns three bands, one rolling average, and a channel
//! selection. The stored cutoffs/gains/window duration are authoritative:
//! `rebuild` re-derives filter coefficients and window length from them
//! whenever the stream's topology (sample rate) changes, while transient
//! filter state is discarded.

use crate::bandpass::BandpassFilter;
use crate::config::IntegratorConfig;
use crate::rolling::RollingAverage;
use core::fmt;
use serde::{Deserialize, Serialize};

/// The three fixed band slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BandSlot {
    Alpha,
    Beta,
    Delta,
}

impl BandSlot {
    /// All slots in lane order
    pub const ALL: [BandSlot; 3] = [BandSlot::Alpha, BandSlot::Beta, BandSlot::Delta];

    /// Scratch-lane / array index for this slot
    pub fn index(self) -> usize {
        match self {
            BandSlot::Alpha => 0,
            BandSlot::Beta => 1,
            BandSlot::Delta => 2,
        }
    }
}

impl fmt::Display for BandSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BandSlot::Alpha => write!(f, "alpha"),
            BandSlot::Beta => write!(f, "beta"),
            BandSlot::Delta => write!(f, "delta"),
        }
    }
}

/// One configured frequency band with its filter
#[derive(Debug, Clone)]
pub struct Band {
    /// Low cutoff in Hz; always strictly below `high_cut`
    pub low_cut: f32,
    /// High cutoff in Hz
    pub high_cut: f32,
    /// Gain multiplier applied after filtering
    pub gain: f32,
    /// The band's filter; state continuous across blocks
    pub filter: BandpassFilter,
}

impl Band {
    fn new(low_cut: f32, high_cut: f32, gain: f32) -> Self {
        Self {
            low_cut,
            high_cut,
            gain,
            filter: BandpassFilter::new(),
        }
    }

    /// Recompute filter coefficients from the stored cutoffs
    pub fn redesign(&mut self, sample_rate: f32) {
        self.filter.design(sample_rate, self.low_cut, self.high_cut);
    }
}

/// Processing state for one stream
#[derive(Debug, Clone)]
pub struct StreamState {
    /// The three bands, indexed by `BandSlot`
    pub bands: [Band; 3],
    /// Envelope integrator; never reset at block boundaries
    pub rolling: RollingAverage,
    /// Selected local channel index; `None` disables the stream
    pub input_channel: Option<usize>,
    /// Rolling window duration in milliseconds
    pub window_ms: i32,
    /// Last composite sample of the previous block, so the cross-boundary
    /// difference is not dropped; cleared whenever history is discarded
    pub prev_composite: Option<f32>,
}

impl StreamState {
    /// Create state seeded from the configuration; call `rebuild` with the
    /// stream's sample rate before processing
    pub fn from_config(config: &IntegratorConfig) -> Self {
        let bands = BandSlot::ALL.map(|slot| {
            let band = config.band(slot);
            Band::new(band.low_cut, band.high_cut, band.gain)
        });

        StreamState {
            bands,
            rolling: RollingAverage::new(1),
            input_channel: None,
            window_ms: config.window_ms,
            prev_composite: None,
        }
    }

    /// Re-derive all filters and the window length for a (new) sample rate
    ///
    /// Filter delay lines and rolling history are discarded; the stored
    /// cutoffs, gains, and window duration survive.
    pub fn rebuild(&mut self, sample_rate: f32) {
        for band in &mut self.bands {
            band.redesign(sample_rate);
        }
        self.rolling
            .set_size(window_samples(sample_rate, self.window_ms));
        self.prev_composite = None;
    }

    /// Band for one slot
    pub fn band(&self, slot: BandSlot) -> &Band {
        &self.bands[slot.index()]
    }

    /// Mutable band for one slot
    pub fn band_mut(&mut self, slot: BandSlot) -> &mut Band {
        &mut self.bands[slot.index()]
    }
}

/// Window duration in milliseconds to a sample count, minimum 1
pub fn window_samples(sample_rate: f32, window_ms: i32) -> usize {
    ((sample_rate * window_ms as f32 / 1000.0).round() as usize).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_indices() {
        assert_eq!(BandSlot::Alpha.index(), 0);
        assert_eq!(BandSlot::Beta.index(), 1);
        assert_eq!(BandSlot::Delta.index(), 2);
        for (i, slot) in BandSlot::ALL.iter().enumerate() {
            assert_eq!(slot.index(), i);
        }
    }

    #[test]
    fn test_from_config_defaults() {
        let state = StreamState::from_config(&IntegratorConfig::default());
        assert_eq!(state.band(BandSlot::Alpha).low_cut, 6.0);
        assert_eq!(state.band(BandSlot::Beta).gain, 7.0);
        assert_eq!(state.band(BandSlot::Delta).high_cut, 4.0);
        assert_eq!(state.window_ms, 1000);
        assert!(state.input_channel.is_none());
    }

    #[test]
    fn test_rebuild_sets_window_from_sample_rate() {
        let mut state = StreamState::from_config(&IntegratorConfig::default());
        state.rebuild(2000.0);
        assert_eq!(state.rolling.len(), 2000);

        state.rebuild(500.0);
        assert_eq!(state.rolling.len(), 500);
    }

    #[test]
    fn test_window_samples_rounds_and_clamps() {
        assert_eq!(window_samples(1000.0, 1000), 1000);
        assert_eq!(window_samples(30000.0, 10), 300);
        assert_eq!(window_samples(999.6, 10), 10);
        // Degenerate combination still yields a usable window
        assert_eq!(window_samples(10.0, 10), 1);
    }
}
