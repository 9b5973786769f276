//! Configuration schema for the integrator
//!
//! These values seed every newly discovered stream; live edits then go
//! through the typed parameter path. JSON import/export is provided for the
//! surrounding configuration surface.

use crate::stream_state::BandSlot;
use mbi_core::{IntegratorError, IntegratorResult};
use serde::{Deserialize, Serialize};

/// Rolling-window bounds in milliseconds
pub const MIN_WINDOW_MS: i32 = 10;
pub const MAX_WINDOW_MS: i32 = 5000;
/// Band cutoff bounds in Hz
pub const MIN_CUTOFF_HZ: f32 = 0.1;
pub const MAX_CUTOFF_HZ: f32 = 100.0;
/// Band gain bounds
pub const MIN_GAIN: f32 = -10.0;
pub const MAX_GAIN: f32 = 10.0;

/// Default scratch capacity in samples per lane
pub const DEFAULT_BLOCK_CAPACITY: usize = 10_000;

/// Cutoffs and gain for one frequency band
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandConfig {
    /// Low cutoff in Hz
    pub low_cut: f32,
    /// High cutoff in Hz
    pub high_cut: f32,
    /// Gain multiplier applied after filtering
    pub gain: f32,
}

impl BandConfig {
    pub fn new(low_cut: f32, high_cut: f32, gain: f32) -> Self {
        Self { low_cut, high_cut, gain }
    }

    fn validate(&self, slot: BandSlot) -> IntegratorResult<()> {
        for (name, value) in [("low cut", self.low_cut), ("high cut", self.high_cut)] {
            if !(MIN_CUTOFF_HZ..=MAX_CUTOFF_HZ).contains(&value) {
                return Err(IntegratorError::InvalidConfig {
                    reason: format!(
                        "{} band {} {}Hz outside [{}, {}]Hz",
                        slot, name, value, MIN_CUTOFF_HZ, MAX_CUTOFF_HZ
                    ),
                });
            }
        }

        if self.low_cut >= self.high_cut {
            return Err(IntegratorError::InvalidConfig {
                reason: format!(
                    "{} band low cut {}Hz must be below high cut {}Hz",
                    slot, self.low_cut, self.high_cut
                ),
            });
        }

        if !(MIN_GAIN..=MAX_GAIN).contains(&self.gain) {
            return Err(IntegratorError::InvalidConfig {
                reason: format!(
                    "{} band gain {} outside [{}, {}]",
                    slot, self.gain, MIN_GAIN, MAX_GAIN
                ),
            });
        }

        Ok(())
    }
}

/// Complete integrator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegratorConfig {
    /// Rolling window duration in milliseconds
    pub window_ms: i32,
    /// Band definitions, indexed by `BandSlot`
    pub bands: [BandConfig; 3],
    /// Scratch capacity in samples; blocks longer than this are rejected
    pub block_capacity: usize,
}

impl IntegratorConfig {
    /// Validate against the recognized parameter domains
    pub fn validate(&self) -> IntegratorResult<()> {
        if !(MIN_WINDOW_MS..=MAX_WINDOW_MS).contains(&self.window_ms) {
            return Err(IntegratorError::InvalidConfig {
                reason: format!(
                    "window of {}ms outside [{}, {}]ms",
                    self.window_ms, MIN_WINDOW_MS, MAX_WINDOW_MS
                ),
            });
        }

        for slot in BandSlot::ALL {
            self.bands[slot.index()].validate(slot)?;
        }

        if self.block_capacity == 0 {
            return Err(IntegratorError::InvalidConfig {
                reason: "block capacity must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    /// Band configuration for one slot
    pub fn band(&self, slot: BandSlot) -> &BandConfig {
        &self.bands[slot.index()]
    }

    /// Export configuration to JSON
    pub fn to_json(&self) -> IntegratorResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| IntegratorError::InvalidConfig {
            reason: format!("failed to serialize configuration: {}", e),
        })
    }

    /// Import configuration from JSON
    pub fn from_json(json: &str) -> IntegratorResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| IntegratorError::InvalidConfig {
                reason: format!("failed to deserialize configuration: {}", e),
            })?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for IntegratorConfig {
    /// Absence-seizure detection defaults: strong beta and alpha weighting,
    /// delta subtracted, one-second window
    fn default() -> Self {
        Self {
            window_ms: 1000,
            bands: [
                BandConfig::new(6.0, 9.0, 4.0),
                BandConfig::new(13.0, 18.0, 7.0),
                BandConfig::new(1.0, 4.0, -1.0),
            ],
            block_capacity: DEFAULT_BLOCK_CAPACITY,
        }
    }
}
