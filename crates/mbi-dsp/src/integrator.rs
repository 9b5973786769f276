//! The per-block processing pipeline
//!
//! One `MultiBandIntegrator` owns a registry of per-stream state keyed by
//! stream id, plus a three-lane scratch buffer shared across streams. The
//! host drives it synchronously: `update_streams` on topology changes,
//! `set_parameter` between block callbacks, `process_block` once per
//! arriving block. `&mut self` on every entry point serializes the control
//! path against the processing path by construction.

use crate::config::IntegratorConfig;
use crate::params::{ApplyOutcome, Parameter};
use crate::stream_state::StreamState;
use mbi_core::{IntegratorError, IntegratorResult, SampleBlock, StreamId, StreamInfo};
use std::collections::HashMap;
use tracing::info;

/// Fixed multiplier bringing the envelope into a legible numeric range
const OUTPUT_GAIN: f32 = 10.0;

/// Per-block working storage: one lane per band
///
/// Sized once at configuration time; the processing path never reallocates.
#[derive(Debug)]
struct ScratchBuffer {
    lanes: [Vec<f32>; 3],
}

impl ScratchBuffer {
    fn new(capacity: usize) -> Self {
        Self {
            lanes: [
                vec![0.0; capacity],
                vec![0.0; capacity],
                vec![0.0; capacity],
            ],
        }
    }

    fn capacity(&self) -> usize {
        self.lanes[0].len()
    }
}

struct StreamEntry {
    info: StreamInfo,
    state: StreamState,
}

/// Streaming multi-band envelope extractor
pub struct MultiBandIntegrator {
    streams: HashMap<StreamId, StreamEntry>,
    scratch: ScratchBuffer,
    config: IntegratorConfig,
}

impl MultiBandIntegrator {
    /// Create an integrator; `config` seeds every stream discovered later
    pub fn new(config: IntegratorConfig) -> IntegratorResult<Self> {
        config.validate()?;

        Ok(MultiBandIntegrator {
            scratch: ScratchBuffer::new(config.block_capacity),
            streams: HashMap::new(),
            config,
        })
    }

    /// Create with default configuration
    pub fn with_defaults() -> Self {
        // Default config always validates
        Self::new(IntegratorConfig::default()).expect("default configuration is valid")
    }

    /// Sync the registry with the host's stream topology
    ///
    /// Creates state for newly seen streams, drops state for vanished ones,
    /// and re-derives every affected stream's filters and window length from
    /// its stored values. Existing parameter values survive; transient
    /// filter and rolling-buffer state does not.
    pub fn update_streams(&mut self, streams: &[StreamInfo]) {
        self.streams
            .retain(|id, _| streams.iter().any(|s| s.id == *id));

        for stream in streams {
            match self.streams.get_mut(&stream.id) {
                Some(entry) => {
                    entry.info = stream.clone();
                    entry.state.rebuild(stream.sample_rate);
                }
                None => {
                    info!(id = stream.id.0, sample_rate = stream.sample_rate, "stream discovered");
                    let mut state = StreamState::from_config(&self.config);
                    state.rebuild(stream.sample_rate);
                    self.streams.insert(
                        stream.id,
                        StreamEntry {
                            info: stream.clone(),
                            state,
                        },
                    );
                }
            }
        }
    }

    /// Apply one parameter edit to one stream
    ///
    /// Must not race a block callback; the exclusive borrow enforces that in
    /// safe code. Out-of-domain values are clamped, invalid cutoff pairs are
    /// rejected with `ApplyOutcome::Rejected`.
    pub fn set_parameter(
        &mut self,
        id: StreamId,
        param: Parameter,
    ) -> IntegratorResult<ApplyOutcome> {
        let entry = self
            .streams
            .get_mut(&id)
            .ok_or(IntegratorError::UnknownStream { id: id.0 })?;

        if let Parameter::Channel(Some(local_index)) = param {
            if local_index >= entry.info.channel_count {
                return Err(IntegratorError::ChannelOutOfBounds {
                    requested: local_index,
                    available: entry.info.channel_count,
                });
            }
        }

        Ok(entry.state.apply_parameter(entry.info.sample_rate, param))
    }

    /// Process one stream's samples for the current block, in place
    ///
    /// Disabled or channel-less streams are skipped silently. Otherwise the
    /// selected channel is overwritten with the envelope signal; no other
    /// channel of the block is touched.
    pub fn process_block(&mut self, id: StreamId, block: &mut SampleBlock) -> IntegratorResult<()> {
        let entry = self
            .streams
            .get_mut(&id)
            .ok_or(IntegratorError::UnknownStream { id: id.0 })?;

        if !entry.info.enabled {
            return Ok(());
        }

        let Some(local_index) = entry.state.input_channel else {
            return Ok(());
        };

        let num_samples = block.samples_per_channel();
        if num_samples == 0 {
            return Ok(());
        }

        if num_samples > self.scratch.capacity() {
            return Err(IntegratorError::BlockTooLarge {
                capacity: self.scratch.capacity(),
                requested: num_samples,
            });
        }

        let global_index = entry.info.global_channel(local_index)?;

        // Copy the input channel into all three lanes
        let input = block.channel(global_index)?;
        for lane in &mut self.scratch.lanes {
            lane[..num_samples].copy_from_slice(input);
        }

        // Filter and weight each band in its own lane
        for (band, lane) in entry.state.bands.iter_mut().zip(&mut self.scratch.lanes) {
            let lane = &mut lane[..num_samples];
            band.filter.process(lane);
            for sample in lane.iter_mut() {
                *sample *= band.gain;
            }
        }

        let [composite, output, third] = &mut self.scratch.lanes;

        // Sum the weighted bands into lane 0
        for i in 0..num_samples {
            composite[i] += output[i] + third[i];
        }

        // Envelope: rolling mean of absolute sample-to-sample differences.
        // Sample 0 carries the average from the previous block; the rolling
        // buffer is never reset at a block boundary, and the difference
        // across the boundary itself is fed from the remembered last
        // composite sample so a split block integrates the same history as
        // a whole one.
        let rolling = &mut entry.state.rolling;
        output[0] = rolling.calculate() as f32;
        if let Some(prev) = entry.state.prev_composite {
            rolling.add_sample(f64::from((composite[0] - prev).abs()));
        }
        for i in 0..num_samples - 1 {
            rolling.add_sample(f64::from((composite[i + 1] - composite[i]).abs()));
            output[i + 1] = rolling.calculate() as f32;
        }
        entry.state.prev_composite = Some(composite[num_samples - 1]);

        for sample in &mut output[..num_samples] {
            *sample *= OUTPUT_GAIN;
        }

        // Overwrite the input channel with the envelope
        block
            .channel_mut(global_index)?
            .copy_from_slice(&output[..num_samples]);

        Ok(())
    }

    /// Ids of all registered streams, in ascending order
    pub fn stream_ids(&self) -> Vec<StreamId> {
        let mut ids: Vec<StreamId> = self.streams.keys().copied().collect();
        ids.sort();
        ids
    }

    /// Processing state of one stream, if registered
    pub fn stream_state(&self, id: StreamId) -> Option<&StreamState> {
        self.streams.get(&id).map(|entry| &entry.state)
    }

    /// Seed configuration used for newly discovered streams
    pub fn config(&self) -> &IntegratorConfig {
        &self.config
    }
}
