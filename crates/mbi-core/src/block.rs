//! SampleBlock: per-block mutable sample storage
//!
//! Channel-major layout so the processing path can take an in-place mutable
//! slice of one channel. Channels are addressed by global index across all
//! streams, matching the host's delivery model.

use crate::error::{IntegratorError, IntegratorResult};

/// One block of samples for every channel the host manages
#[derive(Debug, Clone)]
pub struct SampleBlock {
    /// Channel-major sample data (channel 0 first, then channel 1, ...)
    data: Vec<f32>,
    channel_count: usize,
    samples_per_channel: usize,
}

impl SampleBlock {
    /// Create a block from channel-major data
    pub fn new(data: Vec<f32>, channel_count: usize) -> IntegratorResult<Self> {
        if channel_count == 0 {
            return Err(IntegratorError::InvalidBlock {
                reason: "block must have at least one channel".to_string(),
            });
        }

        if data.len() % channel_count != 0 {
            return Err(IntegratorError::InvalidBlock {
                reason: format!(
                    "data length {} is not divisible by channel count {}",
                    data.len(),
                    channel_count
                ),
            });
        }

        let samples_per_channel = data.len() / channel_count;

        Ok(SampleBlock {
            data,
            channel_count,
            samples_per_channel,
        })
    }

    /// Create an all-zero block
    pub fn zeroed(channel_count: usize, samples_per_channel: usize) -> IntegratorResult<Self> {
        Self::new(vec![0.0; channel_count * samples_per_channel], channel_count)
    }

    /// Assemble a block from separate per-channel vectors
    pub fn from_channels(channels: Vec<Vec<f32>>) -> IntegratorResult<Self> {
        let channel_count = channels.len();
        let samples = channels.first().map(|c| c.len()).unwrap_or(0);

        for (i, channel) in channels.iter().enumerate() {
            if channel.len() != samples {
                return Err(IntegratorError::InvalidBlock {
                    reason: format!(
                        "channel {} has {} samples, expected {}",
                        i,
                        channel.len(),
                        samples
                    ),
                });
            }
        }

        let data = channels.into_iter().flatten().collect();
        Self::new(data, channel_count)
    }

    /// Number of channels in the block
    pub fn channel_count(&self) -> usize {
        self.channel_count
    }

    /// Number of samples per channel
    pub fn samples_per_channel(&self) -> usize {
        self.samples_per_channel
    }

    /// Read-only view of one channel
    pub fn channel(&self, index: usize) -> IntegratorResult<&[f32]> {
        self.check_channel(index)?;
        let start = index * self.samples_per_channel;
        Ok(&self.data[start..start + self.samples_per_channel])
    }

    /// Mutable view of one channel
    pub fn channel_mut(&mut self, index: usize) -> IntegratorResult<&mut [f32]> {
        self.check_channel(index)?;
        let start = index * self.samples_per_channel;
        Ok(&mut self.data[start..start + self.samples_per_channel])
    }

    fn check_channel(&self, index: usize) -> IntegratorResult<()> {
        if index >= self.channel_count {
            return Err(IntegratorError::ChannelOutOfBounds {
                requested: index,
                available: self.channel_count,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_creation() {
        let block = SampleBlock::new(vec![0.0; 64], 4).unwrap();
        assert_eq!(block.channel_count(), 4);
        assert_eq!(block.samples_per_channel(), 16);
    }

    #[test]
    fn test_ragged_data_rejected() {
        assert!(SampleBlock::new(vec![0.0; 63], 4).is_err());
        assert!(SampleBlock::new(vec![0.0; 16], 0).is_err());
    }

    #[test]
    fn test_channel_access() {
        let mut block = SampleBlock::from_channels(vec![
            vec![1.0, 2.0, 3.0],
            vec![4.0, 5.0, 6.0],
        ])
        .unwrap();

        assert_eq!(block.channel(0).unwrap(), &[1.0, 2.0, 3.0]);
        assert_eq!(block.channel(1).unwrap(), &[4.0, 5.0, 6.0]);

        block.channel_mut(1).unwrap()[0] = 9.0;
        assert_eq!(block.channel(1).unwrap()[0], 9.0);

        assert!(block.channel(2).is_err());
    }

    #[test]
    fn test_from_channels_ragged() {
        let result = SampleBlock::from_channels(vec![vec![1.0, 2.0], vec![3.0]]);
        assert!(result.is_err());
    }
}
