//! Stream identity and topology snapshots
//!
//! A stream is a host-managed group of channels sharing one sample rate. The
//! host hands the integrator a topology snapshot per stream; the integrator
//! never inspects the host's registry directly.

use crate::error::{IntegratorError, IntegratorResult};
use core::fmt;
use serde::{Deserialize, Serialize};

/// Host-assigned 16-bit stream identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StreamId(pub u16);

impl fmt::Display for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stream {}", self.0)
    }
}

impl From<u16> for StreamId {
    fn from(id: u16) -> Self {
        StreamId(id)
    }
}

/// Per-stream topology as delivered by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamInfo {
    /// Stream identifier
    pub id: StreamId,
    /// Sampling rate in Hz
    pub sample_rate: f32,
    /// Number of channels belonging to this stream
    pub channel_count: usize,
    /// Global index of this stream's first channel in the shared block
    pub channel_offset: usize,
    /// Whether the host currently delivers data for this stream
    pub enabled: bool,
}

impl StreamInfo {
    /// Create a validated stream description
    pub fn new(
        id: StreamId,
        sample_rate: f32,
        channel_count: usize,
        channel_offset: usize,
    ) -> IntegratorResult<Self> {
        if sample_rate <= 0.0 {
            return Err(IntegratorError::InvalidStream {
                reason: format!("sample rate must be positive, got {}", sample_rate),
            });
        }

        if channel_count == 0 {
            return Err(IntegratorError::InvalidStream {
                reason: "stream must have at least one channel".to_string(),
            });
        }

        Ok(StreamInfo {
            id,
            sample_rate,
            channel_count,
            channel_offset,
            enabled: true,
        })
    }

    /// Map a local channel index to the global index in the shared block
    pub fn global_channel(&self, local_index: usize) -> IntegratorResult<usize> {
        if local_index >= self.channel_count {
            return Err(IntegratorError::ChannelOutOfBounds {
                requested: local_index,
                available: self.channel_count,
            });
        }

        Ok(self.channel_offset + local_index)
    }
}
