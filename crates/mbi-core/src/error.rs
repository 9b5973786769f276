//! Error handling for the multi-band integrator
//!
//! Host-interface programming errors and configuration validation only;
//! streaming-path conditions (rejected edits, disabled streams) are values,
//! not errors.

use core::fmt;

/// Result type alias for integrator operations
pub type IntegratorResult<T> = Result<T, IntegratorError>;

/// Error type for integrator operations
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum IntegratorError {
    /// Operation addressed a stream id that is not in the registry
    UnknownStream {
        /// The unrecognized stream id
        id: u16,
    },

    /// Channel index outside the block's channel range
    ChannelOutOfBounds {
        /// Requested global channel index
        requested: usize,
        /// Number of channels available
        available: usize,
    },

    /// Block length exceeds the scratch capacity fixed at configuration time
    BlockTooLarge {
        /// Scratch capacity in samples
        capacity: usize,
        /// Samples in the offending block
        requested: usize,
    },

    /// Malformed sample block
    InvalidBlock {
        /// Description of the problem
        reason: String,
    },

    /// Invalid stream topology description
    InvalidStream {
        /// Description of the problem
        reason: String,
    },

    /// Configuration validation failure
    InvalidConfig {
        /// Description of the problem
        reason: String,
    },
}

impl fmt::Display for IntegratorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegratorError::UnknownStream { id } => {
                write!(f, "Unknown stream id: {}", id)
            }
            IntegratorError::ChannelOutOfBounds { requested, available } => {
                write!(f, "Channel index {} out of bounds ({} channels available)",
                       requested, available)
            }
            IntegratorError::BlockTooLarge { capacity, requested } => {
                write!(f, "Block of {} samples exceeds scratch capacity of {}",
                       requested, capacity)
            }
            IntegratorError::InvalidBlock { reason } => {
                write!(f, "Invalid sample block: {}", reason)
            }
            IntegratorError::InvalidStream { reason } => {
                write!(f, "Invalid stream description: {}", reason)
            }
            IntegratorError::InvalidConfig { reason } => {
                write!(f, "Invalid configuration: {}", reason)
            }
        }
    }
}

impl std::error::Error for IntegratorError {}
