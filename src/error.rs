// src/error.rs
//
// Errors reported by the safe processing API.

/// Error during buffer processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessError {
    /// An output channel cannot hold the requested number of frames.
    BufferTooShort {
        channel: usize,
        len: usize,
        frames: usize,
    },

    /// A planar buffer carries fewer channels than the processor iterates.
    ChannelMismatch { expected: usize, actual: usize },
}

impl std::fmt::Display for ProcessError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessError::BufferTooShort {
                channel,
                len,
                frames,
            } => {
                write!(
                    f,
                    "Channel {} holds {} samples, {} frames requested",
                    channel, len, frames
                )
            }
            ProcessError::ChannelMismatch { expected, actual } => {
                write!(f, "Expected {} channels, buffer has {}", expected, actual)
            }
        }
    }
}

impl std::error::Error for ProcessError {}

/// Result of a processing call.
pub type ProcessResult<T> = Result<T, ProcessError>;
