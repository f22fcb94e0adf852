// src/config.rs
//
// Processor construction parameters shared by the Rust, C and wasm surfaces.

/// Default sample rate in Hz.
pub const DEFAULT_SAMPLE_RATE: i32 = 48_000;

/// Default channel count (stereo).
pub const DEFAULT_CHANNELS: i32 = 2;

/// Configuration for creating a processor.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessorConfig {
    /// Sample rate in Hz (e.g., 44100, 48000). Stored only.
    pub sample_rate: i32,
    /// Number of channels iterated by `process`.
    pub channels: i32,
    /// Initial noise level.
    pub noise_level: f32,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            channels: DEFAULT_CHANNELS,
            noise_level: 0.0,
        }
    }
}
