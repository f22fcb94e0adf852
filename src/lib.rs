// src/lib.rs
//
// Library entry point for FFI consumers (iOS/Swift) and Rust callers.

mod audio_buffer;
mod config;
mod error;
mod noise;
mod processor;

pub mod ffi;

#[cfg(feature = "web")]
pub mod wasm;

// Re-export key types for Rust consumers
pub use audio_buffer::AudioBuffer;
pub use config::{DEFAULT_CHANNELS, DEFAULT_SAMPLE_RATE, ProcessorConfig};
pub use error::{ProcessError, ProcessResult};
pub use noise::{ClockSeeded, NoiseSource};
pub use processor::{NoiseProcessor, ProcessSummary};
