//! WebAssembly bindings via wasm-bindgen for browser integration.
//!
//! This module is only compiled when the `web` feature is enabled.
//!
//! # Usage
//!
//! Build with wasm-pack:
//! ```bash
//! wasm-pack build --target web --features web
//! ```
//!
//! # JavaScript Example
//!
//! ```javascript
//! import init, { noisebridge_init, NoiseProcessor } from './noisebridge.js';
//!
//! await init();
//! noisebridge_init();
//!
//! // wasm32 has no wall clock, so the seed comes from JS.
//! const processor = new NoiseProcessor(48000, 2, Date.now());
//!
//! // Planar buffers: all of channel 0, then all of channel 1.
//! const input = new Float32Array(2 * 128);
//! const output = new Float32Array(2 * 128);
//! processor.process(input, output, 128, 0.05);
//! processor.free();
//! ```

use wasm_bindgen::prelude::*;

use crate::audio_buffer::AudioBuffer;
use crate::noise::ClockSeeded;
use crate::processor::NoiseProcessor;

// ═══════════════════════════════════════════════════════════════════════════
// Initialization
// ═══════════════════════════════════════════════════════════════════════════

/// Initialize the wasm module. Call this once before using any other functions.
/// Sets up panic hooks and console logging.
#[wasm_bindgen]
pub fn noisebridge_init() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Debug).ok();
}

// ═══════════════════════════════════════════════════════════════════════════
// Processor
// ═══════════════════════════════════════════════════════════════════════════

/// Noise processor over planar `Float32Array` buffers.
#[wasm_bindgen(js_name = NoiseProcessor)]
pub struct WasmNoiseProcessor {
    inner: NoiseProcessor,
}

#[wasm_bindgen(js_class = NoiseProcessor)]
impl WasmNoiseProcessor {
    /// Create a processor. `seed` seeds the random source (e.g. `Date.now()`).
    #[wasm_bindgen(constructor)]
    pub fn new(sample_rate: i32, channels: i32, seed: f64) -> WasmNoiseProcessor {
        Self {
            inner: NoiseProcessor::with_source(
                sample_rate,
                channels,
                ClockSeeded::with_seed(seed as u64),
            ),
        }
    }

    /// Overwrite `frames` samples of every channel in `output` with noise.
    ///
    /// Both buffers are planar with `channel_count` channels; `input` is
    /// never read. Returns `false` if either buffer is too small.
    pub fn process(
        &mut self,
        input: &[f32],
        output: &mut [f32],
        frames: u32,
        noise_level: f32,
    ) -> bool {
        let channels = self.inner.active_channels();
        let frames = frames as usize;

        let needed = match channels.checked_mul(frames) {
            Some(n) if input.len() >= n && output.len() >= n => n,
            needed => {
                self.inner.set_noise_level(noise_level);
                log::warn!(
                    "process: buffers hold {}/{} samples, {} channels x {} frames needed (total {:?})",
                    input.len(),
                    output.len(),
                    channels,
                    frames,
                    needed
                );
                return false;
            }
        };

        let inputs: Vec<Option<&[f32]>> = (0..channels)
            .map(|ch| Some(&input[ch * frames..(ch + 1) * frames]))
            .collect();
        let mut output = AudioBuffer::new(&mut output[..needed], channels);
        let mut outputs: Vec<Option<&mut [f32]>> =
            output.split_channels_mut().into_iter().map(Some).collect();

        match self.inner.process(&inputs, &mut outputs, frames, noise_level) {
            Ok(_) => true,
            Err(e) => {
                log::warn!("process: {}", e);
                false
            }
        }
    }

    #[wasm_bindgen(getter)]
    pub fn noise_level(&self) -> f32 {
        self.inner.noise_level()
    }

    #[wasm_bindgen(setter)]
    pub fn set_noise_level(&mut self, level: f32) {
        self.inner.set_noise_level(level);
    }

    #[wasm_bindgen(getter)]
    pub fn sample_rate(&self) -> i32 {
        self.inner.sample_rate()
    }

    #[wasm_bindgen(getter)]
    pub fn channel_count(&self) -> i32 {
        self.inner.channel_count()
    }

    /// Peak absolute sample of the last `process` call.
    #[wasm_bindgen(getter)]
    pub fn last_peak(&self) -> f32 {
        self.inner.last_peak()
    }
}
