// C-compatible FFI bindings for Swift/iOS integration.
//
// Safety requirements:
// - Handles must be created by this module and not fabricated
// - Every non-null output channel pointer must have space for `frames` floats
// - Channel arrays must hold at least as many entries as the processor's
//   channel count
// - Caller must call `destroyAudioProcessor` exactly once for each create
//
// The five core entry points keep the symbol names of the host's bridging
// header; the rest use the crate's `noise_processor_` prefix.

use std::slice;

use crate::config::ProcessorConfig;
use crate::processor::NoiseProcessor;

use log::{debug, info};

// Logger subsystem identifier
#[cfg(feature = "ios")]
const LOG_SUBSYSTEM: &str = "com.noisebridge.processor";

// ═══════════════════════════════════════════════════════════════════════════
// Logger Initialization
// ═══════════════════════════════════════════════════════════════════════════

/// Initialize the oslog logger.
///
/// Call once at application startup. Output appears in Console.app and
/// Xcode's debug console. Repeated calls are ignored.
#[cfg(feature = "ios")]
#[unsafe(no_mangle)]
pub extern "C" fn noise_init_logger() {
    use log::LevelFilter;
    use oslog::OsLogger;

    OsLogger::new(LOG_SUBSYSTEM)
        .level_filter(LevelFilter::Debug)
        .init()
        .ok();
}

// ═══════════════════════════════════════════════════════════════════════════
// Opaque Handle Type
// ═══════════════════════════════════════════════════════════════════════════

/// Opaque handle to a NoiseProcessor.
pub struct NoiseProcessorHandle {
    inner: NoiseProcessor,
}

// ═══════════════════════════════════════════════════════════════════════════
// Creation / Destruction
// ═══════════════════════════════════════════════════════════════════════════

/// Create a new processor.
///
/// Never fails. The noise level starts at 0 and the random source is seeded
/// from the wall clock. Returns an opaque pointer that must be freed with
/// `destroyAudioProcessor`.
#[unsafe(export_name = "createAudioProcessor")]
pub extern "C" fn processor_create(sample_rate: i32, channels: i32) -> *mut NoiseProcessorHandle {
    Box::into_raw(Box::new(NoiseProcessorHandle {
        inner: NoiseProcessor::new(sample_rate, channels),
    }))
}

/// Get the default configuration values (48kHz, 2 channels, level 0).
#[unsafe(no_mangle)]
pub extern "C" fn noise_processor_default_config() -> ProcessorConfig {
    ProcessorConfig::default()
}

/// Create a new processor from a configuration.
///
/// A NULL `config` uses the defaults.
///
/// # Safety
/// `config` must be NULL or point to a valid `ProcessorConfig`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn noise_processor_create_with_config(
    config: *const ProcessorConfig,
) -> *mut NoiseProcessorHandle {
    let cfg = if config.is_null() {
        ProcessorConfig::default()
    } else {
        unsafe { std::ptr::read(config) }
    };

    Box::into_raw(Box::new(NoiseProcessorHandle {
        inner: NoiseProcessor::from_config(&cfg),
    }))
}

/// Destroy a processor.
///
/// # Safety
/// `processor` must be NULL or a pointer returned by a create function that
/// has not been destroyed yet.
#[unsafe(export_name = "destroyAudioProcessor")]
pub unsafe extern "C" fn processor_destroy(processor: *mut NoiseProcessorHandle) {
    if !processor.is_null() {
        unsafe { drop(Box::from_raw(processor)) };
        info!("destroyAudioProcessor: processor released");
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Processing
// ═══════════════════════════════════════════════════════════════════════════

/// Overwrite each output channel with `frames` samples of noise.
///
/// Parameters:
/// - `processor`: The processor handle
/// - `input`: Array of `channels` input pointers; entries may be NULL
/// - `output`: Array of `channels` output pointers; entries may be NULL
/// - `frames`: Samples per channel
/// - `noise_level`: Gain applied to the noise; also becomes the stored level
///
/// A channel whose input or output pointer is NULL is skipped and its output
/// left untouched. Input samples are never read. A NULL `input` or `output`
/// array skips every channel; `frames <= 0` writes nothing.
///
/// Returns 1 on success, 0 if `processor` is NULL.
///
/// # Safety
/// - `processor` must be NULL or a live handle
/// - Non-null arrays must hold at least `channels` entries
/// - Non-null output pointers must have space for `frames` floats
/// - Output pointers may repeat across channels; channels are written one
///   after another, so a shared buffer ends up holding the last channel
#[unsafe(export_name = "processAudio")]
pub unsafe extern "C" fn processor_process(
    processor: *mut NoiseProcessorHandle,
    input: *const *const f32,
    output: *const *mut f32,
    frames: i32,
    noise_level: f32,
) -> i32 {
    if processor.is_null() {
        debug!("processAudio: null processor");
        return 0;
    }

    let processor = unsafe { &mut (*processor).inner };
    let frames = frames.max(0) as usize;

    // Each output slice is created only when its channel is filled, so a
    // host passing the same pointer for two channels never yields two live
    // `&mut` views of one buffer.
    processor.process_each(frames, noise_level, |ch| {
        if input.is_null() || output.is_null() {
            return None;
        }
        let (in_ptr, out_ptr) = unsafe { (*input.add(ch), *output.add(ch)) };
        if in_ptr.is_null() || out_ptr.is_null() {
            None
        } else {
            Some(unsafe { slice::from_raw_parts_mut(out_ptr, frames) })
        }
    });

    1
}

// ═══════════════════════════════════════════════════════════════════════════
// Parameters / Readback
// ═══════════════════════════════════════════════════════════════════════════

/// Set the stored noise level. No-op on NULL.
#[unsafe(export_name = "setNoiseLevel")]
pub unsafe extern "C" fn processor_set_noise_level(
    processor: *mut NoiseProcessorHandle,
    noise_level: f32,
) {
    if processor.is_null() {
        return;
    }
    unsafe { (*processor).inner.set_noise_level(noise_level) };
}

/// Get the stored noise level, or 0.0 for NULL.
#[unsafe(export_name = "getNoiseLevel")]
pub unsafe extern "C" fn processor_get_noise_level(processor: *const NoiseProcessorHandle) -> f32 {
    if processor.is_null() {
        return 0.0;
    }
    unsafe { (*processor).inner.noise_level() }
}

/// Get the stored sample rate, or 0 for NULL.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn noise_processor_get_sample_rate(
    processor: *const NoiseProcessorHandle,
) -> i32 {
    if processor.is_null() {
        return 0;
    }
    unsafe { (*processor).inner.sample_rate() }
}

/// Get the stored channel count, or 0 for NULL.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn noise_processor_get_channel_count(
    processor: *const NoiseProcessorHandle,
) -> i32 {
    if processor.is_null() {
        return 0;
    }
    unsafe { (*processor).inner.channel_count() }
}

/// Get the peak absolute sample of the last `processAudio` call, or 0.0 for NULL.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn noise_processor_get_last_peak(
    processor: *const NoiseProcessorHandle,
) -> f32 {
    if processor.is_null() {
        return 0.0;
    }
    unsafe { (*processor).inner.last_peak() }
}
