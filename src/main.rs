// src/main.rs
//
// Sanity run: one block through a stereo processor, then buffer stats.

use noisebridge::{AudioBuffer, NoiseProcessor, ProcessError, ProcessorConfig};

/// ===============================
/// Main
/// ===============================

fn main() -> Result<(), ProcessError> {
    let config = ProcessorConfig {
        noise_level: 0.01,
        ..ProcessorConfig::default()
    };
    let block_frames = 1024;
    let channels = config.channels as usize;

    let mut processor = NoiseProcessor::from_config(&config);

    println!(
        "Starting noise sanity test: {} Hz, {} channels, level {}",
        processor.sample_rate(),
        processor.channel_count(),
        processor.noise_level()
    );

    let mut in_data = vec![0.0f32; channels * block_frames];
    let mut out_data = vec![0.0f32; channels * block_frames];

    for block in 0..4 {
        let level = config.noise_level * (block + 1) as f32;
        let input = AudioBuffer::new(&mut in_data, channels);
        let mut output = AudioBuffer::new(&mut out_data, channels);

        let summary = processor.process_planar(&input, &mut output, level)?;

        for ch in 0..output.channels {
            let samples = output.channel(ch);
            let min = samples.iter().copied().fold(f32::INFINITY, f32::min);
            let max = samples.iter().copied().fold(f32::NEG_INFINITY, f32::max);
            println!(
                "--- Block {} ch {} --- level={} min={} max={}",
                block, ch, level, min, max
            );
        }
        println!(
            "Processed block {} ({} channels, peak {})",
            block, summary.channels_written, summary.peak
        );
    }

    println!("Sanity test completed.");
    Ok(())
}
