// src/audio_buffer.rs

/// Planar multi-channel view over one contiguous slice.
#[derive(Debug)]
pub struct AudioBuffer<'a> {
    pub channels: usize,
    pub frames: usize,
    pub data: &'a mut [f32], // planar: all of ch0, then all of ch1, ...
}

impl<'a> AudioBuffer<'a> {
    /// Create a new AudioBuffer wrapping existing data.
    ///
    /// Trailing samples that do not fill a whole frame are ignored.
    /// Zero channels yields a buffer with zero frames.
    #[inline]
    pub fn new(data: &'a mut [f32], channels: usize) -> Self {
        let frames = if channels == 0 {
            0
        } else {
            data.len() / channels
        };
        Self {
            channels,
            frames,
            data,
        }
    }

    #[inline]
    pub fn channel(&self, ch: usize) -> &[f32] {
        let start = ch * self.frames;
        &self.data[start..start + self.frames]
    }

    /// Borrow every channel at once, one slice per channel.
    pub fn split_channels_mut(&mut self) -> Vec<&mut [f32]> {
        if self.frames == 0 {
            return (0..self.channels).map(|_| Default::default()).collect();
        }
        self.data[..self.channels * self.frames]
            .chunks_exact_mut(self.frames)
            .collect()
    }

    /// Get direct access to the planar sample data.
    #[inline]
    pub fn samples(&self) -> &[f32] {
        self.data
    }
}
