//! Track audio buffers and the bounded view handed to modules.
//!
//! An [`AudioBuffer`] stores `channels × block_size` samples channel-major in
//! one allocation. Modules never see the buffer itself: each call receives a
//! [`BlockMut`], a borrowed view limited to the frames of the current block.

/// Multichannel audio buffer owned by a [`Track`](crate::Track).
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    data: Vec<f32>,
    channels: usize,
    block_size: usize,
}

impl AudioBuffer {
    /// Allocates a zeroed buffer of `channels × block_size` samples.
    pub fn new(channels: usize, block_size: usize) -> Self {
        Self {
            data: vec![0.0; channels * block_size],
            channels,
            block_size,
        }
    }

    /// Number of channels.
    #[inline]
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Number of samples per channel.
    #[inline]
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Returns true if the buffer holds no samples.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the full-length samples of one channel.
    #[inline]
    pub fn channel(&self, channel: usize) -> Option<&[f32]> {
        if channel >= self.channels {
            return None;
        }
        let start = channel * self.block_size;
        self.data.get(start..start + self.block_size)
    }

    /// Returns the full-length samples of one channel, mutably.
    #[inline]
    pub fn channel_mut(&mut self, channel: usize) -> Option<&mut [f32]> {
        if channel >= self.channels {
            return None;
        }
        let start = channel * self.block_size;
        self.data.get_mut(start..start + self.block_size)
    }

    /// Fills every channel with zeros.
    pub fn clear(&mut self) {
        self.data.fill(0.0);
    }

    /// Zeroes the first `frames` samples of every channel.
    pub fn clear_frames(&mut self, frames: usize) {
        let frames = frames.min(self.block_size);
        for chunk in self.data.chunks_exact_mut(self.block_size.max(1)) {
            chunk[..frames].fill(0.0);
        }
    }

    /// Returns a view over the first `frames` samples of every channel.
    ///
    /// `frames` is clamped to the block size.
    #[inline]
    pub fn block_mut(&mut self, frames: usize) -> BlockMut<'_> {
        BlockMut {
            frames: frames.min(self.block_size),
            stride: self.block_size,
            channels: self.channels,
            data: &mut self.data,
        }
    }
}

/// Borrowed, bounded view of a track buffer for one processing call.
///
/// The view covers `channels()` channels of `frames()` samples each. Modules
/// transform it in place and must not keep it beyond the call.
#[derive(Debug)]
pub struct BlockMut<'a> {
    data: &'a mut [f32],
    stride: usize,
    channels: usize,
    frames: usize,
}

impl<'a> BlockMut<'a> {
    /// Wraps channel-major storage with the given stride (samples per channel).
    ///
    /// `frames` is clamped to `stride`; channels are limited to what `data` holds.
    pub fn new(data: &'a mut [f32], stride: usize, frames: usize) -> Self {
        let channels = if stride == 0 { 0 } else { data.len() / stride };
        Self {
            data,
            stride,
            channels,
            frames: frames.min(stride),
        }
    }

    /// Number of valid frames per channel in this block.
    #[inline]
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Number of channels in this block.
    #[inline]
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Returns the valid frames of one channel.
    #[inline]
    pub fn channel_mut(&mut self, channel: usize) -> Option<&mut [f32]> {
        if channel >= self.channels {
            return None;
        }
        let start = channel * self.stride;
        self.data.get_mut(start..start + self.frames)
    }

    /// Iterates over the valid frames of every channel.
    pub fn channels_mut(&mut self) -> impl Iterator<Item = &mut [f32]> + '_ {
        let frames = self.frames;
        self.data
            .chunks_exact_mut(self.stride.max(1))
            .take(self.channels)
            .map(move |chunk| &mut chunk[..frames])
    }

    /// Iterates over every valid sample of every channel.
    pub fn samples_mut(&mut self) -> impl Iterator<Item = &mut f32> + '_ {
        self.channels_mut().flat_map(|channel| channel.iter_mut())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_buffer_is_zeroed() {
        let buffer = AudioBuffer::new(2, 8);
        assert_eq!(buffer.channels(), 2);
        assert_eq!(buffer.block_size(), 8);
        assert!(buffer.channel(0).unwrap().iter().all(|&s| s == 0.0));
        assert!(buffer.channel(1).unwrap().iter().all(|&s| s == 0.0));
        assert!(buffer.channel(2).is_none());
    }

    #[test]
    fn channels_do_not_alias() {
        let mut buffer = AudioBuffer::new(2, 4);
        buffer.channel_mut(1).unwrap().fill(3.0);
        assert_eq!(buffer.channel(0).unwrap(), &[0.0; 4]);
        assert_eq!(buffer.channel(1).unwrap(), &[3.0; 4]);
    }

    #[test]
    fn clear_frames_leaves_tail() {
        let mut buffer = AudioBuffer::new(2, 4);
        buffer.channel_mut(0).unwrap().fill(1.0);
        buffer.channel_mut(1).unwrap().fill(1.0);
        buffer.clear_frames(2);
        assert_eq!(buffer.channel(0).unwrap(), &[0.0, 0.0, 1.0, 1.0]);
        assert_eq!(buffer.channel(1).unwrap(), &[0.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn block_view_is_bounded_to_frames() {
        let mut buffer = AudioBuffer::new(3, 8);
        {
            let mut block = buffer.block_mut(5);
            assert_eq!(block.frames(), 5);
            assert_eq!(block.channels(), 3);
            for sample in block.samples_mut() {
                *sample = 1.0;
            }
        }
        for ch in 0..3 {
            let samples = buffer.channel(ch).unwrap();
            assert_eq!(&samples[..5], &[1.0; 5]);
            assert_eq!(&samples[5..], &[0.0; 3]);
        }
    }

    #[test]
    fn block_view_clamps_frames() {
        let mut buffer = AudioBuffer::new(1, 4);
        let block = buffer.block_mut(100);
        assert_eq!(block.frames(), 4);
    }

    #[test]
    fn empty_buffer_yields_empty_view() {
        let mut buffer = AudioBuffer::new(2, 0);
        assert!(buffer.is_empty());
        let mut block = buffer.block_mut(16);
        assert_eq!(block.frames(), 0);
        assert_eq!(block.samples_mut().count(), 0);
    }

    #[test]
    fn block_from_raw_slice() {
        let mut data = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let mut block = BlockMut::new(&mut data, 3, 2);
        assert_eq!(block.channels(), 2);
        assert_eq!(block.channel_mut(1).unwrap().to_vec(), vec![4.0, 5.0]);
        assert!(block.channel_mut(2).is_none());
    }
}
