pub mod buffer;
pub mod spectral;

use crate::error::{Error, Result};
use crate::frame::GrayFrame;
use crate::video::probe::SourceInfo;

use buffer::FrameBuffer;

/// Sliding-window dominant-frequency filter.
///
/// Consumes grayscale frames one at a time. During warm-up (fewer than
/// `window_frames` frames seen) nothing is emitted; once the window is
/// full, every pushed frame advances the window by one and yields exactly
/// one output frame, so an input of length n produces
/// n - (window_frames - 1) outputs.
#[derive(Debug)]
pub struct WindowFilter {
    window_frames: usize,
    buffer: FrameBuffer,
    width: u32,
    height: u32,
}

impl WindowFilter {
    /// Derives `window_frames = round(window_seconds * fps)` and validates
    /// it against the source before any frame is consumed.
    pub fn new(info: &SourceInfo, window_seconds: f32) -> Result<Self> {
        if info.fps == 0 {
            return Err(Error::Configuration(
                "source reports a zero frame rate".into(),
            ));
        }

        let window_frames = (window_seconds * info.fps as f32).round() as usize;
        if window_frames < 2 {
            return Err(Error::Configuration(format!(
                "window of {:.2}s at {}fps spans {} frame(s); need at least 2 \
                 for a non-DC frequency bin",
                window_seconds, info.fps, window_frames
            )));
        }
        if window_frames as u64 > info.total_frames {
            return Err(Error::Configuration(format!(
                "window of {} frames exceeds stream length of {} frames; \
                 no window would ever fill",
                window_frames, info.total_frames
            )));
        }

        Ok(Self {
            window_frames,
            buffer: FrameBuffer::new(window_frames),
            width: info.width,
            height: info.height,
        })
    }

    pub fn window_frames(&self) -> usize {
        self.window_frames
    }

    /// Appends a frame; returns the spectral output frame once the window
    /// is full, `None` during warm-up.
    pub fn push(&mut self, frame: GrayFrame) -> Option<GrayFrame> {
        debug_assert_eq!(frame.width, self.width);
        debug_assert_eq!(frame.height, self.height);

        self.buffer.push(frame);
        debug_assert!(self.buffer.len() <= self.window_frames);
        if !self.buffer.is_full() {
            return None;
        }

        let planes = self.buffer.planes();
        Some(spectral::analyze_window(&planes, self.width, self.height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(width: u32, height: u32, fps: u32, total_frames: u64) -> SourceInfo {
        SourceInfo {
            width,
            height,
            fps,
            total_frames,
        }
    }

    fn textured_frame(width: u32, height: u32, step: usize) -> GrayFrame {
        let data = (0..(width * height) as usize)
            .map(|i| ((i * 13 + step * 7) % 251) as u8)
            .collect();
        GrayFrame::new(width, height, data)
    }

    #[test]
    fn window_exactly_stream_length_yields_one_frame() {
        // 2s window at 5fps over a 10-frame stream: one output, computed
        // from all ten inputs.
        let mut filter = WindowFilter::new(&info(4, 4, 5, 10), 2.0).unwrap();
        assert_eq!(filter.window_frames(), 10);

        let mut outputs = 0;
        for step in 0..10 {
            if filter.push(textured_frame(4, 4, step)).is_some() {
                outputs += 1;
            }
        }
        assert_eq!(outputs, 1);
    }

    #[test]
    fn output_count_is_input_minus_warmup() {
        let mut filter = WindowFilter::new(&info(3, 2, 2, 12), 2.0).unwrap();
        assert_eq!(filter.window_frames(), 4);

        let outputs: Vec<_> = (0..12)
            .filter_map(|step| filter.push(textured_frame(3, 2, step)))
            .collect();
        assert_eq!(outputs.len(), 12 - (4 - 1));
        for out in &outputs {
            assert_eq!((out.width, out.height), (3, 2));
            assert_eq!(out.data.len(), 6);
        }
    }

    #[test]
    fn stream_shorter_than_window_is_a_configuration_error() {
        let err = WindowFilter::new(&info(4, 4, 5, 8), 2.0).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn zero_fps_is_a_configuration_error() {
        let err = WindowFilter::new(&info(4, 4, 0, 100), 2.0).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn sub_two_frame_window_is_a_configuration_error() {
        let err = WindowFilter::new(&info(4, 4, 1, 100), 1.0).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn identical_runs_are_byte_identical() {
        let run = || -> Vec<Vec<u8>> {
            let mut filter = WindowFilter::new(&info(5, 3, 3, 9), 2.0).unwrap();
            (0..9)
                .filter_map(|step| filter.push(textured_frame(5, 3, step)))
                .map(|f| f.data)
                .collect()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn constant_stream_emits_uniform_frames() {
        let mut filter = WindowFilter::new(&info(4, 2, 2, 6), 2.0).unwrap();
        let flat = GrayFrame::new(4, 2, vec![99u8; 8]);
        let outputs: Vec<_> = (0..6).filter_map(|_| filter.push(flat.clone())).collect();
        assert_eq!(outputs.len(), 3);
        for out in outputs {
            assert_eq!(out.data, vec![0u8; 8]);
        }
    }
}
