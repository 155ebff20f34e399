use std::io::Read;
use std::path::Path;
use std::process::{Child, ChildStdout, Command, Stdio};

use crate::error::{Error, Result};
use crate::video::probe::SourceInfo;

/// Sequential frame reader backed by an ffmpeg rawvideo pipe.
///
/// Frames arrive as packed rgb24 at the source's native dimensions. End
/// of stream is signalled by returning `None`; a failed or truncated
/// read mid-stream also ends the stream (with a warning) rather than
/// erroring, so output already written downstream is preserved.
pub struct VideoSource {
    child: Child,
    stdout: ChildStdout,
    frame_len: usize,
    finished: bool,
}

impl VideoSource {
    pub fn open(path: &Path, info: &SourceInfo) -> Result<Self> {
        let mut child = Command::new("ffmpeg")
            .args(["-v", "error", "-i"])
            .arg(path)
            .args(["-f", "rawvideo", "-pix_fmt", "rgb24", "pipe:1"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| Error::SourceUnavailable {
                path: path.to_path_buf(),
                reason: format!("failed to spawn ffmpeg: {}. Is ffmpeg installed?", e),
            })?;

        let stdout = child.stdout.take().ok_or_else(|| Error::SourceUnavailable {
            path: path.to_path_buf(),
            reason: "ffmpeg stdout not available".into(),
        })?;

        log::info!(
            "Decoder started: {}x{} rgb24, {} frames expected",
            info.width, info.height, info.total_frames
        );

        Ok(Self {
            child,
            stdout,
            frame_len: (info.width * info.height * 3) as usize,
            finished: false,
        })
    }

    /// Reads the next rgb24 frame, or `None` once the stream ends.
    pub fn next_frame(&mut self) -> Option<Vec<u8>> {
        if self.finished {
            return None;
        }

        let mut buf = vec![0u8; self.frame_len];
        let mut filled = 0;
        while filled < self.frame_len {
            match self.stdout.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) => {
                    log::warn!("Read error mid-stream, treating as end of stream: {}", e);
                    break;
                }
            }
        }

        if filled < self.frame_len {
            if filled > 0 {
                log::warn!("Discarding truncated final frame ({}/{} bytes)", filled, self.frame_len);
            }
            self.finished = true;
            let _ = self.child.wait();
            return None;
        }

        Some(buf)
    }
}

impl Drop for VideoSource {
    fn drop(&mut self) {
        if !self.finished {
            let _ = self.child.kill();
        }
        let _ = self.child.wait();
    }
}
