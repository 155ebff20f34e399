use std::path::Path;
use std::process::Command;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Source metadata, queried once at startup.
#[derive(Clone, Copy, Debug)]
pub struct SourceInfo {
    pub width: u32,
    pub height: u32,
    /// Rounded integer frames per second. Zero when the container does
    /// not report a usable rate; the filter rejects that at setup.
    pub fps: u32,
    pub total_frames: u64,
}

#[derive(Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Deserialize)]
struct ProbeStream {
    width: u32,
    height: u32,
    #[serde(default)]
    r_frame_rate: Option<String>,
    #[serde(default)]
    avg_frame_rate: Option<String>,
    #[serde(default)]
    nb_frames: Option<String>,
    #[serde(default)]
    duration: Option<String>,
}

/// Runs ffprobe against the first video stream of `path`.
pub fn probe(path: &Path) -> Result<SourceInfo> {
    let unavailable = |reason: String| Error::SourceUnavailable {
        path: path.to_path_buf(),
        reason,
    };

    let output = Command::new("ffprobe")
        .args([
            "-v", "error",
            "-select_streams", "v:0",
            "-show_entries", "stream=width,height,r_frame_rate,avg_frame_rate,nb_frames,duration",
            "-of", "json",
        ])
        .arg(path)
        .output()
        .map_err(|e| unavailable(format!("failed to run ffprobe: {}. Is ffmpeg installed?", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(unavailable(format!("ffprobe failed: {}", stderr.trim())));
    }

    parse_info(&output.stdout).map_err(unavailable)
}

fn parse_info(json: &[u8]) -> std::result::Result<SourceInfo, String> {
    let probed: ProbeOutput =
        serde_json::from_slice(json).map_err(|e| format!("unreadable ffprobe output: {}", e))?;
    let stream = probed
        .streams
        .into_iter()
        .next()
        .ok_or_else(|| "no video stream found".to_string())?;

    let fps = stream
        .r_frame_rate
        .as_deref()
        .and_then(parse_rate)
        .or_else(|| stream.avg_frame_rate.as_deref().and_then(parse_rate))
        .unwrap_or(0);

    // Some containers omit nb_frames; estimate from the stream duration.
    let total_frames = stream
        .nb_frames
        .as_deref()
        .and_then(|s| s.parse::<u64>().ok())
        .or_else(|| {
            let secs = stream.duration.as_deref()?.parse::<f64>().ok()?;
            Some((secs * fps as f64).round() as u64)
        })
        .unwrap_or(0);

    Ok(SourceInfo {
        width: stream.width,
        height: stream.height,
        fps,
        total_frames,
    })
}

/// Parses a rational rate like "30000/1001" to a rounded integer fps.
fn parse_rate(rate: &str) -> Option<u32> {
    let (num, den) = rate.split_once('/')?;
    let num: f64 = num.parse().ok()?;
    let den: f64 = den.parse().ok()?;
    if den == 0.0 || num <= 0.0 {
        return None;
    }
    Some((num / den).round() as u32)
}
