use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "flickerscope", about = "Per-pixel temporal dominant-frequency video filter")]
pub struct Cli {
    /// Input video file
    pub input: PathBuf,

    /// Output video file
    #[arg(short, long, default_value = "output.mp4")]
    pub output: PathBuf,

    /// Sliding window length in seconds
    #[arg(short, long, default_value_t = 2.0)]
    pub window_seconds: f32,

    /// H.264 CRF quality (0-51, lower = better). Ignored when --bitrate is set.
    #[arg(long, default_value_t = 18)]
    pub crf: u32,

    /// Video bitrate (e.g. 2400k, 5M). When set, uses -b:v instead of -crf.
    #[arg(short, long)]
    pub bitrate: Option<String>,

    /// FFmpeg video codec
    #[arg(long, default_value = "libx264")]
    pub codec: String,

    /// FFmpeg pixel format for the encoded output
    #[arg(long, default_value = "yuv420p")]
    pub pix_fmt: String,

    /// Config file path (defaults to flickerscope.toml or the user config dir)
    #[arg(long)]
    pub config: Option<PathBuf>,
}
