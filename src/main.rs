mod cli;
mod config;
mod error;
mod filter;
mod frame;
mod video;

use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};

use cli::Cli;
use filter::WindowFilter;
use frame::GrayFrame;
use video::decode::VideoSource;
use video::encode::FfmpegEncoder;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let mut cli = Cli::parse();

    // Load config: explicit --config path, or auto-detect flickerscope.toml / global config
    let config_path = cli.config.clone().or_else(|| {
        let local = std::path::PathBuf::from("flickerscope.toml");
        if local.exists() {
            return Some(local);
        }
        if let Some(home) = dirs::home_dir() {
            let xdg = home.join(".config").join("flickerscope").join("config.toml");
            if xdg.exists() {
                return Some(xdg);
            }
        }
        if let Some(config_dir) = dirs::config_dir() {
            let platform = config_dir.join("flickerscope").join("config.toml");
            if platform.exists() {
                return Some(platform);
            }
        }
        None
    });
    if let Some(ref path) = config_path {
        if let Some(cfg) = config::load_config(path) {
            log::info!("Loaded config from {}", path.display());
            // Merge: config values apply only when CLI is at its default
            if cli.window_seconds == 2.0 { cli.window_seconds = cfg.filter.window_seconds; }
            if cli.crf == 18 { cli.crf = cfg.output.crf; }
            if cli.codec == "libx264" { cli.codec = cfg.output.codec; }
            if cli.pix_fmt == "yuv420p" { cli.pix_fmt = cfg.output.pix_fmt; }
        } else {
            log::warn!("Failed to load config from {}", path.display());
        }
    }

    if !cli.input.exists() {
        anyhow::bail!("Input file not found: {}", cli.input.display());
    }

    log::info!("flickerscope - temporal dominant-frequency video filter");
    log::info!("Input: {}", cli.input.display());
    log::info!("Output: {}", cli.output.display());

    // 1. Probe the source
    let info = video::probe::probe(&cli.input)?;
    log::info!(
        "Source: {}x{} @ {}fps, {} frames",
        info.width, info.height, info.fps, info.total_frames
    );

    // 2. Validate the window before reading any frame
    let mut filter = WindowFilter::new(&info, cli.window_seconds)?;
    log::info!(
        "Window: {:.2}s = {} frames, sliding by 1",
        cli.window_seconds,
        filter.window_frames()
    );

    // 3. Open decoder and encoder
    let mut source = VideoSource::open(&cli.input, &info)?;
    let mut encoder = FfmpegEncoder::new(
        &cli.output,
        info.width,
        info.height,
        info.fps,
        &cli.codec,
        &cli.pix_fmt,
        cli.crf,
        cli.bitrate.as_deref(),
    )?;

    // 4. Sequential pipeline loop: read, gray, push, maybe emit
    let pb = ProgressBar::new(info.total_frames);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} frames ({eta} remaining)")
            .unwrap()
            .progress_chars("=>-"),
    );

    let mut frames_read = 0u64;
    let mut frames_written = 0u64;
    while let Some(rgb) = source.next_frame() {
        let gray = GrayFrame::from_rgb24(info.width, info.height, &rgb);
        if let Some(out) = filter.push(gray) {
            encoder.write_frame(&out.data)?;
            frames_written += 1;
        }
        frames_read += 1;
        pb.set_position(frames_read);
    }

    pb.finish_with_message("Processing complete");

    // 5. Finish encoding
    log::info!("Finishing encoding...");
    encoder.finish()?;

    log::info!(
        "Done! Read {} frames, wrote {} frames to {}",
        frames_read,
        frames_written,
        cli.output.display()
    );
    Ok(())
}
