use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors raised before or while setting up the pipeline.
///
/// Degenerate analysis windows are handled locally (uniform output plus a
/// warning) and end-of-stream is never an error, so neither appears here.
#[derive(Debug, Error)]
pub enum Error {
    /// The source could not be opened or probed at all. No retry.
    #[error("cannot open video source {path}: {reason}")]
    SourceUnavailable { path: PathBuf, reason: String },

    /// Invalid frame rate, or a window length the stream can never fill.
    /// Raised before any frame is consumed.
    #[error("invalid configuration: {0}")]
    Configuration(String),
}

pub type Result<T> = std::result::Result<T, Error>;
