use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by the mirroring core.
///
/// Scanner, classifier, resolver and rewriter return these to their caller;
/// only the crawl driver decides which ones are fatal.
#[derive(Debug, Error)]
pub enum Error {
    /// URL cannot be split into scheme and remainder
    #[error("invalid url: {0}")]
    MalformedUrl(String),

    /// URL failed to parse at all
    #[error("url parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Two mirror paths share no root segment, so no relative path exists
    #[error("no common parent directory between {from} and {to}")]
    NoCommonAncestor { from: String, to: String },

    /// Splice start position falls beyond the buffer being rewritten
    #[error("splice position {pos} out of range for buffer of {len} bytes")]
    SpliceOutOfRange { pos: usize, len: usize },

    /// Attempt to write a file outside the configured download directory
    #[error("path {0:?} is outside the mirror root")]
    OutsideMirrorRoot(PathBuf),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("http status {status} for {url}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
