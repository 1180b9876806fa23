//! Error types surfaced by report generation.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::input::InputError;
use crate::markup::ParseError;

/// Convenience alias used throughout the crate.
pub type Result<T, E = ReportError> = std::result::Result<T, E>;

/// Everything that can stop a report from being written.
///
/// A missing or unreadable logo is not an error: it only drops
/// the image from the page headers.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The payload is not valid JSON.
    #[error("malformed JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    /// The payload is valid JSON but does not have the expected shape.
    #[error("invalid report data: {0}")]
    Input(#[from] InputError),

    /// The totals line uses markup outside the supported set.
    #[error("invalid totals markup: {0}")]
    Markup(#[from] ParseError),

    /// No usable font family could be loaded.
    #[error("failed to load fonts: {0}")]
    FontLoad(#[source] genpdf::error::Error),

    /// genpdf rejected the document while laying it out.
    #[error("failed to render PDF: {0}")]
    Render(#[source] genpdf::error::Error),

    /// The rendered document could not be written to disk.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        /// Destination that could not be written.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
}

impl ReportError {
    /// Returns whether the error stems from the caller's input rather than
    /// from rendering or the filesystem.
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::Json(_) | Self::Input(_) | Self::Markup(_))
    }
}
