//! Options controlling how a report is laid out and which resources it uses.

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

/// Number of movement rows printed per page when not configured otherwise.
pub const DEFAULT_ROWS_PER_PAGE: usize = 35;

/// Logo looked up relative to the working directory.
pub const DEFAULT_LOGO_PATH: &str = "logo_script.png";

/// Report generation options.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportOptions {
    rows_per_page: NonZeroUsize,
    logo_path: PathBuf,
    fonts_dir: Option<PathBuf>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            rows_per_page: NonZeroUsize::new(DEFAULT_ROWS_PER_PAGE)
                .unwrap_or(NonZeroUsize::MIN),
            logo_path: PathBuf::from(DEFAULT_LOGO_PATH),
            fonts_dir: None,
        }
    }
}

impl ReportOptions {
    /// Creates options with the defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of data rows per table page.
    pub fn rows_per_page(&self) -> NonZeroUsize {
        self.rows_per_page
    }

    /// Returns the path the logo is loaded from.
    pub fn logo_path(&self) -> &Path {
        &self.logo_path
    }

    /// Returns the extra font directory searched before the defaults.
    pub fn fonts_dir(&self) -> Option<&Path> {
        self.fonts_dir.as_deref()
    }

    /// Sets the number of data rows per page and returns the updated options.
    pub fn with_rows_per_page(mut self, rows_per_page: NonZeroUsize) -> Self {
        self.rows_per_page = rows_per_page;
        self
    }

    /// Sets the logo path and returns the updated options.
    pub fn with_logo_path(mut self, logo_path: impl Into<PathBuf>) -> Self {
        self.logo_path = logo_path.into();
        self
    }

    /// Sets an extra font directory and returns the updated options.
    pub fn with_fonts_dir(mut self, fonts_dir: impl Into<Option<PathBuf>>) -> Self {
        self.fonts_dir = fonts_dir.into();
        self
    }
}
