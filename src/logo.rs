//! Best-effort loading of the header logo.

use std::path::PathBuf;

use log::debug;

use crate::elements::decode_image_from_path;
use crate::model::Logo;

/// Capability that yields the header logo when one is available.
///
/// Implementations never fail: anything that prevents loading the logo
/// collapses to `None` and the headers are rendered without it.
pub trait LogoSource {
    /// Returns the logo, if one can be loaded.
    fn load(&self) -> Option<Logo>;
}

/// Loads the logo from an image file on disk.
#[derive(Clone, Debug)]
pub struct FileLogo {
    path: PathBuf,
}

impl FileLogo {
    /// Creates a source reading the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl LogoSource for FileLogo {
    fn load(&self) -> Option<Logo> {
        if !self.path.is_file() {
            debug!("No logo at {}; headers omit it", self.path.display());
            return None;
        }

        match decode_image_from_path(&self.path) {
            Ok(image) => Some(Logo::new(image)),
            Err(err) => {
                debug!("Ignoring unreadable logo {}: {}", self.path.display(), err);
                None
            }
        }
    }
}

/// Source for reports without a logo.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoLogo;

impl LogoSource for NoLogo {
    fn load(&self) -> Option<Logo> {
        None
    }
}
