//! Core entry point for the movimientos_pdf crate.
//!
//! A JSON payload with a title, a list of account movements and a totals line
//! is turned into a landscape A4 report: every page repeats the header (logo,
//! title, date, time and page number) above a fixed-capacity slice of the
//! movement table, and the totals line closes the document.

pub mod builder;
pub mod clock;
pub mod composer;
pub mod config;
pub mod elements;
pub mod error;
pub mod fonts;
pub mod header;
pub mod input;
pub mod logo;
pub mod markup;
pub mod model;
pub mod paginator;
pub mod render;

pub use clock::{Clock, FixedClock, SystemClock};
pub use composer::ReportComposer;
pub use config::ReportOptions;
pub use error::{ReportError, Result};
pub use input::{InputError, MovementRecord, ReportRequest};
pub use logo::{FileLogo, LogoSource, NoLogo};
