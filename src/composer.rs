//! Sequencing of header, table and totals blocks into a report story.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::clock::{Clock, SystemClock};
use crate::config::ReportOptions;
use crate::error::{ReportError, Result};
use crate::header::HeaderBuilder;
use crate::input::ReportRequest;
use crate::logo::{FileLogo, LogoSource};
use crate::markup::parse_markup;
use crate::model::{Block, HorizontalAlignment, RichParagraph, Story};
use crate::paginator::{page_windows, table_page};
use crate::render;

/// Space between the header and the table, and before the totals line.
pub const SECTION_SPACING_PT: f64 = 20.0;

/// Font size of the totals line.
pub const TOTALS_FONT_SIZE: u8 = 9;

/// Composes and renders movement reports.
///
/// The clock and the logo source are injected so that headers can be made
/// deterministic in tests.
pub struct ReportComposer {
    options: ReportOptions,
    clock: Box<dyn Clock>,
    logo: Box<dyn LogoSource>,
}

impl ReportComposer {
    /// Creates a composer reading the system clock and the configured logo file.
    pub fn new(options: ReportOptions) -> Self {
        let logo = FileLogo::new(options.logo_path());
        Self {
            options,
            clock: Box::new(SystemClock),
            logo: Box::new(logo),
        }
    }

    /// Replaces the clock and returns the updated composer.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Replaces the logo source and returns the updated composer.
    pub fn with_logo_source(mut self, logo: impl LogoSource + 'static) -> Self {
        self.logo = Box::new(logo);
        self
    }

    /// Returns the options in use.
    pub fn options(&self) -> &ReportOptions {
        &self.options
    }

    /// Builds the story for `request`.
    ///
    /// Every page gets a header, a spacer and its slice of the movement
    /// table, separated by page breaks. An empty movement list still yields
    /// one header page, without a table. The totals line, when present,
    /// follows the last page.
    pub fn compose(&self, request: &ReportRequest) -> Result<Story> {
        let movements = request.movements();
        let capacity = self.options.rows_per_page();
        let logo = self.logo.load();
        let header = HeaderBuilder::new(request, self.clock.as_ref(), logo.as_ref());

        let mut story = Story::new(request.title().map(str::to_owned));
        let mut pages = page_windows(movements.len(), capacity).peekable();

        if pages.peek().is_none() {
            debug!("No movements; composing a header-only page");
            story.begin_page();
            story.push(Block::Header(header.build(1)));
            story.push(Block::Spacer(SECTION_SPACING_PT));
        }

        while let Some(page) = pages.next() {
            story.begin_page();
            story.push(Block::Header(header.build(page.page_number)));
            story.push(Block::Spacer(SECTION_SPACING_PT));

            let (table, offset) = table_page(movements, page.window.start, capacity);
            debug_assert_eq!(offset, page.window.end);
            debug!(
                "Page {}: movements {}..{}",
                page.page_number, page.window.start, page.window.end
            );
            story.push(Block::Table(table));

            if pages.peek().is_some() {
                story.push(Block::PageBreak);
            }
        }

        if let Some(totals) = request.totals_line() {
            story.push(Block::Spacer(SECTION_SPACING_PT));
            story.push(Block::Paragraph(
                RichParagraph::new(parse_markup(totals)?)
                    .with_alignment(HorizontalAlignment::Left)
                    .with_font_size(TOTALS_FONT_SIZE),
            ));
        }

        Ok(story)
    }

    /// Composes `request` and renders it into PDF bytes.
    pub fn render(&self, request: &ReportRequest) -> Result<Vec<u8>> {
        let story = self.compose(request)?;
        render::render_story(story, &self.options)
    }

    /// Composes and renders `request`, then writes the PDF to `output`.
    ///
    /// The document is rendered completely before the file is opened, so a
    /// rendering failure leaves no file behind.
    pub fn generate(&self, request: &ReportRequest, output: impl AsRef<Path>) -> Result<PathBuf> {
        let output = output.as_ref();
        let bytes = self.render(request)?;
        fs::write(output, &bytes).map_err(|source| ReportError::Write {
            path: output.to_path_buf(),
            source,
        })?;
        info!("Wrote {} ({} bytes)", output.display(), bytes.len());
        Ok(output.to_path_buf())
    }
}

impl Default for ReportComposer {
    fn default() -> Self {
        Self::new(ReportOptions::default())
    }
}
