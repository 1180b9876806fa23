//! Document construction helpers.

use std::path::PathBuf;

use genpdf::error::Error;
use genpdf::{self, Margins, Mm, PaperSize, SimplePageDecorator, Size};

use crate::elements::mm_from_f64;
use crate::fonts;

const HALF_INCH_MM: f64 = 12.7;

/// Builder for `genpdf::Document` instances pre-configured with the report defaults.
#[derive(Default)]
pub struct DocumentBuilder {
    paper_size: Option<Size>,
    margins: Option<Margins>,
    title: Option<String>,
    fonts_dir: Option<PathBuf>,
}

impl DocumentBuilder {
    /// Creates a new builder instance with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// A4 with width and height swapped.
    pub fn landscape_a4() -> Size {
        let portrait = Size::from(PaperSize::A4);
        Size::new(portrait.height, portrait.width)
    }

    /// Half an inch on all four sides.
    pub fn half_inch_margins() -> Margins {
        let margin: Mm = mm_from_f64(HALF_INCH_MM);
        Margins::trbl(margin, margin, margin, margin)
    }

    /// Sets the paper size used for newly created documents.
    pub fn with_paper_size(mut self, paper_size: impl Into<Size>) -> Self {
        self.paper_size = Some(paper_size.into());
        self
    }

    /// Sets the margins applied through the page decorator.
    pub fn with_margins(mut self, margins: impl Into<Margins>) -> Self {
        self.margins = Some(margins.into());
        self
    }

    /// Sets the title stored in the PDF metadata.
    pub fn with_title(mut self, title: impl Into<Option<String>>) -> Self {
        self.title = title.into();
        self
    }

    /// Adds a font directory searched before the default locations.
    pub fn with_fonts_dir(mut self, fonts_dir: impl Into<Option<PathBuf>>) -> Self {
        self.fonts_dir = fonts_dir.into();
        self
    }

    /// Builds a fully configured `genpdf::Document` instance.
    pub fn build(self) -> Result<genpdf::Document, Error> {
        let font_family = fonts::default_font_family(self.fonts_dir.as_deref())?;
        let mut document = genpdf::Document::new(font_family);

        if let Some(paper_size) = self.paper_size {
            document.set_paper_size(paper_size);
        }

        if let Some(title) = self.title {
            document.set_title(title);
        }

        let mut decorator = SimplePageDecorator::new();
        if let Some(margins) = self.margins {
            decorator.set_margins(margins);
        }
        document.set_page_decorator(decorator);

        Ok(document)
    }
}
