//! Renderer-agnostic description of a composed report.
//!
//! The composer produces a [`Story`], an ordered list of [`Block`]s, without
//! touching `genpdf`.  Keeping layout decisions in plain data means pagination,
//! header contents and totals placement can be inspected and tested without
//! loading fonts; [`crate::render`] turns the story into PDF elements.

use std::fmt;

use image::GenericImageView;

use crate::markup::{Line, Span};

/// Horizontal alignment of paragraphs and images.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HorizontalAlignment {
    /// Left aligned content.
    #[default]
    Left,
    /// Center aligned content.
    Center,
    /// Right aligned content.
    Right,
}

/// Multi-line paragraph with inline styles, a font size and an alignment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RichParagraph {
    lines: Vec<Line>,
    alignment: HorizontalAlignment,
    font_size: u8,
}

impl RichParagraph {
    /// Font size used when none is set.
    pub const DEFAULT_FONT_SIZE: u8 = 9;

    /// Creates a left-aligned paragraph from pre-split lines.
    pub fn new(lines: impl Into<Vec<Line>>) -> Self {
        Self {
            lines: lines.into(),
            alignment: HorizontalAlignment::Left,
            font_size: Self::DEFAULT_FONT_SIZE,
        }
    }

    /// Creates a paragraph with one unstyled line per entry.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            lines
                .into_iter()
                .map(|line| vec![Span::new(line)])
                .collect::<Vec<_>>(),
        )
    }

    /// Returns the lines of the paragraph.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Returns the plain text of every line.
    pub fn plain_lines(&self) -> Vec<String> {
        self.lines
            .iter()
            .map(|line| line.iter().map(Span::text).collect())
            .collect()
    }

    /// Returns the configured alignment.
    pub fn alignment(&self) -> HorizontalAlignment {
        self.alignment
    }

    /// Returns the font size in points.
    pub fn font_size(&self) -> u8 {
        self.font_size
    }

    /// Sets the alignment and returns the updated paragraph.
    pub fn with_alignment(mut self, alignment: HorizontalAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Sets the font size and returns the updated paragraph.
    pub fn with_font_size(mut self, font_size: u8) -> Self {
        self.font_size = font_size;
        self
    }
}

/// A decoded logo image.
#[derive(Clone)]
pub struct Logo {
    image: image::DynamicImage,
}

impl Logo {
    /// Wraps a decoded image.
    pub fn new(image: image::DynamicImage) -> Self {
        Self { image }
    }

    /// Returns the decoded image.
    pub fn image(&self) -> &image::DynamicImage {
        &self.image
    }

    /// Returns the pixel dimensions.
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

impl fmt::Debug for Logo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (width, height) = self.dimensions();
        f.debug_struct("Logo")
            .field("width", &width)
            .field("height", &height)
            .finish()
    }
}

/// Logo image placed at a fixed size.
#[derive(Clone, Debug)]
pub struct ImageBlock {
    logo: Logo,
    width_mm: f64,
    height_mm: f64,
    alignment: HorizontalAlignment,
}

impl ImageBlock {
    /// Creates an image block stretched to the given size.
    pub fn new(logo: Logo, width_mm: f64, height_mm: f64) -> Self {
        Self {
            logo,
            width_mm,
            height_mm,
            alignment: HorizontalAlignment::Left,
        }
    }

    /// Returns the image.
    pub fn logo(&self) -> &Logo {
        &self.logo
    }

    /// Returns the rendered width in millimetres.
    pub fn width_mm(&self) -> f64 {
        self.width_mm
    }

    /// Returns the rendered height in millimetres.
    pub fn height_mm(&self) -> f64 {
        self.height_mm
    }

    /// Returns the configured alignment.
    pub fn alignment(&self) -> HorizontalAlignment {
        self.alignment
    }
}

/// Header band printed at the top of every page: logo on the left, title in
/// the middle and the date, time and page lines on the right.
#[derive(Clone, Debug)]
pub struct PageHeader {
    column_weights: Vec<usize>,
    logo: Option<ImageBlock>,
    title: Option<RichParagraph>,
    metadata: RichParagraph,
}

impl PageHeader {
    /// Creates a header band with the given relative column widths.
    pub fn new(
        column_weights: Vec<usize>,
        logo: Option<ImageBlock>,
        title: Option<RichParagraph>,
        metadata: RichParagraph,
    ) -> Self {
        Self {
            column_weights,
            logo,
            title,
            metadata,
        }
    }

    /// Returns the relative widths of the logo, title and metadata columns.
    pub fn column_weights(&self) -> &[usize] {
        &self.column_weights
    }

    /// Returns the logo, if one was loaded.
    pub fn logo(&self) -> Option<&ImageBlock> {
        self.logo.as_ref()
    }

    /// Returns the title paragraph, if the report has a title.
    pub fn title(&self) -> Option<&RichParagraph> {
        self.title.as_ref()
    }

    /// Returns the date, time and page lines.
    pub fn metadata(&self) -> &RichParagraph {
        &self.metadata
    }
}

/// Background of a table row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowShading {
    /// Column header row: grey fill, light bold text.
    Header,
    /// Unshaded data row.
    Plain,
    /// Light grey data row.
    Shaded,
}

impl RowShading {
    /// Returns the shading of the data row at `index` within its page.
    pub fn for_data_row(index: usize) -> Self {
        if index % 2 == 0 {
            Self::Plain
        } else {
            Self::Shaded
        }
    }
}

/// One table row with its cells in column order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableRow {
    cells: Vec<String>,
    shading: RowShading,
}

impl TableRow {
    /// Creates a row.
    pub fn new<I, S>(cells: I, shading: RowShading) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            cells: cells.into_iter().map(Into::into).collect(),
            shading,
        }
    }

    /// Returns the cells.
    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    /// Returns the row shading.
    pub fn shading(&self) -> RowShading {
        self.shading
    }
}

/// The movement table printed on one page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MovementTable {
    column_weights: Vec<usize>,
    header: TableRow,
    rows: Vec<TableRow>,
}

impl MovementTable {
    /// Creates a table with a header row and fixed column weights.
    pub fn new(column_weights: Vec<usize>, header: TableRow, rows: Vec<TableRow>) -> Self {
        Self {
            column_weights,
            header,
            rows,
        }
    }

    /// Returns the relative column widths.
    pub fn column_weights(&self) -> &[usize] {
        &self.column_weights
    }

    /// Returns the header row.
    pub fn header(&self) -> &TableRow {
        &self.header
    }

    /// Returns the data rows.
    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }
}

/// Individual blocks of a story.
#[derive(Clone, Debug)]
pub enum Block {
    /// Page header band.
    Header(PageHeader),
    /// Styled paragraph.
    Paragraph(RichParagraph),
    /// Vertical whitespace in points.
    Spacer(f64),
    /// Movement table.
    Table(MovementTable),
    /// Explicit page break.
    PageBreak,
}

impl Block {
    /// Returns the table if this block is one.
    pub fn as_table(&self) -> Option<&MovementTable> {
        match self {
            Self::Table(table) => Some(table),
            _ => None,
        }
    }

    /// Returns the page header if this block is one.
    pub fn as_header(&self) -> Option<&PageHeader> {
        match self {
            Self::Header(header) => Some(header),
            _ => None,
        }
    }

    /// Returns the paragraph if this block is one.
    pub fn as_paragraph(&self) -> Option<&RichParagraph> {
        match self {
            Self::Paragraph(paragraph) => Some(paragraph),
            _ => None,
        }
    }
}

/// The ordered blocks handed to the renderer, plus document metadata.
#[derive(Clone, Debug, Default)]
pub struct Story {
    title: Option<String>,
    blocks: Vec<Block>,
    page_count: usize,
}

impl Story {
    /// Creates an empty story.
    pub fn new(title: Option<String>) -> Self {
        Self {
            title,
            ..Self::default()
        }
    }

    /// Returns the document title.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Returns the blocks in order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Returns the number of report pages (one per header).
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Appends a block.
    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Records that another report page was started.
    pub(crate) fn begin_page(&mut self) {
        self.page_count += 1;
    }

    /// Returns every table in order.
    pub fn tables(&self) -> impl Iterator<Item = &MovementTable> {
        self.blocks.iter().filter_map(Block::as_table)
    }

    /// Consumes the story, returning its blocks.
    pub fn into_blocks(self) -> Vec<Block> {
        self.blocks
    }
}
