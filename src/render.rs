//! Conversion of a composed [`Story`] into a rendered PDF.

use std::path::Path;

use genpdf::elements::{FrameCellDecorator, LinearLayout, PageBreak, Paragraph, TableLayout};
use genpdf::style::{Color, Style, StyledString};
use genpdf::{Alignment, Document, Element};
use log::debug;

use crate::builder::DocumentBuilder;
use crate::config::ReportOptions;
use crate::elements::{
    fixed_size_image, mm_from_f64, mm_from_points, RowGeometry, ShadedCell, VerticalSpace,
};
use crate::error::{ReportError, Result};
use crate::model::{
    Block, HorizontalAlignment, ImageBlock, MovementTable, PageHeader, RichParagraph, RowShading,
    Story, TableRow,
};

const HEADER_FONT_SIZE: u8 = 9;
const BODY_FONT_SIZE: u8 = 8;
// 35 body rows, the header row and a page header with logo fit one landscape page.
const HEADER_VERTICAL_PADDING_PT: f64 = 3.0;
const BODY_VERTICAL_PADDING_PT: f64 = 1.0;
const HORIZONTAL_PADDING_PT: f64 = 6.0;

const HEADER_FILL: Color = Color::Rgb(128, 128, 128);
const HEADER_TEXT: Color = Color::Rgb(245, 245, 245);
const SHADED_FILL: Color = Color::Rgb(211, 211, 211);

impl From<HorizontalAlignment> for Alignment {
    fn from(alignment: HorizontalAlignment) -> Self {
        match alignment {
            HorizontalAlignment::Left => Alignment::Left,
            HorizontalAlignment::Center => Alignment::Center,
            HorizontalAlignment::Right => Alignment::Right,
        }
    }
}

/// Renders `story` into PDF bytes using the page setup of the report.
pub fn render_story(story: Story, options: &ReportOptions) -> Result<Vec<u8>> {
    let mut document = DocumentBuilder::new()
        .with_paper_size(DocumentBuilder::landscape_a4())
        .with_margins(DocumentBuilder::half_inch_margins())
        .with_title(story.title().map(str::to_owned))
        .with_fonts_dir(options.fonts_dir().map(Path::to_path_buf))
        .build()
        .map_err(ReportError::FontLoad)?;

    let page_count = story.page_count();
    for block in story.into_blocks() {
        push_block(&mut document, block)?;
    }
    debug!("Rendering story with {} report pages", page_count);

    let mut bytes = Vec::new();
    document.render(&mut bytes).map_err(ReportError::Render)?;
    Ok(bytes)
}

fn push_block(document: &mut Document, block: Block) -> Result<()> {
    match block {
        Block::Header(header) => document.push(header_element(&header)?),
        Block::Paragraph(paragraph) => document.push(paragraph_element(&paragraph)),
        Block::Spacer(points) => document.push(VerticalSpace::new(mm_from_points(points))),
        Block::Table(table) => document.push(table_element(&table)?),
        Block::PageBreak => document.push(PageBreak::new()),
    }
    Ok(())
}

fn paragraph_element(paragraph: &RichParagraph) -> impl Element {
    let mut layout = LinearLayout::vertical();
    for line in paragraph.lines() {
        let mut element = Paragraph::default();
        for span in line {
            element.push(StyledString::from(span));
        }
        element.set_alignment(paragraph.alignment().into());
        layout.push(element);
    }
    layout.styled(Style::new().with_font_size(paragraph.font_size()))
}

/// Lays the header out as one borderless table row: logo, title, metadata.
fn header_element(header: &PageHeader) -> Result<TableLayout> {
    let mut layout = TableLayout::new(header.column_weights().to_vec());
    let mut row = layout.row();
    match header.logo().and_then(image_element) {
        Some(image) => row.push_element(image),
        None => row.push_element(Paragraph::default()),
    }
    match header.title() {
        Some(title) => row.push_element(paragraph_element(title)),
        None => row.push_element(Paragraph::default()),
    }
    row.push_element(paragraph_element(header.metadata()));
    row.push().map_err(ReportError::Render)?;
    Ok(layout)
}

/// A logo that cannot be converted is skipped like a missing one.
fn image_element(block: &ImageBlock) -> Option<genpdf::elements::Image> {
    match fixed_size_image(
        block.logo().image(),
        mm_from_f64(block.width_mm()),
        mm_from_f64(block.height_mm()),
        block.alignment().into(),
    ) {
        Ok(image) => Some(image),
        Err(err) => {
            debug!("Skipping logo that cannot be embedded: {}", err);
            None
        }
    }
}

fn table_element(table: &MovementTable) -> Result<TableLayout> {
    let mut layout = TableLayout::new(table.column_weights().to_vec());
    layout.set_cell_decorator(FrameCellDecorator::new(true, true, false));

    for row in std::iter::once(table.header()).chain(table.rows()) {
        push_row(&mut layout, row, table.column_weights())?;
    }
    Ok(layout)
}

fn push_row(layout: &mut TableLayout, row: &TableRow, weights: &[usize]) -> Result<()> {
    let (text_style, padding_pt, fill) = match row.shading() {
        RowShading::Header => (
            Style::new()
                .bold()
                .with_font_size(HEADER_FONT_SIZE)
                .with_color(HEADER_TEXT),
            HEADER_VERTICAL_PADDING_PT,
            Some(HEADER_FILL),
        ),
        RowShading::Plain => (
            Style::new().with_font_size(BODY_FONT_SIZE),
            BODY_VERTICAL_PADDING_PT,
            None,
        ),
        RowShading::Shaded => (
            Style::new().with_font_size(BODY_FONT_SIZE),
            BODY_VERTICAL_PADDING_PT,
            Some(SHADED_FILL),
        ),
    };

    let texts = row.cells().to_vec();
    let geometry = RowGeometry::new(
        texts,
        weights.to_vec(),
        text_style,
        mm_from_points(padding_pt),
        mm_from_points(HORIZONTAL_PADDING_PT),
    );

    let mut table_row = layout.row();
    for column in 0..row.cells().len() {
        table_row.push_element(ShadedCell::new(geometry.clone(), column, fill));
    }
    table_row.push().map_err(ReportError::Render)
}
