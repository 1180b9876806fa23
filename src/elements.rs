//! Element implementations built on top of `genpdf` primitives.
//!
//! `genpdf` cannot fill rectangles, so table cell backgrounds are painted by
//! [`ShadedCell`] with closely spaced horizontal strokes before the cell text
//! is printed.  The module also holds the image decoding helpers used for the
//! header logo and a fixed-height spacer.

use std::path::Path;
use std::rc::Rc;

use image::GenericImageView;

use genpdf::elements::{Image, Paragraph};
use genpdf::error::{Context as _, Error};
use genpdf::style::{Color, Style};
use genpdf::{render, Alignment, Element, Margins, Mm, Position, RenderResult, Scale, Size};

const DEFAULT_IMAGE_DPI: f64 = 300.0;
const MM_PER_INCH: f64 = 25.4;
const MM_PER_POINT: f64 = MM_PER_INCH / 72.0;
const FILL_STROKE_STEP_MM: f64 = 0.25;

/// Converts millimetres given as a float into genpdf's unit.
pub fn mm_from_f64(value: f64) -> Mm {
    Mm::from(printpdf::Mm(value))
}

fn mm_to_f64(value: Mm) -> f64 {
    let mm: printpdf::Mm = value.into();
    mm.0
}

/// Converts typographic points to millimetres.
pub fn mm_from_points(points: f64) -> Mm {
    mm_from_f64(points * MM_PER_POINT)
}

fn estimated_image_size(image: &image::DynamicImage, dpi: f64) -> Size {
    let (px_width, px_height) = image.dimensions();
    let width_mm = MM_PER_INCH * (px_width as f64) / dpi;
    let height_mm = MM_PER_INCH * (px_height as f64) / dpi;
    Size::new(mm_from_f64(width_mm), mm_from_f64(height_mm))
}

/// Loads an image from the given path using the [`image`] crate with descriptive errors.
pub fn decode_image_from_path(path: impl AsRef<Path>) -> Result<image::DynamicImage, Error> {
    let path = path.as_ref();
    let reader = image::io::Reader::open(path)
        .with_context(|| format!("Failed to open image file {}", path.display()))?;
    reader
        .with_guessed_format()
        .context("Unable to determine image format")?
        .decode()
        .with_context(|| format!("Failed to decode image file {}", path.display()))
}

/// Converts a decoded image into a `genpdf` image stretched to `width` × `height`.
///
/// The alpha channel is dropped because `genpdf` only embeds opaque images.
pub fn fixed_size_image(
    image: &image::DynamicImage,
    width: Mm,
    height: Mm,
    alignment: Alignment,
) -> Result<Image, Error> {
    let natural = estimated_image_size(image, DEFAULT_IMAGE_DPI);
    let opaque = image::DynamicImage::ImageRgb8(image.to_rgb8());
    let mut element = Image::from_dynamic_image(opaque)?;

    let natural_width = mm_to_f64(natural.width);
    let natural_height = mm_to_f64(natural.height);
    if natural_width > f64::EPSILON && natural_height > f64::EPSILON {
        element.set_scale(Scale::new(
            mm_to_f64(width) / natural_width,
            mm_to_f64(height) / natural_height,
        ));
    }
    element.set_alignment(alignment);
    Ok(element)
}

/// Fixed amount of vertical whitespace.
pub struct VerticalSpace {
    height: Mm,
}

impl VerticalSpace {
    /// Creates a spacer of the given height.
    pub fn new(height: impl Into<Mm>) -> Self {
        Self {
            height: height.into(),
        }
    }
}

impl Element for VerticalSpace {
    fn render(
        &mut self,
        _context: &genpdf::Context,
        area: render::Area<'_>,
        _style: Style,
    ) -> Result<RenderResult, Error> {
        let available = area.size().height;
        let height = if self.height > available {
            available
        } else {
            self.height
        };
        let mut result = RenderResult::default();
        result.size = Size::new(0, height);
        Ok(result)
    }
}

/// Text and column layout of a whole table row, shared by the row's cells.
///
/// Each cell only sees its own area, so the row geometry is needed to make
/// every background in a row equally tall.
#[derive(Debug)]
pub struct RowGeometry {
    texts: Vec<String>,
    weights: Vec<usize>,
    style: Style,
    vertical_padding: Mm,
    horizontal_padding: Mm,
}

impl RowGeometry {
    /// Creates the geometry for one row. `texts` and `weights` are in column order
    /// and every cell is printed with `style`.
    pub fn new(
        texts: Vec<String>,
        weights: Vec<usize>,
        style: Style,
        vertical_padding: Mm,
        horizontal_padding: Mm,
    ) -> Rc<Self> {
        Rc::new(Self {
            texts,
            weights,
            style,
            vertical_padding,
            horizontal_padding,
        })
    }

    fn padding(&self) -> Margins {
        Margins::vh(self.vertical_padding, self.horizontal_padding)
    }

    /// Height of the row: the tallest wrapped cell plus the vertical padding.
    fn estimated_height(
        &self,
        context: &genpdf::Context,
        column: usize,
        cell_width: Mm,
        style: Style,
    ) -> Mm {
        let total_weight: usize = self.weights.iter().sum();
        let own_weight = self.weights.get(column).copied().unwrap_or(0);
        if total_weight == 0 || own_weight == 0 {
            return Mm::default();
        }

        let cell_style = style.and(self.style);
        let line_height = mm_to_f64(cell_style.line_height(&context.font_cache));
        let row_width = mm_to_f64(cell_width) * total_weight as f64 / own_weight as f64;
        let horizontal_padding = 2.0 * mm_to_f64(self.horizontal_padding);

        let lines = self
            .texts
            .iter()
            .zip(&self.weights)
            .map(|(text, weight)| {
                let available = row_width * *weight as f64 / total_weight as f64 - horizontal_padding;
                let widths = split_words(text)
                    .map(|word| mm_to_f64(cell_style.str_width(&context.font_cache, word)));
                wrapped_line_count(widths, available)
            })
            .max()
            .unwrap_or(0)
            .max(1);

        mm_from_f64(lines as f64 * line_height + 2.0 * mm_to_f64(self.vertical_padding))
    }
}

/// Splits text into words the way genpdf's paragraph does: each word keeps
/// the space that follows it.
fn split_words(text: &str) -> impl Iterator<Item = &str> {
    text.split_inclusive(' ')
}

/// Counts the lines a greedy wrap of words with the given widths produces.
fn wrapped_line_count(widths: impl IntoIterator<Item = f64>, max_width: f64) -> usize {
    let mut lines = 0;
    let mut x = 0.0;
    for width in widths {
        if lines == 0 {
            lines = 1;
            x = width;
        } else if x + width > max_width {
            lines += 1;
            x = width;
        } else {
            x += width;
        }
    }
    lines
}

/// A table cell with optional background fill and inner padding.
pub struct ShadedCell {
    paragraph: Paragraph,
    fill: Option<Color>,
    row: Rc<RowGeometry>,
    column: usize,
}

impl ShadedCell {
    /// Creates the cell for `column` of `row`.
    pub fn new(row: Rc<RowGeometry>, column: usize, fill: Option<Color>) -> Self {
        let text = row.texts.get(column).cloned().unwrap_or_default();
        Self {
            paragraph: Paragraph::new(text),
            fill,
            row,
            column,
        }
    }

    fn paint_background(&self, area: &render::Area<'_>, height: Mm, color: Color) {
        let width = area.size().width;
        let height = mm_to_f64(height);
        let mut y = FILL_STROKE_STEP_MM / 2.0;
        while y < height {
            area.draw_line(
                vec![
                    Position::new(0, mm_from_f64(y)),
                    Position::new(width, mm_from_f64(y)),
                ],
                Style::new().with_color(color),
            );
            y += FILL_STROKE_STEP_MM;
        }
    }
}

impl Element for ShadedCell {
    fn render(
        &mut self,
        context: &genpdf::Context,
        area: render::Area<'_>,
        style: Style,
    ) -> Result<RenderResult, Error> {
        // Paragraphs take their line height from the render style, not from
        // the text, so the cell style has to be applied here.
        let style = style.and(self.row.style);
        let available = area.size().height;
        let mut band = self
            .row
            .estimated_height(context, self.column, area.size().width, style);
        if band > available {
            band = available;
        }

        if let Some(color) = self.fill {
            self.paint_background(&area, band, color);
        }

        let mut inner = area.clone();
        inner.add_margins(self.row.padding());
        let inner_result = self.paragraph.render(context, inner, style)?;

        let content = inner_result.size.height + self.row.vertical_padding * 2.0;
        let mut result = RenderResult::default();
        result.size = Size::new(
            area.size().width,
            if content > band { content } else { band },
        );
        result.has_more = inner_result.has_more;
        Ok(result)
    }
}
