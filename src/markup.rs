//! Inline markup accepted in the totals line.
//!
//! Only a fixed allow-list is interpreted:
//!
//! - `<br/>`, `<br />` and `<br>` start a new line
//! - `<b>...</b>` for bold text
//! - `<i>...</i>` for italic text
//! - the entities `&amp;`, `&lt;` and `&gt;`
//!
//! Any other `<` or `&` is kept as literal text, so the line cannot inject
//! arbitrary markup into the renderer.

use std::fmt;

use genpdf::style::{Style, StyledString};

/// A slice of text together with its inline style.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Span {
    text: String,
    bold: bool,
    italic: bool,
}

impl Span {
    /// Creates an unstyled span.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Returns the raw text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns whether the span is bold.
    pub fn is_bold(&self) -> bool {
        self.bold
    }

    /// Returns whether the span is italic.
    pub fn is_italic(&self) -> bool {
        self.italic
    }

    /// Marks the span as bold.
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Marks the span as italic.
    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    fn to_style(&self) -> Style {
        let mut style = Style::new();
        if self.bold {
            style.set_bold();
        }
        if self.italic {
            style.set_italic();
        }
        style
    }

    /// Converts the span into a genpdf string.
    pub fn to_styled_string(&self) -> StyledString {
        StyledString::new(self.text.clone(), self.to_style())
    }
}

impl From<&Span> for StyledString {
    fn from(span: &Span) -> Self {
        span.to_styled_string()
    }
}

/// A rendered line made of consecutive spans.
pub type Line = Vec<Span>;

/// Parse errors produced by [`parse_markup`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    index: usize,
    message: String,
}

impl ParseError {
    fn new(index: usize, message: impl Into<String>) -> Self {
        Self {
            index,
            message: message.into(),
        }
    }

    /// Byte index in the input where the error was detected.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Human-readable description of the error.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (at byte {})", self.message, self.index)
    }
}

impl std::error::Error for ParseError {}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Marker {
    Bold,
    Italic,
}

impl Marker {
    fn closing_tag(self) -> &'static str {
        match self {
            Marker::Bold => "</b>",
            Marker::Italic => "</i>",
        }
    }
}

const LINE_BREAKS: &[&str] = &["<br/>", "<br />", "<br>"];
const ENTITIES: &[(&str, char)] = &[("&amp;", '&'), ("&lt;", '<'), ("&gt;", '>')];

struct Parser {
    lines: Vec<Line>,
    current: Line,
    buffer: String,
    open: Vec<(Marker, usize)>,
}

impl Parser {
    fn new() -> Self {
        Self {
            lines: Vec::new(),
            current: Vec::new(),
            buffer: String::new(),
            open: Vec::new(),
        }
    }

    fn is_open(&self, marker: Marker) -> bool {
        self.open.iter().any(|(open, _)| *open == marker)
    }

    fn flush_buffer(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        let mut span = Span::new(std::mem::take(&mut self.buffer));
        span.bold = self.is_open(Marker::Bold);
        span.italic = self.is_open(Marker::Italic);
        self.current.push(span);
    }

    fn break_line(&mut self) {
        self.flush_buffer();
        self.lines.push(std::mem::take(&mut self.current));
    }

    fn open(&mut self, marker: Marker, index: usize) -> Result<(), ParseError> {
        if self.is_open(marker) {
            return Err(ParseError::new(index, format!("nested `{}`", opening_tag(marker))));
        }
        self.flush_buffer();
        self.open.push((marker, index));
        Ok(())
    }

    fn close(&mut self, marker: Marker, index: usize) -> Result<(), ParseError> {
        match self.open.last() {
            Some((open, _)) if *open == marker => {
                self.flush_buffer();
                self.open.pop();
                Ok(())
            }
            Some((open, _)) => Err(ParseError::new(
                index,
                format!(
                    "`{}` closes `{}`",
                    marker.closing_tag(),
                    opening_tag(*open)
                ),
            )),
            None => Err(ParseError::new(
                index,
                format!("`{}` without matching opening tag", marker.closing_tag()),
            )),
        }
    }

    fn finish(mut self, end: usize) -> Result<Vec<Line>, ParseError> {
        if let Some((marker, start)) = self.open.first() {
            return Err(ParseError::new(
                (*start).min(end),
                format!("unterminated `{}`", opening_tag(*marker)),
            ));
        }
        self.break_line();
        Ok(self.lines)
    }
}

fn opening_tag(marker: Marker) -> &'static str {
    match marker {
        Marker::Bold => "<b>",
        Marker::Italic => "<i>",
    }
}

/// Parses the allow-listed markup into lines of spans.
///
/// The result always holds at least one line; an empty input yields a single
/// empty line.
pub fn parse_markup(input: &str) -> Result<Vec<Line>, ParseError> {
    let mut parser = Parser::new();
    let mut index = 0;

    'outer: while index < input.len() {
        let rest = &input[index..];

        if rest.starts_with('<') {
            if let Some(token) = LINE_BREAKS.iter().find(|token| rest.starts_with(*token)) {
                parser.break_line();
                index += token.len();
                continue;
            }
            for marker in [Marker::Bold, Marker::Italic] {
                if rest.starts_with(opening_tag(marker)) {
                    parser.open(marker, index)?;
                    index += opening_tag(marker).len();
                    continue 'outer;
                }
                if rest.starts_with(marker.closing_tag()) {
                    parser.close(marker, index)?;
                    index += marker.closing_tag().len();
                    continue 'outer;
                }
            }
        }

        if rest.starts_with('&') {
            let entity = ENTITIES.iter().find(|(entity, _)| rest.starts_with(*entity));
            if let Some((entity, ch)) = entity {
                parser.buffer.push(*ch);
                index += entity.len();
                continue;
            }
        }

        let Some(ch) = rest.chars().next() else {
            break;
        };
        parser.buffer.push(ch);
        index += ch.len_utf8();
    }

    parser.finish(input.len())
}
