//! The header band repeated at the top of every report page.

use crate::clock::Clock;
use crate::input::ReportRequest;
use crate::markup::Span;
use crate::model::{HorizontalAlignment, ImageBlock, Logo, PageHeader, RichParagraph};

const MM_PER_INCH: f64 = 25.4;

/// Logo size in the header.
pub const LOGO_WIDTH_MM: f64 = 2.0 * MM_PER_INCH;
/// Logo height in the header.
pub const LOGO_HEIGHT_MM: f64 = 1.0 * MM_PER_INCH;

/// Relative widths of the logo, title and metadata columns: 2.5 in, 6 in and 2.5 in.
pub const HEADER_COLUMN_WEIGHTS: [usize; 3] = [25, 60, 25];

/// Font size of the report title.
pub const TITLE_FONT_SIZE: u8 = 14;
/// Font size of the date, time and page lines.
pub const METADATA_FONT_SIZE: u8 = 9;

const DATE_FORMAT: &str = "%d/%m/%Y";
const TIME_FORMAT: &str = "%I:%M:%S%p";

/// Builds the per-page header band for one report.
pub struct HeaderBuilder<'a> {
    request: &'a ReportRequest,
    clock: &'a dyn Clock,
    logo: Option<&'a Logo>,
}

impl<'a> HeaderBuilder<'a> {
    /// Creates a builder for the given request.
    pub fn new(request: &'a ReportRequest, clock: &'a dyn Clock, logo: Option<&'a Logo>) -> Self {
        Self {
            request,
            clock,
            logo,
        }
    }

    /// Returns the header for `page_number`: the logo when present, the title
    /// when present, and the date/time/page lines side by side.
    ///
    /// The clock is read on every call, so pages built at different instants
    /// carry different timestamps.
    pub fn build(&self, page_number: usize) -> PageHeader {
        let logo = self
            .logo
            .map(|logo| ImageBlock::new(logo.clone(), LOGO_WIDTH_MM, LOGO_HEIGHT_MM));

        let title = self.request.title().map(|title| {
            RichParagraph::new(vec![vec![Span::new(title).bold()]])
                .with_alignment(HorizontalAlignment::Center)
                .with_font_size(TITLE_FONT_SIZE)
        });

        PageHeader::new(
            HEADER_COLUMN_WEIGHTS.to_vec(),
            logo,
            title,
            self.metadata(page_number),
        )
    }

    fn metadata(&self, page_number: usize) -> RichParagraph {
        let now = self.clock.now();
        RichParagraph::from_lines([
            format!("Fecha: {}", now.format(DATE_FORMAT)),
            format!("Hora: {}", now.format(TIME_FORMAT)),
            format!("Página: {}", page_number),
        ])
        .with_alignment(HorizontalAlignment::Right)
        .with_font_size(METADATA_FONT_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use chrono::{NaiveDate, NaiveDateTime};
    use image::{DynamicImage, RgbImage};

    use super::*;
    use crate::clock::FixedClock;

    fn instant(hour: u32, minute: u32, second: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 7)
            .and_then(|date| date.and_hms_opt(hour, minute, second))
            .expect("valid test instant")
    }

    #[test]
    fn metadata_lines_use_fixed_clock() {
        let request = ReportRequest::default();
        let clock = FixedClock(instant(15, 4, 9));
        let header = HeaderBuilder::new(&request, &clock, None).build(3);

        assert!(header.logo().is_none());
        assert!(header.title().is_none());
        assert_eq!(
            header.metadata().plain_lines(),
            vec!["Fecha: 07/03/2024", "Hora: 03:04:09PM", "Página: 3"]
        );
        assert_eq!(header.metadata().alignment(), HorizontalAlignment::Right);
        assert_eq!(header.metadata().font_size(), METADATA_FONT_SIZE);
    }

    #[test]
    fn morning_times_use_am() {
        let request = ReportRequest::default();
        let clock = FixedClock(instant(0, 30, 0));
        let header = HeaderBuilder::new(&request, &clock, None).build(1);
        assert_eq!(header.metadata().plain_lines()[1], "Hora: 12:30:00AM");
    }

    #[test]
    fn title_is_centered_and_bold() {
        let request = ReportRequest::default().with_title(Some("Movimientos".to_string()));
        let clock = FixedClock(instant(9, 0, 0));
        let header = HeaderBuilder::new(&request, &clock, None).build(1);

        let title = header.title().expect("title paragraph");
        assert_eq!(title.plain_lines(), vec!["Movimientos"]);
        assert_eq!(title.alignment(), HorizontalAlignment::Center);
        assert_eq!(title.font_size(), TITLE_FONT_SIZE);
        assert!(title.lines()[0][0].is_bold());
    }

    #[test]
    fn columns_follow_logo_title_metadata_widths() {
        let request = ReportRequest::default();
        let clock = FixedClock(instant(9, 0, 0));
        let header = HeaderBuilder::new(&request, &clock, None).build(1);
        assert_eq!(header.column_weights(), &[25, 60, 25]);
    }

    #[test]
    fn logo_is_sized_two_by_one_inch() {
        let request = ReportRequest::default().with_title(Some("R".to_string()));
        let clock = FixedClock(instant(9, 0, 0));
        let logo = Logo::new(DynamicImage::ImageRgb8(RgbImage::new(4, 2)));
        let header = HeaderBuilder::new(&request, &clock, Some(&logo)).build(1);

        let image = header.logo().expect("logo block");
        assert_eq!(image.width_mm(), LOGO_WIDTH_MM);
        assert_eq!(image.height_mm(), LOGO_HEIGHT_MM);
        assert_eq!(image.alignment(), HorizontalAlignment::Left);
        assert!(header.title().is_some());
    }

    struct TickingClock(Cell<u32>);

    impl Clock for TickingClock {
        fn now(&self) -> NaiveDateTime {
            let second = self.0.get();
            self.0.set(second + 1);
            instant(10, 0, second)
        }
    }

    #[test]
    fn clock_is_read_for_every_page() {
        let request = ReportRequest::default();
        let clock = TickingClock(Cell::new(0));
        let builder = HeaderBuilder::new(&request, &clock, None);

        let first = builder.build(1).metadata().plain_lines();
        let second = builder.build(2).metadata().plain_lines();
        assert_eq!(first[1], "Hora: 10:00:00AM");
        assert_eq!(second[1], "Hora: 10:00:01AM");
    }
}
