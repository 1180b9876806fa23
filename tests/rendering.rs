use chrono::NaiveDate;
use image::{DynamicImage, RgbImage};
use movimientos_pdf::fonts;
use movimientos_pdf::model::Logo;
use movimientos_pdf::{
    FixedClock, LogoSource, MovementRecord, NoLogo, ReportComposer, ReportOptions, ReportRequest,
};
use sha2::{Digest, Sha256};

const SKIP_HINT: &str =
    "no font family found. Set MOVIMIENTOS_FONTS_DIR or install Liberation Sans or DejaVu Sans.";

fn fixed_composer(options: ReportOptions) -> Option<ReportComposer> {
    let instant = NaiveDate::from_ymd_opt(2024, 3, 15)
        .and_then(|date| date.and_hms_opt(9, 5, 30))
        .expect("valid instant");
    let composer = ReportComposer::new(options)
        .with_clock(FixedClock(instant))
        .with_logo_source(NoLogo);
    fonts::default_fonts_available(composer.options().fonts_dir()).then_some(composer)
}

struct SolidLogo;

impl LogoSource for SolidLogo {
    fn load(&self) -> Option<Logo> {
        Some(Logo::new(DynamicImage::ImageRgb8(RgbImage::new(600, 300))))
    }
}

/// Counts `/Type /Page` dictionaries, leaving out the `/Type /Pages` tree nodes.
fn physical_pages(bytes: &[u8]) -> usize {
    let tag = b"/Type";
    let mut count = 0;
    let mut index = 0;
    while let Some(found) = bytes[index..].windows(tag.len()).position(|w| w == tag) {
        let mut cursor = index + found + tag.len();
        while cursor < bytes.len() && bytes[cursor].is_ascii_whitespace() {
            cursor += 1;
        }
        let rest = &bytes[cursor..];
        if rest.starts_with(b"/Page") && !rest[5..].starts_with(b"s") {
            count += 1;
        }
        index = cursor;
    }
    count
}

fn movements(count: usize) -> Vec<MovementRecord> {
    (0..count)
        .map(|i| {
            MovementRecord::new(
                format!("{}", 1000 + i),
                format!("Movimiento de prueba número {i}"),
                if i % 2 == 0 { "Cargo" } else { "Abono" },
            )
        })
        .collect()
}

fn sample_request() -> ReportRequest {
    ReportRequest::new(movements(40))
        .with_title(Some("Movimientos de Cuentas".to_string()))
        .with_totals_line(Some("<b>Total Cargos:</b> 20<br/>Total Abonos: 20".to_string()))
}

fn scrub_pdf(bytes: &[u8]) -> Vec<u8> {
    fn scrub_segment(data: &mut [u8], tag: &[u8], terminator: u8) {
        let mut index = 0;
        while index + tag.len() < data.len() {
            if data[index..].starts_with(tag) {
                let mut cursor = index + tag.len();
                while cursor < data.len() {
                    let byte = data[cursor];
                    if byte == terminator {
                        break;
                    }
                    if terminator == b')' {
                        data[cursor] = b'0';
                    } else if !matches!(byte, b'<' | b'>' | b' ' | b'\n' | b'\r' | b'\t') {
                        data[cursor] = b'0';
                    }
                    cursor += 1;
                }
                index = cursor;
            } else {
                index += 1;
            }
        }
    }

    fn scrub_xml(data: &mut [u8], start: &[u8], end: &[u8]) {
        let mut offset = 0;
        while offset + start.len() < data.len() {
            let Some(start_pos) = data[offset..]
                .windows(start.len())
                .position(|window| window == start)
            else {
                break;
            };
            let start_index = offset + start_pos + start.len();
            let Some(end_pos) = data[start_index..]
                .windows(end.len())
                .position(|window| window == end)
            else {
                break;
            };
            for byte in &mut data[start_index..start_index + end_pos] {
                if !matches!(*byte, b'<' | b'>' | b'/' | b' ' | b'\n' | b'\r' | b'\t') {
                    *byte = b'0';
                }
            }
            offset = start_index + end_pos + end.len();
        }
    }

    let mut normalized = bytes.to_vec();
    let dated_fields: [&[u8]; 3] = [b"/CreationDate(", b"/ModDate(", b"/Producer("];
    for tag in dated_fields {
        scrub_segment(&mut normalized, tag, b')');
    }
    scrub_segment(&mut normalized, b"/ID[", b']');
    let xml_fields: [(&[u8], &[u8]); 6] = [
        (b"<xmp:CreateDate>", b"</xmp:CreateDate>"),
        (b"<xmp:ModifyDate>", b"</xmp:ModifyDate>"),
        (b"<xmp:MetadataDate>", b"</xmp:MetadataDate>"),
        (b"<xmpMM:DocumentID>", b"</xmpMM:DocumentID>"),
        (b"<xmpMM:InstanceID>", b"</xmpMM:InstanceID>"),
        (b"<xmpMM:VersionID>", b"</xmpMM:VersionID>"),
    ];
    for (start, end) in xml_fields {
        scrub_xml(&mut normalized, start, end);
    }
    normalized
}

fn normalized_hash(bytes: &[u8]) -> [u8; 32] {
    Sha256::digest(scrub_pdf(bytes)).into()
}

#[test]
fn writes_multi_page_report() {
    let Some(composer) = fixed_composer(ReportOptions::new()) else {
        eprintln!("Skipping writes_multi_page_report: {SKIP_HINT}");
        return;
    };
    let dir = tempfile::tempdir().expect("create temp dir");
    let output = dir.path().join("movimientos.pdf");

    let written = composer
        .generate(&sample_request(), &output)
        .expect("generate report");

    assert_eq!(written, output);
    let bytes = std::fs::read(&output).expect("read report");
    assert!(bytes.starts_with(b"%PDF"), "output should be a PDF");
}

#[test]
fn rendering_is_deterministic_with_fixed_clock() {
    let Some(composer) = fixed_composer(ReportOptions::new()) else {
        eprintln!("Skipping rendering_is_deterministic_with_fixed_clock: {SKIP_HINT}");
        return;
    };
    let request = sample_request();
    let bytes_a = composer.render(&request).expect("first render");
    let bytes_b = composer.render(&request).expect("second render");

    assert_eq!(bytes_a.len(), bytes_b.len(), "PDF sizes should match");
    assert_eq!(
        normalized_hash(&bytes_a),
        normalized_hash(&bytes_b),
        "PDF renders must be deterministic after metadata normalization"
    );
}

#[test]
fn empty_movement_list_still_renders() {
    let Some(composer) = fixed_composer(ReportOptions::new()) else {
        eprintln!("Skipping empty_movement_list_still_renders: {SKIP_HINT}");
        return;
    };
    let request = ReportRequest::from_json_str(r#"{"TitReporte1":"Sin datos","movimientos":[]}"#)
        .expect("valid payload");
    let bytes = composer.render(&request).expect("render empty report");
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn corrupt_logo_does_not_abort_generation() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let logo = dir.path().join("logo_script.png");
    std::fs::write(&logo, b"definitely not a png").expect("write corrupt logo");

    let options = ReportOptions::new().with_logo_path(&logo);
    if !fonts::default_fonts_available(options.fonts_dir()) {
        eprintln!("Skipping corrupt_logo_does_not_abort_generation: {SKIP_HINT}");
        return;
    }

    let output = dir.path().join("out.pdf");
    ReportComposer::new(options)
        .generate(&ReportRequest::new(movements(3)), &output)
        .expect("corrupt logo is skipped");
    assert!(output.is_file());
}

#[test]
fn markup_error_leaves_no_output_file() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let output = dir.path().join("out.pdf");
    let request =
        ReportRequest::new(movements(1)).with_totals_line(Some("<b>sin cerrar".to_string()));

    let err = ReportComposer::new(ReportOptions::new().with_logo_path(dir.path().join("none.png")))
        .generate(&request, &output)
        .unwrap_err();

    assert!(err.is_input_error());
    assert!(!output.exists());
}

#[test]
fn single_movement_fits_one_page() {
    let Some(composer) = fixed_composer(ReportOptions::new()) else {
        eprintln!("Skipping single_movement_fits_one_page: {SKIP_HINT}");
        return;
    };
    let request = ReportRequest::from_json_str(
        r#"{"TitReporte1": "Report", "movimientos": [{"cuenta":"100","descripcion":"Cash","tipo":"Asset"}], "LinTotales":"Total: 100"}"#,
    )
    .expect("valid payload");

    let bytes = composer.render(&request).expect("render report");
    assert_eq!(physical_pages(&bytes), 1);
}

#[test]
fn seventy_movements_fill_exactly_two_pages() {
    let Some(composer) = fixed_composer(ReportOptions::new()) else {
        eprintln!("Skipping seventy_movements_fill_exactly_two_pages: {SKIP_HINT}");
        return;
    };
    let request = ReportRequest::new(movements(70))
        .with_title(Some("Movimientos de Cuentas".to_string()));

    let bytes = composer.render(&request).expect("render report");
    assert_eq!(physical_pages(&bytes), 2);
}

#[test]
fn full_pages_with_logo_do_not_spill() {
    let Some(composer) = fixed_composer(ReportOptions::new()) else {
        eprintln!("Skipping full_pages_with_logo_do_not_spill: {SKIP_HINT}");
        return;
    };
    let request = ReportRequest::new(movements(70))
        .with_title(Some("Movimientos de Cuentas".to_string()));

    let bytes = composer
        .with_logo_source(SolidLogo)
        .render(&request)
        .expect("render report");
    assert_eq!(physical_pages(&bytes), 2);
}
