use std::path::Path;
use std::process::{Command, Output};

fn movimientos_pdf(args: &[&str], cwd: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_movimientos-pdf"))
        .args(args)
        .current_dir(cwd)
        .output()
        .expect("spawn movimientos-pdf")
}

#[test]
fn malformed_json_exits_with_error_and_writes_nothing() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let output = dir.path().join("out.pdf");
    let result = movimientos_pdf(
        &["{not json", output.to_str().expect("utf-8 path")],
        dir.path(),
    );

    assert_eq!(result.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("Error generando PDF:"), "stderr: {stderr}");
    assert!(stderr.contains("JSON"), "stderr: {stderr}");
    assert!(!output.exists());
}

#[test]
fn movements_of_the_wrong_type_are_rejected() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let output = dir.path().join("out.pdf");
    let result = movimientos_pdf(
        &[
            r#"{"movimientos": "none"}"#,
            output.to_str().expect("utf-8 path"),
        ],
        dir.path(),
    );

    assert_eq!(result.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("movimientos"), "stderr: {stderr}");
    assert!(!output.exists());
}

#[test]
fn missing_arguments_exit_with_one() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let result = movimientos_pdf(&["{}"], dir.path());

    assert_eq!(result.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("Error generando PDF:"), "stderr: {stderr}");
}

#[test]
fn zero_rows_per_page_is_rejected() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let output = dir.path().join("out.pdf");
    let result = movimientos_pdf(
        &[
            "--rows-per-page",
            "0",
            "{}",
            output.to_str().expect("utf-8 path"),
        ],
        dir.path(),
    );

    assert_eq!(result.status.code(), Some(1));
    assert!(!output.exists());
}

#[test]
fn help_exits_successfully() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let result = movimientos_pdf(&["--help"], dir.path());

    assert_eq!(result.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.contains("--rows-per-page"), "stdout: {stdout}");
}

#[test]
fn writes_single_page_report() {
    if !movimientos_pdf::fonts::default_fonts_available(None) {
        eprintln!(
            "Skipping writes_single_page_report: no font family found. Set MOVIMIENTOS_FONTS_DIR or install Liberation Sans or DejaVu Sans."
        );
        return;
    }

    let dir = tempfile::tempdir().expect("create temp dir");
    let output = dir.path().join("report.pdf");
    let data = r#"{"TitReporte1":"Report","movimientos":[{"cuenta":"100","descripcion":"Cash","tipo":"Asset"}],"LinTotales":"Total: 100"}"#;
    let result = movimientos_pdf(&[data, output.to_str().expect("utf-8 path")], dir.path());

    assert_eq!(
        result.status.code(),
        Some(0),
        "stderr: {}",
        String::from_utf8_lossy(&result.stderr)
    );
    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.contains("PDF generado exitosamente:"), "stdout: {stdout}");
    assert!(stdout.contains("report.pdf"), "stdout: {stdout}");

    let bytes = std::fs::read(&output).expect("read report");
    assert!(bytes.starts_with(b"%PDF"));
}
