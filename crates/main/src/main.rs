use std::error::Error;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::process;

use clap::error::ErrorKind;
use clap::Parser;
use log::debug;
use movimientos_pdf::config::{DEFAULT_LOGO_PATH, DEFAULT_ROWS_PER_PAGE};
use movimientos_pdf::{ReportComposer, ReportOptions, ReportRequest};

/// Renders an account movements report from a JSON payload.
///
/// The payload holds the report title under `TitReporte1`, the movement list
/// under `movimientos` and the totals line under `LinTotales`.  Fonts are
/// searched in `--fonts-dir`, `MOVIMIENTOS_FONTS_DIR` and `assets/fonts`
/// before falling back to system fonts.
#[derive(Parser, Debug)]
#[command(author, version, about = "Generate movement report PDFs")]
struct Cli {
    /// Report data as a JSON string.
    data: String,

    /// Path of the PDF to write. Overwritten if it exists.
    output: PathBuf,

    /// Number of movement rows per page.
    #[arg(long, value_name = "N", default_value_t = default_rows_per_page())]
    rows_per_page: NonZeroUsize,

    /// Logo image placed in every page header.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_LOGO_PATH)]
    logo: PathBuf,

    /// Extra directory searched for the report fonts.
    #[arg(long, value_name = "DIR")]
    fonts_dir: Option<PathBuf>,
}

fn default_rows_per_page() -> NonZeroUsize {
    NonZeroUsize::new(DEFAULT_ROWS_PER_PAGE).unwrap_or(NonZeroUsize::MIN)
}

fn main() {
    env_logger::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            eprintln!("Error generando PDF: {}", err);
            process::exit(1);
        }
    };
    debug!("Parsed arguments: {:?}", cli);

    match run(cli) {
        Ok(path) => println!("PDF generado exitosamente: {}", path.display()),
        Err(err) => {
            eprintln!("Error generando PDF: {}", err);
            print_error_sources(err.as_ref());
            process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<PathBuf, Box<dyn Error>> {
    let request = ReportRequest::from_json_str(&cli.data)?;
    let options = ReportOptions::new()
        .with_rows_per_page(cli.rows_per_page)
        .with_logo_path(cli.logo)
        .with_fonts_dir(cli.fonts_dir);
    let path = ReportComposer::new(options).generate(&request, &cli.output)?;
    Ok(path)
}

fn print_error_sources(mut error: &(dyn Error + 'static)) {
    while let Some(source) = error.source() {
        eprintln!("  caused by: {}", source);
        error = source;
    }
}
