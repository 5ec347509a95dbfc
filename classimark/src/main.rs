//! classimark: stamp classification banners onto a folder of images.
//!
//! Usage errors (missing folder, unknown classification) are reported by clap
//! before anything is touched. Per-image failures are logged and only change
//! the exit status with `--strict`.

mod cli;

use anyhow::{Context, Result, bail};
use clap::Parser;
use cli::Cli;
use image_banner::{MarkingRegistry, font::resolve_font, process_directory};

fn init_logger(verbose: bool) {
    use std::io::Write;

    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::builder()
        .filter_level(level)
        .parse_default_env()
        .format(|buf, record| {
            let style = buf.default_level_style(record.level());
            let ts = chrono::Local::now().format("%H:%M:%S");

            writeln!(
                buf,
                "[{} {style}{}{style:#} {} {}] {}",
                ts,
                record.level(),
                record
                    .file()
                    .unwrap_or("None")
                    .split('/')
                    .next_back()
                    .unwrap_or("None"),
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .init();
}

/// With `--strict` an unlabelled banner counts as a failure, so refuse to
/// start without a font.
fn ensure_labels(strict: bool, has_font: bool) -> Result<()> {
    if strict && !has_font {
        bail!("no bold font found for the banner labels, pass --font or set CLASSIMARK_FONT");
    }

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let registry = MarkingRegistry::default();
    let marking = registry.marking(cli.classification)?;
    let font = resolve_font(cli.font.as_deref()).context("load banner font failed")?;
    ensure_labels(cli.strict, font.is_some())?;

    let output_dir = cli.output_dir();
    let report = process_directory(
        &cli.images,
        &output_dir,
        &marking,
        &cli.walker_config(),
        font.as_ref(),
    )
    .with_context(|| format!("mark images in {} failed", cli.images.display()))?;

    for (source, e) in report.failures() {
        log::warn!("not marked: {} ({e})", source.display());
    }

    if cli.strict && !report.is_success() {
        log::error!("{} image(s) could not be marked", report.failed());
        std::process::exit(1);
    }

    Ok(())
}
