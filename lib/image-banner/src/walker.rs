//! Marks every eligible image of a folder and collects a per-file report.

use crate::{
    IMAGE_EXTENSIONS, ImageBannerError, ImageBannerResult, composer::compose, marking::Marking,
    overlay::BannerConfig,
};
use ab_glyph::FontVec;
use derivative::Derivative;
use derive_setters::Setters;
use rayon::prelude::*;
use std::{
    ffi::{OsStr, OsString},
    fs,
    path::{Path, PathBuf},
};

#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct WalkerConfig {
    pub banner: BannerConfig,
    /// Number of files processed at the same time
    #[derivative(Default(value = "1"))]
    pub jobs: usize,
}

impl WalkerConfig {
    pub fn new() -> Self {
        Self::default()
    }
}

#[derive(Debug)]
pub enum OutcomeKind {
    Marked { destination: PathBuf },
    Skipped { reason: String },
    Failed(ImageBannerError),
}

#[derive(Debug)]
pub struct FileOutcome {
    pub source: PathBuf,
    pub kind: OutcomeKind,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<FileOutcome>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.count(|kind| matches!(kind, OutcomeKind::Marked { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|kind| matches!(kind, OutcomeKind::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|kind| matches!(kind, OutcomeKind::Failed(_)))
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = (&Path, &ImageBannerError)> {
        self.outcomes.iter().filter_map(|outcome| match &outcome.kind {
            OutcomeKind::Failed(e) => Some((outcome.source.as_path(), e)),
            _ => None,
        })
    }

    fn count(&self, pred: impl Fn(&OutcomeKind) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(&o.kind)).count()
    }
}

pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
        .unwrap_or(false)
}

/// Direct children of `dir` with an image extension, sorted by file name.
/// Subdirectories are not entered.
pub fn list_images(dir: &Path) -> ImageBannerResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_image_file(&path) {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// `"(S) photo.jpg"` for `photo.jpg` marked SECRET. The original name is
/// kept byte for byte, UTF-8 or not.
pub fn output_file_name(marking: &Marking, file_name: impl AsRef<OsStr>) -> OsString {
    let mut name = OsString::from(marking.filename_prefix());
    name.push(file_name.as_ref());
    name
}

fn is_marked(marking: &Marking, file_name: &OsStr) -> bool {
    file_name
        .as_encoded_bytes()
        .starts_with(marking.filename_prefix().as_bytes())
}

fn same_dir(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

fn process_file(
    source: &Path,
    output_dir: &Path,
    marking: &Marking,
    in_place: bool,
    config: &BannerConfig,
    font: Option<&FontVec>,
) -> OutcomeKind {
    let Some(file_name) = source.file_name() else {
        let e = ImageBannerError::InvalidInput(format!("{} has no file name", source.display()));
        log::warn!("skip {}: {e}", source.display());
        return OutcomeKind::Failed(e);
    };

    if in_place && is_marked(marking, file_name) {
        log::info!("skip {}: already marked", source.display());
        return OutcomeKind::Skipped {
            reason: "already marked".to_string(),
        };
    }

    let destination = output_dir.join(output_file_name(marking, file_name));
    match compose(source, &destination, marking, config, font) {
        Ok(_) => {
            log::info!("saved {}", destination.display());
            OutcomeKind::Marked { destination }
        }
        Err(e) => {
            log::warn!("mark {} failed: {e}", source.display());
            OutcomeKind::Failed(e)
        }
    }
}

/// Mark every image of `input_dir` into `output_dir`. Per-file failures are
/// recorded in the report; only problems with the folders themselves are
/// returned as errors.
pub fn process_directory(
    input_dir: &Path,
    output_dir: &Path,
    marking: &Marking,
    config: &WalkerConfig,
    font: Option<&FontVec>,
) -> ImageBannerResult<BatchReport> {
    if !input_dir.is_dir() {
        return Err(ImageBannerError::InvalidInput(format!(
            "{} is not a directory",
            input_dir.display()
        )));
    }

    config.banner.validate()?;
    fs::create_dir_all(output_dir)?;

    let files = list_images(input_dir)?;
    let in_place = same_dir(input_dir, output_dir);
    log::info!(
        "marking {} image(s) in {} as {}",
        files.len(),
        input_dir.display(),
        marking.long_name
    );

    let process = |source: &PathBuf| FileOutcome {
        kind: process_file(source, output_dir, marking, in_place, &config.banner, font),
        source: source.clone(),
    };

    let outcomes: Vec<FileOutcome> = if config.jobs > 1 && files.len() > 1 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.jobs)
            .build()?;
        pool.install(|| files.par_iter().map(process).collect())
    } else {
        files.iter().map(process).collect()
    };

    let report = BatchReport { outcomes };
    log::info!(
        "done: {} marked, {} skipped, {} failed",
        report.succeeded(),
        report.skipped(),
        report.failed()
    );

    Ok(report)
}
