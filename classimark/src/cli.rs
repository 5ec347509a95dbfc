use clap::Parser;
use image_banner::{BannerConfig, Classification, WalkerConfig};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about = "Stamp classification banners onto every image of a folder")]
pub struct Cli {
    /// Folder holding the images to mark
    #[arg(value_parser = existing_dir)]
    pub images: PathBuf,

    /// Classification code: CUI, S or U (case-insensitive)
    #[arg(value_parser = parse_classification)]
    pub classification: Classification,

    /// Output folder, defaults to the images folder
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Band height as a percentage of the image height
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u32).range(1..=100))]
    pub banner_percent: u32,

    /// Label font size as a percentage of the band height
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..=100))]
    pub font_percent: u32,

    /// Border width in pixels
    #[arg(long, default_value_t = 6)]
    pub border: u32,

    /// Bold TTF/OTF font used for the labels
    #[arg(long, env = "CLASSIMARK_FONT")]
    pub font: Option<PathBuf>,

    /// Number of images processed at the same time
    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u16).range(1..))]
    pub jobs: u16,

    /// Exit with a failure status when any image could not be marked
    #[arg(long)]
    pub strict: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn output_dir(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| self.images.clone())
    }

    pub fn walker_config(&self) -> WalkerConfig {
        let banner = BannerConfig::new()
            .with_banner_percent(self.banner_percent)
            .with_font_percent(self.font_percent)
            .with_border_width(self.border);

        WalkerConfig::new()
            .with_banner(banner)
            .with_jobs(self.jobs as usize)
    }
}

fn existing_dir(path: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(path);
    if !path.exists() {
        return Err(format!("{} does not exist", path.display()));
    }

    if !path.is_dir() {
        return Err(format!("{} is not a directory", path.display()));
    }

    Ok(path)
}

fn parse_classification(code: &str) -> Result<Classification, String> {
    code.parse::<Classification>().map_err(|e| {
        let codes = Classification::all()
            .iter()
            .map(|c| c.symbol())
            .collect::<Vec<_>>()
            .join(", ");
        format!("{e}, expected one of: {codes}")
    })
}
