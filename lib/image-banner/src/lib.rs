pub mod composer;
pub mod font;
pub mod marking;
pub mod overlay;
pub mod walker;

pub use composer::compose;
pub use marking::{Classification, Marking, MarkingRegistry};
pub use overlay::{BannerConfig, BannerGeometry};
pub use walker::{BatchReport, FileOutcome, OutcomeKind, WalkerConfig, process_directory};

/// File extensions (lowercase, without the dot) that are picked up from the input folder
pub const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "png", "jpeg", "bmp"];

pub type ImageBannerResult<T> = Result<T, ImageBannerError>;

#[derive(thiserror::Error, Debug)]
pub enum ImageBannerError {
    #[error("Unknown classification: {0}")]
    UnknownClassification(String),
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Source not found: {0}")]
    SourceNotFound(String),
    #[error("Image processing error: {0}")]
    ImageProcessing(#[from] image::ImageError),
    #[error("Output write error: {0}")]
    OutputWrite(String),
    #[error("Font error: {0}")]
    Font(String),
    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
