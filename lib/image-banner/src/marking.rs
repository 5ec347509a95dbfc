//! Classification markings: the short code, the banner text and the banner color.

use crate::{ImageBannerError, ImageBannerResult};
use image::Rgb;
use std::{fmt, str::FromStr};
use strum::VariantArray as _;
use strum_macros::VariantArray;

#[derive(VariantArray, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    Cui,
    Secret,
    Unclassified,
}

impl Classification {
    pub fn all() -> Vec<Self> {
        Classification::VARIANTS.to_vec()
    }

    /// Short code, also used as the output filename prefix
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Cui => "CUI",
            Self::Secret => "S",
            Self::Unclassified => "U",
        }
    }

    /// Text rendered on the banner
    pub fn long_name(&self) -> &'static str {
        match self {
            Self::Cui => "CUI",
            Self::Secret => "SECRET",
            Self::Unclassified => "UNCLASSIFIED",
        }
    }

    pub fn color(&self) -> Rgb<u8> {
        match self {
            Self::Cui => Rgb([80, 43, 133]),
            Self::Secret => Rgb([200, 16, 46]),
            Self::Unclassified => Rgb([0, 122, 51]),
        }
    }
}

impl FromStr for Classification {
    type Err = ImageBannerError;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        let code = code.trim();
        Classification::VARIANTS
            .iter()
            .find(|c| c.symbol().eq_ignore_ascii_case(code))
            .copied()
            .ok_or_else(|| ImageBannerError::UnknownClassification(code.to_string()))
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A classification resolved against the registry, ready to be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marking {
    pub classification: Classification,
    pub symbol: &'static str,
    pub long_name: &'static str,
    pub color: Rgb<u8>,
}

impl From<Classification> for Marking {
    fn from(classification: Classification) -> Self {
        Self {
            classification,
            symbol: classification.symbol(),
            long_name: classification.long_name(),
            color: classification.color(),
        }
    }
}

impl Marking {
    /// `"(S) "` style prefix put in front of every output filename
    pub fn filename_prefix(&self) -> String {
        format!("({}) ", self.symbol)
    }
}

/// Read-only set of accepted classifications. Build it once and hand it to
/// whoever needs to resolve codes.
#[derive(Debug, Clone)]
pub struct MarkingRegistry {
    classifications: Vec<Classification>,
}

impl Default for MarkingRegistry {
    fn default() -> Self {
        Self::new(Classification::VARIANTS)
    }
}

impl MarkingRegistry {
    pub fn new(classifications: &[Classification]) -> Self {
        Self {
            classifications: classifications.to_vec(),
        }
    }

    pub fn classifications(&self) -> &[Classification] {
        &self.classifications
    }

    fn lookup(&self, code: &str) -> Option<Classification> {
        self.classifications
            .iter()
            .find(|c| c.symbol() == code)
            .copied()
    }

    /// The symbol is the code itself. Unknown codes give `None`.
    pub fn get_symbol(&self, code: &str) -> Option<&'static str> {
        self.lookup(code).map(|c| c.symbol())
    }

    pub fn get_long_name(&self, code: &str) -> Option<&'static str> {
        self.lookup(code).map(|c| c.long_name())
    }

    pub fn get_color(&self, code: &str) -> Option<Rgb<u8>> {
        self.lookup(code).map(|c| c.color())
    }

    /// Resolve a code typed by a user (case-insensitive).
    pub fn resolve(&self, code: &str) -> ImageBannerResult<Marking> {
        let classification = code.parse::<Classification>()?;
        self.marking(classification)
    }

    pub fn marking(&self, classification: Classification) -> ImageBannerResult<Marking> {
        if !self.classifications.contains(&classification) {
            return Err(ImageBannerError::UnknownClassification(
                classification.symbol().to_string(),
            ));
        }

        Ok(Marking::from(classification))
    }
}
