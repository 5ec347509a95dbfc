//! Locating and loading the bold font used for banner labels.

use crate::{ImageBannerError, ImageBannerResult};
use ab_glyph::FontVec;
use std::path::{Path, PathBuf};

/// Well-known locations of bold sans fonts, tried in order
pub const SYSTEM_FONT_CANDIDATES: [&str; 10] = [
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Bold.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSansBold.ttf",
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "/Library/Fonts/Arial Bold.ttf",
    "C:\\Windows\\Fonts\\arialbd.ttf",
];

pub fn load_font(path: impl AsRef<Path>) -> ImageBannerResult<FontVec> {
    let path = path.as_ref();
    let data = std::fs::read(path)
        .map_err(|e| ImageBannerError::Font(format!("read {} failed: {e}", path.display())))?;

    FontVec::try_from_vec(data)
        .map_err(|e| ImageBannerError::Font(format!("parse {} failed: {e}", path.display())))
}

pub fn find_system_font() -> Option<PathBuf> {
    SYSTEM_FONT_CANDIDATES
        .iter()
        .map(PathBuf::from)
        .find(|path| path.is_file())
}

/// An explicit path must load. Without one, fall back to a system font and
/// return `None` if nothing usable is installed.
pub fn resolve_font(explicit: Option<&Path>) -> ImageBannerResult<Option<FontVec>> {
    if let Some(path) = explicit {
        log::debug!("loading banner font from {}", path.display());
        return load_font(path).map(Some);
    }

    let Some(path) = find_system_font() else {
        log::warn!("no bold system font found, banners will be drawn without labels");
        return Ok(None);
    };

    match load_font(&path) {
        Ok(font) => {
            log::debug!("using system font {}", path.display());
            Ok(Some(font))
        }
        Err(e) => {
            log::warn!("{e}, banners will be drawn without labels");
            Ok(None)
        }
    }
}
