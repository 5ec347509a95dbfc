//! Banner geometry and drawing of the top and bottom classification bands.

use crate::{ImageBannerError, ImageBannerResult, marking::Marking};
use ab_glyph::{FontVec, PxScale};
use derivative::Derivative;
use derive_setters::Setters;
use image::{Rgb, RgbImage};
use imageproc::{
    drawing::{draw_filled_rect_mut, draw_text_mut, text_size},
    rect::Rect,
};

/// Banner configuration. The band height is always a percentage of the
/// source height, for both canvas allocation and drawing.
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct BannerConfig {
    /// Band height as a percentage of the source image height
    #[derivative(Default(value = "5"))]
    pub banner_percent: u32,
    /// Font pixel size as a percentage of the band height
    #[derivative(Default(value = "60"))]
    pub font_percent: u32,
    #[derivative(Default(value = "1"))]
    pub min_banner_height: u32,
    #[derivative(Default(value = "6"))]
    pub border_width: u32,
    #[derivative(Default(value = "Rgb([0, 0, 0])"))]
    pub border_color: Rgb<u8>,
    #[derivative(Default(value = "Rgb([255, 255, 255])"))]
    pub text_color: Rgb<u8>,
    /// Fill of the intermediate canvas before banners and source are placed
    #[derivative(Default(value = "Rgb([0, 0, 0])"))]
    pub background_color: Rgb<u8>,
}

impl BannerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn validate(&self) -> ImageBannerResult<()> {
        if !(1..=100).contains(&self.banner_percent) {
            return Err(ImageBannerError::InvalidConfig(format!(
                "banner percent must be within 1..=100, got {}",
                self.banner_percent
            )));
        }

        if !(1..=100).contains(&self.font_percent) {
            return Err(ImageBannerError::InvalidConfig(format!(
                "font percent must be within 1..=100, got {}",
                self.font_percent
            )));
        }

        if self.min_banner_height == 0 {
            return Err(ImageBannerError::InvalidConfig(
                "minimum banner height must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

/// Per-image layout, derived from the source size and the config.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BannerGeometry {
    pub image_width: u32,
    pub image_height: u32,
    pub banner_height: u32,
    pub border_width: u32,
    pub font_size: f32,
}

impl BannerGeometry {
    pub fn new(image_width: u32, image_height: u32, config: &BannerConfig) -> Self {
        let banner_height = ((image_height as u64 * config.banner_percent as u64) / 100) as u32;
        let banner_height = banner_height.max(config.min_banner_height);
        let font_size = banner_height as f32 * config.font_percent as f32 / 100.0;

        Self {
            image_width,
            image_height,
            banner_height,
            border_width: config.border_width,
            font_size,
        }
    }

    /// Size of the banner-wrapped image, before the border
    pub fn canvas_size(&self) -> (u32, u32) {
        (self.image_width, self.image_height + 2 * self.banner_height)
    }

    /// Final size written to disk
    pub fn output_size(&self) -> (u32, u32) {
        let (width, height) = self.canvas_size();
        (width + 2 * self.border_width, height + 2 * self.border_width)
    }

    pub fn top_band_y(&self) -> u32 {
        0
    }

    pub fn bottom_band_y(&self) -> u32 {
        self.image_height + self.banner_height
    }

    /// Vertical offset of the source image inside the canvas
    pub fn image_y(&self) -> u32 {
        self.banner_height
    }

    /// Top-left position that centers a `text_width` x `text_height` box in
    /// the band starting at `band_y`. May be negative when the text overflows.
    pub fn text_origin(&self, band_y: u32, text_width: u32, text_height: u32) -> (i32, i32) {
        let x = (self.image_width as i64 - text_width as i64) / 2;
        let y = band_y as i64 + (self.banner_height as i64 - text_height as i64) / 2;
        (x as i32, y as i32)
    }
}

/// Paint both bands and, when a font is available, their labels.
pub fn draw_banners(
    canvas: &mut RgbImage,
    geometry: &BannerGeometry,
    marking: &Marking,
    config: &BannerConfig,
    font: Option<&FontVec>,
) {
    if geometry.image_width == 0 || geometry.banner_height == 0 {
        return;
    }

    for band_y in [geometry.top_band_y(), geometry.bottom_band_y()] {
        let band = Rect::at(0, band_y as i32).of_size(geometry.image_width, geometry.banner_height);
        draw_filled_rect_mut(canvas, band, marking.color);

        if let Some(font) = font {
            draw_label(canvas, geometry, band_y, marking.long_name, config.text_color, font);
        }
    }
}

fn draw_label(
    canvas: &mut RgbImage,
    geometry: &BannerGeometry,
    band_y: u32,
    text: &str,
    color: Rgb<u8>,
    font: &FontVec,
) {
    if geometry.font_size < 1.0 {
        return;
    }

    let scale = PxScale::from(geometry.font_size);
    let (text_width, text_height) = text_size(scale, font, text);
    if text_width > geometry.image_width {
        log::debug!(
            "label `{text}` is {text_width}px wide, wider than the {}px image",
            geometry.image_width
        );
    }

    let (x, y) = geometry.text_origin(band_y, text_width, text_height);
    draw_text_mut(canvas, color, x, y, scale, font, text);
}
