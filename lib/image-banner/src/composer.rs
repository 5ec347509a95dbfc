//! Builds the bordered, banner-wrapped image for one source file and writes it.

use crate::{
    ImageBannerError, ImageBannerResult,
    marking::Marking,
    overlay::{BannerConfig, BannerGeometry, draw_banners},
};
use ab_glyph::FontVec;
use image::{DynamicImage, ImageError, ImageFormat, ImageReader, RgbImage, imageops};
use std::{
    io::{self, BufWriter, Write},
    path::Path,
};
use tempfile::NamedTempFile;

/// Place `source` between the two banners.
pub fn apply_banners(
    source: &RgbImage,
    marking: &Marking,
    config: &BannerConfig,
    font: Option<&FontVec>,
) -> (RgbImage, BannerGeometry) {
    let geometry = BannerGeometry::new(source.width(), source.height(), config);
    let (width, height) = geometry.canvas_size();

    let mut canvas = RgbImage::from_pixel(width, height, config.background_color);
    draw_banners(&mut canvas, &geometry, marking, config, font);
    imageops::replace(&mut canvas, source, 0, geometry.image_y() as i64);

    (canvas, geometry)
}

/// Surround `image` with a uniform border.
pub fn apply_border(image: &RgbImage, config: &BannerConfig) -> RgbImage {
    let border = config.border_width;
    if border == 0 {
        return image.clone();
    }

    let mut bordered = RgbImage::from_pixel(
        image.width() + 2 * border,
        image.height() + 2 * border,
        config.border_color,
    );
    imageops::replace(&mut bordered, image, border as i64, border as i64);
    bordered
}

pub fn render(
    source: &RgbImage,
    marking: &Marking,
    config: &BannerConfig,
    font: Option<&FontVec>,
) -> RgbImage {
    let (canvas, _) = apply_banners(source, marking, config, font);
    apply_border(&canvas, config)
}

/// Mark `source_path` and write the result to `dest_path`. The output format
/// follows the destination extension. Nothing is left at `dest_path` on failure.
pub fn compose(
    source_path: &Path,
    dest_path: &Path,
    marking: &Marking,
    config: &BannerConfig,
    font: Option<&FontVec>,
) -> ImageBannerResult<()> {
    if !source_path.is_file() {
        return Err(ImageBannerError::SourceNotFound(
            source_path.display().to_string(),
        ));
    }

    let format = ImageFormat::from_path(dest_path)?;
    let source = ImageReader::open(source_path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| read_error(source_path, e))?
        .decode()?
        .to_rgb8();

    log::debug!(
        "marking {} ({}x{}) as {}",
        source_path.display(),
        source.width(),
        source.height(),
        marking.long_name
    );

    let output = render(&source, marking, config, font);
    save_atomic(&DynamicImage::ImageRgb8(output), dest_path, format)
}

/// A source that vanished is `SourceNotFound`, any other read failure is an
/// image processing error.
fn read_error(source_path: &Path, e: io::Error) -> ImageBannerError {
    match e.kind() {
        io::ErrorKind::NotFound => {
            ImageBannerError::SourceNotFound(source_path.display().to_string())
        }
        _ => ImageBannerError::ImageProcessing(ImageError::IoError(e)),
    }
}

/// Encode into a temporary file next to `dest_path`, then rename it over the
/// destination.
fn save_atomic(image: &DynamicImage, dest_path: &Path, format: ImageFormat) -> ImageBannerResult<()> {
    let dir = match dest_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| {
        ImageBannerError::OutputWrite(format!("create temp file in {} failed: {e}", dir.display()))
    })?;

    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        image.write_to(&mut writer, format)?;
        writer.flush().map_err(|e| {
            ImageBannerError::OutputWrite(format!("flush {} failed: {e}", dest_path.display()))
        })?;
    }

    tmp.persist(dest_path).map_err(|e| {
        ImageBannerError::OutputWrite(format!("rename to {} failed: {}", dest_path.display(), e.error))
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marking::Classification;
    use image::Rgb;

    fn gradient(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        })
    }

    #[test]
    fn test_apply_banners_keeps_source_untouched() {
        let source = gradient(50, 100);
        let marking = Marking::from(Classification::Cui);
        let (canvas, geometry) = apply_banners(&source, &marking, &BannerConfig::new(), None);

        assert_eq!(canvas.dimensions(), (50, 110));
        for (x, y, pixel) in source.enumerate_pixels() {
            assert_eq!(canvas.get_pixel(x, y + geometry.image_y()), pixel);
        }
        assert_eq!(*canvas.get_pixel(0, 0), marking.color);
        assert_eq!(*canvas.get_pixel(49, 109), marking.color);
    }

    #[test]
    fn test_apply_border() {
        let config = BannerConfig::new().with_border_color(Rgb([1, 2, 3]));
        let image = RgbImage::from_pixel(10, 10, Rgb([255, 255, 255]));
        let bordered = apply_border(&image, &config);

        assert_eq!(bordered.dimensions(), (22, 22));
        assert_eq!(*bordered.get_pixel(0, 0), Rgb([1, 2, 3]));
        assert_eq!(*bordered.get_pixel(21, 21), Rgb([1, 2, 3]));
        assert_eq!(*bordered.get_pixel(6, 6), Rgb([255, 255, 255]));
        assert_eq!(*bordered.get_pixel(15, 15), Rgb([255, 255, 255]));
        assert_eq!(*bordered.get_pixel(16, 16), Rgb([1, 2, 3]));
    }

    #[test]
    fn test_zero_border() {
        let config = BannerConfig::new().with_border_width(0);
        let image = gradient(7, 9);
        assert_eq!(apply_border(&image, &config), image);
    }

    #[test]
    fn test_compose_png() {
        let dir = tempfile::tempdir().unwrap();
        let source_path = dir.path().join("a.png");
        gradient(40, 60).save(&source_path).unwrap();

        let dest_path = dir.path().join("(U) a.png");
        let marking = Marking::from(Classification::Unclassified);
        compose(&source_path, &dest_path, &marking, &BannerConfig::new(), None).unwrap();

        let output = image::open(&dest_path).unwrap().to_rgb8();
        assert_eq!(output.dimensions(), (52, 78));
        assert_eq!(*output.get_pixel(6, 6), marking.color);
        assert_eq!(*output.get_pixel(0, 0), Rgb([0, 0, 0]));
    }

    #[test]
    fn test_compose_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let dest_path = dir.path().join("(S) missing.png");
        let marking = Marking::from(Classification::Secret);
        let result = compose(
            &dir.path().join("missing.png"),
            &dest_path,
            &marking,
            &BannerConfig::new(),
            None,
        );

        assert!(matches!(result, Err(ImageBannerError::SourceNotFound(_))));
        assert!(!dest_path.exists());
    }

    #[test]
    fn test_read_error_mapping() {
        let path = Path::new("a.png");
        let e = read_error(path, io::Error::new(io::ErrorKind::NotFound, "gone"));
        assert!(matches!(e, ImageBannerError::SourceNotFound(p) if p == "a.png"));

        let e = read_error(path, io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
        assert!(matches!(
            e,
            ImageBannerError::ImageProcessing(ImageError::IoError(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_compose_unreadable_source() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let source_path = dir.path().join("locked.png");
        gradient(10, 10).save(&source_path).unwrap();
        std::fs::set_permissions(&source_path, std::fs::Permissions::from_mode(0o000)).unwrap();

        // root ignores file modes
        if std::fs::File::open(&source_path).is_ok() {
            return;
        }

        let dest_path = dir.path().join("(S) locked.png");
        let marking = Marking::from(Classification::Secret);
        let result = compose(&source_path, &dest_path, &marking, &BannerConfig::new(), None);

        assert!(matches!(result, Err(ImageBannerError::ImageProcessing(_))));
        assert!(!dest_path.exists());
    }

    #[test]
    fn test_compose_corrupt_source_leaves_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let source_path = dir.path().join("broken.png");
        std::fs::write(&source_path, b"definitely not a png").unwrap();

        let dest_path = dir.path().join("(S) broken.png");
        let marking = Marking::from(Classification::Secret);
        let result = compose(&source_path, &dest_path, &marking, &BannerConfig::new(), None);

        assert!(matches!(result, Err(ImageBannerError::ImageProcessing(_))));
        assert!(!dest_path.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
