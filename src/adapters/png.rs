use crate::domain::model::{BorderStyle, RenderedImage, SaveOutcome};
use crate::domain::ports::BorderPainter;
use crate::utils::error::Result;
use image::{DynamicImage, ImageFormat, RgbImage, RgbaImage};
use std::fs;
use std::path::Path;

/// Reopens a PNG with the `image` crate and pads it with a solid frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageBorderPainter;

impl BorderPainter for ImageBorderPainter {
    fn add_border(&self, path: &Path, border: &BorderStyle) -> Result<(u32, u32)> {
        let original = image::open(path)?;
        let b = border.px;
        let (w, h) = (original.width() + 2 * b, original.height() + 2 * b);

        // 保留原圖的色彩模式，有 alpha 就用 RGBA 畫布
        let padded = if original.color().has_alpha() {
            let mut canvas = RgbaImage::from_pixel(w, h, border.color.into());
            image::imageops::replace(&mut canvas, &original.to_rgba8(), b as i64, b as i64);
            DynamicImage::ImageRgba8(canvas)
        } else {
            let mut canvas = RgbImage::from_pixel(w, h, border.color.into());
            image::imageops::replace(&mut canvas, &original.to_rgb8(), b as i64, b as i64);
            DynamicImage::ImageRgb8(canvas)
        };

        padded.save_with_format(path, ImageFormat::Png)?;
        Ok((w, h))
    }
}

/// Writes rendered clouds to disk, optionally framing them.
pub struct ImageSaver {
    painter: Option<Box<dyn BorderPainter>>,
}

impl ImageSaver {
    pub fn new(painter: Option<Box<dyn BorderPainter>>) -> Self {
        Self { painter }
    }

    /// Saver wired with whatever border support this build carries.
    pub fn with_default_painter() -> Self {
        #[cfg(feature = "border")]
        let painter: Option<Box<dyn BorderPainter>> = Some(Box::new(ImageBorderPainter));
        #[cfg(not(feature = "border"))]
        let painter: Option<Box<dyn BorderPainter>> = None;
        Self::new(painter)
    }

    pub fn save(
        &self,
        image: &RenderedImage,
        path: &Path,
        border: &BorderStyle,
    ) -> Result<SaveOutcome> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        // 先寫出沒有邊框的原圖
        image.save_with_format(path, ImageFormat::Png)?;
        let mut outcome = SaveOutcome {
            path: path.to_path_buf(),
            width: image.width(),
            height: image.height(),
            bordered: false,
        };

        if border.px > 0 {
            match &self.painter {
                Some(painter) => {
                    let (w, h) = painter.add_border(path, border)?;
                    outcome.width = w;
                    outcome.height = h;
                    outcome.bordered = true;
                    tracing::debug!("Added {}px {} border to {}", border.px, border.color, path.display());
                }
                None => {
                    tracing::warn!("⚠️ Image editing support not available; border skipped");
                    println!("Image editing support not available; border skipped");
                }
            }
        }

        println!("Saved: {}", path.display());
        tracing::info!("📁 Saved {} ({}x{})", path.display(), outcome.width, outcome.height);
        Ok(outcome)
    }
}
