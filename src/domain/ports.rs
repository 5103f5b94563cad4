use crate::domain::model::{
    BorderStyle, FontHandle, RenderOptions, RenderedImage, Table, WeightedWord,
};
use crate::utils::error::Result;
use std::path::Path;

/// Where rows come from.
pub trait TableSource {
    fn load(&self) -> Result<Table>;

    /// Human-readable location, used in logs and error messages.
    fn location(&self) -> String;
}

/// Best-effort font discovery. Never fails, `None` means "let the renderer pick".
pub trait FontLocator {
    fn locate(&self) -> Option<FontHandle>;
}

pub trait WordCloudRenderer {
    /// 回傳的圖片尺寸必須剛好是 `options.width x options.height`
    fn render(&self, words: &[WeightedWord], options: &RenderOptions) -> Result<RenderedImage>;
}

/// Pads an already written image file with a solid frame, in place.
pub trait BorderPainter {
    /// Returns the new `(width, height)` of the file.
    fn add_border(&self, path: &Path, border: &BorderStyle) -> Result<(u32, u32)>;
}

impl<F: FontLocator + ?Sized> FontLocator for Box<F> {
    fn locate(&self) -> Option<FontHandle> {
        (**self).locate()
    }
}
