use crate::domain::model::{FontHandle, RenderedImage};
use crate::utils::error::{CloudError, Result};
use std::fmt::Write as _;
use std::sync::Arc;
use usvg::fontdb;

/// Font size used when measuring; extents scale linearly from here.
pub(crate) const REFERENCE_SIZE: f32 = 100.0;

const GENERIC_FAMILY: &str = "sans-serif";

/// Ink bounding box of a word set at [`REFERENCE_SIZE`], relative to its
/// baseline origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct TextExtent {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl TextExtent {
    pub(crate) fn scaled(&self, font_size: u32) -> TextExtent {
        let k = font_size as f32 / REFERENCE_SIZE;
        TextExtent {
            x: self.x * k,
            y: self.y * k,
            width: self.width * k,
            height: self.height * k,
        }
    }
}

/// Shapes, measures and rasterises text through `usvg`/`resvg`.
pub(crate) struct TextToolkit {
    options: usvg::Options<'static>,
    family_attr: String,
}

impl TextToolkit {
    pub(crate) fn new(font: Option<&FontHandle>) -> Result<Self> {
        let mut db = fontdb::Database::new();

        let family = match font {
            Some(handle) => match db.load_font_file(&handle.path) {
                Ok(()) if !db.is_empty() => Some(handle.family.clone()),
                _ => {
                    tracing::warn!(
                        "⚠️ Font {} could not be loaded, using system default",
                        handle.path.display()
                    );
                    None
                }
            },
            None => None,
        };
        if family.is_none() {
            db.load_system_fonts();
        }

        if db.is_empty() {
            return Err(CloudError::FontUnavailable {
                message: "no font faces found on this system".to_string(),
            });
        }

        let family_attr = match &family {
            Some(name) => format!("'{}', {}", escape_xml(name), GENERIC_FAMILY),
            None => GENERIC_FAMILY.to_string(),
        };
        tracing::debug!("Text toolkit ready with {} faces ({})", db.len(), family_attr);

        let options = usvg::Options {
            fontdb: Arc::new(db),
            font_resolver: font_resolver(),
            ..Default::default()
        };

        Ok(Self {
            options,
            family_attr,
        })
    }

    pub(crate) fn family_attr(&self) -> &str {
        &self.family_attr
    }

    /// `Ok(None)` when the text produces no visible glyphs.
    pub(crate) fn measure(&self, text: &str) -> Result<Option<TextExtent>> {
        let svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="1" height="1"><text x="0" y="0" font-family="{}" font-size="{}">{}</text></svg>"#,
            self.family_attr,
            REFERENCE_SIZE,
            escape_xml(text)
        );
        let tree = usvg::Tree::from_str(&svg, &self.options)
            .map_err(|e| CloudError::render(format!("failed to shape '{}': {}", text, e)))?;

        let root = tree.root();
        if !root.has_children() {
            return Ok(None);
        }
        let bbox = root.abs_bounding_box();
        if bbox.width() <= 0.0 || bbox.height() <= 0.0 {
            return Ok(None);
        }

        Ok(Some(TextExtent {
            x: bbox.x(),
            y: bbox.y(),
            width: bbox.width(),
            height: bbox.height(),
        }))
    }

    pub(crate) fn rasterize(&self, svg: &str, width: u32, height: u32) -> Result<RenderedImage> {
        let tree = usvg::Tree::from_str(svg, &self.options)
            .map_err(|e| CloudError::render(format!("failed to parse composed scene: {}", e)))?;

        let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height).ok_or_else(|| {
            CloudError::render(format!("cannot allocate a {}x{} canvas", width, height))
        })?;
        resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap.as_mut());

        // 背景是不透明的，反預乘後直接丟掉 alpha
        let mut out = RenderedImage::new(width, height);
        for (dst, src) in out.pixels_mut().zip(pixmap.pixels()) {
            let c = src.demultiply();
            *dst = image::Rgb([c.red(), c.green(), c.blue()]);
        }
        Ok(out)
    }
}

fn font_resolver() -> usvg::FontResolver<'static> {
    usvg::FontResolver {
        select_font: Box::new(|font, db| {
            let mut families = Vec::<fontdb::Family<'_>>::new();
            for family in font.families() {
                families.push(match family {
                    usvg::FontFamily::Serif => fontdb::Family::Serif,
                    usvg::FontFamily::SansSerif => fontdb::Family::SansSerif,
                    usvg::FontFamily::Cursive => fontdb::Family::Cursive,
                    usvg::FontFamily::Fantasy => fontdb::Family::Fantasy,
                    usvg::FontFamily::Monospace => fontdb::Family::Monospace,
                    usvg::FontFamily::Named(s) => fontdb::Family::Name(s),
                });
            }
            families.push(fontdb::Family::SansSerif);

            let query = fontdb::Query {
                families: &families,
                weight: fontdb::Weight(font.weight()),
                stretch: fontdb::Stretch::Normal,
                style: fontdb::Style::Normal,
            };

            // 找不到任何符合的 family 時，用資料庫裡第一個字型
            db.query(&query)
                .or_else(|| db.faces().next().map(|f| f.id))
        }),
        select_fallback: usvg::FontResolver::default_fallback_selector(),
    }
}

pub(crate) fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            // XML 1.0 不允許大部分控制字元
            c if c.is_control() && c != '\t' && c != '\n' && c != '\r' => {}
            c => out.push(c),
        }
    }
    out
}

/// One `<text>` element of the final scene.
pub(crate) fn write_text_element(
    out: &mut String,
    text: &str,
    family_attr: &str,
    font_size: u32,
    origin: (f32, f32),
    rotated: bool,
    fill: &str,
) {
    let (x, y) = origin;
    let transform = if rotated {
        format!(r#" transform="rotate(-90 {:.2} {:.2})""#, x, y)
    } else {
        String::new()
    };
    let _ = write!(
        out,
        r#"<text x="{:.2}" y="{:.2}" font-family="{}" font-size="{}" fill="{}"{}>{}</text>"#,
        x,
        y,
        family_attr,
        font_size,
        fill,
        transform,
        escape_xml(text)
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(
            escape_xml(r#"Tom & Jerry's <"Best">"#),
            "Tom &amp; Jerry&apos;s &lt;&quot;Best&quot;&gt;"
        );
        assert_eq!(escape_xml("bell\u{7}"), "bell");
    }

    #[test]
    fn extents_scale_linearly() {
        let e = TextExtent {
            x: 2.0,
            y: -80.0,
            width: 300.0,
            height: 100.0,
        };
        let half = e.scaled(50);
        assert_eq!(half.width, 150.0);
        assert_eq!(half.y, -40.0);
    }

    #[test]
    fn rotated_elements_carry_a_transform() {
        let mut out = String::new();
        write_text_element(&mut out, "Dune", "sans-serif", 20, (10.0, 30.0), true, "#440154");
        assert!(out.contains(r#"transform="rotate(-90 10.00 30.00)""#));
        assert!(out.contains(">Dune</text>"));

        let mut plain = String::new();
        write_text_element(&mut plain, "It", "sans-serif", 20, (0.0, 0.0), false, "#000000");
        assert!(!plain.contains("transform"));
    }
}
