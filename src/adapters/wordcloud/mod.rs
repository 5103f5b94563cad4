//! Word-cloud layout engine.
//!
//! Words are sorted by weight, sized relative to their predecessor, and
//! dropped onto a random free spot of an occupancy grid. When nothing fits
//! the word is tried in the other orientation, then shrunk; placement stops
//! for good once the font size falls below the configured minimum.
//!
//! Text shaping and rasterisation go through `usvg`/`resvg`: every word is
//! measured once at a reference size, the final scene is composed as a single
//! SVG document and rendered onto an RGB canvas.

mod occupancy;
mod text;

use crate::domain::color::Rgb8;
use crate::domain::model::{RenderOptions, RenderedImage, WeightedWord};
use crate::domain::ports::WordCloudRenderer;
use crate::utils::error::{CloudError, Result};
use occupancy::{OccupancyGrid, Rng64};
use text::{TextExtent, TextToolkit};

/// Renders word clouds with the built-in layout and `resvg` for rasterisation.
#[derive(Debug, Clone, Copy, Default)]
pub struct SvgWordCloud;

impl SvgWordCloud {
    pub fn new() -> Self {
        Self
    }
}

impl WordCloudRenderer for SvgWordCloud {
    fn render(&self, words: &[WeightedWord], options: &RenderOptions) -> Result<RenderedImage> {
        let words = select_words(words, options.max_words);
        if words.is_empty() {
            return Err(CloudError::EmptyFrequencies {
                message: "need at least one word with a positive weight".to_string(),
            });
        }

        let toolkit = TextToolkit::new(options.font.as_ref())?;
        let placements = layout(&words, options, |text| toolkit.measure(text))?;

        tracing::debug!(
            "Placed {} of {} words on a {}x{} canvas",
            placements.len(),
            words.len(),
            options.width,
            options.height
        );

        let svg = compose_scene(&placements, options, toolkit.family_attr());
        toolkit.rasterize(&svg, options.width, options.height)
    }
}

/// A word fixed on the canvas. `left`/`top` is the top-left corner of its ink box.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Placement {
    pub text: String,
    pub font_size: u32,
    pub left: f32,
    pub top: f32,
    pub rotated: bool,
    pub color: Rgb8,
    extent: TextExtent,
}

impl Placement {
    /// Baseline origin to hand to the `<text>` element so the ink box lands at `left`/`top`.
    fn origin(&self) -> (f32, f32) {
        let e = self.extent.scaled(self.font_size);
        if self.rotated {
            // rotate(-90) 把 (dx, dy) 轉成 (dy, -dx)
            (self.left - e.y, self.top + e.x + e.width)
        } else {
            (self.left - e.x, self.top - e.y)
        }
    }
}

/// Keeps drawable words, heaviest first, at most `max_words` of them.
pub(crate) fn select_words(words: &[WeightedWord], max_words: usize) -> Vec<WeightedWord> {
    let mut kept: Vec<WeightedWord> = words
        .iter()
        .filter(|w| w.weight.is_finite() && w.weight > 0.0 && !w.text.trim().is_empty())
        .cloned()
        .collect();

    let skipped = words.len() - kept.len();
    if skipped > 0 {
        tracing::debug!("Skipping {} words with blank text or non-positive weight", skipped);
    }

    // sort_by 是穩定排序，同權重維持原本順序
    kept.sort_by(|a, b| b.weight.total_cmp(&a.weight));
    kept.truncate(max_words);
    kept
}

fn box_size(extent: &TextExtent, font_size: u32, rotated: bool, margin: u32) -> (u32, u32) {
    let e = extent.scaled(font_size);
    let w = e.width.ceil() as u32 + margin;
    let h = e.height.ceil() as u32 + margin;
    if rotated {
        (h, w)
    } else {
        (w, h)
    }
}

fn shrink(font_size: u32, font_step: u32) -> u32 {
    font_size.saturating_sub(font_step.max(font_size / 10).max(1))
}

pub(crate) fn layout<M>(
    words: &[WeightedWord],
    options: &RenderOptions,
    mut measure: M,
) -> Result<Vec<Placement>>
where
    M: FnMut(&str) -> Result<Option<TextExtent>>,
{
    let Some(first) = words.first() else {
        return Ok(Vec::new());
    };
    let max_weight = first.weight;

    let mut rng = match options.random_state {
        Some(seed) => Rng64::new(seed),
        None => Rng64::from_clock(),
    };
    let mut grid = OccupancyGrid::new(options.width, options.height);
    let rs = options.relative_scaling as f64;
    let prefer_horizontal = options.prefer_horizontal as f64;

    let mut font_size = options
        .max_font_size
        .unwrap_or(options.height)
        .min(options.height);
    let mut last_freq = 1.0;
    let mut measured_any = false;
    let mut placements = Vec::new();

    for (i, word) in words.iter().enumerate() {
        let freq = word.weight / max_weight;
        if rs != 0.0 && i > 0 {
            font_size = ((rs * (freq / last_freq) + (1.0 - rs)) * font_size as f64).round() as u32;
        }

        let Some(extent) = measure(&word.text)? else {
            tracing::debug!("No glyphs for '{}', skipping", word.text);
            continue;
        };
        measured_any = true;

        let preferred_rotation = rng.next_f64() >= prefer_horizontal;
        let mut rotated = preferred_rotation;
        let mut tried_other = false;

        let spot = loop {
            if font_size < options.min_font_size {
                break None;
            }
            let (w, h) = box_size(&extent, font_size, rotated, options.margin);
            if let Some(pos) = grid.sample_position(w, h, &mut rng) {
                break Some((pos, (w, h)));
            }
            if !tried_other && prefer_horizontal < 1.0 {
                rotated = !rotated;
                tried_other = true;
            } else {
                font_size = shrink(font_size, options.font_step);
                rotated = preferred_rotation;
            }
        };

        // 字已經小到不能再縮，後面更輕的字也放不下
        let Some(((x, y), (w, h))) = spot else {
            break;
        };
        grid.mark(x, y, w, h);

        let half_margin = (options.margin / 2) as f32;
        placements.push(Placement {
            text: word.text.clone(),
            font_size,
            left: x as f32 + half_margin,
            top: y as f32 + half_margin,
            rotated,
            color: options.colormap.sample(rng.next_f64()),
            extent,
        });
        last_freq = freq;
    }

    if !measured_any {
        return Err(CloudError::FontUnavailable {
            message: "none of the words could be shaped with the available fonts".to_string(),
        });
    }
    if placements.is_empty() {
        return Err(CloudError::render(
            "couldn't find space to draw; the canvas is too small",
        ));
    }
    Ok(placements)
}

fn compose_scene(placements: &[Placement], options: &RenderOptions, family_attr: &str) -> String {
    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}"><rect x="0" y="0" width="{w}" height="{h}" fill="{bg}"/>"#,
        w = options.width,
        h = options.height,
        bg = options.background_color.to_hex()
    );
    for p in placements {
        text::write_text_element(
            &mut svg,
            &p.text,
            family_attr,
            p.font_size,
            p.origin(),
            p.rotated,
            &p.color.to_hex(),
        );
    }
    svg.push_str("</svg>");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::FontHandle;

    fn word(text: &str, weight: f64) -> WeightedWord {
        WeightedWord {
            text: text.to_string(),
            weight,
        }
    }

    // 每個字元寬 60、高 100 的假字型
    fn fake_measure(text: &str) -> Result<Option<TextExtent>> {
        Ok(Some(TextExtent {
            x: 0.0,
            y: -80.0,
            width: 60.0 * text.chars().count() as f32,
            height: 100.0,
        }))
    }

    fn options(width: u32, height: u32) -> RenderOptions {
        RenderOptions {
            width,
            height,
            random_state: Some(7),
            ..Default::default()
        }
    }

    fn overlaps(a: &Placement, b: &Placement) -> bool {
        let (aw, ah) = box_size(&a.extent, a.font_size, a.rotated, 0);
        let (bw, bh) = box_size(&b.extent, b.font_size, b.rotated, 0);
        a.left < b.left + bw as f32
            && b.left < a.left + aw as f32
            && a.top < b.top + bh as f32
            && b.top < a.top + ah as f32
    }

    #[test]
    fn select_words_sorts_filters_and_caps() {
        let words = vec![
            word("Small", 1.0),
            word("Zero", 0.0),
            word("Big", 10.0),
            word("   ", 5.0),
            word("Tie", 1.0),
            word("Negative", -3.0),
        ];
        let kept = select_words(&words, 3);
        let texts: Vec<&str> = kept.iter().map(|w| w.text.as_str()).collect();
        assert_eq!(texts, vec!["Big", "Small", "Tie"]);
    }

    #[test]
    fn layout_places_words_inside_canvas_without_overlap() {
        let words: Vec<WeightedWord> = ["Dune", "It", "Emma", "Ulysses", "Walden", "Beloved"]
            .iter()
            .enumerate()
            .map(|(i, t)| word(t, 100.0 - i as f64 * 10.0))
            .collect();
        let opts = options(400, 300);

        let placements = layout(&words, &opts, fake_measure).unwrap();
        assert!(!placements.is_empty());

        for p in &placements {
            let (w, h) = box_size(&p.extent, p.font_size, p.rotated, 0);
            assert!(p.left >= 0.0 && p.top >= 0.0);
            assert!(p.left + w as f32 <= 400.0, "{} overflows horizontally", p.text);
            assert!(p.top + h as f32 <= 300.0, "{} overflows vertically", p.text);
            assert!(!p.rotated);
            assert!(p.font_size >= opts.min_font_size);
        }
        for (i, a) in placements.iter().enumerate() {
            for b in &placements[i + 1..] {
                assert!(!overlaps(a, b), "{} overlaps {}", a.text, b.text);
            }
        }
    }

    #[test]
    fn heavier_words_never_get_smaller_fonts_than_lighter_ones() {
        let words = vec![word("Alpha", 50.0), word("Beta", 20.0), word("Gamma", 5.0)];
        let placements = layout(&words, &options(600, 400), fake_measure).unwrap();
        for pair in placements.windows(2) {
            assert!(pair[0].font_size >= pair[1].font_size);
        }
    }

    #[test]
    fn fixed_seed_reproduces_layout() {
        let words = vec![word("Dune", 412.0), word("It", 1138.0), word("Emma", 474.0)];
        let a = layout(&words, &options(300, 200), fake_measure).unwrap();
        let b = layout(&words, &options(300, 200), fake_measure).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn vertical_preference_rotates_words() {
        let words = vec![word("Dune", 10.0), word("Emma", 5.0)];
        let opts = RenderOptions {
            prefer_horizontal: 0.0,
            ..options(300, 300)
        };
        let placements = layout(&words, &opts, fake_measure).unwrap();
        assert!(placements.iter().all(|p| p.rotated));
    }

    #[test]
    fn tiny_canvas_reports_no_space() {
        let words = vec![word("Dune", 10.0)];
        let err = layout(&words, &options(4, 4), fake_measure).unwrap_err();
        assert!(matches!(err, CloudError::RenderError { .. }));
    }

    #[test]
    fn unshapeable_words_mean_no_font() {
        let words = vec![word("Dune", 10.0)];
        let err = layout(&words, &options(300, 200), |_| Ok(None)).unwrap_err();
        assert!(matches!(err, CloudError::FontUnavailable { .. }));
    }

    #[test]
    fn rotated_origin_puts_ink_box_at_left_top() {
        let p = Placement {
            text: "Dune".to_string(),
            font_size: 100,
            left: 10.0,
            top: 20.0,
            rotated: true,
            color: Rgb8::BLACK,
            extent: TextExtent {
                x: 2.0,
                y: -80.0,
                width: 240.0,
                height: 100.0,
            },
        };
        // 旋轉後墨水框左上角 = origin + (y, -(x + width))
        let (ox, oy) = p.origin();
        assert_eq!(ox + -80.0, 10.0);
        assert_eq!(oy - (2.0 + 240.0), 20.0);
    }

    #[test]
    fn empty_input_is_rejected_before_font_loading() {
        let words = vec![word("Nothing", 0.0)];
        let err = SvgWordCloud::new()
            .render(&words, &options(100, 100))
            .unwrap_err();
        assert!(matches!(err, CloudError::EmptyFrequencies { .. }));
    }

    #[test]
    fn renders_exact_canvas_size_when_fonts_exist() {
        use crate::adapters::font::SystemFontLocator;
        use crate::domain::ports::FontLocator;

        // 沒有系統字型的環境就跳過
        let Some(font): Option<FontHandle> = SystemFontLocator::default().locate() else {
            return;
        };
        let opts = RenderOptions {
            font: Some(font),
            ..options(320, 200)
        };
        let image = SvgWordCloud::new()
            .render(&[word("Dune", 412.0), word("It", 1138.0)], &opts)
            .unwrap();
        assert_eq!(image.dimensions(), (320, 200));
        // 至少有一些像素不是白色背景
        assert!(image.pixels().any(|p| p.0 != [255, 255, 255]));
    }
}
