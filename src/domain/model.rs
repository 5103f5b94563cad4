use crate::domain::color::Rgb8;
use crate::domain::palette::Colormap;
use std::collections::HashMap;
use std::path::PathBuf;

/// 排版引擎輸出的點陣圖
pub type RenderedImage = image::RgbImage;

/// 從輸入檔讀出的原始表格，所有儲存格都保留成字串
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// 欄位不足的列，缺少的儲存格視為 `None`
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(String::as_str)
    }
}

/// Insertion-ordered `word -> weight` mapping.
///
/// Re-inserting a key replaces its value but keeps its original position,
/// so iteration order is the order in which titles first appeared.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyMap<V> {
    entries: Vec<(String, V)>,
    index: HashMap<String, usize>,
}

impl<V> Default for FrequencyMap<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<V> FrequencyMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the previous value when the key was already present.
    pub fn insert(&mut self, key: String, value: V) -> Option<V> {
        match self.index.get(&key) {
            Some(&slot) => Some(std::mem::replace(&mut self.entries[slot].1, value)),
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.index.get(key).map(|&slot| &self.entries[slot].1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<V: Copy + Into<f64>> FrequencyMap<V> {
    /// 轉成排版引擎吃的格式
    pub fn to_weighted_words(&self) -> Vec<WeightedWord> {
        self.entries
            .iter()
            .map(|(text, weight)| WeightedWord {
                text: text.clone(),
                weight: (*weight).into(),
            })
            .collect()
    }
}

/// 同一份過濾後資料產生的兩種權重
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencySet {
    /// Title -> page count, used as-is.
    pub raw: FrequencyMap<f64>,
    /// Title -> page count scaled onto `1..=50`.
    pub scaled: FrequencyMap<u32>,
    pub max_pages: f64,
    pub retained_rows: usize,
    pub dropped_rows: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeightedWord {
    pub text: String,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub title: String,
    pub pages: String,
}

impl Default for ColumnSpec {
    fn default() -> Self {
        Self {
            title: "Title".to_string(),
            pages: "Number of Pages".to_string(),
        }
    }
}

/// 找到的字型檔
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontHandle {
    pub family: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub width: u32,
    pub height: u32,
    pub background_color: Rgb8,
    pub max_words: usize,
    pub colormap: Colormap,
    pub font: Option<FontHandle>,
    /// Phrase detection switch; titles are already whole units so this has no effect.
    pub collocations: bool,
    pub prefer_horizontal: f32,
    pub min_font_size: u32,
    pub max_font_size: Option<u32>,
    pub font_step: u32,
    pub relative_scaling: f32,
    pub margin: u32,
    pub random_state: Option<u64>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 800,
            background_color: Rgb8::WHITE,
            max_words: 800,
            colormap: Colormap::default(),
            font: None,
            collocations: false,
            prefer_horizontal: 1.0,
            min_font_size: 4,
            max_font_size: None,
            font_step: 1,
            relative_scaling: 0.5,
            margin: 2,
            random_state: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorderStyle {
    pub px: u32,
    pub color: Rgb8,
}

impl Default for BorderStyle {
    fn default() -> Self {
        Self {
            px: 10,
            color: Rgb8::BLACK,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOutcome {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub bordered: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub raw_output: SaveOutcome,
    pub scaled_output: SaveOutcome,
    pub words: usize,
    pub dropped_rows: usize,
}
