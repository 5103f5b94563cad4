use crate::domain::color::Rgb8;
use crate::domain::model::{ColumnSpec, RenderOptions};
use crate::utils::error::{CloudError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Optional settings file; every field falls back to the built-in default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudSettings {
    pub columns: ColumnsConfig,
    pub input: InputConfig,
    pub render: RenderConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnsConfig {
    pub title: Option<String>,
    pub pages: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub delimiter: Option<char>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub background_color: Option<Rgb8>,
    pub max_words: Option<usize>,
    pub prefer_horizontal: Option<f32>,
    pub min_font_size: Option<u32>,
    pub max_font_size: Option<u32>,
    pub font_step: Option<u32>,
    pub relative_scaling: Option<f32>,
    pub margin: Option<u32>,
    pub random_state: Option<u64>,
    pub collocations: Option<bool>,
}

impl CloudSettings {
    /// 從 TOML 檔案載入設定
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| CloudError::ConfigError {
            message: format!("cannot read settings file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析設定
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| CloudError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${LIBRARY_DIR})，找不到的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}")
            .map_err(|e| CloudError::config(format!("invalid substitution pattern: {}", e)))?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn columns(&self) -> ColumnSpec {
        let defaults = ColumnSpec::default();
        ColumnSpec {
            title: self.columns.title.clone().unwrap_or(defaults.title),
            pages: self.columns.pages.clone().unwrap_or(defaults.pages),
        }
    }

    pub fn delimiter(&self) -> Result<u8> {
        match self.input.delimiter {
            None => Ok(b','),
            Some(c) if c.is_ascii() => Ok(c as u8),
            Some(c) => Err(CloudError::InvalidConfigValueError {
                field: "input.delimiter".to_string(),
                value: c.to_string(),
                reason: "Delimiter must be a single ASCII character".to_string(),
            }),
        }
    }

    /// 把檔案中有設定的欄位覆蓋到 `options`
    pub fn apply_to(&self, options: &mut RenderOptions) {
        let r = &self.render;
        if let Some(v) = r.background_color {
            options.background_color = v;
        }
        if let Some(v) = r.max_words {
            options.max_words = v;
        }
        if let Some(v) = r.prefer_horizontal {
            options.prefer_horizontal = v;
        }
        if let Some(v) = r.min_font_size {
            options.min_font_size = v;
        }
        if r.max_font_size.is_some() {
            options.max_font_size = r.max_font_size;
        }
        if let Some(v) = r.font_step {
            options.font_step = v;
        }
        if let Some(v) = r.relative_scaling {
            options.relative_scaling = v;
        }
        if let Some(v) = r.margin {
            options.margin = v;
        }
        if r.random_state.is_some() {
            options.random_state = r.random_state;
        }
        if let Some(v) = r.collocations {
            options.collocations = v;
        }
    }
}

impl Validate for CloudSettings {
    fn validate(&self) -> Result<()> {
        if let Some(title) = &self.columns.title {
            validation::validate_non_empty_string("columns.title", title)?;
        }
        if let Some(pages) = &self.columns.pages {
            validation::validate_non_empty_string("columns.pages", pages)?;
        }
        self.delimiter()?;
        Ok(())
    }
}
