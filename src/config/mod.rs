pub mod toml_config;

use crate::core::engine::RunPlan;
use crate::domain::color::Rgb8;
use crate::domain::model::{BorderStyle, ColumnSpec, RenderOptions};
use crate::domain::palette::Colormap;
use crate::utils::error::{CloudError, Result};
use crate::utils::validation::{self, Validate};
use std::path::PathBuf;
pub use toml_config::CloudSettings;

#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "shelf-cloud")]
#[command(about = "Render word clouds of book titles weighted by page count")]
pub struct CliConfig {
    #[arg(
        short,
        long,
        default_value = "word_cloud/yun_goodreads_library_export.csv",
        help = "Path to CSV file"
    )]
    pub input: String,

    #[arg(long, default_value = "word_cloud/book_titles_method1.png")]
    pub out1: String,

    #[arg(long, default_value = "word_cloud/book_titles_method2.png")]
    pub out2: String,

    #[arg(long, default_value_t = 10, help = "Border width in pixels (0 disables)")]
    pub border_px: u32,

    #[arg(long, default_value = "black")]
    pub border_color: String,

    #[arg(long, default_value_t = 1200)]
    pub width: u32,

    #[arg(long, default_value_t = 800)]
    pub height: u32,

    #[arg(long, default_value = "viridis")]
    pub colormap: String,

    #[arg(long, help = "Optional TOML settings file")]
    pub config: Option<String>,

    #[arg(long, help = "Column holding the titles [default: Title]")]
    pub title_column: Option<String>,

    #[arg(long, help = "Column holding the page counts [default: Number of Pages]")]
    pub pages_column: Option<String>,

    #[arg(long, help = "Font file to render with instead of a system font")]
    pub font: Option<String>,

    #[arg(long, help = "Seed for a reproducible layout")]
    pub seed: Option<u64>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[arg(long, help = "Exit non-zero when the run fails")]
    pub strict_exit: bool,
}

/// Everything `main` needs to wire up a run.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub input: PathBuf,
    pub delimiter: u8,
    pub font_file: Option<PathBuf>,
    pub plan: RunPlan,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 合併命令列與設定檔，命令列優先
    pub fn resolve(&self) -> Result<ResolvedConfig> {
        self.validate()?;

        let settings = match &self.config {
            Some(path) => {
                tracing::info!("📋 Loading settings from {}", path);
                CloudSettings::from_file(path)?
            }
            None => CloudSettings::default(),
        };
        settings.validate()?;

        let mut columns = settings.columns();
        if let Some(title) = &self.title_column {
            columns.title = title.clone();
        }
        if let Some(pages) = &self.pages_column {
            columns.pages = pages.clone();
        }

        let mut render = RenderOptions {
            width: self.width,
            height: self.height,
            colormap: parse_value("colormap", &self.colormap)?,
            ..RenderOptions::default()
        };
        settings.apply_to(&mut render);
        if self.seed.is_some() {
            render.random_state = self.seed;
        }

        let plan = RunPlan {
            columns,
            render,
            border: BorderStyle {
                px: self.border_px,
                color: parse_value::<Rgb8>("border_color", &self.border_color)?,
            },
            raw_output: PathBuf::from(&self.out1),
            scaled_output: PathBuf::from(&self.out2),
        };
        plan.validate()?;

        Ok(ResolvedConfig {
            input: PathBuf::from(&self.input),
            delimiter: settings.delimiter()?,
            font_file: self.font.as_ref().map(PathBuf::from),
            plan,
        })
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("input", &self.input)?;
        validation::validate_path("out1", &self.out1)?;
        validation::validate_path("out2", &self.out2)?;
        if let Some(font) = &self.font {
            validation::validate_path("font", font)?;
        }
        if let Some(config) = &self.config {
            validation::validate_path("config", config)?;
        }
        Ok(())
    }
}

fn parse_value<T: std::str::FromStr<Err = String>>(field: &str, raw: &str) -> Result<T> {
    raw.parse().map_err(|reason| CloudError::InvalidConfigValueError {
        field: field.to_string(),
        value: raw.to_string(),
        reason,
    })
}

impl Validate for ColumnSpec {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("title_column", &self.title)?;
        validation::validate_non_empty_string("pages_column", &self.pages)
    }
}

impl Validate for RenderOptions {
    fn validate(&self) -> Result<()> {
        validation::validate_positive_number("width", self.width, 1)?;
        validation::validate_positive_number("height", self.height, 1)?;
        validation::validate_positive_number("max_words", self.max_words, 1)?;
        validation::validate_range("prefer_horizontal", self.prefer_horizontal, 0.0, 1.0)?;
        validation::validate_range("relative_scaling", self.relative_scaling, 0.0, 1.0)?;
        validation::validate_positive_number("min_font_size", self.min_font_size, 1)?;
        validation::validate_positive_number("font_step", self.font_step, 1)?;
        if let Some(max) = self.max_font_size {
            validation::validate_positive_number("max_font_size", max, self.min_font_size)?;
        }
        Ok(())
    }
}

impl Validate for RunPlan {
    fn validate(&self) -> Result<()> {
        self.columns.validate()?;
        self.render.validate()?;
        if self.raw_output == self.scaled_output {
            return Err(CloudError::ConfigValidationError {
                field: "out2".to_string(),
                message: "Both clouds would be written to the same file".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn parse(args: &[&str]) -> CliConfig {
        let mut argv = vec!["shelf-cloud"];
        argv.extend_from_slice(args);
        CliConfig::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults_resolve() {
        let resolved = parse(&[]).resolve().unwrap();
        assert_eq!(
            resolved.input,
            PathBuf::from("word_cloud/yun_goodreads_library_export.csv")
        );
        assert_eq!(resolved.delimiter, b',');
        assert!(resolved.font_file.is_none());

        let plan = resolved.plan;
        assert_eq!(plan.columns, ColumnSpec::default());
        assert_eq!((plan.render.width, plan.render.height), (1200, 800));
        assert_eq!(plan.render.colormap.to_string(), "viridis");
        assert_eq!(plan.border, BorderStyle::default());
        assert_eq!(
            plan.raw_output,
            PathBuf::from("word_cloud/book_titles_method1.png")
        );
        assert_eq!(
            plan.scaled_output,
            PathBuf::from("word_cloud/book_titles_method2.png")
        );
    }

    #[test]
    fn test_flags_override_defaults() {
        let resolved = parse(&[
            "-i",
            "books.csv",
            "--border-px",
            "0",
            "--border-color",
            "#ff0000",
            "--width",
            "400",
            "--height",
            "300",
            "--colormap",
            "plasma",
            "--seed",
            "9",
            "--pages-column",
            "Pages",
        ])
        .resolve()
        .unwrap();

        assert_eq!(resolved.input, PathBuf::from("books.csv"));
        assert_eq!(resolved.plan.border.px, 0);
        assert_eq!(resolved.plan.border.color, Rgb8::new(255, 0, 0));
        assert_eq!(resolved.plan.render.width, 400);
        assert_eq!(resolved.plan.render.random_state, Some(9));
        assert_eq!(resolved.plan.columns.pages, "Pages");
        assert_eq!(resolved.plan.columns.title, "Title");
    }

    #[test]
    fn test_unknown_colormap_is_rejected() {
        let err = parse(&["--colormap", "rainbowish"]).resolve().unwrap_err();
        assert!(matches!(
            err,
            CloudError::InvalidConfigValueError { ref field, .. } if field == "colormap"
        ));
    }

    #[test]
    fn test_bad_border_color_is_rejected() {
        assert!(parse(&["--border-color", "#12"]).resolve().is_err());
    }

    #[test]
    fn test_zero_width_is_rejected() {
        assert!(parse(&["--width", "0"]).resolve().is_err());
    }

    #[test]
    fn test_same_output_twice_is_rejected() {
        assert!(parse(&["--out1", "a.png", "--out2", "a.png"]).resolve().is_err());
    }

    #[test]
    fn test_settings_file_then_flags() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[columns]\ntitle = \"Book\"\npages = \"Pages\"\n\n[render]\nrandom_state = 1\nmax_words = 20\n"
        )
        .unwrap();
        let path = file.path().to_string_lossy().to_string();

        let resolved = parse(&["--config", &path, "--title-column", "Name", "--seed", "5"])
            .resolve()
            .unwrap();
        assert_eq!(resolved.plan.columns.title, "Name");
        assert_eq!(resolved.plan.columns.pages, "Pages");
        assert_eq!(resolved.plan.render.max_words, 20);
        assert_eq!(resolved.plan.render.random_state, Some(5));
    }

    #[test]
    fn test_missing_settings_file_is_a_config_error() {
        let err = parse(&["--config", "/definitely/not/here.toml"])
            .resolve()
            .unwrap_err();
        assert!(matches!(err, CloudError::ConfigError { .. }));
    }

    #[test]
    fn test_invalid_ranges_in_settings_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[render]\nprefer_horizontal = 1.5\n").unwrap();
        let path = file.path().to_string_lossy().to_string();
        assert!(parse(&["--config", &path]).resolve().is_err());
    }
}
