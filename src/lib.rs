pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{CloudSettings, ResolvedConfig};

pub use adapters::{
    csv_table::CsvTableSource,
    font::{FileFontLocator, SystemFontLocator},
    png::{ImageBorderPainter, ImageSaver},
    wordcloud::SvgWordCloud,
};
pub use core::engine::{CloudEngine, RunPlan};
pub use domain::services::build_frequencies;
pub use utils::error::{CloudError, Result};
