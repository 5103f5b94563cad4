pub mod engine;

pub use crate::domain::model::{FrequencySet, RunSummary, Table};
pub use crate::domain::ports::{BorderPainter, FontLocator, TableSource, WordCloudRenderer};
pub use crate::utils::error::Result;
