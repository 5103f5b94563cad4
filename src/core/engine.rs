use crate::adapters::png::ImageSaver;
use crate::domain::model::{BorderStyle, ColumnSpec, RenderOptions, RunSummary};
use crate::domain::ports::{FontLocator, TableSource, WordCloudRenderer};
use crate::domain::services::build_frequencies;
use crate::utils::error::Result;
use std::path::PathBuf;

/// Everything a run needs besides its collaborators.
#[derive(Debug, Clone)]
pub struct RunPlan {
    pub columns: ColumnSpec,
    pub render: RenderOptions,
    pub border: BorderStyle,
    /// Output for the raw page-count weights.
    pub raw_output: PathBuf,
    /// Output for the scaled repeat counts.
    pub scaled_output: PathBuf,
}

pub struct CloudEngine<T: TableSource, R: WordCloudRenderer, F: FontLocator> {
    source: T,
    renderer: R,
    fonts: F,
    saver: ImageSaver,
}

impl<T: TableSource, R: WordCloudRenderer, F: FontLocator> CloudEngine<T, R, F> {
    pub fn new(source: T, renderer: R, fonts: F, saver: ImageSaver) -> Self {
        Self {
            source,
            renderer,
            fonts,
            saver,
        }
    }

    /// Load → build → render A → save A → render B → save B, strictly in order.
    pub fn run(&self, plan: &RunPlan) -> Result<RunSummary> {
        tracing::info!("📖 Reading library export from {}", self.source.location());
        let table = self.source.load()?;
        tracing::info!("Loaded {} rows", table.len());

        let frequencies = build_frequencies(&table, &plan.columns)?;
        tracing::info!(
            "Built frequencies for {} titles ({} rows without '{}' dropped, max {})",
            frequencies.raw.len(),
            frequencies.dropped_rows,
            plan.columns.pages,
            frequencies.max_pages
        );

        let mut render = plan.render.clone();
        if render.font.is_none() {
            render.font = self.fonts.locate();
        }
        if render.font.is_none() {
            tracing::info!("No preferred font found, renderer will use its default");
        }

        tracing::info!("🎨 Rendering raw page-count cloud");
        let raw_image = self
            .renderer
            .render(&frequencies.raw.to_weighted_words(), &render)?;
        let raw_output = self.saver.save(&raw_image, &plan.raw_output, &plan.border)?;

        tracing::info!("🎨 Rendering scaled repeat-count cloud");
        let scaled_image = self
            .renderer
            .render(&frequencies.scaled.to_weighted_words(), &render)?;
        let scaled_output = self
            .saver
            .save(&scaled_image, &plan.scaled_output, &plan.border)?;

        Ok(RunSummary {
            raw_output,
            scaled_output,
            words: frequencies.raw.len(),
            dropped_rows: frequencies.dropped_rows,
        })
    }
}
