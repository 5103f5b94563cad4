use anyhow::Result;
use shelf_cloud::domain::model::{
    BorderStyle, ColumnSpec, FontHandle, RenderOptions, RenderedImage, WeightedWord,
};
use shelf_cloud::domain::ports::{FontLocator, TableSource, WordCloudRenderer};
use shelf_cloud::{
    CloudEngine, CloudError, CsvTableSource, ImageBorderPainter, ImageSaver, RunPlan,
};
use std::cell::RefCell;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const LIBRARY_EXPORT: &str = "\
Book Id,Title,Author,Number of Pages,My Rating
1,Dune,Frank Herbert,412,5
2,It,Stephen King,1138,4
3,Coraline,Neil Gaiman,,5
";

/// Records every mapping it is asked to draw and returns a blank canvas.
#[derive(Default)]
struct RecordingRenderer {
    calls: RefCell<Vec<Vec<(String, f64)>>>,
}

impl WordCloudRenderer for RecordingRenderer {
    fn render(
        &self,
        words: &[WeightedWord],
        options: &RenderOptions,
    ) -> shelf_cloud::Result<RenderedImage> {
        self.calls
            .borrow_mut()
            .push(words.iter().map(|w| (w.text.clone(), w.weight)).collect());
        Ok(RenderedImage::from_pixel(
            options.width,
            options.height,
            image::Rgb([250, 250, 250]),
        ))
    }
}

struct NoFonts;

impl FontLocator for NoFonts {
    fn locate(&self) -> Option<FontHandle> {
        None
    }
}

fn write_export(dir: &TempDir, content: &str) -> Result<std::path::PathBuf> {
    let path = dir.path().join("library.csv");
    fs::write(&path, content)?;
    Ok(path)
}

fn plan(dir: &Path, border_px: u32) -> RunPlan {
    RunPlan {
        columns: ColumnSpec::default(),
        render: RenderOptions {
            width: 120,
            height: 80,
            ..Default::default()
        },
        border: BorderStyle {
            px: border_px,
            ..Default::default()
        },
        raw_output: dir.join("out").join("book_titles_method1.png"),
        scaled_output: dir.join("out").join("book_titles_method2.png"),
    }
}

#[test]
fn test_end_to_end_with_recording_renderer() -> Result<()> {
    let dir = TempDir::new()?;
    let input = write_export(&dir, LIBRARY_EXPORT)?;

    let engine = CloudEngine::new(
        CsvTableSource::new(&input),
        RecordingRenderer::default(),
        NoFonts,
        ImageSaver::new(Some(Box::new(ImageBorderPainter))),
    );
    let run_plan = plan(dir.path(), 10);
    let summary = engine.run(&run_plan)?;

    assert_eq!(summary.words, 2);
    assert_eq!(summary.dropped_rows, 1);

    for output in [&run_plan.raw_output, &run_plan.scaled_output] {
        let written = image::open(output)?;
        assert_eq!((written.width(), written.height()), (140, 100));
        // 邊框是預設的黑色
        assert_eq!(written.to_rgb8().get_pixel(0, 0).0, [0, 0, 0]);
        assert_eq!(written.to_rgb8().get_pixel(70, 50).0, [250, 250, 250]);
    }
    Ok(())
}

#[test]
fn test_raw_and_scaled_mappings_reach_renderer() -> Result<()> {
    let dir = TempDir::new()?;
    let input = write_export(&dir, LIBRARY_EXPORT)?;
    let renderer = RecordingRenderer::default();

    {
        let engine = CloudEngine::new(
            CsvTableSource::new(&input),
            &renderer,
            NoFonts,
            ImageSaver::new(None),
        );
        engine.run(&plan(dir.path(), 0))?;
    }

    let calls = renderer.calls.borrow();
    assert_eq!(calls.len(), 2);
    assert_eq!(
        calls[0],
        vec![("Dune".to_string(), 412.0), ("It".to_string(), 1138.0)]
    );
    assert_eq!(
        calls[1],
        vec![("Dune".to_string(), 18.0), ("It".to_string(), 50.0)]
    );
    Ok(())
}

#[test]
fn test_zero_border_keeps_canvas_size() -> Result<()> {
    let dir = TempDir::new()?;
    let input = write_export(&dir, LIBRARY_EXPORT)?;
    let engine = CloudEngine::new(
        CsvTableSource::new(&input),
        RecordingRenderer::default(),
        NoFonts,
        ImageSaver::new(Some(Box::new(ImageBorderPainter))),
    );

    let run_plan = plan(dir.path(), 0);
    let summary = engine.run(&run_plan)?;
    assert!(!summary.raw_output.bordered);

    let written = image::open(&run_plan.raw_output)?;
    assert_eq!((written.width(), written.height()), (120, 80));
    Ok(())
}

#[test]
fn test_missing_input_writes_nothing() -> Result<()> {
    let dir = TempDir::new()?;
    let missing = dir.path().join("nope.csv");
    let engine = CloudEngine::new(
        CsvTableSource::new(&missing),
        RecordingRenderer::default(),
        NoFonts,
        ImageSaver::with_default_painter(),
    );

    let run_plan = plan(dir.path(), 10);
    let err = engine.run(&run_plan).unwrap_err();

    assert!(matches!(err, CloudError::InputNotFound { .. }));
    let message = err.user_friendly_message();
    assert!(message.contains("not found"));
    assert!(message.contains(&missing.display().to_string()));
    assert!(!run_plan.raw_output.exists());
    assert!(!run_plan.scaled_output.exists());
    Ok(())
}

#[test]
fn test_duplicate_titles_last_write_wins() -> Result<()> {
    let dir = TempDir::new()?;
    let input = write_export(
        &dir,
        "Title,Number of Pages\n Walden ,100\nDracula,418\nWalden,42\n",
    )?;

    let table = CsvTableSource::new(&input).load()?;
    let set = shelf_cloud::build_frequencies(&table, &ColumnSpec::default())?;

    assert_eq!(set.raw.keys().collect::<Vec<_>>(), vec!["Walden", "Dracula"]);
    assert_eq!(set.raw.get("Walden"), Some(&42.0));
    assert_eq!(set.scaled.get("Walden"), Some(&5));
    assert_eq!(set.scaled.get("Dracula"), Some(&50));
    Ok(())
}

#[test]
fn test_only_missing_weights_render_nothing_real() -> Result<()> {
    let dir = TempDir::new()?;
    let input = write_export(&dir, "Title,Number of Pages\nA,\nB,NA\n")?;

    let table = CsvTableSource::new(&input).load()?;
    let set = shelf_cloud::build_frequencies(&table, &ColumnSpec::default())?;

    assert!(set.raw.is_empty());
    assert!(set.scaled.is_empty());
    assert_eq!(set.max_pages, 1.0);
    Ok(())
}

// Lets the test keep ownership of the renderer it inspects afterwards.
impl WordCloudRenderer for &RecordingRenderer {
    fn render(
        &self,
        words: &[WeightedWord],
        options: &RenderOptions,
    ) -> shelf_cloud::Result<RenderedImage> {
        (**self).render(words, options)
    }
}
