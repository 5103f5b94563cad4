use clap::Parser;
use shelf_cloud::domain::model::RunSummary;
use shelf_cloud::domain::ports::FontLocator;
use shelf_cloud::utils::error::{CloudError, ErrorSeverity};
use shelf_cloud::utils::logger;
use shelf_cloud::{
    CliConfig, CloudEngine, CsvTableSource, FileFontLocator, ImageSaver, SvgWordCloud,
    SystemFontLocator,
};

fn main() {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.json_logs {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting shelf-cloud");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    match run(&config) {
        Ok(summary) => {
            tracing::info!(
                "✅ Rendered {} titles ({} rows skipped)",
                summary.words,
                summary.dropped_rows
            );
        }
        Err(e) => {
            // 記錄詳細錯誤信息
            tracing::error!(
                "❌ Word cloud generation failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            println!("{}", e.user_friendly_message());

            // 預設一律回傳 0，--strict-exit 才依嚴重程度決定退出碼
            if config.strict_exit {
                let exit_code = exit_code_for(&e);
                if exit_code > 0 {
                    std::process::exit(exit_code);
                }
            }
        }
    }
}

fn run(config: &CliConfig) -> shelf_cloud::Result<RunSummary> {
    let resolved = config.resolve()?;

    let source = CsvTableSource::new(&resolved.input).with_delimiter(resolved.delimiter);
    let fonts: Box<dyn FontLocator> = match &resolved.font_file {
        Some(path) => Box::new(FileFontLocator::new(path)),
        None => Box::new(SystemFontLocator::new()),
    };

    let engine = CloudEngine::new(
        source,
        SvgWordCloud::new(),
        fonts,
        ImageSaver::with_default_painter(),
    );
    engine.run(&resolved.plan)
}

fn exit_code_for(e: &CloudError) -> i32 {
    match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}
