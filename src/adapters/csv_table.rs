use crate::domain::model::Table;
use crate::domain::ports::TableSource;
use crate::utils::error::{CloudError, Result};
use std::fs::File;
use std::io::ErrorKind;
use std::path::PathBuf;

/// Reads a delimited text file with a header row.
#[derive(Debug, Clone)]
pub struct CsvTableSource {
    path: PathBuf,
    delimiter: u8,
}

impl CsvTableSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            delimiter: b',',
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}

impl TableSource for CsvTableSource {
    fn load(&self) -> Result<Table> {
        let file = File::open(&self.path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => CloudError::InputNotFound {
                path: self.location(),
            },
            _ => CloudError::IoError(e),
        })?;

        // 允許欄位數不一致的列，缺少的欄位之後當作缺值處理
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .delimiter(self.delimiter)
            .flexible(true)
            .from_reader(file);

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        tracing::debug!(
            "Loaded {} rows with {} columns from {}",
            rows.len(),
            headers.len(),
            self.location()
        );

        Ok(Table::new(headers, rows))
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
