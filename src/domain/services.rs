use crate::domain::model::{ColumnSpec, FrequencyMap, FrequencySet, Table};
use crate::utils::error::{CloudError, Result};

/// Upper bound of the scaled repeat count.
pub const SCALED_MAX: u32 = 50;

// 視為缺值的字串，比照常見 CSV 工具的預設 NA 集合
const MISSING_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

pub fn is_missing(cell: &str) -> bool {
    MISSING_TOKENS.contains(&cell.trim())
}

/// 解析頁數欄位：`Ok(None)` 代表缺值
fn parse_weight(cell: Option<&str>, row: usize, column: &str) -> Result<Option<f64>> {
    let Some(raw) = cell else {
        return Ok(None);
    };
    if is_missing(raw) {
        return Ok(None);
    }

    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Some(value)),
        _ => Err(CloudError::InvalidNumber {
            row,
            column: column.to_string(),
            value: raw.to_string(),
        }),
    }
}

/// `max(1, floor(pages / max_pages * 50))`, kept inside `1..=50`.
pub fn scaled_repeat_count(pages: f64, max_pages: f64) -> u32 {
    if max_pages == 0.0 {
        return 1;
    }
    let scaled = (pages / max_pages * SCALED_MAX as f64).floor();
    scaled.clamp(1.0, SCALED_MAX as f64) as u32
}

fn column_index(table: &Table, name: &str) -> Result<usize> {
    table
        .column_index(name)
        .ok_or_else(|| CloudError::MissingColumn {
            column: name.to_string(),
            available: table.headers().join(", "),
        })
}

/// Builds both frequency variants from the same filtered rows.
///
/// Rows whose page count is missing are dropped before `max_pages` is
/// computed. Titles are trimmed; when two rows share a trimmed title the
/// later one wins in both maps.
pub fn build_frequencies(table: &Table, columns: &ColumnSpec) -> Result<FrequencySet> {
    let title_idx = column_index(table, &columns.title)?;
    let pages_idx = column_index(table, &columns.pages)?;

    let mut retained: Vec<(String, f64)> = Vec::with_capacity(table.len());
    let mut dropped_rows = 0;

    for row in 0..table.len() {
        // 列號從 1 開始，不含標題列
        match parse_weight(table.cell(row, pages_idx), row + 1, &columns.pages)? {
            Some(pages) => {
                let title = table.cell(row, title_idx).unwrap_or_default().trim();
                retained.push((title.to_string(), pages));
            }
            None => dropped_rows += 1,
        }
    }

    let max_pages = retained
        .iter()
        .map(|(_, pages)| *pages)
        .reduce(f64::max)
        .unwrap_or(1.0);

    let mut raw = FrequencyMap::new();
    let mut scaled = FrequencyMap::new();
    for (title, pages) in retained.iter() {
        raw.insert(title.clone(), *pages);
        scaled.insert(title.clone(), scaled_repeat_count(*pages, max_pages));
    }

    tracing::debug!(
        "Built frequencies: {} rows kept, {} dropped, {} distinct titles, max_pages={}",
        retained.len(),
        dropped_rows,
        raw.len(),
        max_pages
    );

    Ok(FrequencySet {
        raw,
        scaled,
        max_pages,
        retained_rows: retained.len(),
        dropped_rows,
    })
}
