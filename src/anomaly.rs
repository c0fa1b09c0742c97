use tracing::debug;

use crate::error::{LotteryError, Result};
use crate::types::{AnomalyFix, RawTable};
use crate::utils::{format_date, parse_date};

/// Rewrites the date text at `row`/`column` from `from_format` to `to_format`.
///
/// The input table is left untouched. A cell that does not parse under
/// `from_format` is an error, so a defect that moved or was fixed upstream
/// is reported instead of skipped.
pub fn fix(
    table: &RawTable,
    row: usize,
    column: &str,
    from_format: &str,
    to_format: &str,
) -> Result<RawTable> {
    let col = table
        .column_index(column)
        .ok_or_else(|| LotteryError::Schema {
            column: column.to_string(),
            table: format!("archive to correct at row {row}"),
        })?;

    let location = || format!("row {row}, column '{column}'");
    let value = table.cell(row, col).ok_or_else(|| LotteryError::Format {
        value: "<missing>".to_string(),
        expected: format!("date '{from_format}'"),
        location: location(),
    })?;

    let date = parse_date(value, from_format, location)?;
    let corrected = format_date(date, to_format);
    debug!(row, column, from = value, to = %corrected, "corrected date cell");

    let mut fixed = table.clone();
    fixed.rows[row][col] = corrected;
    Ok(fixed)
}

pub fn apply(table: &RawTable, anomaly: &AnomalyFix) -> Result<RawTable> {
    fix(
        table,
        anomaly.row,
        anomaly.column,
        anomaly.from_format,
        anomaly.to_format,
    )
}
