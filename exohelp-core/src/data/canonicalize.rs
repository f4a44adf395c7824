//! Cleaning of the solar-system reference table.
//!
//! The source page lists planets as columns and parameters as rows. The
//! canonical form is one row per body with a leading `planet` label column
//! followed by one `Float64` column per parameter.

use super::provider::DataError;
use super::schema::SchemaError;
use polars::prelude::*;

/// Name of the row-label column in the canonical table.
pub const PLANET_COLUMN: &str = "planet";

/// Cell texts read as missing values, compared after footnote markers are stripped.
pub const MISSING_TOKENS: [&str; 3] = ["", "Unknown", "N/A"];

/// Canonicalizer for the solar-system reference table.
pub struct ReferenceTable;

impl ReferenceTable {
    /// Clean a raw grid as extracted from the source page.
    ///
    /// `grid[0]` is the header row (corner cell, then body names); every other
    /// row is a parameter name followed by one value per body. The table is
    /// transposed, footnote `*` markers are stripped, the trailing parameter
    /// (a repeated name row on the source page) is dropped, `Yes`/`No` become
    /// 1/0, and every value is coerced to `f64`. A kept row whose cell count
    /// differs from the header's is rejected rather than realigned.
    pub fn clean(grid: &[Vec<String>]) -> Result<DataFrame, DataError> {
        let (header, rows) = grid.split_first().ok_or(SchemaError::EmptyTable)?;
        let bodies: Vec<String> = header.iter().skip(1).map(|b| normalize_row_label(b)).collect();
        if bodies.is_empty() {
            return Err(SchemaError::EmptyTable.into());
        }

        let kept = rows.len().saturating_sub(1);
        let parameters = &rows[..kept];
        if parameters.is_empty() {
            return Err(SchemaError::EmptyTable.into());
        }

        let mut columns = Vec::with_capacity(parameters.len() + 1);
        columns.push(Column::new(PLANET_COLUMN.into(), bodies.clone()));

        for row in parameters {
            let raw_name = row.first().map(String::as_str).unwrap_or_default();
            if row.len() != header.len() {
                return Err(SchemaError::RaggedRow {
                    row: raw_name.to_string(),
                    expected: header.len(),
                    found: row.len(),
                }
                .into());
            }
            let name = normalize_column_label(raw_name);
            let values = bodies
                .iter()
                .enumerate()
                .map(|(i, body)| {
                    let cell = row[i + 1].as_str();
                    parse_cell(cell).ok_or_else(|| {
                        DataError::Parse(format!(
                            "non-numeric value {cell:?} for {body} in column {name}"
                        ))
                    })
                })
                .collect::<Result<Vec<Option<f64>>, DataError>>()?;
            columns.push(Column::new(name.into(), values));
        }

        DataFrame::new(columns).map_err(|e| DataError::Parse(format!("reference table: {e}")))
    }

    /// Restore column types after a CSV round trip: every non-label column is `Float64`.
    ///
    /// Columns that are entirely missing are read back as strings; casting
    /// brings them back to all-null floats.
    pub fn restore_types(mut df: DataFrame) -> Result<DataFrame, DataError> {
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|n| n.to_string())
            .filter(|n| n != PLANET_COLUMN)
            .collect();
        for name in names {
            let cast = df
                .column(&name)
                .and_then(|c| c.cast(&DataType::Float64))
                .map_err(|e| DataError::Parse(format!("column {name}: {e}")))?;
            df.with_column(cast)
                .map_err(|e| DataError::Parse(format!("column {name}: {e}")))?;
        }
        Ok(df)
    }
}

/// Parse one cleaned cell. `None` means the cell is not a number.
fn parse_cell(raw: &str) -> Option<Option<f64>> {
    let text = raw.replace('*', "");
    let text = text.trim();
    if MISSING_TOKENS.contains(&text) {
        return Some(None);
    }
    match text {
        "Yes" => Some(Some(1.0)),
        "No" => Some(Some(0.0)),
        _ => text.replace(',', "").parse::<f64>().ok().map(Some),
    }
}

/// `Global Magnetic Field?` → `global_magnetic_field`.
pub fn normalize_column_label(label: &str) -> String {
    label
        .replace(['*', '?', '.'], "")
        .trim()
        .to_lowercase()
        .replace(' ', "_")
}

/// `MERCURY*` → `mercury`.
pub fn normalize_row_label(label: &str) -> String {
    label.replace('*', "").trim().to_lowercase()
}
