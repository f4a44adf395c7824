use super::provider::DataError;
use polars::prelude::*;

/// Count occurrences of each distinct non-null value in `column`.
///
/// Sorted by count descending, ties broken by value ascending. Values are
/// rendered as strings so any column type can be summarized.
pub fn unique_counts(df: &DataFrame, column: &str) -> Result<Vec<(String, i64)>, DataError> {
    df.column(column)
        .map_err(|_| DataError::Configuration(format!("no column named {column}")))?;

    let counts = df
        .clone()
        .lazy()
        .filter(col(column).is_not_null())
        .group_by([col(column)])
        .agg([len().alias("count")])
        .sort(
            ["count", column],
            SortMultipleOptions::default()
                .with_order_descending_multi([true, false])
                .with_maintain_order(true),
        )
        .collect()
        .map_err(|e| DataError::Parse(format!("value counts for {column}: {e}")))?;

    let values = counts
        .column(column)
        .and_then(|c| c.cast(&DataType::String))
        .map_err(|e| DataError::Parse(format!("value counts for {column}: {e}")))?;
    let tallies = counts
        .column("count")
        .and_then(|c| c.cast(&DataType::Int64))
        .map_err(|e| DataError::Parse(format!("value counts for {column}: {e}")))?;

    let values = values
        .str()
        .map_err(|e| DataError::Parse(e.to_string()))?;
    let tallies = tallies
        .i64()
        .map_err(|e| DataError::Parse(e.to_string()))?;

    Ok(values
        .into_iter()
        .zip(tallies.into_iter())
        .filter_map(|(value, count)| Some((value?.to_string(), count?)))
        .collect())
}
