use color_eyre::Result;
use polars::prelude::*;
use std::path::Path;

/// Column the date filter operates on
pub const CREATED_AT: &str = "created_at";

/// Columns the dashboard expects. Missing ones are reported as a warning and
/// processing continues with whatever is present.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "case_id",
    "cases_status",
    "check_type",
    "check_status",
    "entity_type",
    "country",
    "risk_level",
    "created_at",
];

/// A loaded dataset. `date_available` is false when `created_at` is absent or
/// could not be coerced to a datetime column; date filtering is skipped then.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub frame: DataFrame,
    pub date_available: bool,
}

/// Read a CSV file into a normalized dataset.
pub fn load_dataset(path: &Path) -> Result<Dataset> {
    let df = CsvReadOptions::default()
        .try_into_reader_with_file_path(Some(path.into()))?
        .finish()?;
    from_frame(df)
}

/// Normalize column names (trim + lowercase) and coerce `created_at` to a
/// naive datetime column. Unparseable values become null rather than errors;
/// timezone offsets are stripped for uniform comparison.
pub fn from_frame(mut df: DataFrame) -> Result<Dataset> {
    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.as_str().trim().to_lowercase())
        .collect();
    df.set_column_names(names)?;

    let date_available = match df.column(CREATED_AT).map(|c| c.dtype().clone()) {
        Ok(DataType::String) => {
            df = df
                .lazy()
                .with_column(col(CREATED_AT).str().to_datetime(
                    Some(TimeUnit::Microseconds),
                    None,
                    StrptimeOptions {
                        strict: false,
                        ..Default::default()
                    },
                    lit("raise"),
                ))
                .collect()?;
            true
        }
        Ok(DataType::Datetime(_, Some(_))) => {
            df = df
                .lazy()
                .with_column(col(CREATED_AT).dt().replace_time_zone(
                    None,
                    lit("raise"),
                    NonExistent::Raise,
                ))
                .collect()?;
            true
        }
        Ok(DataType::Datetime(_, None)) => true,
        Ok(DataType::Date) => {
            df = df
                .lazy()
                .with_column(
                    col(CREATED_AT).cast(DataType::Datetime(TimeUnit::Microseconds, None)),
                )
                .collect()?;
            true
        }
        Ok(_) | Err(_) => false,
    };

    Ok(Dataset {
        frame: df,
        date_available,
    })
}

/// Required columns absent from the frame, in declaration order.
pub fn missing_required_columns(df: &DataFrame) -> Vec<&'static str> {
    REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|name| df.column(name).is_err())
        .collect()
}
