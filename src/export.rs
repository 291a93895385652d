use color_eyre::Result;
use polars::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Fixed name of the download artifact
pub const EXPORT_FILE_NAME: &str = "filtered_data.csv";

/// Write the filtered frame to `filtered_data.csv` in `dir`. UTF-8, header
/// row included, no index column. Returns the path written.
pub fn write_filtered_csv(frame: &DataFrame, dir: &Path) -> Result<PathBuf> {
    let path = dir.join(EXPORT_FILE_NAME);
    let mut file = File::create(&path)?;
    let mut out = frame.clone();
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut out)?;
    Ok(path)
}
