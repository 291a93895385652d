use chrono::{NaiveDate, NaiveDateTime};
use kycdash::data::{self, Dataset};
use polars::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Fixed "now" used by date-filter tests: 2025-03-15 12:00:00
pub fn fixed_now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 3, 15)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

/// Five-row dataset whose `created_at` values span the date-range buckets
/// relative to `fixed_now()`: 6 hours, 5 days, 10 days, 23 days, and over
/// three months old.
pub fn sample_frame() -> DataFrame {
    df!(
        "case_id" => ["C1", "C2", "C3", "C4", "C5"],
        "check_id" => ["K10", "K20", "K30", "K40", "K50"],
        "cases_status" => ["open", "closed", "open", "approved", "open"],
        "check_type" => ["aml", "aml", "id_verification", "document", "document"],
        "check_status" => ["need_review", "need_review", "need_review", "need_review", "need_review"],
        "entity_type" => ["Individual", "business", "Employee", "business", "VIP_Customer;business"],
        "country" => ["US", "US", "DE", "FR", "US"],
        "risk_level" => ["high", "low", "high", "medium", "low"],
        "created_at" => [
            "2025-03-15 06:00:00",
            "2025-03-10 11:00:00",
            "2025-03-05 09:30:00",
            "2025-02-20 08:00:00",
            "2024-12-01 10:00:00",
        ],
    )
    .unwrap()
}

pub fn sample_dataset() -> Dataset {
    data::from_frame(sample_frame()).unwrap()
}

pub fn write_sample_csv(dir: &Path) -> PathBuf {
    let path = dir.join("kyc.csv");
    let mut df = sample_frame();
    let mut file = File::create(&path).unwrap();
    CsvWriter::new(&mut file).finish(&mut df).unwrap();
    path
}
