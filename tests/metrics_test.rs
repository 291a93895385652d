use color_eyre::Result;
use kycdash::filters::{apply_filters, FilterState};
use kycdash::metrics;
use polars::prelude::*;

mod common;

#[test]
fn test_metrics_over_sample_dataset() -> Result<()> {
    let dataset = common::sample_dataset();
    let view = apply_filters(&dataset, &FilterState::default(), common::fixed_now())?;
    let m = metrics::compute(&view.frame)?;

    assert_eq!(m.users_starting_kyc, 5);
    // C1, C3, C5 are open
    assert_eq!(m.completed_kyc, 3);
    // K10 (open) counts; K20's case is closed
    assert_eq!(m.aml_alerts, 1);
    // K30, open + need_review
    assert_eq!(m.idv_alerts, 1);
    // K50: document check on an open case, entity tagged VIP_Customer
    assert_eq!(m.document_alerts_individuals, 1);
    // No document check on an open case with entity_type exactly "business"
    assert_eq!(m.document_alerts_companies, 0);
    Ok(())
}

#[test]
fn test_end_to_end_scenario() -> Result<()> {
    // Two cases created today, all filters at their defaults
    let df = df!(
        "case_id" => ["1", "2"],
        "check_id" => ["10", "20"],
        "cases_status" => ["open", "closed"],
        "check_type" => ["aml", "aml"],
        "check_status" => ["need_review", "need_review"],
        "entity_type" => ["Individual", "business"],
        "country" => ["US", "US"],
        "risk_level" => ["high", "low"],
        "created_at" => ["2025-03-15 08:00:00", "2025-03-15 09:00:00"],
    )?;
    let dataset = kycdash::data::from_frame(df)?;
    let view = apply_filters(&dataset, &FilterState::default(), common::fixed_now())?;
    let m = metrics::compute(&view.frame)?;

    assert_eq!(m.users_starting_kyc, 2);
    assert_eq!(m.completed_kyc, 1);
    // Case 2 is excluded: "closed" is not in {open, approved}
    assert_eq!(m.aml_alerts, 1);
    Ok(())
}

#[test]
fn test_metrics_recompute_after_filtering() -> Result<()> {
    let dataset = common::sample_dataset();
    let state = FilterState {
        country: Some("DE".to_string()),
        ..Default::default()
    };
    let view = apply_filters(&dataset, &state, common::fixed_now())?;
    let m = metrics::compute(&view.frame)?;

    assert_eq!(m.users_starting_kyc, 1);
    assert_eq!(m.aml_alerts, 0);
    assert_eq!(m.idv_alerts, 1);
    Ok(())
}

#[test]
fn test_duplicate_check_ids_count_once() -> Result<()> {
    let df = df!(
        "case_id" => ["1", "1"],
        "check_id" => ["10", "10"],
        "cases_status" => ["open", "open"],
        "check_type" => ["aml", "aml"],
        "check_status" => ["need_review", "need_review"],
        "entity_type" => ["Individual", "Individual"],
        "country" => ["US", "US"],
        "risk_level" => ["high", "high"],
        "created_at" => ["2025-03-15 08:00:00", "2025-03-15 08:00:00"],
    )?;
    let dataset = kycdash::data::from_frame(df)?;
    let m = metrics::compute(&dataset.frame)?;
    assert_eq!(m.aml_alerts, 1);
    assert_eq!(m.users_starting_kyc, 1);
    Ok(())
}
