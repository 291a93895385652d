use color_eyre::Result;
use polars::prelude::*;

/// Tags marking a case subject as an individual rather than a company. The
/// match is substring containment, so `entity_type` values that concatenate
/// several tags still count.
pub const INDIVIDUAL_TAGS: [&str; 5] = [
    "POA Lookback (1.14.2025)",
    "Individual",
    "True Match - PEP",
    "Employee",
    "VIP_Customer",
];

/// The six summary counters shown as tiles. Each counts distinct identifiers
/// matching a predicate, never rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Metrics {
    pub users_starting_kyc: u32,
    pub completed_kyc: u32,
    pub aml_alerts: u32,
    pub idv_alerts: u32,
    pub document_alerts_individuals: u32,
    pub document_alerts_companies: u32,
}

impl Metrics {
    /// Label/value pairs in tile display order.
    pub fn tiles(&self) -> [(&'static str, u32); 6] {
        [
            ("Users Starting KYC", self.users_starting_kyc),
            ("Completed KYC (In Review)", self.completed_kyc),
            ("AML Alerts", self.aml_alerts),
            ("IDV Alerts", self.idv_alerts),
            ("Document Alerts (Individuals)", self.document_alerts_individuals),
            ("Document Alerts (Companies)", self.document_alerts_companies),
        ]
    }
}

fn open_case() -> Expr {
    col("cases_status").eq(lit("open"))
}

fn needs_review() -> Expr {
    col("check_status").eq(lit("need_review"))
}

/// OR of substring containment over the individual tag set. A null
/// entity_type propagates to null and is dropped by the filter.
fn entity_is_individual() -> Expr {
    let mut expr = col("entity_type")
        .str()
        .contains_literal(lit(INDIVIDUAL_TAGS[0]));
    for tag in &INDIVIDUAL_TAGS[1..] {
        expr = expr.or(col("entity_type").str().contains_literal(lit(*tag)));
    }
    expr
}

/// Count distinct non-null `key` values among rows matching `predicate`.
fn distinct_count(frame: &DataFrame, predicate: Option<Expr>, key: &str) -> Result<u32> {
    let mut lf = frame.clone().lazy();
    if let Some(predicate) = predicate {
        lf = lf.filter(predicate);
    }
    let counted = lf
        .select([col(key).drop_nulls().n_unique().alias("n")])
        .collect()?;
    let n = counted
        .column("n")?
        .as_materialized_series()
        .u32()?
        .get(0)
        .unwrap_or(0);
    Ok(n)
}

/// Derive all six counters from the filtered frame.
pub fn compute(frame: &DataFrame) -> Result<Metrics> {
    let users_starting_kyc = distinct_count(frame, None, "case_id")?;
    let completed_kyc = distinct_count(frame, Some(open_case()), "case_id")?;

    let aml_alerts = distinct_count(
        frame,
        Some(
            col("check_type")
                .eq(lit("aml"))
                .and(needs_review())
                .and(
                    col("cases_status")
                        .eq(lit("open"))
                        .or(col("cases_status").eq(lit("approved"))),
                ),
        ),
        "check_id",
    )?;

    let idv_alerts = distinct_count(
        frame,
        Some(
            col("check_type")
                .eq(lit("id_verification"))
                .and(needs_review())
                .and(open_case()),
        ),
        "check_id",
    )?;

    let document_alerts_individuals = distinct_count(
        frame,
        Some(
            col("check_type")
                .eq(lit("id_document"))
                .or(col("check_type").eq(lit("document")))
                .and(needs_review())
                .and(open_case())
                .and(entity_is_individual()),
        ),
        "check_id",
    )?;

    let document_alerts_companies = distinct_count(
        frame,
        Some(
            col("check_type")
                .eq(lit("document"))
                .and(needs_review())
                .and(open_case())
                .and(col("entity_type").eq(lit("business"))),
        ),
        "check_id",
    )?;

    Ok(Metrics {
        users_starting_kyc,
        completed_kyc,
        aml_alerts,
        idv_alerts,
        document_alerts_individuals,
        document_alerts_companies,
    })
}
