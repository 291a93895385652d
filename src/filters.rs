use chrono::{Duration, NaiveDateTime};
use color_eyre::Result;
use polars::prelude::*;

use crate::data::{Dataset, CREATED_AT};

/// Relative date-range selection. `HistoricalData` applies no date filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateRange {
    #[default]
    HistoricalData,
    LastDay,
    LastWeek,
    Last15Days,
    LastMonth,
}

impl DateRange {
    pub fn label(&self) -> &'static str {
        match self {
            DateRange::HistoricalData => "Historical Data",
            DateRange::LastDay => "Last Day",
            DateRange::LastWeek => "Last Week",
            DateRange::Last15Days => "Last 15 Days",
            DateRange::LastMonth => "Last Month",
        }
    }

    pub fn iterator() -> impl Iterator<Item = DateRange> {
        [
            DateRange::HistoricalData,
            DateRange::LastDay,
            DateRange::LastWeek,
            DateRange::Last15Days,
            DateRange::LastMonth,
        ]
        .iter()
        .copied()
    }

    /// The option after this one, wrapping around.
    pub fn next(&self) -> DateRange {
        match self {
            DateRange::HistoricalData => DateRange::LastDay,
            DateRange::LastDay => DateRange::LastWeek,
            DateRange::LastWeek => DateRange::Last15Days,
            DateRange::Last15Days => DateRange::LastMonth,
            DateRange::LastMonth => DateRange::HistoricalData,
        }
    }

    /// Inclusive lower bound for `created_at`; None means no date filtering.
    pub fn cutoff(&self, now: NaiveDateTime) -> Option<NaiveDateTime> {
        let days = match self {
            DateRange::HistoricalData => return None,
            DateRange::LastDay => 1,
            DateRange::LastWeek => 7,
            DateRange::Last15Days => 15,
            DateRange::LastMonth => 30,
        };
        Some(now - Duration::days(days))
    }
}

/// The four categorical filters, in application order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryField {
    CaseStatus,
    CheckType,
    RiskLevel,
    Country,
}

impl CategoryField {
    pub const ALL: [CategoryField; 4] = [
        CategoryField::CaseStatus,
        CategoryField::CheckType,
        CategoryField::RiskLevel,
        CategoryField::Country,
    ];

    pub fn column(&self) -> &'static str {
        match self {
            CategoryField::CaseStatus => "cases_status",
            CategoryField::CheckType => "check_type",
            CategoryField::RiskLevel => "risk_level",
            CategoryField::Country => "country",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CategoryField::CaseStatus => "Case Status",
            CategoryField::CheckType => "Check Type",
            CategoryField::RiskLevel => "Risk Level",
            CategoryField::Country => "Country",
        }
    }
}

/// Current filter selections. `None` is the "All" sentinel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub date_range: DateRange,
    pub case_status: Option<String>,
    pub check_type: Option<String>,
    pub risk_level: Option<String>,
    pub country: Option<String>,
}

impl FilterState {
    pub fn selection(&self, field: CategoryField) -> Option<&str> {
        match field {
            CategoryField::CaseStatus => self.case_status.as_deref(),
            CategoryField::CheckType => self.check_type.as_deref(),
            CategoryField::RiskLevel => self.risk_level.as_deref(),
            CategoryField::Country => self.country.as_deref(),
        }
    }

    pub fn set_selection(&mut self, field: CategoryField, value: Option<String>) {
        match field {
            CategoryField::CaseStatus => self.case_status = value,
            CategoryField::CheckType => self.check_type = value,
            CategoryField::RiskLevel => self.risk_level = value,
            CategoryField::Country => self.country = value,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Dropdown option lists, derived from the date-filtered frame so they can
/// shrink as the date range narrows.
#[derive(Debug, Clone, Default)]
pub struct FilterOptions {
    pub case_status: Vec<String>,
    pub check_type: Vec<String>,
    pub risk_level: Vec<String>,
    pub country: Vec<String>,
}

impl FilterOptions {
    pub fn for_field(&self, field: CategoryField) -> &[String] {
        match field {
            CategoryField::CaseStatus => &self.case_status,
            CategoryField::CheckType => &self.check_type,
            CategoryField::RiskLevel => &self.risk_level,
            CategoryField::Country => &self.country,
        }
    }
}

/// Result of one pass through the filter pipeline.
#[derive(Debug, Clone)]
pub struct FilteredView {
    pub frame: DataFrame,
    pub options: FilterOptions,
}

/// Keep rows with `created_at >= now - offset`. No-op for `HistoricalData`
/// or when the dataset has no usable date column.
pub fn apply_date_range(
    dataset: &Dataset,
    range: DateRange,
    now: NaiveDateTime,
) -> Result<DataFrame> {
    let Some(cutoff) = range.cutoff(now) else {
        return Ok(dataset.frame.clone());
    };
    if !dataset.date_available {
        return Ok(dataset.frame.clone());
    }
    let filtered = dataset
        .frame
        .clone()
        .lazy()
        .filter(col(CREATED_AT).gt_eq(lit(cutoff)))
        .collect()?;
    Ok(filtered)
}

/// Distinct non-null values of a column in first-occurrence order. An absent
/// column yields an empty list.
pub fn distinct_values(df: &DataFrame, column: &str) -> Result<Vec<String>> {
    let Ok(values) = df.column(column) else {
        return Ok(Vec::new());
    };
    let uniques = values
        .as_materialized_series()
        .drop_nulls()
        .unique_stable()?;
    Ok(uniques
        .iter()
        .map(|value| value.str_value().into_owned())
        .collect())
}

/// Exact-match retain on one column. `None` (the "All" sentinel) is a no-op.
pub fn apply_selection(frame: DataFrame, column: &str, selection: Option<&str>) -> Result<DataFrame> {
    let Some(value) = selection else {
        return Ok(frame);
    };
    let filtered = frame
        .lazy()
        .filter(col(column).eq(lit(value)))
        .collect()?;
    Ok(filtered)
}

/// Full pipeline: date range first, then option lists from the date-filtered
/// frame, then the categorical filters conjunctively in fixed order. A stale
/// selection stays applied even when it no longer appears in the options;
/// the result is simply empty.
pub fn apply_filters(
    dataset: &Dataset,
    state: &FilterState,
    now: NaiveDateTime,
) -> Result<FilteredView> {
    let dated = apply_date_range(dataset, state.date_range, now)?;

    let options = FilterOptions {
        case_status: distinct_values(&dated, CategoryField::CaseStatus.column())?,
        check_type: distinct_values(&dated, CategoryField::CheckType.column())?,
        risk_level: distinct_values(&dated, CategoryField::RiskLevel.column())?,
        country: distinct_values(&dated, CategoryField::Country.column())?,
    };

    let mut frame = dated;
    for field in CategoryField::ALL {
        frame = apply_selection(frame, field.column(), state.selection(field))?;
    }

    Ok(FilteredView { frame, options })
}
