use std::collections::BTreeMap;
use std::fmt;

use super::error::DataError;
use super::model::{Dataset, Value};

/// Lower edge of the first age bucket.
pub const BUCKET_START: i64 = 10;
/// Upper edge (exclusive) of the last age bucket.
pub const BUCKET_END: i64 = 100;
pub const BUCKET_WIDTH: i64 = 10;

// ---------------------------------------------------------------------------
// Age buckets
// ---------------------------------------------------------------------------

/// Half-open interval `[lower, upper)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AgeBucket {
    pub lower: i64,
    pub upper: i64,
}

impl AgeBucket {
    /// The bucket containing `age`, or `None` outside `[10, 100)`.
    pub fn for_age(age: f64) -> Option<Self> {
        if age.is_nan() || age < BUCKET_START as f64 || age >= BUCKET_END as f64 {
            return None;
        }
        let slot = ((age - BUCKET_START as f64) / BUCKET_WIDTH as f64).floor() as i64;
        let lower = BUCKET_START + slot * BUCKET_WIDTH;
        Some(AgeBucket {
            lower,
            upper: lower + BUCKET_WIDTH,
        })
    }

    /// Midpoint, used as the bar position in the chart.
    pub fn center(&self) -> f64 {
        (self.lower + self.upper) as f64 / 2.0
    }
}

impl fmt::Display for AgeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.lower, self.upper)
    }
}

// ---------------------------------------------------------------------------
// Conversion by bucket
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct BucketRate {
    pub bucket: AgeBucket,
    /// Rows that fell into the bucket (never zero).
    pub total: usize,
    /// Rows whose outcome equals the positive value.
    pub accepted: usize,
    /// `100 * accepted / total`.
    pub rate_percent: f64,
}

/// Conversion rate per non-empty age bucket, ascending by bucket.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConversionSummary {
    pub buckets: Vec<BucketRate>,
}

impl ConversionSummary {
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Tabular form for display and export.
    pub fn to_dataset(&self) -> Result<Dataset, DataError> {
        let rows = self
            .buckets
            .iter()
            .map(|b| {
                vec![
                    Value::String(b.bucket.to_string()),
                    Value::Integer(b.total as i64),
                    Value::Integer(b.accepted as i64),
                    Value::Float(b.rate_percent),
                ]
            })
            .collect();
        Dataset::from_rows(
            vec![
                "age_bucket".to_string(),
                "rows".to_string(),
                "accepted".to_string(),
                "conversion_rate".to_string(),
            ],
            rows,
        )
    }
}

#[cfg(test)]
impl ConversionSummary {
    pub fn rate_for(&self, bucket: AgeBucket) -> Option<f64> {
        self.buckets
            .iter()
            .find(|b| b.bucket == bucket)
            .map(|b| b.rate_percent)
    }
}

/// Bucket `subset` by age and compute the share of positive outcomes per bucket.
///
/// Rows with a non-numeric age or an age outside `[10, 100)` are left out.
/// Buckets without rows are omitted rather than reported as zero.
pub fn conversion_by_bucket(
    subset: &Dataset,
    age_col: &str,
    outcome_col: &str,
    positive_value: &Value,
) -> Result<ConversionSummary, DataError> {
    let age_idx = subset.column_index(age_col)?;
    let outcome_idx = subset.column_index(outcome_col)?;

    let mut counts: BTreeMap<AgeBucket, (usize, usize)> = BTreeMap::new();
    for row in &subset.rows {
        let Some(bucket) = row[age_idx].as_f64().and_then(AgeBucket::for_age) else {
            continue;
        };
        let entry = counts.entry(bucket).or_default();
        entry.0 += 1;
        if row[outcome_idx] == *positive_value {
            entry.1 += 1;
        }
    }

    let buckets = counts
        .into_iter()
        .map(|(bucket, (total, accepted))| BucketRate {
            bucket,
            total,
            accepted,
            rate_percent: percent(accepted, total),
        })
        .collect();

    Ok(ConversionSummary { buckets })
}

// ---------------------------------------------------------------------------
// Overall acceptance and outcome proportions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AcceptanceSummary {
    pub total: usize,
    pub accepted: usize,
    /// Zero when there are no rows.
    pub rate_percent: f64,
}

pub fn acceptance_summary(
    subset: &Dataset,
    outcome_col: &str,
    positive_value: &Value,
) -> Result<AcceptanceSummary, DataError> {
    let accepted = subset
        .column_values(outcome_col)?
        .filter(|v| *v == positive_value)
        .count();
    let total = subset.len();
    Ok(AcceptanceSummary {
        total,
        accepted,
        rate_percent: percent(accepted, total),
    })
}

/// Share of each distinct outcome, most frequent first.
///
/// Returns a two-column table `[outcome_col, "proportion"]`.
pub fn outcome_proportions(subset: &Dataset, outcome_col: &str) -> Result<Dataset, DataError> {
    let mut counts: BTreeMap<&Value, usize> = BTreeMap::new();
    for v in subset.column_values(outcome_col)? {
        *counts.entry(v).or_default() += 1;
    }

    let mut ordered: Vec<(&Value, usize)> = counts.into_iter().collect();
    // Stable sort keeps value order among ties.
    ordered.sort_by(|a, b| b.1.cmp(&a.1));

    let total = subset.len() as f64;
    let rows = ordered
        .into_iter()
        .map(|(v, n)| vec![v.clone(), Value::Float(n as f64 / total)])
        .collect();

    Dataset::from_rows(vec![outcome_col.to_string(), "proportion".to_string()], rows)
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        100.0 * part as f64 / whole as f64
    }
}
