use std::collections::{BTreeMap, BTreeSet};

use super::error::DataError;
use super::model::{Dataset, Value};

// ---------------------------------------------------------------------------
// Criterion: which values of one categorical column are allowed
// ---------------------------------------------------------------------------

/// Label shown next to the concrete values of a multiselect.
pub const WILDCARD_LABEL: &str = "all";

/// Per-column filtering rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Criterion {
    /// No restriction on this column.
    Wildcard,
    /// Only rows whose value is in the set pass. An empty set matches nothing.
    Values(BTreeSet<Value>),
}

impl Criterion {
    /// Build a criterion from a multiselect state.
    ///
    /// The wildcard wins over any concurrently selected values.
    pub fn from_selection(all: bool, values: &BTreeSet<Value>) -> Self {
        if all {
            Criterion::Wildcard
        } else {
            Criterion::Values(values.clone())
        }
    }

    pub fn matches(&self, value: &Value) -> bool {
        match self {
            Criterion::Wildcard => true,
            Criterion::Values(allowed) => allowed.contains(value),
        }
    }
}

// ---------------------------------------------------------------------------
// Numeric range on the age column
// ---------------------------------------------------------------------------

/// Inclusive `[min, max]` range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgeRange {
    pub min: f64,
    pub max: f64,
}

impl AgeRange {
    pub fn new(min: f64, max: f64) -> Self {
        AgeRange { min, max }
    }

    /// Non-numeric cells never fall inside the range.
    pub fn contains(&self, value: &Value) -> bool {
        value
            .as_f64()
            .is_some_and(|v| v >= self.min && v <= self.max)
    }
}

// ---------------------------------------------------------------------------
// Full criteria set
// ---------------------------------------------------------------------------

/// Everything the sidebar form submits: one age range plus categorical rules.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriteria {
    pub age_column: String,
    pub age_range: AgeRange,
    pub columns: BTreeMap<String, Criterion>,
}

impl FilterCriteria {
    pub fn new(age_column: impl Into<String>, age_range: AgeRange) -> Self {
        FilterCriteria {
            age_column: age_column.into(),
            age_range,
            columns: BTreeMap::new(),
        }
    }

    /// Builder-style helper to add a categorical criterion.
    pub fn with(mut self, column: impl Into<String>, criterion: Criterion) -> Self {
        self.columns.insert(column.into(), criterion);
        self
    }
}

/// Return indices of rows that pass the age range and every criterion.
///
/// Every referenced column is resolved up front, wildcards included, so a
/// typo in a column name surfaces as [`DataError::InvalidColumn`] even when
/// the criterion would not restrict anything.
pub fn filtered_indices(dataset: &Dataset, criteria: &FilterCriteria) -> Result<Vec<usize>, DataError> {
    let age_idx = dataset.column_index(&criteria.age_column)?;

    let mut active: Vec<(usize, &Criterion)> = Vec::new();
    for (col, criterion) in &criteria.columns {
        let idx = dataset.column_index(col)?;
        if *criterion != Criterion::Wildcard {
            active.push((idx, criterion));
        }
    }

    let indices: Vec<usize> = dataset
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| criteria.age_range.contains(&row[age_idx]))
        .filter(|(_, row)| {
            active
                .iter()
                .all(|(idx, criterion)| criterion.matches(&row[*idx]))
        })
        .map(|(i, _)| i)
        .collect();

    log::debug!(
        "filter kept {}/{} rows ({} restricting columns)",
        indices.len(),
        dataset.len(),
        active.len()
    );
    Ok(indices)
}

/// Materialize the rows matching `criteria` as a new dataset.
pub fn apply_filters(dataset: &Dataset, criteria: &FilterCriteria) -> Result<Dataset, DataError> {
    let indices = filtered_indices(dataset, criteria)?;
    Ok(dataset.select(&indices))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bank() -> Dataset {
        let rows = [
            (25, "admin", "married", "yes"),
            (35, "blue-collar", "single", "no"),
            (45, "admin", "married", "yes"),
            (55, "blue-collar", "married", "no"),
            (38, "admin", "single", "no"),
        ];
        Dataset::from_rows(
            vec!["age".into(), "job".into(), "marital".into(), "y".into()],
            rows.iter()
                .map(|(age, job, marital, y)| {
                    vec![Value::Integer(*age), (*job).into(), (*marital).into(), (*y).into()]
                })
                .collect(),
        )
        .unwrap()
    }

    fn values(vals: &[&str]) -> Criterion {
        Criterion::Values(vals.iter().map(|v| Value::from(*v)).collect())
    }

    fn everyone() -> FilterCriteria {
        FilterCriteria::new("age", AgeRange::new(0.0, 200.0))
    }

    #[test]
    fn test_age_range_is_inclusive() {
        let ds = bank();
        let criteria = FilterCriteria::new("age", AgeRange::new(35.0, 45.0));
        let out = apply_filters(&ds, &criteria).unwrap();
        let ages: Vec<_> = out.column_values("age").unwrap().cloned().collect();
        assert_eq!(
            ages,
            vec![Value::Integer(35), Value::Integer(45), Value::Integer(38)]
        );
    }

    #[test]
    fn test_age_range_scenario() {
        let ds = Dataset::from_rows(
            vec!["age".into(), "y".into()],
            vec![
                vec![Value::Integer(25), "yes".into()],
                vec![Value::Integer(35), "no".into()],
                vec![Value::Integer(45), "yes".into()],
                vec![Value::Integer(55), "no".into()],
            ],
        )
        .unwrap();
        let out = apply_filters(&ds, &FilterCriteria::new("age", AgeRange::new(30.0, 50.0))).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out.get(0, "y"), Some(&Value::from("no")));
        assert_eq!(out.get(1, "y"), Some(&Value::from("yes")));
    }

    #[test]
    fn test_wildcard_profession_with_married_only() {
        let ds = bank();
        let criteria = everyone()
            .with("job", Criterion::Wildcard)
            .with("marital", values(&["married"]));
        let out = apply_filters(&ds, &criteria).unwrap();
        assert_eq!(out.len(), 3);
        assert!(out
            .column_values("marital")
            .unwrap()
            .all(|v| *v == Value::from("married")));
        assert_eq!(out.unique_values["job"].len(), 2);
    }

    #[test]
    fn test_wildcard_equals_no_criterion() {
        let ds = bank();
        let with_wildcard = everyone()
            .with("job", Criterion::Wildcard)
            .with("marital", values(&["single"]));
        let without = everyone().with("marital", values(&["single"]));
        assert_eq!(
            apply_filters(&ds, &with_wildcard).unwrap(),
            apply_filters(&ds, &without).unwrap()
        );
    }

    #[test]
    fn test_empty_selection_yields_no_rows() {
        let ds = bank();
        let criteria = everyone().with("job", Criterion::Values(BTreeSet::new()));
        let out = apply_filters(&ds, &criteria).unwrap();
        assert!(out.is_empty());
        assert_eq!(out.column_names, ds.column_names);
    }

    #[test]
    fn test_wildcard_wins_over_specific_values() {
        let selected: BTreeSet<Value> = [Value::from("admin")].into_iter().collect();
        assert_eq!(Criterion::from_selection(true, &selected), Criterion::Wildcard);
        assert_eq!(
            Criterion::from_selection(false, &selected),
            Criterion::Values(selected.clone())
        );
    }

    #[test]
    fn test_unknown_column_is_invalid() {
        let ds = bank();
        let criteria = everyone().with("education", Criterion::Wildcard);
        assert_eq!(
            apply_filters(&ds, &criteria),
            Err(DataError::InvalidColumn("education".into()))
        );

        let bad_age = FilterCriteria::new("idade", AgeRange::new(0.0, 1.0));
        assert_eq!(
            filtered_indices(&ds, &bad_age),
            Err(DataError::InvalidColumn("idade".into()))
        );
    }

    #[test]
    fn test_result_is_subset_and_satisfies_criteria() {
        let ds = bank();
        let criteria = FilterCriteria::new("age", AgeRange::new(30.0, 60.0))
            .with("job", values(&["admin"]));
        let idx = filtered_indices(&ds, &criteria).unwrap();
        assert!(idx.len() <= ds.len());
        for i in idx {
            let row = &ds.rows[i];
            assert!(criteria.age_range.contains(&row[0]));
            assert!(criteria.columns["job"].matches(&row[1]));
        }
    }

    #[test]
    fn test_idempotent() {
        let ds = bank();
        let criteria = FilterCriteria::new("age", AgeRange::new(30.0, 50.0))
            .with("marital", values(&["single", "married"]))
            .with("y", values(&["no"]));
        let once = apply_filters(&ds, &criteria).unwrap();
        let twice = apply_filters(&once, &criteria).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_order_of_criteria_is_irrelevant() {
        let ds = bank();
        let job = values(&["admin"]);
        let marital = values(&["single"]);

        let by_job = everyone().with("job", job.clone());
        let by_marital = everyone().with("marital", marital.clone());

        let job_then_marital =
            apply_filters(&apply_filters(&ds, &by_job).unwrap(), &by_marital).unwrap();
        let marital_then_job =
            apply_filters(&apply_filters(&ds, &by_marital).unwrap(), &by_job).unwrap();
        let combined = apply_filters(&ds, &everyone().with("job", job).with("marital", marital)).unwrap();

        assert_eq!(job_then_marital, marital_then_job);
        assert_eq!(job_then_marital, combined);
        assert_eq!(combined.len(), 1);
    }

    #[test]
    fn test_non_numeric_age_is_excluded() {
        let ds = Dataset::from_rows(
            vec!["age".into()],
            vec![vec![Value::Null], vec![Value::from("unknown")], vec![Value::Integer(40)]],
        )
        .unwrap();
        let out = apply_filters(&ds, &everyone()).unwrap();
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_input_not_mutated() {
        let ds = bank();
        let before = ds.clone();
        let _ = apply_filters(&ds, &everyone().with("job", values(&["admin"]))).unwrap();
        assert_eq!(ds, before);
    }
}
