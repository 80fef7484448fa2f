use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::config::AppConfig;
use crate::data::aggregate::{
    AcceptanceSummary, ConversionSummary, acceptance_summary, conversion_by_bucket,
    outcome_proportions,
};
use crate::data::error::DataError;
use crate::data::filter::{AgeRange, Criterion, FilterCriteria, apply_filters};
use crate::data::loader::load_file;
use crate::data::model::{Dataset, Value};
use crate::export;

// ---------------------------------------------------------------------------
// Sidebar draft: what the form shows before "Apply" is pressed
// ---------------------------------------------------------------------------

/// State of one multiselect: the `all` entry plus individually ticked values.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub all: bool,
    pub values: BTreeSet<Value>,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            all: true,
            values: BTreeSet::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FilterDraft {
    pub age_min: f64,
    pub age_max: f64,
    /// One entry per configured filter column.
    pub selections: BTreeMap<String, Selection>,
}

impl FilterDraft {
    fn new(config: &AppConfig, bounds: (f64, f64)) -> Self {
        let (lo, hi) = bounds;
        let (min, max) = config.initial_age_range;
        Self {
            age_min: min.max(lo).min(hi),
            age_max: max.max(lo).min(hi),
            selections: config
                .filter_columns
                .iter()
                .map(|c| (c.clone(), Selection::default()))
                .collect(),
        }
    }

    /// Turn the form into filter criteria.
    pub fn to_criteria(&self, age_column: &str) -> FilterCriteria {
        let range = AgeRange::new(self.age_min.min(self.age_max), self.age_max.max(self.age_min));
        self.selections.iter().fold(
            FilterCriteria::new(age_column, range),
            |criteria, (col, sel)| {
                criteria.with(col.clone(), Criterion::from_selection(sel.all, &sel.values))
            },
        )
    }
}

// ---------------------------------------------------------------------------
// Derived results
// ---------------------------------------------------------------------------

/// Everything recomputed from the full dataset on each "Apply".
#[derive(Debug, Clone)]
pub struct Results {
    pub age_range: AgeRange,
    pub filtered: Dataset,
    pub acceptance: AcceptanceSummary,
    pub conversion: ConversionSummary,
    pub conversion_table: Dataset,
    pub proportions: Dataset,
}

/// Tables offered as spreadsheet downloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Raw,
    Filtered,
    Proportions,
    Conversion,
}

impl ExportKind {
    pub fn default_file_name(self) -> &'static str {
        match self {
            ExportKind::Raw => "bank_raw_y.xlsx",
            ExportKind::Filtered => "bank_filtered.xlsx",
            ExportKind::Proportions => "bank_y.xlsx",
            ExportKind::Conversion => "bank_conversion.xlsx",
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: AppConfig,

    /// Loaded dataset (None until a file is opened).
    pub dataset: Option<Dataset>,

    /// Min/max of the age column, used as slider bounds.
    pub age_bounds: (f64, f64),

    /// Sidebar form contents.
    pub draft: FilterDraft,

    /// Criteria of the last successful "Apply" (None shows the full dataset).
    pub applied: Option<FilterCriteria>,

    pub results: Option<Results>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether a file loading operation is in progress.
    pub loading: bool,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let draft = FilterDraft::new(&config, (0.0, 100.0));
        Self {
            config,
            dataset: None,
            age_bounds: (0.0, 100.0),
            draft,
            applied: None,
            results: None,
            status_message: None,
            loading: false,
        }
    }

    /// Load a dataset from disk, reporting failures in the status line.
    pub fn load_path(&mut self, path: &Path) {
        self.loading = true;
        let loaded = self
            .config
            .load_options()
            .and_then(|options| load_file(path, &options));
        match loaded {
            Ok(dataset) => self.set_dataset(dataset),
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
                self.loading = false;
            }
        }
    }

    /// Ingest a newly loaded dataset, reset the form and show unfiltered results.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.age_bounds = match dataset.numeric_bounds(&self.config.age_column) {
            Ok(Some(bounds)) => bounds,
            Ok(None) | Err(_) => {
                log::warn!(
                    "Column '{}' has no numeric values; age slider uses 0..=100",
                    self.config.age_column
                );
                (0.0, 100.0)
            }
        };
        self.draft = FilterDraft::new(&self.config, self.age_bounds);
        self.applied = None;
        self.status_message = None;
        self.loading = false;

        let all_ages = AgeRange::new(self.age_bounds.0, self.age_bounds.1);
        self.results = match self.summarize(dataset.clone(), all_ages) {
            Ok(results) => Some(results),
            Err(e) => {
                log::error!("Cannot summarize dataset: {e}");
                self.status_message = Some(format!("Error: {e}"));
                None
            }
        };
        self.dataset = Some(dataset);
    }

    /// Recompute every result from the full dataset using the form contents.
    pub fn apply(&mut self) {
        let Some(dataset) = &self.dataset else {
            return;
        };
        let criteria = self.draft.to_criteria(&self.config.age_column);
        let outcome = apply_filters(dataset, &criteria)
            .and_then(|filtered| self.summarize(filtered, criteria.age_range));

        match outcome {
            Ok(results) => {
                log::info!(
                    "Filters applied: {} of {} rows match",
                    results.filtered.len(),
                    dataset.len()
                );
                self.results = Some(results);
                self.applied = Some(criteria);
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Filtering failed: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    fn summarize(&self, filtered: Dataset, age_range: AgeRange) -> Result<Results, DataError> {
        let cfg = &self.config;
        let positive = cfg.positive_value();
        let acceptance = acceptance_summary(&filtered, &cfg.outcome_column, &positive)?;
        let conversion =
            conversion_by_bucket(&filtered, &cfg.age_column, &cfg.outcome_column, &positive)?;
        let conversion_table = conversion.to_dataset()?;
        let proportions = outcome_proportions(&filtered, &cfg.outcome_column)?;
        Ok(Results {
            age_range,
            filtered,
            acceptance,
            conversion,
            conversion_table,
            proportions,
        })
    }

    /// Toggle a single value in a column's multiselect.
    pub fn toggle_value(&mut self, column: &str, value: &Value) {
        let selection = self.draft.selections.entry(column.to_string()).or_default();
        if !selection.values.remove(value) {
            selection.values.insert(value.clone());
        }
    }

    /// Set the `all` entry of a column's multiselect.
    pub fn set_all(&mut self, column: &str, all: bool) {
        self.draft
            .selections
            .entry(column.to_string())
            .or_default()
            .all = all;
    }

    /// Number of rows currently shown as "filtered".
    pub fn visible_rows(&self) -> usize {
        self.results.as_ref().map_or(0, |r| r.filtered.len())
    }

    pub fn table(&self, kind: ExportKind) -> Option<&Dataset> {
        match kind {
            ExportKind::Raw => self.dataset.as_ref(),
            ExportKind::Filtered => self.results.as_ref().map(|r| &r.filtered),
            ExportKind::Proportions => self.results.as_ref().map(|r| &r.proportions),
            ExportKind::Conversion => self.results.as_ref().map(|r| &r.conversion_table),
        }
    }

    /// Write one of the tables to `path` as a spreadsheet.
    pub fn export(&mut self, kind: ExportKind, path: &Path) {
        let Some(table) = self.table(kind) else {
            return;
        };
        if let Err(e) = export::save_xlsx(table, export::SHEET_NAME, path) {
            log::error!("Export failed: {e:#}");
            self.status_message = Some(format!("Error: {e:#}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::aggregate::AgeBucket;

    fn config() -> AppConfig {
        AppConfig {
            filter_columns: vec!["job".into(), "marital".into()],
            ..AppConfig::default()
        }
    }

    fn bank() -> Dataset {
        let rows = [
            (25, "admin", "married", "yes"),
            (35, "blue-collar", "single", "no"),
            (45, "admin", "married", "yes"),
            (55, "blue-collar", "married", "no"),
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

    fn loaded() -> AppState {
        let mut state = AppState::new(config());
        state.set_dataset(bank());
        state
    }

    #[test]
    fn test_unfiltered_before_apply() {
        let state = loaded();
        assert!(state.applied.is_none());
        assert_eq!(state.visible_rows(), 4);
        let results = state.results.as_ref().unwrap();
        assert_eq!(results.acceptance.accepted, 2);
        assert_eq!(results.acceptance.rate_percent, 50.0);
    }

    #[test]
    fn test_initial_age_range_clamped_to_bounds() {
        let state = loaded();
        assert_eq!(state.age_bounds, (25.0, 55.0));
        assert_eq!(state.draft.age_min, 30.0);
        assert_eq!(state.draft.age_max, 50.0);
        assert!(state.draft.selections.values().all(|s| s.all));
    }

    #[test]
    fn test_apply_default_form_filters_age() {
        let mut state = loaded();
        state.apply();
        let results = state.results.as_ref().unwrap();
        assert_eq!(results.filtered.len(), 2);
        assert_eq!(
            results.conversion.rate_for(AgeBucket { lower: 30, upper: 40 }),
            Some(0.0)
        );
        assert_eq!(
            results.conversion.rate_for(AgeBucket { lower: 40, upper: 50 }),
            Some(100.0)
        );
    }

    #[test]
    fn test_deselecting_wildcard_without_values_empties_result() {
        let mut state = loaded();
        state.set_all("job", false);
        state.apply();
        let results = state.results.as_ref().unwrap();
        assert!(results.filtered.is_empty());
        assert!(results.conversion.is_empty());
        assert_eq!(results.acceptance.rate_percent, 0.0);
        assert!(results.proportions.is_empty());
    }

    #[test]
    fn test_wildcard_kept_when_values_ticked() {
        let mut state = loaded();
        state.toggle_value("job", &Value::from("admin"));
        state.apply();
        assert_eq!(state.visible_rows(), 2);

        state.set_all("job", false);
        state.apply();
        assert_eq!(state.visible_rows(), 1);

        state.toggle_value("job", &Value::from("admin"));
        state.apply();
        assert_eq!(state.visible_rows(), 0);
    }

    #[test]
    fn test_draft_to_criteria() {
        let mut state = loaded();
        state.toggle_value("job", &Value::from("admin"));
        state.set_all("marital", false);
        state.toggle_value("marital", &Value::from("single"));
        state.draft.age_min = 60.0;
        state.draft.age_max = 20.0;

        let criteria = state.draft.to_criteria("age");
        assert_eq!(criteria.age_range, AgeRange::new(20.0, 60.0));
        assert_eq!(criteria.columns["job"], Criterion::Wildcard);
        assert_eq!(
            criteria.columns["marital"],
            Criterion::Values([Value::from("single")].into_iter().collect())
        );
    }

    #[test]
    fn test_missing_filter_column_reported() {
        let mut state = AppState::new(AppConfig {
            filter_columns: vec!["education".into()],
            ..AppConfig::default()
        });
        state.set_dataset(bank());
        state.apply();
        assert!(state.applied.is_none());
        assert!(state
            .status_message
            .as_deref()
            .unwrap()
            .contains("education"));
    }

    #[test]
    fn test_each_apply_recomputes_from_full_dataset() {
        let mut state = loaded();
        state.draft.age_min = 50.0;
        state.draft.age_max = 60.0;
        state.apply();
        assert_eq!(state.visible_rows(), 1);

        state.draft.age_min = 20.0;
        state.apply();
        assert_eq!(state.visible_rows(), 4);
    }

    #[test]
    fn test_export_tables() {
        let mut state = loaded();
        state.apply();
        assert_eq!(state.table(ExportKind::Raw).unwrap().len(), 4);
        assert_eq!(state.table(ExportKind::Filtered).unwrap().len(), 2);
        assert_eq!(state.table(ExportKind::Conversion).unwrap().len(), 2);

        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(ExportKind::Proportions.default_file_name());
        state.export(ExportKind::Proportions, &path);
        assert!(state.status_message.is_none());
        assert!(path.exists());
    }
}
