//! View state and its transitions.
//!
//! Every change to what is displayed goes through [`ViewState::apply`],
//! which consumes the old state and an event and returns the new state.

use crate::analysis::{aggregate, is_sorted_by, sort_rows};
use crate::dataset::DatasetError;
use crate::models::{AggregateRow, Record, SalaryPolicy, SortKey, SortState};
use tracing::debug;

/// Display state of a single table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableDisplay {
    /// Nothing to show; the table is not rendered at all.
    Empty,
    /// Heading, header row and one row per item.
    Populated,
}

impl TableDisplay {
    pub fn of<T>(items: &[T]) -> Self {
        if items.is_empty() {
            TableDisplay::Empty
        } else {
            TableDisplay::Populated
        }
    }
}

/// Something that happened to the view.
#[derive(Debug, Clone)]
pub enum ViewEvent {
    /// The dataset finished loading.
    Loaded(Vec<Record>),
    /// A column header of the aggregate table was clicked.
    HeaderClicked(SortKey),
}

/// Everything the view displays.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    /// Raw records in parse order.
    pub records: Vec<Record>,
    /// Aggregate rows in display order.
    pub rows: Vec<AggregateRow>,
    /// Active sort of the aggregate table.
    pub sort: SortState,
    /// Treatment of malformed salaries on load.
    pub policy: SalaryPolicy,
}

impl ViewState {
    pub fn new(policy: SalaryPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Apply an event, producing the next state.
    pub fn apply(self, event: ViewEvent) -> Result<ViewState, DatasetError> {
        match event {
            ViewEvent::Loaded(records) => {
                let rows = aggregate(&records, self.policy)?;
                let rows = sort_rows(&rows, self.sort.key, self.sort.direction);
                debug!(
                    "Loaded {} records into {} rows, sorted by {}",
                    records.len(),
                    rows.len(),
                    self.sort
                );

                Ok(ViewState {
                    records,
                    rows,
                    ..self
                })
            }
            ViewEvent::HeaderClicked(key) => {
                let sort = self.sort.toggle(key);
                let rows = sort_rows(&self.rows, sort.key, sort.direction);
                debug_assert!(is_sorted_by(&rows, sort.key, sort.direction));
                debug!("Sorted aggregate table by {}", sort);

                Ok(ViewState { rows, sort, ..self })
            }
        }
    }

    /// Apply a sequence of header clicks in order.
    pub fn click_all(self, keys: &[SortKey]) -> Result<ViewState, DatasetError> {
        keys.iter()
            .try_fold(self, |state, key| state.apply(ViewEvent::HeaderClicked(*key)))
    }

    pub fn aggregate_display(&self) -> TableDisplay {
        TableDisplay::of(&self.rows)
    }

    pub fn records_display(&self) -> TableDisplay {
        TableDisplay::of(&self.records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SortDirection;

    fn record(year: &str, salary: &str) -> Record {
        Record {
            work_year: year.to_string(),
            salary_in_usd: salary.to_string(),
            ..Record::default()
        }
    }

    fn example_records() -> Vec<Record> {
        vec![
            record("2020", "100000"),
            record("2020", "120000"),
            record("2021", "150000"),
        ]
    }

    fn years(state: &ViewState) -> Vec<&str> {
        state.rows.iter().map(|r| r.year.as_str()).collect()
    }

    #[test]
    fn test_initial_state_is_empty() {
        let state = ViewState::new(SalaryPolicy::Reject);
        assert_eq!(state.sort, SortState::default());
        assert_eq!(state.aggregate_display(), TableDisplay::Empty);
        assert_eq!(state.records_display(), TableDisplay::Empty);
    }

    #[test]
    fn test_load_then_click_year() {
        let state = ViewState::new(SalaryPolicy::Reject)
            .apply(ViewEvent::Loaded(example_records()))
            .unwrap();

        assert_eq!(years(&state), vec!["2020", "2021"]);
        assert_eq!(state.rows[0].total_jobs, 2);
        assert_eq!(state.rows[0].average_salary, 110000.0);
        assert_eq!(state.aggregate_display(), TableDisplay::Populated);
        assert_eq!(state.records_display(), TableDisplay::Populated);

        let state = state.apply(ViewEvent::HeaderClicked(SortKey::Year)).unwrap();
        assert_eq!(years(&state), vec!["2021", "2020"]);
        assert_eq!(state.sort.direction, SortDirection::Descending);
    }

    #[test]
    fn test_load_applies_default_sort() {
        let records = vec![record("2022", "1"), record("2020", "1"), record("2021", "1")];

        let state = ViewState::new(SalaryPolicy::Reject)
            .apply(ViewEvent::Loaded(records))
            .unwrap();

        assert_eq!(years(&state), vec!["2020", "2021", "2022"]);
        // Raw records stay in parse order
        assert_eq!(state.records[0].work_year, "2022");
    }

    #[test]
    fn test_same_key_twice() {
        let state = ViewState::new(SalaryPolicy::Reject)
            .apply(ViewEvent::Loaded(example_records()))
            .unwrap()
            .click_all(&[SortKey::TotalJobs])
            .unwrap();
        assert_eq!(state.sort.direction, SortDirection::Ascending);
        assert_eq!(years(&state), vec!["2021", "2020"]);

        let state = state.click_all(&[SortKey::TotalJobs]).unwrap();
        assert_eq!(state.sort.direction, SortDirection::Descending);
        assert_eq!(years(&state), vec!["2020", "2021"]);
    }

    #[test]
    fn test_other_key_resets_to_ascending() {
        let state = ViewState::new(SalaryPolicy::Reject)
            .apply(ViewEvent::Loaded(example_records()))
            .unwrap()
            .click_all(&[SortKey::Year, SortKey::AverageSalary])
            .unwrap();

        assert_eq!(state.sort.key, SortKey::AverageSalary);
        assert_eq!(state.sort.direction, SortDirection::Ascending);
        assert_eq!(years(&state), vec!["2020", "2021"]);
    }

    #[test]
    fn test_empty_load_stays_empty() {
        let state = ViewState::new(SalaryPolicy::Reject)
            .apply(ViewEvent::Loaded(Vec::new()))
            .unwrap()
            .click_all(&[SortKey::Year])
            .unwrap();

        assert!(state.rows.is_empty());
        assert_eq!(state.aggregate_display(), TableDisplay::Empty);
        assert_eq!(state.records_display(), TableDisplay::Empty);
    }

    #[test]
    fn test_load_rejects_bad_salary() {
        let result = ViewState::new(SalaryPolicy::Reject)
            .apply(ViewEvent::Loaded(vec![record("2020", "oops")]));
        assert!(result.is_err());
    }
}
