//! Aggregate table sorting.

use crate::models::{AggregateRow, SortDirection, SortKey};
use std::cmp::Ordering;

/// Compare two rows on a single column.
///
/// Salaries use `total_cmp`, so a NaN average sorts after every number.
pub fn compare_by(a: &AggregateRow, b: &AggregateRow, key: SortKey) -> Ordering {
    match key {
        SortKey::Year => a.year.cmp(&b.year),
        SortKey::TotalJobs => a.total_jobs.cmp(&b.total_jobs),
        SortKey::AverageSalary => a.average_salary.total_cmp(&b.average_salary),
    }
}

/// Return a copy of `rows` ordered by `key` in `direction`.
///
/// The sort is stable in both directions: rows with equal keys keep their
/// relative order.
pub fn sort_rows(
    rows: &[AggregateRow],
    key: SortKey,
    direction: SortDirection,
) -> Vec<AggregateRow> {
    let mut sorted = rows.to_vec();

    match direction {
        SortDirection::Ascending => sorted.sort_by(|a, b| compare_by(a, b, key)),
        SortDirection::Descending => sorted.sort_by(|a, b| compare_by(b, a, key)),
    }

    sorted
}

/// Whether `rows` are already ordered by `key` in `direction`.
pub fn is_sorted_by(rows: &[AggregateRow], key: SortKey, direction: SortDirection) -> bool {
    rows.windows(2).all(|pair| {
        let ord = compare_by(&pair[0], &pair[1], key);
        match direction {
            SortDirection::Ascending => ord != Ordering::Greater,
            SortDirection::Descending => ord != Ordering::Less,
        }
    })
}
