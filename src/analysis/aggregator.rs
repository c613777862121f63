//! Year aggregation.
//!
//! Reduces parsed records to one summary row per distinct year, keeping
//! the order in which each year was first seen.

use crate::dataset::DatasetError;
use crate::models::{AggregateRow, Record, SalaryPolicy, Year};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Running totals for one year.
#[derive(Debug)]
struct YearTotals {
    year: Year,
    total_jobs: usize,
    total_salary: f64,
}

/// Aggregate records by `work_year`.
///
/// Each row carries the number of records for its year and the mean of
/// their `salary_in_usd`, rounded to two decimal places. Rows come out in
/// first-seen order. Unparseable salaries are handled according to
/// `policy`.
pub fn aggregate(
    records: &[Record],
    policy: SalaryPolicy,
) -> Result<Vec<AggregateRow>, DatasetError> {
    let mut totals: Vec<YearTotals> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for (i, record) in records.iter().enumerate() {
        let salary = salary_of(i, record, policy)?;

        let slot = *index.entry(record.work_year.as_str()).or_insert_with(|| {
            totals.push(YearTotals {
                year: Year::from(record.work_year.as_str()),
                total_jobs: 0,
                total_salary: 0.0,
            });
            totals.len() - 1
        });

        let entry = &mut totals[slot];
        entry.total_jobs += 1;
        entry.total_salary += salary;
    }

    debug!(
        "Aggregated {} records into {} years",
        records.len(),
        totals.len()
    );

    Ok(totals
        .into_iter()
        .map(|t| AggregateRow {
            year: t.year,
            total_jobs: t.total_jobs,
            average_salary: round_cents(t.total_salary / t.total_jobs as f64),
        })
        .collect())
}

/// Parse a record's `salary_in_usd`, applying the malformed-value policy.
fn salary_of(index: usize, record: &Record, policy: SalaryPolicy) -> Result<f64, DatasetError> {
    let raw = record.salary_in_usd.trim();

    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => match policy {
            SalaryPolicy::Reject => Err(DatasetError::InvalidSalary {
                index,
                year: record.work_year.clone(),
                value: raw.to_string(),
            }),
            SalaryPolicy::Zero => {
                warn!("Record {} has salary_in_usd '{}', counting as 0", index, raw);
                Ok(0.0)
            }
            SalaryPolicy::Propagate => {
                warn!("Record {} has salary_in_usd '{}', average becomes NaN", index, raw);
                Ok(f64::NAN)
            }
        },
    }
}

/// Round to two fraction digits, halves away from zero.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Total number of jobs across all rows.
pub fn total_jobs(rows: &[AggregateRow]) -> usize {
    rows.iter().map(|r| r.total_jobs).sum()
}
