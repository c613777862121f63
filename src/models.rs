//! Data models for the salary tables.
//!
//! This module contains the core data structures shared by the parser,
//! the aggregator, the sorter and the renderers.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Column names every dataset must provide, in display order.
pub const REQUIRED_COLUMNS: [&str; 10] = [
    "work_year",
    "experience_level",
    "employment_type",
    "job_title",
    "salary",
    "salary_currency",
    "salary_in_usd",
    "employee_residence",
    "remote_ratio",
    "company_location",
];

/// Human-readable header labels for the raw record table.
pub const RECORD_LABELS: [&str; 10] = [
    "Work Year",
    "Experience Level",
    "Employment Type",
    "Job Title",
    "Salary",
    "Salary Currency",
    "Salary in USD",
    "Employee Residence",
    "Remote Ratio",
    "Company Location",
];

/// A single job-salary observation, exactly as it appeared in the CSV.
///
/// All values are kept as text; numeric coercion happens in the aggregator.
/// Columns missing from a short row deserialize as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Record {
    pub work_year: String,
    pub experience_level: String,
    pub employment_type: String,
    pub job_title: String,
    pub salary: String,
    pub salary_currency: String,
    pub salary_in_usd: String,
    pub employee_residence: String,
    pub remote_ratio: String,
    pub company_location: String,
}

impl Record {
    /// Returns the cell values in [`REQUIRED_COLUMNS`] order.
    pub fn cells(&self) -> [&str; 10] {
        [
            &self.work_year,
            &self.experience_level,
            &self.employment_type,
            &self.job_title,
            &self.salary,
            &self.salary_currency,
            &self.salary_in_usd,
            &self.employee_residence,
            &self.remote_ratio,
            &self.company_location,
        ]
    }
}

/// The year an aggregate row is keyed by.
///
/// Stored verbatim. Integer years compare numerically and sort before
/// anything that is not an integer, which compares as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Year(pub String);

impl Year {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn as_number(&self) -> Option<i64> {
        self.0.trim().parse().ok()
    }
}

impl From<&str> for Year {
    fn from(s: &str) -> Self {
        Year(s.to_string())
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Ord for Year {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.as_number(), other.as_number()) {
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| self.0.cmp(&other.0)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for Year {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// One summary row per distinct year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateRow {
    /// Year shared by every record in this group.
    pub year: Year,
    /// Number of records with this year (always at least 1).
    pub total_jobs: usize,
    /// Mean `salary_in_usd`, rounded to two fraction digits.
    pub average_salary: f64,
}

impl AggregateRow {
    /// Average salary formatted with exactly two fraction digits.
    pub fn average_salary_text(&self) -> String {
        format!("{:.2}", self.average_salary)
    }
}

/// Sortable columns of the aggregate table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    Year,
    TotalJobs,
    AverageSalary,
}

impl SortKey {
    pub const ALL: [SortKey; 3] = [SortKey::Year, SortKey::TotalJobs, SortKey::AverageSalary];

    /// Field name used in rendered output (`data-sort-key`, JSON).
    pub fn field_name(&self) -> &'static str {
        match self {
            SortKey::Year => "year",
            SortKey::TotalJobs => "totalJobs",
            SortKey::AverageSalary => "averageSalary",
        }
    }

    /// Column header label.
    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Year => "Year",
            SortKey::TotalJobs => "Number of Jobs",
            SortKey::AverageSalary => "Average Salary (USD)",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.field_name())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "year" | "work_year" => Ok(SortKey::Year),
            "totaljobs" | "total_jobs" | "total-jobs" | "jobs" => Ok(SortKey::TotalJobs),
            "averagesalary" | "average_salary" | "average-salary" | "salary" => {
                Ok(SortKey::AverageSalary)
            }
            other => Err(format!(
                "unknown sort key '{}' (expected year, totalJobs or averageSalary)",
                other
            )),
        }
    }
}

/// Direction of the active sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    /// Value for the HTML `aria-sort` attribute.
    pub fn aria(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "ascending",
            SortDirection::Descending => "descending",
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.aria())
    }
}

/// Active sort key and direction of the aggregate table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            key: SortKey::Year,
            direction: SortDirection::Ascending,
        }
    }
}

impl SortState {
    /// State after a click on the `key` header.
    ///
    /// Reselecting the active key while ascending flips to descending;
    /// every other case resets to ascending on `key`.
    pub fn toggle(self, key: SortKey) -> SortState {
        let direction = if self.key == key && self.direction == SortDirection::Ascending {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };

        SortState { key, direction }
    }
}

impl fmt::Display for SortState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.key, self.direction)
    }
}

/// How an unparseable `salary_in_usd` value is treated during aggregation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum SalaryPolicy {
    /// Fail the load, naming the offending row (default)
    #[default]
    Reject,
    /// Count the job with a salary of zero
    Zero,
    /// Let NaN flow into the year's sum and average
    Propagate,
}

impl fmt::Display for SalaryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SalaryPolicy::Reject => write!(f, "reject"),
            SalaryPolicy::Zero => write!(f, "zero"),
            SalaryPolicy::Propagate => write!(f, "propagate"),
        }
    }
}
