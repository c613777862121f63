//! CSV record parsing.
//!
//! Turns raw CSV text into an ordered list of [`Record`]s. The header row
//! names the fields; blank lines are skipped and every value stays text,
//! surrounding whitespace included. Only header names are trimmed.

use crate::dataset::error::DatasetError;
use crate::models::{Record, REQUIRED_COLUMNS};
use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::debug;

/// CSV parser for salary datasets.
#[derive(Debug, Clone)]
pub struct RecordParser {
    /// Delimiter character (default: comma).
    delimiter: u8,
}

impl Default for RecordParser {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl RecordParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom delimiter.
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Parse CSV text into records, in file order.
    pub fn parse(&self, content: &str) -> Result<Vec<Record>, DatasetError> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(Trim::Headers)
            .flexible(true)
            .from_reader(content.as_bytes());

        let headers = reader.headers().map_err(DatasetError::Header)?.clone();

        // A document with no header at all is an empty dataset
        if headers.is_empty() || is_blank(&headers) {
            debug!("Dataset has no header row");
            return Ok(Vec::new());
        }

        check_columns(&headers)?;

        let mut records = Vec::new();
        for result in reader.records() {
            let mut row = result.map_err(|e| DatasetError::Row {
                line: e.position().map(|p| p.line()).unwrap_or(0),
                source: e,
            })?;

            if is_blank(&row) {
                continue;
            }

            // Short rows are padded so missing trailing values read as empty text
            while row.len() < headers.len() {
                row.push_field("");
            }

            let line = row.position().map(|p| p.line()).unwrap_or(0);
            let record: Record = row
                .deserialize(Some(&headers))
                .map_err(|source| DatasetError::Row { line, source })?;
            records.push(record);
        }

        debug!("Parsed {} records", records.len());
        Ok(records)
    }
}

/// Verify that every required column is present in the header row.
fn check_columns(headers: &StringRecord) -> Result<(), DatasetError> {
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|column| !headers.iter().any(|h| h == **column))
        .map(|column| column.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(DatasetError::MissingColumns(missing))
    }
}

fn is_blank(row: &StringRecord) -> bool {
    row.iter().all(|field| field.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "work_year,experience_level,employment_type,job_title,salary,salary_currency,salary_in_usd,employee_residence,remote_ratio,company_location";

    #[test]
    fn test_parse_records_in_order() {
        let csv = format!(
            "{}\n2020,MI,FT,Data Scientist,70000,EUR,79833,DE,0,DE\n2021,SE,FT,ML Engineer,150000,USD,150000,US,100,US\n",
            HEADER
        );

        let records = RecordParser::new().parse(&csv).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].work_year, "2020");
        assert_eq!(records[0].job_title, "Data Scientist");
        assert_eq!(records[1].salary_in_usd, "150000");
        assert_eq!(records[1].company_location, "US");
    }

    #[test]
    fn test_blank_lines_skipped() {
        let csv = format!(
            "{}\n\n2020,MI,FT,Analyst,1,USD,1,US,0,US\n   \n\n2021,MI,FT,Analyst,2,USD,2,US,0,US\n",
            HEADER
        );

        let records = RecordParser::new().parse(&csv).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_values_kept_verbatim() {
        let csv = format!(
            "{}\n2020,MI,FT,  Data Scientist ,1,USD, 79833 ,US,0,US\n",
            HEADER
        );

        let records = RecordParser::new().parse(&csv).unwrap();
        assert_eq!(records[0].job_title, "  Data Scientist ");
        assert_eq!(records[0].salary_in_usd, " 79833 ");
    }

    #[test]
    fn test_padded_header_names_accepted() {
        let csv = format!(
            "{}\n2020,MI,FT,Analyst,1,USD,1,US,0,US\n",
            HEADER.replace(',', " , ")
        );

        let records = RecordParser::new().parse(&csv).unwrap();
        assert_eq!(records[0].work_year, "2020");
        assert_eq!(records[0].company_location, "US");
    }

    #[test]
    fn test_quoted_fields() {
        let csv = format!(
            "{}\n2022,EN,PT,\"Analyst, Junior\",1,USD,1,US,50,US\n",
            HEADER
        );

        let records = RecordParser::new().parse(&csv).unwrap();
        assert_eq!(records[0].job_title, "Analyst, Junior");
    }

    #[test]
    fn test_extra_columns_ignored() {
        let csv = format!("id,{}\n7,2020,MI,FT,Analyst,1,USD,1,US,0,US\n", HEADER);

        let records = RecordParser::new().parse(&csv).unwrap();
        assert_eq!(records[0].work_year, "2020");
        assert_eq!(records[0].company_location, "US");
    }

    #[test]
    fn test_short_row_fills_empty_values() {
        let csv = format!("{}\n2020,MI,FT,Analyst\n", HEADER);

        let records = RecordParser::new().parse(&csv).unwrap();
        assert_eq!(records[0].work_year, "2020");
        assert_eq!(records[0].salary_in_usd, "");
    }

    #[test]
    fn test_missing_columns_rejected() {
        let csv = "work_year,job_title\n2020,Analyst\n";

        let err = RecordParser::new().parse(csv).unwrap_err();
        match err {
            DatasetError::MissingColumns(cols) => {
                assert!(cols.contains(&"salary_in_usd".to_string()));
                assert!(!cols.contains(&"work_year".to_string()));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_document() {
        assert!(RecordParser::new().parse("").unwrap().is_empty());
        assert!(RecordParser::new()
            .parse(&format!("{}\n", HEADER))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_bundled_dataset_parses() {
        let records = RecordParser::new()
            .parse(crate::dataset::loader::BUNDLED_DATASET)
            .unwrap();

        assert_eq!(records.len(), 25);
        assert!(records.iter().all(|r| r.salary_in_usd.parse::<f64>().is_ok()));
    }

    #[test]
    fn test_custom_delimiter() {
        let csv = format!(
            "{}\n2020;MI;FT;Analyst;1;USD;1;US;0;US\n",
            HEADER.replace(',', ";")
        );

        let records = RecordParser::new().with_delimiter(b';').parse(&csv).unwrap();
        assert_eq!(records[0].experience_level, "MI");
    }
}
