//! Tabular event data (one row per event) and its conversion into an [`EventLog`]

use std::{collections::HashMap, fs::File, io::Read, path::Path};

use serde::{Deserialize, Serialize};

use super::{
    constants::TRACE_ID_NAME, Attribute, AttributeValue, Event, EventLog, Trace,
};

/// Errors when reading or converting an [`EventTable`]
#[derive(Debug, thiserror::Error)]
pub enum EventTableError {
    /// A configured column is not part of the table header
    #[error("missing column '{0}' in event table")]
    MissingColumn(String),
    /// A row does not have as many cells as the header has columns
    #[error("row {row} has {found} cells, but the header has {expected} columns")]
    RaggedRow {
        /// Row number (0-based, excluding the header)
        row: usize,
        /// Number of header columns
        expected: usize,
        /// Number of cells found in the row
        found: usize,
    },
    /// CSV reading error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    /// IO error (e.g., when opening a file)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

///
/// Event data in tabular form
///
/// Every row is one event; which columns hold the case identifier, the activity and the
/// timestamp is decided when converting the table (see [`EventTable::to_event_log`]).
///
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventTable {
    /// Column names
    pub columns: Vec<String>,
    /// Rows of cell values, each with one cell per column
    pub rows: Vec<Vec<String>>,
}

impl EventTable {
    /// Create an empty table with the given column names
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row
    ///
    /// Fails if the number of cells differs from the number of columns.
    pub fn push_row<S: Into<String>>(
        &mut self,
        row: impl IntoIterator<Item = S>,
    ) -> Result<(), EventTableError> {
        let row: Vec<String> = row.into_iter().map(Into::into).collect();
        if row.len() != self.columns.len() {
            return Err(EventTableError::RaggedRow {
                row: self.rows.len(),
                expected: self.columns.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Position of a column
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    fn require_column(&self, column: &str) -> Result<usize, EventTableError> {
        self.column_index(column)
            .ok_or_else(|| EventTableError::MissingColumn(column.to_string()))
    }

    /// Read a table from CSV data (the first record is the header)
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, EventTableError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut table = Self::new(csv_reader.headers()?.iter());
        for record in csv_reader.records() {
            table.push_row(record?.iter())?;
        }
        Ok(table)
    }

    /// Read a table from a CSV file
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self, EventTableError> {
        Self::from_csv_reader(File::open(path)?)
    }

    ///
    /// Convert the table into an [`EventLog`]
    ///
    /// Only the activity, timestamp and case identifier columns are kept.
    /// Rows are grouped into traces by case identifier: traces appear in the order in which
    /// their case is first seen, events keep their row order. Timestamps stay
    /// [`AttributeValue::String`]s and are parsed during preprocessing.
    ///
    /// Fails with [`EventTableError::MissingColumn`] if any of the three columns is absent.
    ///
    pub fn to_event_log(
        &self,
        activity_column: &str,
        timestamp_column: &str,
        case_id_column: &str,
    ) -> Result<EventLog, EventTableError> {
        let act_index = self.require_column(activity_column)?;
        let time_index = self.require_column(timestamp_column)?;
        let case_index = self.require_column(case_id_column)?;

        let mut case_to_trace: HashMap<&str, usize> = HashMap::new();
        let mut log = EventLog::new();
        for row in &self.rows {
            let case_id = row[case_index].as_str();
            let trace_index = *case_to_trace.entry(case_id).or_insert_with(|| {
                log.traces.push(Trace {
                    attributes: vec![Attribute::new(
                        TRACE_ID_NAME.to_string(),
                        AttributeValue::String(case_id.to_string()),
                    )],
                    events: Vec::new(),
                });
                log.traces.len() - 1
            });
            log.traces[trace_index].events.push(Event {
                attributes: vec![
                    Attribute::new(activity_column.to_string(), row[act_index].as_str().into()),
                    Attribute::new(timestamp_column.to_string(), row[time_index].as_str().into()),
                ],
            });
        }
        Ok(log)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::core::event_data::case_centric::XESEditableAttribute;

    const SAMPLE_CSV: &str = "case,activity,timestamp,resource
c1,register,2024-01-01T10:00:00,Mike
c2,register,2024-01-01T10:05:00,Pete
c1,approve,2024-01-01T11:00:00,Sara
c2,reject,2024-01-01T12:00:00,Sara
";

    #[test]
    fn csv_rows_are_grouped_by_case() {
        let table = EventTable::from_csv_reader(SAMPLE_CSV.as_bytes()).unwrap();
        assert_eq!(table.columns.len(), 4);
        assert_eq!(table.rows.len(), 4);

        let log = table.to_event_log("activity", "timestamp", "case").unwrap();
        assert_eq!(log.traces.len(), 2);
        let acts: Vec<Vec<String>> = log
            .traces
            .iter()
            .map(|t| {
                t.events
                    .iter()
                    .filter_map(|e| e.attributes.get_by_key("activity"))
                    .filter_map(|a| a.value.try_as_string().cloned())
                    .collect()
            })
            .collect();
        assert_eq!(
            acts,
            vec![vec!["register", "approve"], vec!["register", "reject"]]
        );
        // Only the configured columns survive
        assert!(log.traces[0].events[0].attributes.get_by_key("resource").is_none());
        assert_eq!(
            log.traces[1]
                .attributes
                .get_by_key(TRACE_ID_NAME)
                .and_then(|a| a.value.try_as_string())
                .map(String::as_str),
            Some("c2")
        );
    }

    #[test]
    fn missing_column_is_reported() {
        let table = EventTable::from_csv_reader(SAMPLE_CSV.as_bytes()).unwrap();
        let err = table
            .to_event_log("activity", "time:timestamp", "case")
            .unwrap_err();
        assert!(matches!(err, EventTableError::MissingColumn(c) if c == "time:timestamp"));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let mut table = EventTable::new(["case", "activity"]);
        assert!(table.push_row(["c1", "a"]).is_ok());
        let err = table.push_row(["c1"]).unwrap_err();
        assert!(matches!(
            err,
            EventTableError::RaggedRow {
                row: 1,
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn read_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE_CSV.as_bytes()).unwrap();
        let table = EventTable::from_csv_path(file.path()).unwrap();
        assert_eq!(table.rows[2], vec!["c1", "approve", "2024-01-01T11:00:00", "Sara"]);
    }
}
