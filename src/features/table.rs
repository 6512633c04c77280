//! Untyped input: single form submissions and uploaded customer tables.

use crate::error::{RowError, RowFailure};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;

/// Column name → cell text for one customer, as received from the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    fields: BTreeMap<String, String>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, column: impl Into<String>, value: impl ToString) -> Self {
        self.insert(column, value);
        self
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl ToString) {
        self.fields.insert(column.into(), value.to_string());
    }

    /// Cell text for `column`; blank cells read as absent.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .get(column)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut r = RawRecord::new();
        for (k, v) in iter {
            r.insert(k, v);
        }
        r
    }
}

/// In-memory customer table: a header row plus text cells.
///
/// Columns beyond the feature schema (customer ids, historic labels) are kept so the
/// exported report carries them through unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    /// Rows whose bytes could not be decoded, by index. Their cells are kept lossily.
    undecodable: BTreeMap<usize, String>,
}

impl FeatureTable {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            ..Self::default()
        }
    }

    /// Parse comma-separated text with a header line. Ragged or non-UTF-8 rows are kept
    /// and rejected per row at scoring time.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, csv::Error> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        let headers: Vec<String> = rdr.headers()?.iter().map(|s| s.to_string()).collect();
        let mut table = Self::new(headers);
        for record in rdr.byte_records() {
            let record = record?;
            let mut cells = Vec::with_capacity(record.len());
            let mut bad_field = None;
            for (field, bytes) in record.iter().enumerate() {
                match String::from_utf8(bytes.to_vec()) {
                    Ok(cell) => cells.push(cell),
                    Err(e) => {
                        bad_field.get_or_insert(field);
                        cells.push(String::from_utf8_lossy(e.as_bytes()).into_owned());
                    }
                }
            }
            if let Some(field) = bad_field {
                let row = table.rows.len();
                let column = table.headers.get(field).map_or("?", String::as_str);
                tracing::warn!(row, column, "row is not valid UTF-8");
                table
                    .undecodable
                    .insert(row, format!("invalid UTF-8 in column {column}"));
            }
            table.rows.push(cells);
        }
        Ok(table)
    }

    pub fn push_row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }

    /// First header name that appears more than once.
    pub fn duplicate_header(&self) -> Option<&str> {
        let mut seen = BTreeSet::new();
        self.headers
            .iter()
            .find(|h| !seen.insert(h.as_str()))
            .map(String::as_str)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All rows keyed by header, in order. Unreadable rows stay in place as errors.
    pub fn raw_records(&self) -> Vec<Result<RawRecord, RowError>> {
        (0..self.rows.len()).map(|i| self.raw_record(i)).collect()
    }

    /// Row `index` keyed by header, or why it cannot be read.
    pub fn raw_record(&self, index: usize) -> Result<RawRecord, RowError> {
        let malformed = |msg: String| RowError {
            row: index,
            reason: RowFailure::Malformed(msg),
        };
        let cells = self
            .rows
            .get(index)
            .ok_or_else(|| malformed("row index out of range".to_string()))?;
        // a repeated header would let one cell silently shadow another
        if let Some(column) = self.duplicate_header() {
            return Err(malformed(format!("duplicate column {column}")));
        }
        if let Some(reason) = self.undecodable.get(&index) {
            return Err(malformed(reason.clone()));
        }
        if cells.len() != self.headers.len() {
            return Err(malformed(format!(
                "expected {} cells, found {}",
                self.headers.len(),
                cells.len()
            )));
        }
        Ok(self
            .headers
            .iter()
            .zip(cells)
            .map(|(h, v)| (h.clone(), v.clone()))
            .collect())
    }
}
