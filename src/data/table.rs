/// A loaded sheet before any typing: header names plus string cells.
///
/// Every row has exactly `headers.len()` cells once it leaves the loader.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the header matching `name` (trimmed, case-insensitive).
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name.trim()))
    }

    /// Cell text at `(row, col)`, or "" when out of range.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Append a record, padding or truncating it to the header width.
    /// Returns true if the record had to be reshaped.
    pub fn push_padded(&mut self, mut record: Vec<String>) -> bool {
        let width = self.headers.len();
        let reshaped = record.len() != width;
        record.resize(width, String::new());
        self.rows.push(record);
        reshaped
    }
}
