//! Parsed CSV data structures.

/// One data line, fields kept in column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    fields: Vec<String>,
    line_number: usize,
}

impl Record {
    pub(crate) fn new(fields: Vec<String>, line_number: usize) -> Self {
        Self {
            fields,
            line_number,
        }
    }

    /// Field at `index`, or empty text when the row is too short.
    pub fn field(&self, index: usize) -> &str {
        self.fields.get(index).map(String::as_str).unwrap_or("")
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// 1-based line number in the source text.
    pub fn line_number(&self) -> usize {
        self.line_number
    }
}

/// A header row plus the records below it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvTable {
    headers: Vec<String>,
    records: Vec<Record>,
}

impl CsvTable {
    pub(crate) fn new(headers: Vec<String>, records: Vec<Record>) -> Self {
        Self { headers, records }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Position of a column, matching the exact header first and then
    /// ignoring ASCII case.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name).or_else(|| {
            self.headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        })
    }

    /// Value of column `name` in `record`, empty when either is missing.
    pub fn get<'a>(&self, record: &'a Record, name: &str) -> &'a str {
        self.column_index(name)
            .map(|i| record.field(i))
            .unwrap_or("")
    }
}
