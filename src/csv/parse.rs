//! Line splitting.
//!
//! Deliberately minimal: no `""` escapes, no multi-line fields. A quote only
//! protects the commas it encloses.

use crate::csv::config::{CsvConfig, SplitMode};
use crate::csv::structure::{CsvTable, Record};
use tracing::debug;

/// Split a single line into fields according to `mode`.
pub fn split_line(line: &str, mode: SplitMode) -> Vec<String> {
    match mode {
        SplitMode::Plain => line.split(',').map(String::from).collect(),
        SplitMode::QuoteAware => split_quote_aware(line),
    }
}

/// Split on commas that have an even number of double quotes after them,
/// then strip one leading and one trailing quote from each field.
fn split_quote_aware(line: &str) -> Vec<String> {
    let bytes = line.as_bytes();

    // quotes_after[i] = number of '"' in bytes[i..]
    let mut quotes_after = vec![0usize; bytes.len() + 1];
    for i in (0..bytes.len()).rev() {
        quotes_after[i] = quotes_after[i + 1] + usize::from(bytes[i] == b'"');
    }

    let mut fields = Vec::new();
    let mut start = 0;
    for (i, &b) in bytes.iter().enumerate() {
        if b == b',' && quotes_after[i + 1] % 2 == 0 {
            fields.push(strip_enclosing_quotes(&line[start..i]));
            start = i + 1;
        }
    }
    fields.push(strip_enclosing_quotes(&line[start..]));
    fields
}

fn strip_enclosing_quotes(field: &str) -> String {
    let field = field.strip_prefix('"').unwrap_or(field);
    let field = field.strip_suffix('"').unwrap_or(field);
    field.to_string()
}

/// Split text into its non-blank lines, accepting `\n` and `\r\n` endings.
pub fn text_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.trim()
        .split('\n')
        .enumerate()
        .map(|(i, line)| (i + 1, line.strip_suffix('\r').unwrap_or(line)))
        .filter(|(_, line)| !line.trim().is_empty())
}

/// Parse CSV text into a header row and position-mapped records.
///
/// Header cells are always split on plain commas. Rows shorter than the
/// header read back as empty text for the missing columns; surplus cells are
/// kept and reachable by index.
pub fn csv_parse<S: AsRef<str>>(csv_text: S, config: &CsvConfig) -> CsvTable {
    let text = csv_text.as_ref();
    let mut lines = text_lines(text);

    let headers = if config.has_header {
        match lines.next() {
            Some((_, line)) => split_line(line, SplitMode::Plain)
                .into_iter()
                .map(|h| if config.trim { h.trim().to_string() } else { h })
                .collect(),
            None => return CsvTable::default(),
        }
    } else {
        Vec::new()
    };

    let records: Vec<Record> = lines
        .map(|(line_number, line)| {
            let mut fields = split_line(line, config.mode);
            if config.trim {
                for field in &mut fields {
                    *field = field.trim().to_string();
                }
            }
            if !headers.is_empty() && fields.len() != headers.len() {
                debug!(
                    line = line_number,
                    expected = headers.len(),
                    found = fields.len(),
                    "CSV row width differs from header"
                );
            }
            Record::new(fields, line_number)
        })
        .collect();

    CsvTable::new(headers, records)
}
