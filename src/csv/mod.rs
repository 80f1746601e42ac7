//! Minimal CSV reading for the site's data files.
//!
//! The data files are small and hand- or script-written, so the reader is
//! forgiving: blank lines are skipped, short rows read back as empty text and
//! nothing here fails.
//!
//! # Example
//!
//! ```
//! use scholar_panels::csv::{csv_parse, CsvConfig};
//!
//! let input = "Title,Year\n\"Graphs, Revisited\",2021";
//! let table = csv_parse(input, &CsvConfig::quote_aware());
//!
//! let record = &table.records()[0];
//! assert_eq!(table.get(record, "Title"), "Graphs, Revisited");
//! assert_eq!(table.get(record, "Year"), "2021");
//! ```

mod config;
mod parse;
mod structure;

pub use config::{CsvConfig, SplitMode};
pub use parse::{csv_parse, split_line, text_lines};
pub use structure::{CsvTable, Record};
