//! Writing the panel CSV files.

use super::parse::ScholarMetrics;
use crate::ResourceKind;
use crate::error::PanelError;
use crate::publications::{Column, Publication};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Encodes a header and rows as CSV in the dialect the panels read.
///
/// A field is wrapped in quotes when it holds a comma or starts or ends with
/// a quote. Embedded quotes are kept as they are, because the panels strip
/// only the enclosing pair. A field with an odd number of quotes has them
/// doubled instead, which keeps later columns aligned at the cost of the
/// doubled quotes showing in the panel.
pub fn to_csv<R, T>(headers: &[&str], rows: impl IntoIterator<Item = R>) -> Result<Vec<u8>, PanelError>
where
    R: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    let mut writer = WriterBuilder::new()
        .terminator(Terminator::CRLF)
        .quote_style(QuoteStyle::Never)
        .from_writer(Vec::new());
    writer
        .write_record(headers.iter().map(|header| site_field(header).into_owned()))
        .map_err(io::Error::from)?;
    for row in rows {
        let fields: Vec<String> = row
            .into_iter()
            .map(|field| site_field(field.as_ref()).into_owned())
            .collect();
        writer.write_record(&fields).map_err(io::Error::from)?;
    }
    writer
        .into_inner()
        .map_err(|e| PanelError::Io(e.into_error()))
}

fn site_field(field: &str) -> Cow<'_, str> {
    let quotes = field.matches('"').count();
    if quotes % 2 == 1 {
        return Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")));
    }
    if field.contains(',') || field.starts_with('"') || field.ends_with('"') {
        return Cow::Owned(format!("\"{}\"", field));
    }
    Cow::Borrowed(field)
}

/// Writes the metrics, history and publication files into `out_dir`.
///
/// All three are encoded before any is written, so an encoding failure
/// leaves the existing files untouched. Returns the written paths.
pub fn write_profile(
    out_dir: &Path,
    metrics: &ScholarMetrics,
    history: &[(String, String)],
    publications: &[Publication],
) -> Result<Vec<PathBuf>, PanelError> {
    let headers: Vec<&str> = metrics.headers.iter().map(String::as_str).collect();
    let stats = to_csv(&headers, &metrics.rows)?;
    let history = to_csv(
        &["Year", "Citations"],
        history.iter().map(|(year, count)| [year, count]),
    )?;
    let publications = to_csv(
        &Column::ALL.map(|column| column.label()),
        publications
            .iter()
            .map(|publication| Column::ALL.map(|column| publication.value(column))),
    )?;

    fs::create_dir_all(out_dir)?;
    [
        (ResourceKind::Stats, stats),
        (ResourceKind::CitationHistory, history),
        (ResourceKind::Publications, publications),
    ]
    .into_iter()
    .map(|(kind, bytes)| -> Result<PathBuf, PanelError> {
        let path = out_dir.join(kind.as_str());
        fs::write(&path, bytes)?;
        Ok(path)
    })
    .collect()
}
