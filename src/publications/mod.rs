//! Publication list table.
//!
//! Reads `publications.csv` (Title, Authors, Venue, Year, Citations) with the
//! quote-aware splitter and renders it as `table.pub-table` inside
//! `#publications`. Headers of sortable columns carry a `data-sort` attribute;
//! [`handle_header_click`] re-orders the rendered rows in place.
//!
//! # Example
//!
//! ```
//! use scholar_panels::publications::{Column, PublicationsPanel, sort_table};
//! use scholar_panels::Panel;
//!
//! let input = "Title,Authors,Venue,Year,Citations\nA,X,V,2019,3\nB,Y,W,2021,10";
//! let panel = PublicationsPanel::new();
//! let publications = panel.parse(input);
//!
//! let mut table = panel.build_table(&publications);
//! sort_table(&mut table, Column::Citations);
//! assert!(table.to_html().find(">B<").unwrap() < table.to_html().find(">A<").unwrap());
//! ```

mod sort;

use crate::csv::{CsvConfig, csv_parse};
use crate::html::{Element, Node};
use crate::page::{Document, MountPoint};
use crate::{Panel, ResourceKind};
use serde::{Deserialize, Serialize};
use std::fmt;

pub use sort::{handle_header_click, sort_table};

/// One row of the publication list, kept as display text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publication {
    pub title: String,
    pub authors: String,
    pub venue: String,
    pub year: String,
    pub citations: String,
}

impl Publication {
    pub fn value(&self, column: Column) -> &str {
        match column {
            Column::Title => &self.title,
            Column::Authors => &self.authors,
            Column::Venue => &self.venue,
            Column::Year => &self.year,
            Column::Citations => &self.citations,
        }
    }
}

/// Display columns of the publication table, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Column {
    Title,
    Authors,
    Venue,
    Year,
    Citations,
}

impl Column {
    pub const ALL: [Column; 5] = [
        Column::Title,
        Column::Authors,
        Column::Venue,
        Column::Year,
        Column::Citations,
    ];

    /// Header text, also the CSV column name.
    pub fn label(&self) -> &'static str {
        match self {
            Column::Title => "Title",
            Column::Authors => "Authors",
            Column::Venue => "Venue",
            Column::Year => "Year",
            Column::Citations => "Citations",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Column::Title => 0,
            Column::Authors => 1,
            Column::Venue => 2,
            Column::Year => 3,
            Column::Citations => 4,
        }
    }

    /// Numeric columns sort by integer value, descending.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Column::Year | Column::Citations)
    }

    pub fn from_label(label: &str) -> Option<Column> {
        Column::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(label.trim()))
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Renders the publication list into `#publications`.
#[derive(Debug, Clone)]
pub struct PublicationsPanel {
    csv: CsvConfig,
    sortable: Vec<Column>,
}

impl Default for PublicationsPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl PublicationsPanel {
    /// Quote-aware parsing, with Year and Citations clickable.
    #[must_use]
    pub fn new() -> Self {
        Self {
            csv: CsvConfig::quote_aware(),
            sortable: vec![Column::Year, Column::Citations],
        }
    }

    /// Replaces the set of columns whose headers sort on click.
    pub fn set_sortable(&mut self, columns: Vec<Column>) -> &mut Self {
        self.sortable = columns;
        self
    }

    pub fn sortable(&self) -> &[Column] {
        &self.sortable
    }

    /// Builds `table.pub-table` with one body row per publication, in order.
    pub fn build_table(&self, publications: &[Publication]) -> Element {
        let header_row = Column::ALL
            .into_iter()
            .fold(Element::new("tr"), |row, column| {
                let mut th = Element::new("th").with_text(column.label());
                if self.sortable.contains(&column) {
                    th.set_attr("style", "cursor: pointer");
                    th.set_attr("data-sort", column.label());
                }
                row.with_child(th)
            });

        let tbody = publications
            .iter()
            .fold(Element::new("tbody"), |tbody, publication| {
                let row = Column::ALL
                    .into_iter()
                    .fold(Element::new("tr"), |row, column| {
                        row.with_child(Element::new("td").with_text(publication.value(column)))
                    });
                tbody.with_child(row)
            });

        Element::new("table")
            .with_class("pub-table")
            .with_child(Element::new("thead").with_child(header_row))
            .with_child(tbody)
    }
}

impl Panel for PublicationsPanel {
    type Model = Vec<Publication>;

    fn kind(&self) -> ResourceKind {
        ResourceKind::Publications
    }

    fn parse(&self, input: &str) -> Vec<Publication> {
        let table = csv_parse(input, &self.csv);
        table
            .records()
            .iter()
            .map(|record| Publication {
                title: table.get(record, "Title").to_string(),
                authors: table.get(record, "Authors").to_string(),
                venue: table.get(record, "Venue").to_string(),
                year: table.get(record, "Year").to_string(),
                citations: table.get(record, "Citations").to_string(),
            })
            .collect()
    }

    fn render(&self, model: &Vec<Publication>, document: &mut dyn Document) -> bool {
        let table = Node::from(self.build_table(model));
        document.mount(MountPoint::Publications, &[table])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::Page;
    use pretty_assertions::assert_eq;

    const INPUT: &str = "\
Title,Authors,Venue,Year,Citations
\"Sensing, Revisited\",\"A Khan, B Lee\",MobiSys,2019,42
Battery-free Tags,C Diaz,SenSys,2021,7
Short Row,D Chen";

    #[test]
    fn test_parse_maps_headers_by_position() {
        let publications = PublicationsPanel::new().parse(INPUT);
        assert_eq!(publications.len(), 3);
        assert_eq!(
            publications[0],
            Publication {
                title: "Sensing, Revisited".to_string(),
                authors: "A Khan, B Lee".to_string(),
                venue: "MobiSys".to_string(),
                year: "2019".to_string(),
                citations: "42".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_short_row_has_empty_fields() {
        let publications = PublicationsPanel::new().parse(INPUT);
        assert_eq!(publications[2].title, "Short Row");
        assert_eq!(publications[2].venue, "");
        assert_eq!(publications[2].citations, "");
    }

    #[test]
    fn test_parse_header_only() {
        let publications = PublicationsPanel::new().parse("Title,Authors,Venue,Year,Citations\n");
        assert!(publications.is_empty());
    }

    #[test]
    fn test_table_has_one_row_per_record_and_cell_per_column() {
        let panel = PublicationsPanel::new();
        let publications = panel.parse(INPUT);
        let table = panel.build_table(&publications);

        let tbody = table.find("tbody").unwrap();
        let rows: Vec<_> = tbody.child_elements().collect();
        assert_eq!(rows.len(), 3);
        for row in &rows {
            assert_eq!(row.child_elements().count(), Column::ALL.len());
        }
        let titles: Vec<_> = rows
            .iter()
            .map(|r| r.child_elements().next().unwrap().text_content())
            .collect();
        assert_eq!(titles, vec!["Sensing, Revisited", "Battery-free Tags", "Short Row"]);
    }

    #[test]
    fn test_only_numeric_headers_sortable_by_default() {
        let table = PublicationsPanel::new().build_table(&[]);
        let headers: Vec<_> = table
            .find("tr")
            .unwrap()
            .child_elements()
            .map(|th| (th.text_content(), th.attr("data-sort").is_some()))
            .collect();
        assert_eq!(
            headers,
            vec![
                ("Title".to_string(), false),
                ("Authors".to_string(), false),
                ("Venue".to_string(), false),
                ("Year".to_string(), true),
                ("Citations".to_string(), true),
            ]
        );
    }

    #[test]
    fn test_render_replaces_container() {
        let panel = PublicationsPanel::new();
        let mut page = Page::new(
            "<div id=\"publications\"><!-- mount:publications -->Loading publications…<!-- /mount:publications --></div>",
        );
        let publications = panel.parse(INPUT);
        assert!(panel.render(&publications, &mut page));

        let html = page.contents(MountPoint::Publications).unwrap();
        assert!(html.starts_with("<table class=\"pub-table\">"));
        assert!(!html.contains("Loading"));
        assert!(html.contains("<td>Sensing, Revisited</td>"));
    }

    #[test]
    fn test_column_from_label() {
        assert_eq!(Column::from_label("citations"), Some(Column::Citations));
        assert_eq!(Column::from_label(" Year "), Some(Column::Year));
        assert_eq!(Column::from_label("DOI"), None);
    }
}
