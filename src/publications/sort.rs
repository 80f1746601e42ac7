//! In-place sorting of a rendered publication table.
//!
//! Sorting works on the rendered rows, not the data they came from: each key
//! is read back from the cell's text. Numeric columns sort descending, others
//! ascending. Equal keys keep their current order.

use super::Column;
use crate::html::{Element, Node};
use crate::utils::parse_int_prefix;
use std::cmp::Ordering;
use tracing::debug;

/// Re-orders the body rows of `table` by `column`.
///
/// Cells without a leading integer sort after every numeric cell when the
/// column is numeric. Does nothing if the table has no `tbody`.
pub fn sort_table(table: &mut Element, column: Column) {
    let Some(tbody) = table.find_mut("tbody") else {
        return;
    };

    let index = column.index();
    let numeric = column.is_numeric();
    let mut keyed: Vec<(String, Node)> = tbody
        .children_mut()
        .drain(..)
        .map(|row| (cell_text(&row, index), row))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| {
        if numeric {
            compare_numeric_desc(a, b)
        } else {
            compare_lexical(a, b)
        }
    });

    debug!(column = %column, rows = keyed.len(), "sorted publication table");
    tbody
        .children_mut()
        .extend(keyed.into_iter().map(|(_, row)| row));
}

/// Dispatches a click on the header cell at `index`.
///
/// Only headers carrying `data-sort` react. Returns whether the table was
/// re-ordered.
pub fn handle_header_click(table: &mut Element, index: usize) -> bool {
    let column = table
        .find("thead")
        .and_then(|thead| thead.find("tr"))
        .and_then(|row| row.child_elements().nth(index))
        .and_then(|th| th.attr("data-sort"))
        .and_then(Column::from_label);

    match column {
        Some(column) => {
            sort_table(table, column);
            true
        }
        None => false,
    }
}

fn cell_text(row: &Node, index: usize) -> String {
    row.as_element()
        .and_then(|tr| tr.child_elements().nth(index))
        .map(Element::text_content)
        .unwrap_or_default()
}

fn compare_numeric_desc(a: &str, b: &str) -> Ordering {
    match (parse_int_prefix(a), parse_int_prefix(b)) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn compare_lexical(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Panel;
    use crate::publications::PublicationsPanel;
    use pretty_assertions::assert_eq;
    use rstest::*;

    const INPUT: &str = "\
Title,Authors,Venue,Year,Citations
beta,X,V,2019,5
Alpha,Y,W,2021,12
gamma,Z,U,2019,n/a
Delta,W,T,2020,12";

    fn column_texts(table: &Element, column: Column) -> Vec<String> {
        table
            .find("tbody")
            .unwrap()
            .child_elements()
            .map(|tr| tr.child_elements().nth(column.index()).unwrap().text_content())
            .collect()
    }

    fn rendered() -> Element {
        let panel = PublicationsPanel::new();
        panel.build_table(&panel.parse(INPUT))
    }

    #[test]
    fn test_numeric_sort_is_descending_and_stable() {
        let mut table = rendered();
        sort_table(&mut table, Column::Citations);
        // Alpha and Delta tie on 12 and keep their input order; "n/a" goes last.
        assert_eq!(
            column_texts(&table, Column::Title),
            vec!["Alpha", "Delta", "beta", "gamma"]
        );
    }

    #[test]
    fn test_year_sort() {
        let mut table = rendered();
        sort_table(&mut table, Column::Year);
        assert_eq!(
            column_texts(&table, Column::Year),
            vec!["2021", "2020", "2019", "2019"]
        );
    }

    #[test]
    fn test_lexical_sort_is_ascending() {
        let mut table = rendered();
        sort_table(&mut table, Column::Title);
        assert_eq!(
            column_texts(&table, Column::Title),
            vec!["Alpha", "beta", "Delta", "gamma"]
        );
    }

    #[test]
    fn test_second_click_keeps_descending_order() {
        let mut table = rendered();
        sort_table(&mut table, Column::Citations);
        let first = column_texts(&table, Column::Title);
        sort_table(&mut table, Column::Citations);
        assert_eq!(column_texts(&table, Column::Title), first);
    }

    #[rstest]
    #[case(3, true)]
    #[case(4, true)]
    #[case(0, false)]
    #[case(9, false)]
    fn test_header_click_only_on_sortable(#[case] index: usize, #[case] sorts: bool) {
        let mut table = rendered();
        let before = table.clone();
        assert_eq!(handle_header_click(&mut table, index), sorts);
        if !sorts {
            assert_eq!(table, before);
        }
    }

    #[test]
    fn test_header_click_on_enabled_lexical_column() {
        let mut panel = PublicationsPanel::new();
        panel.set_sortable(vec![Column::Venue]);
        let mut table = panel.build_table(&panel.parse(INPUT));

        assert!(handle_header_click(&mut table, Column::Venue.index()));
        assert_eq!(
            column_texts(&table, Column::Venue),
            vec!["T", "U", "V", "W"]
        );
    }

    #[test]
    fn test_sort_without_tbody_is_noop() {
        let mut table = Element::new("table");
        sort_table(&mut table, Column::Year);
        assert_eq!(table, Element::new("table"));
    }
}
