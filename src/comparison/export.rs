//! CSV export of the comparison.
//!
//! The export always contains every category, expanded or not, in the order
//! given, with one column per supplier.

use super::values::format_cell;
use crate::error::ExportError;
use crate::types::{Category, Supplier, TenderConfig};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use log::debug;
use std::fs;
use std::path::Path;

/// First cell of the header row
pub const HEADER_LABEL: &str = "Category/Field";

/// One row of the flattened export
pub type ExportRow = Vec<String>;

/// Flatten ordered suppliers and categories into export rows.
///
/// Produces a header row, then per category a title row with blank supplier
/// cells followed by one row per field.
pub fn flatten_rows(config: &TenderConfig, suppliers: &[&Supplier], categories: &[&Category]) -> Vec<ExportRow> {
    let mut rows = Vec::with_capacity(1 + categories.iter().map(|c| 1 + c.fields.len()).sum::<usize>());

    let mut header = vec![HEADER_LABEL.to_string()];
    header.extend(suppliers.iter().map(|s| s.name.clone()));
    rows.push(header);

    for category in categories {
        let mut title = vec![category.name.clone()];
        title.extend(suppliers.iter().map(|_| String::new()));
        rows.push(title);

        for field in &category.fields {
            let mut row = vec![field.label.clone()];
            row.extend(suppliers.iter().map(|s| format_cell(config, s, category, field).text));
            rows.push(row);
        }
    }

    rows
}

/// Serialize rows as CSV: every cell quoted, quotes doubled, rows joined by "\n"
pub fn rows_to_csv(rows: &[ExportRow]) -> Result<String, ExportError> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .flexible(true)
        .from_writer(vec![]);

    for row in rows {
        writer.write_record(row)?;
    }

    let data = writer.into_inner().map_err(|e| ExportError::Csv(csv::Error::from(e.into_error())))?;
    let mut text = String::from_utf8(data)
        .map_err(|e| ExportError::Csv(csv::Error::from(std::io::Error::new(std::io::ErrorKind::InvalidData, e))))?;

    // Rows are joined, not terminated
    if text.ends_with('\n') {
        text.pop();
    }
    Ok(text)
}

/// Write the CSV text to disk
pub fn write_export(path: &Path, csv_text: &str) -> Result<(), ExportError> {
    debug!("Writing {} bytes of CSV to {:?}", csv_text.len(), path);
    fs::write(path, csv_text).map_err(|source| ExportError::Write { path: path.to_path_buf(), source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::comparison::{ExpandedCategories, build_table, order_categories, sort_suppliers};
    use crate::types::{Facet, SortKey};

    #[test]
    fn test_rows_to_csv_quotes_every_cell() {
        let rows = vec![
            vec!["Category/Field".to_string(), "Alpha".to_string()],
            vec!["Size".to_string(), "12\" panel".to_string()],
            vec!["Notes".to_string(), String::new()],
        ];
        let csv = rows_to_csv(&rows).unwrap();
        assert_eq!(csv, "\"Category/Field\",\"Alpha\"\n\"Size\",\"12\"\" panel\"\n\"Notes\",\"\"");
    }

    #[test]
    fn test_rows_to_csv_keeps_commas_and_newlines_inside_cells() {
        let rows = vec![vec!["a,b".to_string(), "line1\nline2".to_string()]];
        let csv = rows_to_csv(&rows).unwrap();
        assert_eq!(csv, "\"a,b\",\"line1\nline2\"");

        let mut reader = csv::ReaderBuilder::new().has_headers(false).from_reader(csv.as_bytes());
        let record = reader.records().next().unwrap().unwrap();
        assert_eq!(&record[1], "line1\nline2");
    }

    #[test]
    fn test_rows_to_csv_empty() {
        assert_eq!(rows_to_csv(&[]).unwrap(), "");
    }

    #[test]
    fn test_flatten_row_count() {
        let catalog = Catalog::embedded().unwrap();
        for tender in &catalog.tenders {
            let suppliers = sort_suppliers(&tender.suppliers, SortKey::Price);
            let categories = order_categories(&tender.categories, Facet::Technical);
            let rows = flatten_rows(tender, &suppliers, &categories);

            let expected = 1 + tender.categories.iter().map(|c| 1 + c.fields.len()).sum::<usize>();
            assert_eq!(rows.len(), expected, "row count for {}", tender.slug);
            assert!(rows.iter().all(|r| r.len() == suppliers.len() + 1));
        }
    }

    #[test]
    fn test_flatten_layout() {
        let catalog = Catalog::embedded().unwrap();
        let hvac = catalog.get("hvac").unwrap();
        let suppliers = sort_suppliers(&hvac.suppliers, SortKey::Price);
        let categories: Vec<&Category> = hvac.categories.iter().collect();
        let rows = flatten_rows(hvac, &suppliers, &categories);

        assert_eq!(
            rows[0],
            vec!["Category/Field", "Klimaservice Malte Born", "Eco-Heat UG", "Beka Solar Energie GmbH", "Ecowatt GmbH"]
        );
        assert_eq!(rows[1], vec!["Technical Requirements", "", "", "", ""]);
        assert_eq!(rows[2], vec!["Equipment removal included", "Yes", "Not required", "Yes", "Not required"]);

        let price_row = rows.iter().find(|r| r[0] == "Total price").unwrap();
        assert_eq!(price_row[1..], ["£45,000", "£48,000", "£52,000", "£58,000"]);
        let lifetime_row = rows.iter().find(|r| r[0] == "System lifetime").unwrap();
        assert_eq!(lifetime_row[1], "20 years");
        let capex_row = rows.iter().find(|r| r[0] == "Upfront capex").unwrap();
        assert_eq!(capex_row[1], "£38,500");
    }

    #[test]
    fn test_export_matches_on_screen_values() {
        let catalog = Catalog::embedded().unwrap();
        for tender in &catalog.tenders {
            let suppliers = sort_suppliers(&tender.suppliers, SortKey::Name);
            let categories = order_categories(&tender.categories, Facet::Financial);
            let mut expanded = ExpandedCategories::default();
            expanded.expand_all(&tender.categories);

            let table = build_table(tender, &suppliers, &categories, &expanded);
            let rows = flatten_rows(tender, &suppliers, &categories);

            let mut checked = 0;
            for row in rows.iter().skip(1) {
                for (column, value) in row.iter().enumerate().skip(1) {
                    if value.is_empty() || value == crate::comparison::PLACEHOLDER {
                        continue;
                    }
                    let cell = table.cell(&row[0], &rows[0][column]).expect("on-screen cell");
                    assert_eq!(&cell.text, value);
                    checked += 1;
                }
            }
            assert!(checked > 0);
        }
    }

    #[test]
    fn test_write_export() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hvac-tender-comparison.csv");
        write_export(&path, "\"a\",\"b\"").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "\"a\",\"b\"");
    }

    #[test]
    fn test_write_export_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.csv");
        let err = write_export(&path, "x").unwrap_err();
        assert!(matches!(err, ExportError::Write { .. }));
    }
}
