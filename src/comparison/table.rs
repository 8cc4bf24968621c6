//! Grouped comparison table shown on a scenario page.

use super::grouping::ExpandedCategories;
use super::values::{Cell, format_cell};
use crate::types::{Category, Supplier, TenderConfig};

/// The grouped, filterable table: one group per category, in display order
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ComparisonTable {
    /// Supplier names in column order
    pub suppliers: Vec<String>,
    pub groups: Vec<GroupView>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct GroupView {
    pub name: String,
    pub expanded: bool,
    /// Empty when the group is collapsed
    pub rows: Vec<FieldRow>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct FieldRow {
    pub label: String,
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
    pub cells: Vec<Cell>,
}

/// Build the table for already-ordered suppliers and categories
pub fn build_table(
    config: &TenderConfig,
    suppliers: &[&Supplier],
    categories: &[&Category],
    expanded: &ExpandedCategories,
) -> ComparisonTable {
    let groups = categories
        .iter()
        .map(|category| {
            let is_expanded = expanded.is_expanded(&category.name);
            let rows = if is_expanded {
                category
                    .fields
                    .iter()
                    .map(|field| FieldRow {
                        label: field.label.clone(),
                        key: field.key.clone(),
                        tooltip: field.tooltip.clone(),
                        cells: suppliers.iter().map(|s| format_cell(config, s, category, field)).collect(),
                    })
                    .collect()
            } else {
                Vec::new()
            };
            GroupView { name: category.name.clone(), expanded: is_expanded, rows }
        })
        .collect();

    ComparisonTable { suppliers: suppliers.iter().map(|s| s.name.clone()).collect(), groups }
}

#[cfg(test)]
impl ComparisonTable {
    /// Look up the on-screen cell for a field label and supplier name
    pub fn cell(&self, label: &str, supplier: &str) -> Option<&Cell> {
        let column = self.suppliers.iter().position(|s| s == supplier)?;
        self.groups.iter().flat_map(|g| g.rows.iter()).find(|r| r.label == label).and_then(|r| r.cells.get(column))
    }

    pub fn expanded_row_count(&self) -> usize {
        self.groups.iter().map(|g| g.rows.len()).sum()
    }
}
