//! Comparison pipeline - the data transformations behind every scenario page.
//!
//! This module handles:
//! - Ordering suppliers by price or name
//! - Reordering categories for the active facet and tracking which are expanded
//! - Resolving and formatting the value shown for each (supplier, field) pair
//! - Building the grouped comparison table
//! - Flattening the table into rows and serializing them as CSV
//!
//! Console rendering is handled by the console_format module.
//!
//! # Module Organization
//!
//! - `sort` - Supplier ordering and name collation
//! - `grouping` - Facet-driven category order and the expanded-category set
//! - `values` - Value resolution, placeholder substitution and unit formatting
//! - `table` - Grouped on-screen comparison table
//! - `export` - Row flattening, CSV serialization and export file writing

mod export;
mod grouping;
mod sort;
mod table;
mod values;

pub use export::{flatten_rows, rows_to_csv, write_export, ExportRow, HEADER_LABEL};
pub use grouping::{order_categories, ExpandedCategories};
pub use sort::sort_suppliers;
pub use table::{build_table, ComparisonTable, GroupView};
pub use values::{format_cell, format_value, Cell, RawValue, PLACEHOLDER};
