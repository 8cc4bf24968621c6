/// View state for one scenario page
///
/// This module handles:
/// - The active sort key and facet
/// - Which categories are expanded
/// - The scroll-driven visibility of the floating compare button
/// - Deriving sorted suppliers, ordered categories, the table and the export
///
/// Nothing derived is cached: every accessor recomputes from the scenario.
use crate::comparison::{self, ComparisonTable, ExpandedCategories, ExportRow};
use crate::error::ExportError;
use crate::types::{Category, Facet, SortKey, Supplier, TenderConfig};
use log::debug;

/// Scroll offset past which the floating compare button is shown
pub const COMPARE_BUTTON_THRESHOLD: f64 = 800.0;

/// Tracks whether the floating compare button is visible
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollTracker {
    visible: bool,
}

impl ScrollTracker {
    pub fn on_scroll(&mut self, offset: f64) {
        self.visible = offset > COMPARE_BUTTON_THRESHOLD;
    }

    pub fn compare_button_visible(&self) -> bool {
        self.visible
    }
}

/// The state of one scenario page
#[derive(Debug, Clone)]
pub struct ComparisonSession<'a> {
    config: &'a TenderConfig,
    sort_key: SortKey,
    facet: Facet,
    expanded: ExpandedCategories,
    scroll: ScrollTracker,
}

impl<'a> ComparisonSession<'a> {
    /// Open a scenario with price ordering, the technical facet and the
    /// catalogue's default-expanded categories
    pub fn new(config: &'a TenderConfig) -> Self {
        Self {
            config,
            sort_key: SortKey::default(),
            facet: Facet::Technical,
            expanded: ExpandedCategories::from_defaults(&config.categories),
            scroll: ScrollTracker::default(),
        }
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    pub fn facet(&self) -> Facet {
        self.facet
    }

    pub fn expanded(&self) -> &ExpandedCategories {
        &self.expanded
    }

    pub fn set_sort(&mut self, key: SortKey) {
        debug!("Sort by {}", key.as_str());
        self.sort_key = key;
    }

    /// Switch facet; the expanded set collapses to the facet's category
    pub fn set_facet(&mut self, facet: Facet) {
        debug!("Facet {} -> {}", self.facet, facet);
        self.facet = facet;
        self.expanded.reset_to_facet(facet);
    }

    pub fn toggle_category(&mut self, name: &str) {
        self.expanded.toggle(name);
    }

    pub fn expand_all(&mut self) {
        self.expanded.expand_all(&self.config.categories);
    }

    pub fn collapse_all(&mut self) {
        self.expanded.collapse_all();
    }

    pub fn on_scroll(&mut self, offset: f64) {
        self.scroll.on_scroll(offset);
    }

    pub fn compare_button_visible(&self) -> bool {
        self.scroll.compare_button_visible()
    }

    pub fn sorted_suppliers(&self) -> Vec<&'a Supplier> {
        comparison::sort_suppliers(&self.config.suppliers, self.sort_key)
    }

    pub fn ordered_categories(&self) -> Vec<&'a Category> {
        comparison::order_categories(&self.config.categories, self.facet)
    }

    pub fn table(&self) -> ComparisonTable {
        comparison::build_table(self.config, &self.sorted_suppliers(), &self.ordered_categories(), &self.expanded)
    }

    pub fn export_rows(&self) -> Vec<ExportRow> {
        comparison::flatten_rows(self.config, &self.sorted_suppliers(), &self.ordered_categories())
    }

    pub fn export_csv(&self) -> Result<String, ExportError> {
        comparison::rows_to_csv(&self.export_rows())
    }

    pub fn export_file_name(&self) -> String {
        self.config.export_file_name()
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;
