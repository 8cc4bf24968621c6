//! Category ordering and expansion state.

use crate::types::{Category, Facet};
use log::debug;
use std::collections::BTreeSet;

/// Reorder categories for the active facet.
///
/// The facet's own category comes first, then the other facet-labelled
/// categories in the facet's priority order, then everything else in
/// catalogue order. Facet categories missing from the scenario are skipped.
pub fn order_categories(categories: &[Category], facet: Facet) -> Vec<&Category> {
    let mut ordered: Vec<&Category> = Vec::with_capacity(categories.len());

    for f in facet.priority() {
        if let Some(category) = categories.iter().find(|c| c.name == f.category_label()) {
            ordered.push(category);
        }
    }

    ordered.extend(categories.iter().filter(|c| Facet::for_category(&c.name).is_none()));

    debug!(
        "Category order for {}: {:?}",
        facet,
        ordered.iter().map(|c| c.name.as_str()).collect::<Vec<_>>()
    );
    ordered
}

/// Whether values for this category come from relevance sub-scores
pub fn is_relevance_category(category: &Category) -> bool {
    category.name == Facet::Relevance.category_label()
}

/// Names of the categories currently shown expanded
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct ExpandedCategories(BTreeSet<String>);

impl ExpandedCategories {
    /// Start from the categories flagged as expanded in the catalogue
    pub fn from_defaults(categories: &[Category]) -> Self {
        Self(categories.iter().filter(|c| c.expanded).map(|c| c.name.clone()).collect())
    }

    /// Expand if collapsed, collapse if expanded
    pub fn toggle(&mut self, name: &str) {
        if !self.0.remove(name) {
            self.0.insert(name.to_string());
        }
    }

    /// Replace the whole set with just the facet's category
    pub fn reset_to_facet(&mut self, facet: Facet) {
        self.0.clear();
        self.0.insert(facet.category_label().to_string());
    }

    pub fn expand_all(&mut self, categories: &[Category]) {
        self.0.extend(categories.iter().map(|c| c.name.clone()));
    }

    pub fn collapse_all(&mut self) {
        self.0.clear();
    }

    pub fn is_expanded(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(name: &str, expanded: bool) -> Category {
        Category { name: name.to_string(), fields: vec![], expanded }
    }

    fn full_set() -> Vec<Category> {
        vec![
            category("Maintenance & Warranty", false),
            category("Technical Requirements", true),
            category("Relevance", false),
            category("Client Considerations", false),
            category("Installation Timeline", false),
            category("Cost & Financial", false),
        ]
    }

    fn names<'a>(ordered: &[&'a Category]) -> Vec<&'a str> {
        ordered.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_order_for_each_facet() {
        let categories = full_set();
        assert_eq!(
            names(&order_categories(&categories, Facet::Financial)),
            vec![
                "Cost & Financial",
                "Relevance",
                "Technical Requirements",
                "Installation Timeline",
                "Maintenance & Warranty",
                "Client Considerations",
            ]
        );
        assert_eq!(
            names(&order_categories(&categories, Facet::Speed)),
            vec![
                "Installation Timeline",
                "Relevance",
                "Technical Requirements",
                "Cost & Financial",
                "Maintenance & Warranty",
                "Client Considerations",
            ]
        );
        assert_eq!(
            names(&order_categories(&categories, Facet::Relevance))[..4],
            ["Relevance", "Technical Requirements", "Cost & Financial", "Installation Timeline"]
        );
        assert_eq!(
            names(&order_categories(&categories, Facet::Technical))[..4],
            ["Technical Requirements", "Relevance", "Cost & Financial", "Installation Timeline"]
        );
    }

    #[test]
    fn test_order_is_a_permutation_and_idempotent() {
        let categories = full_set();
        for facet in Facet::ALL {
            let once = order_categories(&categories, facet);
            assert_eq!(once.len(), categories.len());
            assert_eq!(once[0].name, facet.category_label());

            let reordered: Vec<Category> = once.iter().map(|c| (*c).clone()).collect();
            let twice = order_categories(&reordered, facet);
            assert_eq!(names(&once), names(&twice));
        }
    }

    #[test]
    fn test_order_skips_missing_facet_categories() {
        let categories = vec![
            category("Client Considerations", false),
            category("Cost & Financial", false),
            category("Technical Requirements", true),
        ];
        assert_eq!(
            names(&order_categories(&categories, Facet::Relevance)),
            vec!["Technical Requirements", "Cost & Financial", "Client Considerations"]
        );
    }

    #[test]
    fn test_toggle_twice_restores() {
        let categories = full_set();
        let original = ExpandedCategories::from_defaults(&categories);
        let mut state = original.clone();

        state.toggle("Relevance");
        assert!(state.is_expanded("Relevance"));
        state.toggle("Relevance");
        assert_eq!(state, original);

        state.toggle("Technical Requirements");
        assert!(!state.is_expanded("Technical Requirements"));
        state.toggle("Technical Requirements");
        assert_eq!(state, original);
    }

    #[test]
    fn test_reset_to_facet_replaces_set() {
        let categories = full_set();
        let mut state = ExpandedCategories::from_defaults(&categories);
        state.toggle("Relevance");
        state.reset_to_facet(Facet::Speed);
        assert_eq!(state.names().collect::<Vec<_>>(), vec!["Installation Timeline"]);
    }

    #[test]
    fn test_relevance_category_detection() {
        assert!(is_relevance_category(&category("Relevance", false)));
        assert!(!is_relevance_category(&category("Cost & Financial", false)));
    }
}
