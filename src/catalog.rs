/// Catalogue loading and scenario resolution
///
/// This module handles:
/// - Choosing where the catalogue comes from (flag, env var, user config, embedded)
/// - Parsing the TOML catalogue into `TenderConfig` records
/// - Rejecting catalogues that break load-time invariants
/// - Resolving a scenario slug, with a distinct not-found outcome
/// - Reporting category field keys that resolve to nothing
use crate::error::CatalogError;
use crate::types::*;
use log::{debug, warn};
use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Catalogue shipped with the binary
const EMBEDDED_CATALOG: &str = include_str!("catalog.toml");

/// Environment variable pointing at a catalogue file
pub const CATALOG_ENV: &str = "TENDER_CATALOG";

/// Where a catalogue was read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    Embedded,
    File(PathBuf),
}

impl CatalogSource {
    pub fn describe(&self) -> String {
        match self {
            CatalogSource::Embedded => "embedded catalogue".to_string(),
            CatalogSource::File(path) => path.display().to_string(),
        }
    }
}

/// Per-user catalogue location, e.g. ~/.config/tender-compare/catalog.toml
pub fn default_catalog_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("tender-compare").join("catalog.toml"))
}

/// Pick the catalogue source: explicit path, then env var, then user config, then embedded
pub fn resolve_catalog_source(explicit: Option<&Path>) -> CatalogSource {
    if let Some(path) = explicit {
        debug!("Using catalogue from --catalog: {:?}", path);
        return CatalogSource::File(path.to_path_buf());
    }

    if let Ok(path) = env::var(CATALOG_ENV)
        && !path.trim().is_empty()
    {
        debug!("Using catalogue from {}: {}", CATALOG_ENV, path);
        return CatalogSource::File(PathBuf::from(path));
    }

    if let Some(path) = default_catalog_path()
        && path.is_file()
    {
        debug!("Using user catalogue {:?}", path);
        return CatalogSource::File(path);
    }

    debug!("Using embedded catalogue");
    CatalogSource::Embedded
}

/// All scenarios available to the tool
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub tenders: Vec<TenderConfig>,
}

impl Catalog {
    /// Load and validate a catalogue from the given source
    pub fn load(source: &CatalogSource) -> Result<Catalog, CatalogError> {
        match source {
            CatalogSource::Embedded => Catalog::from_toml_str(EMBEDDED_CATALOG, "embedded catalogue"),
            CatalogSource::File(path) => {
                let text = fs::read_to_string(path)
                    .map_err(|source| CatalogError::Io { path: path.clone(), source })?;
                Catalog::from_toml_str(&text, &path.display().to_string())
            }
        }
    }

    /// The catalogue compiled into the binary
    #[cfg(test)]
    pub fn embedded() -> Result<Catalog, CatalogError> {
        Catalog::load(&CatalogSource::Embedded)
    }

    /// Parse and validate catalogue TOML; `origin` names the input in errors
    pub fn from_toml_str(text: &str, origin: &str) -> Result<Catalog, CatalogError> {
        let catalog: Catalog = toml::from_str(text)
            .map_err(|source| CatalogError::Parse { origin: origin.to_string(), source })?;
        catalog.check_invariants()?;
        debug!("Loaded {} tender scenarios from {}", catalog.tenders.len(), origin);
        Ok(catalog)
    }

    /// Resolve a scenario by slug
    pub fn get(&self, slug: &str) -> Result<&TenderConfig, CatalogError> {
        self.tenders
            .iter()
            .find(|t| t.slug == slug)
            .ok_or_else(|| CatalogError::NotFound { slug: slug.to_string() })
    }

    pub fn slugs(&self) -> Vec<&str> {
        self.tenders.iter().map(|t| t.slug.as_str()).collect()
    }

    fn check_invariants(&self) -> Result<(), CatalogError> {
        let mut slugs = HashSet::new();
        for tender in &self.tenders {
            if !slugs.insert(tender.slug.as_str()) {
                return Err(CatalogError::Invalid(format!("duplicate scenario slug '{}'", tender.slug)));
            }
            check_tender(tender)?;
        }
        Ok(())
    }
}

fn check_tender(tender: &TenderConfig) -> Result<(), CatalogError> {
    let mut ids = HashSet::new();
    for supplier in &tender.suppliers {
        if !ids.insert(supplier.id.as_str()) {
            return Err(CatalogError::Invalid(format!(
                "scenario '{}': duplicate supplier id '{}'",
                tender.slug, supplier.id
            )));
        }
        if !supplier.price.is_finite() {
            return Err(CatalogError::Invalid(format!(
                "scenario '{}': supplier '{}' has a non-finite price",
                tender.slug, supplier.id
            )));
        }
        for (facet, score) in &supplier.scores.facets {
            if !(0.0..=5.0).contains(score) {
                return Err(CatalogError::Invalid(format!(
                    "scenario '{}': supplier '{}' {} score {} is outside 0-5",
                    tender.slug, supplier.id, facet, score
                )));
            }
        }
    }

    let mut names = HashSet::new();
    for category in &tender.categories {
        if !names.insert(category.name.as_str()) {
            return Err(CatalogError::Invalid(format!(
                "scenario '{}': duplicate category '{}'",
                tender.slug, category.name
            )));
        }
    }

    Ok(())
}

/// A category field whose key no supplier can supply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedKey {
    pub category: String,
    pub key: String,
}

/// Find category field keys that resolve to nothing for this scenario
///
/// These are not errors: the comparison renders them as placeholders.
pub fn unresolved_field_keys(tender: &TenderConfig) -> Vec<UnresolvedKey> {
    let mut unresolved = Vec::new();

    for category in &tender.categories {
        let is_relevance = Facet::for_category(&category.name) == Some(Facet::Relevance);
        for field in &category.fields {
            if field.key == PRICE_KEY {
                continue;
            }
            let known = tender.suppliers.iter().any(|s| {
                if is_relevance {
                    s.scores.relevance.contains_key(&field.key)
                } else {
                    s.fields.contains_key(&field.key)
                }
            });
            if !known {
                unresolved.push(UnresolvedKey { category: category.name.clone(), key: field.key.clone() });
            }
        }
    }

    unresolved
}

/// Log and return unresolved keys for every scenario in the catalogue
pub fn validate(catalog: &Catalog) -> Vec<(String, UnresolvedKey)> {
    let mut findings = Vec::new();
    for tender in &catalog.tenders {
        for key in unresolved_field_keys(tender) {
            warn!(
                "scenario '{}': field '{}' in category '{}' resolves to no supplier value",
                tender.slug, key.key, key.category
            );
            findings.push((tender.slug.clone(), key));
        }
    }
    findings
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod catalog_test;
