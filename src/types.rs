/// Core data structures for tender scenarios
///
/// This module defines the records that make up a scenario: suppliers with
/// their typed field maps and score cards, the categories that group fields
/// in the comparison table, and the scenario config that owns them.
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fmt;

/// One procurement scenario as loaded from the catalogue
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TenderConfig {
    pub slug: String, // "solar-pv"
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub location: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub overview: TenderOverview,
    /// Symbol used for supplier prices ("£", "€")
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Field key -> unit applied when formatting numeric values
    #[serde(default)]
    pub units: BTreeMap<String, Unit>,
    #[serde(default)]
    pub suppliers: Vec<Supplier>,
    #[serde(default)]
    pub categories: Vec<Category>,
    /// Field key -> explanation shown in the key fields reference
    #[serde(default)]
    pub field_explanations: BTreeMap<String, String>,
}

fn default_currency() -> String {
    "£".to_string()
}

impl TenderConfig {
    /// Find a supplier by id
    pub fn supplier(&self, id: &str) -> Option<&Supplier> {
        self.suppliers.iter().find(|s| s.id == id)
    }

    /// Unit for a field key, with the scenario currency standing in for `price`
    pub fn unit_for(&self, key: &str) -> Option<Unit> {
        if let Some(unit) = self.units.get(key) {
            return Some(unit.clone());
        }
        if key == PRICE_KEY { Some(Unit::Currency(self.currency.clone())) } else { None }
    }

    /// File name offered for the CSV export of this scenario
    pub fn export_file_name(&self) -> String {
        if self.slug.is_empty() {
            "tender-comparison.csv".to_string()
        } else {
            format!("{}-tender-comparison.csv", self.slug)
        }
    }
}

/// Headline numbers and notes about how the tender went
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TenderOverview {
    pub invited: u32,
    pub submitted: u32,
    pub response_rate: u32, // percent
    #[serde(default)]
    pub details: Vec<String>,
    pub closed_date: NaiveDate,
    pub duration: String, // "14 days"
}

impl TenderOverview {
    /// "4 of 20 suppliers submitted (20% response rate)"
    pub fn summary_line(&self) -> String {
        format!(
            "{} of {} suppliers submitted ({}% response rate)",
            self.submitted, self.invited, self.response_rate
        )
    }
}

/// A bidder in one scenario
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Supplier {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub logo: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub fields: FieldMap,
    #[serde(default)]
    pub scores: ScoreCard,
    #[serde(default)]
    pub additional_notes: String,
    #[serde(default)]
    pub key_differentiator: String,
    #[serde(default)]
    pub documents: Vec<Document>,
}

impl Supplier {
    /// Score for the facet currently driving the view
    pub fn general_score(&self, facet: Facet) -> Option<f64> {
        self.scores.facets.get(&facet).copied()
    }
}

/// Attachment listed on the bid-details panel
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Document {
    pub name: String,
    pub url: String,
}

/// A value stored in a supplier's field map
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Number(f64),
    Text(String),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Flag(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Typed field map keyed by field key
///
/// Lookups are total: an absent key is `None`, never an error.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct FieldMap(BTreeMap<String, FieldValue>);

impl FieldMap {
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }
}

/// Canonical scoring for a supplier
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScoreCard {
    /// Per-facet score, 0 to 5
    #[serde(default)]
    pub facets: BTreeMap<Facet, f64>,
    /// Relevance sub-scores, keyed by the relevance category's field keys
    #[serde(default)]
    pub relevance: BTreeMap<String, f64>,
}

/// Named group of comparison fields
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Category {
    pub name: String,
    pub fields: Vec<CategoryField>,
    #[serde(default)]
    pub expanded: bool,
}

/// A row in the comparison table
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CategoryField {
    pub label: String,
    pub key: String,
    #[serde(default)]
    pub tooltip: Option<String>,
    #[serde(default)]
    pub is_score: bool,
}

/// Field key that reads the supplier's price instead of the field map
pub const PRICE_KEY: &str = "price";

/// Unit applied to numeric values of a field
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    /// Prefixed symbol: "£1,500"
    Currency(String),
    /// Suffixed text: "25 years"
    Suffix(String),
}

impl Unit {
    pub fn apply(&self, number: &str) -> String {
        match self {
            // Sign goes before the symbol: "-£1,500"
            Unit::Currency(symbol) => match number.strip_prefix('-') {
                Some(magnitude) => format!("-{}{}", symbol, magnitude),
                None => format!("{}{}", symbol, number),
            },
            Unit::Suffix(suffix) => format!("{}{}", number, suffix),
        }
    }
}

/// Lens used to reorder categories and pick a supplier's general score
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Facet {
    Relevance,
    Financial,
    Speed,
    Technical,
}

impl Facet {
    pub const ALL: [Facet; 4] = [Facet::Relevance, Facet::Financial, Facet::Speed, Facet::Technical];

    pub fn as_str(&self) -> &'static str {
        match self {
            Facet::Relevance => "relevance",
            Facet::Financial => "financial",
            Facet::Speed => "speed",
            Facet::Technical => "technical",
        }
    }

    /// Name of the category this facet brings to the front
    pub fn category_label(&self) -> &'static str {
        match self {
            Facet::Relevance => "Relevance",
            Facet::Financial => "Cost & Financial",
            Facet::Speed => "Installation Timeline",
            Facet::Technical => "Technical Requirements",
        }
    }

    /// Facet-labelled categories in display order when this facet is active
    pub fn priority(&self) -> [Facet; 4] {
        match self {
            Facet::Relevance => [Facet::Relevance, Facet::Technical, Facet::Financial, Facet::Speed],
            Facet::Financial => [Facet::Financial, Facet::Relevance, Facet::Technical, Facet::Speed],
            Facet::Speed => [Facet::Speed, Facet::Relevance, Facet::Technical, Facet::Financial],
            Facet::Technical => [Facet::Technical, Facet::Relevance, Facet::Financial, Facet::Speed],
        }
    }

    /// Facet whose label is this category name, if any
    pub fn for_category(name: &str) -> Option<Facet> {
        Facet::ALL.into_iter().find(|f| f.category_label() == name)
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key used to order supplier cards and table columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Price,
    Name,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Price => "price",
            SortKey::Name => "name",
        }
    }
}
