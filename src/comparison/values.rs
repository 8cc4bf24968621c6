//! Value resolution and display formatting.
//!
//! Every lookup here is total. A value that cannot be found renders as the
//! placeholder, never as an error.

use super::grouping::is_relevance_category;
use crate::types::{Category, CategoryField, FieldValue, PRICE_KEY, Supplier, TenderConfig, Unit};

/// Shown wherever a supplier has no value for a field
pub const PLACEHOLDER: &str = "—";

/// A value found for a (supplier, field) pair, before formatting
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawValue<'a> {
    Number(f64),
    Field(&'a FieldValue),
}

/// A formatted table cell.
///
/// `flagged` marks values that need attention (TBC, not required); the text
/// itself is unchanged by flagging.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Cell {
    pub text: String,
    pub flagged: bool,
}

impl Cell {
    pub fn new(text: String) -> Self {
        let flagged = is_tbc_or_not_required(&text);
        Self { text, flagged }
    }
}

/// Look up the raw value for a field.
///
/// `price` reads the supplier price, the relevance category reads relevance
/// sub-scores, everything else reads the field map.
pub fn resolve_value<'a>(supplier: &'a Supplier, category: &Category, field: &CategoryField) -> Option<RawValue<'a>> {
    if field.key == PRICE_KEY {
        Some(RawValue::Number(supplier.price))
    } else if is_relevance_category(category) {
        supplier.scores.relevance.get(&field.key).map(|score| RawValue::Number(*score))
    } else {
        supplier.fields.get(&field.key).map(RawValue::Field)
    }
}

/// Resolve and format the cell for a (supplier, field) pair
pub fn format_cell(config: &TenderConfig, supplier: &Supplier, category: &Category, field: &CategoryField) -> Cell {
    let raw = resolve_value(supplier, category, field);
    let unit = config.unit_for(&field.key);
    Cell::new(format_value(raw, unit.as_ref(), field.is_score))
}

/// Turn a raw value into display text
pub fn format_value(raw: Option<RawValue<'_>>, unit: Option<&Unit>, is_score: bool) -> String {
    match raw {
        None => PLACEHOLDER.to_string(),
        Some(RawValue::Number(n)) => format_number_value(n, unit, is_score),
        Some(RawValue::Field(FieldValue::Number(n))) => format_number_value(*n, unit, is_score),
        Some(RawValue::Field(FieldValue::Flag(b))) => yes_no(*b).to_string(),
        Some(RawValue::Field(FieldValue::Text(s))) => format_text_value(s, unit, is_score),
    }
}

fn format_number_value(n: f64, unit: Option<&Unit>, is_score: bool) -> String {
    if !n.is_finite() {
        return n.to_string();
    }
    if is_score {
        return format!("{:.1}/5", n);
    }
    let plain = plain_number(n);
    match unit {
        Some(unit) => match group_numeric(&plain) {
            Some(grouped) => unit.apply(&grouped),
            None => plain,
        },
        None => plain,
    }
}

fn format_text_value(s: &str, unit: Option<&Unit>, is_score: bool) -> String {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return PLACEHOLDER.to_string();
    }
    if trimmed.eq_ignore_ascii_case("true") {
        return yes_no(true).to_string();
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return yes_no(false).to_string();
    }
    if is_score
        && let Ok(score) = trimmed.parse::<f64>()
        && score.is_finite()
    {
        return format!("{:.1}/5", score);
    }
    if let Some(unit) = unit
        && let Some(grouped) = group_numeric(trimmed)
    {
        return unit.apply(&grouped);
    }
    s.to_string()
}

fn yes_no(b: bool) -> &'static str {
    if b { "Yes" } else { "No" }
}

/// Render a number without grouping, dropping a zero fractional part
fn plain_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 { format!("{:.0}", n) } else { format!("{}", n) }
}

/// Insert thousands separators into a numeric-looking string.
///
/// Accepts an optional sign, digits (existing commas allowed) and an optional
/// fractional part. Returns `None` for anything else.
fn group_numeric(s: &str) -> Option<String> {
    let (sign, rest) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s),
    };
    let (int_part, frac_part) = match rest.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (rest, None),
    };

    let digits: String = int_part.chars().filter(|c| *c != ',').collect();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    if let Some(frac) = frac_part
        && (frac.is_empty() || !frac.chars().all(|c| c.is_ascii_digit()))
    {
        return None;
    }

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    Some(match frac_part {
        Some(frac) => format!("{}{}.{}", sign, grouped, frac),
        None => format!("{}{}", sign, grouped),
    })
}

/// Whether a value should be highlighted for follow-up
pub fn is_tbc_or_not_required(value: &str) -> bool {
    let lower = value.to_lowercase();
    lower.contains("tbc") || lower.contains("not required")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> FieldValue {
        FieldValue::Text(s.to_string())
    }

    fn suffix(s: &str) -> Unit {
        Unit::Suffix(s.to_string())
    }

    fn currency(s: &str) -> Unit {
        Unit::Currency(s.to_string())
    }

    #[test]
    fn test_missing_and_empty_render_placeholder() {
        assert_eq!(format_value(None, None, false), "—");
        assert_eq!(format_value(Some(RawValue::Field(&text(""))), None, false), "—");
        assert_eq!(format_value(Some(RawValue::Field(&text("   "))), None, false), "—");
    }

    #[test]
    fn test_boolean_tokens() {
        assert_eq!(format_value(Some(RawValue::Field(&text("TRUE"))), None, false), "Yes");
        assert_eq!(format_value(Some(RawValue::Field(&text("false"))), None, false), "No");
        assert_eq!(format_value(Some(RawValue::Field(&FieldValue::Flag(true))), None, false), "Yes");
        // Only the exact tokens are converted
        assert_eq!(format_value(Some(RawValue::Field(&text("TRUE-ish"))), None, false), "TRUE-ish");
    }

    #[test]
    fn test_units_applied_to_numbers() {
        let years = suffix(" years");
        let gbp = currency("£");
        assert_eq!(format_value(Some(RawValue::Field(&FieldValue::Number(25.0))), Some(&years), false), "25 years");
        assert_eq!(format_value(Some(RawValue::Field(&FieldValue::Number(1500.0))), Some(&gbp), false), "£1,500");
        assert_eq!(format_value(Some(RawValue::Field(&text("1500"))), Some(&gbp), false), "£1,500");
        assert_eq!(format_value(Some(RawValue::Number(1234567.5)), Some(&gbp), false), "£1,234,567.5");
        assert_eq!(format_value(Some(RawValue::Field(&text("72540"))), Some(&suffix(" kWh")), false), "72,540 kWh");
        assert_eq!(format_value(Some(RawValue::Field(&text("62"))), Some(&suffix("%")), false), "62%");
    }

    #[test]
    fn test_non_numeric_values_pass_through() {
        let gbp = currency("£");
        assert_eq!(format_value(Some(RawValue::Field(&text("TBC"))), Some(&gbp), false), "TBC");
        assert_eq!(format_value(Some(RawValue::Field(&text("10 years"))), Some(&suffix(" years")), false), "10 years");
        assert_eq!(format_value(Some(RawValue::Field(&text("Roof"))), None, false), "Roof");
    }

    #[test]
    fn test_numbers_without_unit_are_plain() {
        assert_eq!(format_value(Some(RawValue::Field(&FieldValue::Number(1240.0))), None, false), "1240");
        assert_eq!(format_value(Some(RawValue::Field(&FieldValue::Number(96.6))), None, false), "96.6");
    }

    #[test]
    fn test_score_formatting() {
        assert_eq!(format_value(Some(RawValue::Number(4.8)), None, true), "4.8/5");
        assert_eq!(format_value(Some(RawValue::Number(4.0)), None, true), "4.0/5");
        assert_eq!(format_value(Some(RawValue::Field(&text("3.26"))), None, true), "3.3/5");
    }

    #[test]
    fn test_non_finite_scores_pass_through() {
        assert_eq!(format_value(Some(RawValue::Field(&text("NaN"))), None, true), "NaN");
        assert_eq!(format_value(Some(RawValue::Field(&text("inf"))), None, true), "inf");
        assert_eq!(format_value(Some(RawValue::Number(f64::NAN)), None, true), "NaN");
        assert_eq!(format_value(Some(RawValue::Number(f64::INFINITY)), Some(&currency("£")), false), "inf");
    }

    #[test]
    fn test_negative_amounts_put_sign_before_currency() {
        let gbp = currency("£");
        assert_eq!(format_value(Some(RawValue::Number(-1500.0)), Some(&gbp), false), "-£1,500");
        assert_eq!(format_value(Some(RawValue::Field(&text("-45000.5"))), Some(&gbp), false), "-£45,000.5");
        assert_eq!(format_value(Some(RawValue::Number(-3.0)), Some(&suffix(" years")), false), "-3 years");
    }

    #[test]
    fn test_group_numeric() {
        assert_eq!(group_numeric("0"), Some("0".to_string()));
        assert_eq!(group_numeric("999"), Some("999".to_string()));
        assert_eq!(group_numeric("1000"), Some("1,000".to_string()));
        assert_eq!(group_numeric("1,000"), Some("1,000".to_string()));
        assert_eq!(group_numeric("-45000.25"), Some("-45,000.25".to_string()));
        assert_eq!(group_numeric("12a"), None);
        assert_eq!(group_numeric("1."), None);
        assert_eq!(group_numeric(""), None);
    }

    #[test]
    fn test_tbc_flagging() {
        assert!(is_tbc_or_not_required("TBC on site visit"));
        assert!(is_tbc_or_not_required("Not required"));
        assert!(!is_tbc_or_not_required("Yes"));

        let cell = Cell::new("TBC: Roof / Outside".to_string());
        assert!(cell.flagged);
        assert_eq!(cell.text, "TBC: Roof / Outside");
        assert!(!Cell::new(PLACEHOLDER.to_string()).flagged);
    }
}
