//! Supplier ordering.
//!
//! Ordering is never stored on the data: every call derives a fresh view and
//! leaves the input slice untouched.

use crate::types::{SortKey, Supplier};
use std::cmp::Ordering;

/// Order suppliers by the given key.
///
/// Uses a stable sort, so suppliers with equal keys keep their catalogue order.
pub fn sort_suppliers(suppliers: &[Supplier], key: SortKey) -> Vec<&Supplier> {
    let mut sorted: Vec<&Supplier> = suppliers.iter().collect();
    match key {
        SortKey::Price => sorted.sort_by(|a, b| a.price.total_cmp(&b.price)),
        SortKey::Name => sorted.sort_by(|a, b| locale_cmp(&a.name, &b.name)),
    }
    sorted
}

/// Compare two display names the way a reader would alphabetise them.
///
/// Base letters decide first (case and accents ignored), then accents
/// (unaccented first), then case (lowercase first). At the base level
/// punctuation and symbols sort before digits, and digits before letters.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    primary_key(a)
        .cmp(&primary_key(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| case_pattern(a).cmp(&case_pattern(b)))
        .then_with(|| a.cmp(b))
}

fn primary_key(s: &str) -> Vec<(u8, char)> {
    base_letters(s).chars().map(|c| (char_rank(c), c)).collect()
}

fn char_rank(c: char) -> u8 {
    if c.is_alphabetic() {
        2
    } else if c.is_numeric() {
        1
    } else {
        0
    }
}

fn base_letters(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars().flat_map(char::to_lowercase) {
        match c {
            'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ą' => out.push('a'),
            'ç' | 'ć' | 'č' => out.push('c'),
            'ď' | 'đ' => out.push('d'),
            'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ę' | 'ě' => out.push('e'),
            'ì' | 'í' | 'î' | 'ï' | 'ī' => out.push('i'),
            'ł' => out.push('l'),
            'ñ' | 'ń' | 'ň' => out.push('n'),
            'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ő' => out.push('o'),
            'ř' => out.push('r'),
            'ś' | 'š' => out.push('s'),
            'ť' => out.push('t'),
            'ù' | 'ú' | 'û' | 'ü' | 'ū' | 'ů' | 'ű' => out.push('u'),
            'ý' | 'ÿ' => out.push('y'),
            'ź' | 'ż' | 'ž' => out.push('z'),
            'ß' => out.push_str("ss"),
            'æ' => out.push_str("ae"),
            'œ' => out.push_str("oe"),
            _ => out.push(c),
        }
    }
    out
}

fn case_pattern(s: &str) -> Vec<bool> {
    s.chars().map(char::is_uppercase).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FieldMap, ScoreCard};

    fn supplier(id: &str, name: &str, price: f64) -> Supplier {
        Supplier {
            id: id.to_string(),
            name: name.to_string(),
            logo: None,
            price,
            fields: FieldMap::default(),
            scores: ScoreCard::default(),
            additional_notes: String::new(),
            key_differentiator: String::new(),
            documents: vec![],
        }
    }

    fn ids(sorted: &[&Supplier]) -> Vec<String> {
        sorted.iter().map(|s| s.id.clone()).collect()
    }

    #[test]
    fn test_sort_by_price_and_name() {
        let suppliers = vec![supplier("a", "A", 500.0), supplier("b", "B", 300.0)];
        assert_eq!(ids(&sort_suppliers(&suppliers, SortKey::Price)), vec!["b", "a"]);
        assert_eq!(ids(&sort_suppliers(&suppliers, SortKey::Name)), vec!["a", "b"]);
    }

    #[test]
    fn test_sort_leaves_input_untouched() {
        let suppliers = vec![supplier("a", "Zed", 9.0), supplier("b", "Amp", 1.0)];
        let _ = sort_suppliers(&suppliers, SortKey::Price);
        assert_eq!(suppliers[0].id, "a");
        assert_eq!(suppliers[1].id, "b");
    }

    #[test]
    fn test_sort_empty() {
        assert!(sort_suppliers(&[], SortKey::Price).is_empty());
        assert!(sort_suppliers(&[], SortKey::Name).is_empty());
    }

    #[test]
    fn test_price_sort_is_non_decreasing_and_stable() {
        let suppliers = vec![
            supplier("1", "One", 48000.0),
            supplier("2", "Two", 45000.0),
            supplier("3", "Three", 48000.0),
            supplier("4", "Four", 12.5),
            supplier("5", "Five", 45000.0),
        ];
        let sorted = sort_suppliers(&suppliers, SortKey::Price);
        assert!(sorted.windows(2).all(|w| w[0].price <= w[1].price));
        // Equal prices keep input order: 2 before 5, 1 before 3
        assert_eq!(ids(&sorted), vec!["4", "2", "5", "1", "3"]);
    }

    #[test]
    fn test_name_sort_is_stable_for_identical_names() {
        let suppliers = vec![supplier("x", "Same", 3.0), supplier("y", "Other", 2.0), supplier("z", "Same", 1.0)];
        assert_eq!(ids(&sort_suppliers(&suppliers, SortKey::Name)), vec!["y", "x", "z"]);
    }

    #[test]
    fn test_resort_is_idempotent() {
        let suppliers = vec![
            supplier("1", "Klimaservice Malte Born", 45000.0),
            supplier("2", "Beka Solar Energie GmbH", 52000.0),
            supplier("3", "Eco-Heat UG", 48000.0),
            supplier("4", "Ecowatt GmbH", 58000.0),
        ];
        for key in [SortKey::Price, SortKey::Name] {
            let once: Vec<Supplier> = sort_suppliers(&suppliers, key).into_iter().cloned().collect();
            let twice = sort_suppliers(&once, key);
            assert_eq!(ids(&twice), once.iter().map(|s| s.id.clone()).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_locale_cmp_ignores_case_first() {
        assert_eq!(locale_cmp("apple", "Banana"), Ordering::Less);
        assert_eq!(locale_cmp("Zebra", "apple"), Ordering::Greater);
        // Lowercase first when otherwise equal
        assert_eq!(locale_cmp("eco", "Eco"), Ordering::Less);
    }

    #[test]
    fn test_locale_cmp_folds_accents() {
        assert_eq!(locale_cmp("Öko Haus", "Paul"), Ordering::Less);
        assert_eq!(locale_cmp("Söhne", "Sohne"), Ordering::Greater);
        assert_eq!(locale_cmp("Straße", "Strasse"), Ordering::Greater);
        assert_eq!(locale_cmp("Straße", "Strasze"), Ordering::Less);
    }

    #[test]
    fn test_locale_cmp_punctuation_before_letters() {
        assert_eq!(locale_cmp("Eco-Heat UG", "Ecowatt GmbH"), Ordering::Less);
        assert_eq!(locale_cmp("A~", "Ab"), Ordering::Less);
        assert_eq!(locale_cmp("A[", "Ab"), Ordering::Less);
        assert_eq!(locale_cmp("A_x", "Aa"), Ordering::Less);
    }

    #[test]
    fn test_locale_cmp_symbols_before_digits_before_letters() {
        assert_eq!(locale_cmp("A:", "A1"), Ordering::Less);
        assert_eq!(locale_cmp("A@", "A9"), Ordering::Less);
        assert_eq!(locale_cmp("A9", "Aa"), Ordering::Less);
        assert_eq!(locale_cmp("2nd Solar", "Alpha"), Ordering::Less);
        assert_eq!(locale_cmp("(Neu) Solar", "2nd Solar"), Ordering::Less);
    }
}
