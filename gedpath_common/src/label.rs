//! Canonical label encoding.
//!
//! An attribute set is encoded as the concatenation of `key=value;` over its
//! attributes in ascending key order. Two attribute sets compare equal iff their
//! canonical labels are equal. Keys and values are not escaped; they must not
//! contain `=` or `;`.

use crate::graph::AttrMap;

/// Separates a key from its value.
pub const KEY_VALUE_SEPARATOR: char = '=';
/// Terminates every attribute.
pub const ATTRIBUTE_TERMINATOR: char = ';';

/// Returns true if every key and value can be encoded without ambiguity.
#[must_use]
pub fn is_encodable(attrs: &AttrMap) -> bool {
    first_unencodable(attrs).is_none()
}

/// Key of the first attribute whose key or value contains a delimiter.
#[must_use]
pub fn first_unencodable(attrs: &AttrMap) -> Option<&str> {
    let delimiters = [KEY_VALUE_SEPARATOR, ATTRIBUTE_TERMINATOR];
    attrs
        .iter()
        .find(|(k, v)| k.contains(delimiters) || v.contains(delimiters))
        .map(|(k, _)| k.as_str())
}

/// Encode an attribute set. Absent and empty sets both encode to `""`.
#[contracts::debug_requires(attrs.is_none_or(is_encodable))]
#[must_use]
pub fn canonical_label(attrs: Option<&AttrMap>) -> String {
    let Some(attrs) = attrs else {
        return String::new();
    };

    let capacity = attrs.iter().map(|(k, v)| k.len() + v.len() + 2).sum();
    let mut label = String::with_capacity(capacity);
    for (key, value) in attrs {
        label.push_str(key);
        label.push(KEY_VALUE_SEPARATOR);
        label.push_str(value);
        label.push(ATTRIBUTE_TERMINATOR);
    }
    label
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn attrs(pairs: &[(&str, &str)]) -> AttrMap {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[rstest]
    #[case(&[], "")]
    #[case(&[("color", "red")], "color=red;")]
    #[case(&[("symbol", "C"), ("charge", "0")], "charge=0;symbol=C;")]
    #[case(&[("y", "1.5"), ("x", "0.25"), ("a", "")], "a=;x=0.25;y=1.5;")]
    fn encodes_sorted_key_value_pairs(#[case] pairs: &[(&str, &str)], #[case] expected: &str) {
        assert_eq!(canonical_label(Some(&attrs(pairs))), expected);
    }

    #[test]
    fn absent_attributes_encode_empty() {
        assert_eq!(canonical_label(None), "");
    }

    #[test]
    fn insertion_order_does_not_matter() {
        let forward = attrs(&[("a", "1"), ("b", "2"), ("c", "3")]);
        let backward = attrs(&[("c", "3"), ("b", "2"), ("a", "1")]);
        assert_eq!(canonical_label(Some(&forward)), canonical_label(Some(&backward)));
    }

    #[test]
    fn delimiters_are_not_encodable() {
        assert!(is_encodable(&attrs(&[("color", "red")])));
        assert!(!is_encodable(&attrs(&[("col=or", "red")])));
        assert!(!is_encodable(&attrs(&[("color", "red;blue")])));
    }

    #[test]
    fn first_unencodable_names_the_key() {
        assert_eq!(first_unencodable(&attrs(&[("a", "1"), ("b", "2")])), None);
        assert_eq!(first_unencodable(&attrs(&[("a", "1;b=2"), ("c", "3")])), Some("a"));
        assert_eq!(first_unencodable(&attrs(&[("x", "0"), ("k=v", "")])), Some("k=v"));
    }
}
