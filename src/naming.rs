//! Naming helpers for type hints.

use once_cell::sync::Lazy;
use regex::Regex;

const UNCOUNTABLE: &[&str] = &[
    "data", "equipment", "information", "metadata", "news", "series", "species",
];

const IRREGULAR: &[(&str, &str)] = &[
    ("people", "person"),
    ("children", "child"),
    ("men", "man"),
    ("women", "woman"),
    ("mice", "mouse"),
    ("geese", "goose"),
    ("feet", "foot"),
    ("teeth", "tooth"),
];

// first match wins
static SINGULAR_RULES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"(?i)(quiz)zes$", "$1"),
        (r"(?i)(matr)ices$", "${1}ix"),
        (r"(?i)(vert|ind)ices$", "${1}ex"),
        (r"(?i)(alias|status|bus)es$", "$1"),
        (r"(?i)(m)ovies$", "${1}ovie"),
        (r"(?i)(x|ch|ss|sh|zz)es$", "$1"),
        (r"(?i)([^aeiouy]|qu)ies$", "${1}y"),
        (r"(?i)(ss|us|is)$", "$1"),
        (r"(?i)s$", ""),
    ]
    .into_iter()
    .map(|(pattern, replacement)| {
        (Regex::new(pattern).expect("singular rule is a valid regex"), replacement)
    })
    .collect()
});

/// Best-effort singular form of an English plural, e.g. `items` → `item`.
/// Names that are not recognizably plural come back unchanged.
pub fn singular(name: &str) -> String {
    let lower = name.to_ascii_lowercase();
    if UNCOUNTABLE.contains(&lower.as_str()) {
        return name.to_owned();
    }
    for (plural, single) in IRREGULAR {
        if lower.ends_with(plural) {
            let stem = &name[..name.len() - plural.len()];
            return format!("{stem}{single}");
        }
    }
    for (rule, replacement) in SINGULAR_RULES.iter() {
        if rule.is_match(name) {
            return rule.replace(name, *replacement).into_owned();
        }
    }
    name.to_owned()
}

/// `user_id` → `UserId`, `line-items` → `LineItems`.
pub fn pascal_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for word in name.split(|c: char| !c.is_alphanumeric()).filter(|w| !w.is_empty()) {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, 'T');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn common_plurals_become_singular() {
        assert_eq!(singular("items"), "item");
        assert_eq!(singular("categories"), "category");
        assert_eq!(singular("boxes"), "box");
        assert_eq!(singular("branches"), "branch");
        assert_eq!(singular("statuses"), "status");
        assert_eq!(singular("indices"), "index");
        assert_eq!(singular("people"), "person");
        assert_eq!(singular("lineItems"), "lineItem");
        assert_eq!(singular("Users"), "User");
    }

    #[test]
    fn non_plurals_are_left_alone() {
        assert_eq!(singular("status"), "status");
        assert_eq!(singular("address"), "address");
        assert_eq!(singular("analysis"), "analysis");
        assert_eq!(singular("data"), "data");
        assert_eq!(singular("point"), "point");
        assert_eq!(singular(""), "");
    }

    #[test]
    fn pascal_case_splits_on_separators() {
        assert_eq!(pascal_case("user_id"), "UserId");
        assert_eq!(pascal_case("line-items"), "LineItems");
        assert_eq!(pascal_case("Root"), "Root");
        assert_eq!(pascal_case("geoLocation"), "GeoLocation");
        assert_eq!(pascal_case("2fa"), "T2fa");
    }
}
