// SPDX-License-Identifier: MIT OR Apache-2.0
//! Normalization of enum setting values written by hand.
//!
//! Documents edited outside the host often spell operations loosely
//! (`"sub"`, `"Color Dodge"`, `"<"`). Values are canonicalized and then
//! mapped through an alias table before they are checked against the
//! node kind's allowed identifiers.

/// Short and long spellings of math, vector math and blend operations
const ALIASES: &[(&str, &str)] = &[
    // Math
    ("SUB", "SUBTRACT"),
    ("MUL", "MULTIPLY"),
    ("DIV", "DIVIDE"),
    ("SIN", "SINE"),
    ("COS", "COSINE"),
    ("TAN", "TANGENT"),
    ("ASIN", "ARCSINE"),
    ("ACOS", "ARCCOSINE"),
    ("ATAN", "ARCTANGENT"),
    ("ATAN2", "ARCTAN2"),
    ("POW", "POWER"),
    ("LOG", "LOGARITHM"),
    ("MIN", "MINIMUM"),
    ("MAX", "MAXIMUM"),
    ("LT", "LESS_THAN"),
    ("<", "LESS_THAN"),
    ("GT", "GREATER_THAN"),
    (">", "GREATER_THAN"),
    ("MOD", "MODULO"),
    ("ABS", "ABSOLUTE"),
    ("SQUARE_ROOT", "SQRT"),
    ("INV_SQRT", "INVERSE_SQRT"),
    ("INVERSE_SQUARE_ROOT", "INVERSE_SQRT"),
    ("CEILING", "CEIL"),
    ("TRUNCATE", "TRUNC"),
    ("FRACTION", "FRACT"),
    ("MADD", "MULTIPLY_ADD"),
    // Vector math
    ("CROSS", "CROSS_PRODUCT"),
    ("DOT", "DOT_PRODUCT"),
    ("DIST", "DISTANCE"),
    ("LEN", "LENGTH"),
    ("NORMAL", "NORMALIZE"),
    // Blend modes
    ("BLEND", "MIX"),
    ("COLOR_BURN", "BURN"),
    ("COLOR_DODGE", "DODGE"),
    ("DIFF", "DIFFERENCE"),
    ("SAT", "SATURATION"),
];

/// Trim, uppercase and replace spaces with underscores
pub fn canonical(raw: &str) -> String {
    raw.trim().to_uppercase().replace(' ', "_")
}

/// Look up the long form of an alias
pub fn expand(canonical: &str) -> Option<&'static str> {
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == canonical)
        .map(|(_, full)| *full)
}

/// Map a loosely written value onto one of `items`.
///
/// Tried in order: the raw value, its canonical form, the alias target, and
/// a case-insensitive match. When nothing matches the canonical (or
/// expanded) form is returned so the caller reports a meaningful value.
pub fn normalize_enum(raw: &str, items: &[String]) -> String {
    let contains = |candidate: &str| items.iter().any(|item| item == candidate);
    if contains(raw) {
        return raw.to_string();
    }

    let canon = canonical(raw);
    let expanded = expand(&canon);
    let found = [Some(canon.as_str()), expanded]
        .into_iter()
        .flatten()
        .find(|candidate| contains(candidate))
        .or_else(|| {
            items
                .iter()
                .map(String::as_str)
                .find(|item| item.eq_ignore_ascii_case(&canon))
        })
        .map(str::to_string);

    match (found, expanded) {
        (Some(found), _) => found,
        (None, Some(expanded)) => expanded.to_string(),
        (None, None) => canon,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_canonical() {
        assert_eq!(canonical("  soft light "), "SOFT_LIGHT");
        assert_eq!(canonical("<"), "<");
    }

    #[test]
    fn test_aliases() {
        let math = items(&["ADD", "SUBTRACT", "LESS_THAN", "INVERSE_SQRT", "FRACT"]);
        assert_eq!(normalize_enum("sub", &math), "SUBTRACT");
        assert_eq!(normalize_enum("<", &math), "LESS_THAN");
        assert_eq!(normalize_enum("inv sqrt", &math), "INVERSE_SQRT");
        assert_eq!(normalize_enum("inverse square root", &math), "INVERSE_SQRT");
        assert_eq!(normalize_enum("Add", &math), "ADD");
    }

    #[test]
    fn test_exact_item_beats_alias() {
        let vector_math = items(&["FRACTION", "NORMALIZE"]);
        assert_eq!(normalize_enum("fraction", &vector_math), "FRACTION");
        assert_eq!(normalize_enum("normal", &vector_math), "NORMALIZE");
    }

    #[test]
    fn test_mixed_case_items() {
        let interpolation = items(&["Linear", "Closest"]);
        assert_eq!(normalize_enum("Linear", &interpolation), "Linear");
        assert_eq!(normalize_enum("closest", &interpolation), "Closest");
    }

    #[test]
    fn test_unknown_passes_through() {
        let blend = items(&["MIX", "DODGE"]);
        assert_eq!(normalize_enum("color dodge", &blend), "DODGE");
        assert_eq!(normalize_enum("sparkle", &blend), "SPARKLE");
        assert_eq!(normalize_enum("sub", &blend), "SUBTRACT");
    }
}
