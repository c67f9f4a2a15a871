//! # Naming Conventions
//!
//! Derives the names of generated entry points from schema names: the
//! singular field-definer name (`inputs` → `input`, `data` → `datum`) and
//! the rule-definer name built from the configured prefix and suffix.

use crate::config::Configuration;

/// Plural → singular pairs that do not follow the suffix rules.
const IRREGULAR: &[(&str, &str)] = &[
    ("people", "person"),
    ("children", "child"),
    ("men", "man"),
    ("women", "woman"),
    ("mice", "mouse"),
    ("geese", "goose"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("oxen", "ox"),
    ("data", "datum"),
    ("metadata", "metadatum"),
    ("media", "medium"),
    ("criteria", "criterion"),
    ("phenomena", "phenomenon"),
    ("indices", "index"),
    ("matrices", "matrix"),
    ("vertices", "vertex"),
    ("analyses", "analysis"),
    ("theses", "thesis"),
    ("crises", "crisis"),
    ("axes", "axis"),
    ("statuses", "status"),
    ("aliases", "alias"),
    ("quizzes", "quiz"),
    ("shoes", "shoe"),
    ("moves", "move"),
    ("movies", "movie"),
];

/// Words whose singular and plural forms are identical.
const UNCOUNTABLE: &[&str] = &[
    "equipment",
    "information",
    "rice",
    "money",
    "species",
    "series",
    "fish",
    "sheep",
    "jeans",
    "police",
    "news",
];

/// Singularize an English plural.
///
/// Irregular and uncountable words are looked up first; the last
/// `_`-separated segment of a compound name is the one inflected
/// (`pagination_params` → `pagination_param`, `line_items` → `line_item`).
pub fn singularize(word: &str) -> String {
    let (head, last) = match word.rfind('_') {
        Some(idx) => word.split_at(idx + 1),
        None => ("", word),
    };
    format!("{head}{}", singularize_word(last))
}

fn singularize_word(word: &str) -> String {
    let lower = word.to_ascii_lowercase();

    if UNCOUNTABLE.contains(&lower.as_str()) {
        return word.to_owned();
    }
    if let Some((_, singular)) = IRREGULAR.iter().find(|(plural, _)| *plural == lower) {
        return (*singular).to_owned();
    }
    // Already-singular irregulars map to themselves.
    if IRREGULAR.iter().any(|(_, singular)| *singular == lower) {
        return word.to_owned();
    }

    let strip = |n: usize| word[..word.len() - n].to_owned();

    if lower.ends_with("ies") && lower.len() > 3 {
        return format!("{}y", strip(3));
    }
    if lower.ends_with("ves") && lower.len() > 3 {
        let stem = strip(3);
        return if ["kni", "wi", "li"].iter().any(|s| stem.ends_with(s)) {
            format!("{stem}fe")
        } else {
            format!("{stem}f")
        };
    }
    for suffix in ["sses", "xes", "ches", "shes", "zzes"] {
        if lower.ends_with(suffix) {
            return strip(2);
        }
    }
    if lower.ends_with("oes") && lower.len() > 4 {
        return strip(2);
    }
    if lower.ends_with("ss") || lower.ends_with("us") || lower.ends_with("is") {
        return word.to_owned();
    }
    if lower.ends_with('s') && lower.len() > 1 {
        return strip(1);
    }
    word.to_owned()
}

/// Whether `name` can be used as a generated entry-point name: ASCII
/// letters, digits and underscores, not starting with a digit.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Build the rule-definer name: `[prefix_]field_definer[_suffix]`.
pub fn rule_method_name(field_definer: &str, configuration: &Configuration) -> String {
    let mut parts: Vec<&str> = Vec::with_capacity(3);
    if let Some(prefix) = configuration.rule_prefix.as_deref() {
        parts.push(prefix);
    }
    parts.push(field_definer);
    if let Some(suffix) = configuration.rule_suffix.as_deref() {
        parts.push(suffix);
    }
    parts.join("_")
}

/// Name of the reset entry point for `schema`.
pub fn reset_method_name(schema: &str) -> String {
    format!("reset_{schema}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;

    #[test]
    fn singularizes_regular_plurals() {
        assert_eq!(singularize("inputs"), "input");
        assert_eq!(singularize("outputs"), "output");
        assert_eq!(singularize("items"), "item");
        assert_eq!(singularize("categories"), "category");
        assert_eq!(singularize("boxes"), "box");
        assert_eq!(singularize("matches"), "match");
        assert_eq!(singularize("addresses"), "address");
        assert_eq!(singularize("expects"), "expect");
    }

    #[test]
    fn singularizes_irregular_plurals() {
        assert_eq!(singularize("people"), "person");
        assert_eq!(singularize("children"), "child");
        assert_eq!(singularize("data"), "datum");
        assert_eq!(singularize("metadata"), "metadatum");
        assert_eq!(singularize("knives"), "knife");
        assert_eq!(singularize("leaves"), "leaf");
    }

    #[test]
    fn leaves_singular_and_uncountable_words() {
        assert_eq!(singularize("input"), "input");
        assert_eq!(singularize("status"), "status");
        assert_eq!(singularize("person"), "person");
        assert_eq!(singularize("state"), "state");
        assert_eq!(singularize("sheep"), "sheep");
    }

    #[test]
    fn inflects_last_segment_of_compound_names() {
        assert_eq!(singularize("line_items"), "line_item");
        assert_eq!(singularize("pagination_params"), "pagination_param");
        assert_eq!(singularize("news_series"), "news_series");
    }

    #[test]
    fn identifier_check() {
        assert!(is_identifier("datum"));
        assert!(is_identifier("_private"));
        assert!(is_identifier("input2"));
        assert!(!is_identifier("123"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("has space"));
        assert!(!is_identifier("dash-ed"));
    }

    #[test]
    fn rule_names_follow_configuration() {
        let mut config = Configuration::default();
        assert_eq!(rule_method_name("input", &config), "input_rule");

        config.rule_suffix = Some(Cow::Borrowed("validation"));
        assert_eq!(rule_method_name("input", &config), "input_validation");

        config.rule_prefix = Some(Cow::Borrowed("validate"));
        config.rule_suffix = None;
        assert_eq!(rule_method_name("input", &config), "validate_input");

        config.rule_prefix = Some(Cow::Borrowed("check"));
        config.rule_suffix = Some(Cow::Borrowed("constraints"));
        assert_eq!(rule_method_name("input", &config), "check_input_constraints");

        config.rule_prefix = None;
        config.rule_suffix = None;
        assert_eq!(rule_method_name("input", &config), "input");
    }

    #[test]
    fn reset_name() {
        assert_eq!(reset_method_name("inputs"), "reset_inputs");
    }
}
