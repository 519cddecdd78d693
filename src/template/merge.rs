//! Deep merge of configuration documents.
//!
//! Layers are immutable once loaded; merging always produces a new document.
//! Precedence order (low to high) is base, distribution, variant, optional
//! version-specific layer, and is not configurable: later layers exist
//! specifically to specialize earlier ones.

use serde_yaml::Value;

/// Deep-merge two documents, the second taking precedence.
///
/// Rules:
/// - mapping + mapping: keys present on one side pass through, keys present
///   on both recurse;
/// - sequence + sequence: the higher-precedence sequence replaces the lower
///   wholesale (never concatenated or unioned, so precedence stays
///   unambiguous for ordered lists like package lists);
/// - anything else, including type mismatches: the higher-precedence value
///   wins outright. Type mismatches are not errors; template authors are
///   trusted.
///
/// Total over any two well-formed documents.
pub fn deep_merge(lower: &Value, higher: &Value) -> Value {
    match (lower, higher) {
        (Value::Mapping(lo), Value::Mapping(hi)) => {
            let mut merged = serde_yaml::Mapping::new();
            for (key, lo_value) in lo {
                let combined = match hi.get(key) {
                    Some(hi_value) => deep_merge(lo_value, hi_value),
                    None => lo_value.clone(),
                };
                merged.insert(key.clone(), combined);
            }
            for (key, hi_value) in hi {
                if !lo.contains_key(key) {
                    merged.insert(key.clone(), hi_value.clone());
                }
            }
            Value::Mapping(merged)
        }
        (_, higher) => higher.clone(),
    }
}

/// Merge the resolved layers in fixed precedence order.
pub fn merge_layers(
    base: &Value,
    distribution: &Value,
    variant: &Value,
    version_layer: Option<&Value>,
) -> Value {
    let mut merged = deep_merge(base, distribution);
    merged = deep_merge(&merged, variant);
    if let Some(layer) = version_layer {
        merged = deep_merge(&merged, layer);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(yaml: &str) -> Value {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn disjoint_keys_pass_through() {
        let merged = deep_merge(&doc("a: 1"), &doc("b: 2"));
        assert_eq!(merged, doc("a: 1\nb: 2"));
    }

    #[test]
    fn precedence_across_three_layers() {
        let base = doc("a: 1\nb: 1");
        let distribution = doc("b: 2\nc: 2");
        let variant = doc("c: 3\nd: 3");

        let merged = merge_layers(&base, &distribution, &variant, None);
        assert_eq!(merged, doc("a: 1\nb: 2\nc: 3\nd: 3"));
    }

    #[test]
    fn nested_mappings_merge_recursively() {
        let lower = doc("build:\n  stages:\n    builder:\n      jobs: 4\n      image: debian");
        let higher = doc("build:\n  stages:\n    builder:\n      jobs: 8");

        let merged = deep_merge(&lower, &higher);
        assert_eq!(merged["build"]["stages"]["builder"]["jobs"], doc("8"));
        assert_eq!(merged["build"]["stages"]["builder"]["image"], doc("debian"));
    }

    #[test]
    fn sequences_replace_not_union() {
        let lower = doc("pkgs: [x, y]");
        let higher = doc("pkgs: [z]");

        let merged = deep_merge(&lower, &higher);
        assert_eq!(merged, doc("pkgs: [z]"));
    }

    #[test]
    fn type_mismatch_resolved_by_higher_side() {
        let merged = deep_merge(&doc("a: [1, 2]"), &doc("a: scalar"));
        assert_eq!(merged, doc("a: scalar"));

        let merged = deep_merge(&doc("a: scalar"), &doc("a:\n  nested: true"));
        assert_eq!(merged, doc("a:\n  nested: true"));
    }

    #[test]
    fn version_layer_has_highest_precedence() {
        let base = doc("a: base");
        let distribution = doc("a: dist");
        let variant = doc("a: variant");
        let version = doc("a: version");

        let merged = merge_layers(&base, &distribution, &variant, Some(&version));
        assert_eq!(merged, doc("a: version"));
    }

    #[test]
    fn merge_is_deterministic() {
        let base = doc("a: 1\nnested:\n  x: [1, 2]\n  y: true");
        let over = doc("nested:\n  x: [3]\nb: 2");

        let first = serde_yaml::to_string(&deep_merge(&base, &over)).unwrap();
        let second = serde_yaml::to_string(&deep_merge(&base, &over)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn inputs_are_not_mutated() {
        let lower = doc("a: 1");
        let higher = doc("a: 2");
        let _ = deep_merge(&lower, &higher);
        assert_eq!(lower, doc("a: 1"));
        assert_eq!(higher, doc("a: 2"));
    }
}
