//! Version-triggered post-merge overrides.
//!
//! Some build decisions depend on numeric version comparison and cannot be
//! expressed as static template data. They live here as a small ordered rule
//! list: each rule is a predicate over the parsed version plus an idempotent
//! effect on the merged document. New rules are additive entries in the
//! list, not edits to existing logic.
//!
//! The rules assume the merged document exposes `asterisk.menuselect` as a
//! mapping. A document that lacks it is a template authoring bug and fails
//! with `StructuralAssumption`; the individual module lists under it are
//! created on demand.

use serde_yaml::{Mapping, Sequence, Value};

use super::error::TemplateError;
use super::version::VersionId;

/// Legacy SIP channel driver, removed from Asterisk in 21.
pub const CHAN_SIP: &str = "chan_sip";
/// WebSocket channel driver, mandatory from Asterisk 23.
pub const CHAN_WEBSOCKET: &str = "chan_websocket";
/// Feature flag toggled alongside the websocket module.
pub const FEATURE_WEBSOCKETS: &str = "websockets";

/// First major where chan_sip no longer exists upstream.
pub const CHAN_SIP_REMOVED_MAJOR: u32 = 21;
/// First major where chan_websocket ships and must be enabled.
pub const WEBSOCKET_MANDATORY_MAJOR: u32 = 23;

struct OverrideRule {
    #[allow(dead_code)]
    name: &'static str,
    applies: fn(&VersionId) -> bool,
    apply: fn(&mut Value) -> Result<(), TemplateError>,
}

/// Evaluated in order; the order is part of the contract.
const RULES: [OverrideRule; 2] = [
    OverrideRule {
        name: "exclude-chan-sip",
        applies: chan_sip_removed,
        apply: exclude_chan_sip,
    },
    OverrideRule {
        name: "include-chan-websocket",
        applies: websocket_mandatory,
        apply: include_chan_websocket,
    },
];

/// Apply every matching override rule to the merged document, in order.
///
/// Re-applying a rule that already holds produces no further change.
///
/// # Errors
///
/// `StructuralAssumption` when the document lacks the structure a matching
/// rule relies on. Fatal for the request; never retried.
pub fn apply_overrides(config: &mut Value, version: &VersionId) -> Result<(), TemplateError> {
    for rule in &RULES {
        if (rule.applies)(version) {
            (rule.apply)(config)?;
        }
    }
    Ok(())
}

fn chan_sip_removed(version: &VersionId) -> bool {
    version.effective_major() >= CHAN_SIP_REMOVED_MAJOR
}

fn websocket_mandatory(version: &VersionId) -> bool {
    // Git builds carry effective major 99 and always qualify.
    version.effective_major() >= WEBSOCKET_MANDATORY_MAJOR
}

fn exclude_chan_sip(config: &mut Value) -> Result<(), TemplateError> {
    let menuselect = menuselect_mut(config)?;
    let exclude = list_mut(menuselect, "exclude", "asterisk.menuselect.exclude")?;
    set_add(exclude, CHAN_SIP);
    Ok(())
}

fn include_chan_websocket(config: &mut Value) -> Result<(), TemplateError> {
    {
        let menuselect = menuselect_mut(config)?;
        let channels = list_mut(menuselect, "channels", "asterisk.menuselect.channels")?;
        set_add(channels, CHAN_WEBSOCKET);
    }
    let root = root_mapping_mut(config)?;
    set_feature_flag(root, FEATURE_WEBSOCKETS, true)
}

/// Append a module identifier unless it is already present.
fn set_add(list: &mut Sequence, module: &str) {
    if !list.iter().any(|entry| entry.as_str() == Some(module)) {
        list.push(Value::from(module));
    }
}

fn structural(path: &str, detail: &str) -> TemplateError {
    TemplateError::StructuralAssumption {
        path: path.to_string(),
        detail: detail.to_string(),
    }
}

fn root_mapping_mut(config: &mut Value) -> Result<&mut Mapping, TemplateError> {
    config
        .as_mapping_mut()
        .ok_or_else(|| structural("(root)", "document is not a mapping"))
}

/// Navigate to a child that the templates are required to provide.
fn required_child_mut<'a>(
    parent: &'a mut Mapping,
    key: &str,
    path: &str,
) -> Result<&'a mut Mapping, TemplateError> {
    let key = Value::from(key);
    match parent.get_mut(&key) {
        Some(Value::Mapping(child)) => Ok(child),
        Some(_) => Err(structural(path, "expected a mapping")),
        None => Err(structural(path, "missing from merged document")),
    }
}

fn menuselect_mut(config: &mut Value) -> Result<&mut Mapping, TemplateError> {
    let root = root_mapping_mut(config)?;
    let asterisk = required_child_mut(root, "asterisk", "asterisk")?;
    required_child_mut(asterisk, "menuselect", "asterisk.menuselect")
}

/// Fetch a module list, creating an empty one when absent.
fn list_mut<'a>(
    parent: &'a mut Mapping,
    key: &str,
    path: &str,
) -> Result<&'a mut Sequence, TemplateError> {
    let key = Value::from(key);
    if !parent.contains_key(&key) {
        parent.insert(key.clone(), Value::Sequence(Vec::new()));
    }
    match parent.get_mut(&key) {
        Some(Value::Sequence(list)) => Ok(list),
        _ => Err(structural(path, "expected a sequence")),
    }
}

fn set_feature_flag(root: &mut Mapping, flag: &str, enabled: bool) -> Result<(), TemplateError> {
    let key = Value::from("features");
    if !root.contains_key(&key) {
        root.insert(key.clone(), Value::Mapping(Mapping::new()));
    }
    match root.get_mut(&key) {
        Some(Value::Mapping(features)) => {
            features.insert(Value::from(flag), Value::from(enabled));
            Ok(())
        }
        _ => Err(structural("features", "expected a mapping")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(yaml: &str) -> Value {
        serde_yaml::from_str(yaml).unwrap()
    }

    fn version(v: &str) -> VersionId {
        VersionId::parse(v).unwrap()
    }

    fn exclude_list(config: &Value) -> Vec<String> {
        config["asterisk"]["menuselect"]["exclude"]
            .as_sequence()
            .map(|seq| {
                seq.iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn channel_list(config: &Value) -> Vec<String> {
        config["asterisk"]["menuselect"]["channels"]
            .as_sequence()
            .map(|seq| {
                seq.iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }

    #[test]
    fn chan_sip_excluded_from_21() {
        let mut config = doc("asterisk:\n  menuselect:\n    exclude: []");
        apply_overrides(&mut config, &version("21.0.0")).unwrap();
        assert_eq!(exclude_list(&config), vec![CHAN_SIP]);
    }

    #[test]
    fn chan_sip_not_excluded_at_20() {
        let mut config = doc("asterisk:\n  menuselect:\n    exclude: []");
        apply_overrides(&mut config, &version("20.7.0")).unwrap();
        assert!(exclude_list(&config).is_empty());
    }

    #[test]
    fn websocket_boundary_at_23() {
        let mut at_22 = doc("asterisk:\n  menuselect: {}");
        apply_overrides(&mut at_22, &version("22.5.2")).unwrap();
        assert!(!channel_list(&at_22).contains(&CHAN_WEBSOCKET.to_string()));
        assert!(at_22.get("features").is_none());

        let mut at_23 = doc("asterisk:\n  menuselect: {}");
        apply_overrides(&mut at_23, &version("23.0.0-rc2")).unwrap();
        assert!(channel_list(&at_23).contains(&CHAN_WEBSOCKET.to_string()));
        assert_eq!(at_23["features"][FEATURE_WEBSOCKETS], Value::from(true));
    }

    #[test]
    fn git_build_gets_newest_overrides() {
        let mut config = doc("asterisk:\n  menuselect: {}");
        apply_overrides(&mut config, &version("git")).unwrap();
        assert_eq!(exclude_list(&config), vec![CHAN_SIP]);
        assert!(channel_list(&config).contains(&CHAN_WEBSOCKET.to_string()));
    }

    #[test]
    fn overrides_are_idempotent() {
        let mut config = doc("asterisk:\n  menuselect:\n    exclude: [chan_dahdi]");
        let v = version("23.1.0");
        apply_overrides(&mut config, &v).unwrap();
        apply_overrides(&mut config, &v).unwrap();

        assert_eq!(exclude_list(&config), vec!["chan_dahdi", CHAN_SIP]);
        assert_eq!(channel_list(&config), vec![CHAN_WEBSOCKET]);
    }

    #[test]
    fn existing_feature_flags_are_preserved() {
        let mut config = doc("asterisk:\n  menuselect: {}\nfeatures:\n  ari: true");
        apply_overrides(&mut config, &version("23.0.0")).unwrap();
        assert_eq!(config["features"]["ari"], Value::from(true));
        assert_eq!(config["features"][FEATURE_WEBSOCKETS], Value::from(true));
    }

    #[test]
    fn missing_menuselect_is_a_structural_error() {
        let mut config = doc("asterisk:\n  source:\n    url_template: x");
        let err = apply_overrides(&mut config, &version("21.0.0")).unwrap_err();
        match err {
            TemplateError::StructuralAssumption { path, .. } => {
                assert_eq!(path, "asterisk.menuselect");
            }
            other => panic!("expected StructuralAssumption, got {other:?}"),
        }
    }

    #[test]
    fn wrongly_typed_exclude_list_is_a_structural_error() {
        let mut config = doc("asterisk:\n  menuselect:\n    exclude: not-a-list");
        let err = apply_overrides(&mut config, &version("21.0.0")).unwrap_err();
        assert!(matches!(err, TemplateError::StructuralAssumption { .. }));
    }

    #[test]
    fn no_rules_fire_below_thresholds() {
        // A document without menuselect is fine when no rule applies.
        let mut config = doc("asterisk:\n  source:\n    url_template: x");
        apply_overrides(&mut config, &version("18.26.4")).unwrap();
        assert_eq!(config, doc("asterisk:\n  source:\n    url_template: x"));
    }
}
