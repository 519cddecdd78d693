//! Configuration generation pipeline.
//!
//! Orchestrates the template engine for one (version, distribution) request:
//! resolve variant and distribution, load the layers, merge, fill in the
//! source URL, substitute placeholders, and apply the version-triggered
//! overrides. The result is handed back as an in-memory document; writing it
//! out is a separate concern so batch callers can decide placement.

use anyhow::{Context, Result};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;

use super::constants::{naming, placeholders, urls};
use crate::template::{
    apply_overrides, merge_layers, resolve_distribution, variant_for, LayerKind, ReleaseKind,
    TemplateError, TemplateStore, Variant, VersionId,
};

/// Addons tarball versions paired with the legacy 1.x series.
const ADDONS_VERSIONS: [(&str, &str); 3] =
    [("1.2", "1.2.9"), ("1.4", "1.4.9"), ("1.6", "1.6.2.4")];

/// Generates merged configuration documents from a template store.
///
/// The store is injected rather than closed over as a directory path, so
/// tests can hand in a fake key-to-document map.
pub struct ConfigGenerator<'a> {
    store: &'a dyn TemplateStore,
}

impl<'a> ConfigGenerator<'a> {
    pub fn new(store: &'a dyn TemplateStore) -> Self {
        Self { store }
    }

    /// Generate the merged configuration document for one request.
    ///
    /// # Errors
    ///
    /// Any of the template error taxonomy: bad version string, unsupported
    /// version, missing or unparseable layer, unknown distribution, or a
    /// structural authoring bug surfaced by the override step.
    pub fn generate(&self, version: &str, distribution: &str) -> Result<Value, TemplateError> {
        let version = VersionId::parse(version)?;
        let variant = variant_for(&version);
        let dist_key = resolve_distribution(self.store, naming::DEFAULT_OS_NAME, distribution)?;

        let base = self.store.load(LayerKind::Base, naming::BASE_LAYER_KEY)?;
        let dist_layer = self.store.load(LayerKind::Distribution, &dist_key)?;
        let variant_layer = self.store.load(LayerKind::Variant, variant.as_str())?;
        let version_layer = if self.store.contains(LayerKind::Version, version.as_str()) {
            Some(self.store.load(LayerKind::Version, version.as_str())?)
        } else {
            None
        };

        let mut config = merge_layers(&base, &dist_layer, &variant_layer, version_layer.as_ref());

        resolve_source(&mut config, &version)?;

        let mut replacements = vec![
            (placeholders::VERSION, version.as_str().to_string()),
            (placeholders::DISTRIBUTION, bare_distribution(&dist_key)),
            (placeholders::VARIANT, variant.as_str().to_string()),
        ];
        if variant == Variant::LegacyAddons {
            replacements.push((placeholders::ADDONS_VERSION, addons_version(&version)));
        }
        substitute(&mut config, &replacements);

        apply_overrides(&mut config, &version)?;

        Ok(config)
    }
}

/// Distribution name without the OS prefix ("debian-trixie" -> "trixie").
pub fn bare_distribution(dist_key: &str) -> String {
    let prefix = format!("{}-", naming::DEFAULT_OS_NAME);
    dist_key
        .strip_prefix(&prefix)
        .unwrap_or(dist_key)
        .to_string()
}

/// Conventional file name for a generated configuration document.
pub fn config_file_name(version: &str, distribution: &str) -> String {
    format!("asterisk-{version}-{}.yml", bare_distribution(&distribution.to_lowercase()))
}

/// Companion addons tarball version for a legacy-addons build.
pub fn addons_version(version: &VersionId) -> String {
    ADDONS_VERSIONS
        .iter()
        .find(|(series, _)| *series == version.series())
        .map(|(_, addons)| (*addons).to_string())
        .unwrap_or_else(|| version.as_str().to_string())
}

/// Write a document to disk as YAML.
///
/// Returns `Ok(false)` without touching the file when it already exists and
/// `force` is not set.
pub fn write_config(config: &Value, path: &Path, force: bool) -> Result<bool> {
    if path.exists() && !force {
        return Ok(false);
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
    }

    let rendered = serde_yaml::to_string(config).context("Failed to serialize configuration")?;
    fs::write(path, rendered)
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;
    Ok(true)
}

/// Fill in the source tarball URL.
///
/// Certified releases always download from the certified-asterisk tree, so
/// their URL template replaces whatever the layers provided. For everything
/// else the default URL is only a fallback for layers that left `source`
/// undefined.
fn resolve_source(config: &mut Value, version: &VersionId) -> Result<(), TemplateError> {
    let root = config
        .as_mapping_mut()
        .ok_or_else(|| structural("(root)", "document is not a mapping"))?;

    let asterisk_key = Value::from("asterisk");
    if !root.contains_key(&asterisk_key) {
        root.insert(asterisk_key.clone(), Value::Mapping(Mapping::new()));
    }
    let asterisk = match root.get_mut(&asterisk_key) {
        Some(Value::Mapping(asterisk)) => asterisk,
        _ => return Err(structural("asterisk", "expected a mapping")),
    };

    let source_key = Value::from("source");
    match version.release() {
        ReleaseKind::Certified => {
            asterisk.insert(source_key, source_mapping(urls::CERTIFIED_URL_TEMPLATE));
        }
        _ => {
            if !asterisk.contains_key(&source_key) {
                asterisk.insert(source_key, source_mapping(urls::ASTERISK_URL_TEMPLATE));
            }
        }
    }
    Ok(())
}

fn source_mapping(url_template: &str) -> Value {
    let mut source = Mapping::new();
    source.insert(Value::from("url_template"), Value::from(url_template));
    Value::Mapping(source)
}

fn structural(path: &str, detail: &str) -> TemplateError {
    TemplateError::StructuralAssumption {
        path: path.to_string(),
        detail: detail.to_string(),
    }
}

/// Replace template placeholders in every string scalar of the document.
fn substitute(value: &mut Value, replacements: &[(&str, String)]) {
    match value {
        Value::String(s) => {
            for (from, to) in replacements {
                if s.contains(from) {
                    *s = s.replace(from, to);
                }
            }
        }
        Value::Sequence(seq) => {
            for item in seq.iter_mut() {
                substitute(item, replacements);
            }
        }
        Value::Mapping(map) => {
            for (_, item) in map.iter_mut() {
                substitute(item, replacements);
            }
        }
        _ => {}
    }
}
