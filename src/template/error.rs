//! Error taxonomy for template resolution.
//!
//! Every variant carries the offending version/distribution/layer identifier
//! so the orchestration layer can report exactly which input or template
//! triggered the failure. None of these are transient: they are caller input
//! errors or template authoring errors, and are never retried internally.

use thiserror::Error;

use super::store::LayerKind;

#[derive(Debug, Error)]
pub enum TemplateError {
    /// The version string does not follow Asterisk's numbering scheme.
    #[error("invalid version format: '{version}'")]
    VersionFormat { version: String },

    /// The version parses but falls below the oldest supported series.
    #[error(
        "unsupported version: '{version}' (effective major {effective_major} predates the 1.2 series)"
    )]
    UnsupportedVersion {
        version: String,
        effective_major: u32,
    },

    /// No template exists in the store for the requested kind/key pair.
    #[error("{kind} layer not found: '{key}'")]
    LayerNotFound { kind: LayerKind, key: String },

    /// The store returned content for the layer, but reading it failed.
    #[error("failed to read {kind} layer '{key}': {source}")]
    LayerRead {
        kind: LayerKind,
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// The layer exists but is not a well-formed YAML document.
    #[error("{kind} layer '{key}' is not valid YAML: {source}")]
    LayerParse {
        kind: LayerKind,
        key: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// No distribution layer matches the requested name.
    #[error(
        "distribution not found: '{distribution}' (available: {})",
        .available.join(", ")
    )]
    DistributionNotFound {
        distribution: String,
        available: Vec<String>,
    },

    /// The merged document lacks the structure an override rule relies on.
    /// This signals a template authoring bug and is fatal for the request.
    #[error("merged configuration has unexpected structure at '{path}': {detail}")]
    StructuralAssumption { path: String, detail: String },
}
