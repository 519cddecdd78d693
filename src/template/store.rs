//! Template store abstraction and implementations.
//!
//! A store is a read-only key-value lookup from (layer kind, layer key) to
//! raw YAML text. The filesystem implementation backs production use; the
//! in-memory implementation lets tests inject a fake key-to-document map
//! without touching the filesystem.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde_yaml::Value;
use walkdir::WalkDir;

use super::error::TemplateError;

/// Role a template layer plays in the merge order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerKind {
    /// The single always-applied base layer.
    Base,
    /// Keyed by OS and release name, e.g. "debian-trixie".
    Distribution,
    /// Keyed by variant tag, e.g. "modern".
    Variant,
    /// Optional one-off fragment keyed by the full version string.
    Version,
}

impl LayerKind {
    /// Subdirectory holding layers of this kind in a filesystem store.
    fn subdir(self) -> &'static str {
        match self {
            LayerKind::Base => "base",
            LayerKind::Distribution => "distributions",
            LayerKind::Variant => "variants",
            LayerKind::Version => "versions",
        }
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LayerKind::Base => "base",
            LayerKind::Distribution => "distribution",
            LayerKind::Variant => "variant",
            LayerKind::Version => "version",
        };
        f.write_str(name)
    }
}

/// Read-only lookup of template layers.
///
/// The store is assumed fully populated at call time; it never creates or
/// repairs entries, and absence of a requested layer is always an error the
/// caller must handle. Silently substituting a default layer is forbidden
/// because a missing layer is a configuration bug, not a fallback case.
pub trait TemplateStore {
    /// Fetch the raw text for a layer.
    fn load_raw(&self, kind: LayerKind, key: &str) -> Result<String, TemplateError>;

    /// Whether a layer exists for the given kind/key pair.
    fn contains(&self, kind: LayerKind, key: &str) -> bool;

    /// All known keys for a layer kind, sorted. Used for error reporting.
    fn keys(&self, kind: LayerKind) -> Vec<String>;

    /// Fetch and parse a layer into a configuration document.
    fn load(&self, kind: LayerKind, key: &str) -> Result<Value, TemplateError> {
        let raw = self.load_raw(kind, key)?;
        serde_yaml::from_str(&raw).map_err(|source| TemplateError::LayerParse {
            kind,
            key: key.to_string(),
            source,
        })
    }
}

/// Filesystem-backed template store.
///
/// Layout under the root directory:
/// `base/<key>.yml`, `distributions/<key>.yml`, `variants/<key>.yml`,
/// `versions/<version>.yml`.
pub struct FsTemplateStore {
    root: PathBuf,
}

impl FsTemplateStore {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, kind: LayerKind, key: &str) -> PathBuf {
        self.root.join(kind.subdir()).join(format!("{key}.yml"))
    }
}

impl TemplateStore for FsTemplateStore {
    fn load_raw(&self, kind: LayerKind, key: &str) -> Result<String, TemplateError> {
        let path = self.path_for(kind, key);
        std::fs::read_to_string(&path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                TemplateError::LayerNotFound {
                    kind,
                    key: key.to_string(),
                }
            } else {
                TemplateError::LayerRead {
                    kind,
                    key: key.to_string(),
                    source,
                }
            }
        })
    }

    fn contains(&self, kind: LayerKind, key: &str) -> bool {
        self.path_for(kind, key).is_file()
    }

    fn keys(&self, kind: LayerKind) -> Vec<String> {
        let dir = self.root.join(kind.subdir());
        let mut keys: Vec<String> = WalkDir::new(&dir)
            .max_depth(1)
            .follow_links(false)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                let path = entry.path();
                if path.extension().and_then(|ext| ext.to_str()) == Some("yml") {
                    path.file_stem()
                        .and_then(|stem| stem.to_str())
                        .map(str::to_string)
                } else {
                    None
                }
            })
            .collect();
        keys.sort();
        keys
    }
}

/// In-memory template store for tests and embedding.
#[derive(Default)]
pub struct MemoryTemplateStore {
    entries: HashMap<(LayerKind, String), String>,
}

impl MemoryTemplateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a layer, replacing any existing entry for the same kind/key.
    pub fn insert(&mut self, kind: LayerKind, key: &str, raw: &str) {
        self.entries.insert((kind, key.to_string()), raw.to_string());
    }

    /// Builder-style insert for test fixture setup.
    pub fn with(mut self, kind: LayerKind, key: &str, raw: &str) -> Self {
        self.insert(kind, key, raw);
        self
    }
}

impl TemplateStore for MemoryTemplateStore {
    fn load_raw(&self, kind: LayerKind, key: &str) -> Result<String, TemplateError> {
        self.entries
            .get(&(kind, key.to_string()))
            .cloned()
            .ok_or_else(|| TemplateError::LayerNotFound {
                kind,
                key: key.to_string(),
            })
    }

    fn contains(&self, kind: LayerKind, key: &str) -> bool {
        self.entries.contains_key(&(kind, key.to_string()))
    }

    fn keys(&self, kind: LayerKind) -> Vec<String> {
        let mut keys: Vec<String> = self
            .entries
            .keys()
            .filter(|(k, _)| *k == kind)
            .map(|(_, key)| key.clone())
            .collect();
        keys.sort();
        keys
    }
}
