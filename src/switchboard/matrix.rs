//! Supported-builds matrix handling.
//!
//! The matrix file lists every supported Asterisk version together with the
//! OS distributions it is built for. Batch generation and image naming both
//! read it; nothing here writes it.

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::path::Path;

use super::constants::naming;

/// Top-level shape of `supported-asterisk-builds.yml`.
#[derive(Debug, Deserialize)]
pub struct SupportedBuilds {
    #[serde(default)]
    pub latest_builds: Vec<BuildEntry>,
}

#[derive(Debug, Deserialize)]
pub struct BuildEntry {
    pub version: String,
    #[serde(default)]
    pub os_matrix: Vec<MatrixEntry>,
}

#[derive(Debug, Deserialize)]
pub struct MatrixEntry {
    pub distribution: String,
    /// Optional explicit template name kept for backward compatibility with
    /// older matrix files; variant detection no longer needs it.
    #[serde(default)]
    pub template: Option<String>,
}

impl SupportedBuilds {
    /// Load and parse the matrix file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read builds matrix: {}", path.display()))?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse builds matrix: {}", path.display()))
    }

    /// All (version, distribution) pairs in matrix order.
    pub fn build_pairs(&self) -> Vec<(String, String)> {
        self.latest_builds
            .iter()
            .flat_map(|build| {
                build
                    .os_matrix
                    .iter()
                    .map(move |entry| (build.version.clone(), entry.distribution.clone()))
            })
            .collect()
    }

    /// Expected image name for a version, from its first matrix entry.
    ///
    /// Unknown versions are an error rather than a placeholder name: a
    /// made-up image name would let a build drift past CI checks unnoticed.
    pub fn image_name(&self, version: &str) -> Result<String> {
        let build = self
            .latest_builds
            .iter()
            .find(|build| build.version == version)
            .ok_or_else(|| anyhow!("Version not in the supported builds matrix: {version}"))?;

        let entry = build
            .os_matrix
            .first()
            .ok_or_else(|| anyhow!("Version {version} has an empty os_matrix"))?;

        Ok(format!(
            "{version}_{}-{}",
            naming::DEFAULT_OS_NAME,
            entry.distribution
        ))
    }
}
