//! Shared fixtures for integration tests.
#![allow(dead_code)]

use std::fs;
use std::path::Path;

use switchboard::{LayerKind, MemoryTemplateStore};
use tempfile::TempDir;

pub const BASE_LAYER: &str = "\
asterisk:
  version: '{{VERSION}}'
  menuselect:
    channels: []
    exclude: []
build:
  stages:
    builder:
      packages: [build-essential, libssl-dev, libncurses5-dev]
    runtime:
      packages: [libssl3, libncurses6]
docker:
  healthcheck:
    command: asterisk -rx 'core show uptime'
    interval: 30s
  networking:
    ports: [5060, 5038]
";

pub const TRIXIE_LAYER: &str = "\
base:
  image: debian:trixie-slim
  distribution: '{{DISTRIBUTION}}'
build:
  stages:
    builder:
      packages: [gcc-14, make, libssl-dev, libedit-dev]
";

pub const JESSIE_LAYER: &str = "\
base:
  image: debian:jessie
  distribution: '{{DISTRIBUTION}}'
eol: true
";

pub const MODERN_LAYER: &str = "\
variant: modern
features:
  ari: true
  srtp: true
";

pub const ASTERISK10_LAYER: &str = "\
variant: asterisk10
features:
  ari: false
";

pub const LEGACY_ADDONS_LAYER: &str = "\
variant: legacy-addons
asterisk:
  addons:
    version: '{{ADDONS_VERSION}}'
";

pub const BUILDS_MATRIX: &str = "\
latest_builds:
  - version: 22.5.2
    os_matrix:
      - distribution: trixie
  - version: 1.2.40
    os_matrix:
      - distribution: jessie
";

/// In-memory store with the full fixture layer set.
pub fn fixture_store() -> MemoryTemplateStore {
    MemoryTemplateStore::new()
        .with(LayerKind::Base, "asterisk-base", BASE_LAYER)
        .with(LayerKind::Distribution, "debian-trixie", TRIXIE_LAYER)
        .with(LayerKind::Distribution, "debian-jessie", JESSIE_LAYER)
        .with(LayerKind::Variant, "modern", MODERN_LAYER)
        .with(LayerKind::Variant, "asterisk10", ASTERISK10_LAYER)
        .with(LayerKind::Variant, "legacy-addons", LEGACY_ADDONS_LAYER)
}

/// Write the same fixture layers as a template directory tree.
pub fn write_template_tree(root: &Path) {
    let write = |subdir: &str, name: &str, content: &str| {
        let dir = root.join(subdir);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(name), content).unwrap();
    };

    write("base", "asterisk-base.yml", BASE_LAYER);
    write("distributions", "debian-trixie.yml", TRIXIE_LAYER);
    write("distributions", "debian-jessie.yml", JESSIE_LAYER);
    write("variants", "modern.yml", MODERN_LAYER);
    write("variants", "asterisk10.yml", ASTERISK10_LAYER);
    write("variants", "legacy-addons.yml", LEGACY_ADDONS_LAYER);
}

/// A temp directory pre-populated with the fixture template tree.
pub fn template_dir() -> TempDir {
    let temp = TempDir::new().unwrap();
    write_template_tree(temp.path());
    temp
}

pub fn string_list(value: &serde_yaml::Value) -> Vec<String> {
    value
        .as_sequence()
        .map(|seq| {
            seq.iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
