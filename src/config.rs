use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::cli::Cli;
use crate::switchboard::constants::paths;

/// On-disk configuration file shape.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    pub paths: Option<PathsConfig>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct PathsConfig {
    pub templates_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub builds_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            paths: Some(PathsConfig {
                templates_dir: Some(PathBuf::from(paths::DEFAULT_TEMPLATES_DIR)),
                output_dir: Some(PathBuf::from(paths::DEFAULT_OUTPUT_DIR)),
                builds_file: Some(PathBuf::from(paths::DEFAULT_BUILDS_FILE)),
            }),
        }
    }
}

/// Fully resolved tool configuration, merged from CLI flags, the optional
/// config file, and defaults, with CLI values taking highest precedence.
pub struct SwitchboardConfig {
    pub templates_dir: PathBuf,
    pub output_dir: PathBuf,
    pub builds_file: PathBuf,
    pub quiet: bool,
}

impl SwitchboardConfig {
    pub fn new(cli: Cli) -> Result<Self> {
        let config_file = cli
            .config_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(paths::DEFAULT_CONFIG_PATH));

        let file_config = if config_file.exists() {
            let content = fs::read_to_string(&config_file)
                .with_context(|| format!("Failed to read config file: {config_file:?}"))?;
            toml::from_str::<Config>(&content).with_context(|| "Failed to parse config file")?
        } else {
            Config::default()
        };

        let get_templates_dir = || {
            file_config
                .paths
                .as_ref()
                .and_then(|p| p.templates_dir.clone())
        };

        let get_output_dir = || {
            file_config
                .paths
                .as_ref()
                .and_then(|p| p.output_dir.clone())
        };

        let get_builds_file = || {
            file_config
                .paths
                .as_ref()
                .and_then(|p| p.builds_file.clone())
        };

        Ok(SwitchboardConfig {
            templates_dir: cli
                .templates_dir
                .or_else(get_templates_dir)
                .unwrap_or_else(|| PathBuf::from(paths::DEFAULT_TEMPLATES_DIR)),
            output_dir: cli
                .output_dir
                .or_else(get_output_dir)
                .unwrap_or_else(|| PathBuf::from(paths::DEFAULT_OUTPUT_DIR)),
            builds_file: cli
                .builds_file
                .or_else(get_builds_file)
                .unwrap_or_else(|| PathBuf::from(paths::DEFAULT_BUILDS_FILE)),
            quiet: cli.quiet,
        })
    }
}
