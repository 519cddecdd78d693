//! Switchboard core functionality modules.
//!
//! This module contains the main application logic split into focused
//! components:
//! - `generator`: configuration generation pipeline
//! - `matrix`: supported-builds matrix and image naming
//! - `menuselect`: module selection planning
//! - `common`: shared messaging utilities

use anyhow::{anyhow, Result};
use std::path::PathBuf;

use crate::{
    cli::{Cli, Commands},
    config::SwitchboardConfig,
    template::{FsTemplateStore, VersionId},
};

use common::SwitchboardMessaging;

pub mod common;
pub mod constants;
pub mod generator;
pub mod matrix;
pub mod menuselect;

pub use generator::ConfigGenerator;
pub use matrix::SupportedBuilds;
pub use menuselect::{Features, MenuselectPlan};

/// Main application struct that coordinates all switchboard operations.
pub struct SwitchboardApp {
    config: SwitchboardConfig,
    command: Commands,
}

impl SwitchboardMessaging for SwitchboardApp {}

impl SwitchboardApp {
    pub fn new(cli: Cli) -> Result<Self> {
        let command = cli.command.clone();
        let config = SwitchboardConfig::new(cli)?;

        Ok(SwitchboardApp { config, command })
    }

    pub fn run(&self) -> Result<()> {
        match &self.command {
            Commands::Generate {
                version,
                distribution,
                output,
                force,
            } => self.generate_one(version, distribution, output.as_deref(), *force),
            Commands::GenerateAll { force } => self.generate_all(*force),
            Commands::ImageName { version } => self.image_name(version),
            Commands::Menuselect { version } => self.menuselect(version),
        }
    }

    fn info(&self, message: &str) {
        if !self.config.quiet {
            self.msg(message);
        }
    }

    fn generate_one(
        &self,
        version: &str,
        distribution: &str,
        output: Option<&std::path::Path>,
        force: bool,
    ) -> Result<()> {
        let store = FsTemplateStore::new(&self.config.templates_dir);
        let generator = ConfigGenerator::new(&store);

        let config = generator.generate(version, distribution)?;

        let path: PathBuf = match output {
            Some(path) => path.to_path_buf(),
            None => self
                .config
                .output_dir
                .join(generator::config_file_name(version, distribution)),
        };

        if generator::write_config(&config, &path, force)? {
            self.info(&format!("Generated config: {}", path.display()));
        } else {
            self.info(&format!(
                "Config already exists, skipping: {} (use --force to regenerate)",
                path.display()
            ));
        }
        Ok(())
    }

    /// Generate configs for every entry in the supported-builds matrix.
    ///
    /// Failing entries are reported and skipped so one bad version cannot
    /// block the rest of the batch; the run as a whole fails afterwards if
    /// anything failed.
    fn generate_all(&self, force: bool) -> Result<()> {
        let builds = SupportedBuilds::load(&self.config.builds_file)?;
        let store = FsTemplateStore::new(&self.config.templates_dir);
        let generator = ConfigGenerator::new(&store);

        let mut generated = 0usize;
        let mut failed = 0usize;

        for (version, distribution) in builds.build_pairs() {
            match generator.generate(&version, &distribution) {
                Ok(config) => {
                    let path = self
                        .config
                        .output_dir
                        .join(generator::config_file_name(&version, &distribution));
                    match generator::write_config(&config, &path, force) {
                        Ok(true) => {
                            generated += 1;
                            self.info(&format!("Generated: {}", path.display()));
                        }
                        Ok(false) => {
                            self.info(&format!("Skipped existing: {}", path.display()));
                        }
                        Err(e) => {
                            failed += 1;
                            self.error(&format!("Failed to write {version}-{distribution}: {e}"));
                        }
                    }
                }
                Err(e) => {
                    failed += 1;
                    self.error(&format!(
                        "Failed to generate config for {version}-{distribution}: {e}"
                    ));
                }
            }
        }

        self.info(&format!(
            "Generated {generated} configuration(s), {failed} failure(s)"
        ));

        if failed > 0 {
            return Err(anyhow!("{failed} matrix entries failed to generate"));
        }
        Ok(())
    }

    fn image_name(&self, version: &str) -> Result<()> {
        let builds = SupportedBuilds::load(&self.config.builds_file)?;
        let name = builds.image_name(version)?;
        // Plain output so shell callers can capture it.
        println!("{name}");
        Ok(())
    }

    fn menuselect(&self, version: &str) -> Result<()> {
        let version = VersionId::parse(version)?;
        let plan = MenuselectPlan::for_version(&version, Features::default());
        for command in plan.commands() {
            println!("{command}");
        }
        Ok(())
    }
}
