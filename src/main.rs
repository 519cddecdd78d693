use anyhow::Result;
use clap::Parser;
use std::process;

use switchboard::cli::Cli;
use switchboard::{SwitchboardApp, SwitchboardMessager, SwitchboardMessaging};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let messager = SwitchboardMessager::new();

    let app = SwitchboardApp::new(cli)?;

    match app.run() {
        Ok(_) => Ok(()),
        Err(e) => {
            messager.error(&format!("{e}"));
            process::exit(1);
        }
    }
}
