//! ---
//! lic_section: "05-networking-external-interfaces"
//! lic_subsection: "binary"
//! lic_type: "source"
//! lic_scope: "code"
//! lic_description: "Control CLI for administrators working with license documents."
//! lic_version: "v0.0.0-prealpha"
//! lic_owner: "tbd"
//! ---
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use r_lic_common::{init_tracing, AppConfig};

mod license;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "R-LIC license inspection and editing utility",
    long_about = None
)]
struct Cli {
    /// Configuration file; `R_LIC_CONFIG` and `configs/r-lic.toml` are tried otherwise.
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: license::LicenseCommand,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;
    init_tracing("r-licctl", &config.logging)?;
    license::run(cli.command, &config)
}

fn load_config(explicit: Option<&PathBuf>) -> Result<AppConfig> {
    match explicit {
        Some(path) => AppConfig::load(&[path]),
        None => AppConfig::load_or_default(&[PathBuf::from("configs/r-lic.toml")]),
    }
}
