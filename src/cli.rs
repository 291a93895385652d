use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for kycdash
#[derive(Parser, Debug)]
#[command(version, about = "kycdash")]
pub struct Args {
    /// Path to the KYC dataset CSV. Falls back to `[data] path` in config.toml.
    pub path: Option<PathBuf>,

    /// Directory to write exported files into (overrides `[export] directory`)
    #[arg(long = "export-dir")]
    pub export_dir: Option<PathBuf>,

    /// Write the default config template and exit
    #[arg(long = "write-config", action)]
    pub write_config: bool,

    /// Overwrite an existing config file when used with --write-config
    #[arg(long = "force", action)]
    pub force: bool,
}
