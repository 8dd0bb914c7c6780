use std::path::PathBuf;

use clap::Parser;

/// Arguments for the validate command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Graph document (.json, .yaml or .yml)
    pub graph: PathBuf,

    /// Also check that this directory is a valid store location
    #[arg(long, short = 'l')]
    pub location: Option<PathBuf>,
}
