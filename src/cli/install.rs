use std::path::PathBuf;

use clap::Parser;

/// Arguments for the install command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                   Install a JSON graph:\n    local-store install graph.json /tmp/store\n\n\
                   Install a YAML graph with two copy workers:\n    local-store install graph.yaml /tmp/store --workers 2")]
pub struct InstallArgs {
    /// Graph document (.json, .yaml or .yml)
    pub graph: PathBuf,

    /// Absolute path of an empty directory to install into
    pub location: PathBuf,

    /// Maximum number of copy workers
    #[arg(long, short = 'j', env = "WORKERS_LIMIT", value_parser = parse_workers)]
    pub workers: Option<usize>,

    /// Do not show a progress bar
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

fn parse_workers(value: &str) -> Result<usize, String> {
    local_store::config::parse_workers_limit(value).map_err(|e| e.to_string())
}
