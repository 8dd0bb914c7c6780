//! Validate command implementation
//!
//! Runs every check `install` performs before writing, and nothing else.

use local_store::error::Result;
use local_store::graph::{load_graph, validate_bins, validate_graph, validate_location};

use crate::cli::ValidateArgs;

/// Run validate command
pub fn run(args: ValidateArgs) -> Result<()> {
    let graph = load_graph(&args.graph)?;

    if let Some(location) = &args.location {
        validate_location(location)?;
    }
    let validated = validate_graph(&graph)?;
    validate_bins(&validated)?;

    println!(
        "Graph is valid: {} node(s), {} link(s)",
        validated.nodes().len(),
        validated.links().len()
    );
    Ok(())
}
