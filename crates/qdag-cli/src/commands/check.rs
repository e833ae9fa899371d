//! Check command implementation.

use anyhow::{Context, Result};
use console::style;

use super::common::load_circuit;

/// Execute the check command.
pub fn execute(input: &str) -> Result<()> {
    let circuit = load_circuit(input)?;
    circuit
        .check()
        .with_context(|| format!("Integrity check failed for {input}"))?;
    println!(
        "{} {} is consistent ({} vertices, {} edges, {} parameters)",
        style("✓").green().bold(),
        style(input).green(),
        circuit.num_vertices(),
        circuit.num_edges(),
        circuit.num_parameters()
    );
    Ok(())
}
