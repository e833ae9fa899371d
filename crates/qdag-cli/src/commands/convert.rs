//! Convert command implementation.

use anyhow::Result;
use console::style;

use super::common::{load_circuit, save_circuit};

/// Execute the convert command.
///
/// Operations are rewritten in topological order.
pub fn execute(input: &str, output: &str) -> Result<()> {
    let circuit = load_circuit(input)?;
    save_circuit(&circuit, output)?;
    println!(
        "{} {} -> {}",
        style("✓").green().bold(),
        style(input).green(),
        style(output).green()
    );
    Ok(())
}
