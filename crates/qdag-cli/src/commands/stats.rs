//! Stats command implementation.

use anyhow::{Context, Result};
use console::style;

use qdag_compile::CircuitMetrics;

use super::common::{load_circuit, print_metrics};

/// Execute the stats command.
pub fn execute(input: &str, json: bool) -> Result<()> {
    let circuit = load_circuit(input)?;
    let metrics = CircuitMetrics::from_circuit(&circuit);

    if json {
        let rendered =
            serde_json::to_string_pretty(&metrics).context("Failed to serialize metrics")?;
        println!("{rendered}");
        return Ok(());
    }

    println!("{} {}", style("Circuit").cyan().bold(), style(input).green());
    print_metrics(&metrics);
    Ok(())
}
