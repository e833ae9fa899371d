//! Optimize command implementation.

use anyhow::Result;
use console::style;

use qdag_compile::passes::CancellationStats;
use qdag_compile::{CircuitMetrics, PassManagerBuilder};

use super::common::{load_circuit, print_metrics, save_circuit, sibling_path};

/// Execute the optimize command.
pub fn execute(input: &str, output: Option<&str>, optimization_level: u8) -> Result<()> {
    println!(
        "{} Optimizing {} (level {})",
        style("→").cyan().bold(),
        style(input).green(),
        optimization_level
    );

    let mut circuit = load_circuit(input)?;
    let before = CircuitMetrics::from_circuit(&circuit);
    println!(
        "  Loaded: {} qubits, {} ops, depth {}",
        before.num_qubits, before.num_ops, before.depth
    );

    let (pm, mut props) = PassManagerBuilder::new()
        .with_optimization_level(optimization_level)
        .build();
    println!("  Running {} passes", pm.len());
    pm.run(&mut circuit, &mut props)?;

    println!("{} Optimization complete", style("✓").green().bold());
    if let Some(stats) = props.get::<CancellationStats>() {
        println!(
            "  Cancelled {} pairs in {} sweeps",
            style(stats.pairs).yellow(),
            stats.sweeps
        );
    }
    let after = props
        .metrics
        .take()
        .unwrap_or_else(|| CircuitMetrics::from_circuit(&circuit));
    print_metrics(&after);

    let output_path = output.map_or_else(|| sibling_path(input, "optimized"), str::to_string);
    save_circuit(&circuit, &output_path)?;
    println!("  Output: {}", style(&output_path).green());

    Ok(())
}
