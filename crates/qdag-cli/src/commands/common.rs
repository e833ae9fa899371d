//! Shared helpers for CLI commands.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use console::style;
use tracing::debug;

use qdag_compile::CircuitMetrics;
use qdag_ir::{Circuit, CircuitDescription, Format};

/// Description format implied by a path's extension.
pub fn format_for(path: &str) -> Result<Format> {
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("");
    Format::from_extension(ext).ok_or_else(|| {
        anyhow::anyhow!("Unsupported file extension '{ext}' for {path}. Use .json, .yaml or .yml")
    })
}

/// Load a circuit from a JSON or YAML description.
pub fn load_circuit(path: &str) -> Result<Circuit> {
    if !Path::new(path).exists() {
        anyhow::bail!("File not found: {path}");
    }
    let format = format_for(path)?;
    let source =
        fs::read_to_string(path).with_context(|| format!("Failed to read file: {path}"))?;
    let description = CircuitDescription::parse(&source, format)
        .with_context(|| format!("Failed to parse {path}"))?;
    let circuit = description
        .to_circuit()
        .with_context(|| format!("Invalid circuit in {path}"))?;
    debug!("Loaded {circuit} from {path}");
    Ok(circuit)
}

/// Write a circuit description, choosing the format from the extension.
pub fn save_circuit(circuit: &Circuit, path: &str) -> Result<()> {
    let format = format_for(path)?;
    let content = CircuitDescription::from_circuit(circuit)
        .render(format)
        .context("Failed to render circuit")?;
    fs::write(path, content).with_context(|| format!("Failed to write file: {path}"))?;
    Ok(())
}

/// `dir/stem_suffix.ext` next to `input`.
pub fn sibling_path(input: &str, suffix: &str) -> String {
    let p = Path::new(input);
    let stem = p.file_stem().unwrap_or_default().to_string_lossy();
    let ext = p.extension().unwrap_or_default().to_string_lossy();
    let name = if ext.is_empty() {
        format!("{stem}_{suffix}")
    } else {
        format!("{stem}_{suffix}.{ext}")
    };
    p.with_file_name(name).to_string_lossy().into_owned()
}

/// Print a metrics summary.
pub fn print_metrics(metrics: &CircuitMetrics) {
    println!(
        "  Wires:     {} qubits, {} clbits",
        style(metrics.num_qubits).cyan(),
        style(metrics.num_clbits).cyan()
    );
    println!(
        "  Graph:     {} vertices, {} edges",
        metrics.num_vertices, metrics.num_edges
    );
    println!(
        "  Ops:       {}, depth {}",
        style(metrics.num_ops).yellow(),
        style(metrics.depth).yellow()
    );
    println!("  Factors:   {}", metrics.num_tensor_factors);
    println!("  Params:    {}", metrics.num_parameters);

    if !metrics.count_ops.is_empty() {
        let counts: Vec<String> = metrics
            .count_ops
            .iter()
            .map(|(e, n)| format!("{}={n}", e.name()))
            .collect();
        println!("  Counts:    {}", counts.join(", "));
    }
    if !metrics.count_ops_longest_path.is_empty() {
        let counts: Vec<String> = metrics
            .count_ops_longest_path
            .iter()
            .map(|(e, n)| format!("{}={n}", e.name()))
            .collect();
        println!("  Longest:   {}", counts.join(", "));
    }
}
