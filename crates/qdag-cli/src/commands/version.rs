//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - columnar DAG engine for quantum circuits",
        style("qdag").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  qdag-ir       Circuit graph engine");
    println!("  qdag-compile  Pass framework and structural optimizations");
    println!("  qdag-cli      Command-line interface");
}
