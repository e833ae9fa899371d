//! Demo command implementation.

use anyhow::{Context, Result};
use clap::ValueEnum;
use console::style;

use qdag_ir::{Circuit, CircuitBuilder, CircuitDescription, Format};

use super::common::save_circuit;

/// Built-in circuits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DemoCircuit {
    /// Bell pair with measurements
    Bell,
    /// GHZ state on n qubits
    Ghz,
    /// Quantum Fourier transform on n qubits
    Qft,
    /// Runs of CX(0,1) x4, CX(1,0) x5, CX(0,1) x3
    CancelCnots,
}

fn cancel_cnots() -> Result<Circuit> {
    let mut b = CircuitBuilder::new(2, 0);
    for (control, target, count) in [(0, 1, 4), (1, 0, 5), (0, 1, 3)] {
        for _ in 0..count {
            b.cx(control, target)?;
        }
    }
    Ok(b.build())
}

/// Build a demo circuit.
pub fn build(kind: DemoCircuit, num_qubits: usize) -> Result<Circuit> {
    Ok(match kind {
        DemoCircuit::Bell => CircuitBuilder::bell()?,
        DemoCircuit::Ghz => CircuitBuilder::ghz(num_qubits)?,
        DemoCircuit::Qft => CircuitBuilder::qft(num_qubits)?,
        DemoCircuit::CancelCnots => cancel_cnots()?,
    })
}

/// Execute the demo command.
pub fn execute(kind: DemoCircuit, num_qubits: usize, output: Option<&str>) -> Result<()> {
    let circuit = build(kind, num_qubits)?;
    match output {
        Some(path) => {
            save_circuit(&circuit, path)?;
            println!(
                "{} Wrote {} to {}",
                style("✓").green().bold(),
                circuit,
                style(path).green()
            );
        }
        None => {
            let rendered = CircuitDescription::from_circuit(&circuit)
                .render(Format::Yaml)
                .context("Failed to render circuit")?;
            print!("{rendered}");
        }
    }
    Ok(())
}
