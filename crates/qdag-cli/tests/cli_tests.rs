//! CLI command parsing and utility tests.
//!
//! Tests cover argument parsing (via clap `try_parse_from`), loading and
//! saving circuit descriptions, and the optimize pipeline the CLI drives.

// The CLI is a binary crate, so these tests mirror its clap structs and
// exercise the same library calls its commands make.

// ============================================================================
// Circuit description files
// ============================================================================

mod circuit_loading {
    use std::fs;

    use qdag_ir::{CircuitBuilder, CircuitDescription, Element, Format};

    const GHZ_YAML: &str = "
num_qubits: 3
num_clbits: 3
ops:
  - { gate: h, wires: [0] }
  - { gate: cx, wires: [0, 1] }
  - { gate: cx, wires: [1, 2] }
  - { gate: measure, wires: [0], clbits: [0] }
  - { gate: measure, wires: [1], clbits: [1] }
  - { gate: measure, wires: [2], clbits: [2] }
";

    #[test]
    fn test_load_yaml_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ghz.yaml");
        fs::write(&path, GHZ_YAML).unwrap();

        let source = fs::read_to_string(&path).unwrap();
        let circuit = CircuitDescription::parse(&source, Format::Yaml)
            .unwrap()
            .to_circuit()
            .unwrap();
        assert_eq!(circuit.num_qubits(), 3);
        assert_eq!(circuit.depth(), 4);
        assert_eq!(circuit.count_ops()[&Element::Measure], 3);
        circuit.check().unwrap();
    }

    #[test]
    fn test_yaml_matches_builder() {
        let from_yaml = CircuitDescription::parse(GHZ_YAML, Format::Yaml)
            .unwrap()
            .to_circuit()
            .unwrap();
        let built = CircuitBuilder::ghz(3).unwrap();
        for w in 0..built.num_wires() {
            assert_eq!(
                from_yaml.wire_elements(w).collect::<Vec<_>>(),
                built.wire_elements(w).collect::<Vec<_>>()
            );
        }
    }

    #[test]
    fn test_json_yaml_conversion() {
        let dir = tempfile::tempdir().unwrap();
        let circuit = CircuitBuilder::qft(3).unwrap();

        let json_path = dir.path().join("qft.json");
        let json = CircuitDescription::from_circuit(&circuit)
            .render(Format::Json)
            .unwrap();
        fs::write(&json_path, json).unwrap();

        let loaded = CircuitDescription::parse(&fs::read_to_string(&json_path).unwrap(), Format::Json)
            .unwrap();
        let yaml = loaded.render(Format::Yaml).unwrap();
        let back = CircuitDescription::parse(&yaml, Format::Yaml)
            .unwrap()
            .to_circuit()
            .unwrap();
        assert_eq!(back.count_ops(), circuit.count_ops());
        assert_eq!(back.depth(), circuit.depth());
    }

    #[test]
    fn test_unknown_gate_rejected() {
        let yaml = "num_qubits: 1\nops:\n  - { gate: frobnicate, wires: [0] }\n";
        let desc = CircuitDescription::parse(yaml, Format::Yaml).unwrap();
        assert!(desc.to_circuit().is_err());
    }

    #[test]
    fn test_malformed_file_rejected() {
        assert!(CircuitDescription::parse("{ not json", Format::Json).is_err());
        assert!(CircuitDescription::parse("num_qubits: [", Format::Yaml).is_err());
    }

    #[test]
    fn test_extension_detection() {
        assert_eq!(Format::from_extension("json"), Some(Format::Json));
        assert_eq!(Format::from_extension("yml"), Some(Format::Yaml));
        assert_eq!(Format::from_extension("qasm"), None);
    }
}

// ============================================================================
// Optimize pipeline
// ============================================================================

mod optimize_pipeline {
    use qdag_compile::passes::CancellationStats;
    use qdag_compile::{CircuitMetrics, PassManagerBuilder};
    use qdag_ir::{CircuitBuilder, CircuitDescription, Format};

    #[test]
    fn test_cancel_cnots_demo() {
        let mut b = CircuitBuilder::new(2, 0);
        for (control, target, count) in [(0, 1, 4), (1, 0, 5), (0, 1, 3)] {
            for _ in 0..count {
                b.cx(control, target).unwrap();
            }
        }
        let mut circuit = b.build();

        let (pm, mut props) = PassManagerBuilder::new().with_optimization_level(1).build();
        pm.run(&mut circuit, &mut props).unwrap();

        assert_eq!(props.get::<CancellationStats>().unwrap().pairs, 5);
        let metrics = props.metrics.unwrap();
        assert_eq!(metrics.num_ops, 2);
        assert_eq!(metrics.depth, 2);

        let desc = CircuitDescription::from_circuit(&circuit);
        assert_eq!(desc.ops.len(), 2);
        assert_eq!(desc.ops[0].wires, [1, 0]);
        assert_eq!(desc.ops[1].wires, [0, 1]);
        assert!(desc.render(Format::Yaml).unwrap().contains("cx"));
    }

    #[test]
    fn test_level_zero_keeps_circuit() {
        let mut b = CircuitBuilder::new(2, 0);
        b.cx(0, 1).unwrap().cx(0, 1).unwrap();
        let mut circuit = b.build();

        let (pm, mut props) = PassManagerBuilder::new().with_optimization_level(0).build();
        pm.run(&mut circuit, &mut props).unwrap();

        assert_eq!(circuit.count_op_elements(), 2);
        assert!(props.get::<CancellationStats>().is_none());
    }

    #[test]
    fn test_metrics_serialize_to_json() {
        let circuit = CircuitBuilder::bell().unwrap();
        let metrics = CircuitMetrics::from_circuit(&circuit);
        let json = serde_json::to_string_pretty(&metrics).unwrap();
        assert!(json.contains("\"depth\": 3"));

        let back: CircuitMetrics = serde_json::from_str(&json).unwrap();
        assert_eq!(back, metrics);
    }
}

// ============================================================================
// Clap argument parsing (test via try_parse_from on equivalent structs)
// ============================================================================

mod clap_parsing {
    use clap::{Parser, Subcommand, ValueEnum};

    // Mirror the CLI struct for testing (since main.rs is a binary)
    #[derive(Parser)]
    #[command(name = "qdag")]
    struct TestCli {
        #[arg(short, long, action = clap::ArgAction::Count, global = true)]
        verbose: u8,

        #[command(subcommand)]
        command: TestCommands,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
    enum TestDemoCircuit {
        Bell,
        Ghz,
        Qft,
        CancelCnots,
    }

    #[derive(Subcommand)]
    enum TestCommands {
        Stats {
            #[arg(short, long)]
            input: String,
            #[arg(long)]
            json: bool,
        },
        Optimize {
            #[arg(short, long)]
            input: String,
            #[arg(short, long)]
            output: Option<String>,
            #[arg(long, default_value = "1")]
            optimization_level: u8,
        },
        Check {
            #[arg(short, long)]
            input: String,
        },
        Convert {
            #[arg(short, long)]
            input: String,
            #[arg(short, long)]
            output: String,
        },
        Demo {
            #[arg(value_enum)]
            circuit: TestDemoCircuit,
            #[arg(short, long, default_value = "3")]
            num_qubits: usize,
            #[arg(short, long)]
            output: Option<String>,
        },
        Version,
    }

    // --- Stats command ---

    #[test]
    fn test_parse_stats() {
        let cli = TestCli::try_parse_from(["qdag", "stats", "-i", "bell.yaml"]).unwrap();
        match cli.command {
            TestCommands::Stats { input, json } => {
                assert_eq!(input, "bell.yaml");
                assert!(!json);
            }
            _ => panic!("Expected Stats command"),
        }
    }

    #[test]
    fn test_parse_stats_json() {
        let cli = TestCli::try_parse_from(["qdag", "stats", "-i", "bell.json", "--json"]).unwrap();
        assert!(matches!(cli.command, TestCommands::Stats { json: true, .. }));
    }

    // --- Optimize command ---

    #[test]
    fn test_parse_optimize_minimal() {
        let cli = TestCli::try_parse_from(["qdag", "optimize", "-i", "c.yaml"]).unwrap();
        match cli.command {
            TestCommands::Optimize {
                input,
                output,
                optimization_level,
            } => {
                assert_eq!(input, "c.yaml");
                assert!(output.is_none());
                assert_eq!(optimization_level, 1);
            }
            _ => panic!("Expected Optimize command"),
        }
    }

    #[test]
    fn test_parse_optimize_with_all_args() {
        let cli = TestCli::try_parse_from([
            "qdag",
            "optimize",
            "--input",
            "c.yaml",
            "--output",
            "out.json",
            "--optimization-level",
            "3",
        ])
        .unwrap();
        match cli.command {
            TestCommands::Optimize {
                output,
                optimization_level,
                ..
            } => {
                assert_eq!(output.as_deref(), Some("out.json"));
                assert_eq!(optimization_level, 3);
            }
            _ => panic!("Expected Optimize command"),
        }
    }

    #[test]
    fn test_parse_optimize_missing_input() {
        let result = TestCli::try_parse_from(["qdag", "optimize"]);
        assert!(result.is_err());
    }

    // --- Check & Convert ---

    #[test]
    fn test_parse_check() {
        let cli = TestCli::try_parse_from(["qdag", "check", "-i", "c.json"]).unwrap();
        assert!(matches!(cli.command, TestCommands::Check { input } if input == "c.json"));
    }

    #[test]
    fn test_parse_convert_requires_output() {
        assert!(TestCli::try_parse_from(["qdag", "convert", "-i", "c.json"]).is_err());
        let cli =
            TestCli::try_parse_from(["qdag", "convert", "-i", "c.json", "-o", "c.yaml"]).unwrap();
        match cli.command {
            TestCommands::Convert { input, output } => {
                assert_eq!(input, "c.json");
                assert_eq!(output, "c.yaml");
            }
            _ => panic!("Expected Convert command"),
        }
    }

    // --- Demo command ---

    #[test]
    fn test_parse_demo_defaults() {
        let cli = TestCli::try_parse_from(["qdag", "demo", "ghz"]).unwrap();
        match cli.command {
            TestCommands::Demo {
                circuit,
                num_qubits,
                output,
            } => {
                assert_eq!(circuit, TestDemoCircuit::Ghz);
                assert_eq!(num_qubits, 3);
                assert!(output.is_none());
            }
            _ => panic!("Expected Demo command"),
        }
    }

    #[test]
    fn test_parse_demo_kebab_case() {
        let cli =
            TestCli::try_parse_from(["qdag", "demo", "cancel-cnots", "-o", "cx.yaml"]).unwrap();
        assert!(matches!(
            cli.command,
            TestCommands::Demo {
                circuit: TestDemoCircuit::CancelCnots,
                ..
            }
        ));
    }

    #[test]
    fn test_parse_demo_unknown_circuit() {
        assert!(TestCli::try_parse_from(["qdag", "demo", "grover"]).is_err());
    }

    // --- Version ---

    #[test]
    fn test_parse_version() {
        let cli = TestCli::try_parse_from(["qdag", "version"]).unwrap();
        assert!(matches!(cli.command, TestCommands::Version));
    }

    // --- Verbose flag ---

    #[test]
    fn test_parse_verbose_flag() {
        let cli = TestCli::try_parse_from(["qdag", "-v", "version"]).unwrap();
        assert_eq!(cli.verbose, 1);
    }

    #[test]
    fn test_parse_verbose_after_subcommand() {
        let cli = TestCli::try_parse_from(["qdag", "stats", "-i", "c.yaml", "-vvv"]).unwrap();
        assert_eq!(cli.verbose, 3);
    }

    // --- Error cases ---

    #[test]
    fn test_no_subcommand() {
        let result = TestCli::try_parse_from(["qdag"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_subcommand() {
        let result = TestCli::try_parse_from(["qdag", "foobar"]);
        assert!(result.is_err());
    }
}
