//! CLI command parsing and job-file tests.
//!
//! The CLI is a binary crate, so job loading is exercised through the same
//! serde formats the `Job` struct reads, and argument parsing through a
//! mirror of the clap definitions.

// ============================================================================
// Job files
// ============================================================================

mod job_files {
    use std::collections::BTreeMap;
    use std::fs;
    use std::path::Path;

    use anyhow::{Context, Result};

    use errgen_ir::{Circuit, GateSet};
    use errgen_prop::{
        CovarianceSpec, ErrorPropagator, NoiseModel, PropagationOutput, PropagatorConfig,
        QuasistaticCovariance,
    };
    use serde::Deserialize;

    /// Mirror of `commands::common::Job`.
    #[derive(Debug, Deserialize)]
    #[serde(deny_unknown_fields)]
    struct Job {
        circuit: Circuit,
        noise_model: NoiseModel,
        #[serde(default)]
        config: PropagatorConfig,
        #[serde(default)]
        covariances: Option<Vec<CovarianceSpec>>,
        #[serde(default)]
        aliases: BTreeMap<String, String>,
    }

    const JSON_JOB: &str = r#"{
        "circuit": {
            "num_qubits": 2,
            "layers": [
                [{"name": "Gcnot", "qubits": [0, 1]}],
                [{"name": "Gi", "qubits": [0]}, {"name": "Gi", "qubits": [1]}]
            ]
        },
        "noise_model": {
            "Gcnot": [{"errgen": "H(XI)", "rate": 0.01}],
            "Gi": []
        }
    }"#;

    const YAML_JOB: &str = r#"
circuit:
  num_qubits: 1
  layers:
    - [{name: idle, qubits: [0]}]
    - [{name: idle, qubits: [0]}]
noise_model:
  idle:
    - {errgen: "H(X)", rate: 0.0}
config:
  nonmarkovian: true
aliases:
  idle: Gi
covariances:
  - gates: [{name: idle, qubits: [0]}]
    terms:
      - {errgens: ["H(X)"], variance: 1.0e-4}
"#;

    /// Mirror of `commands::common::load_job`.
    fn load_job(path: &str) -> Result<Job> {
        let path_obj = Path::new(path);
        if !path_obj.exists() {
            anyhow::bail!("File not found: {path}");
        }
        let source =
            fs::read_to_string(path).with_context(|| format!("Failed to read file: {path}"))?;
        match path_obj.extension().and_then(|e| e.to_str()).unwrap_or("") {
            "yaml" | "yml" => serde_yaml_ng::from_str(&source)
                .with_context(|| format!("Failed to parse YAML job: {path}")),
            _ => serde_json::from_str(&source)
                .with_context(|| format!("Failed to parse JSON job: {path}")),
        }
    }

    fn gate_set(job: &Job) -> GateSet {
        job.aliases
            .iter()
            .fold(GateSet::standard(), |gates, (alias, target)| {
                gates.with_alias(alias.as_str(), target).unwrap()
            })
    }

    #[test]
    fn test_json_job_defaults_config() {
        let job: Job = serde_json::from_str(JSON_JOB).unwrap();
        assert_eq!(job.config, PropagatorConfig::default());
        assert!(job.covariances.is_none());
        assert_eq!(job.circuit.depth(), 2);
    }

    #[test]
    fn test_json_job_propagates() {
        let job: Job = serde_json::from_str(JSON_JOB).unwrap();
        let gates = gate_set(&job);
        let propagator = ErrorPropagator::new(job.noise_model, gates, job.config).unwrap();
        let output = propagator.propagate(&job.circuit).unwrap();
        assert_eq!(
            serde_json::to_value(&output).unwrap(),
            serde_json::json!({"end_of_circuit": [{"generator": "H(XI)", "rate": 0.01}]})
        );
    }

    #[test]
    fn test_yaml_job_with_aliases_and_covariance() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("job.yaml");
        fs::write(&path, YAML_JOB).unwrap();

        let job = load_job(path.to_str().unwrap()).unwrap();
        let covariance = QuasistaticCovariance::new(job.covariances.clone().unwrap()).unwrap();
        assert_eq!(covariance.num_params(), 1);

        let gates = gate_set(&job);
        let propagator = ErrorPropagator::new(job.noise_model, gates, job.config).unwrap();
        let output = propagator
            .propagate_with_covariance(&job.circuit, &covariance)
            .unwrap();
        let PropagationOutput::PerTimestep(steps) = output else {
            panic!("expected per-timestep output");
        };
        assert_eq!(steps.len(), 2);
        let sx = "S(X)".parse().unwrap();
        assert!((steps[0].rate(&sx) - 1e-4).abs() < 1e-18);
    }

    #[test]
    fn test_unknown_alias_target() {
        assert!(GateSet::standard().with_alias("idle", "Gnope").is_err());
    }

    #[test]
    fn test_unknown_job_field_rejected() {
        let json = r#"{"circuit": {"num_qubits": 1}, "noise_model": {}, "extra": 1}"#;
        assert!(serde_json::from_str::<Job>(json).is_err());
    }

    #[test]
    fn test_invalid_noise_pattern_rejected() {
        let json = r#"{
            "circuit": {"num_qubits": 1},
            "noise_model": {"Gi": [{"errgen": "H(Q)", "rate": 0.1}]}
        }"#;
        assert!(serde_json::from_str::<Job>(json).is_err());
    }

    #[test]
    fn test_circuit_qubit_out_of_range_rejected() {
        let json = r#"{
            "circuit": {"num_qubits": 1, "layers": [[{"name": "Gi", "qubits": [3]}]]},
            "noise_model": {}
        }"#;
        assert!(serde_json::from_str::<Job>(json).is_err());
    }

    #[test]
    fn test_load_nonexistent_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");
        let err = load_job(path.to_str().unwrap()).unwrap_err();
        assert!(err.to_string().starts_with("File not found"));
    }

    #[test]
    fn test_load_malformed_json_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("job.json");
        fs::write(&path, "{\"circuit\": ").unwrap();
        let err = load_job(path.to_str().unwrap()).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse JSON job"));
    }

    #[test]
    fn test_load_json_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("job.json");
        fs::write(&path, JSON_JOB).unwrap();
        let job = load_job(path.to_str().unwrap()).unwrap();
        assert_eq!(job.circuit.num_qubits(), 2);
    }
}

// ============================================================================
// Clap argument parsing (test via try_parse_from on equivalent structs)
// ============================================================================

mod clap_parsing {
    use clap::{Parser, Subcommand};

    // Mirror the CLI struct for testing (since main.rs is a binary)
    #[derive(Parser)]
    #[command(name = "errgen")]
    struct TestCli {
        #[arg(short, long, action = clap::ArgAction::Count, global = true)]
        verbose: u8,

        #[command(subcommand)]
        command: TestCommands,
    }

    #[derive(Subcommand)]
    enum TestCommands {
        Propagate {
            #[arg(short, long)]
            input: String,
            #[arg(short, long)]
            output: Option<String>,
            #[arg(long)]
            bch_order: Option<usize>,
            #[arg(long)]
            layerwise: bool,
            #[arg(long)]
            nonmarkovian: bool,
            #[arg(long)]
            threshold: Option<f64>,
            #[arg(long)]
            pretty: bool,
        },
        Validate {
            #[arg(short, long)]
            input: String,
        },
        Gates {
            #[arg(short, long)]
            job: Option<String>,
        },
        Version,
    }

    #[test]
    fn test_parse_propagate_minimal() {
        let cli = TestCli::try_parse_from(["errgen", "propagate", "-i", "job.json"]).unwrap();
        match cli.command {
            TestCommands::Propagate {
                input,
                output,
                bch_order,
                layerwise,
                nonmarkovian,
                threshold,
                pretty,
            } => {
                assert_eq!(input, "job.json");
                assert!(output.is_none());
                assert!(bch_order.is_none());
                assert!(!layerwise);
                assert!(!nonmarkovian);
                assert!(threshold.is_none());
                assert!(!pretty);
            }
            _ => panic!("Expected Propagate command"),
        }
    }

    #[test]
    fn test_parse_propagate_with_overrides() {
        let cli = TestCli::try_parse_from([
            "errgen",
            "propagate",
            "--input",
            "job.yaml",
            "-o",
            "out.json",
            "--layerwise",
            "--bch-order",
            "2",
            "--threshold",
            "1e-12",
            "--pretty",
        ])
        .unwrap();
        match cli.command {
            TestCommands::Propagate {
                output,
                bch_order,
                layerwise,
                threshold,
                pretty,
                ..
            } => {
                assert_eq!(output.as_deref(), Some("out.json"));
                assert_eq!(bch_order, Some(2));
                assert!(layerwise);
                assert_eq!(threshold, Some(1e-12));
                assert!(pretty);
            }
            _ => panic!("Expected Propagate command"),
        }
    }

    #[test]
    fn test_parse_propagate_missing_input() {
        assert!(TestCli::try_parse_from(["errgen", "propagate"]).is_err());
    }

    #[test]
    fn test_parse_propagate_bad_order() {
        assert!(
            TestCli::try_parse_from(["errgen", "propagate", "-i", "j.json", "--bch-order", "two"])
                .is_err()
        );
    }

    #[test]
    fn test_parse_validate() {
        let cli = TestCli::try_parse_from(["errgen", "validate", "-i", "job.json"]).unwrap();
        assert!(matches!(cli.command, TestCommands::Validate { input } if input == "job.json"));
    }

    #[test]
    fn test_parse_gates_with_job() {
        let cli = TestCli::try_parse_from(["errgen", "gates", "--job", "job.yaml"]).unwrap();
        assert!(matches!(cli.command, TestCommands::Gates { job: Some(j) } if j == "job.yaml"));
    }

    #[test]
    fn test_parse_version() {
        let cli = TestCli::try_parse_from(["errgen", "version"]).unwrap();
        assert!(matches!(cli.command, TestCommands::Version));
    }

    #[test]
    fn test_parse_verbose_flags() {
        let cli = TestCli::try_parse_from(["errgen", "-vv", "gates"]).unwrap();
        assert_eq!(cli.verbose, 2);
        let cli = TestCli::try_parse_from(["errgen", "gates", "-vvv"]).unwrap();
        assert_eq!(cli.verbose, 3);
    }

    #[test]
    fn test_no_subcommand() {
        assert!(TestCli::try_parse_from(["errgen"]).is_err());
    }

    #[test]
    fn test_unknown_subcommand() {
        assert!(TestCli::try_parse_from(["errgen", "simulate"]).is_err());
    }
}
