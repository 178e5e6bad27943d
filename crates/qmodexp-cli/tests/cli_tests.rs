//! CLI command parsing and configuration loading tests.
//!
//! Tests cover argument parsing (via clap `try_parse_from`), the three
//! configuration file formats and flag overrides as the binary loads them,
//! and exit codes of the built binary.

// ============================================================================
// Configuration loading (through `run -i` on the built binary)
// ============================================================================

mod config_loading {
    use std::fs;
    use std::path::Path;
    use std::process::Output;

    fn run_with(input: &Path, flags: &[&str]) -> Output {
        let mut args = vec!["run", "-i", input.to_str().unwrap()];
        args.extend_from_slice(flags);
        std::process::Command::new(env!("CARGO_BIN_EXE_qmodexp"))
            .args(args)
            .output()
            .unwrap()
    }

    #[test]
    fn test_load_text_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.txt");
        fs::write(&path, "2\n21\n3\n").unwrap();

        let output = run_with(&path, &[]);
        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("Computing 2^x mod 21 over 3 exponent qubits"));
        assert!(stdout.contains("8/8 branches verified"));
    }

    #[test]
    fn test_modulus_flag_overrides_text_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.txt");
        fs::write(&path, "2 15 3\n").unwrap();

        let output = run_with(&path, &["--modulus", "21"]);
        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("Computing 2^x mod 21 over 3 exponent qubits"));
        assert!(!stdout.contains("mod 15"));
    }

    #[test]
    fn test_base_flag_repairs_non_coprime_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.txt");
        fs::write(&path, "6 15 4\n").unwrap();

        assert_eq!(run_with(&path, &[]).status.code(), Some(1));

        let output = run_with(&path, &["-b", "7"]);
        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("Computing 7^x mod 15 over 4 exponent qubits"));
        assert!(stdout.contains("16/16 branches verified"));
    }

    #[test]
    fn test_qubits_flag_overrides_valid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.txt");
        fs::write(&path, "7 15 4\n").unwrap();

        let output = run_with(&path, &["--qubits", "11"]);
        assert_eq!(output.status.code(), Some(1));
    }

    #[test]
    fn test_load_yml_file_with_short_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");
        fs::write(&path, "base: 11\nmodulus: 21\nqubits: 5\n").unwrap();

        let output = run_with(&path, &[]);
        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("Computing 11^x mod 21 over 5 exponent qubits"));
        assert!(stdout.contains("32/32 branches verified"));
    }

    #[test]
    fn test_load_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "base: 7\nmodulus: 15\nexponent_qubits: 2\n").unwrap();

        let output = run_with(&path, &[]);
        assert!(output.status.success());
        assert!(String::from_utf8_lossy(&output.stdout).contains("4/4 branches verified"));
    }

    #[test]
    fn test_load_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{ "base": 7, "modulus": 15, "exponent_qubits": 4 }"#,
        )
        .unwrap();

        let output = run_with(&path, &[]);
        assert!(output.status.success());
        assert!(String::from_utf8_lossy(&output.stdout).contains("16/16 branches verified"));
    }

    #[test]
    fn test_text_file_missing_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.txt");
        fs::write(&path, "7 15\n").unwrap();

        let output = run_with(&path, &[]);
        assert_eq!(output.status.code(), Some(1));
        assert!(String::from_utf8_lossy(&output.stderr).contains("Parse error"));
    }

    #[test]
    fn test_malformed_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "base": 7, "modulus": "#).unwrap();

        let output = run_with(&path, &[]);
        assert_eq!(output.status.code(), Some(1));
        assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid JSON"));
    }

    #[test]
    fn test_out_of_range_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.txt");
        fs::write(&path, "7 2048 4\n").unwrap();

        assert_eq!(run_with(&path, &[]).status.code(), Some(1));
    }
}

// ============================================================================
// Clap argument parsing (test via try_parse_from on equivalent structs)
// ============================================================================

mod clap_parsing {
    use clap::{Parser, Subcommand};

    // Mirror the CLI struct for testing (since main.rs is a binary)
    #[derive(Parser)]
    #[command(name = "qmodexp")]
    struct TestCli {
        #[arg(short, long, action = clap::ArgAction::Count, global = true)]
        verbose: u8,

        #[command(subcommand)]
        command: TestCommands,
    }

    #[derive(Subcommand)]
    enum TestCommands {
        Run {
            #[arg(short, long)]
            input: Option<String>,
            #[arg(short, long)]
            base: Option<u64>,
            #[arg(short, long)]
            modulus: Option<u64>,
            #[arg(short, long)]
            qubits: Option<usize>,
            #[arg(short, long)]
            export: Option<String>,
            #[arg(long)]
            show_states: bool,
        },
        Check {
            #[arg(short, long)]
            base: u64,
            #[arg(short, long)]
            modulus: u64,
        },
        Version,
    }

    // --- Run command ---

    #[test]
    fn test_parse_run_minimal() {
        let cli = TestCli::try_parse_from(["qmodexp", "run"]).unwrap();
        match cli.command {
            TestCommands::Run {
                input,
                base,
                show_states,
                ..
            } => {
                assert!(input.is_none());
                assert!(base.is_none());
                assert!(!show_states);
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_parse_run_with_flags() {
        let cli = TestCli::try_parse_from([
            "qmodexp",
            "run",
            "--base",
            "7",
            "--modulus",
            "15",
            "--qubits",
            "4",
            "--show-states",
        ])
        .unwrap();
        match cli.command {
            TestCommands::Run {
                base,
                modulus,
                qubits,
                show_states,
                ..
            } => {
                assert_eq!(base, Some(7));
                assert_eq!(modulus, Some(15));
                assert_eq!(qubits, Some(4));
                assert!(show_states);
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_parse_run_short_flags() {
        let cli = TestCli::try_parse_from([
            "qmodexp", "run", "-i", "cfg.yaml", "-m", "21", "-e", "out.json",
        ])
        .unwrap();
        match cli.command {
            TestCommands::Run {
                input,
                modulus,
                export,
                ..
            } => {
                assert_eq!(input.as_deref(), Some("cfg.yaml"));
                assert_eq!(modulus, Some(21));
                assert_eq!(export.as_deref(), Some("out.json"));
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_parse_run_rejects_negative_modulus() {
        let result = TestCli::try_parse_from(["qmodexp", "run", "--modulus", "-15"]);
        assert!(result.is_err());
    }

    // --- Check command ---

    #[test]
    fn test_parse_check() {
        let cli = TestCli::try_parse_from(["qmodexp", "check", "-b", "6", "-m", "15"]).unwrap();
        match cli.command {
            TestCommands::Check { base, modulus } => {
                assert_eq!(base, 6);
                assert_eq!(modulus, 15);
            }
            _ => panic!("Expected Check command"),
        }
    }

    #[test]
    fn test_parse_check_missing_modulus() {
        let result = TestCli::try_parse_from(["qmodexp", "check", "--base", "6"]);
        assert!(result.is_err());
    }

    // --- Version ---

    #[test]
    fn test_parse_version() {
        let cli = TestCli::try_parse_from(["qmodexp", "version"]).unwrap();
        assert!(matches!(cli.command, TestCommands::Version));
    }

    // --- Verbose flag ---

    #[test]
    fn test_parse_verbose_flag() {
        let cli = TestCli::try_parse_from(["qmodexp", "-v", "version"]).unwrap();
        assert_eq!(cli.verbose, 1);
    }

    #[test]
    fn test_parse_verbose_after_subcommand() {
        let cli = TestCli::try_parse_from(["qmodexp", "run", "-vvv"]).unwrap();
        assert_eq!(cli.verbose, 3);
    }

    // --- Error cases ---

    #[test]
    fn test_no_subcommand() {
        let result = TestCli::try_parse_from(["qmodexp"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_subcommand() {
        let result = TestCli::try_parse_from(["qmodexp", "factor"]);
        assert!(result.is_err());
    }
}

// ============================================================================
// Binary exit codes
// ============================================================================

mod binary {
    use std::fs;
    use std::process::Command;

    fn qmodexp() -> Command {
        Command::new(env!("CARGO_BIN_EXE_qmodexp"))
    }

    #[test]
    fn test_run_succeeds_for_coprime_input() {
        let output = qmodexp()
            .args(["run", "--base", "7", "--modulus", "15", "--qubits", "4"])
            .output()
            .unwrap();
        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("16/16 branches verified"));
    }

    #[test]
    fn test_run_fails_for_non_coprime_input() {
        let output = qmodexp()
            .args(["run", "--base", "6", "--modulus", "15", "--qubits", "4"])
            .output()
            .unwrap();
        assert_eq!(output.status.code(), Some(1));
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("found factor"));
    }

    #[test]
    fn test_run_fails_for_out_of_range_input() {
        let output = qmodexp()
            .args(["run", "--base", "7", "--modulus", "15", "--qubits", "11"])
            .output()
            .unwrap();
        assert_eq!(output.status.code(), Some(1));
    }

    #[test]
    fn test_run_reads_default_input_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("input.txt"), "2 21 3\n").unwrap();
        let output = qmodexp().current_dir(dir.path()).arg("run").output().unwrap();
        assert!(output.status.success());
    }

    #[test]
    fn test_run_missing_default_input_file() {
        let dir = tempfile::tempdir().unwrap();
        let output = qmodexp().current_dir(dir.path()).arg("run").output().unwrap();
        assert_eq!(output.status.code(), Some(1));
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("File not found"));
    }

    #[test]
    fn test_run_exports_report() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("config.json");
        let report = dir.path().join("report.json");
        fs::write(&config, r#"{"base": 7, "modulus": 15, "qubits": 3}"#).unwrap();

        let status = qmodexp()
            .args([
                "run",
                "-i",
                config.to_str().unwrap(),
                "-e",
                report.to_str().unwrap(),
            ])
            .status()
            .unwrap();
        assert!(status.success());

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
        assert_eq!(json["branches"].as_array().unwrap().len(), 8);
    }

    #[test]
    fn test_check_reports_factor() {
        let output = qmodexp()
            .args(["check", "--base", "6", "--modulus", "15"])
            .output()
            .unwrap();
        assert_eq!(output.status.code(), Some(1));
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("found factor"));

        let output = qmodexp()
            .args(["check", "--base", "7", "--modulus", "15"])
            .output()
            .unwrap();
        assert!(output.status.success());
    }
}
