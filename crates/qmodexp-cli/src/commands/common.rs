//! Shared helpers for CLI commands.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use console::style;
use tracing::debug;

use qmodexp_sim::{ModExpConfig, ModExpRun, VerificationReport};

/// Configuration file read when no input is named.
pub const DEFAULT_INPUT: &str = "input.txt";

/// Probability above which `--show-states` lists a basis state.
pub const SIGNIFICANT_PROBABILITY: f64 = 0.001;

/// Load a configuration from a text, JSON or YAML file.
///
/// Text files hold `base modulus qubits` separated by whitespace.
pub fn load_config(path: &str) -> Result<ModExpConfig> {
    let path_obj = Path::new(path);

    if !path_obj.exists() {
        anyhow::bail!("File not found: {path}");
    }

    let source =
        fs::read_to_string(path).with_context(|| format!("Failed to read file: {path}"))?;

    let ext = path_obj.extension().and_then(|e| e.to_str()).unwrap_or("");
    debug!(path, ext, "loading configuration");

    match ext.to_lowercase().as_str() {
        "json" => {
            serde_json::from_str(&source).with_context(|| format!("Invalid JSON in {path}"))
        }
        "yaml" | "yml" => {
            serde_yaml_ng::from_str(&source).with_context(|| format!("Invalid YAML in {path}"))
        }
        _ => source
            .parse::<ModExpConfig>()
            .map_err(|e| anyhow::anyhow!("Parse error in {path}: {e}")),
    }
}

/// Print the power table `base^(2^i) mod modulus`.
pub fn print_powers(run: &ModExpRun) {
    println!("\n{} Controlled multipliers:", style("→").cyan().bold());
    for (i, power) in run.powers.iter().enumerate() {
        println!(
            "  q{:<2} {}^(2^{}) mod {} = {}",
            i,
            run.config.base,
            i,
            run.config.modulus,
            style(power).yellow()
        );
    }
}

/// Print every basis state above [`SIGNIFICANT_PROBABILITY`], split into
/// exponent and target values.
pub fn print_states(run: &ModExpRun) {
    println!(
        "\n{} Significant states (p > {}):",
        style("→").cyan().bold(),
        SIGNIFICANT_PROBABILITY
    );
    for (index, amp, p) in run.state.significant_states(SIGNIFICANT_PROBABILITY) {
        println!(
            "  |x={:<4} y={:<4}⟩  {:+.4}{:+.4}i  p = {:.6}",
            run.layout.exponent.extract(index),
            run.layout.target.extract(index),
            amp.re,
            amp.im,
            p
        );
    }
}

/// Print the per-branch verification table and a summary line.
pub fn print_report(report: &VerificationReport) {
    println!("\n{} Verification:", style("→").cyan().bold());
    println!(
        "  {:>5}  {:>8}  {:>8}  {:>10}",
        "x", "expected", "observed", "p"
    );
    for branch in &report.branches {
        let mark = if branch.passed {
            style("✓").green()
        } else {
            style("✗").red()
        };
        println!(
            "  {:>5}  {:>8}  {:>8}  {:>10.6}  {}",
            branch.exponent, branch.expected, branch.observed, branch.probability, mark
        );
    }

    let summary = format!("{}/{} branches verified", report.passed(), report.total());
    if report.all_passed() {
        println!("\n{} {}", style("✓").green().bold(), summary);
    } else {
        println!("\n{} {}", style("✗").red().bold(), summary);
    }
}

/// Write `report` as pretty JSON.
pub fn export_report(report: &VerificationReport, path: &str) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json).with_context(|| format!("Failed to write report: {path}"))?;
    println!("  Report written to {}", style(path).green());
    Ok(())
}
