//! Run command implementation.

use anyhow::Result;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use qmodexp_sim::{ModExpConfig, ModularExponentiation, SimError};

use super::common::{
    DEFAULT_INPUT, export_report, load_config, print_powers, print_report, print_states,
};

/// Configuration values given on the command line.
#[derive(Debug, Default, Clone, Copy)]
pub struct Overrides {
    pub base: Option<u64>,
    pub modulus: Option<u64>,
    pub qubits: Option<usize>,
}

impl Overrides {
    fn is_complete(&self) -> bool {
        self.base.is_some() && self.modulus.is_some() && self.qubits.is_some()
    }

    fn apply(&self, mut config: ModExpConfig) -> ModExpConfig {
        if let Some(base) = self.base {
            config.base = base;
        }
        if let Some(modulus) = self.modulus {
            config.modulus = modulus;
        }
        if let Some(qubits) = self.qubits {
            config.exponent_qubits = qubits;
        }
        config
    }
}

/// Resolve the configuration: read the input file unless every value was
/// given as a flag, then apply the flags on top.
pub fn resolve_config(input: Option<&str>, overrides: Overrides) -> Result<ModExpConfig> {
    let config = match input {
        Some(path) => load_config(path)?,
        None if overrides.is_complete() => ModExpConfig::new(0, 0, 0),
        None => load_config(DEFAULT_INPUT)?,
    };
    let config = overrides.apply(config);
    debug!(?overrides, ?config, "resolved configuration");
    Ok(config)
}

/// Execute the run command.
pub fn execute(
    input: Option<&str>,
    overrides: Overrides,
    export: Option<&str>,
    show_states: bool,
) -> Result<()> {
    let config = resolve_config(input, overrides)?;

    println!(
        "{} Computing {}^x mod {} over {} exponent qubits",
        style("→").cyan().bold(),
        style(config.base).green(),
        style(config.modulus).green(),
        config.exponent_qubits
    );

    let driver = match ModularExponentiation::new(config) {
        Ok(driver) => driver,
        Err(SimError::NonUnitaryPrecondition { gcd, .. }) => {
            println!(
                "  {} gcd({}, {}) = {}, found factor {}",
                style("!").yellow().bold(),
                config.base,
                config.modulus,
                gcd,
                style(gcd).yellow()
            );
            anyhow::bail!(
                "{} and {} are not coprime; modular multiplication would not be unitary",
                config.base,
                config.modulus
            );
        }
        Err(e) => return Err(e.into()),
    };

    let layout = driver.layout();
    println!(
        "  Registers: {} exponent + {} target = {} qubits ({} basis states)",
        layout.exponent.len(),
        layout.target.len(),
        layout.total_qubits(),
        1usize << layout.total_qubits()
    );

    let progress = ProgressBar::new(config.exponent_qubits as u64);
    progress.set_style(
        ProgressStyle::with_template("{spinner:.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("=> "),
    );
    progress.set_message("controlled multiplications");

    let run = driver.run_with(|_, gate| {
        progress.set_message(format!("× {} mod {}", gate.multiplier(), gate.modulus()));
        progress.inc(1);
    })?;
    progress.finish_and_clear();

    println!(
        "  State: {} qubits, {} KiB, total probability {:.12}",
        run.state.num_qubits(),
        run.state.memory_usage() / 1024,
        run.state.total_probability()
    );

    print_powers(&run);
    if show_states {
        print_states(&run);
    }

    let report = run.verify();
    print_report(&report);

    if let Some(path) = export {
        export_report(&report, path)?;
    }

    if !report.all_passed() {
        anyhow::bail!(
            "verification failed for {} of {} branches",
            report.total() - report.passed(),
            report.total()
        );
    }

    Ok(())
}
