//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - statevector simulation of modular exponentiation",
        style("qmodexp").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  qmodexp-sim    Statevector, gates and reversible arithmetic");
    println!("  qmodexp-cli    Command-line interface");
    println!();
    println!(
        "Limits:     {} exponent qubits, modulus < {}, {} qubits per state",
        qmodexp_sim::ModExpConfig::MAX_EXPONENT_QUBITS,
        qmodexp_sim::ModExpConfig::MAX_MODULUS,
        qmodexp_sim::MAX_QUBITS
    );
    println!("License:    {}", style("Apache-2.0").dim());
}
