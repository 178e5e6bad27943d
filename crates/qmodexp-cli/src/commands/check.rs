//! Check command implementation.

use anyhow::Result;
use console::style;

use qmodexp_sim::gcd;

/// Execute the check command.
pub fn execute(base: u64, modulus: u64) -> Result<()> {
    if base == 0 || modulus == 0 {
        anyhow::bail!("base and modulus must be positive");
    }

    let g = gcd(base, modulus);
    if g == 1 {
        println!(
            "{} gcd({base}, {modulus}) = 1, modular exponentiation is unitary",
            style("✓").green().bold()
        );
        return Ok(());
    }

    if g == modulus {
        println!(
            "{} {modulus} divides {base}, no non-trivial factor",
            style("!").yellow().bold()
        );
        anyhow::bail!("{base} and {modulus} are not coprime");
    }

    println!(
        "{} gcd({base}, {modulus}) = {g}, found factor {}: {modulus} = {g} × {}",
        style("!").yellow().bold(),
        style(g).yellow(),
        modulus / g
    );
    anyhow::bail!("{base} and {modulus} are not coprime")
}
