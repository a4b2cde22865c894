//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - sparse error-generator propagation for Clifford circuits",
        style("errgen").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  errgen-ir    Pauli algebra, Clifford tableaus, layered circuits");
    println!("  errgen-prop  Error-generator propagation, BCH and cumulant expansions");
    println!("  errgen-cli   Command-line interface");
    println!();
    println!("License:    {}", style(env!("CARGO_PKG_LICENSE")).dim());
}
