//! Gates command implementation.

use anyhow::Result;
use console::style;

use errgen_ir::GateSet;

use super::common::load_job;

/// Execute the gates command. With a job file, its aliases are included.
pub fn execute(job: Option<&str>) -> Result<()> {
    let gates = match job {
        Some(path) => load_job(path)?.gate_set()?,
        None => GateSet::standard(),
    };

    println!("{} Registered gates:\n", style("errgen").cyan().bold());
    for name in gates.names() {
        let gate = gates.resolve(name)?;
        println!(
            "  {:<10} {} ({} qubit{})",
            style(name).bold(),
            style(gate.name()).yellow(),
            gate.num_qubits(),
            if gate.num_qubits() == 1 { "" } else { "s" }
        );
    }

    Ok(())
}
