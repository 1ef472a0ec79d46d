//! antledger - ant reconciliation and release numbering

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = ant_farm_ledger::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
