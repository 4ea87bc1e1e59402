//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `lifelog_core` linkage and that
//!   a fresh database opens and migrates.

use std::process::ExitCode;

fn main() -> ExitCode {
    println!("lifelog_core version={}", lifelog_core::core_version());

    // No valid store means no valid app state; treat open failure as fatal.
    match lifelog_core::db::open_db_in_memory() {
        Ok(_) => {
            println!("lifelog_core db=ok");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("lifelog_core db=error {err}");
            ExitCode::FAILURE
        }
    }
}
