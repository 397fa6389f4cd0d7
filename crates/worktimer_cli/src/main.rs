//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `worktimer_core` linkage and
//!   schema bootstrap.
//! - Keep output deterministic for quick local sanity checks.

use std::process::ExitCode;

fn main() -> ExitCode {
    println!("worktimer_core ping={}", worktimer_core::ping());
    println!("worktimer_core version={}", worktimer_core::core_version());

    // Opening an in-memory database runs the full migration chain.
    match worktimer_core::db::open_db_in_memory() {
        Ok(_) => {
            println!("schema=ok");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("schema=error {err}");
            ExitCode::FAILURE
        }
    }
}
