//! Run summary reporting.

use console::style;

use crate::download::{DownloadState, RunOutcome};
use crate::output::console::print_success;

/// Print the final summary for a run.
pub fn print_run_summary(state: &DownloadState) {
    match state.outcome() {
        Some(RunOutcome::AllSucceeded {
            console_name,
            files,
        }) => {
            print_success(&format!(
                "Successfully downloaded {} file(s) from {}",
                files, console_name
            ));
        }
        Some(RunOutcome::FailedAt { filename, cause }) => {
            println!();
            println!("{}", style("Import stopped:").bold());
            println!("  Failed at: {}", style(&filename).red());
            println!("  Cause:     {}", cause);
            print_written(state);
        }
        None if state.console_name.is_some() => {
            println!();
            println!("{}", style("Import incomplete:").bold());
            print_written(state);
        }
        None => {}
    }
}

fn print_written(state: &DownloadState) {
    println!(
        "  Written:   {} of {} file(s), {} bytes (left in place)",
        state.files_written(),
        state.files_listed,
        state.bytes_written()
    );
}
