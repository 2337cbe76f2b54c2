//! Console output utilities.

use console::style;

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("INFO").cyan().bold(), message);
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("OK").green().bold(), message);
}

/// Print a warning message.
pub fn print_warning(message: &str) {
    println!("{} {}", style("WARN").yellow().bold(), message);
}

/// Print an error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", style("ERROR").red().bold(), message);
}

/// Print the run parameters.
pub fn print_config_summary(ssid: &str, output_dir: &str, gateway: &str, restore_mode: &str) {
    println!();
    println!("{}", style("Configuration:").bold());
    println!("  Hotspot:   {}", ssid);
    println!("  Gateway:   {}", gateway);
    println!("  Directory: {}", output_dir);
    println!("  Restore:   {}", restore_mode);
    println!();
}
