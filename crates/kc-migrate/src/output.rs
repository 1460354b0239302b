//! Console output utilities.
//!
//! The log file gets the detail; the console gets progress lines and the
//! final summary.

use colored::Colorize;
use tabled::{settings::Style, Table};

use crate::report::MigrationReport;

/// Prints a success message.
pub fn success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Prints an error message.
pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Prints a warning message.
pub fn warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow().bold(), message);
}

/// Prints an info message.
pub fn info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Renders the run summary as a table.
#[must_use]
pub fn summary_table(report: &MigrationReport) -> String {
    Table::new(report.summary_rows())
        .with(Style::rounded())
        .to_string()
}

/// Prints the run summary.
pub fn summary(report: &MigrationReport) {
    println!();
    println!("{}", summary_table(report));
    if report.has_failures() {
        warning("Some operations failed; see the log file for details.");
    }
}
