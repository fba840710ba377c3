//! Pure formatting functions for UI output.
//!
//! Everything the tool prints for the operator goes through here; library
//! diagnostics go through `tracing` instead.

use console::style;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Print every release-note violation, one per line.
pub fn display_violations(violations: &[String]) {
    display_error(&format!(
        "Errors encountered while parsing release notes ({} found)",
        violations.len()
    ));
    for line in format_violations(violations) {
        eprintln!("{}", line);
    }
}

/// Numbered violation lines
pub fn format_violations(violations: &[String]) -> Vec<String> {
    violations
        .iter()
        .enumerate()
        .map(|(i, violation)| format!("  {}. {}", i + 1, violation))
        .collect()
}

/// Show the release a workflow is about to act on.
pub fn display_release_plan(action: &str, version: Option<&str>, directory: &str) {
    println!("\n{}", style(action).bold());
    println!("  Version:    {}", version.unwrap_or("(from pom.xml)"));
    println!("  Repository: {}", directory);
}
