//! Colored user-facing output.
//!
//! Progress goes to stdout, failures to stderr. Diagnostics for developers
//! go through `tracing` instead.

use colored::Colorize;

pub fn step(message: &str) {
    println!("{} {}", "›".blue().bold(), message.blue());
}

pub fn done(message: &str) {
    println!("  {} {}", "[DONE]".green(), message);
}

pub fn skip(message: &str) {
    println!("  {} {}", "[SKIP]".yellow(), message);
}

pub fn warn(message: &str) {
    println!("{} {}", "!".yellow().bold(), message.yellow());
}

pub fn success(message: &str) {
    println!("{} {}", "✔".green().bold(), message.green());
}

pub fn highlight(message: &str) {
    println!("  {}", message.cyan().bold());
}

/// Print a terminal error and an optional remedy.
pub fn error(message: &str, remedy: Option<&str>) {
    eprintln!("{} {}", "error:".red().bold(), message.red());
    if let Some(remedy) = remedy {
        eprintln!("  {}", remedy.yellow());
    }
}
