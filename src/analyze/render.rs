//! Terminal rendering of an analysis.

use colored::Colorize;

/// How a line of analysis output is highlighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Milestone,
    Risk,
    NextStep,
    Bullet,
    Plain,
}

impl LineKind {
    /// First match wins: milestone, then risk/gap, then next step, then bullet.
    pub fn classify(line: &str) -> Self {
        let lower = line.to_lowercase();
        if lower.contains("milestone") {
            LineKind::Milestone
        } else if lower.contains("risk") || lower.contains("gap") {
            LineKind::Risk
        } else if lower.contains("next step") {
            LineKind::NextStep
        } else if line.trim_start().starts_with('-') {
            LineKind::Bullet
        } else {
            LineKind::Plain
        }
    }
}

/// Drop the markdown the model emits despite being told not to.
pub fn format_analysis_output(text: &str) -> String {
    text.replace("**", "").replace("---", "").trim().to_string()
}

pub fn print_analysis(text: &str) {
    println!();
    println!("{}", "Sutra Project Analysis".bold().blue());
    println!("{}", "=".repeat(22).cyan());
    println!();

    for line in format_analysis_output(text).lines() {
        let styled = match LineKind::classify(line) {
            LineKind::Milestone => line.yellow().bold(),
            LineKind::Risk => line.red().bold(),
            LineKind::NextStep => line.green().bold(),
            LineKind::Bullet => line.bright_black(),
            LineKind::Plain => line.white(),
        };
        println!("{}", styled);
    }
}
