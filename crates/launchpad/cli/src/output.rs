//! Output formatting utilities

use colored::*;
use launchpad_types::{Milestone, Step, StepState};

fn step_marker(state: StepState) -> &'static str {
    match state {
        StepState::Completed => "✓",
        StepState::Active => "▶",
        StepState::Pending => "·",
    }
}

/// One-line step indicator, e.g. `✓ Initialize Project ─ ▶ Validate Project ─ · Launch Campaign`.
pub fn step_tracker(steps: &[Step]) -> String {
    steps
        .iter()
        .map(|s| format!("{} {}", step_marker(s.state), s.title))
        .collect::<Vec<_>>()
        .join(" ─ ")
}

/// Header for the active phase: position, title and description of the
/// active step, followed by the step indicator.
pub fn phase_header(steps: &[Step]) {
    let Some((index, active)) = steps.iter().enumerate().find(|(_, s)| s.is_active()) else {
        return;
    };
    let heading = format!("Step {}/{}  {}", index + 1, steps.len(), active.title);
    println!();
    println!("{}", heading.as_str().bold());
    println!("{}", "─".repeat(heading.chars().count()).as_str().dimmed());
    println!("{}", active.description.as_str().dimmed());
    println!("{}", step_tracker(steps));
}

pub fn print_milestones(milestones: &[Milestone]) {
    for m in milestones {
        let due = m
            .delivery_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "    {:<4} {:>3}%  {:<12} {}",
            m.id.to_string(),
            m.fund_percentage,
            due,
            m.title
        );
    }
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}
