//! Shared CLI helpers — path expansion, plan rendering, banner.

use std::path::{Path, PathBuf};

use colored::Colorize;

use planforge_core::types::{Plan, ProjectAnalysis};

/// Expand `~` at the start of a path to the user's home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs_next::home_dir() {
            return home.join(rest);
        }
    }
    if path == "~" {
        if let Some(home) = dirs_next::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}

/// Print the banner shown at REPL start.
pub fn print_banner() {
    let version = env!("CARGO_PKG_VERSION");
    println!();
    println!("{}  v{}", "Planforge".cyan().bold(), version.dimmed());
    println!(
        "{}",
        "Describe a project to plan it, or \"exit\" to quit.".dimmed()
    );
    println!();
}

/// Print a "thinking" placeholder while the model works.
pub fn print_thinking() {
    eprint!("{}", "⠿ analysing project...".dimmed());
}

/// Clear the "thinking" placeholder.
pub fn clear_thinking() {
    eprint!("\r{}\r", " ".repeat(40));
}

pub fn print_saved(path: &Path) {
    println!("  {} plan saved to {}", "✓".green(), path.display());
}

pub fn print_plan(plan: &Plan) {
    print!("{}", render_plan(plan));
}

// ─────────────────────────────────────────────
// Rendering
// ─────────────────────────────────────────────

/// Render the analysis and checklist as coloured terminal text.
pub fn render_plan(plan: &Plan) -> String {
    let mut out = String::new();
    let a = &plan.analysis;

    out.push('\n');
    out.push_str(&format!("{}\n", a.project_name.cyan().bold()));
    out.push_str(&format!("  {:<16} {}\n", "Type:".bold(), a.project_type.label()));
    out.push_str(&format!("  {:<16} {}\n", "Complexity:".bold(), a.complexity.label()));
    if let Some(hours) = a.estimated_hours {
        out.push_str(&format!("  {:<16} {}\n", "Estimate:".bold(), format_hours(hours)));
    }

    section(&mut out, "Main features", &a.main_features);
    section(&mut out, "Recommended tech", &a.recommended_tech);
    section(&mut out, "Technical challenges", &a.technical_challenges);
    section(&mut out, "Risks", &a.risk_factors);
    section(&mut out, "Recommendations", &a.recommendations);
    phases(&mut out, a);
    section(&mut out, "Success criteria", &a.success_criteria);

    out.push_str(&format!("\n{}\n", "Development checklist".cyan().bold()));
    for (i, step) in plan.steps.iter().enumerate() {
        out.push_str(&format!(
            "\n  {} {}. {} {}\n",
            "[ ]".dimmed(),
            i + 1,
            step.title.bold(),
            format!("({})", step.kind.label()).dimmed()
        ));
        for line in step.prompt.lines() {
            out.push_str(&format!("      {line}\n"));
        }
    }
    out.push('\n');
    out
}

fn section(out: &mut String, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    out.push_str(&format!("\n  {}\n", title.bold()));
    for item in items {
        out.push_str(&format!("    • {item}\n"));
    }
}

fn phases(out: &mut String, analysis: &ProjectAnalysis) {
    if analysis.development_phases.is_empty() {
        return;
    }
    out.push_str(&format!("\n  {}\n", "Phases".bold()));
    for phase in &analysis.development_phases {
        let hours = phase
            .estimated_hours
            .map(|h| format!(" ({})", format_hours(h)).dimmed().to_string())
            .unwrap_or_default();
        out.push_str(&format!("    {}{}\n", phase.phase.yellow(), hours));
        if !phase.description.is_empty() {
            out.push_str(&format!("      {}\n", phase.description));
        }
        for task in &phase.tasks {
            out.push_str(&format!("      - {task}\n"));
        }
    }
}

fn format_hours(hours: f64) -> String {
    if hours.fract() == 0.0 {
        format!("{hours:.0}h")
    } else {
        format!("{hours:.1}h")
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
