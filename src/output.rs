//! Terminal output: status lines, the plan preview, progress and summaries.
//!
//! Everything the user reads goes through [`OutputFormatter`], so styling
//! stays consistent. Diagnostics for developers go through `tracing` instead.

use crate::file_organizer::ApplyReport;
use crate::planner::Action;
use crate::undo::UndoReport;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeMap;
use std::path::PathBuf;

const RULE_WIDTH: usize = 60;

/// Manages all CLI output with consistent styling and formatting.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    pub fn plain(message: &str) {
        println!("{}", message);
    }

    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Creates a progress bar for a batch of moves.
    ///
    /// An empty batch gets a hidden bar so nothing flickers on screen.
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        if total == 0 {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(total);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░");
        pb.set_style(style);
        pb
    }

    /// Shows what will happen to each file and why.
    pub fn preview(actions: &[Action]) {
        println!("\n{}", "═".repeat(RULE_WIDTH));
        println!("{}", "Preview: what will move, and why".bold());
        println!("{}", "═".repeat(RULE_WIDTH));

        for action in actions {
            println!("\n📄 {}", action.file_name.bold());
            println!("   ➤ {} {}", action.label, format!("({}/)", action.folder_name).dimmed());
            println!("   💬 {}", action.rationale);
        }

        println!("\n{}", "─".repeat(RULE_WIDTH));
        println!(
            "🔍 Total: {} {} ready to organize.",
            actions.len(),
            if actions.len() == 1 { "file" } else { "files" }
        );
    }

    /// Prints the result of an organize run.
    pub fn apply_summary(report: &ApplyReport, log_path: &std::path::Path) {
        Self::summary_table(&report.category_counts, report.moved());

        if !report.failures.is_empty() {
            Self::header("NOT MOVED");
            Self::failure_list(&report.failures);
            Self::warning(&format!(
                "{} of {} files could not be moved and were left in place.",
                report.failures.len(),
                report.failures.len() + report.moved()
            ));
        }

        Self::success(&format!("Done! Move log saved to '{}'.", log_path.display()));
        Self::plain("Run again with --revert to put everything back.");
    }

    /// Prints the result of an undo run.
    pub fn undo_summary(report: &UndoReport) {
        Self::header("UNDO");
        for path in &report.restored {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| path.display().to_string());
            println!("⏪ Restored: {}", name);
        }
        Self::plain(&format!("  Restored: {}", report.restored_count()));

        if !report.skipped.is_empty() {
            Self::warning(&format!("Skipped (no longer there): {}", report.skipped.len()));
            Self::failure_list(&report.skipped);
        }
        if !report.conflicts.is_empty() {
            Self::warning(&format!(
                "Left in place (original path is taken): {}",
                report.conflicts.len()
            ));
            Self::failure_list(&report.conflicts);
        }
        if !report.failed.is_empty() {
            Self::error(&format!("Failed: {}", report.failed.len()));
            Self::failure_list(&report.failed);
        }

        if report.is_complete_success() {
            Self::success("Undo complete.");
        } else {
            Self::success("Undo finished with exceptions; the move log has been cleared.");
        }
    }

    fn failure_list(items: &[(PathBuf, String)]) {
        for (path, reason) in items {
            println!("    - {}: {}", path.display(), reason.dimmed());
        }
    }

    /// Prints a table of file counts per category folder.
    pub fn summary_table(category_counts: &BTreeMap<String, usize>, total_files: usize) {
        Self::header("SUMMARY");

        let max_category_len = category_counts
            .keys()
            .map(|name| name.chars().count())
            .max()
            .unwrap_or(0)
            .max(8);

        println!(
            "{:<width$} | {}",
            "Category".bold(),
            "Files".bold(),
            width = max_category_len
        );
        println!("{}", "-".repeat(max_category_len + 10));

        for (category, count) in category_counts {
            println!(
                "{:<width$} | {} {}",
                category,
                count.to_string().green(),
                if *count == 1 { "file" } else { "files" },
                width = max_category_len
            );
        }

        println!("{}", "-".repeat(max_category_len + 10));
        println!(
            "{:<width$} | {} {}",
            "Total".bold(),
            total_files.to_string().green().bold(),
            if total_files == 1 { "file" } else { "files" },
            width = max_category_len
        );
    }
}
