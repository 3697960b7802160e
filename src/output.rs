//! Output formatting and styling module.
//!
//! Renders the end-of-run summary on the console with colors. Per-file
//! progress goes through the [`crate::logging`] layer instead.

use crate::file_organizer::OrganizeReport;
use colored::*;
use std::collections::BTreeMap;

/// Manages console output with consistent styling and formatting.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Prints a dry-run notice message.
    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }

    /// Prints the summary of an organization run.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use dirsort::config::CategoryMap;
    /// use dirsort::file_category::ExtensionIndex;
    /// use dirsort::file_organizer::{FileOrganizer, ProtectedNames};
    /// use dirsort::output::OutputFormatter;
    /// use std::path::Path;
    ///
    /// let map = CategoryMap::from_pairs([("Images", vec![".png"])]).unwrap();
    /// let index = ExtensionIndex::build(&map);
    /// let protected = ProtectedNames::new(&map);
    /// let report = FileOrganizer::new(&index, &protected, false)
    ///     .organize(Path::new("/path/to/downloads"))
    ///     .unwrap();
    /// OutputFormatter::report(&report);
    /// ```
    pub fn report(report: &OrganizeReport) {
        Self::summary_table(&report.category_counts(), report.moved);

        if report.skipped > 0 {
            Self::warning(&format!(
                "{} {} could not be organized, see the log for details",
                report.skipped,
                if report.skipped == 1 { "file" } else { "files" }
            ));
        }

        if report.dry_run {
            Self::dry_run_notice("No files were modified.");
        } else if report.moved > 0 {
            Self::success(&format!(
                "Organized {} {} (started {})",
                report.moved,
                if report.moved == 1 { "file" } else { "files" },
                report.started_at.format("%Y-%m-%d %H:%M:%S")
            ));
        }
    }

    /// Prints a summary table with file statistics by category.
    ///
    /// # Arguments
    ///
    /// * `category_counts` - Category names mapped to file counts
    /// * `total_files` - Total number of files organized
    pub fn summary_table(category_counts: &BTreeMap<String, usize>, total_files: usize) {
        Self::header("SUMMARY");

        // Calculate column widths
        let max_category_len = category_counts
            .keys()
            .map(|name| name.len())
            .max()
            .unwrap_or(0)
            .max(8); // At least "Category" width

        println!(
            "{:<width$} | {}",
            "Category".bold(),
            "Files".bold(),
            width = max_category_len
        );
        println!("{}", "-".repeat(max_category_len + 10));

        for (category, count) in category_counts {
            let file_word = if *count == 1 { "file" } else { "files" };
            println!(
                "{:<width$} | {} {}",
                category,
                count.to_string().green(),
                file_word,
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
