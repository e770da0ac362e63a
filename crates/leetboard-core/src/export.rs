//! Export functionality for the problem list
//!
//! Renders the current list to CSV or JSON for backup and interchange.

use anyhow::{Context, Result};
use serde_json::json;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use crate::models::{Problem, UserStats};

/// Export problems to CSV format matching the list display
///
/// The first line is a `#` summary comment, then the header row. Rows keep
/// the caller's ordering.
///
/// # Arguments
/// * `problems` - Problems to export
/// * `stats` - Current stats snapshot for the summary line
/// * `path` - Where to write; an existing file is replaced
///
/// # Errors
/// Fails when the file cannot be created or written
///
/// # Examples
///
/// ```no_run
/// use leetboard_core::export::export_problems_to_csv;
/// use leetboard_core::models::UserStats;
/// use std::path::Path;
///
/// let problems = vec![]; // Load problems
/// let stats = UserStats::default();
/// export_problems_to_csv(&problems, &stats, Path::new("problems.csv")).unwrap();
/// ```
pub fn export_problems_to_csv(
    problems: &[Arc<Problem>],
    stats: &UserStats,
    path: &Path,
) -> Result<()> {
    // Missing parent directories are created
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let file = File::create(path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;

    let mut writer = BufWriter::new(file);

    writeln!(
        writer,
        "# leetboard export: {} problems, {} solved, streak {} days",
        stats.total, stats.solved, stats.streak
    )
    .context("Failed to write CSV summary")?;

    writeln!(
        writer,
        "ID,LeetCode ID,Title,Difficulty,Status,Tags,Companies,Attempts,Time (min),Notes,Created,Updated,Solved"
    )
    .context("Failed to write CSV header")?;

    for problem in problems {
        let solved = problem
            .solved_at
            .map(|ts| ts.format("%Y-%m-%d").to_string())
            .unwrap_or_default();

        writeln!(
            writer,
            "\"{}\",{},\"{}\",\"{}\",\"{}\",\"{}\",\"{}\",{},{},\"{}\",\"{}\",\"{}\",\"{}\"",
            problem.id,
            problem.leetcode_id,
            csv_escape(&problem.title),
            problem.difficulty,
            problem.status,
            csv_escape(&problem.tags.join(";")),
            csv_escape(&problem.companies.join(";")),
            problem.attempts,
            problem.time_spent_minutes,
            csv_escape(&problem.notes),
            problem.created_at.format("%Y-%m-%d"),
            problem.updated_at.format("%Y-%m-%d"),
            solved
        )
        .with_context(|| format!("Failed to write row for problem {}", problem.id))?;
    }

    writer.flush().context("Failed to flush CSV writer")?;

    Ok(())
}

/// Export problems to JSON format
///
/// Pretty-printed object carrying the export time, the stats snapshot, and
/// the full problem records (audit trails included).
pub fn export_problems_to_json(
    problems: &[Arc<Problem>],
    stats: &UserStats,
    path: &Path,
) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let problems_ref: Vec<&Problem> = problems.iter().map(|p| p.as_ref()).collect();

    let document = json!({
        "exportedAt": chrono::Utc::now(),
        "stats": stats,
        "problems": problems_ref,
    });

    let json = serde_json::to_string_pretty(&document)
        .context("Failed to serialize problems to JSON")?;

    std::fs::write(path, json)
        .with_context(|| format!("Failed to write JSON file: {}", path.display()))?;

    Ok(())
}

/// Escape a value for a double-quoted CSV field
fn csv_escape(s: &str) -> String {
    s.replace('"', "\"\"")
}
