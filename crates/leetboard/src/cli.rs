//! CLI helpers for problem display and selection
//!
//! Query helpers, table/detail formatters, and the selector resolution used
//! by most subcommands.

use comfy_table::{Cell, Color, ContentArrangement, Row, Table};
use leetboard_core::api::CatalogProblem;
use leetboard_core::models::{CachedAnalysis, Difficulty, Problem, Status, UserStats};
use leetboard_core::preferences::ViewPreferences;
use leetboard_core::StoreEvent;
use std::sync::Arc;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug)]
pub enum CliError {
    NoMatch {
        selector: String,
        scanned: usize,
    },
    AmbiguousSelector {
        selector: String,
        count: usize,
        suggestions: String,
    },
    Core(leetboard_core::error::CoreError),
    Other(anyhow::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::NoMatch { selector, scanned } => {
                write!(
                    f,
                    "No problem matches '{}' ({} problems scanned)",
                    selector, scanned
                )
            }
            CliError::AmbiguousSelector {
                selector,
                count,
                suggestions,
            } => {
                write!(
                    f,
                    "Ambiguous selector '{}': matches {} problems\n{}",
                    selector, count, suggestions
                )
            }
            CliError::Core(e) => write!(f, "{}", e),
            CliError::Other(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CliError {}

impl From<leetboard_core::error::CoreError> for CliError {
    fn from(e: leetboard_core::error::CoreError) -> Self {
        CliError::Core(e)
    }
}

impl From<anyhow::Error> for CliError {
    fn from(e: anyhow::Error) -> Self {
        CliError::Other(e)
    }
}

// ============================================================================
// Query Helpers
// ============================================================================

/// Resolve a problem selector: exact id, id prefix (min 8 chars), or
/// numeric catalog id.
pub fn find_problem(
    problems: &[Arc<Problem>],
    selector: &str,
) -> Result<Arc<Problem>, CliError> {
    // Exact id wins
    if let Some(problem) = problems.iter().find(|p| p.id.as_str() == selector) {
        return Ok(Arc::clone(problem));
    }

    // Prefix match needs at least 8 chars
    if selector.len() >= 8 {
        let matches: Vec<_> = problems
            .iter()
            .filter(|p| p.id.as_str().starts_with(selector))
            .collect();

        match matches.len() {
            0 => {}
            1 => return Ok(Arc::clone(matches[0])),
            count => {
                return Err(CliError::AmbiguousSelector {
                    selector: selector.to_string(),
                    count,
                    suggestions: suggest(&matches),
                })
            }
        }
    }

    // Fall back to the numeric catalog id (0 marks manual drafts, never a key)
    if let Ok(id) = selector.parse::<u32>() {
        if id > 0 {
            let matches: Vec<_> = problems.iter().filter(|p| p.leetcode_id == id).collect();
            match matches.len() {
                0 => {}
                1 => return Ok(Arc::clone(matches[0])),
                count => {
                    return Err(CliError::AmbiguousSelector {
                        selector: selector.to_string(),
                        count,
                        suggestions: suggest(&matches),
                    })
                }
            }
        }
    }

    Err(CliError::NoMatch {
        selector: selector.to_string(),
        scanned: problems.len(),
    })
}

fn suggest(matches: &[&Arc<Problem>]) -> String {
    matches
        .iter()
        .take(5)
        .map(|p| {
            format!(
                "  - {}  {}",
                &p.id.as_str()[..8.min(p.id.as_str().len())],
                truncate(&p.title, 40)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Apply the list filters; all filters are conjunctive
pub fn filter_problems(
    problems: &[Arc<Problem>],
    status: Option<Status>,
    difficulty: Option<Difficulty>,
    tag: Option<&str>,
    company: Option<&str>,
) -> Vec<Arc<Problem>> {
    problems
        .iter()
        .filter(|p| status.map_or(true, |s| p.status == s))
        .filter(|p| difficulty.map_or(true, |d| p.difficulty == d))
        .filter(|p| {
            tag.map_or(true, |t| {
                p.tags.iter().any(|have| have.eq_ignore_ascii_case(t))
            })
        })
        .filter(|p| {
            company.map_or(true, |c| {
                p.companies.iter().any(|have| have.eq_ignore_ascii_case(c))
            })
        })
        .cloned()
        .collect()
}

// ============================================================================
// Formatters
// ============================================================================

/// Format problems as table (human) or JSON
pub fn format_problem_table(
    problems: &[Arc<Problem>],
    prefs: &ViewPreferences,
    json: bool,
    no_color: bool,
) -> String {
    if json {
        return serde_json::to_string_pretty(problems).unwrap_or_else(|_| "[]".to_string());
    }

    if problems.is_empty() {
        return "No problems found.".to_string();
    }

    let columns = prefs.visible_columns();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    if no_color {
        table.set_header(columns.iter().map(|key| column_header(key)).collect::<Vec<_>>());
    } else {
        table.set_header(
            columns
                .iter()
                .map(|key| Cell::new(column_header(key)).fg(Color::Cyan))
                .collect::<Vec<_>>(),
        );
    }

    for problem in problems {
        let cells: Vec<Cell> = columns
            .iter()
            .map(|key| column_cell(key, problem, no_color))
            .collect();
        table.add_row(Row::from(cells));
    }

    table.to_string()
}

fn column_header(key: &str) -> &'static str {
    match key {
        "id" => "ID",
        "title" => "Title",
        "difficulty" => "Difficulty",
        "status" => "Status",
        "tags" => "Tags",
        "companies" => "Companies",
        "attempts" => "Attempts",
        "time" => "Time",
        "updated" => "Updated",
        _ => "?",
    }
}

fn column_cell(key: &str, problem: &Problem, no_color: bool) -> Cell {
    match key {
        "id" => {
            let id = problem.id.as_str();
            Cell::new(&id[..8.min(id.len())])
        }
        "title" => {
            let title = if problem.leetcode_id > 0 {
                format!("#{} {}", problem.leetcode_id, problem.title)
            } else {
                problem.title.clone()
            };
            Cell::new(truncate(&title, 40))
        }
        "difficulty" => {
            let cell = Cell::new(problem.difficulty.as_str());
            if no_color {
                cell
            } else {
                cell.fg(difficulty_color(problem.difficulty))
            }
        }
        "status" => {
            let cell = Cell::new(problem.status.label());
            if no_color {
                cell
            } else {
                cell.fg(status_color(problem.status))
            }
        }
        "tags" => Cell::new(truncate(&problem.tags.join(", "), 30)),
        "companies" => Cell::new(truncate(&problem.companies.join(", "), 30)),
        "attempts" => Cell::new(problem.attempts.to_string()),
        "time" => Cell::new(format_minutes(problem.time_spent_minutes)),
        "updated" => Cell::new(problem.updated_at.format("%Y-%m-%d %H:%M").to_string()),
        _ => Cell::new(""),
    }
}

fn difficulty_color(difficulty: Difficulty) -> Color {
    match difficulty {
        Difficulty::Easy => Color::Green,
        Difficulty::Medium => Color::Yellow,
        Difficulty::Hard => Color::Red,
    }
}

fn status_color(status: Status) -> Color {
    match status {
        Status::NotAttempted => Color::Grey,
        Status::Attempted => Color::Yellow,
        Status::Solved => Color::Green,
        Status::Reviewed => Color::Blue,
    }
}

/// Format single problem detail with its audit trail (human or JSON)
pub fn format_problem_detail(problem: &Problem, json: bool) -> String {
    if json {
        return serde_json::to_string_pretty(problem).unwrap_or_else(|_| "{}".to_string());
    }

    let mut lines = vec![];
    lines.push(format!("Problem ID:       {}", problem.id));
    lines.push(format!(
        "Catalog ID:       {}",
        if problem.leetcode_id > 0 {
            format!("#{}", problem.leetcode_id)
        } else {
            "-".to_string()
        }
    ));
    lines.push(format!("Title:            {}", problem.title));
    lines.push(format!(
        "URL:              {}",
        problem.url().as_deref().unwrap_or("-")
    ));
    lines.push(format!("Difficulty:       {}", problem.difficulty));
    lines.push(format!("Status:           {}", problem.status));
    lines.push(format!(
        "Tags:             {}",
        if problem.tags.is_empty() {
            "-".to_string()
        } else {
            problem.tags.join(", ")
        }
    ));
    lines.push(format!(
        "Companies:        {}",
        if problem.companies.is_empty() {
            "-".to_string()
        } else {
            problem.companies.join(", ")
        }
    ));
    lines.push(format!("Attempts:         {}", problem.attempts));
    lines.push(format!(
        "Time spent:       {}",
        format_minutes(problem.time_spent_minutes)
    ));
    lines.push(format!("Created:          {}", problem.created_at.to_rfc3339()));
    lines.push(format!("Updated:          {}", problem.updated_at.to_rfc3339()));
    lines.push(format!(
        "First attempt:    {}",
        problem
            .first_attempt_at
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| "-".to_string())
    ));
    lines.push(format!(
        "Last attempt:     {}",
        problem
            .last_attempt_at
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| "-".to_string())
    ));
    lines.push(format!(
        "First solved:     {}",
        problem
            .first_solved_at
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| "-".to_string())
    ));
    lines.push(format!(
        "Solved:           {}",
        problem
            .solved_at
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| "-".to_string())
    ));

    if !problem.notes.is_empty() {
        lines.push(String::new());
        lines.push("Notes:".to_string());
        for note_line in problem.notes.lines() {
            lines.push(format!("  {}", note_line));
        }
    }

    lines.push(String::new());
    lines.push(format!("History ({} entries):", problem.actions.len()));
    for action in &problem.actions {
        let mut entry = format!(
            "  {}  {}",
            action.timestamp.format("%Y-%m-%d %H:%M"),
            action.description
        );
        if let (Some(old), Some(new)) = (&action.old_value, &action.new_value) {
            entry.push_str(&format!(" ({} -> {})", old, new));
        }
        lines.push(entry);
    }

    lines.join("\n")
}

/// Format catalog search results (human) or JSON
pub fn format_catalog_table(
    results: &[CatalogProblem],
    json: bool,
    no_color: bool,
) -> String {
    if json {
        return serde_json::to_string_pretty(results).unwrap_or_else(|_| "[]".to_string());
    }

    if results.is_empty() {
        return "No catalog matches.".to_string();
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    if no_color {
        table.set_header(vec!["ID", "Title", "Difficulty", "Slug", "Tags"]);
    } else {
        table.set_header(vec![
            Cell::new("ID").fg(Color::Cyan),
            Cell::new("Title").fg(Color::Cyan),
            Cell::new("Difficulty").fg(Color::Cyan),
            Cell::new("Slug").fg(Color::Cyan),
            Cell::new("Tags").fg(Color::Cyan),
        ]);
    }

    for result in results {
        let difficulty = Cell::new(result.difficulty.as_str());
        let difficulty = if no_color {
            difficulty
        } else {
            difficulty.fg(difficulty_color(result.difficulty))
        };
        table.add_row(Row::from(vec![
            Cell::new(result.leetcode_id.to_string()),
            Cell::new(truncate(&result.title, 40)),
            difficulty,
            Cell::new(result.title_slug.as_deref().unwrap_or("-")),
            Cell::new(truncate(&result.tags.join(", "), 30)),
        ]));
    }

    table.to_string()
}

/// Format a cached analysis (human or JSON)
///
/// The human form renders the structured sections the assistant is asked
/// for; unknown or missing sections are simply skipped.
pub fn format_analysis(cached: &CachedAnalysis, json: bool) -> String {
    if json {
        return serde_json::to_string_pretty(cached).unwrap_or_else(|_| "{}".to_string());
    }

    let mut lines = vec![];
    lines.push(format!(
        "Analysis: {} ({}, updated {})",
        cached.title.as_deref().unwrap_or("untitled"),
        cached.version,
        cached.updated_at.format("%Y-%m-%d %H:%M")
    ));
    lines.push(String::new());

    let body = &cached.analysis;
    if let Some(summary) = body["summary"].as_str() {
        lines.push(format!("Summary:    {}", summary));
    }
    if let Some(approach) = body["approach"].as_str() {
        lines.push(format!("Approach:   {}", approach));
    }
    let time = body["complexity"]["time"].as_str();
    let space = body["complexity"]["space"].as_str();
    if time.is_some() || space.is_some() {
        lines.push(format!(
            "Complexity: time {}, space {}",
            time.unwrap_or("?"),
            space.unwrap_or("?")
        ));
    }
    if let Some(pitfalls) = body["pitfalls"].as_array() {
        if !pitfalls.is_empty() {
            lines.push("Pitfalls:".to_string());
            for pitfall in pitfalls {
                if let Some(text) = pitfall.as_str() {
                    lines.push(format!("  - {}", text));
                }
            }
        }
    }

    // Fall back to raw JSON when none of the known sections are present
    if lines.len() == 2 {
        lines.push(serde_json::to_string_pretty(body).unwrap_or_else(|_| "{}".to_string()));
    }

    lines.join("\n")
}

/// Format per-user stats for the `stats` subcommand (human form)
pub fn format_stats(stats: &UserStats) -> String {
    let mut lines = vec![];
    lines.push(format!("Problems tracked: {}", stats.total));
    lines.push(format!(
        "Solved:           {} (easy {}, medium {}, hard {})",
        stats.solved, stats.easy_solved, stats.medium_solved, stats.hard_solved
    ));
    lines.push(format!("In progress:      {}", stats.attempted));
    lines.push(format!(
        "Time invested:    {}",
        format_minutes_u64(stats.total_time_minutes)
    ));
    lines.push(format!(
        "Streak:           {} day{}",
        stats.streak,
        if stats.streak == 1 { "" } else { "s" }
    ));
    lines.push(format!(
        "Last active:      {}",
        stats
            .last_active
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string())
    ));
    lines.join("\n")
}

/// One line per store event, for the `watch` subcommand
pub fn describe_event(event: &StoreEvent) -> String {
    match event {
        StoreEvent::ProblemAdded(id) => {
            format!("problem added    {}", short_id(id.as_str()))
        }
        StoreEvent::ProblemUpdated(id) => {
            format!("problem updated  {}", short_id(id.as_str()))
        }
        StoreEvent::ProblemDeleted(id) => {
            format!("problem deleted  {}", short_id(id.as_str()))
        }
        StoreEvent::ProblemsReloaded => "problem list reloaded".to_string(),
        StoreEvent::StatsUpdated => "stats recomputed".to_string(),
        StoreEvent::UserChanged(Some(user)) => format!("signed in as {}", user),
        StoreEvent::UserChanged(None) => "signed out".to_string(),
        StoreEvent::SyncError(message) => format!("sync error: {}", message),
    }
}

fn short_id(id: &str) -> &str {
    &id[..8.min(id.len())]
}

// ============================================================================
// Utilities
// ============================================================================

fn truncate(s: &str, max: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max {
        s.to_string()
    } else {
        // Char-based truncation to avoid panicking on multi-byte characters
        s.chars().take(max - 1).collect::<String>() + "…"
    }
}

pub fn format_minutes(minutes: u32) -> String {
    format_minutes_u64(u64::from(minutes))
}

fn format_minutes_u64(minutes: u64) -> String {
    if minutes >= 60 {
        let hours = minutes / 60;
        let rest = minutes % 60;
        if rest == 0 {
            format!("{}h", hours)
        } else {
            format!("{}h {}m", hours, rest)
        }
    } else {
        format!("{}m", minutes)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use leetboard_core::models::{ProblemId, UserId};
    use serde_json::json;

    fn create_test_problem(id: &str, leetcode_id: u32, title: &str) -> Arc<Problem> {
        let now = Utc.with_ymd_and_hms(2026, 5, 1, 9, 0, 0).unwrap();
        Arc::new(Problem {
            id: ProblemId::from(id),
            user_id: UserId::from("u1"),
            leetcode_id,
            title: title.to_string(),
            title_slug: None,
            difficulty: Difficulty::Medium,
            status: Status::NotAttempted,
            tags: vec!["array".to_string()],
            companies: vec![],
            notes: String::new(),
            attempts: 0,
            time_spent_minutes: 0,
            created_at: now,
            updated_at: now,
            first_attempt_at: None,
            last_attempt_at: None,
            first_solved_at: None,
            solved_at: None,
            actions: vec![],
        })
    }

    #[test]
    fn test_find_by_exact_id() {
        let problems = vec![
            create_test_problem("abc123def456", 1, "Two Sum"),
            create_test_problem("xyz789ghi012", 2, "Add Two Numbers"),
        ];

        let found = find_problem(&problems, "abc123def456").unwrap();
        assert_eq!(found.title, "Two Sum");
    }

    #[test]
    fn test_find_by_prefix() {
        let problems = vec![
            create_test_problem("abc123def456", 1, "Two Sum"),
            create_test_problem("xyz789ghi012", 2, "Add Two Numbers"),
        ];

        let found = find_problem(&problems, "abc123de").unwrap();
        assert_eq!(found.title, "Two Sum");
    }

    #[test]
    fn test_find_short_prefix_falls_through() {
        let problems = vec![
            create_test_problem("abc123de", 1, "Two Sum"),
            create_test_problem("abc123dx", 2, "Add Two Numbers"),
        ];

        // Under 8 chars the prefix rule does not apply and 'abc123d' is not
        // numeric either
        let result = find_problem(&problems, "abc123d");
        assert!(matches!(result, Err(CliError::NoMatch { .. })));
    }

    #[test]
    fn test_find_ambiguous_prefix_lists_suggestions() {
        let problems = vec![
            create_test_problem("abc123def456", 1, "Two Sum"),
            create_test_problem("abc123def999", 2, "Add Two Numbers"),
        ];

        let result = find_problem(&problems, "abc123def");
        match result {
            Err(CliError::AmbiguousSelector {
                count, suggestions, ..
            }) => {
                assert_eq!(count, 2);
                assert!(suggestions.contains("Two Sum"));
            }
            other => panic!("unexpected result: {:?}", other.map(|p| p.title.clone())),
        }
    }

    #[test]
    fn test_find_by_catalog_id() {
        let problems = vec![
            create_test_problem("abc123def456", 1, "Two Sum"),
            create_test_problem("xyz789ghi012", 200, "Number of Islands"),
        ];

        let found = find_problem(&problems, "200").unwrap();
        assert_eq!(found.title, "Number of Islands");
    }

    #[test]
    fn test_find_catalog_id_zero_never_matches() {
        let problems = vec![create_test_problem("abc123def456", 0, "Manual Draft")];

        let result = find_problem(&problems, "0");
        assert!(matches!(result, Err(CliError::NoMatch { .. })));
    }

    #[test]
    fn test_filter_by_status_and_tag() {
        let mut solved = (*create_test_problem("a1", 1, "Two Sum")).clone();
        solved.status = Status::Solved;
        let problems = vec![
            Arc::new(solved),
            create_test_problem("b2", 2, "Add Two Numbers"),
        ];

        let filtered = filter_problems(&problems, Some(Status::Solved), None, None, None);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].title, "Two Sum");

        let filtered = filter_problems(&problems, None, None, Some("ARRAY"), None);
        assert_eq!(filtered.len(), 2);

        let filtered = filter_problems(&problems, None, None, Some("graph"), None);
        assert!(filtered.is_empty());
    }

    #[test]
    fn test_format_table_empty() {
        let output = format_problem_table(&[], &ViewPreferences::default(), false, false);
        assert!(output.contains("No problems found"));
    }

    #[test]
    fn test_format_table_json() {
        let problems = vec![create_test_problem("abc123def456", 1, "Two Sum")];
        let output = format_problem_table(&problems, &ViewPreferences::default(), true, false);
        assert!(output.starts_with('['));
        assert!(output.contains("Two Sum"));
    }

    #[test]
    fn test_format_table_respects_columns() {
        let problems = vec![create_test_problem("abc123def456", 1, "Two Sum")];
        let mut prefs = ViewPreferences::default();
        prefs.set_visible_columns(&["title".to_string(), "status".to_string()]);

        let output = format_problem_table(&problems, &prefs, false, true);
        assert!(output.contains("Title"));
        assert!(output.contains("Status"));
        assert!(!output.contains("Difficulty"));
    }

    #[test]
    fn test_format_detail_lists_history() {
        let mut problem = (*create_test_problem("abc123def456", 1, "Two Sum")).clone();
        problem.actions = vec![leetboard_core::history::record_created(&UserId::from("u1"))];

        let output = format_problem_detail(&problem, false);
        assert!(output.contains("Problem ID:       abc123def456"));
        assert!(output.contains("History (1 entries):"));
        assert!(output.contains("Problem created"));
    }

    #[test]
    fn test_format_detail_json() {
        let problem = create_test_problem("abc123def456", 1, "Two Sum");
        let output = format_problem_detail(&problem, true);
        assert!(output.starts_with('{'));
        assert!(output.contains("abc123def456"));
    }

    #[test]
    fn test_format_catalog_table() {
        let results = vec![CatalogProblem {
            leetcode_id: 1,
            title: "Two Sum".to_string(),
            title_slug: Some("two-sum".to_string()),
            difficulty: Difficulty::Easy,
            tags: vec!["array".to_string()],
        }];

        let output = format_catalog_table(&results, false, true);
        assert!(output.contains("Two Sum"));
        assert!(output.contains("two-sum"));

        let output = format_catalog_table(&[], false, true);
        assert!(output.contains("No catalog matches"));
    }

    #[test]
    fn test_format_analysis_sections() {
        let now = Utc.with_ymd_and_hms(2026, 5, 1, 9, 0, 0).unwrap();
        let cached = CachedAnalysis {
            id: leetboard_core::models::AnalysisId::from("a1"),
            user_id: UserId::from("u1"),
            problem_id: 1,
            title_slug: Some("two-sum".to_string()),
            title: Some("Two Sum".to_string()),
            version: "v2".to_string(),
            analysis: json!({
                "summary": "Find two indices summing to target",
                "approach": "One-pass hash map",
                "complexity": {"time": "O(n)", "space": "O(n)"},
                "pitfalls": ["Same element used twice"],
            }),
            created_at: now,
            updated_at: now,
        };

        let output = format_analysis(&cached, false);
        assert!(output.contains("Two Sum"));
        assert!(output.contains("One-pass hash map"));
        assert!(output.contains("time O(n), space O(n)"));
        assert!(output.contains("- Same element used twice"));
    }

    #[test]
    fn test_format_analysis_unknown_shape_dumps_json() {
        let now = Utc::now();
        let cached = CachedAnalysis {
            id: leetboard_core::models::AnalysisId::from("a1"),
            user_id: UserId::from("u1"),
            problem_id: 1,
            title_slug: None,
            title: None,
            version: "v2".to_string(),
            analysis: json!({"freeform": "text"}),
            created_at: now,
            updated_at: now,
        };

        let output = format_analysis(&cached, false);
        assert!(output.contains("freeform"));
    }

    #[test]
    fn test_describe_event_lines() {
        let added = StoreEvent::ProblemAdded(ProblemId::from("abc123def456"));
        assert_eq!(describe_event(&added), "problem added    abc123de");
        assert_eq!(describe_event(&StoreEvent::StatsUpdated), "stats recomputed");
        assert_eq!(
            describe_event(&StoreEvent::UserChanged(None)),
            "signed out"
        );
    }

    #[test]
    fn test_truncate_ascii() {
        assert_eq!(truncate("hello world", 20), "hello world");
        assert_eq!(truncate("hello world", 5), "hell…");
        assert_eq!(truncate("hello", 5), "hello");
    }

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate("café", 10), "café");
        assert_eq!(truncate("café", 3), "ca…");
        assert_eq!(truncate("二分探索テスト", 4), "二分探…");
    }

    #[test]
    fn test_format_minutes() {
        assert_eq!(format_minutes(0), "0m");
        assert_eq!(format_minutes(45), "45m");
        assert_eq!(format_minutes(60), "1h");
        assert_eq!(format_minutes(85), "1h 25m");
    }
}
