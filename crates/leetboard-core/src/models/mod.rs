//! Data models shared across the crate

mod action;
mod analysis;
mod problem;
mod stats;

pub use action::{Action, ActionKind};
pub use analysis::{AnalysisId, CachedAnalysis};
pub use problem::{
    Difficulty, Problem, ProblemDraft, ProblemId, ProblemPatch, Status, UserId,
    UNTITLED_PLACEHOLDER,
};
pub use stats::UserStats;
