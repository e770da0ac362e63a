//! Caching layer for leetboard-core
//!
//! Two-tier cache for AI problem analyses: a bounded in-memory tier over
//! the durable rows in the remote store.

pub mod analysis_cache;

pub use analysis_cache::{AnalysisCache, AnalysisCacheConfig, CacheStats, ANALYSIS_VERSION};
