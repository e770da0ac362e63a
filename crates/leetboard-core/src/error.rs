//! Error types for leetboard-core
//!
//! Provides the error hierarchy with thiserror for graceful degradation.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for leetboard operations
#[derive(Error, Debug)]
pub enum CoreError {
    // ===================
    // Identity Errors
    // ===================
    #[error("Not signed in: {operation} requires an authenticated user")]
    NotAuthenticated { operation: String },

    // ===================
    // Lookup Errors
    // ===================
    #[error("Problem not found: {id}")]
    ProblemNotFound { id: String },

    #[error("Analysis not found: {id}")]
    AnalysisNotFound { id: String },

    // ===================
    // Remote Store Errors
    // ===================
    #[error("Failed to read from '{collection}' collection")]
    RemoteRead {
        collection: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Failed to write to '{collection}' collection")]
    RemoteWrite {
        collection: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Failed to open problem store: {path}")]
    StoreOpen {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    // ===================
    // Codec Errors
    // ===================
    #[error("Failed to encode/decode {what}")]
    Codec {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    // ===================
    // External API Errors
    // ===================
    #[error("{service}: {message}")]
    ExternalApi {
        service: &'static str,
        message: String,
    },

    // ===================
    // IO Errors
    // ===================
    #[error("IO error on {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CoreError {
    /// True for failures worth retrying as-is (network hiccups, busy remote).
    ///
    /// The library never retries on its own; callers surface these as
    /// transient and let the user try again.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CoreError::ExternalApi { .. } | CoreError::RemoteWrite { .. }
        )
    }

    /// True for failures that read paths swallow: the caller keeps its last
    /// good snapshot (or empty state) instead of propagating.
    pub fn is_degradable(&self) -> bool {
        matches!(self, CoreError::RemoteRead { .. })
    }
}
