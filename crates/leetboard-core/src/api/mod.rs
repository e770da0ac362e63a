//! Clients for the consumed external services
//!
//! Two HTTP surfaces: the problem catalog (GraphQL) and the analysis
//! assistant (llama.cpp-server completion endpoint). Both normalize failures
//! into [`CoreError::ExternalApi`] with a message fit for direct display.

pub mod assistant;
pub mod leetcode;

pub use assistant::{AssistantClient, AssistantConfig};
pub use leetcode::{CatalogClient, CatalogProblem, DEFAULT_CATALOG_ENDPOINT};

use crate::error::CoreError;
use reqwest::StatusCode;

/// Fold an HTTP status into the message shown to the user
fn describe_status(status: StatusCode) -> String {
    match status.as_u16() {
        400 => "Bad query (400)".to_string(),
        404 => "Resource not found (404)".to_string(),
        429 => "Rate limited, wait before retrying (429)".to_string(),
        s if s >= 500 => format!("Server error ({})", s),
        s => format!("Unexpected response ({})", s),
    }
}

fn connectivity(service: &'static str, endpoint: &str, err: reqwest::Error) -> CoreError {
    CoreError::ExternalApi {
        service,
        message: format!("Cannot reach {}: {}", endpoint, err),
    }
}

fn bad_status(service: &'static str, status: StatusCode) -> CoreError {
    CoreError::ExternalApi {
        service,
        message: describe_status(status),
    }
}

fn bad_body(service: &'static str, err: impl std::fmt::Display) -> CoreError {
    CoreError::ExternalApi {
        service,
        message: format!("Unexpected response shape: {}", err),
    }
}
