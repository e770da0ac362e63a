//! leetboard-core - Core library for leetboard
//!
//! Provides models, store, analysis cache, and catalog/assistant clients for
//! tracking LeetCode practice.

pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod error;
pub mod event;
pub mod export;
pub mod history;
pub mod models;
pub mod preferences;
pub mod remote;
pub mod store;
pub mod sync;

pub use auth::AuthSession;
pub use cache::{AnalysisCache, ANALYSIS_VERSION};
pub use error::CoreError;
pub use event::{EventBus, StoreEvent};
pub use export::{export_problems_to_csv, export_problems_to_json};
pub use remote::RemoteStore;
pub use store::ProblemStore;
pub use sync::StoreWatcher;
