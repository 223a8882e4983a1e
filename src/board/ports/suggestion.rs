//! Port for the external suggestion service.

use crate::board::domain::TaskPriority;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for suggestion gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Candidate task offered by the suggestion service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionRecord {
    /// Identifier scoped to the suggestion list, not a task identifier.
    pub id: String,
    /// Proposed task title.
    pub title: String,
    /// Proposed task description.
    pub description: String,
    /// Proposed priority.
    pub priority: TaskPriority,
    /// Proposed estimate in minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_time: Option<u32>,
    /// Proposed tags.
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Source of suggested tasks and description improvements.
///
/// Calls may take noticeable time. Callers drop a result they no longer
/// want; there is no cancellation handle.
#[async_trait]
pub trait SuggestionGateway: Send + Sync {
    /// Returns candidate tasks for the given free-text context.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] when the backend cannot produce suggestions.
    async fn generate_suggestions(&self, context: &str) -> GatewayResult<Vec<SuggestionRecord>>;

    /// Returns an improvement hint for a task description.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] when the backend cannot produce a hint.
    async fn improve_description(
        &self,
        title: &str,
        description: Option<&str>,
    ) -> GatewayResult<String>;

    /// Returns follow-up actions for a task that was just completed.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] when the backend cannot produce actions.
    async fn suggest_next_actions(&self, completed_title: &str) -> GatewayResult<Vec<String>>;
}

/// Errors returned by suggestion gateway implementations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GatewayError {
    /// The backend could not be reached or refused the request.
    #[error("suggestion backend unavailable: {0}")]
    Unavailable(String),

    /// The backend produced output that could not be rendered.
    #[error("suggestion rendering failed: {0}")]
    Render(String),
}
