//! Suggestion fetching, description enhancement, and admission of
//! suggested tasks into the store.
//!
//! Gateway failures never reach the caller as errors: a failed fetch reads
//! as no suggestions and a failed enhancement leaves the description as it
//! was.

use std::sync::Arc;

use mockable::Clock;
use tracing::{debug, warn};

use super::store::{StoreResult, TaskStore};
use crate::board::{
    domain::{NewTask, Task, TaskStatus},
    ports::{BlobStore, SuggestionGateway, SuggestionRecord},
};

const ENHANCEMENT_PREFIX: &str = "AI Suggestion: ";

/// Wraps a [`SuggestionGateway`] with the board's degradation rules.
#[derive(Debug)]
pub struct SuggestionService<G>
where
    G: SuggestionGateway,
{
    gateway: Arc<G>,
}

impl<G> Clone for SuggestionService<G>
where
    G: SuggestionGateway,
{
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
        }
    }
}

impl<G> SuggestionService<G>
where
    G: SuggestionGateway,
{
    /// Creates a service over `gateway`.
    #[must_use]
    pub const fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    /// Fetches suggestions for `context`; empty when the gateway fails.
    pub async fn fetch(&self, context: &str) -> Vec<SuggestionRecord> {
        match self.gateway.generate_suggestions(context).await {
            Ok(records) => {
                debug!(context, count = records.len(), "received suggestions");
                records
            }
            Err(err) => {
                warn!(context, error = %err, "suggestion fetch failed");
                Vec::new()
            }
        }
    }

    /// Appends an improvement hint to `description`.
    ///
    /// Returns the description unchanged when `title` is blank or the
    /// gateway fails.
    pub async fn enhance_description(
        &self,
        title: &str,
        description: Option<&str>,
    ) -> Option<String> {
        let unchanged = description.map(str::to_owned);
        if title.trim().is_empty() {
            return unchanged;
        }
        match self.gateway.improve_description(title, description).await {
            Ok(hint) => Some(match description.filter(|text| !text.is_empty()) {
                Some(existing) => format!("{existing}\n\n{ENHANCEMENT_PREFIX}{hint}"),
                None => format!("{ENHANCEMENT_PREFIX}{hint}"),
            }),
            Err(err) => {
                warn!(title, error = %err, "description enhancement failed");
                unchanged
            }
        }
    }

    /// Fetches follow-up actions for a completed task; empty on failure.
    pub async fn next_actions(&self, completed_title: &str) -> Vec<String> {
        self.gateway
            .suggest_next_actions(completed_title)
            .await
            .unwrap_or_else(|err| {
                warn!(completed_title, error = %err, "next action lookup failed");
                Vec::new()
            })
    }
}

/// Creates a `todo` task from a suggestion through the normal create path.
///
/// # Errors
///
/// Returns the store's validation error when the suggestion has a blank
/// title.
pub fn admit_suggestion<B, C>(
    store: &mut TaskStore<B, C>,
    record: &SuggestionRecord,
) -> StoreResult<Task>
where
    B: BlobStore,
    C: Clock + Send + Sync,
{
    let mut fields = NewTask::new(record.title.clone())
        .with_description(record.description.clone())
        .with_status(TaskStatus::Todo)
        .with_priority(record.priority)
        .with_tags(record.tags.iter().cloned());
    fields.estimated_time = record.estimated_time;
    store.create(fields)
}

/// Ticket identifying one suggestion request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SuggestionTicket(u64);

/// State of the suggestion list shown to the user.
///
/// Results arrive asynchronously. Each request is identified by a
/// [`SuggestionTicket`]; [`dismiss`](Self::dismiss) and newer requests
/// invalidate older tickets, so a response that arrives late is recognised
/// as stale and dropped. Suggestions not yet admitted stay in the list
/// across a dismiss, and reopening only fetches again once the list is
/// empty.
#[derive(Debug, Clone, Default)]
pub struct SuggestionPanel {
    generation: u64,
    open: bool,
    loading: bool,
    suggestions: Vec<SuggestionRecord>,
}

impl SuggestionPanel {
    /// Creates a closed panel.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shows the panel.
    ///
    /// Returns the ticket for a new request when the list is empty, or
    /// `None` when the suggestions kept from earlier are shown instead.
    pub fn open(&mut self) -> Option<SuggestionTicket> {
        self.open = true;
        if self.suggestions.is_empty() {
            return Some(self.refresh());
        }
        None
    }

    /// Discards the visible suggestions and starts a new request.
    pub fn refresh(&mut self) -> SuggestionTicket {
        self.generation = self.generation.saturating_add(1);
        self.open = true;
        self.loading = true;
        self.suggestions.clear();
        SuggestionTicket(self.generation)
    }

    /// Accepts results for `ticket`.
    ///
    /// Returns `false`, discarding the records, when the ticket is stale or
    /// the panel has been dismissed.
    pub fn deliver(&mut self, ticket: SuggestionTicket, records: Vec<SuggestionRecord>) -> bool {
        if !self.open || ticket.0 != self.generation {
            debug!(count = records.len(), "discarding stale suggestions");
            return false;
        }
        self.suggestions = records;
        self.loading = false;
        true
    }

    /// Hides the panel and invalidates any outstanding ticket.
    ///
    /// Suggestions already shown are kept for the next [`open`](Self::open).
    pub fn dismiss(&mut self) {
        self.generation = self.generation.saturating_add(1);
        self.open = false;
        self.loading = false;
    }

    /// Removes and returns the suggestion with `id`, typically after it
    /// has been admitted.
    pub fn take(&mut self, id: &str) -> Option<SuggestionRecord> {
        let index = self.suggestions.iter().position(|record| record.id == id)?;
        Some(self.suggestions.remove(index))
    }

    /// Returns the visible suggestions.
    #[must_use]
    pub fn suggestions(&self) -> &[SuggestionRecord] {
        &self.suggestions
    }

    /// Returns `true` while the panel is shown.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// Returns `true` while the panel awaits its results.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }
}
