//! Session composition root.
//!
//! A [`Board`] owns everything one user session needs: the task store, the
//! drag resolver, the suggestion service with its panel, and the current
//! filter query. Nothing here is global; two boards over different blob keys
//! are fully independent.

use std::fmt;
use std::sync::Arc;

use mockable::Clock;
use thiserror::Error;
use tracing::info;

use crate::board::{
    adapters::{fs::DirBlobStore, mock::MockSuggestionGateway},
    domain::{Task, TaskId, TaskStatus},
    ports::{BlobStore, BlobStoreError, GatewayError, SuggestionGateway, SuggestionRecord},
    services::{
        BoardQuery, BoardView, DropTarget, GestureOutcome, GestureState, ReorderResolver,
        StoreResult, SuggestionPanel, SuggestionService, SuggestionTicket, TaskPersistence, TaskStore,
        admit_suggestion, project,
    },
};
use crate::config::{BoardConfig, ConfigError};

/// Errors raised while assembling a board.
#[derive(Debug, Error)]
pub enum BoardError {
    /// Configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The storage directory could not be opened.
    #[error(transparent)]
    Storage(#[from] BlobStoreError),

    /// The suggestion gateway could not be built.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// One task board session.
pub struct Board<B, G, C>
where
    B: BlobStore,
    G: SuggestionGateway,
    C: Clock + Send + Sync,
{
    store: TaskStore<B, C>,
    resolver: ReorderResolver,
    suggestions: SuggestionService<G>,
    panel: SuggestionPanel,
    query: BoardQuery,
    clock: Arc<C>,
    context: String,
}

impl<B, G, C> fmt::Debug for Board<B, G, C>
where
    B: BlobStore,
    G: SuggestionGateway,
    C: Clock + Send + Sync,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Board")
            .field("store", &self.store)
            .field("gesture", self.resolver.state())
            .field("panel", &self.panel)
            .field("query", &self.query)
            .finish_non_exhaustive()
    }
}

impl<C> Board<DirBlobStore, MockSuggestionGateway, C>
where
    C: Clock + Send + Sync,
{
    /// Opens a board stored on disk as described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Config`] for invalid settings,
    /// [`BoardError::Storage`] when the data directory cannot be opened, and
    /// [`BoardError::Gateway`] when the suggestion templates fail to load.
    pub fn open(config: &BoardConfig, clock: Arc<C>) -> Result<Self, BoardError> {
        let key = config.validate()?;
        let blobs = Arc::new(DirBlobStore::open(config.data_dir())?);
        let gateway = Arc::new(MockSuggestionGateway::new(config.suggestions.latency())?);
        let store = TaskStore::open(TaskPersistence::new(blobs, key), Arc::clone(&clock));
        info!(
            data_dir = %config.data_dir(),
            tasks = store.tasks().len(),
            "opened task board"
        );
        Ok(Self::new(
            store,
            gateway,
            clock,
            config.suggestions.context.clone(),
        ))
    }
}

impl<B, G, C> Board<B, G, C>
where
    B: BlobStore,
    G: SuggestionGateway,
    C: Clock + Send + Sync,
{
    /// Assembles a board from already constructed parts.
    #[must_use]
    pub fn new(
        store: TaskStore<B, C>,
        gateway: Arc<G>,
        clock: Arc<C>,
        context: impl Into<String>,
    ) -> Self {
        Self {
            store,
            resolver: ReorderResolver::new(),
            suggestions: SuggestionService::new(gateway),
            panel: SuggestionPanel::new(),
            query: BoardQuery::new(),
            clock,
            context: context.into(),
        }
    }

    /// Returns the task store.
    #[must_use]
    pub const fn store(&self) -> &TaskStore<B, C> {
        &self.store
    }

    /// Returns the task store for direct mutation.
    pub const fn store_mut(&mut self) -> &mut TaskStore<B, C> {
        &mut self.store
    }

    /// Returns the active filter query.
    #[must_use]
    pub const fn query(&self) -> &BoardQuery {
        &self.query
    }

    /// Returns the filter query for editing.
    pub const fn query_mut(&mut self) -> &mut BoardQuery {
        &mut self.query
    }

    /// Returns the suggestion panel.
    #[must_use]
    pub const fn panel(&self) -> &SuggestionPanel {
        &self.panel
    }

    /// Returns the drag gesture state.
    #[must_use]
    pub const fn gesture(&self) -> &GestureState {
        self.resolver.state()
    }

    /// Projects the collection through the active query as of now.
    #[must_use]
    pub fn view(&self) -> BoardView<'_> {
        project(self.store.tasks(), &self.query, self.clock.utc())
    }

    /// Begins dragging `task_id`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::board::services::StoreError::NotFound`] for an
    /// unknown task.
    pub fn start_drag(&mut self, task_id: &TaskId) -> StoreResult<GestureOutcome> {
        self.resolver.start(&self.store, task_id)
    }

    /// Feeds a pointer-over event to the resolver.
    ///
    /// # Errors
    ///
    /// Returns [`crate::board::services::StoreError::NotFound`] when the
    /// dragged task disappeared mid-gesture.
    pub fn drag_over(&mut self, target: &DropTarget) -> StoreResult<GestureOutcome> {
        self.resolver.over(&mut self.store, target)
    }

    /// Feeds the drop event to the resolver.
    ///
    /// # Errors
    ///
    /// Returns [`crate::board::services::StoreError::NotFound`] when the
    /// dragged task disappeared mid-gesture.
    pub fn drop_on(&mut self, target: Option<&DropTarget>) -> StoreResult<GestureOutcome> {
        self.resolver.end(&mut self.store, target)
    }

    /// Aborts the drag gesture in progress.
    pub fn cancel_drag(&mut self) -> GestureOutcome {
        self.resolver.cancel()
    }

    /// Opens the suggestion panel, fetching suggestions when none are kept.
    ///
    /// Returns `false` when the results were discarded as stale. Dropping
    /// the returned future abandons the request; the panel keeps loading
    /// until it is dismissed or reopened.
    pub async fn request_suggestions(&mut self) -> bool {
        let Some(ticket) = self.begin_suggestions() else {
            return true;
        };
        let records = self.fetch_suggestions().await;
        self.deliver_suggestions(ticket, records)
    }

    /// Shows the suggestion panel.
    ///
    /// Returns the ticket to deliver fetched suggestions against, or `None`
    /// when suggestions kept from an earlier request are shown.
    pub fn begin_suggestions(&mut self) -> Option<SuggestionTicket> {
        self.panel.open()
    }

    /// Discards the shown suggestions and starts a new request.
    pub fn refresh_suggestions(&mut self) -> SuggestionTicket {
        self.panel.refresh()
    }

    /// Returns a future fetching suggestions from the gateway.
    ///
    /// The future does not borrow the board, so the panel can be dismissed
    /// or reopened while it runs.
    pub fn fetch_suggestions(
        &self,
    ) -> impl Future<Output = Vec<SuggestionRecord>> + Send + use<B, G, C> {
        let service = self.suggestions.clone();
        let context = self.context.clone();
        async move { service.fetch(&context).await }
    }

    /// Hands fetched suggestions to the panel.
    ///
    /// Returns `false`, discarding `records`, when `ticket` was invalidated
    /// by a dismiss or a newer request.
    pub fn deliver_suggestions(
        &mut self,
        ticket: SuggestionTicket,
        records: Vec<SuggestionRecord>,
    ) -> bool {
        self.panel.deliver(ticket, records)
    }

    /// Closes the suggestion panel.
    pub fn dismiss_suggestions(&mut self) {
        self.panel.dismiss();
    }

    /// Turns the visible suggestion `id` into a task and removes it from
    /// the panel.
    ///
    /// Returns `Ok(None)` when no such suggestion is visible.
    ///
    /// # Errors
    ///
    /// Returns [`crate::board::services::StoreError::Validation`] when the
    /// suggestion has a blank title; the suggestion stays visible.
    pub fn admit_suggestion(&mut self, id: &str) -> StoreResult<Option<Task>> {
        let Some(record) = self
            .panel
            .suggestions()
            .iter()
            .find(|record| record.id == id)
            .cloned()
        else {
            return Ok(None);
        };
        let task = admit_suggestion(&mut self.store, &record)?;
        self.panel.take(id);
        Ok(Some(task))
    }

    /// Returns `description` extended with an improvement hint.
    pub async fn enhance_description(
        &self,
        title: &str,
        description: Option<&str>,
    ) -> Option<String> {
        self.suggestions.enhance_description(title, description).await
    }

    /// Moves `task_id` to `completed` and fetches follow-up actions.
    ///
    /// # Errors
    ///
    /// Returns [`crate::board::services::StoreError::NotFound`] for an
    /// unknown task.
    pub async fn complete(&mut self, task_id: &TaskId) -> StoreResult<(Task, Vec<String>)> {
        let task = self.store.move_task(task_id, TaskStatus::Completed)?;
        let actions = self.suggestions.next_actions(task.title()).await;
        Ok((task, actions))
    }
}
