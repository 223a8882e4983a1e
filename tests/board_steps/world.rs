//! Shared world state for task board BDD scenarios.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use rstest::fixture;
use taskboard::{
    app::Board,
    board::{
        adapters::{
            clock::ManualClock,
            memory::InMemoryBlobStore,
            mock::{MockLatency, MockSuggestionGateway},
        },
        domain::{BlobKey, TaskId, TaskStatus},
        services::{
            GestureOutcome, StoreError, SuggestionTicket, TaskPersistence, TaskStore, stage_tasks,
        },
    },
};

/// Board type driven by the scenarios.
pub type TestBoard = Board<InMemoryBlobStore, MockSuggestionGateway, ManualClock>;

/// Scenario world for task board behaviour tests.
pub struct BoardWorld {
    pub blobs: InMemoryBlobStore,
    pub clock: Arc<ManualClock>,
    pub board: TestBoard,
    pub last_error: Option<StoreError>,
    pub last_outcome: Option<GestureOutcome>,
    pub next_actions: Vec<String>,
    pub improved: Option<String>,
    pub pending_suggestions: Option<SuggestionTicket>,
    pub delivered: Option<bool>,
}

impl BoardWorld {
    /// Creates a world whose board was opened over an empty blob.
    #[must_use]
    pub fn new() -> Self {
        let blobs = InMemoryBlobStore::new();
        let start = Utc
            .with_ymd_and_hms(2025, 3, 1, 9, 0, 0)
            .single()
            .unwrap_or_default();
        let clock = Arc::new(ManualClock::new(start));
        let board = open_board(&blobs, &clock, false);
        Self {
            blobs,
            clock,
            board,
            last_error: None,
            last_outcome: None,
            next_actions: Vec::new(),
            improved: None,
            pending_suggestions: None,
            delivered: None,
        }
    }

    /// Reopens the board from whatever the blob holds.
    pub fn reopen(&mut self) {
        self.board = open_board(&self.blobs, &self.clock, false);
    }

    /// Replaces the board with one holding no tasks.
    pub fn clear(&mut self) {
        self.board = open_board(&self.blobs, &self.clock, true);
    }

    /// Finds the identifier of the task titled `title`.
    pub fn task_id(&self, title: &str) -> Result<TaskId, eyre::Report> {
        self.board
            .store()
            .tasks()
            .iter()
            .find(|task| task.title() == title)
            .map(|task| task.id().clone())
            .ok_or_else(|| eyre::eyre!("no task titled {title:?}"))
    }

    /// Titles of `status` in display order.
    #[must_use]
    pub fn stage_titles(&self, status: TaskStatus) -> Vec<String> {
        stage_tasks(self.board.store().tasks(), status)
            .into_iter()
            .map(|task| task.title().to_owned())
            .collect()
    }
}

impl Default for BoardWorld {
    fn default() -> Self {
        Self::new()
    }
}

fn open_board(blobs: &InMemoryBlobStore, clock: &Arc<ManualClock>, empty: bool) -> TestBoard {
    let persistence = TaskPersistence::new(Arc::new(blobs.clone()), BlobKey::default());
    let store = if empty {
        TaskStore::with_tasks(persistence, Arc::clone(clock), Vec::new())
    } else {
        TaskStore::open(persistence, Arc::clone(clock))
    };
    let gateway = MockSuggestionGateway::new(MockLatency::NONE)
        .map(Arc::new)
        .unwrap_or_else(|err| panic!("mock gateway templates: {err}"));
    Board::new(store, gateway, Arc::clone(clock), "productivity workflow")
}

/// Parses a stage name used in feature files.
pub fn stage(name: &str) -> Result<TaskStatus, eyre::Report> {
    TaskStatus::try_from(name).map_err(|err| eyre::eyre!("invalid stage in scenario: {err}"))
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> BoardWorld {
    BoardWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
