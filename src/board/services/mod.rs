//! Application services for the task board.

mod persistence;
mod projector;
mod reorder;
mod store;
mod suggestions;

pub use persistence::{PersistenceError, TaskPersistence};
pub use projector::{
    BoardQuery, BoardStats, BoardView, StagePartition, all_tags, filter, partition_by_status,
    project, stage_tasks, stats,
};
pub use reorder::{DropTarget, GestureOutcome, GestureState, ReorderResolver};
pub use store::{StoreError, StoreResult, SubscriptionId, TaskSnapshot, TaskStore};
pub use suggestions::{SuggestionPanel, SuggestionService, SuggestionTicket, admit_suggestion};
