//! Domain model for the task board.
//!
//! The domain holds the task aggregate, its workflow stages, and the value
//! types used at the persistence boundary, keeping storage and presentation
//! concerns outside.

mod error;
mod ids;
mod seed;
mod status;
mod task;
pub mod time;

pub use error::{BlobKeyError, ParseTaskPriorityError, ParseTaskStatusError, ValidationError};
pub use ids::{BlobKey, TaskId};
pub use seed::seed_tasks;
pub use status::{TaskPriority, TaskStatus};
pub use task::{NewTask, PersistedTaskData, Task, TaskPatch};
