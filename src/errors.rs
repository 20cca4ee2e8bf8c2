use std::error::Error as StdError;
use std::sync::Arc;

use thiserror::Error;

/// Error type returned by task bodies.
///
/// Any error that is `Send + Sync` converts into it with `?` or `.into()`,
/// including plain strings.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// A task body error as seen by error handlers, logs and events.
///
/// It is shared because the same failure is handed to the error handler
/// and inspected by the scheduler at the same time.
pub type TaskError = Arc<dyn StdError + Send + Sync + 'static>;

/// Represents all possible errors that can occur in Tasktick
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TasktickError {
    /// Neither a plain nor a context-aware task function was set
    #[error("Task functions are empty")]
    TaskFuncNotSet,

    /// Neither a plain nor a context-aware error function was set
    #[error("Error functions are empty")]
    ErrFuncNotSet,

    /// A recurring task was registered without an interval
    #[error("Interval is empty")]
    IntervalEmpty,

    /// A run-once task asks for retries but has no retry interval
    #[error("Retry on error interval is empty")]
    RetryOnErrorIntervalEmpty,

    /// The requested task ID is already registered
    #[error("ID '{0}' already used")]
    IdInUse(String),

    /// The scheduler already holds its maximum number of tasks
    #[error("Task limit exceeded")]
    TaskLimitExceeded,

    /// No task with this ID is registered
    #[error("Could not find task '{0}' within the task list")]
    TaskNotFound(String),
}
