//! # Tasktick: In-Process Interval Scheduling for Rust
//!
//! Tasktick runs recurring and one-shot tasks on fixed intervals inside your
//! process, without an external scheduler daemon. Every task gets its own
//! timer and every run gets its own Tokio task, so a slow run never delays
//! the schedule.
//!
//! ## Features
//!
//! - **Interval Scheduling**: Recurring tasks run every `interval` until deleted
//! - **Run-Once Tasks**: Tasks that remove themselves after a successful run
//! - **Deferred Start**: Hold a task back until an absolute start time
//! - **Retries on Error**: A retry budget and delay for failed run-once tasks
//! - **Reschedule on Specific Errors**: Per-error delay and budget that bypass the error handler
//! - **Admission Limits**: Cap concurrent runs and the number of registered tasks
//! - **Cooperative Cancellation**: Deleting a task cancels the token its body can watch
//! - **Event Bus**: Subscribe to task lifecycle events
//! - **Pluggable Logging**: Bring your own [`logger::Logger`] or use the `log` facade
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! tasktick = "0.1.0"
//! tokio = { version = "1", features = ["full"] }
//! ```
//!
//! ## Basic Example
//!
//! ```no_run
//! use std::time::Duration;
//! use tasktick::{Scheduler, Task};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let scheduler = Scheduler::new();
//!
//!     // Runs every 30 seconds, starting 30 seconds from now
//!     let id = scheduler.add(
//!         &Task::new(|| async {
//!             println!("Running recurring task!");
//!             Ok(())
//!         })
//!         .with_err_func(|err| eprintln!("Task failed: {}", err))
//!         .with_interval(Duration::from_secs(30)),
//!     )?;
//!
//!     tokio::time::sleep(Duration::from_secs(300)).await;
//!
//!     scheduler.del(&id);
//!     scheduler.stop();
//!     Ok(())
//! }
//! ```
//!
//! ## Advanced Usage
//!
//! ```no_run
//! use std::time::Duration;
//! use chrono::Utc;
//! use tasktick::{Scheduler, SchedulerConfig, Task};
//!
//! #[derive(Debug, PartialEq)]
//! struct RateLimited;
//!
//! impl std::fmt::Display for RateLimited {
//!     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
//!         f.write_str("rate limited")
//!     }
//! }
//!
//! impl std::error::Error for RateLimited {}
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let scheduler = Scheduler::with_config(SchedulerConfig {
//!         worker_limit: 4,
//!         task_limit: 1000,
//!     });
//!
//!     let mut events = scheduler.event_bus().subscribe();
//!     tokio::spawn(async move {
//!         while let Ok(event) = events.recv().await {
//!             println!("Event: {:?}", event);
//!         }
//!     });
//!
//!     // One attempt in an hour, three retries a minute apart on failure,
//!     // and up to ten five-minute waits while rate limited.
//!     scheduler.add_with_id(
//!         "sync-inventory",
//!         &Task::default()
//!             .with_context_func(|ctx| async move {
//!                 if ctx.is_cancelled() {
//!                     return Ok(());
//!                 }
//!                 Err(RateLimited.into())
//!             })
//!             .with_err_func(|err| eprintln!("sync failed: {}", err))
//!             .with_start_after(Utc::now() + chrono::Duration::hours(1))
//!             .run_once()
//!             .with_retries_on_error(3, Duration::from_secs(60))
//!             .with_reschedule_on_error(RateLimited, Duration::from_secs(300), 10),
//!     )?;
//!
//!     tokio::time::sleep(Duration::from_secs(7200)).await;
//!     scheduler.stop();
//!     Ok(())
//! }
//! ```
//!
//! ## Main Components
//!
//! - [`Scheduler`] - Registers tasks and drives their timers
//! - [`Task`] - Describes what to run, how often and how to handle failures
//! - [`TaskContext`] - Cancellation token and ID handed to task functions
//! - [`TasktickError`] - Error types for the library
//! - [`Result`] - Convenient result type alias

// Re-export the main components
pub use crate::errors::{BoxError, TaskError, TasktickError};
pub use crate::events::{EventBus, SchedulerEvent};
pub use crate::logger::{LogLogger, Logger, NoopLogger};
pub use crate::scheduler::{Scheduler, SchedulerConfig};
pub use crate::task::{ReschedulePolicy, Task, TaskContext};

// Main modules
pub mod errors;
pub mod events;
pub mod logger;
pub mod scheduler;
pub mod task;
mod timer;

/// Convenient result type alias for Tasktick operations.
///
/// This is equivalent to `std::result::Result<T, TasktickError>`.
pub type Result<T> = std::result::Result<T, TasktickError>;

/// The version of the Tasktick library.
///
/// This is extracted from the `Cargo.toml` at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
