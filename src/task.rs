//! Task definition and per-task runtime state.
//!
//! This module provides the [`Task`] type, which describes what to run and
//! when, and [`TaskContext`], which carries the cancellation token handed to
//! context-aware task bodies and error handlers.

use std::error::Error;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;

use crate::errors::{BoxError, TaskError};
use crate::timer::Timer;

/// Future returned by a task body.
pub type TaskFuture = Pin<Box<dyn Future<Output = Result<(), BoxError>> + Send>>;

/// A task body that takes no arguments.
pub type TaskFn = Arc<dyn Fn() -> TaskFuture + Send + Sync>;

/// A task body that receives the task's [`TaskContext`].
pub type ContextTaskFn = Arc<dyn Fn(TaskContext) -> TaskFuture + Send + Sync>;

/// An error handler that receives the failure.
pub type ErrFn = Arc<dyn Fn(TaskError) + Send + Sync>;

/// An error handler that receives the task's [`TaskContext`] and the failure.
pub type ContextErrFn = Arc<dyn Fn(TaskContext, TaskError) + Send + Sync>;

type CancelFn = Arc<dyn Fn() + Send + Sync>;
type ErrorMatcher = Arc<dyn Fn(&(dyn Error + 'static)) -> bool + Send + Sync>;

/// Returns `true` if `err`, or any error in its `source()` chain, is an `E`
/// equal to `target`.
///
/// # Examples
///
/// ```
/// use tasktick::task::error_is;
///
/// #[derive(Debug, PartialEq)]
/// struct Busy;
///
/// impl std::fmt::Display for Busy {
///     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
///         f.write_str("busy")
///     }
/// }
///
/// impl std::error::Error for Busy {}
///
/// let err: Box<dyn std::error::Error + Send + Sync> = Box::new(Busy);
/// assert!(error_is(&*err, &Busy));
/// ```
pub fn error_is<E>(err: &(dyn Error + 'static), target: &E) -> bool
where
    E: Error + PartialEq + 'static,
{
    let mut current = Some(err);
    while let Some(e) = current {
        if e.downcast_ref::<E>().is_some_and(|e| e == target) {
            return true;
        }
        current = e.source();
    }
    false
}

/// Per-task context passed to context-aware bodies and error handlers.
///
/// Holds a user cancellation token, an optional cancel function invoked when
/// the task is deleted, and the task ID (set by the scheduler on
/// registration). If a task is registered without a token, the scheduler
/// creates one and makes it cancellable.
///
/// # Examples
///
/// ```
/// use tasktick::TaskContext;
/// use tokio_util::sync::CancellationToken;
///
/// let token = CancellationToken::new();
/// let ctx = TaskContext::cancellable(token.clone());
///
/// ctx.cancel();
/// assert!(token.is_cancelled());
/// ```
#[derive(Clone, Default)]
pub struct TaskContext {
    token: Option<CancellationToken>,
    cancel: Option<CancelFn>,
    id: String,
}

impl TaskContext {
    /// Attaches a user token. Deleting the task will not cancel it.
    pub fn new(token: CancellationToken) -> Self {
        TaskContext {
            token: Some(token),
            cancel: None,
            id: String::new(),
        }
    }

    /// Attaches a user token that is cancelled when the task is deleted.
    pub fn cancellable(token: CancellationToken) -> Self {
        let cancel_token = token.clone();
        TaskContext::new(token).with_cancel_fn(move || cancel_token.cancel())
    }

    /// Sets the function run when the task is deleted (builder pattern).
    pub fn with_cancel_fn<F>(mut self, cancel: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.cancel = Some(Arc::new(cancel));
        self
    }

    /// The task ID, empty until the task is registered.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn token(&self) -> Option<&CancellationToken> {
        self.token.as_ref()
    }

    /// Whether the user token has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.token.as_ref().is_some_and(CancellationToken::is_cancelled)
    }

    /// Completes once the user token is cancelled.
    ///
    /// Never completes if no token is attached.
    pub async fn cancelled(&self) {
        match &self.token {
            Some(token) => token.cancelled().await,
            None => std::future::pending().await,
        }
    }

    /// Runs the cancel function, if any.
    pub fn cancel(&self) {
        if let Some(cancel) = &self.cancel {
            cancel();
        }
    }

    pub(crate) fn has_cancel(&self) -> bool {
        self.cancel.is_some()
    }
}

impl fmt::Debug for TaskContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskContext")
            .field("id", &self.id)
            .field("has_token", &self.token.is_some())
            .field("cancelled", &self.is_cancelled())
            .field("has_cancel", &self.has_cancel())
            .finish()
    }
}

/// Keeps a task alive when its body fails with one specific error.
#[derive(Clone)]
pub struct ReschedulePolicy {
    matcher: ErrorMatcher,
    error: String,
    interval: Duration,
    count: u32,
}

impl ReschedulePolicy {
    /// Display text of the error this policy matches.
    pub fn error(&self) -> &str {
        &self.error
    }

    /// Delay before the next attempt after a matching failure.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Remaining reschedules.
    pub fn count(&self) -> u32 {
        self.count
    }

    pub(crate) fn matches(&self, err: &(dyn Error + 'static)) -> bool {
        (self.matcher)(err)
    }

    pub(crate) fn consume(&mut self) {
        self.count = self.count.saturating_sub(1);
    }
}

impl fmt::Debug for ReschedulePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReschedulePolicy")
            .field("error", &self.error)
            .field("interval", &self.interval)
            .field("count", &self.count)
            .finish()
    }
}

/// A schedulable unit of work.
///
/// A task needs a body ([`Task::with_func`] or [`Task::with_context_func`])
/// and an error handler ([`Task::with_err_func`] or
/// [`Task::with_context_err_func`]). When both variants are set, the
/// context-aware one wins.
///
/// Recurring tasks run every [`interval`](Task::with_interval) until deleted.
/// Run-once tasks run once after `interval` and remove themselves, unless a
/// failure is absorbed by a retry or reschedule policy.
///
/// `Task` is a plain value: the scheduler stores its own copy on
/// registration and hands out copies from lookups.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use tasktick::Task;
///
/// let task = Task::new(|| async {
///     println!("tick");
///     Ok(())
/// })
/// .with_err_func(|err| eprintln!("tick failed: {}", err))
/// .with_interval(Duration::from_secs(30));
///
/// assert_eq!(task.interval(), Duration::from_secs(30));
/// ```
///
/// ## Run-once task with retries
///
/// ```
/// use std::time::Duration;
/// use tasktick::Task;
///
/// let task = Task::new(|| async { Err("not yet".into()) })
///     .with_err_func(|_| {})
///     .run_once()
///     .with_retries_on_error(3, Duration::from_millis(500));
///
/// assert!(task.is_run_once());
/// assert_eq!(task.retries_on_error(), 3);
/// ```
#[derive(Clone, Default)]
pub struct Task {
    id: String,
    context: TaskContext,
    interval: Duration,
    run_once: bool,
    retries_on_error: u32,
    retry_on_error_interval: Duration,
    start_after: Option<DateTime<Utc>>,
    func: Option<TaskFn>,
    func_with_context: Option<ContextTaskFn>,
    err_func: Option<ErrFn>,
    err_func_with_context: Option<ContextErrFn>,
    reschedule_on_error: Vec<ReschedulePolicy>,
}

impl Task {
    /// Creates a task with the given body.
    pub fn new<F, Fut>(func: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), BoxError>> + Send + 'static,
    {
        Task::default().with_func(func)
    }

    /// Sets the body (builder pattern).
    pub fn with_func<F, Fut>(mut self, func: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), BoxError>> + Send + 'static,
    {
        self.func = Some(Arc::new(move || -> TaskFuture { Box::pin(func()) }));
        self
    }

    /// Sets a body that receives the task context (builder pattern).
    ///
    /// # Examples
    ///
    /// ```
    /// use tasktick::Task;
    ///
    /// let task = Task::default()
    ///     .with_context_func(|ctx| async move {
    ///         tokio::select! {
    ///             _ = ctx.cancelled() => Err("cancelled".into()),
    ///             _ = tokio::time::sleep(std::time::Duration::from_secs(1)) => Ok(()),
    ///         }
    ///     })
    ///     .with_err_func(|_| {});
    /// ```
    pub fn with_context_func<F, Fut>(mut self, func: F) -> Self
    where
        F: Fn(TaskContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), BoxError>> + Send + 'static,
    {
        self.func_with_context = Some(Arc::new(move |ctx: TaskContext| -> TaskFuture {
            Box::pin(func(ctx))
        }));
        self
    }

    /// Sets the error handler (builder pattern).
    pub fn with_err_func<F>(mut self, func: F) -> Self
    where
        F: Fn(TaskError) + Send + Sync + 'static,
    {
        self.err_func = Some(Arc::new(func));
        self
    }

    /// Sets an error handler that receives the task context (builder pattern).
    pub fn with_context_err_func<F>(mut self, func: F) -> Self
    where
        F: Fn(TaskContext, TaskError) + Send + Sync + 'static,
    {
        self.err_func_with_context = Some(Arc::new(func));
        self
    }

    /// Sets the time between runs (builder pattern).
    ///
    /// For run-once tasks this is the delay before the single run.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Delays the first scheduling cycle until `start_after` (builder pattern).
    pub fn with_start_after(mut self, start_after: DateTime<Utc>) -> Self {
        self.start_after = Some(start_after);
        self
    }

    /// Marks the task as run-once (builder pattern).
    pub fn run_once(mut self) -> Self {
        self.run_once = true;
        self
    }

    /// Retries a failed run-once task up to `count` times, waiting
    /// `interval` before each retry (builder pattern).
    pub fn with_retries_on_error(mut self, count: u32, interval: Duration) -> Self {
        self.retries_on_error = count;
        self.retry_on_error_interval = interval;
        self
    }

    /// Reschedules the task after `interval` when the body fails with
    /// `error`, at most `count` times (builder pattern).
    ///
    /// A matching failure bypasses the error handler and the generic retry
    /// budget. Registering an error that an existing policy already matches
    /// replaces that policy.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    /// use tasktick::Task;
    ///
    /// #[derive(Debug, PartialEq)]
    /// enum FetchError {
    ///     RateLimited,
    /// }
    ///
    /// impl std::fmt::Display for FetchError {
    ///     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    ///         f.write_str("rate limited")
    ///     }
    /// }
    ///
    /// impl std::error::Error for FetchError {}
    ///
    /// let task = Task::new(|| async { Err(FetchError::RateLimited.into()) })
    ///     .with_err_func(|_| {})
    ///     .run_once()
    ///     .with_reschedule_on_error(FetchError::RateLimited, Duration::from_secs(60), 5);
    ///
    /// assert_eq!(task.reschedule_on_error()[0].count(), 5);
    /// ```
    pub fn with_reschedule_on_error<E>(mut self, error: E, interval: Duration, count: u32) -> Self
    where
        E: Error + PartialEq + Send + Sync + 'static,
    {
        let description = error.to_string();
        let existing = self
            .reschedule_on_error
            .iter()
            .position(|policy| policy.matches(&error));

        let policy = ReschedulePolicy {
            matcher: Arc::new(move |err: &(dyn Error + 'static)| error_is(err, &error)),
            error: description,
            interval,
            count,
        };

        match existing {
            Some(index) => self.reschedule_on_error[index] = policy,
            None => self.reschedule_on_error.push(policy),
        }
        self
    }

    /// Sets the context handed to context-aware functions (builder pattern).
    pub fn with_context(mut self, context: TaskContext) -> Self {
        self.context = context;
        self
    }

    /// The task ID, empty until the task is registered.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn context(&self) -> &TaskContext {
        &self.context
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn start_after(&self) -> Option<DateTime<Utc>> {
        self.start_after
    }

    pub fn is_run_once(&self) -> bool {
        self.run_once
    }

    /// Remaining generic retries.
    pub fn retries_on_error(&self) -> u32 {
        self.retries_on_error
    }

    pub fn retry_on_error_interval(&self) -> Duration {
        self.retry_on_error_interval
    }

    pub fn reschedule_on_error(&self) -> &[ReschedulePolicy] {
        &self.reschedule_on_error
    }

    pub(crate) fn has_func(&self) -> bool {
        self.func.is_some() || self.func_with_context.is_some()
    }

    pub(crate) fn has_err_func(&self) -> bool {
        self.err_func.is_some() || self.err_func_with_context.is_some()
    }

    /// Stamps the registry ID into the task and its context, creating a
    /// cancellable user token when none was supplied.
    pub(crate) fn assign(&mut self, id: &str) {
        self.id = id.to_string();
        self.context.id = id.to_string();
        if self.context.token.is_none() {
            let token = CancellationToken::new();
            let cancel_token = token.clone();
            self.context.token = Some(token);
            self.context.cancel = Some(Arc::new(move || cancel_token.cancel()));
        }
    }

    /// Runs the body, preferring the context-aware variant.
    pub(crate) async fn call(&self) -> Result<(), BoxError> {
        if let Some(func) = &self.func_with_context {
            func(self.context.clone()).await
        } else if let Some(func) = &self.func {
            func().await
        } else {
            Err("task functions are empty".into())
        }
    }

    /// Runs the error handler on its own Tokio task, preferring the
    /// context-aware variant.
    pub(crate) fn spawn_err_func(&self, err: TaskError) {
        if let Some(func) = &self.err_func_with_context {
            let func = Arc::clone(func);
            let context = self.context.clone();
            tokio::spawn(async move { func(context, err) });
        } else if let Some(func) = &self.err_func {
            let func = Arc::clone(func);
            tokio::spawn(async move { func(err) });
        }
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("id", &self.id)
            .field("interval", &self.interval)
            .field("run_once", &self.run_once)
            .field("start_after", &self.start_after)
            .field("retries_on_error", &self.retries_on_error)
            .field("retry_on_error_interval", &self.retry_on_error_interval)
            .field("reschedule_on_error", &self.reschedule_on_error)
            .field("context", &self.context)
            .finish()
    }
}

/// Mutable runtime fields of a registered task.
#[derive(Default)]
pub(crate) struct TaskState {
    pub(crate) timer: Option<Timer>,
    pub(crate) retries_on_error: u32,
    pub(crate) reschedule_on_error: Vec<ReschedulePolicy>,
}

/// The scheduler's own copy of a registered task.
///
/// `task` is immutable after registration; everything that changes while the
/// task is scheduled lives in `state` behind the task lock.
pub(crate) struct LiveTask {
    pub(crate) task: Task,
    cancel: CancellationToken,
    state: Mutex<TaskState>,
}

impl LiveTask {
    pub(crate) fn new(task: Task) -> Self {
        let state = TaskState {
            timer: None,
            retries_on_error: task.retries_on_error,
            reschedule_on_error: task.reschedule_on_error.clone(),
        };
        LiveTask {
            task,
            cancel: CancellationToken::new(),
            state: Mutex::new(state),
        }
    }

    pub(crate) fn id(&self) -> &str {
        &self.task.id
    }

    /// Runs `f` with the task lock held.
    pub(crate) fn safe_ops<R>(&self, f: impl FnOnce(&mut TaskState) -> R) -> R {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub(crate) async fn cancelled(&self) {
        self.cancel.cancelled().await
    }

    /// Cancels the private token. Call with the task lock held.
    pub(crate) fn cancel_locked(&self, _state: &mut TaskState) {
        self.cancel.cancel();
    }

    /// Resets the timer to `delay` unless the task was deleted. Call with the
    /// task lock held.
    pub(crate) fn reset_timer_locked(&self, state: &mut TaskState, delay: Duration) -> bool {
        if self.cancel.is_cancelled() {
            return false;
        }
        match &state.timer {
            Some(timer) => {
                timer.reset(delay);
                true
            }
            None => false,
        }
    }

    /// A copy of the task with the live retry and reschedule counters.
    pub(crate) fn snapshot(&self) -> Task {
        let mut task = self.task.clone();
        self.safe_ops(|state| {
            task.retries_on_error = state.retries_on_error;
            task.reschedule_on_error = state.reschedule_on_error.clone();
        });
        task
    }
}
