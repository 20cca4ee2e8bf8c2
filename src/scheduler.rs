//! Scheduler for registering and running interval tasks.
//!
//! This module provides the [`Scheduler`] type, which owns the task list,
//! arms one timer per task and runs every fire on its own Tokio task.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, Weak};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{AcquireError, OwnedSemaphorePermit, Semaphore};
use tokio::time::Instant;
use uuid::Uuid;

use crate::errors::{TaskError, TasktickError};
use crate::events::{EventBus, SchedulerEvent};
use crate::logger::{LogLogger, Logger};
use crate::task::{LiveTask, Task};
use crate::timer::{Timer, TimerCallback};
use crate::Result;

/// Configuration options for the scheduler.
///
/// A limit of `0` means unlimited.
///
/// # Examples
///
/// ```
/// use tasktick::SchedulerConfig;
///
/// let config = SchedulerConfig {
///     worker_limit: 4,  // at most 4 task bodies at once
///     task_limit: 100,  // at most 100 registered tasks
/// };
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Maximum number of task bodies running at the same time.
    ///
    /// A fire that finds every slot taken waits for one before dispatching.
    /// Values above [`Semaphore::MAX_PERMITS`] are capped to it.
    /// Default: 0 (unlimited)
    pub worker_limit: usize,

    /// Maximum number of registered tasks.
    ///
    /// Registration past this limit fails with
    /// [`TasktickError::TaskLimitExceeded`]. Default: 0 (unlimited)
    pub task_limit: usize,
}

/// An in-process scheduler for recurring and run-once tasks.
///
/// Each registered task gets its own timer; every fire runs the task body on
/// a freshly spawned Tokio task, so a slow body never holds up other tasks or
/// the next tick of the same task. All methods must be called from within a
/// Tokio runtime.
///
/// `Scheduler` is cheap to clone; clones share the same task list.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use tasktick::{Scheduler, Task};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let scheduler = Scheduler::new();
///
///     let id = scheduler.add(
///         &Task::new(|| async {
///             println!("every 30 seconds");
///             Ok(())
///         })
///         .with_err_func(|err| eprintln!("failed: {}", err))
///         .with_interval(Duration::from_secs(30)),
///     )?;
///
///     tokio::time::sleep(Duration::from_secs(120)).await;
///
///     scheduler.del(&id);
///     scheduler.stop();
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct Scheduler {
    inner: Arc<SchedulerInner>,
}

struct SchedulerInner {
    /// Map of task IDs to the scheduler's own copy of each task
    tasks: RwLock<HashMap<String, Arc<LiveTask>>>,
    /// Admission gate, present when a worker limit is configured
    workers: Option<Arc<Semaphore>>,
    config: SchedulerConfig,
    logger: Arc<dyn Logger>,
    event_bus: EventBus,
}

impl Scheduler {
    /// Creates a scheduler without limits that logs through the `log` crate.
    pub fn new() -> Self {
        Self::with_config(SchedulerConfig::default())
    }

    /// Creates a scheduler with custom limits.
    ///
    /// # Examples
    ///
    /// ```
    /// use tasktick::{Scheduler, SchedulerConfig};
    ///
    /// let scheduler = Scheduler::with_config(SchedulerConfig {
    ///     worker_limit: 2,
    ///     task_limit: 0,
    /// });
    /// assert_eq!(scheduler.config().worker_limit, 2);
    /// ```
    pub fn with_config(config: SchedulerConfig) -> Self {
        Self::with_logger(config, Arc::new(LogLogger))
    }

    /// Creates a scheduler that reports through `logger`.
    pub fn with_logger(config: SchedulerConfig, logger: Arc<dyn Logger>) -> Self {
        let workers = (config.worker_limit > 0)
            .then(|| Arc::new(Semaphore::new(config.worker_limit.min(Semaphore::MAX_PERMITS))));

        Scheduler {
            inner: Arc::new(SchedulerInner {
                tasks: RwLock::new(HashMap::new()),
                workers,
                config,
                logger,
                event_bus: EventBus::new(),
            }),
        }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.inner.config
    }

    /// Returns the event bus the scheduler publishes to.
    pub fn event_bus(&self) -> &EventBus {
        &self.inner.event_bus
    }

    /// Registers a task under a generated ID and schedules it.
    ///
    /// IDs are time-ordered UUIDs. If a generated ID happens to be taken,
    /// another one is generated.
    ///
    /// # Errors
    ///
    /// Same as [`Scheduler::add_with_id`], except that
    /// [`TasktickError::IdInUse`] is never returned.
    pub fn add(&self, task: &Task) -> Result<String> {
        self.add_generated(task, || Uuid::now_v7().to_string())
    }

    /// Registers `task` under the first ID from `next_id` that is not taken.
    fn add_generated(&self, task: &Task, mut next_id: impl FnMut() -> String) -> Result<String> {
        loop {
            let id = next_id();
            match self.add_with_id(&id, task) {
                Err(TasktickError::IdInUse(_)) => {
                    self.inner
                        .logger
                        .info(format_args!("id '{}' is already in use, another attempt to add", id));
                }
                Err(err) => return Err(err),
                Ok(()) => return Ok(id),
            }
        }
    }

    /// Registers a task under `id` and schedules it.
    ///
    /// The scheduler stores its own copy of `task`; later changes to the
    /// caller's value have no effect. The first run happens one interval
    /// after `start_after` (or after now when unset).
    ///
    /// # Errors
    ///
    /// Validation runs in this order and nothing is registered on failure:
    /// - [`TasktickError::TaskFuncNotSet`] if the task has no body
    /// - [`TasktickError::ErrFuncNotSet`] if the task has no error handler
    /// - [`TasktickError::IntervalEmpty`] if a recurring task has no interval
    /// - [`TasktickError::RetryOnErrorIntervalEmpty`] if a run-once task has
    ///   retries but no retry interval
    /// - [`TasktickError::TaskLimitExceeded`] if the task limit is reached
    /// - [`TasktickError::IdInUse`] if `id` is already registered
    pub fn add_with_id(&self, id: &str, task: &Task) -> Result<()> {
        validate(task)?;

        let mut task = task.clone();
        task.assign(id);
        let live = Arc::new(LiveTask::new(task));

        {
            let mut tasks = self.inner.tasks.write().unwrap_or_else(PoisonError::into_inner);
            if self.inner.config.task_limit > 0 && tasks.len() >= self.inner.config.task_limit {
                return Err(TasktickError::TaskLimitExceeded);
            }
            if tasks.contains_key(id) {
                return Err(TasktickError::IdInUse(id.to_string()));
            }
            tasks.insert(id.to_string(), Arc::clone(&live));
            self.inner.event_bus.publish(SchedulerEvent::TaskAdded {
                task_id: id.to_string(),
                timestamp: Utc::now(),
            });
            self.inner.schedule_task(&live);
        }

        Ok(())
    }

    /// Unschedules and removes a task.
    ///
    /// Cancels the task's context so a running body can wind down, but never
    /// interrupts it. Does nothing if `id` is not registered.
    pub fn del(&self, id: &str) {
        if let Some(live) = self.inner.get(id) {
            self.inner.remove(&live);
        }
    }

    /// Returns a copy of the task registered under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`TasktickError::TaskNotFound`] if `id` is not registered.
    pub fn lookup(&self, id: &str) -> Result<Task> {
        self.inner
            .get(id)
            .map(|live| live.snapshot())
            .ok_or_else(|| TasktickError::TaskNotFound(id.to_string()))
    }

    /// Whether a task is registered under `id`.
    pub fn has(&self, id: &str) -> bool {
        self.inner.read().contains_key(id)
    }

    /// Returns copies of every registered task, keyed by ID.
    pub fn tasks(&self) -> HashMap<String, Task> {
        let live: Vec<Arc<LiveTask>> = self.inner.read().values().cloned().collect();
        live.into_iter()
            .map(|task| (task.id().to_string(), task.snapshot()))
            .collect()
    }

    /// Number of registered tasks.
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Deletes every task and closes the admission gate.
    ///
    /// The scheduler is not meant to be reused afterwards.
    pub fn stop(&self) {
        let ids: Vec<String> = self.inner.read().keys().cloned().collect();
        let removed_tasks = ids.len();
        for id in &ids {
            self.del(id);
        }

        if let Some(workers) = &self.inner.workers {
            workers.close();
        }

        self.inner.event_bus.publish(SchedulerEvent::SchedulerStopped {
            timestamp: Utc::now(),
            removed_tasks,
        });
        self.inner
            .logger
            .info(format_args!("scheduler stopped, {} tasks removed", removed_tasks));
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

fn validate(task: &Task) -> Result<()> {
    if !task.has_func() {
        return Err(TasktickError::TaskFuncNotSet);
    }
    if !task.has_err_func() {
        return Err(TasktickError::ErrFuncNotSet);
    }
    if !task.is_run_once() && task.interval().is_zero() {
        return Err(TasktickError::IntervalEmpty);
    }
    if task.is_run_once() && task.retries_on_error() > 0 && task.retry_on_error_interval().is_zero() {
        return Err(TasktickError::RetryOnErrorIntervalEmpty);
    }
    Ok(())
}

impl SchedulerInner {
    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, Arc<LiveTask>>> {
        self.tasks.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn get(&self, id: &str) -> Option<Arc<LiveTask>> {
        self.read().get(id).cloned()
    }

    /// Cancels, disarms and unregisters `live`.
    ///
    /// Takes the task lock, then the registry lock. The registry entry is only
    /// removed if it is still this task, so a stale removal never drops a
    /// task later registered under the same ID.
    fn remove(&self, live: &Arc<LiveTask>) {
        let removed = live.safe_ops(|state| {
            live.cancel_locked(state);
            if let Some(timer) = state.timer.take() {
                timer.stop();
            }

            let mut tasks = self.tasks.write().unwrap_or_else(PoisonError::into_inner);
            let current = tasks
                .get(live.id())
                .is_some_and(|current| Arc::ptr_eq(current, live));
            if current {
                tasks.remove(live.id());
            }
            current
        });
        live.task.context().cancel();

        if removed {
            self.logger
                .debug(format_args!("task (id: {}) has been removed", live.id()));
            self.event_bus.publish(SchedulerEvent::TaskRemoved {
                task_id: live.id().to_string(),
                timestamp: Utc::now(),
            });
        }
    }

    /// Arms the deferred-start alarm, which in turn arms the interval timer.
    ///
    /// A task deleted before the alarm fires is never armed.
    fn schedule_task(self: &Arc<Self>, live: &Arc<LiveTask>) {
        let now = Utc::now();
        let start_at = live.task.start_after().unwrap_or(now);
        let delay = (start_at - now).to_std().unwrap_or(Duration::ZERO);

        let scheduler = Arc::downgrade(self);
        let task = Arc::clone(live);
        tokio::spawn(async move {
            tokio::select! {
                _ = task.cancelled() => return,
                _ = tokio::time::sleep(delay) => {}
            }

            let callback = exec_callback(scheduler, Arc::downgrade(&task));
            task.safe_ops(|state| {
                // Deletion cancels under this lock, so this check cannot race it.
                if task.is_cancelled() {
                    return;
                }
                state.timer = Some(Timer::after(task.task.interval(), callback));
            });
        });

        self.logger.debug(format_args!(
            "task (id: {}) has been scheduled at {}",
            live.id(),
            start_at.to_rfc3339()
        ));
    }

    /// Runs one fire of `live`'s timer.
    ///
    /// Waits for an admission slot, then runs the body on its own Tokio task.
    /// Recurring tasks are re-armed right away, before the body finishes, so
    /// a slow body does not push back later ticks.
    async fn exec_task(self: Arc<Self>, live: Arc<LiveTask>) {
        let permit = match self.acquire_worker().await {
            Ok(permit) => permit,
            Err(_) => {
                self.logger.debug(format_args!(
                    "task (id: {}) skipped, worker pool is closed",
                    live.id()
                ));
                return;
            }
        };

        if live.is_cancelled() {
            return;
        }

        let scheduler = Arc::clone(&self);
        let running = Arc::clone(&live);
        tokio::spawn(async move {
            scheduler.event_bus.publish(SchedulerEvent::TaskStarted {
                task_id: running.id().to_string(),
                timestamp: Utc::now(),
            });

            let started = Instant::now();
            let result = running.task.call().await;
            drop(permit);

            let delete = match result {
                Ok(()) => {
                    scheduler.logger.debug(format_args!(
                        "task (id: {}) has been successfully executed",
                        running.id()
                    ));
                    scheduler.event_bus.publish(SchedulerEvent::TaskCompleted {
                        task_id: running.id().to_string(),
                        timestamp: Utc::now(),
                        duration_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
                    });
                    true
                }
                Err(err) => scheduler.on_task_error(&running, TaskError::from(err)),
            };

            if running.task.is_run_once() && delete {
                scheduler.remove(&running);
            }
        });

        if !live.task.is_run_once() {
            let interval = live.task.interval();
            live.safe_ops(|state| live.reset_timer_locked(state, interval));
        }
    }

    /// Takes an admission slot; `Ok(None)` when no worker limit is set.
    async fn acquire_worker(&self) -> std::result::Result<Option<OwnedSemaphorePermit>, AcquireError> {
        match &self.workers {
            Some(workers) => Arc::clone(workers).acquire_owned().await.map(Some),
            None => Ok(None),
        }
    }

    /// Decides what happens after a failed run.
    ///
    /// Returns `true` if a run-once task should be deleted. A reschedule
    /// policy with budget left takes precedence; otherwise the error handler
    /// runs and a run-once task spends one generic retry if it has any.
    fn on_task_error(&self, live: &Arc<LiveTask>, err: TaskError) -> bool {
        if self.reschedule_task_on_error(live, &err) {
            return false;
        }

        let retries_left = live.safe_ops(|state| state.retries_on_error);
        self.logger.error(format_args!(
            "task (id: {}, retries left: {}) failed: {}",
            live.id(),
            retries_left,
            err
        ));
        self.event_bus.publish(SchedulerEvent::TaskFailed {
            task_id: live.id().to_string(),
            timestamp: Utc::now(),
            error: err.to_string(),
            retries_left,
        });

        live.task.spawn_err_func(err);

        if !live.task.is_run_once() {
            return false;
        }

        let retry_interval = live.task.retry_on_error_interval();
        live.safe_ops(|state| {
            if state.retries_on_error == 0 {
                return true;
            }
            state.retries_on_error -= 1;
            live.reset_timer_locked(state, retry_interval);
            false
        })
    }

    /// Applies the first matching reschedule policy that has budget left.
    ///
    /// Returns `false` when no policy matches or every matching policy is
    /// exhausted, in which case the failure goes through generic handling.
    fn reschedule_task_on_error(&self, live: &Arc<LiveTask>, err: &TaskError) -> bool {
        let rescheduled = live.safe_ops(|state| {
            let policy = state
                .reschedule_on_error
                .iter_mut()
                .find(|policy| policy.count() > 0 && policy.matches(&**err))?;
            policy.consume();
            let (interval, reschedules_left) = (policy.interval(), policy.count());
            live.reset_timer_locked(state, interval);
            Some(reschedules_left)
        });

        let Some(reschedules_left) = rescheduled else {
            return false;
        };

        self.logger.info(format_args!(
            "task (id: {}) has been rescheduled on error: {}, reschedules left: {}",
            live.id(),
            err,
            reschedules_left
        ));
        self.event_bus.publish(SchedulerEvent::TaskRescheduled {
            task_id: live.id().to_string(),
            timestamp: Utc::now(),
            error: err.to_string(),
            reschedules_left,
        });
        true
    }
}

impl Drop for SchedulerInner {
    fn drop(&mut self) {
        let tasks = self.tasks.get_mut().unwrap_or_else(PoisonError::into_inner);
        if tasks.is_empty() {
            return;
        }

        self.logger.warn(format_args!(
            "scheduler dropped with {} tasks still registered",
            tasks.len()
        ));
        for live in tasks.values() {
            live.safe_ops(|state| {
                live.cancel_locked(state);
                live.task.context().cancel();
                if let Some(timer) = state.timer.take() {
                    timer.stop();
                }
            });
        }
        tasks.clear();
    }
}

/// Builds the timer callback for a task. Holds weak references only, so a
/// dropped scheduler or removed task turns pending fires into no-ops.
fn exec_callback(scheduler: Weak<SchedulerInner>, task: Weak<LiveTask>) -> TimerCallback {
    Arc::new(move || {
        let scheduler = scheduler.clone();
        let task = task.clone();
        Box::pin(async move {
            if let (Some(scheduler), Some(task)) = (scheduler.upgrade(), task.upgrade()) {
                scheduler.exec_task(task).await;
            }
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::tests::CapturingLogger;
    use crate::logger::Level;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn noop_task() -> Task {
        Task::new(|| async { Ok(()) }).with_err_func(|_| {})
    }

    fn counting_task(counter: &Arc<AtomicU32>) -> Task {
        let counter = Arc::clone(counter);
        Task::new(move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        })
        .with_err_func(|_| {})
    }

    #[test]
    fn test_scheduler_config_default() {
        let config = SchedulerConfig::default();
        assert_eq!(config.worker_limit, 0);
        assert_eq!(config.task_limit, 0);
    }

    #[test]
    fn test_validate_order() {
        assert_eq!(validate(&Task::default()), Err(TasktickError::TaskFuncNotSet));

        let no_err_func = Task::new(|| async { Ok(()) });
        assert_eq!(validate(&no_err_func), Err(TasktickError::ErrFuncNotSet));

        assert_eq!(validate(&noop_task()), Err(TasktickError::IntervalEmpty));

        let retries = noop_task().run_once().with_retries_on_error(3, Duration::ZERO);
        assert_eq!(validate(&retries), Err(TasktickError::RetryOnErrorIntervalEmpty));

        assert_eq!(validate(&noop_task().run_once()), Ok(()));
        assert_eq!(validate(&noop_task().with_interval(Duration::from_secs(1))), Ok(()));
    }

    #[tokio::test]
    async fn test_add_with_id_does_not_touch_callers_task() {
        let scheduler = Scheduler::new();
        let task = noop_task().with_interval(Duration::from_secs(60));

        scheduler.add_with_id("first", &task).unwrap();

        assert!(task.id().is_empty());
        assert!(task.context().token().is_none());
        assert_eq!(scheduler.lookup("first").unwrap().context().id(), "first");

        scheduler.stop();
    }

    #[tokio::test]
    async fn test_add_generates_distinct_ids() {
        let scheduler = Scheduler::new();
        let task = noop_task().with_interval(Duration::from_secs(60));

        let first = scheduler.add(&task).unwrap();
        let second = scheduler.add(&task).unwrap();

        assert_ne!(first, second);
        assert_eq!(scheduler.len(), 2);

        scheduler.stop();
        assert!(scheduler.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_huge_worker_limit_is_capped() {
        let scheduler = Scheduler::with_config(SchedulerConfig {
            worker_limit: usize::MAX,
            task_limit: 0,
        });
        assert_eq!(scheduler.config().worker_limit, usize::MAX);

        let counter = Arc::new(AtomicU32::new(0));
        scheduler
            .add_with_id("capped", &counting_task(&counter).run_once())
            .unwrap();

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_add_retries_taken_id() {
        let logger = Arc::new(CapturingLogger::default());
        let scheduler = Scheduler::with_logger(SchedulerConfig::default(), logger.clone());
        let task = noop_task().with_interval(Duration::from_secs(60));

        scheduler.add_with_id("taken", &task).unwrap();

        let mut ids = vec!["fresh".to_string(), "taken".to_string()];
        let id = scheduler
            .add_generated(&task, || ids.pop().unwrap_or_default())
            .unwrap();

        assert_eq!(id, "fresh");
        assert_eq!(scheduler.len(), 2);
        assert!(logger.contains(Level::Info, "id 'taken' is already in use, another attempt to add"));

        scheduler.stop();
    }

    #[tokio::test]
    async fn test_lookup_missing_task() {
        let scheduler = Scheduler::new();

        let result = scheduler.lookup("nonexistent-id");
        assert_eq!(result.unwrap_err(), TasktickError::TaskNotFound("nonexistent-id".to_string()));
        assert!(!scheduler.has("nonexistent-id"));
    }

    #[tokio::test]
    async fn test_del_is_idempotent() {
        let scheduler = Scheduler::new();
        scheduler
            .add_with_id("task", &noop_task().with_interval(Duration::from_secs(1)))
            .unwrap();

        scheduler.del("task");
        scheduler.del("task");
        scheduler.del("never-added");

        assert!(!scheduler.has("task"));
    }

    #[tokio::test]
    async fn test_stale_remove_keeps_new_registration() {
        let scheduler = Scheduler::new();
        let task = noop_task().with_interval(Duration::from_secs(60));

        scheduler.add_with_id("same", &task).unwrap();
        let stale = scheduler.inner.get("same").unwrap();
        scheduler.del("same");

        scheduler.add_with_id("same", &task).unwrap();
        scheduler.inner.remove(&stale);

        assert!(scheduler.has("same"));
        scheduler.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_logger_receives_lifecycle_lines() {
        let logger = Arc::new(CapturingLogger::default());
        let scheduler = Scheduler::with_logger(SchedulerConfig::default(), logger.clone());

        let counter = Arc::new(AtomicU32::new(0));
        scheduler
            .add_with_id("logged", &counting_task(&counter).run_once())
            .unwrap();

        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert!(logger.contains(Level::Debug, "task (id: logged) has been scheduled at"));
        assert!(logger.contains(Level::Debug, "task (id: logged) has been successfully executed"));
        assert!(logger.contains(Level::Debug, "task (id: logged) has been removed"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_is_logged_with_retries_left() {
        let logger = Arc::new(CapturingLogger::default());
        let scheduler = Scheduler::with_logger(SchedulerConfig::default(), logger.clone());

        let task = Task::new(|| async { Err("some error".into()) })
            .with_err_func(|_| {})
            .run_once()
            .with_retries_on_error(1, Duration::from_millis(10));
        scheduler.add_with_id("failing", &task).unwrap();

        tokio::time::sleep(Duration::from_millis(100)).await;

        assert!(logger.contains(Level::Error, "task (id: failing, retries left: 1) failed: some error"));
        assert!(logger.contains(Level::Error, "task (id: failing, retries left: 0) failed: some error"));
        assert!(!scheduler.has("failing"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_closes_worker_pool() {
        let scheduler = Scheduler::with_config(SchedulerConfig {
            worker_limit: 1,
            task_limit: 0,
        });
        scheduler
            .add_with_id("task", &noop_task().with_interval(Duration::from_millis(10)))
            .unwrap();

        scheduler.stop();

        assert!(scheduler.is_empty());
        let workers = scheduler.inner.workers.as_ref().unwrap();
        assert!(matches!(
            workers.try_acquire(),
            Err(tokio::sync::TryAcquireError::Closed)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_scheduler_cancels_tasks() {
        let token = tokio_util::sync::CancellationToken::new();
        let scheduler = Scheduler::with_logger(SchedulerConfig::default(), Arc::new(crate::logger::NoopLogger));
        scheduler
            .add_with_id(
                "task",
                &noop_task()
                    .with_interval(Duration::from_millis(10))
                    .with_context(crate::TaskContext::cancellable(token.clone())),
            )
            .unwrap();

        drop(scheduler);
        assert!(token.is_cancelled());
    }
}
