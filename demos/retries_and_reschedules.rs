use std::error::Error;
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use log::{info, warn};
use tasktick::{logger, Scheduler, SchedulerConfig, SchedulerEvent, Task, TaskContext};
use tokio_util::sync::CancellationToken;

// Error an upstream API returns when it wants us to back off
#[derive(Debug, PartialEq)]
struct RateLimited;

impl fmt::Display for RateLimited {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("upstream rate limited")
    }
}

impl Error for RateLimited {}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    logger::init()?;

    info!("Starting retries and reschedules example");

    let scheduler = Scheduler::with_config(SchedulerConfig {
        worker_limit: 2,
        task_limit: 10,
    });

    // Print lifecycle events as they happen
    let mut events = scheduler.event_bus().subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                SchedulerEvent::TaskFailed { task_id, error, retries_left, .. } => {
                    warn!("[event] {} failed ({}), {} retries left", task_id, error, retries_left)
                }
                SchedulerEvent::TaskRescheduled { task_id, reschedules_left, .. } => {
                    info!("[event] {} backed off, {} reschedules left", task_id, reschedules_left)
                }
                SchedulerEvent::TaskRemoved { task_id, .. } => info!("[event] {} removed", task_id),
                _ => {}
            }
        }
    });

    // Fails twice, then succeeds on the second retry
    let attempts = Arc::new(AtomicU32::new(0));
    let counter = Arc::clone(&attempts);
    scheduler.add_with_id(
        "flaky-upload",
        &Task::new(move || {
            let counter = Arc::clone(&counter);
            async move {
                let attempt = counter.fetch_add(1, Ordering::SeqCst) + 1;
                if attempt < 3 {
                    return Err(format!("connection reset on attempt {}", attempt).into());
                }
                info!("Upload succeeded on attempt {}", attempt);
                Ok(())
            }
        })
        .with_err_func(|err| warn!("Upload error: {}", err))
        .run_once()
        .with_interval(Duration::from_millis(500))
        .with_retries_on_error(3, Duration::from_millis(500)),
    )?;

    // Rate limited three times; each one waits a second without calling the
    // error handler, then the fourth failure falls through to it
    scheduler.add_with_id(
        "poll-upstream",
        &Task::new(|| async { Err(RateLimited.into()) })
            .with_err_func(|err| warn!("Giving up on upstream: {}", err))
            .run_once()
            .with_interval(Duration::from_millis(200))
            .with_reschedule_on_error(RateLimited, Duration::from_secs(1), 3),
    )?;

    // A long-running task that watches its context and stops when deleted
    let shutdown = CancellationToken::new();
    scheduler.add_with_id(
        "long-export",
        &Task::default()
            .with_context_func(|ctx| async move {
                info!("Export {} started", ctx.id());
                tokio::select! {
                    _ = ctx.cancelled() => {
                        info!("Export {} cancelled", ctx.id());
                        Ok(())
                    }
                    _ = tokio::time::sleep(Duration::from_secs(60)) => Ok(()),
                }
            })
            .with_context_err_func(|ctx, err| warn!("Export {} failed: {}", ctx.id(), err))
            .with_context(TaskContext::cancellable(shutdown.clone()))
            .run_once(),
    )?;

    tokio::time::sleep(Duration::from_secs(2)).await;
    scheduler.del("long-export");
    info!("Export token cancelled: {}", shutdown.is_cancelled());

    tokio::time::sleep(Duration::from_secs(4)).await;

    info!("Tasks left: {}", scheduler.len());
    scheduler.stop();
    Ok(())
}
