use std::error::Error;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use log::info;
use tasktick::{logger, Scheduler, Task};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize the logger
    logger::init()?;

    info!("Starting basic scheduler example");

    let scheduler = Scheduler::new();
    let heartbeats = Arc::new(AtomicU32::new(0));

    // Add a task that runs every second
    let counter = Arc::clone(&heartbeats);
    let heartbeat = scheduler.add(
        &Task::new(move || {
            let counter = Arc::clone(&counter);
            async move {
                let beat = counter.fetch_add(1, Ordering::SeqCst) + 1;
                info!("Heartbeat #{}", beat);
                Ok(())
            }
        })
        .with_err_func(|err| log::error!("Heartbeat failed: {}", err))
        .with_interval(Duration::from_secs(1)),
    )?;

    // Add a slow task; its ticks keep their cadence while a run is in flight
    scheduler.add_with_id(
        "slow-report",
        &Task::new(|| async {
            info!("Building report...");
            tokio::time::sleep(Duration::from_secs(3)).await;
            info!("Report done");
            Ok(())
        })
        .with_err_func(|err| log::error!("Report failed: {}", err))
        .with_interval(Duration::from_secs(2)),
    )?;

    // Add a one-shot task that waits two seconds before its first run
    scheduler.add_with_id(
        "warm-up",
        &Task::new(|| async {
            info!("Warm-up ran once");
            Ok(())
        })
        .with_err_func(|err| log::error!("Warm-up failed: {}", err))
        .with_start_after(Utc::now() + chrono::Duration::seconds(2))
        .run_once(),
    )?;

    for (id, task) in scheduler.tasks() {
        info!("Registered task '{}' (interval: {:?}, run once: {})", id, task.interval(), task.is_run_once());
    }

    tokio::time::sleep(Duration::from_secs(10)).await;

    info!("Removing heartbeat after {} beats", heartbeats.load(Ordering::SeqCst));
    scheduler.del(&heartbeat);
    info!("warm-up still registered: {}", scheduler.has("warm-up"));

    tokio::time::sleep(Duration::from_secs(3)).await;

    info!("Stopping scheduler...");
    scheduler.stop();

    info!("Scheduler stopped. Example complete.");
    Ok(())
}
