use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tasktick::{Scheduler, NoopLogger, SchedulerConfig, Task};

fn quiet_scheduler(config: SchedulerConfig) -> Scheduler {
    Scheduler::with_logger(config, Arc::new(NoopLogger))
}

fn recurring_task() -> Task {
    Task::new(|| async { Ok(()) })
        .with_err_func(|_| {})
        .with_interval(Duration::from_secs(3600))
}

fn bench_task_creation(c: &mut Criterion) {
    c.bench_function("task_creation", |b| {
        b.iter(|| {
            Task::new(|| async { Ok(()) })
                .with_err_func(|_| {})
                .run_once()
                .with_retries_on_error(3, Duration::from_secs(1))
        });
    });
}

fn bench_scheduler_add_tasks(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let _guard = runtime.enter();

    let mut group = c.benchmark_group("scheduler_add_tasks");

    for task_count in [10, 50, 100, 500].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(task_count),
            task_count,
            |b, &count| {
                let task = recurring_task();
                b.iter(|| {
                    let scheduler = quiet_scheduler(SchedulerConfig::default());
                    for _ in 0..count {
                        scheduler.add(&task).unwrap();
                    }
                    scheduler.stop();
                    black_box(scheduler);
                });
            },
        );
    }

    group.finish();
}

fn bench_task_snapshots(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let _guard = runtime.enter();

    let scheduler = quiet_scheduler(SchedulerConfig::default());
    let task = recurring_task();
    let ids: Vec<String> = (0..500).map(|_| scheduler.add(&task).unwrap()).collect();

    c.bench_function("lookup", |b| {
        b.iter(|| scheduler.lookup(black_box(&ids[250])).unwrap());
    });

    c.bench_function("tasks_500", |b| {
        b.iter(|| black_box(scheduler.tasks()));
    });

    scheduler.stop();
}

fn bench_run_once_throughput(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();

    let mut group = c.benchmark_group("run_once_throughput");

    for worker_limit in [0, 4].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(worker_limit),
            worker_limit,
            |b, &worker_limit| {
                b.to_async(&runtime).iter(|| async move {
                    let scheduler = quiet_scheduler(SchedulerConfig {
                        worker_limit,
                        task_limit: 0,
                    });
                    let done = Arc::new(AtomicUsize::new(0));

                    for _ in 0..100 {
                        let done = Arc::clone(&done);
                        let task = Task::new(move || {
                            let done = Arc::clone(&done);
                            async move {
                                tokio::time::sleep(Duration::from_micros(100)).await;
                                done.fetch_add(1, Ordering::SeqCst);
                                Ok(())
                            }
                        })
                        .with_err_func(|_| {})
                        .run_once();
                        scheduler.add(&task).unwrap();
                    }

                    while done.load(Ordering::SeqCst) < 100 {
                        tokio::time::sleep(Duration::from_millis(1)).await;
                    }
                    scheduler.stop();
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_task_creation,
    bench_scheduler_add_tasks,
    bench_task_snapshots,
    bench_run_once_throughput
);
criterion_main!(benches);
