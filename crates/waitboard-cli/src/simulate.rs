//! Simulated parallel transfers for the demo command.
//!
//! Each stream is a tokio task that counts its remaining bytes down at its own
//! pace and reports through a shared `ProgressReporter`. Speeds are derived
//! from the stream index so runs are reproducible.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::task::JoinSet;
use waitboard_engine::ProgressReporter;

use crate::commands::DemoArgs;

/// One simulated transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamPlan {
    pub label: String,
    pub size: u64,
    /// Bytes transferred per tick.
    pub chunk: u64,
    /// Whether the producer knows the total up front.
    pub known_size: bool,
    /// Remaining byte count at which the stream is cancelled.
    pub cancel_at: Option<u64>,
}

/// The full simulated workload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoPlan {
    pub streams: Vec<StreamPlan>,
    pub tick: Duration,
}

impl DemoPlan {
    /// Derive a workload from the command-line options.
    pub fn from_args(args: &DemoArgs) -> Self {
        let base = args.size_kib.max(1) * 1024;
        let every = |n: Option<usize>, i: usize| n.is_some_and(|n| n > 0 && (i + 1) % n == 0);

        let streams = (0..args.streams)
            .map(|i| {
                let size = base * (1 + (i as u64 % 3));
                // Between 20 and 80 ticks per stream
                let steps = 20 + (i as u64 * 7 % 13) * 5;
                StreamPlan {
                    label: format!("file-{:02}.bin", i + 1),
                    size,
                    chunk: size.div_ceil(steps).max(1),
                    known_size: !every(args.unknown_every, i),
                    cancel_at: every(args.cancel_every, i).then_some(size / 2),
                }
            })
            .collect();

        Self {
            streams,
            tick: Duration::from_millis(args.tick_ms),
        }
    }

    /// Sum of sizes the status line tracks (streams with a known total).
    pub fn known_total(&self) -> u64 {
        self.streams
            .iter()
            .filter(|s| s.known_size)
            .map(|s| s.size)
            .sum()
    }
}

/// How the simulated workload ended.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DemoOutcome {
    pub completed: usize,
    pub cancelled: usize,
}

/// Overall byte counters shared by producers and the status task.
#[derive(Debug, Default)]
struct Totals {
    remaining: AtomicU64,
    total: AtomicU64,
}

/// Run every stream to completion (or cancellation).
pub async fn run_demo(plan: &DemoPlan, reporter: &ProgressReporter) -> DemoOutcome {
    let known_total = plan.known_total();
    let totals = Arc::new(Totals {
        remaining: AtomicU64::new(known_total),
        total: AtomicU64::new(known_total),
    });

    reporter.set_description(format!("Starting {} transfers", plan.streams.len()));

    let status = tokio::spawn(report_totals(
        reporter.clone(),
        Arc::clone(&totals),
        plan.tick * 2,
    ));

    let mut producers = JoinSet::new();
    for stream in plan.streams.iter().cloned() {
        producers.spawn(run_stream(
            stream,
            reporter.clone(),
            Arc::clone(&totals),
            plan.tick,
        ));
    }

    let mut outcome = DemoOutcome::default();
    while let Some(result) = producers.join_next().await {
        match result {
            Ok(true) => outcome.completed += 1,
            Ok(false) => outcome.cancelled += 1,
            Err(e) => tracing::warn!(error = %e, "Producer task failed"),
        }
    }

    status.abort();
    reporter.set_main_bytes(
        totals.remaining.load(Ordering::Relaxed),
        totals.total.load(Ordering::Relaxed),
    );
    outcome
}

/// Returns `true` if the stream completed, `false` if it was cancelled.
async fn run_stream(
    plan: StreamPlan,
    reporter: ProgressReporter,
    totals: Arc<Totals>,
    tick: Duration,
) -> bool {
    let reported_total = if plan.known_size { plan.size } else { 0 };
    let mut remaining = plan.size;
    reporter.report_progress(plan.label.clone(), remaining, reported_total);

    while remaining > 0 {
        tokio::time::sleep(tick).await;

        if plan.cancel_at.is_some_and(|at| remaining <= at) {
            if plan.known_size {
                totals.remaining.fetch_sub(remaining, Ordering::Relaxed);
                totals.total.fetch_sub(plan.size, Ordering::Relaxed);
            }
            reporter.remove(plan.label.clone());
            reporter.add_log_message(format!("{} cancelled", plan.label));
            return false;
        }

        let step = plan.chunk.min(remaining);
        remaining -= step;
        if plan.known_size {
            totals.remaining.fetch_sub(step, Ordering::Relaxed);
        }
        reporter.report_progress(plan.label.clone(), remaining, reported_total);
    }

    if !plan.known_size {
        // The size is known once the transfer ends
        reporter.report_progress(plan.label.clone(), 0, plan.size);
    }
    reporter.add_log_message(format!("{} finished", plan.label));
    true
}

async fn report_totals(reporter: ProgressReporter, totals: Arc<Totals>, every: Duration) {
    let mut ticker = tokio::time::interval(every.max(Duration::from_millis(1)));
    loop {
        ticker.tick().await;
        reporter.set_main_bytes(
            totals.remaining.load(Ordering::Relaxed),
            totals.total.load(Ordering::Relaxed),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waitboard_engine::{BoardRunner, BoardSettings, ChannelBoardEmitter};

    fn args(streams: usize) -> DemoArgs {
        DemoArgs {
            streams,
            size_kib: 4,
            tick_ms: 1,
            ..DemoArgs::default()
        }
    }

    #[test]
    fn test_plan_is_deterministic() {
        let plan = DemoPlan::from_args(&args(4));
        assert_eq!(plan, DemoPlan::from_args(&args(4)));
        assert_eq!(plan.streams.len(), 4);
        assert_eq!(plan.streams[0].label, "file-01.bin");
        assert_eq!(plan.streams[1].size, 8 * 1024);
        assert!(plan.streams.iter().all(|s| s.chunk > 0 && s.known_size));
    }

    #[test]
    fn test_unknown_and_cancelled_streams() {
        let plan = DemoPlan::from_args(&DemoArgs {
            unknown_every: Some(2),
            cancel_every: Some(3),
            ..args(6)
        });

        let known: Vec<bool> = plan.streams.iter().map(|s| s.known_size).collect();
        assert_eq!(known, [true, false, true, false, true, false]);
        assert!(plan.streams[2].cancel_at.is_some());
        assert!(plan.streams[5].cancel_at.is_some());
        assert!(plan.streams[0].cancel_at.is_none());
        assert_eq!(
            plan.known_total(),
            plan.streams[0].size + plan.streams[2].size + plan.streams[4].size
        );
    }

    #[tokio::test]
    async fn test_demo_runs_to_completion() {
        let plan = DemoPlan::from_args(&DemoArgs {
            unknown_every: Some(3),
            cancel_every: Some(4),
            ..args(5)
        });
        let (emitter, _events) = ChannelBoardEmitter::channel();
        let handle = BoardRunner::spawn(&BoardSettings::with_defaults(), Arc::new(emitter)).unwrap();
        let reporter = handle.reporter();

        let outcome = run_demo(&plan, &reporter).await;
        reporter.finish();
        let snapshot = handle.shutdown().await.unwrap();

        assert_eq!(outcome, DemoOutcome { completed: 4, cancelled: 1 });
        assert_eq!(snapshot.len(), 4);
        assert_eq!(snapshot.completed_count(), 4);
        assert!(snapshot.main.finished);
        assert!(snapshot.main.log.iter().any(|l| l == "file-04.bin cancelled"));
    }
}
