use std::sync::{mpsc, Arc};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use vitrine_stock::{run_sweep, AlertSink, StockLedger, SweepSchedule, DEFAULT_SWEEP_INTERVAL};

/// Config for the low-stock monitor runner.
#[derive(Debug, Clone)]
pub struct LowStockRunner {
    pub interval: Duration,
    pub max_retries: u32,
    pub base_backoff: Duration,
}

impl Default for LowStockRunner {
    fn default() -> Self {
        Self {
            interval: DEFAULT_SWEEP_INTERVAL,
            max_retries: 5,
            base_backoff: Duration::from_millis(250),
        }
    }
}

/// Handle for the running monitor (shutdown + trigger hook).
#[derive(Debug)]
pub struct LowStockRunnerHandle {
    shutdown: mpsc::Sender<()>,
    trigger: mpsc::SyncSender<()>,
    join: Option<thread::JoinHandle<()>>,
}

impl LowStockRunnerHandle {
    /// Ask for an out-of-cadence sweep (e.g. after a bulk stock import).
    ///
    /// Backpressure: triggers are coalesced (bounded queue). If a sweep is
    /// already pending, this becomes a no-op.
    pub fn trigger(&self) {
        // Coalesce: channel capacity=1; ignore if already full.
        let _ = self.trigger.try_send(());
    }

    /// Gracefully stop the monitor thread.
    pub fn shutdown(mut self) {
        let _ = self.shutdown.send(());
        if let Some(j) = self.join.take() {
            let _ = j.join();
        }
    }
}

impl LowStockRunner {
    /// Spawn the monitor on a dedicated named thread.
    ///
    /// - Schedule: one sweep per `interval`, cadence kept stable even after
    ///   delays (see `SweepSchedule`)
    /// - Failures: logged + retried with bounded exponential backoff; never
    ///   propagated and never fatal to the thread
    pub fn spawn<L, S>(&self, name: &'static str, ledger: Arc<L>, sink: Arc<S>) -> LowStockRunnerHandle
    where
        L: StockLedger + 'static,
        S: AlertSink + 'static,
    {
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();
        let (trigger_tx, trigger_rx) = mpsc::sync_channel::<()>(1);

        let cfg = self.clone();
        let join = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || runner_loop(name, cfg, shutdown_rx, trigger_rx, ledger, sink))
            .expect("failed to spawn low-stock monitor thread");

        LowStockRunnerHandle {
            shutdown: shutdown_tx,
            trigger: trigger_tx,
            join: Some(join),
        }
    }
}

fn runner_loop<L, S>(
    name: &'static str,
    cfg: LowStockRunner,
    shutdown_rx: mpsc::Receiver<()>,
    trigger_rx: mpsc::Receiver<()>,
    ledger: Arc<L>,
    sink: Arc<S>,
) where
    L: StockLedger + 'static,
    S: AlertSink + 'static,
{
    info!(runner = name, interval_secs = cfg.interval.as_secs(), "low-stock monitor started");

    let mut schedule = SweepSchedule::new(cfg.interval, Instant::now());
    let mut pending = true; // sweep once on startup
    let mut failures: u32 = 0;
    let mut backoff_until: Option<Instant> = None;

    loop {
        // Shutdown has priority.
        if shutdown_rx.try_recv().is_ok() {
            break;
        }

        if schedule.due(Instant::now()) {
            pending = true;
        }

        // Manual trigger: non-blocking drain to coalesce multiple triggers.
        while trigger_rx.try_recv().is_ok() {
            pending = true;
        }

        // Backoff gate.
        if let Some(until) = backoff_until {
            if Instant::now() < until {
                thread::sleep(Duration::from_millis(50));
                continue;
            }
            backoff_until = None;
        }

        if !pending {
            // Wait until next tick or trigger or shutdown.
            let sleep_for = schedule
                .time_to_next(Instant::now())
                .min(Duration::from_millis(250));
            thread::sleep(sleep_for);
            continue;
        }

        pending = false;

        match run_sweep(ledger.as_ref(), sink.as_ref()) {
            Ok(report) => {
                failures = 0;
                debug!(
                    runner = name,
                    scanned = report.scanned,
                    alerted = report.alerted,
                    emit_failures = report.emit_failures,
                    "low-stock sweep completed"
                );
            }
            Err(e) => {
                warn!(runner = name, error = %e, "low-stock sweep failed");
                failures += 1;
                if failures <= cfg.max_retries {
                    pending = true;
                    backoff_until = Some(Instant::now() + backoff(cfg.base_backoff, failures));
                } else {
                    // Give up on this tick; the next scheduled sweep retries.
                    failures = 0;
                }
            }
        }
    }

    info!(runner = name, "low-stock monitor stopped");
}

fn backoff(base: Duration, attempt: u32) -> Duration {
    // Exponential backoff: base * 2^(attempt-1), capped.
    let pow = 1u32 << attempt.saturating_sub(1).min(10);
    let ms = base.as_millis().saturating_mul(pow as u128);
    Duration::from_millis(ms.min(10_000) as u64)
}
