// DB Migrator Operation Simulator
//
// Emulates asynchronous backend activity by replaying canned scripts into the
// console buffer on tokio timers. Every triggered operation gets a handle that
// can be cancelled; whether a new operation cancels the outstanding ones is a
// configuration choice.

use log::{debug, info};
use migrator_utils::{ConsoleLog, LogLevel};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::{broadcast, watch};
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use super::buffer::{LogBuffer, TrimPolicy};
use super::script::OperationKind;

/// What happens to outstanding operations when another one is triggered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlapPolicy {
    /// Scripts run side by side and interleave by absolute time
    #[default]
    Interleave,
    /// Starting an operation cancels every outstanding one
    CancelPrevious,
}

#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    pub overlap: OverlapPolicy,

    /// Capacity of the live log broadcast; slow subscribers lag past it
    pub broadcast_capacity: usize,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            overlap: OverlapPolicy::Interleave,
            broadcast_capacity: 256,
        }
    }
}

/// How a simulated operation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationOutcome {
    Completed,
    Cancelled,
}

/// Handle to one triggered operation.
///
/// Dropping the handle does not cancel the operation.
#[derive(Debug, Clone)]
pub struct OperationHandle {
    id: Uuid,
    kind: OperationKind,
    token: CancellationToken,
    outcome: watch::Receiver<Option<OperationOutcome>>,
}

impl OperationHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    /// Stop any steps that have not landed yet. Idempotent.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.borrow().is_some()
    }

    /// Wait until the last step landed or the operation was cancelled.
    pub async fn wait(&self) -> OperationOutcome {
        let mut rx = self.outcome.clone();
        loop {
            let current = *rx.borrow();
            if let Some(outcome) = current {
                return outcome;
            }
            if rx.changed().await.is_err() {
                return OperationOutcome::Cancelled;
            }
        }
    }
}

/// Console log service: the buffer plus the four canned operations.
///
/// Cloning yields another handle to the same buffer. Triggering an operation
/// spawns a tokio task, so it must happen inside a runtime.
#[derive(Clone)]
pub struct OperationSimulator {
    buffer: Arc<Mutex<LogBuffer>>,
    outstanding: Arc<Mutex<Vec<OperationHandle>>>,
    live: broadcast::Sender<ConsoleLog>,
    config: SimulatorConfig,
}

impl OperationSimulator {
    pub fn new(config: SimulatorConfig) -> Self {
        Self::with_buffer(LogBuffer::new(), config)
    }

    pub fn with_buffer(buffer: LogBuffer, config: SimulatorConfig) -> Self {
        let (live, _) = broadcast::channel(config.broadcast_capacity.max(1));
        Self {
            buffer: Arc::new(Mutex::new(buffer)),
            outstanding: Arc::new(Mutex::new(Vec::new())),
            live,
            config,
        }
    }

    fn lock_buffer(&self) -> MutexGuard<'_, LogBuffer> {
        // poisoned buffer is still consistent: pushes are atomic
        self.buffer.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_outstanding(&self) -> MutexGuard<'_, Vec<OperationHandle>> {
        self.outstanding
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Append one entry, stamped now
    pub fn append(&self, level: LogLevel, message: impl Into<String>) {
        self.append_batch(std::iter::once((level, message.into())));
    }

    fn append_batch(&self, lines: impl IntoIterator<Item = (LogLevel, String)>) {
        let mut buffer = self.lock_buffer();
        for (level, message) in lines {
            let log = buffer.append(level, message).clone();
            // no subscribers is fine
            let _ = self.live.send(log);
        }
    }

    /// Empty the history. Steps still pending keep landing afterwards.
    pub fn clear(&self) {
        self.lock_buffer().clear();
        debug!("Console cleared");
    }

    /// Empty the history and cancel every outstanding operation.
    pub fn clear_and_cancel(&self) {
        self.cancel_outstanding();
        self.clear();
    }

    /// Cancel every operation that has not finished yet.
    pub fn cancel_outstanding(&self) {
        let mut outstanding = self.lock_outstanding();
        for handle in outstanding.drain(..) {
            handle.cancel();
        }
    }

    /// Operations that still have steps pending
    pub fn outstanding(&self) -> usize {
        let mut outstanding = self.lock_outstanding();
        outstanding.retain(|handle| !handle.is_finished());
        outstanding.len()
    }

    pub fn len(&self) -> usize {
        self.lock_buffer().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock_buffer().is_empty()
    }

    /// Snapshot of the full history
    pub fn logs(&self) -> Vec<ConsoleLog> {
        self.lock_buffer().entries().to_vec()
    }

    /// Snapshot of what the console panel shows
    pub fn visible_logs(&self, max_lines: usize, policy: TrimPolicy) -> Vec<ConsoleLog> {
        self.lock_buffer().visible(max_lines, policy).to_vec()
    }

    /// Every entry appended from now on
    pub fn subscribe(&self) -> broadcast::Receiver<ConsoleLog> {
        self.live.subscribe()
    }

    pub fn run_migration(&self) -> OperationHandle {
        self.trigger(OperationKind::Migrate)
    }

    pub fn rollback(&self) -> OperationHandle {
        self.trigger(OperationKind::Rollback)
    }

    pub fn dry_run(&self) -> OperationHandle {
        self.trigger(OperationKind::DryRun)
    }

    pub fn show_sql(&self) -> OperationHandle {
        self.trigger(OperationKind::ShowSql)
    }

    /// Start `kind`'s script. Zero-delay steps land before this returns; the
    /// rest are scheduled relative to this call.
    pub fn trigger(&self, kind: OperationKind) -> OperationHandle {
        if self.config.overlap == OverlapPolicy::CancelPrevious {
            self.cancel_outstanding();
        }

        let start = Instant::now();
        let token = CancellationToken::new();
        let (outcome_tx, outcome_rx) = watch::channel(None);
        let handle = OperationHandle {
            id: Uuid::new_v4(),
            kind,
            token: token.clone(),
            outcome: outcome_rx,
        };
        info!("Starting simulated operation {} ({})", kind, handle.id);

        let mut steps = kind.script().into_iter().peekable();
        while let Some(step) = steps.next_if(|step| step.delay.is_zero()) {
            self.append_batch(step.lines.into_iter().map(|(l, m)| (l, m.to_string())));
        }
        let pending: Vec<_> = steps.collect();

        {
            let mut outstanding = self.lock_outstanding();
            outstanding.retain(|h| !h.is_finished());
            outstanding.push(handle.clone());
        }

        let simulator = self.clone();
        let id = handle.id;
        tokio::spawn(async move {
            for step in pending {
                tokio::select! {
                    _ = token.cancelled() => {
                        debug!("Simulated operation {} ({}) cancelled", kind, id);
                        let _ = outcome_tx.send(Some(OperationOutcome::Cancelled));
                        return;
                    },
                    _ = sleep_until(start + step.delay) => {},
                }
                simulator.append_batch(step.lines.into_iter().map(|(l, m)| (l, m.to_string())));
            }
            debug!("Simulated operation {} ({}) finished", kind, id);
            let _ = outcome_tx.send(Some(OperationOutcome::Completed));
        });

        handle
    }
}

impl Default for OperationSimulator {
    fn default() -> Self {
        Self::new(SimulatorConfig::default())
    }
}
