use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use unbound_exporter_application::use_cases::PollStatsUseCase;
use unbound_exporter_domain::DomainError;

const DEFAULT_INTERVAL_SECS: u64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PollState {
    Idle = 0,
    Fetching = 1,
}

/// Fixed-interval fetch → apply loop.
///
/// The first cycle runs as soon as the job starts. A cycle that overruns the
/// interval pushes the next tick back instead of triggering a burst. The
/// shutdown token is only observed between cycles, so an apply in progress
/// always completes.
pub struct StatsPollJob {
    poll: Arc<PollStatsUseCase>,
    interval: Duration,
    state: AtomicU8,
    shutdown: CancellationToken,
}

impl StatsPollJob {
    pub fn new(poll: Arc<PollStatsUseCase>) -> Self {
        Self {
            poll,
            interval: Duration::from_secs(DEFAULT_INTERVAL_SECS),
            state: AtomicU8::new(PollState::Idle as u8),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn with_interval(mut self, interval_secs: u64) -> Self {
        self.interval = Duration::from_secs(interval_secs);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub fn state(&self) -> PollState {
        match self.state.load(Ordering::Acquire) {
            1 => PollState::Fetching,
            _ => PollState::Idle,
        }
    }

    pub async fn start(self: Arc<Self>) {
        info!(
            interval_secs = self.interval.as_secs(),
            "Starting stats poll job"
        );

        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    info!("StatsPollJob: shutting down");
                    break;
                }
                _ = interval.tick() => {
                    self.run_cycle().await;
                }
            }
        }
    }

    async fn run_cycle(&self) {
        self.state.store(PollState::Fetching as u8, Ordering::Release);

        match self.poll.execute().await {
            Ok(outcome) => {
                info!(
                    top_queried = outcome.top_queried,
                    top_blocked = outcome.top_blocked,
                    "Stats poll cycle completed"
                );
            }
            // Already logged and counted by the use case.
            Err(DomainError::Fetch(_)) => {}
            Err(DomainError::PartialApply { fields }) => {
                warn!(
                    failed_fields = fields.len(),
                    fields = ?fields,
                    "Stats poll cycle applied partially"
                );
            }
            Err(e) => {
                warn!(error = %e, "Stats poll cycle failed");
            }
        }

        self.state.store(PollState::Idle as u8, Ordering::Release);
    }
}
