//! Background worker that runs the reward handoff for finished duels.
//!
//! The action path only enqueues a [`RewardJob`]; the transfer itself happens
//! here so the caller that landed the finishing blow gets its response without
//! waiting on the character service.

use duel_core::{DuelId, Termination};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info};

use crate::auth::AuthToken;
use crate::events::{DuelEvent, EventBus};
use crate::termination::{RewardOutcome, TerminationHandler};

/// One finished duel awaiting its reward handoff.
#[derive(Debug, Clone)]
pub struct RewardJob {
    pub duel_id: DuelId,
    pub termination: Termination,
    pub token: AuthToken,
}

/// Sending half of the reward queue.
#[derive(Clone)]
pub struct RewardDispatcher {
    job_tx: mpsc::Sender<RewardJob>,
}

impl RewardDispatcher {
    pub fn new(job_tx: mpsc::Sender<RewardJob>) -> Self {
        Self { job_tx }
    }

    /// Queues a job. Waits for room when the queue is full.
    pub async fn dispatch(&self, job: RewardJob) {
        let duel_id = job.duel_id;
        if self.job_tx.send(job).await.is_err() {
            error!(
                target: "duel::reward",
                duel = %duel_id,
                "reward worker stopped, dropping reward job"
            );
        }
    }
}

pub struct RewardWorker {
    handler: TerminationHandler,
    job_rx: mpsc::Receiver<RewardJob>,
    shutdown_rx: oneshot::Receiver<()>,
    events: EventBus,
}

impl RewardWorker {
    pub fn new(
        handler: TerminationHandler,
        job_rx: mpsc::Receiver<RewardJob>,
        shutdown_rx: oneshot::Receiver<()>,
        events: EventBus,
    ) -> Self {
        Self {
            handler,
            job_rx,
            shutdown_rx,
            events,
        }
    }

    /// Main worker loop.
    ///
    /// On shutdown the queue is closed and every job already accepted is
    /// still processed before the worker exits.
    pub async fn run(mut self) {
        info!(target: "duel::reward", "RewardWorker started");

        loop {
            tokio::select! {
                // A dropped sender counts as a shutdown request.
                _ = &mut self.shutdown_rx => {
                    debug!(target: "duel::reward", "shutdown requested");
                    break;
                }
                job = self.job_rx.recv() => {
                    match job {
                        Some(job) => self.process(job).await,
                        None => {
                            debug!(target: "duel::reward", "reward queue closed");
                            break;
                        }
                    }
                }
            }
        }

        self.job_rx.close();
        let mut drained = 0usize;
        while let Some(job) = self.job_rx.recv().await {
            self.process(job).await;
            drained += 1;
        }

        info!(target: "duel::reward", drained, "RewardWorker stopped");
    }

    async fn process(&self, job: RewardJob) {
        let RewardJob {
            duel_id,
            termination,
            token,
        } = job;

        let outcome = self.handler.on_terminate(&termination, &token).await;
        let event = match outcome {
            RewardOutcome::Transferred { item_id } => DuelEvent::RewardTransferred {
                duel_id,
                item_id,
                from: termination.loser,
                to: termination.winner,
            },
            RewardOutcome::NoItems | RewardOutcome::MissingItemId => DuelEvent::RewardSkipped {
                duel_id,
                loser: termination.loser,
            },
            RewardOutcome::Failed(error) => DuelEvent::RewardFailed {
                duel_id,
                loser: termination.loser,
                error: error.to_string(),
            },
        };
        self.events.publish(event);
    }
}
