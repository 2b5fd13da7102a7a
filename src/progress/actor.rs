//! Single-writer access to a progress store
//!
//! When several event sources (for example two open sessions) feed the same
//! learner, mutations must be serialized. The store is moved into a task that
//! handles one request at a time; callers talk to it through a cloneable
//! [`ProgressHandle`].

use tokio::sync::{mpsc, oneshot};

use super::events::{ProgressEvent, XpSource};
use super::snapshot::{PartialSnapshot, ProgressSnapshot};
use super::store::ProgressStore;
use crate::error::AscendError;

/// Pending requests buffered before senders wait
const CHANNEL_CAPACITY: usize = 64;

/// A mutation forwarded to the store
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    CompleteLesson { lesson_id: String, week_number: u32 },
    CompleteTask { task_id: String, xp_awarded: u32 },
    CompleteQuiz { quiz_id: String, score: u8, xp_awarded: u32 },
    UpdateXp { amount: u32, source: XpSource },
    AddBadge { badge_id: String },
    UpdateTimeSpent { minutes: u32 },
    RecordStreak { days: u32 },
    ResetWeeklyCounters,
    ResetProgress,
    InitializeNewUser,
    InitializeExistingUser(PartialSnapshot),
}

impl Mutation {
    /// Apply to a store. Returns false for idempotent no-ops.
    pub fn apply(self, store: &mut ProgressStore) -> bool {
        match self {
            Mutation::CompleteLesson { lesson_id, week_number } => {
                store.complete_lesson(&lesson_id, week_number)
            }
            Mutation::CompleteTask { task_id, xp_awarded } => {
                store.complete_task(&task_id, xp_awarded)
            }
            Mutation::CompleteQuiz { quiz_id, score, xp_awarded } => {
                store.complete_quiz(&quiz_id, score, xp_awarded)
            }
            Mutation::UpdateXp { amount, source } => {
                store.update_xp(amount, source);
                true
            }
            Mutation::AddBadge { badge_id } => store.add_badge(&badge_id),
            Mutation::UpdateTimeSpent { minutes } => {
                store.update_time_spent(minutes);
                true
            }
            Mutation::RecordStreak { days } => {
                store.record_streak(days);
                true
            }
            Mutation::ResetWeeklyCounters => {
                store.reset_weekly_counters();
                true
            }
            Mutation::ResetProgress => {
                store.reset_progress();
                true
            }
            Mutation::InitializeNewUser => {
                store.initialize_new_user();
                true
            }
            Mutation::InitializeExistingUser(partial) => {
                store.initialize_existing_user(partial);
                true
            }
        }
    }
}

/// Result of one mutation, as seen by the caller
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    /// False when the mutation was an idempotent no-op
    pub applied: bool,
    /// Snapshot after the mutation settled
    pub snapshot: ProgressSnapshot,
    /// Events produced by this mutation
    pub events: Vec<ProgressEvent>,
}

/// Read-only query run on the actor task
type Query = Box<dyn FnOnce(&ProgressStore) + Send>;

enum Request {
    Mutate(Mutation, oneshot::Sender<Outcome>),
    Snapshot(oneshot::Sender<ProgressSnapshot>),
    Inspect(Query),
}

/// Cloneable handle to a store running on its own task
#[derive(Debug, Clone)]
pub struct ProgressHandle {
    tx: mpsc::Sender<Request>,
}

impl std::fmt::Debug for Request {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Request::Mutate(mutation, _) => f.debug_tuple("Mutate").field(mutation).finish(),
            Request::Snapshot(_) => f.write_str("Snapshot"),
            Request::Inspect(_) => f.write_str("Inspect"),
        }
    }
}

impl ProgressHandle {
    /// Move a store onto a new task and return a handle to it
    ///
    /// The task ends once every handle has been dropped.
    pub fn spawn(store: ProgressStore) -> Self {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        tokio::spawn(run(store, rx));
        Self { tx }
    }

    /// Apply a mutation and wait for it to settle
    pub async fn mutate(&self, mutation: Mutation) -> Result<Outcome, AscendError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(Request::Mutate(mutation, reply_tx))
            .await
            .map_err(|_| AscendError::ActorClosed)?;
        reply_rx.await.map_err(|_| AscendError::ActorClosed)
    }

    /// Copy of the current snapshot
    pub async fn snapshot(&self) -> Result<ProgressSnapshot, AscendError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx.send(Request::Snapshot(reply_tx)).await.map_err(|_| AscendError::ActorClosed)?;
        reply_rx.await.map_err(|_| AscendError::ActorClosed)
    }

    /// Run a read-only query against the store and return its result
    pub async fn inspect<R, F>(&self, query: F) -> Result<R, AscendError>
    where
        F: FnOnce(&ProgressStore) -> R + Send + 'static,
        R: Send + 'static,
    {
        let (reply_tx, reply_rx) = oneshot::channel();
        let boxed: Query = Box::new(move |store| {
            let _ = reply_tx.send(query(store));
        });
        self.tx.send(Request::Inspect(boxed)).await.map_err(|_| AscendError::ActorClosed)?;
        reply_rx.await.map_err(|_| AscendError::ActorClosed)
    }
}

async fn run(mut store: ProgressStore, mut rx: mpsc::Receiver<Request>) {
    while let Some(request) = rx.recv().await {
        match request {
            Request::Mutate(mutation, reply) => {
                tracing::debug!("Applying {:?}", mutation);
                let applied = mutation.apply(&mut store);
                let outcome = Outcome {
                    applied,
                    snapshot: store.snapshot().clone(),
                    events: store.drain_events(),
                };
                // Caller may have given up waiting
                let _ = reply.send(outcome);
            }
            Request::Snapshot(reply) => {
                let _ = reply.send(store.snapshot().clone());
            }
            Request::Inspect(query) => query(&store),
        }
    }
    tracing::debug!("Progress actor stopped");
}
