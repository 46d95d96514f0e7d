//! Voting on facts.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::FactStore;
use crate::error::{BoardError, Result, ACTION_FAILED_MESSAGE};
use crate::traits::FactService;
use crate::types::{Fact, FactId, VoteKind};

/// Result of a vote click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoteOutcome {
    /// The service accepted the vote; this is the record it returned
    Recorded(Fact),
    /// A vote on this fact was already in flight, so the click was ignored
    AlreadyVoting,
}

/// Applies votes to facts, one in-flight request per fact.
///
/// Votes on different facts run concurrently; each fact has its own busy
/// flag.
pub struct VoteEngine<S> {
    store: Arc<FactStore<S>>,
    in_flight: Mutex<HashSet<FactId>>,
}

/// Busy flag for one fact. Cleared on drop, whatever the outcome.
struct VoteGuard<'a> {
    in_flight: &'a Mutex<HashSet<FactId>>,
    id: FactId,
}

impl<'a> VoteGuard<'a> {
    fn acquire(in_flight: &'a Mutex<HashSet<FactId>>, id: FactId) -> Option<Self> {
        if lock(in_flight).insert(id) {
            Some(Self { in_flight, id })
        } else {
            None
        }
    }
}

impl Drop for VoteGuard<'_> {
    fn drop(&mut self) {
        lock(self.in_flight).remove(&self.id);
    }
}

fn lock(in_flight: &Mutex<HashSet<FactId>>) -> MutexGuard<'_, HashSet<FactId>> {
    in_flight.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<S: FactService> VoteEngine<S> {
    pub fn new(store: Arc<FactStore<S>>) -> Self {
        Self {
            store,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// True while a vote on `id` is in flight; its buttons should be disabled.
    pub fn is_voting(&self, id: FactId) -> bool {
        lock(&self.in_flight).contains(&id)
    }

    /// Add one vote of `kind` to `fact`.
    ///
    /// Sends `fact`'s current tally plus one and patches the store with the
    /// record the service returns, not a locally incremented copy. On failure
    /// the listed fact is left as it was.
    pub async fn cast_vote(&self, fact: &Fact, kind: VoteKind) -> Result<VoteOutcome> {
        let Some(_busy) = VoteGuard::acquire(&self.in_flight, fact.id) else {
            tracing::debug!(fact_id = %fact.id, kind = %kind, "Vote already in flight");
            return Ok(VoteOutcome::AlreadyVoting);
        };

        let value = fact.votes(kind).saturating_add(1);
        match self.store.service().update_votes(fact.id, kind, value).await {
            Ok(updated) => {
                tracing::info!(fact_id = %fact.id, kind = %kind, value = updated.votes(kind), "Vote recorded");
                self.store.patch_fact(updated.clone());
                Ok(VoteOutcome::Recorded(updated))
            }
            Err(e) => {
                tracing::warn!(fact_id = %fact.id, kind = %kind, error = %e, "Failed to record vote");
                self.store.set_notice(ACTION_FAILED_MESSAGE);
                Err(BoardError::Vote(e))
            }
        }
    }
}
