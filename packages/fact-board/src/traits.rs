//! Data service seam.
//!
//! Storage is an external collaborator: it filters, sorts, inserts and
//! updates facts. The board only ever talks to it through this trait.

use async_trait::async_trait;

use crate::error::ServiceResult;
use crate::types::{Fact, FactId, NewFact, VoteKind};

#[async_trait]
pub trait FactService: Send + Sync {
    /// Facts in `category` (all facts when `None`), sorted by
    /// interesting votes, highest first.
    async fn select(&self, category: Option<&str>) -> ServiceResult<Vec<Fact>>;

    /// Persist a new fact. Returns the stored record with its assigned id
    /// and zeroed tallies.
    async fn insert(&self, fact: &NewFact) -> ServiceResult<Fact>;

    /// Set a single tally column on one fact. Returns the full updated record.
    async fn update_votes(&self, id: FactId, kind: VoteKind, value: u32) -> ServiceResult<Fact>;
}
