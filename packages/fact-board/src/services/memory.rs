//! In-memory data service for testing and development.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{PoisonError, RwLock};

use crate::error::{ServiceError, ServiceResult};
use crate::traits::FactService;
use crate::types::{Fact, FactId, NewFact, VoteKind};

/// Facts held in a vector behind a lock.
///
/// Not suitable for production as data is lost on restart.
pub struct MemoryFactService {
    facts: RwLock<Vec<Fact>>,
    next_id: AtomicI64,
}

impl Default for MemoryFactService {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryFactService {
    /// Create an empty service.
    pub fn new() -> Self {
        Self {
            facts: RwLock::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// Create a service seeded with existing rows. New ids continue after
    /// the highest seeded id.
    pub fn with_facts(facts: Vec<Fact>) -> Self {
        let next = facts.iter().map(|f| f.id.get()).max().unwrap_or(0) + 1;
        Self {
            facts: RwLock::new(facts),
            next_id: AtomicI64::new(next),
        }
    }

    pub fn fact_count(&self) -> usize {
        self.facts.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Stored row for `id`, bypassing the service interface.
    pub fn get(&self, id: FactId) -> Option<Fact> {
        self.facts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|f| f.id == id)
            .cloned()
    }
}

#[async_trait]
impl FactService for MemoryFactService {
    async fn select(&self, category: Option<&str>) -> ServiceResult<Vec<Fact>> {
        let mut facts: Vec<Fact> = self
            .facts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|f| category.map_or(true, |c| f.category == c))
            .cloned()
            .collect();

        facts.sort_by(|a, b| b.votes_interesting.cmp(&a.votes_interesting));
        Ok(facts)
    }

    async fn insert(&self, fact: &NewFact) -> ServiceResult<Fact> {
        let stored = Fact {
            id: FactId::new(self.next_id.fetch_add(1, Ordering::SeqCst)),
            text: fact.text.clone(),
            source: fact.source.clone(),
            category: fact.category.clone(),
            votes_interesting: 0,
            votes_mindblowing: 0,
            votes_false: 0,
            created_at: Some(Utc::now()),
        };

        self.facts
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(stored.clone());
        Ok(stored)
    }

    async fn update_votes(&self, id: FactId, kind: VoteKind, value: u32) -> ServiceResult<Fact> {
        let mut facts = self.facts.write().unwrap_or_else(PoisonError::into_inner);
        let fact = facts
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or(ServiceError::NotFound(id))?;

        fact.set_votes(kind, value);
        Ok(fact.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_fact;

    #[tokio::test]
    async fn test_select_filters_and_sorts() {
        let service = MemoryFactService::with_facts(vec![
            sample_fact(1, "science", 2, 0, 0),
            sample_fact(2, "history", 9, 0, 0),
            sample_fact(3, "science", 5, 0, 0),
        ]);

        let all = service.select(None).await.unwrap();
        let ids: Vec<i64> = all.iter().map(|f| f.id.get()).collect();
        assert_eq!(ids, vec![2, 3, 1]);

        let science = service.select(Some("science")).await.unwrap();
        let ids: Vec<i64> = science.iter().map(|f| f.id.get()).collect();
        assert_eq!(ids, vec![3, 1]);

        assert!(service.select(Some("news")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_insert_assigns_id_and_zero_votes() {
        let service = MemoryFactService::with_facts(vec![sample_fact(41, "news", 3, 3, 3)]);
        let new_fact = NewFact {
            text: "The Eiffel Tower grows in summer.".to_string(),
            source: "https://example.com/eiffel".to_string(),
            category: "history".to_string(),
        };

        let stored = service.insert(&new_fact).await.unwrap();
        assert_eq!(stored.id, FactId::new(42));
        assert_eq!(stored.votes_interesting, 0);
        assert_eq!(stored.votes_mindblowing, 0);
        assert_eq!(stored.votes_false, 0);
        assert_eq!(service.fact_count(), 2);
    }

    #[tokio::test]
    async fn test_update_sets_single_column() {
        let service = MemoryFactService::with_facts(vec![sample_fact(7, "science", 4, 2, 1)]);

        let updated = service
            .update_votes(FactId::new(7), VoteKind::False, 2)
            .await
            .unwrap();
        assert_eq!(updated.votes_false, 2);
        assert_eq!(updated.votes_interesting, 4);
        assert_eq!(updated.votes_mindblowing, 2);

        let missing = service.update_votes(FactId::new(8), VoteKind::False, 1).await;
        assert!(matches!(missing, Err(ServiceError::NotFound(id)) if id == FactId::new(8)));
    }
}
