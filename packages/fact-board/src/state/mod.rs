//! Board state management
//!
//! [`FactStore`] owns the fact list, the active filter and the loading flag.
//! [`VoteEngine`] and [`SubmissionWorkflow`] write to the list only through
//! the store's `merge_fact` / `patch_fact`.

mod submission;
mod vote;

pub use submission::{FactForm, SubmissionWorkflow, SubmitOutcome};
pub use vote::{VoteEngine, VoteOutcome};

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::{BoardError, Result, LOAD_FAILED_MESSAGE};
use crate::traits::FactService;
use crate::types::{CategoryFilter, Fact, FactId};

/// What happened to a fetch's result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The list was replaced with `count` facts
    Applied { count: usize },
    /// A newer fetch started before this one finished; its result was dropped
    Superseded,
}

#[derive(Debug, Default)]
struct BoardState {
    facts: Vec<Fact>,
    filter: CategoryFilter,
    loading: bool,
    /// Bumped by every fetch; only the fetch holding the current epoch may
    /// write its result.
    epoch: u64,
    notice: Option<String>,
}

/// Fact list state in front of a data service.
///
/// The state lock is never held across a service call, so reads stay
/// available while requests are in flight.
pub struct FactStore<S> {
    service: Arc<S>,
    state: Mutex<BoardState>,
}

impl<S: FactService> FactStore<S> {
    /// Create a store with an empty list and the `all` filter. Call
    /// [`fetch`](Self::fetch) to load.
    pub fn new(service: Arc<S>) -> Self {
        Self {
            service,
            state: Mutex::new(BoardState::default()),
        }
    }

    pub fn service(&self) -> &Arc<S> {
        &self.service
    }

    fn state(&self) -> MutexGuard<'_, BoardState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the current list, in display order.
    pub fn facts(&self) -> Vec<Fact> {
        self.state().facts.clone()
    }

    pub fn fact(&self, id: FactId) -> Option<Fact> {
        self.state().facts.iter().find(|f| f.id == id).cloned()
    }

    pub fn filter(&self) -> CategoryFilter {
        self.state().filter.clone()
    }

    /// True while the newest fetch is outstanding.
    pub fn is_loading(&self) -> bool {
        self.state().loading
    }

    /// Last user-facing error message, if any.
    pub fn notice(&self) -> Option<String> {
        self.state().notice.clone()
    }

    pub fn clear_notice(&self) {
        self.state().notice = None;
    }

    pub(crate) fn set_notice(&self, message: &str) {
        self.state().notice = Some(message.to_string());
    }

    /// Select a category by name (`"all"` for everything) and reload.
    pub async fn select_category(&self, name: &str) -> Result<FetchOutcome> {
        let filter: CategoryFilter = name.parse()?;
        self.set_filter(filter).await
    }

    /// Change the filter and reload. Any fetch still running for an older
    /// filter is superseded.
    pub async fn set_filter(&self, filter: CategoryFilter) -> Result<FetchOutcome> {
        tracing::debug!(filter = %filter, "Filter changed");
        self.state().filter = filter;
        self.fetch().await
    }

    /// Load facts for the current filter, replacing the list on success.
    ///
    /// On failure the previous list is kept and the load error message is
    /// recorded as the notice.
    pub async fn fetch(&self) -> Result<FetchOutcome> {
        let (epoch, filter) = {
            let mut state = self.state();
            state.epoch += 1;
            state.loading = true;
            (state.epoch, state.filter.clone())
        };

        let result = self.service.select(filter.category()).await;

        let mut state = self.state();
        if state.epoch != epoch {
            tracing::debug!(filter = %filter, epoch, current = state.epoch, "Discarding stale fetch");
            return Ok(FetchOutcome::Superseded);
        }
        state.loading = false;

        match result {
            Ok(facts) => {
                let count = facts.len();
                state.facts = facts;
                tracing::info!(filter = %filter, count, "Loaded facts");
                Ok(FetchOutcome::Applied { count })
            }
            Err(e) => {
                tracing::warn!(filter = %filter, error = %e, "Failed to load facts");
                state.notice = Some(LOAD_FAILED_MESSAGE.to_string());
                Err(BoardError::Load(e))
            }
        }
    }

    /// Put a newly created fact at the top of the list.
    pub fn merge_fact(&self, fact: Fact) {
        tracing::debug!(fact_id = %fact.id, "Merging new fact");
        self.state().facts.insert(0, fact);
    }

    /// Replace the listed fact that has `updated.id`, keeping its position.
    ///
    /// Returns false when the fact is not in the current list, e.g. after the
    /// filter changed while a vote was in flight.
    pub fn patch_fact(&self, updated: Fact) -> bool {
        let mut state = self.state();
        match state.facts.iter_mut().find(|f| f.id == updated.id) {
            Some(slot) => {
                *slot = updated;
                true
            }
            None => {
                tracing::debug!(fact_id = %updated.id, "Patched fact is not listed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_fact, MockFactService, MockOperation};
    use tokio_test::{assert_pending, assert_ready, task};

    fn ids(facts: &[Fact]) -> Vec<i64> {
        facts.iter().map(|f| f.id.get()).collect()
    }

    fn store_with(facts: Vec<Fact>) -> (Arc<MockFactService>, FactStore<MockFactService>) {
        let service = Arc::new(MockFactService::with_facts(facts));
        let store = FactStore::new(service.clone());
        (service, store)
    }

    #[tokio::test]
    async fn test_new_store_is_empty_with_all_filter() {
        let (_, store) = store_with(vec![]);
        assert!(store.facts().is_empty());
        assert_eq!(store.filter(), CategoryFilter::All);
        assert!(!store.is_loading());
        assert_eq!(store.notice(), None);
    }

    #[tokio::test]
    async fn test_fetch_replaces_list_sorted() {
        let (_, store) = store_with(vec![
            sample_fact(1, "science", 1, 0, 0),
            sample_fact(2, "history", 7, 0, 0),
            sample_fact(3, "science", 4, 0, 0),
        ]);

        let outcome = store.fetch().await.unwrap();
        assert_eq!(outcome, FetchOutcome::Applied { count: 3 });
        assert_eq!(ids(&store.facts()), vec![2, 3, 1]);
    }

    #[tokio::test]
    async fn test_set_filter_fetches_category() {
        let (service, store) = store_with(vec![
            sample_fact(1, "science", 1, 0, 0),
            sample_fact(2, "history", 7, 0, 0),
        ]);

        store.select_category("science").await.unwrap();
        assert_eq!(store.filter(), CategoryFilter::Category("science"));
        assert_eq!(ids(&store.facts()), vec![1]);
        assert_eq!(service.call_count(MockOperation::Select), 1);
    }

    #[tokio::test]
    async fn test_unknown_category_is_rejected_before_fetch() {
        let (service, store) = store_with(vec![]);

        let result = store.select_category("gossip").await;
        assert!(matches!(result, Err(BoardError::Catalog(_))));
        assert_eq!(store.filter(), CategoryFilter::All);
        assert_eq!(service.call_count(MockOperation::Select), 0);
    }

    #[tokio::test]
    async fn test_fetch_failure_keeps_previous_list() {
        let (service, store) = store_with(vec![sample_fact(1, "science", 1, 0, 0)]);
        store.fetch().await.unwrap();

        service.fail(MockOperation::Select);
        let err = store.fetch().await.unwrap_err();

        assert!(matches!(err, BoardError::Load(_)));
        assert_eq!(
            err.to_string(),
            "There was a problem loading fetching data from the database."
        );
        assert_eq!(ids(&store.facts()), vec![1]);
        assert!(!store.is_loading());
        assert_eq!(store.notice(), Some(LOAD_FAILED_MESSAGE.to_string()));

        store.clear_notice();
        assert_eq!(store.notice(), None);
    }

    #[tokio::test]
    async fn test_loading_flag_spans_the_request() {
        let (service, store) = store_with(vec![sample_fact(1, "science", 1, 0, 0)]);
        let gate = service.hold_select(None);

        let mut fetch = task::spawn(store.fetch());
        assert_pending!(fetch.poll());
        assert!(store.is_loading());

        gate.open();
        let outcome = assert_ready!(fetch.poll()).unwrap();
        assert_eq!(outcome, FetchOutcome::Applied { count: 1 });
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn test_stale_fetch_is_discarded() {
        let (service, store) = store_with(vec![
            sample_fact(1, "science", 1, 0, 0),
            sample_fact(2, "history", 7, 0, 0),
        ]);
        let science_gate = service.hold_select(Some("science"));

        let mut first = task::spawn(store.select_category("science"));
        assert_pending!(first.poll());

        let second = store.select_category("history").await;
        science_gate.open();

        assert_eq!(assert_ready!(first.poll()).unwrap(), FetchOutcome::Superseded);
        assert_eq!(second.unwrap(), FetchOutcome::Applied { count: 1 });
        assert_eq!(store.filter(), CategoryFilter::Category("history"));
        assert_eq!(ids(&store.facts()), vec![2]);
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn test_stale_failure_sets_no_notice() {
        let (service, store) = store_with(vec![sample_fact(2, "history", 7, 0, 0)]);
        let all_gate = service.hold_select(None);
        service.fail(MockOperation::Select);

        let mut stale = task::spawn(store.fetch());
        assert_pending!(stale.poll());

        service.recover(MockOperation::Select);
        store.select_category("history").await.unwrap();

        service.fail(MockOperation::Select);
        all_gate.open();
        assert_eq!(assert_ready!(stale.poll()).unwrap(), FetchOutcome::Superseded);

        assert_eq!(store.notice(), None);
        assert_eq!(ids(&store.facts()), vec![2]);
    }

    #[tokio::test]
    async fn test_merge_prepends_without_resort() {
        let (_, store) = store_with(vec![
            sample_fact(1, "science", 9, 0, 0),
            sample_fact(2, "science", 3, 0, 0),
        ]);
        store.fetch().await.unwrap();

        store.merge_fact(sample_fact(3, "science", 0, 0, 0));
        assert_eq!(ids(&store.facts()), vec![3, 1, 2]);
    }

    #[tokio::test]
    async fn test_patch_replaces_in_place() {
        let (_, store) = store_with(vec![
            sample_fact(1, "science", 9, 0, 0),
            sample_fact(2, "science", 3, 0, 0),
        ]);
        store.fetch().await.unwrap();

        assert!(store.patch_fact(sample_fact(2, "science", 30, 0, 0)));
        let facts = store.facts();
        assert_eq!(ids(&facts), vec![1, 2]);
        assert_eq!(facts[1].votes_interesting, 30);

        assert!(!store.patch_fact(sample_fact(99, "science", 1, 0, 0)));
        assert_eq!(store.facts().len(), 2);
    }
}
