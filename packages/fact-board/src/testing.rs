//! Testing utilities including a scriptable data service.
//!
//! `MockFactService` wraps a [`MemoryFactService`] and adds what tests of the
//! board need beyond plain storage: injected failures, a record of every
//! call, and gates that hold a call open until the test releases it, so the
//! order in which concurrent requests complete can be forced.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::watch;

use crate::error::{ServiceError, ServiceResult};
use crate::services::MemoryFactService;
use crate::traits::FactService;
use crate::types::{Fact, FactId, NewFact, VoteKind};

/// Build a fact row for tests.
pub fn sample_fact(
    id: i64,
    category: &str,
    interesting: u32,
    mindblowing: u32,
    false_votes: u32,
) -> Fact {
    Fact {
        id: FactId::new(id),
        text: format!("Sample fact #{}", id),
        source: format!("https://example.com/facts/{}", id),
        category: category.to_string(),
        votes_interesting: interesting,
        votes_mindblowing: mindblowing,
        votes_false: false_votes,
        created_at: None,
    }
}

/// Service operation, used to target injected failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockOperation {
    Select,
    Insert,
    Update,
}

/// Record of a call made to the mock service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    Select { category: Option<String> },
    Insert { fact: NewFact },
    Update { id: FactId, kind: VoteKind, value: u32 },
}

/// Which calls a gate holds.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum GateKey {
    Select(Option<String>),
    Insert,
    Update(FactId),
}

/// Holds matching calls until opened. Once open it stays open.
pub struct Gate {
    tx: watch::Sender<bool>,
}

impl Gate {
    fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    /// Release every call waiting on this gate.
    pub fn open(&self) {
        self.tx.send_replace(true);
    }

    async fn wait(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives in `self`, so the channel cannot close while waiting
        let _ = rx.wait_for(|open| *open).await;
    }
}

#[derive(Default)]
pub struct MockFactService {
    inner: MemoryFactService,
    failures: Mutex<HashSet<MockOperation>>,
    gates: Mutex<HashMap<GateKey, Arc<Gate>>>,
    calls: Mutex<Vec<MockCall>>,
}

impl MockFactService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the backing store with rows.
    pub fn with_facts(facts: Vec<Fact>) -> Self {
        Self {
            inner: MemoryFactService::with_facts(facts),
            ..Default::default()
        }
    }

    /// Backing store, for seeding and inspection.
    pub fn memory(&self) -> &MemoryFactService {
        &self.inner
    }

    /// Make every call of `operation` fail until [`recover`](Self::recover).
    pub fn fail(&self, operation: MockOperation) {
        lock(&self.failures).insert(operation);
    }

    pub fn recover(&self, operation: MockOperation) {
        lock(&self.failures).remove(&operation);
    }

    /// Hold selects for `category` (`None` = unfiltered) until the gate opens.
    pub fn hold_select(&self, category: Option<&str>) -> Arc<Gate> {
        self.gate(GateKey::Select(category.map(str::to_string)))
    }

    /// Hold inserts until the gate opens.
    pub fn hold_insert(&self) -> Arc<Gate> {
        self.gate(GateKey::Insert)
    }

    /// Hold vote updates on `id` until the gate opens.
    pub fn hold_update(&self, id: FactId) -> Arc<Gate> {
        self.gate(GateKey::Update(id))
    }

    /// All calls received so far, in arrival order.
    pub fn calls(&self) -> Vec<MockCall> {
        lock(&self.calls).clone()
    }

    pub fn call_count(&self, operation: MockOperation) -> usize {
        lock(&self.calls)
            .iter()
            .filter(|call| {
                matches!(
                    (call, operation),
                    (MockCall::Select { .. }, MockOperation::Select)
                        | (MockCall::Insert { .. }, MockOperation::Insert)
                        | (MockCall::Update { .. }, MockOperation::Update)
                )
            })
            .count()
    }

    fn gate(&self, key: GateKey) -> Arc<Gate> {
        lock(&self.gates)
            .entry(key)
            .or_insert_with(|| Arc::new(Gate::new()))
            .clone()
    }

    /// Record the call, wait on its gate if one is set, then apply any
    /// injected failure.
    async fn enter(&self, call: MockCall, key: GateKey, operation: MockOperation) -> ServiceResult<()> {
        lock(&self.calls).push(call);

        let gate = lock(&self.gates).get(&key).cloned();
        if let Some(gate) = gate {
            gate.wait().await;
        }

        if lock(&self.failures).contains(&operation) {
            return Err(ServiceError::Unavailable(format!(
                "mock {:?} failure",
                operation
            )));
        }
        Ok(())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[async_trait]
impl FactService for MockFactService {
    async fn select(&self, category: Option<&str>) -> ServiceResult<Vec<Fact>> {
        let category = category.map(str::to_string);
        self.enter(
            MockCall::Select { category: category.clone() },
            GateKey::Select(category.clone()),
            MockOperation::Select,
        )
        .await?;
        self.inner.select(category.as_deref()).await
    }

    async fn insert(&self, fact: &NewFact) -> ServiceResult<Fact> {
        self.enter(
            MockCall::Insert { fact: fact.clone() },
            GateKey::Insert,
            MockOperation::Insert,
        )
        .await?;
        self.inner.insert(fact).await
    }

    async fn update_votes(&self, id: FactId, kind: VoteKind, value: u32) -> ServiceResult<Fact> {
        self.enter(
            MockCall::Update { id, kind, value },
            GateKey::Update(id),
            MockOperation::Update,
        )
        .await?;
        self.inner.update_votes(id, kind, value).await
    }
}
