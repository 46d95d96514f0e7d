//! Community fact board core.
//!
//! Holds the fact list shown on the board, the active category filter and
//! the two write paths users have: voting on a fact and submitting a new one.
//! Storage is delegated to a [`FactService`]; everything here is the state
//! that sits in front of it.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use fact_board::{FactStore, MemoryFactService, SubmissionWorkflow, VoteEngine, VoteKind};
//!
//! let store = Arc::new(FactStore::new(Arc::new(MemoryFactService::new())));
//! store.select_category("science").await?;
//!
//! let votes = VoteEngine::new(store.clone());
//! if let Some(fact) = store.facts().first() {
//!     votes.cast_vote(fact, VoteKind::Mindblowing).await?;
//! }
//!
//! let form = SubmissionWorkflow::new(store.clone());
//! form.submit_fact("Honey never spoils.", "https://example.com/honey", "science").await?;
//! ```
//!
//! # Modules
//!
//! - [`catalog`] - Fixed category catalog and colour lookup
//! - [`validation`] - Input predicates for submissions
//! - [`types`] - Facts, vote kinds and the category filter
//! - [`traits`] - The data service seam
//! - [`services`] - In-memory and REST data services
//! - [`state`] - FactStore, VoteEngine and SubmissionWorkflow
//! - [`testing`] - Scriptable service double for tests

pub mod catalog;
pub mod config;
pub mod error;
pub mod services;
pub mod state;
pub mod testing;
pub mod traits;
pub mod types;
pub mod validation;

pub use catalog::{Category, CATEGORIES};
pub use config::Config;
pub use error::{BoardError, CatalogError, Result, ServiceError, ServiceResult};
pub use services::{MemoryFactService, RestFactService};
pub use state::{
    FactForm, FactStore, FetchOutcome, SubmissionWorkflow, SubmitOutcome, VoteEngine, VoteOutcome,
};
pub use traits::FactService;
pub use types::{CategoryFilter, Fact, FactId, NewFact, VoteKind};
pub use validation::{is_valid_fact_input, is_valid_url, remaining_chars, MAX_FACT_LENGTH};
