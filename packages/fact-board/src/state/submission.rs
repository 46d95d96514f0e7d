//! New fact submission.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::FactStore;
use crate::error::{BoardError, Result, ACTION_FAILED_MESSAGE};
use crate::traits::FactService;
use crate::types::{Fact, NewFact};
use crate::validation::{is_valid_fact_input, remaining_chars};

/// The "share a fact" form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FactForm {
    pub text: String,
    pub source: String,
    pub category: String,
    pub is_open: bool,
    pub is_uploading: bool,
}

impl FactForm {
    /// Characters left for the fact text.
    pub fn remaining_chars(&self) -> usize {
        remaining_chars(&self.text)
    }

    pub fn is_valid(&self) -> bool {
        is_valid_fact_input(&self.text, &self.source, &self.category)
    }

    fn clear_fields(&mut self) {
        self.text.clear();
        self.source.clear();
        self.category.clear();
    }
}

/// Uploading flag for the form. Cleared on drop, whatever the outcome.
struct UploadGuard<'a> {
    form: &'a Mutex<FactForm>,
}

impl Drop for UploadGuard<'_> {
    fn drop(&mut self) {
        lock(self.form).is_uploading = false;
    }
}

fn lock(form: &Mutex<FactForm>) -> MutexGuard<'_, FactForm> {
    form.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Stored and merged at the top of the list
    Created(Fact),
    /// Form did not pass validation; nothing was sent
    Incomplete,
    /// An upload from this form is already running
    AlreadyUploading,
}

/// Validates the form, persists the fact and merges the stored record into
/// the board.
pub struct SubmissionWorkflow<S> {
    store: Arc<FactStore<S>>,
    form: Mutex<FactForm>,
}

impl<S: FactService> SubmissionWorkflow<S> {
    pub fn new(store: Arc<FactStore<S>>) -> Self {
        Self {
            store,
            form: Mutex::new(FactForm::default()),
        }
    }

    fn form_mut(&self) -> MutexGuard<'_, FactForm> {
        lock(&self.form)
    }

    /// Snapshot of the form for rendering.
    pub fn form(&self) -> FactForm {
        self.form_mut().clone()
    }

    /// Fields are disabled while this is true.
    pub fn is_uploading(&self) -> bool {
        self.form_mut().is_uploading
    }

    pub fn set_text(&self, text: impl Into<String>) {
        self.form_mut().text = text.into();
    }

    pub fn set_source(&self, source: impl Into<String>) {
        self.form_mut().source = source.into();
    }

    pub fn set_category(&self, category: impl Into<String>) {
        self.form_mut().category = category.into();
    }

    pub fn open(&self) {
        self.form_mut().is_open = true;
    }

    pub fn close(&self) {
        self.form_mut().is_open = false;
    }

    /// Show or hide the form. Returns the new visibility.
    pub fn toggle(&self) -> bool {
        let mut form = self.form_mut();
        form.is_open = !form.is_open;
        form.is_open
    }

    /// Fill in all three fields and submit.
    pub async fn submit_fact(
        &self,
        text: impl Into<String>,
        source: impl Into<String>,
        category: impl Into<String>,
    ) -> Result<SubmitOutcome> {
        {
            let mut form = self.form_mut();
            if form.is_uploading {
                return Ok(SubmitOutcome::AlreadyUploading);
            }
            form.text = text.into();
            form.source = source.into();
            form.category = category.into();
        }
        self.submit().await
    }

    /// Submit the current form contents.
    ///
    /// An invalid form is a silent no-op. On success the form is cleared and
    /// closed; on failure it is left exactly as it was so the user can retry.
    pub async fn submit(&self) -> Result<SubmitOutcome> {
        let (new_fact, uploading) = {
            let mut form = self.form_mut();
            if form.is_uploading {
                return Ok(SubmitOutcome::AlreadyUploading);
            }
            if !form.is_valid() {
                tracing::debug!("Ignoring incomplete fact form");
                return Ok(SubmitOutcome::Incomplete);
            }
            form.is_uploading = true;
            let new_fact = NewFact {
                text: form.text.clone(),
                source: form.source.clone(),
                category: form.category.clone(),
            };
            (new_fact, UploadGuard { form: &self.form })
        };

        let result = self.store.service().insert(&new_fact).await;
        drop(uploading);

        let mut form = self.form_mut();

        match result {
            Ok(fact) => {
                tracing::info!(fact_id = %fact.id, category = %fact.category, "Fact submitted");
                self.store.merge_fact(fact.clone());
                form.clear_fields();
                form.is_open = false;
                Ok(SubmitOutcome::Created(fact))
            }
            Err(e) => {
                tracing::warn!(category = %new_fact.category, error = %e, "Failed to submit fact");
                self.store.set_notice(ACTION_FAILED_MESSAGE);
                Err(BoardError::Submit(e))
            }
        }
    }
}
