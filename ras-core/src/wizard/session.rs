//! Wizard session: ties the form store and the navigation controller to the
//! draft-persistence port.
//!
//! Persistence is asynchronous and never blocks form editing. The session
//! guarantees at most one save in flight at a time; the guard clears when
//! the awaited call returns, on success and failure alike. The engine never
//! retries a failed save — that policy belongs to the caller.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

use crate::db::repository::{PropertyRepository, RepositoryError};
use crate::models::{PropertyDraft, PropertyId};

use super::form::FormStore;
use super::navigation::{NavigationController, NavigationPolicy};
use super::steps::StepKey;
use super::validation::check_step;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DraftStoreError {
    /// A save is already pending; retry once it settles.
    #[error("a save is already in flight")]
    SaveInFlight,

    #[error("storage error: {0}")]
    Storage(String),
}

impl From<RepositoryError> for DraftStoreError {
    fn from(err: RepositoryError) -> Self {
        DraftStoreError::Storage(err.to_string())
    }
}

/// The external persistence boundary of the wizard.
///
/// Both operations upsert the record under an identifier the store manages;
/// the returned id lets the engine adopt the identity assigned on first
/// save. `save_final` additionally marks the record published.
#[async_trait]
pub trait DraftStore: Send + Sync {
    async fn save_draft(&self, draft: &PropertyDraft) -> Result<PropertyId, DraftStoreError>;
    async fn save_final(&self, draft: &PropertyDraft) -> Result<PropertyId, DraftStoreError>;
}

/// [`DraftStore`] backed by a [`PropertyRepository`]: create on first save,
/// update once an id is assigned.
pub struct RepositoryDraftStore {
    repo: Arc<dyn PropertyRepository>,
}

impl RepositoryDraftStore {
    pub fn new(repo: Arc<dyn PropertyRepository>) -> Self {
        Self { repo }
    }

    async fn upsert(
        &self,
        draft: &PropertyDraft,
    ) -> Result<PropertyId, DraftStoreError> {
        match draft.id {
            Some(id) => {
                self.repo.update_property(draft).await?;
                Ok(id)
            }
            None => Ok(self.repo.create_property(draft).await?),
        }
    }
}

#[async_trait]
impl DraftStore for RepositoryDraftStore {
    async fn save_draft(
        &self,
        draft: &PropertyDraft,
    ) -> Result<PropertyId, DraftStoreError> {
        self.upsert(draft).await
    }

    async fn save_final(
        &self,
        draft: &PropertyDraft,
    ) -> Result<PropertyId, DraftStoreError> {
        let mut published = draft.clone();
        published.published = true;
        self.upsert(&published).await
    }
}

/// Observer invoked after every accepted transition with `(new, old)` step.
pub type StepChangeHook = Box<dyn FnMut(StepKey, StepKey) + Send>;

/// One wizard run over one draft.
///
/// The session owns the draft exclusively; there is no concurrent mutation
/// to coordinate. Closing the wizard simply drops the session — navigation
/// state has no persisted representation.
pub struct WizardSession<S: DraftStore> {
    form: FormStore,
    nav: NavigationController,
    store: S,
    autosave: bool,
    save_in_flight: bool,
    on_step_change: Option<StepChangeHook>,
}

impl<S: DraftStore> WizardSession<S> {
    /// Session with the default policy: no forward skipping, autosave on
    /// every accepted transition.
    pub fn new(
        draft: PropertyDraft,
        store: S,
    ) -> Self {
        Self::with_policy(draft, store, NavigationPolicy::default(), true)
    }

    pub fn with_policy(
        draft: PropertyDraft,
        store: S,
        policy: NavigationPolicy,
        autosave: bool,
    ) -> Self {
        Self {
            form: FormStore::new(draft),
            nav: NavigationController::new(policy),
            store,
            autosave,
            save_in_flight: false,
            on_step_change: None,
        }
    }

    /// Register a step-change observer. Saving is already handled by the
    /// session's autosave; the hook is for callers that need to react to
    /// transitions themselves (analytics, scroll reset, ...).
    pub fn set_step_change_hook(
        &mut self,
        hook: StepChangeHook,
    ) {
        self.on_step_change = Some(hook);
    }

    pub fn form(&self) -> &FormStore {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormStore {
        &mut self.form
    }

    pub fn nav(&self) -> &NavigationController {
        &self.nav
    }

    pub fn draft(&self) -> &PropertyDraft {
        self.form.draft()
    }

    pub fn save_in_flight(&self) -> bool {
        self.save_in_flight
    }

    /// Attempt a transition to the step with 1-based id `target`.
    ///
    /// On an accepted transition the draft is autosaved (when enabled); an
    /// autosave failure is logged and does not undo or fail the navigation.
    pub async fn go_to_step(
        &mut self,
        target: usize,
    ) -> bool {
        let old = self.nav.current();
        let accepted = self.nav.go_to_id(target, self.form.draft());
        if !accepted {
            return false;
        }

        let new = self.nav.current();
        if let Some(hook) = &mut self.on_step_change {
            hook(new, old);
        }
        if self.autosave {
            if let Err(error) = self.save_draft().await {
                warn!(%error, step = target, "draft autosave failed after step change");
            }
        }
        true
    }

    pub async fn next_step(&mut self) -> bool {
        match self.nav.current().next() {
            Some(step) => self.go_to_step(step.id()).await,
            None => false,
        }
    }

    pub async fn prev_step(&mut self) -> bool {
        match self.nav.current().prev() {
            Some(step) => self.go_to_step(step.id()).await,
            None => false,
        }
    }

    /// Explicit save-as-draft. At most one save is in flight at a time.
    pub async fn save_draft(&mut self) -> Result<PropertyId, DraftStoreError> {
        if self.save_in_flight {
            return Err(DraftStoreError::SaveInFlight);
        }
        self.save_in_flight = true;
        let result = self.store.save_draft(self.form.draft()).await;
        self.save_in_flight = false;

        if let Ok(id) = &result {
            self.form.assign_id(*id);
        }
        result
    }

    /// Final save: publishes the record. Available once the last step has
    /// been reached and is satisfied; the surrounding page decides when to
    /// offer it.
    pub async fn save_final(&mut self) -> Result<PropertyId, DraftStoreError> {
        if self.save_in_flight {
            return Err(DraftStoreError::SaveInFlight);
        }
        self.save_in_flight = true;
        let result = self.store.save_final(self.form.draft()).await;
        self.save_in_flight = false;

        if let Ok(id) = &result {
            self.form.assign_id(*id);
            self.form.mark_published();
        }
        result
    }

    pub fn can_finish(&self) -> bool {
        self.nav.is_visited(StepKey::Services)
            && check_step(StepKey::Services, self.form.draft()).is_satisfied()
    }
}
