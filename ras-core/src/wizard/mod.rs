pub mod form;
pub mod navigation;
pub mod session;
pub mod steps;
pub mod validation;

pub use form::{DraftPatch, FormStore};
pub use navigation::{NavigationController, NavigationPolicy};
pub use session::{DraftStore, DraftStoreError, RepositoryDraftStore, StepChangeHook, WizardSession};
pub use steps::{STEP_COUNT, StepKey};
pub use validation::{StepReport, check_step};
