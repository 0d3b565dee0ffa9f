//! In-memory form state for the wizard.
//!
//! The store is a pure merge store: it never validates. It keeps a frozen
//! copy of the initially-loaded draft for dirty comparison and reset.

use std::collections::BTreeSet;

use rust_decimal::Decimal;

use crate::models::{
    Furnishing, LifecycleTag, Location, PropertyCategory, PropertyDraft, PropertyId, RentalTerms,
    SaleTerms, VacationTerms,
};

/// A partial update to the scalar fields of a draft.
///
/// `Some` fields are merged into the draft, `None` fields are left alone.
/// Nullable fields use a second `Option` layer so a patch can distinguish
/// "leave alone" (`None`) from "set to null" (`Some(None)`). List edits
/// (spaces, services) go through [`FormStore::mutate`] instead.
#[derive(Debug, Clone, Default)]
pub struct DraftPatch {
    pub name: Option<String>,
    pub category: Option<PropertyCategory>,
    pub states: Option<BTreeSet<LifecycleTag>>,
    pub furnishing: Option<Furnishing>,
    pub location: Option<Location>,
    pub size_m2: Option<Option<Decimal>>,
    pub capacity: Option<Option<u32>>,
    pub rental: Option<Option<RentalTerms>>,
    pub vacation: Option<Option<VacationTerms>>,
    pub sale: Option<Option<SaleTerms>>,
}

impl DraftPatch {
    fn apply(
        self,
        draft: &mut PropertyDraft,
    ) {
        if let Some(name) = self.name {
            draft.name = name;
        }
        if let Some(category) = self.category {
            draft.category = category;
        }
        if let Some(states) = self.states {
            draft.states = states;
        }
        if let Some(furnishing) = self.furnishing {
            draft.furnishing = furnishing;
        }
        if let Some(location) = self.location {
            draft.location = location;
        }
        if let Some(size_m2) = self.size_m2 {
            draft.size_m2 = size_m2;
        }
        if let Some(capacity) = self.capacity {
            draft.capacity = capacity;
        }
        if let Some(rental) = self.rental {
            draft.conditions.rental = rental;
        }
        if let Some(vacation) = self.vacation {
            draft.conditions.vacation = vacation;
        }
        if let Some(sale) = self.sale {
            draft.conditions.sale = sale;
        }
    }
}

#[derive(Debug, Clone)]
pub struct FormStore {
    current: PropertyDraft,
    initial: PropertyDraft,
    dirty: bool,
}

impl FormStore {
    pub fn new(draft: PropertyDraft) -> Self {
        Self {
            initial: draft.clone(),
            current: draft,
            dirty: false,
        }
    }

    pub fn draft(&self) -> &PropertyDraft {
        &self.current
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Merge a partial update into the draft. Marks dirty unconditionally,
    /// even for an empty patch.
    pub fn update(
        &mut self,
        patch: DraftPatch,
    ) {
        patch.apply(&mut self.current);
        self.dirty = true;
    }

    /// Edit the draft in place (space and service list operations flow
    /// through here). Marks dirty.
    pub fn mutate(
        &mut self,
        f: impl FnOnce(&mut PropertyDraft),
    ) {
        f(&mut self.current);
        self.dirty = true;
    }

    /// Wholesale replace, used when loading an existing draft for edit.
    /// Re-freezes the initial copy and clears dirty.
    pub fn replace(
        &mut self,
        draft: PropertyDraft,
    ) {
        self.initial = draft.clone();
        self.current = draft;
        self.dirty = false;
    }

    /// Restore the initially-loaded draft and clear dirty.
    pub fn reset(&mut self) {
        self.current = self.initial.clone();
        self.dirty = false;
    }

    /// Record the storage identity assigned on first save. Identity is not
    /// a user edit, so this touches both copies and leaves dirty alone.
    pub fn assign_id(
        &mut self,
        id: PropertyId,
    ) {
        self.current.id = Some(id);
        self.initial.id = Some(id);
    }

    /// Record that the draft was published by a final save. Like
    /// [`FormStore::assign_id`], not a user edit.
    pub fn mark_published(&mut self) {
        self.current.published = true;
        self.initial.published = true;
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn store() -> FormStore {
        FormStore::new(PropertyDraft::new("Casa X", PropertyCategory::House))
    }

    #[test]
    fn update_merges_present_fields_only() {
        let mut store = store();

        store.update(DraftPatch {
            name: Some("Casa Y".to_string()),
            size_m2: Some(Some(dec!(82.5))),
            ..Default::default()
        });

        assert_eq!(store.draft().name, "Casa Y");
        assert_eq!(store.draft().size_m2, Some(dec!(82.5)));
        assert_eq!(store.draft().category, PropertyCategory::House);
        assert!(store.is_dirty());
    }

    #[test]
    fn empty_patch_still_marks_dirty() {
        let mut store = store();
        let before = store.draft().clone();

        store.update(DraftPatch::default());

        assert_eq!(store.draft(), &before);
        assert!(store.is_dirty());
    }

    #[test]
    fn patch_can_set_nullable_field_to_null() {
        let mut store = store();
        store.update(DraftPatch {
            capacity: Some(Some(6)),
            ..Default::default()
        });
        assert_eq!(store.draft().capacity, Some(6));

        store.update(DraftPatch {
            capacity: Some(None),
            ..Default::default()
        });
        assert_eq!(store.draft().capacity, None);
    }

    #[test]
    fn reset_restores_initial_draft_and_clears_dirty() {
        let mut store = store();

        store.update(DraftPatch {
            name: Some("renamed".to_string()),
            ..Default::default()
        });
        store.mutate(|draft| {
            draft.add_space(crate::models::SpaceKind::Kitchen, "Kitchen");
        });
        store.reset();

        assert_eq!(store.draft().name, "Casa X");
        assert!(store.draft().spaces.is_empty());
        assert!(!store.is_dirty());
    }

    #[test]
    fn replace_swaps_the_frozen_copy() {
        let mut store = store();

        let loaded = PropertyDraft {
            id: Some(7),
            ..PropertyDraft::new("Loaded", PropertyCategory::Studio)
        };
        store.replace(loaded.clone());

        assert!(!store.is_dirty());
        store.update(DraftPatch {
            name: Some("edited".to_string()),
            ..Default::default()
        });
        store.reset();
        assert_eq!(store.draft(), &loaded);
    }

    #[test]
    fn assign_id_survives_reset_without_dirtying() {
        let mut store = store();

        store.assign_id(42);
        assert!(!store.is_dirty());

        store.reset();
        assert_eq!(store.draft().id, Some(42));
    }
}
