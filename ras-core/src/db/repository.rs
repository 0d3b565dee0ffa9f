use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    Collaborator, CollaboratorId, EquipmentItem, NewCollaborator, PropertyDraft, PropertyId,
    PropertySummary, SpaceKind,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,

    #[error("database error: {0}")]
    Database(String),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("configuration error: {0}")]
    Configuration(String),
}

/// Storage backend for properties, shared-access records, and the equipment
/// reference catalog.
///
/// A property's spaces and services are exclusively owned by it and persist
/// with their parent in one logical save; deleting a property removes them.
#[async_trait]
pub trait PropertyRepository: Send + Sync {
    // Properties
    async fn create_property(&self, draft: &PropertyDraft) -> Result<PropertyId, RepositoryError>;
    async fn get_property(&self, id: PropertyId) -> Result<PropertyDraft, RepositoryError>;

    /// Requires `draft.id` to be set; use [`Self::create_property`] first
    /// otherwise.
    async fn update_property(&self, draft: &PropertyDraft) -> Result<(), RepositoryError>;

    async fn delete_property(&self, id: PropertyId) -> Result<(), RepositoryError>;

    async fn list_properties(
        &self,
        published: Option<bool>,
    ) -> Result<Vec<PropertySummary>, RepositoryError>;

    // Shared access
    async fn add_collaborator(
        &self,
        collaborator: &NewCollaborator,
    ) -> Result<Collaborator, RepositoryError>;

    async fn remove_collaborator(&self, id: CollaboratorId) -> Result<(), RepositoryError>;

    async fn list_collaborators(
        &self,
        property_id: PropertyId,
    ) -> Result<Vec<Collaborator>, RepositoryError>;

    // Equipment reference catalog
    async fn list_equipment(&self, kind: SpaceKind) -> Result<Vec<EquipmentItem>, RepositoryError>;
    async fn insert_equipment(&self, item: &EquipmentItem) -> Result<(), RepositoryError>;
    async fn delete_equipment(&self, kind: SpaceKind) -> Result<(), RepositoryError>;
}
