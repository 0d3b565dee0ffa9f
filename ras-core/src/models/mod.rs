mod collaborator;
mod property;
mod service;
mod space;

pub use collaborator::{Collaborator, CollaboratorRole, NewCollaborator};
pub use property::{
    ConditionalData, Furnishing, LifecycleTag, Location, PropertyCategory, PropertyDraft,
    PropertySummary, RentalTerms, SaleTerms, VacationTerms,
};
pub use service::{Recurrence, RecurrenceUnit, Service, ServiceAmount, ServiceKind};
pub use space::{Bed, BedKind, EquipmentItem, Space, SpaceDetails, SpaceKind};

/// Row identifier assigned by the storage backend.
pub type PropertyId = i64;
pub type SpaceId = i64;
pub type ServiceId = i64;
pub type CollaboratorId = i64;
