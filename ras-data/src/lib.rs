pub mod loader;

pub use loader::{EquipmentCatalogLoader, EquipmentLoaderError, EquipmentRecord};
