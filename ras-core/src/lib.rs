pub mod db;
pub mod models;
pub mod schedule;
pub mod wizard;

pub use db::repository::{PropertyRepository, RepositoryError};
pub use models::*;
