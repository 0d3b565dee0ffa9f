use async_trait::async_trait;
use tracing::debug;

use ras_core::db::repository::{PropertyRepository, RepositoryError};
use ras_core::db::{DbConfig, RepositoryFactory};

use crate::SqliteRepository;

/// [`RepositoryFactory`] for SQLite.
///
/// Register this with a [`ras_core::db::RepositoryRegistry`] to make the
/// `"sqlite"` backend available:
///
/// ```rust,no_run
/// use ras_core::db::RepositoryRegistry;
/// use ras_db_sqlite::SqliteRepositoryFactory;
///
/// let mut registry = RepositoryRegistry::new();
/// registry.register(Box::new(SqliteRepositoryFactory));
/// ```
pub struct SqliteRepositoryFactory;

#[async_trait]
impl RepositoryFactory for SqliteRepositoryFactory {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    /// Open the database described by `config.connection_string` and bring
    /// its schema up to date.
    ///
    /// Accepted connection-string values:
    /// * A sqlx-style URL — e.g. `"sqlite:ras.db?mode=rwc"` to create the
    ///   file when missing.
    /// * `":memory:"` — an ephemeral in-memory database (useful for tests).
    async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn PropertyRepository>, RepositoryError> {
        debug!(connection = %config.connection_string, "opening sqlite repository");
        let repo = SqliteRepository::new(&config.connection_string).await?;
        repo.run_migrations().await?;
        Ok(Box::new(repo))
    }
}
