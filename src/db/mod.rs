mod inventory;

use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::{config::DatabaseConfig, errors::PipelineError, types::DatabaseObject};

pub use inventory::{fetch_definition, fetch_inventory, resolve_objects};

/// An open session against one database instance. Dropping it releases the
/// connection.
#[async_trait]
pub trait DatabaseClient: Send + Sync {
    /// Catalog rows of user objects. With `since`, only objects whose last
    /// change is at or after the cutoff.
    async fn list_objects(
        &self,
        since: Option<NaiveDateTime>,
    ) -> Result<Vec<DatabaseObject>, PipelineError>;

    /// Source text of the object, `None` when the catalog keeps none.
    async fn definition(&self, object: &DatabaseObject) -> Result<Option<String>, PipelineError>;

    /// Runs one batch of statements.
    async fn execute(&self, sql: &str) -> Result<(), PipelineError>;
}

#[async_trait]
pub trait DatabaseConnector: Send + Sync {
    async fn connect(&self, config: &DatabaseConfig)
    -> Result<Box<dyn DatabaseClient>, PipelineError>;
}
