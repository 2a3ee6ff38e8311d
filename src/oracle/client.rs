use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::NaiveDateTime;
use oracle::Connection;
use tera::Context;
use tracing::debug;

use crate::{
    config::DatabaseConfig,
    db::{DatabaseClient, DatabaseConnector},
    errors::PipelineError,
    types::{DatabaseObject, ObjectKind, ObjectName},
    utils::{get_query, sql_literal},
};

pub struct OracleClient {
    conn: Mutex<Connection>,
    target: String,
}

impl OracleClient {
    pub fn connect(config: &DatabaseConfig) -> Result<Self, PipelineError> {
        let conn = Connection::connect(
            &config.username,
            &config.password,
            config.connect_string(),
        )
        .map_err(|e| PipelineError::Connection {
            target: config.target(),
            message: format!(
                "{} (user '{}', connect string '{}', password is hidden)",
                e,
                config.username,
                config.connect_string()
            ),
        })?;

        debug!(target_db = %config.target(), "Connected");
        Ok(Self {
            conn: Mutex::new(conn),
            target: config.target(),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, PipelineError> {
        self.conn.lock().map_err(|_| PipelineError::Connection {
            target: self.target.clone(),
            message: "connection lock poisoned".to_string(),
        })
    }
}

fn query_error(e: oracle::Error) -> PipelineError {
    PipelineError::Query(e.to_string())
}

#[async_trait]
impl DatabaseClient for OracleClient {
    async fn list_objects(
        &self,
        since: Option<NaiveDateTime>,
    ) -> Result<Vec<DatabaseObject>, PipelineError> {
        let mut ctx = Context::new();
        ctx.insert("has_since", &since.is_some());
        ctx.insert(
            "since",
            &since
                .map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_default(),
        );

        let query = get_query("objects.sql.jinja", &ctx)?;
        debug!("Query: {}", query);

        let conn = self.conn()?;
        let rows = conn.query(query.as_str(), &[]).map_err(query_error)?;

        let mut objects = Vec::new();
        for row_result in rows {
            let row = row_result.map_err(query_error)?;

            let schema: String = row.get("schema_name").map_err(query_error)?;
            let name: String = row.get("object_name").map_err(query_error)?;
            let object_type: String = row.get("object_type").map_err(query_error)?;

            objects.push(DatabaseObject {
                name: ObjectName::new(schema, name),
                kind: ObjectKind::from_catalog(&object_type),
                created: row.get("created").map_err(query_error)?,
                modified: row.get("last_ddl_time").map_err(query_error)?,
                definition: None,
            });
        }

        Ok(objects)
    }

    async fn definition(&self, object: &DatabaseObject) -> Result<Option<String>, PipelineError> {
        let mut ctx = Context::new();
        ctx.insert("metadata_type", object.kind.catalog_name());
        ctx.insert("object_type", object.kind.catalog_name());
        ctx.insert("schema", &sql_literal(object.name.schema()));
        ctx.insert("name", &sql_literal(object.name.name()));

        let query = get_query("definition.sql.jinja", &ctx)?;
        debug!("Definition query: {}", query);

        let conn = self.conn()?;
        let mut rows = conn.query(query.as_str(), &[]).map_err(query_error)?;

        match rows.next() {
            Some(row) => {
                let definition: Option<String> =
                    row.map_err(query_error)?.get(0).map_err(query_error)?;
                Ok(definition)
            }
            None => Ok(None),
        }
    }

    async fn execute(&self, sql: &str) -> Result<(), PipelineError> {
        let conn = self.conn()?;
        conn.execute(sql, &[])
            .map_err(|e| PipelineError::Execution(e.to_string()))?;
        conn.commit()
            .map_err(|e| PipelineError::Execution(e.to_string()))?;
        Ok(())
    }
}

/// Opens Oracle sessions from configured connection details.
#[derive(Debug, Clone, Default)]
pub struct OracleConnector;

#[async_trait]
impl DatabaseConnector for OracleConnector {
    async fn connect(
        &self,
        config: &DatabaseConfig,
    ) -> Result<Box<dyn DatabaseClient>, PipelineError> {
        Ok(Box::new(OracleClient::connect(config)?))
    }
}
