use std::sync::Arc;

use chrono::NaiveDateTime;
use tracing::{Instrument, info, info_span};

use crate::{
    config::DatabaseConfig,
    db::{DatabaseConnector, fetch_inventory},
    delta::find_changes_with_definitions,
    errors::PipelineError,
    types::ChangeSet,
    utils::ProgressReporter,
};

pub struct DiffService {
    connector: Arc<dyn DatabaseConnector>,
}

impl DiffService {
    pub fn new(connector: Arc<dyn DatabaseConnector>) -> Self {
        Self { connector }
    }

    /// Compares the source against the destination. `since` narrows the
    /// source side only; the destination is always read in full so that
    /// every changed source object can find its counterpart.
    pub async fn diff(
        &self,
        source: &DatabaseConfig,
        destination: &DatabaseConfig,
        since: Option<NaiveDateTime>,
        progress: &ProgressReporter,
    ) -> Result<ChangeSet, PipelineError> {
        let span = info_span!(
            "diff",
            source = %source.target(),
            destination = %destination.target()
        );

        async {
            progress.report(format!("Connecting to {}...", source.target()));
            let source_client = self.connector.connect(source).await?;
            progress.report(format!("Connecting to {}...", destination.target()));
            let destination_client = self.connector.connect(destination).await?;

            progress.report("Reading object catalogs...");
            let source_inventory = fetch_inventory(source_client.as_ref(), since).await?;
            let destination_inventory = fetch_inventory(destination_client.as_ref(), None).await?;

            progress.report("Comparing definitions...");
            let changes = find_changes_with_definitions(
                &source_inventory,
                &destination_inventory,
                source_client.as_ref(),
                destination_client.as_ref(),
            )
            .await?;

            info!(
                to_create = changes.to_create.len(),
                to_modify = changes.to_modify.len(),
                unchanged = changes.unchanged.len(),
                warnings = changes.warnings.len(),
                "Diff completed"
            );
            Ok(changes)
        }
        .instrument(span)
        .await
    }
}
