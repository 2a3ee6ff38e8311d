use std::collections::HashMap;

use chrono::NaiveDateTime;
use tracing::{debug, info};

use crate::{
    db::DatabaseClient,
    errors::PipelineError,
    types::{DatabaseObject, ObjectInventory, ObjectName},
};

/// Reads the catalog into an inventory. The cutoff is applied again on this
/// side so a lenient catalog query cannot widen the slice.
pub async fn fetch_inventory(
    client: &dyn DatabaseClient,
    since: Option<NaiveDateTime>,
) -> Result<ObjectInventory, PipelineError> {
    let objects = client.list_objects(since).await?;
    let total = objects.len();

    let objects: Vec<DatabaseObject> = match since {
        Some(cutoff) => objects
            .into_iter()
            .filter(|o| o.last_changed() >= cutoff)
            .collect(),
        None => objects,
    };

    info!(total, kept = objects.len(), since = ?since, "Fetched object inventory");
    Ok(ObjectInventory::new(objects))
}

/// Source text of a single object. Kinds without a stored body yield `None`
/// without touching the database.
pub async fn fetch_definition(
    client: &dyn DatabaseClient,
    object: &DatabaseObject,
) -> Result<Option<String>, PipelineError> {
    if let Some(definition) = &object.definition {
        return Ok(Some(definition.clone()));
    }
    if !object.kind.has_definition() {
        debug!(object = %object.name, kind = %object.kind, "No definition for kind");
        return Ok(None);
    }
    client.definition(object).await
}

/// Picks the requested objects out of an inventory, in request order.
/// Every unknown name is reported in a single error.
pub fn resolve_objects(
    inventory: &ObjectInventory,
    names: &[ObjectName],
) -> Result<Vec<DatabaseObject>, PipelineError> {
    let index: HashMap<String, &DatabaseObject> = inventory
        .objects()
        .iter()
        .rev()
        .map(|o| (o.name.key(), o))
        .collect();

    let mut resolved = Vec::with_capacity(names.len());
    let mut missing = Vec::new();

    for name in names {
        match index.get(&name.key()) {
            Some(object) => {
                if !resolved.iter().any(|o: &DatabaseObject| &o.name == name) {
                    resolved.push((*object).clone());
                }
            }
            None => missing.push(name.to_string()),
        }
    }

    if !missing.is_empty() {
        return Err(PipelineError::missing_objects(missing));
    }

    Ok(resolved)
}
