use std::collections::HashMap;

use tracing::{debug, warn};

use crate::{
    db::{DatabaseClient, fetch_definition},
    errors::PipelineError,
    types::{
        ChangeSet, DatabaseObject, DuplicateObjectWarning, Fingerprint, InventorySide,
        ModifiedObject, ObjectInventory,
    },
};

/// Definitions fetched on demand, keyed by object key.
#[derive(Default)]
struct Definitions {
    source: HashMap<String, Option<String>>,
    destination: HashMap<String, Option<String>>,
}

impl Definitions {
    fn lookup<'a>(
        map: &'a HashMap<String, Option<String>>,
        object: &'a DatabaseObject,
    ) -> Option<&'a str> {
        object
            .definition
            .as_deref()
            .or_else(|| map.get(&object.name.key()).and_then(|d| d.as_deref()))
    }
}

/// First occurrence of every name. Later duplicates are reported.
fn dedupe<'a>(
    objects: &'a [DatabaseObject],
    side: InventorySide,
    warnings: &mut Vec<DuplicateObjectWarning>,
) -> (Vec<&'a DatabaseObject>, HashMap<String, &'a DatabaseObject>) {
    let mut unique = Vec::with_capacity(objects.len());
    let mut index: HashMap<String, &DatabaseObject> = HashMap::with_capacity(objects.len());

    for object in objects {
        let key = object.name.key();
        match index.get(&key) {
            Some(kept) => {
                warn!(object = %object.name, %side, kept = %kept.kind, ignored = %object.kind, "Duplicate object name");
                warnings.push(DuplicateObjectWarning {
                    name: object.name.clone(),
                    side,
                    kept: kept.kind,
                    ignored: object.kind,
                });
            }
            None => {
                index.insert(key, object);
                unique.push(object);
            }
        }
    }

    (unique, index)
}

/// Matched pairs whose change timestamps differ. Only these need
/// definitions to be classified.
fn pairs_to_compare<'a>(
    sources: &[&'a DatabaseObject],
    destinations: &HashMap<String, &'a DatabaseObject>,
) -> Vec<(&'a DatabaseObject, &'a DatabaseObject)> {
    sources
        .iter()
        .filter_map(|s| destinations.get(&s.name.key()).map(|d| (*s, *d)))
        .filter(|(s, d)| s.last_changed() != d.last_changed())
        .collect()
}

fn classify(
    source: &ObjectInventory,
    destination: &ObjectInventory,
    definitions: &Definitions,
) -> ChangeSet {
    let mut changes = ChangeSet::default();

    let (sources, _) = dedupe(source.objects(), InventorySide::Source, &mut changes.warnings);
    let (_, destinations) = dedupe(
        destination.objects(),
        InventorySide::Destination,
        &mut changes.warnings,
    );

    for s in sources {
        let Some(d) = destinations.get(&s.name.key()) else {
            changes.to_create.push(s.clone());
            continue;
        };

        if s.last_changed() == d.last_changed() {
            changes.unchanged.push(s.clone());
            continue;
        }

        let source_fingerprint =
            Definitions::lookup(&definitions.source, s).map(Fingerprint::of);
        let destination_fingerprint =
            Definitions::lookup(&definitions.destination, d).map(Fingerprint::of);

        if source_fingerprint == destination_fingerprint {
            debug!(object = %s.name, "Timestamps differ but definitions match");
            changes.unchanged.push(s.clone());
        } else {
            changes.to_modify.push(ModifiedObject {
                source: s.clone(),
                destination: (*d).clone(),
                source_fingerprint,
                destination_fingerprint,
            });
        }
    }

    changes.to_create.sort_by(|a, b| a.name.cmp(&b.name));
    changes.to_modify.sort_by(|a, b| a.source.name.cmp(&b.source.name));
    changes.unchanged.sort_by(|a, b| a.name.cmp(&b.name));

    changes
}

/// Classifies every source object against the destination using the
/// definitions already carried by the inventories.
///
/// Equal change timestamps mean unchanged without looking at definitions.
/// Otherwise the fingerprints of the definitions decide; when neither side
/// has a definition the pair counts as unchanged.
pub fn find_changes(source: &ObjectInventory, destination: &ObjectInventory) -> ChangeSet {
    classify(source, destination, &Definitions::default())
}

/// Like [`find_changes`], fetching missing definitions from the two
/// databases only for the pairs whose timestamps differ.
pub async fn find_changes_with_definitions(
    source: &ObjectInventory,
    destination: &ObjectInventory,
    source_client: &dyn DatabaseClient,
    destination_client: &dyn DatabaseClient,
) -> Result<ChangeSet, PipelineError> {
    let mut scratch = Vec::new();
    let (sources, _) = dedupe(source.objects(), InventorySide::Source, &mut scratch);
    let (_, destinations) = dedupe(
        destination.objects(),
        InventorySide::Destination,
        &mut scratch,
    );

    let mut definitions = Definitions::default();
    for (s, d) in pairs_to_compare(&sources, &destinations) {
        if s.definition.is_none() {
            let fetched = fetch_definition(source_client, s).await?;
            definitions.source.insert(s.name.key(), fetched);
        }
        if d.definition.is_none() {
            let fetched = fetch_definition(destination_client, d).await?;
            definitions.destination.insert(d.name.key(), fetched);
        }
    }
    debug!(
        source_fetched = definitions.source.len(),
        destination_fetched = definitions.destination.len(),
        "Fetched definitions for comparison"
    );

    Ok(classify(source, destination, &definitions))
}
