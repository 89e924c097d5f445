//! Per-object verdicts and script assembly for two snapshots.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::engine::compose;
use crate::engine::model::{ObjectKind, SchemaObject, Snapshot};
use crate::engine::normalize::normalize;
use crate::engine::order::{order_creates, PendingCreate};
use crate::engine::scripter::{create_or_alter, ensure_batch_terminator};

#[derive(Debug, Clone, Copy, Default)]
pub struct DiffOptions {
    pub include_drops: bool,
    pub include_table_drops: bool,
    pub allow_table_rebuild: bool,
    pub add_only: bool,
}

#[derive(Debug, Clone)]
pub struct DiffResult {
    pub script: String,
    pub added: usize,
    pub changed: usize,
    pub removed: usize,
    pub skipped: usize,
}

impl DiffResult {
    pub fn has_changes(&self) -> bool {
        self.added + self.changed + self.removed > 0
    }

    pub fn summary(&self) -> String {
        format!(
            "added {}, changed {}, removed {}, skipped {}",
            self.added, self.changed, self.removed, self.skipped
        )
    }
}

/// Compute the migration script that transforms `target` into `source`.
/// The caller supplies the header timestamp so output is a pure function
/// of its inputs.
pub fn diff(
    source: &Snapshot,
    target: &Snapshot,
    options: &DiffOptions,
    generated_at: DateTime<Utc>,
) -> DiffResult {
    let source_by_key: HashMap<String, &SchemaObject> = source
        .objects
        .iter()
        .map(|object| (object.lookup_key(), object))
        .collect();
    let target_by_key: HashMap<String, &SchemaObject> = target
        .objects
        .iter()
        .map(|object| (object.lookup_key(), object))
        .collect();

    let mut added = 0;
    let mut changed = 0;
    let mut removed = 0;
    let mut skipped = 0;
    let mut drops: Vec<String> = Vec::new();
    let mut notes: Vec<String> = Vec::new();
    let mut pending: Vec<PendingCreate> = Vec::new();

    let mut source_objects: Vec<&SchemaObject> = source.objects.iter().collect();
    source_objects.sort_by_key(|object| (object.kind.create_priority(), object.lookup_key()));

    for object in source_objects {
        match target_by_key.get(&object.lookup_key()) {
            None => {
                pending.push(PendingCreate {
                    object: object.clone(),
                    statement: ensure_batch_terminator(&object.definition),
                });
                added += 1;
            }
            Some(existing) if normalize(&existing.definition) == normalize(&object.definition) => {}
            Some(_) => {
                changed += 1;
                if options.add_only {
                    skipped += 1;
                } else if object.kind == ObjectKind::Table {
                    if options.allow_table_rebuild {
                        drops.push(render_drop(object));
                        pending.push(PendingCreate {
                            object: object.clone(),
                            statement: ensure_batch_terminator(&object.definition),
                        });
                    } else {
                        skipped += 1;
                        notes.push(format!(
                            "-- WARNING: table {} differs from the target but was not rebuilt.\n\
                             -- Re-run with --allow-table-rebuild to drop and recreate it.\n",
                            object.identifier()
                        ));
                    }
                } else {
                    pending.push(PendingCreate {
                        object: object.clone(),
                        statement: ensure_batch_terminator(&create_or_alter(&object.definition)),
                    });
                }
            }
        }
    }

    if options.include_drops && options.add_only {
        skipped += 1;
        drops.push("-- --include-drops ignored because --add-only is set.\n".to_string());
    } else if options.include_drops {
        let mut target_objects: Vec<&SchemaObject> = target.objects.iter().collect();
        target_objects.sort_by_key(|object| (object.kind.drop_priority(), object.lookup_key()));
        for object in target_objects {
            if source_by_key.contains_key(&object.lookup_key()) {
                continue;
            }
            if object.kind == ObjectKind::Table && !options.include_table_drops {
                skipped += 1;
                drops.push(format!(
                    "-- Table {} exists only in the target.\n\
                     -- Re-run with --include-table-drops to drop it.\n",
                    object.identifier()
                ));
            } else {
                drops.push(render_drop(object));
                removed += 1;
            }
        }
    }

    let mut creates = notes;
    creates.extend(order_creates(&pending));

    let script = compose::compose(
        &source.database_name,
        &target.database_name,
        generated_at,
        &drops,
        &creates,
    );

    DiffResult {
        script,
        added,
        changed,
        removed,
        skipped,
    }
}

fn render_drop(object: &SchemaObject) -> String {
    let identifier = object.identifier();
    format!(
        "IF OBJECT_ID(N'{identifier}') IS NOT NULL\n    DROP {keyword} {identifier};\nGO\n",
        identifier = identifier,
        keyword = object.kind.drop_keyword()
    )
}
