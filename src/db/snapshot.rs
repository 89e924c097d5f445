//! Builds an in-memory snapshot from a live database.

use anyhow::Result;
use chrono::Utc;

use crate::db::catalog;
use crate::db::client::SqlClient;
use crate::engine::model::{dependency_key, ObjectKind, SchemaObject, Snapshot};
use crate::engine::scripter;

/// Read the full user schema of the connected database: tables first, each
/// table's sub-queries sequentially, then programmable modules, then
/// dependency edges. Any per-object failure aborts the whole snapshot.
pub async fn read_snapshot(client: &mut SqlClient, database_name: &str) -> Result<Snapshot> {
    let tables = catalog::read_tables(client).await?;
    tracing::debug!(
        database = database_name,
        tables = tables.len(),
        "reading table definitions"
    );

    let mut objects = Vec::new();
    for table in &tables {
        let details = catalog::read_table_details(client, table).await?;
        let definition = scripter::script_table(&details)?;
        let dependencies = details
            .foreign_keys
            .iter()
            .map(|fk| dependency_key(ObjectKind::Table, &fk.referenced_schema, &fk.referenced_table))
            .collect();
        objects.push(SchemaObject {
            kind: ObjectKind::Table,
            schema: table.schema.clone(),
            name: table.name.clone(),
            definition,
            dependencies,
        });
    }

    let modules = catalog::read_modules(client).await?;
    let edges = catalog::read_dependencies(client).await?;
    tracing::debug!(
        database = database_name,
        modules = modules.len(),
        "reading programmable objects"
    );
    for module in modules {
        let dependencies = edges.get(&module.object_id).cloned().unwrap_or_default();
        objects.push(SchemaObject {
            kind: module.kind,
            schema: module.schema,
            name: module.name,
            definition: module.definition,
            dependencies,
        });
    }

    Ok(Snapshot {
        database_name: database_name.to_string(),
        generated_at_utc: Utc::now(),
        objects,
    })
}
