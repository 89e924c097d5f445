use anyhow::Result;
use tokio::runtime::Runtime;

use crate::cli::{CliArgs, ExtractArgs};
use crate::commands::common;
use crate::db::client;
use crate::db::connection::parse_connection_string;
use crate::db::snapshot as live;
use crate::engine::model::{quote_name, Snapshot};
use crate::engine::order::{order_creates, PendingCreate};
use crate::engine::scripter::ensure_batch_terminator;

pub fn run(args: &CliArgs, cmd: &ExtractArgs) -> Result<()> {
    let settings = parse_connection_string(&cmd.conn)?;
    let snapshot = Runtime::new()?.block_on(async {
        let mut client = client::connect(&settings).await?;
        live::read_snapshot(&mut client, &settings.database).await
    })?;

    common::write_text(&cmd.out, &render_full_script(&snapshot))?;
    if let Some(path) = &cmd.json {
        let body = serde_json::to_string_pretty(&snapshot)?;
        common::write_text(path, &body)?;
    }

    if !args.quiet {
        println!(
            "Wrote {} ({} objects from [{}])",
            cmd.out.display(),
            snapshot.objects.len(),
            snapshot.database_name
        );
    }
    Ok(())
}

/// Every object definition in dependency order, under a small header.
fn render_full_script(snapshot: &Snapshot) -> String {
    let pending: Vec<PendingCreate> = snapshot
        .objects
        .iter()
        .map(|object| PendingCreate {
            object: object.clone(),
            statement: ensure_batch_terminator(&object.definition),
        })
        .collect();

    let mut script = String::new();
    script.push_str(&format!(
        "-- SQLDiff extract: {}\n",
        quote_name(&snapshot.database_name)
    ));
    script.push_str(&format!(
        "-- Generated (UTC): {}\n\n",
        snapshot.generated_at_utc.format("%Y-%m-%d %H:%M:%S")
    ));
    for chunk in order_creates(&pending) {
        script.push_str(&chunk);
    }
    script
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::engine::model::{ObjectKind, SchemaObject};

    #[test]
    fn full_script_orders_objects_and_terminates_batches() {
        let snapshot = Snapshot {
            database_name: "Inventory".to_string(),
            generated_at_utc: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
            objects: vec![
                SchemaObject {
                    kind: ObjectKind::View,
                    schema: "dbo".to_string(),
                    name: "V".to_string(),
                    definition: "CREATE VIEW dbo.V AS SELECT 1".to_string(),
                    dependencies: BTreeSet::new(),
                },
                SchemaObject {
                    kind: ObjectKind::Table,
                    schema: "dbo".to_string(),
                    name: "T".to_string(),
                    definition: "CREATE TABLE [dbo].[T] ( [Id] int NOT NULL );\nGO\n".to_string(),
                    dependencies: BTreeSet::new(),
                },
            ],
        };
        let script = render_full_script(&snapshot);
        assert!(script.starts_with("-- SQLDiff extract: [Inventory]\n"));
        let table = script.find("CREATE TABLE").unwrap();
        let view = script.find("CREATE VIEW").unwrap();
        assert!(table < view);
        assert!(script.ends_with("CREATE VIEW dbo.V AS SELECT 1\nGO\n"));
    }
}
