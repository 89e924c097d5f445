use anyhow::Result;
use chrono::Utc;
use tokio::runtime::Runtime;

use crate::cli::{CliArgs, SyncArgs};
use crate::commands::{apply, common};
use crate::db::client;
use crate::engine::differ::{self, DiffOptions};

/// `sync` writes the diff script and applies it when asked; `deploy`
/// dispatches here with apply forced on.
pub fn run(args: &CliArgs, cmd: &SyncArgs) -> Result<()> {
    let rt = Runtime::new()?;

    // Validate before any extraction work so a bad invocation fails fast.
    let target_settings = if cmd.apply {
        Some(common::require_target_connection(&cmd.target)?)
    } else {
        None
    };

    let (source, target) = rt.block_on(async {
        tokio::try_join!(common::load_side(&cmd.source), common::load_side(&cmd.target))
    })?;

    let options = DiffOptions {
        include_drops: cmd.include_drops,
        include_table_drops: cmd.include_table_drops,
        allow_table_rebuild: cmd.allow_table_rebuild,
        add_only: cmd.add_only,
    };
    let result = differ::diff(&source, &target, &options, Utc::now());

    common::write_text(&cmd.out, &result.script)?;
    if !args.quiet {
        println!("Wrote {} ({})", cmd.out.display(), result.summary());
    }

    if cmd.dry_run {
        if !args.quiet {
            apply::print_batches(&apply::split_batches(&result.script));
        }
        return Ok(());
    }

    if let Some(settings) = target_settings {
        let executed = rt.block_on(async {
            let mut client = client::connect(&settings).await?;
            apply::execute_script(&mut client, &result.script, cmd.timeout_seconds).await
        })?;
        if !args.quiet {
            println!("Applied {} batch(es) to [{}].", executed, settings.database);
        }
    }

    Ok(())
}
