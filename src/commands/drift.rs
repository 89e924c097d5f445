use anyhow::Result;
use chrono::Utc;
use tokio::runtime::Runtime;

use crate::cli::{CliArgs, DriftArgs};
use crate::commands::common;
use crate::engine::differ::{self, DiffOptions};

/// Like `diff`, but drops default on and a non-empty diff exits 2 so CI
/// pipelines can gate on schema drift.
pub fn run(args: &CliArgs, cmd: &DriftArgs) -> Result<()> {
    let rt = Runtime::new()?;
    let (source, target) = rt.block_on(async {
        tokio::try_join!(common::load_side(&cmd.source), common::load_side(&cmd.target))
    })?;

    let options = DiffOptions {
        include_drops: true,
        include_table_drops: true,
        allow_table_rebuild: false,
        add_only: false,
    };
    let result = differ::diff(&source, &target, &options, Utc::now());

    match &cmd.out {
        Some(path) => {
            common::write_text(path, &result.script)?;
            if !args.quiet {
                println!("Wrote {} ({})", path.display(), result.summary());
            }
        }
        None => print!("{}", result.script),
    }

    if result.has_changes() {
        if !args.quiet {
            eprintln!(
                "Drift detected between [{}] and [{}]: {}",
                source.database_name,
                target.database_name,
                result.summary()
            );
        }
        std::process::exit(2);
    }
    if !args.quiet {
        eprintln!("No drift detected.");
    }
    Ok(())
}
