use anyhow::Result;
use chrono::Utc;
use tokio::runtime::Runtime;

use crate::cli::{CliArgs, DiffArgs};
use crate::commands::common;
use crate::engine::differ::{self, DiffOptions};

pub fn run(args: &CliArgs, cmd: &DiffArgs) -> Result<()> {
    let rt = Runtime::new()?;
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
    Ok(())
}
