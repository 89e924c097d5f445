mod apply;
mod check_conn;
mod common;
mod diff;
mod drift;
mod extract;
mod sync;

use anyhow::Result;

use crate::cli::{CliArgs, CommandKind};

pub fn dispatch(args: &CliArgs) -> Result<()> {
    match &args.command {
        CommandKind::Extract(cmd) => extract::run(args, cmd),
        CommandKind::Diff(cmd) => diff::run(args, cmd),
        CommandKind::Drift(cmd) => drift::run(args, cmd),
        CommandKind::Sync(cmd) => sync::run(args, cmd),
        CommandKind::Deploy(cmd) => sync::run(args, cmd),
        CommandKind::Apply(cmd) => apply::run(args, cmd),
        CommandKind::CheckConn(cmd) => check_conn::run(args, cmd),
    }
}
