mod args;

pub use args::{
    build_cli, ApplyArgs, CheckConnArgs, CliArgs, CommandKind, DiffArgs, DriftArgs, ExtractArgs,
    SideArgs, SyncArgs,
};

pub fn parse() -> CliArgs {
    args::parse_args()
}
