use std::path::PathBuf;

use clap::{Arg, ArgAction, ArgGroup, ArgMatches, Command, ValueHint};

#[derive(Debug, Clone)]
pub struct CliArgs {
    pub verbose: u8,
    pub quiet: bool,
    pub command: CommandKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandKind {
    Extract(ExtractArgs),
    Diff(DiffArgs),
    Drift(DriftArgs),
    Sync(SyncArgs),
    Deploy(SyncArgs),
    Apply(ApplyArgs),
    CheckConn(CheckConnArgs),
}

/// One side of a comparison: a live connection or a persisted snapshot
/// document, never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SideArgs {
    pub conn: Option<String>,
    pub snapshot: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractArgs {
    pub conn: String,
    pub out: PathBuf,
    pub json: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffArgs {
    pub source: SideArgs,
    pub target: SideArgs,
    pub out: PathBuf,
    pub include_drops: bool,
    pub include_table_drops: bool,
    pub allow_table_rebuild: bool,
    pub add_only: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriftArgs {
    pub source: SideArgs,
    pub target: SideArgs,
    pub out: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncArgs {
    pub source: SideArgs,
    pub target: SideArgs,
    pub out: PathBuf,
    pub include_drops: bool,
    pub include_table_drops: bool,
    pub allow_table_rebuild: bool,
    pub add_only: bool,
    pub apply: bool,
    pub dry_run: bool,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyArgs {
    pub conn: String,
    pub script: PathBuf,
    pub dry_run: bool,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckConnArgs {
    pub conns: Vec<String>,
    pub timeout_seconds: u64,
}

pub fn build_cli() -> Command {
    let mut cmd = Command::new("sqldiff")
        .about("Schema diff and migration script generator for SQL Server")
        .version(env!("CARGO_PKG_VERSION"))
        .arg_required_else_help(true)
        .subcommand_required(true)
        .subcommand_value_name("COMMAND")
        .args_override_self(true);

    cmd = add_global_args(cmd);

    cmd = cmd.subcommand(command_extract());
    cmd = cmd.subcommand(command_diff());
    cmd = cmd.subcommand(command_drift());
    cmd = cmd.subcommand(command_sync());
    cmd = cmd.subcommand(command_deploy());
    cmd = cmd.subcommand(command_apply());
    cmd = cmd.subcommand(command_check_conn());

    cmd
}

pub fn parse_args() -> CliArgs {
    // Exit 2 is reserved for drift detection, so invocation errors map to 1
    // instead of clap's default.
    let matches = match build_cli().try_get_matches() {
        Ok(matches) => matches,
        Err(err) => {
            let _ = err.print();
            std::process::exit(if err.use_stderr() { 1 } else { 0 });
        }
    };
    parse_matches(&matches)
}

fn add_global_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("verbose")
            .short('v')
            .long("verbose")
            .action(ArgAction::Count)
            .global(true)
            .help("Enable debug logging"),
    )
    .arg(
        Arg::new("quiet")
            .short('q')
            .long("quiet")
            .action(ArgAction::SetTrue)
            .global(true)
            .help("Suppress non-error output"),
    )
}

fn conn_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name).long(name).value_name("CONN").help(help)
}

fn out_arg(default: Option<&'static str>) -> Arg {
    let mut arg = Arg::new("out")
        .long("out")
        .value_name("PATH")
        .value_hint(ValueHint::FilePath)
        .help("Output script path");
    if let Some(default) = default {
        arg = arg.default_value(default);
    }
    arg
}

fn timeout_arg(default: &'static str) -> Arg {
    Arg::new("timeout-seconds")
        .long("timeout-seconds")
        .value_name("SECS")
        .value_parser(clap::value_parser!(u64))
        .default_value(default)
        .help("Per-statement timeout in seconds")
}

fn flag(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .action(ArgAction::SetTrue)
        .help(help)
}

fn add_side_args(cmd: Command) -> Command {
    cmd.arg(conn_arg("source", "Source connection string"))
        .arg(
            Arg::new("source-snapshot")
                .long("source-snapshot")
                .value_name("PATH")
                .value_hint(ValueHint::FilePath)
                .conflicts_with("source")
                .help("Source snapshot document"),
        )
        .group(
            ArgGroup::new("source-input")
                .args(["source", "source-snapshot"])
                .required(true),
        )
        .arg(conn_arg("target", "Target connection string"))
        .arg(
            Arg::new("target-snapshot")
                .long("target-snapshot")
                .value_name("PATH")
                .value_hint(ValueHint::FilePath)
                .conflicts_with("target")
                .help("Target snapshot document"),
        )
        .group(
            ArgGroup::new("target-input")
                .args(["target", "target-snapshot"])
                .required(true),
        )
}

fn add_diff_flags(cmd: Command) -> Command {
    cmd.arg(flag(
        "include-drops",
        "Emit DROP statements for objects that exist only on the target",
    ))
    .arg(flag(
        "include-table-drops",
        "Allow DROP TABLE for target-only tables",
    ))
    .arg(flag(
        "allow-table-rebuild",
        "Rebuild changed tables with DROP + CREATE (data loss)",
    ))
    .arg(flag(
        "add-only",
        "Only create objects missing on the target; never drop or alter",
    ))
}

fn command_extract() -> Command {
    Command::new("extract")
        .about("Script the full schema of one database")
        .arg(conn_arg("conn", "Connection string").required(true))
        .arg(out_arg(Some("schema.sql")))
        .arg(
            Arg::new("json")
                .long("json")
                .value_name("PATH")
                .value_hint(ValueHint::FilePath)
                .help("Also write a snapshot document"),
        )
}

fn command_diff() -> Command {
    let cmd = Command::new("diff").about("Write a migration script that makes target match source");
    add_diff_flags(add_side_args(cmd)).arg(out_arg(Some("diff.sql")))
}

fn command_drift() -> Command {
    let cmd = Command::new("drift")
        .about("Detect schema drift between two databases (exit 2 when present)");
    add_side_args(cmd).arg(out_arg(None))
}

fn command_sync() -> Command {
    let cmd = Command::new("sync").about("Diff and optionally apply the script to the target");
    add_diff_flags(add_side_args(cmd))
        .arg(out_arg(Some("sync.diff.sql")))
        .arg(flag("apply", "Execute the generated script on the target"))
        .arg(flag("dry-run", "Print batches without executing"))
        .arg(timeout_arg("120"))
}

fn command_deploy() -> Command {
    let cmd = Command::new("deploy")
        .visible_alias("delta-apply")
        .about("Diff and apply the script to the target");
    add_diff_flags(add_side_args(cmd))
        .arg(out_arg(Some("sync.diff.sql")))
        .arg(flag("dry-run", "Print batches without executing"))
        .arg(timeout_arg("120"))
}

fn command_apply() -> Command {
    Command::new("apply")
        .about("Execute a script batch by batch")
        .arg(conn_arg("conn", "Connection string").required(true))
        .arg(
            Arg::new("script")
                .long("script")
                .value_name("PATH")
                .value_hint(ValueHint::FilePath)
                .required(true)
                .help("Script file to execute"),
        )
        .arg(flag("dry-run", "Print batches without executing"))
        .arg(timeout_arg("120"))
}

fn command_check_conn() -> Command {
    Command::new("check-conn")
        .about("Probe connections and report server details")
        .arg(
            conn_arg("conn", "Connection string (repeatable)")
                .action(ArgAction::Append)
                .required(true),
        )
        .arg(timeout_arg("15"))
}

fn parse_matches(matches: &ArgMatches) -> CliArgs {
    let verbose = matches.get_count("verbose");
    let quiet = matches.get_flag("quiet");

    let command = match matches.subcommand() {
        Some(("extract", sub_m)) => CommandKind::Extract(ExtractArgs {
            conn: sub_m.get_one::<String>("conn").cloned().unwrap_or_default(),
            out: sub_m
                .get_one::<String>("out")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("schema.sql")),
            json: sub_m.get_one::<String>("json").map(PathBuf::from),
        }),
        Some(("diff", sub_m)) => CommandKind::Diff(DiffArgs {
            source: parse_side(sub_m, "source", "source-snapshot"),
            target: parse_side(sub_m, "target", "target-snapshot"),
            out: sub_m
                .get_one::<String>("out")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("diff.sql")),
            include_drops: sub_m.get_flag("include-drops"),
            include_table_drops: sub_m.get_flag("include-table-drops"),
            allow_table_rebuild: sub_m.get_flag("allow-table-rebuild"),
            add_only: sub_m.get_flag("add-only"),
        }),
        Some(("drift", sub_m)) => CommandKind::Drift(DriftArgs {
            source: parse_side(sub_m, "source", "source-snapshot"),
            target: parse_side(sub_m, "target", "target-snapshot"),
            out: sub_m.get_one::<String>("out").map(PathBuf::from),
        }),
        Some(("sync", sub_m)) => CommandKind::Sync(parse_sync(sub_m, sub_m.get_flag("apply"))),
        Some(("deploy", sub_m)) => CommandKind::Deploy(parse_sync(sub_m, true)),
        Some(("apply", sub_m)) => CommandKind::Apply(ApplyArgs {
            conn: sub_m.get_one::<String>("conn").cloned().unwrap_or_default(),
            script: sub_m
                .get_one::<String>("script")
                .map(PathBuf::from)
                .unwrap_or_default(),
            dry_run: sub_m.get_flag("dry-run"),
            timeout_seconds: sub_m
                .get_one::<u64>("timeout-seconds")
                .copied()
                .unwrap_or(120),
        }),
        Some(("check-conn", sub_m)) => CommandKind::CheckConn(CheckConnArgs {
            conns: sub_m
                .get_many::<String>("conn")
                .map(|values| values.cloned().collect())
                .unwrap_or_default(),
            timeout_seconds: sub_m
                .get_one::<u64>("timeout-seconds")
                .copied()
                .unwrap_or(15),
        }),
        _ => unreachable!("clap rejects unknown commands"),
    };

    CliArgs {
        verbose,
        quiet,
        command,
    }
}

fn parse_side(matches: &ArgMatches, conn: &str, snapshot: &str) -> SideArgs {
    SideArgs {
        conn: matches.get_one::<String>(conn).cloned(),
        snapshot: matches.get_one::<String>(snapshot).map(PathBuf::from),
    }
}

fn parse_sync(matches: &ArgMatches, apply: bool) -> SyncArgs {
    SyncArgs {
        source: parse_side(matches, "source", "source-snapshot"),
        target: parse_side(matches, "target", "target-snapshot"),
        out: matches
            .get_one::<String>("out")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("sync.diff.sql")),
        include_drops: matches.get_flag("include-drops"),
        include_table_drops: matches.get_flag("include-table-drops"),
        allow_table_rebuild: matches.get_flag("allow-table-rebuild"),
        add_only: matches.get_flag("add-only"),
        apply,
        dry_run: matches.get_flag("dry-run"),
        timeout_seconds: matches
            .get_one::<u64>("timeout-seconds")
            .copied()
            .unwrap_or(120),
    }
}
