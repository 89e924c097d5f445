use std::fs;
use std::sync::OnceLock;
use std::time::Duration;

use anyhow::Result;
use regex::Regex;
use tokio::runtime::Runtime;

use crate::cli::{ApplyArgs, CliArgs};
use crate::db::client::{self, SqlClient};
use crate::db::connection::parse_connection_string;
use crate::db::executor;
use crate::error::{AppError, ErrorKind};

pub fn run(args: &CliArgs, cmd: &ApplyArgs) -> Result<()> {
    let script = fs::read_to_string(&cmd.script).map_err(|err| {
        AppError::new(
            ErrorKind::Io,
            format!("Failed to read script {}: {}", cmd.script.display(), err),
        )
    })?;
    let batches = split_batches(&script);
    if batches.is_empty() {
        return Err(AppError::new(ErrorKind::Usage, "No SQL batches found in script").into());
    }

    if cmd.dry_run {
        if !args.quiet {
            print_batches(&batches);
        }
        return Ok(());
    }

    let settings = parse_connection_string(&cmd.conn)?;
    let executed = Runtime::new()?.block_on(async {
        let mut client = client::connect(&settings).await?;
        execute_script(&mut client, &script, cmd.timeout_seconds).await
    })?;

    if !args.quiet {
        println!("Executed {} batch(es) on [{}].", executed, settings.database);
    }
    Ok(())
}

/// Split a script on batch-separator lines: a sole `GO`, case-insensitive,
/// optionally followed by a line comment.
pub fn split_batches(script: &str) -> Vec<String> {
    let mut batches = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in script.lines() {
        if separator_re().is_match(line) {
            push_batch(&mut batches, &mut current);
        } else {
            current.push(line);
        }
    }
    push_batch(&mut batches, &mut current);

    batches
}

fn push_batch(batches: &mut Vec<String>, current: &mut Vec<&str>) {
    if current.is_empty() {
        return;
    }
    let batch = current.join("\n").trim().to_string();
    current.clear();
    if !batch.is_empty() {
        batches.push(batch);
    }
}

fn separator_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^\s*go\s*(?:--.*)?$").expect("valid regex"))
}

/// Execute every batch of `script` in order, each under the given timeout.
/// The first failing batch aborts the run.
pub async fn execute_script(
    client: &mut SqlClient,
    script: &str,
    timeout_seconds: u64,
) -> Result<usize> {
    let batches = split_batches(script);
    let limit = (timeout_seconds > 0).then(|| Duration::from_secs(timeout_seconds));
    let mut executed = 0;

    for batch in &batches {
        let run = executor::run_execute(batch, client);
        match limit {
            Some(duration) => match tokio::time::timeout(duration, run).await {
                Ok(outcome) => {
                    outcome?;
                }
                Err(_) => {
                    return Err(AppError::new(
                        ErrorKind::Query,
                        format!(
                            "Batch {} timed out after {} s",
                            executed + 1,
                            timeout_seconds
                        ),
                    )
                    .into())
                }
            },
            None => {
                run.await?;
            }
        }
        executed += 1;
        tracing::debug!(batch = executed, total = batches.len(), "batch applied");
    }
    Ok(executed)
}

pub fn print_batches(batches: &[String]) {
    println!("Dry run: {} batch(es)", batches.len());
    for (index, batch) in batches.iter().enumerate() {
        println!("-- Batch {}", index + 1);
        println!("{}", batch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_batches_on_go_lines() {
        let script = "SELECT 1\nGO\nSELECT 2\ngo\nSELECT 3";
        let batches = split_batches(script);
        assert_eq!(batches, vec!["SELECT 1", "SELECT 2", "SELECT 3"]);
    }

    #[test]
    fn separator_tolerates_whitespace_and_comments() {
        let script = "SELECT 1\n  GO  \nSELECT 2\nGO -- end of batch\nSELECT 3";
        let batches = split_batches(script);
        assert_eq!(batches.len(), 3);
    }

    #[test]
    fn go_inside_a_statement_is_not_a_separator() {
        let script = "SELECT 'GO' AS word\nGO";
        let batches = split_batches(script);
        assert_eq!(batches, vec!["SELECT 'GO' AS word"]);
    }

    #[test]
    fn blank_batches_are_dropped() {
        let script = "\nGO\n\nGO\nSELECT 1\n";
        let batches = split_batches(script);
        assert_eq!(batches, vec!["SELECT 1"]);
    }
}
