use std::time::Instant;

use anyhow::Result;
use tiberius::Query;
use tokio::runtime::Runtime;

use crate::cli::{CheckConnArgs, CliArgs};
use crate::db::client;
use crate::db::connection::parse_connection_string;
use crate::db::executor;
use crate::db::types::{ResultSet, Value};

const PROBE: &str = "SELECT @@SERVERNAME AS server_name, \
                     DB_NAME() AS database_name, \
                     SUSER_SNAME() AS login_name, \
                     CONVERT(nvarchar(128), SERVERPROPERTY('ProductVersion')) AS product_version, \
                     CONVERT(nvarchar(128), SERVERPROPERTY('Edition')) AS edition";

pub fn run(args: &CliArgs, cmd: &CheckConnArgs) -> Result<()> {
    let rt = Runtime::new()?;
    for (index, raw) in cmd.conns.iter().enumerate() {
        let mut settings = parse_connection_string(raw)?;
        settings.timeout_ms = cmd.timeout_seconds * 1000;

        let started = Instant::now();
        let sets = rt.block_on(async {
            let mut client = client::connect(&settings).await?;
            executor::run_query(Query::new(PROBE), &mut client).await
        })?;
        let latency_ms = started.elapsed().as_millis();

        if args.quiet {
            continue;
        }
        if index > 0 {
            println!();
        }
        println!("Connection {} ok ({} ms)", index + 1, latency_ms);
        println!("  Server:   {}", probe_field(sets.first(), "server_name"));
        println!("  Database: {}", probe_field(sets.first(), "database_name"));
        println!("  Login:    {}", probe_field(sets.first(), "login_name"));
        println!("  Version:  {}", probe_field(sets.first(), "product_version"));
        println!("  Edition:  {}", probe_field(sets.first(), "edition"));
    }
    Ok(())
}

fn probe_field(rs: Option<&ResultSet>, name: &str) -> String {
    let Some(rs) = rs else {
        return "unknown".to_string();
    };
    let value = rs
        .column_index(name)
        .and_then(|index| rs.rows.first().and_then(|row| row.get(index)));
    match value {
        Some(Value::Null) | None => "unknown".to_string(),
        Some(value) => value.as_display(),
    }
}
