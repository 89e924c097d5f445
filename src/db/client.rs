use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use anyhow::Result;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_util::compat::TokioAsyncWriteCompatExt;

use crate::db::connection::{build_config, ConnectionSettings};
use crate::error::{AppError, ErrorKind};

pub type SqlClient = tiberius::Client<tokio_util::compat::Compat<TcpStream>>;

/// Connect and log in to SQL Server using the resolved settings. DNS, TCP
/// and login failures surface as `Connection` errors, as does an elapsed
/// connect timeout.
pub async fn connect(settings: &ConnectionSettings) -> Result<SqlClient> {
    let config =
        build_config(settings).map_err(|err| AppError::new(ErrorKind::Usage, err.to_string()))?;
    let limit = (settings.timeout_ms > 0).then(|| Duration::from_millis(settings.timeout_ms));

    let tcp = bounded(
        limit,
        "Connect",
        settings.timeout_ms,
        TcpStream::connect(config.get_addr()),
    )
    .await?;
    tcp.set_nodelay(true)?;

    let client = bounded(
        limit,
        "Login",
        settings.timeout_ms,
        tiberius::Client::connect(config, tcp.compat_write()),
    )
    .await?;
    Ok(client)
}

async fn bounded<T, E, F>(
    limit: Option<Duration>,
    what: &str,
    timeout_ms: u64,
    future: F,
) -> Result<T>
where
    F: Future<Output = std::result::Result<T, E>>,
    E: Display,
{
    let outcome = match limit {
        Some(duration) => match timeout(duration, future).await {
            Ok(outcome) => outcome,
            Err(_) => {
                return Err(AppError::new(
                    ErrorKind::Connection,
                    format!("{} timed out after {} ms", what, timeout_ms),
                )
                .into())
            }
        },
        None => future.await,
    };
    outcome.map_err(|err| AppError::new(ErrorKind::Connection, err.to_string()).into())
}
