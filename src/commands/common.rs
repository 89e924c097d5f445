use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::cli::SideArgs;
use crate::db::client;
use crate::db::connection::{parse_connection_string, ConnectionSettings};
use crate::db::snapshot as live;
use crate::engine::model::Snapshot;
use crate::error::{AppError, ErrorKind};

/// Resolve one comparison side: load a persisted snapshot document, or
/// connect and extract a live one.
pub async fn load_side(side: &SideArgs) -> Result<Snapshot> {
    if let Some(path) = &side.snapshot {
        return load_snapshot_document(path);
    }
    let raw = side.conn.as_ref().ok_or_else(|| {
        AppError::new(
            ErrorKind::Usage,
            "Provide a connection string or a snapshot document",
        )
    })?;
    let settings = parse_connection_string(raw)?;
    let mut client = client::connect(&settings).await?;
    live::read_snapshot(&mut client, &settings.database).await
}

pub fn load_snapshot_document(path: &Path) -> Result<Snapshot> {
    let body = fs::read_to_string(path).map_err(|err| {
        AppError::new(
            ErrorKind::Io,
            format!("Failed to read snapshot {}: {}", path.display(), err),
        )
    })?;
    let snapshot = serde_json::from_str(&body).map_err(|err| {
        AppError::new(
            ErrorKind::Io,
            format!("Invalid snapshot document {}: {}", path.display(), err),
        )
    })?;
    Ok(snapshot)
}

pub fn write_text(path: &Path, body: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }
    fs::write(path, body).with_context(|| format!("Failed to write {}", path.display()))
}

/// A target that will have a script applied to it must be a live
/// connection, not a snapshot document.
pub fn require_target_connection(side: &SideArgs) -> Result<ConnectionSettings> {
    let raw = side.conn.as_ref().ok_or_else(|| {
        AppError::new(
            ErrorKind::Usage,
            "Applying a script requires a target connection, not a snapshot document",
        )
    })?;
    parse_connection_string(raw)
}
