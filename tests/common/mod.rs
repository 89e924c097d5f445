use std::path::{Path, PathBuf};

use serde_json::{json, Value};

/// Write a snapshot document with the given objects and return its path.
pub fn write_snapshot(dir: &Path, file: &str, database: &str, objects: Value) -> PathBuf {
    let doc = json!({
        "DatabaseName": database,
        "GeneratedAtUtc": "2026-01-01T00:00:00Z",
        "Objects": objects,
    });
    let path = dir.join(file);
    std::fs::write(&path, serde_json::to_string_pretty(&doc).unwrap()).unwrap();
    path
}

pub fn table(name: &str, definition: &str, dependencies: &[&str]) -> Value {
    object("Table", name, definition, dependencies)
}

pub fn view(name: &str, definition: &str) -> Value {
    object("View", name, definition, &[])
}

pub fn procedure(name: &str, definition: &str) -> Value {
    object("StoredProcedure", name, definition, &[])
}

fn object(kind: &str, name: &str, definition: &str, dependencies: &[&str]) -> Value {
    json!({
        "Type": kind,
        "Schema": "dbo",
        "Name": name,
        "Definition": definition,
        "Dependencies": dependencies,
    })
}
