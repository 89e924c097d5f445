use chrono::{DateTime, Utc};

use crate::engine::model::quote_name;

/// Assemble the final script: header, drops section, creates section.
/// Section headers appear only when their section has content.
pub fn compose(
    source_db: &str,
    target_db: &str,
    generated_at: DateTime<Utc>,
    drops: &[String],
    creates: &[String],
) -> String {
    let mut script = String::new();
    script.push_str(&format!("-- SQLDiff source: {}\n", quote_name(source_db)));
    script.push_str(&format!("-- SQLDiff target: {}\n", quote_name(target_db)));
    script.push_str(&format!(
        "-- Generated (UTC): {}\n",
        generated_at.format("%Y-%m-%d %H:%M:%S")
    ));
    script.push('\n');

    if !drops.is_empty() {
        script.push_str("-- Drops\n");
        for chunk in drops {
            script.push_str(chunk);
        }
        script.push('\n');
    }

    if !creates.is_empty() {
        script.push_str("-- Creates/Alters\n");
        for chunk in creates {
            script.push_str(chunk);
        }
    }

    script
}
