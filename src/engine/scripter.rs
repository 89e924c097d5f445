//! Rebuilds deterministic DDL text for catalog entities.
//!
//! Table scripts concatenate one batch group per statement: the CREATE
//! TABLE, then key constraints (PK before UNIQUE), foreign keys, checks,
//! and non-constraint indexes, each group alphabetical by name and
//! terminated by a `GO` line.

use std::sync::OnceLock;

use anyhow::Result;
use regex::Regex;

use crate::db::catalog::{
    CheckRow, ColumnRow, ForeignKeyRow, IndexRow, KeyConstraintRow, TableDetails,
};
use crate::engine::model::quote_name;
use crate::error::{AppError, ErrorKind};

pub const BATCH_SEPARATOR: &str = "GO";

/// Append a trailing `GO` line exactly once.
pub fn ensure_batch_terminator(statement: &str) -> String {
    let trimmed = statement.trim_end();
    let already_terminated = trimmed
        .lines()
        .last()
        .map(|line| line.trim().eq_ignore_ascii_case(BATCH_SEPARATOR))
        .unwrap_or(false);
    if already_terminated {
        format!("{}\n", trimmed)
    } else {
        format!("{}\n{}\n", trimmed, BATCH_SEPARATOR)
    }
}

/// Rewrite a leading `CREATE` keyword to `CREATE OR ALTER`, tolerating
/// leading whitespace. A body that does not begin with `CREATE` passes
/// through unchanged.
pub fn create_or_alter(definition: &str) -> String {
    let re = create_re();
    if re.is_match(definition) {
        re.replace(definition, "${lead}CREATE OR ALTER").to_string()
    } else {
        definition.to_string()
    }
}

fn create_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^(?P<lead>\s*)create\b").expect("valid regex"))
}

pub fn script_table(details: &TableDetails) -> Result<String> {
    let identifier = format!(
        "{}.{}",
        quote_name(&details.table.schema),
        quote_name(&details.table.name)
    );

    let mut batches = Vec::new();

    let columns = details
        .columns
        .iter()
        .map(render_column)
        .collect::<Vec<_>>()
        .join(", ");
    batches.push(format!("CREATE TABLE {} ( {} );", identifier, columns));

    let mut keys: Vec<&KeyConstraintRow> = details.key_constraints.iter().collect();
    keys.sort_by_key(|key| (key.kind_code != "PK", key.name.to_lowercase()));
    for key in keys {
        batches.push(render_key_constraint(&identifier, key)?);
    }

    let mut foreign_keys: Vec<&ForeignKeyRow> = details.foreign_keys.iter().collect();
    foreign_keys.sort_by_key(|fk| fk.name.to_lowercase());
    for fk in foreign_keys {
        batches.push(render_foreign_key(&identifier, fk));
    }

    let mut checks: Vec<&CheckRow> = details.checks.iter().collect();
    checks.sort_by_key(|check| check.name.to_lowercase());
    for check in checks {
        batches.push(render_check(&identifier, check));
    }

    let mut indexes: Vec<&IndexRow> = details.indexes.iter().collect();
    indexes.sort_by_key(|index| index.name.to_lowercase());
    for index in indexes {
        batches.push(render_index(&identifier, index));
    }

    let mut script = String::new();
    for batch in batches {
        script.push_str(&ensure_batch_terminator(&batch));
    }
    Ok(script)
}

fn render_column(column: &ColumnRow) -> String {
    if column.computed {
        let expression = column.computed_expression.as_deref().unwrap_or_default();
        let mut definition = format!("{} AS {}", quote_name(&column.name), expression);
        if column.persisted {
            definition.push_str(" PERSISTED");
        }
        return definition;
    }

    let mut definition = format!("{} {}", quote_name(&column.name), render_type(column));
    if let Some(collation) = &column.collation {
        definition.push_str(" COLLATE ");
        definition.push_str(collation);
    }
    if column.identity {
        let (seed, increment) = match (&column.identity_seed, &column.identity_increment) {
            (Some(seed), Some(increment)) => (seed.as_str(), increment.as_str()),
            _ => ("1", "1"),
        };
        definition.push_str(&format!(" IDENTITY({},{})", seed, increment));
    }
    if column.rowguid {
        definition.push_str(" ROWGUIDCOL");
    }
    definition.push_str(if column.nullable { " NULL" } else { " NOT NULL" });
    if let Some(expression) = &column.default_expression {
        if let Some(name) = &column.default_name {
            definition.push_str(" CONSTRAINT ");
            definition.push_str(&quote_name(name));
        }
        definition.push_str(" DEFAULT ");
        definition.push_str(expression);
    }
    definition
}

fn render_type(column: &ColumnRow) -> String {
    if column.user_defined {
        return format!("{}.{}", column.type_schema, column.type_name);
    }
    let name = column.type_name.to_lowercase();
    match name.as_str() {
        "varchar" | "char" | "varbinary" | "binary" => {
            format!("{}({})", name, byte_length(column.max_length))
        }
        "nvarchar" | "nchar" => format!("{}({})", name, utf16_length(column.max_length)),
        "decimal" | "numeric" => format!("{}({},{})", name, column.precision, column.scale),
        "datetime2" | "datetimeoffset" | "time" => format!("{}({})", name, column.scale),
        "float" if column.precision != 53 => format!("float({})", column.precision),
        _ => name,
    }
}

fn byte_length(max_length: i64) -> String {
    if max_length == -1 {
        "MAX".to_string()
    } else {
        max_length.to_string()
    }
}

// nchar/nvarchar store UTF-16 code units; catalog lengths are bytes.
fn utf16_length(max_length: i64) -> String {
    if max_length == -1 {
        "MAX".to_string()
    } else {
        (max_length / 2).to_string()
    }
}

fn render_key_constraint(identifier: &str, key: &KeyConstraintRow) -> Result<String> {
    let constraint = match key.kind_code.as_str() {
        "PK" => "PRIMARY KEY",
        "UQ" => "UNIQUE",
        other => {
            return Err(AppError::new(
                ErrorKind::Catalog,
                format!("Unknown key constraint code '{}' on {}", other, identifier),
            )
            .into())
        }
    };
    let columns = key
        .key_columns
        .iter()
        .filter(|column| !column.included && column.key_ordinal > 0)
        .map(|column| quote_name(&column.name))
        .collect::<Vec<_>>()
        .join(", ");
    Ok(format!(
        "ALTER TABLE {} ADD CONSTRAINT {} {} {} ({});",
        identifier,
        quote_name(&key.name),
        constraint,
        clustering(&key.index_type_desc),
        columns
    ))
}

// "NONCLUSTERED" contains "CLUSTERED", so only descriptions with neither
// word fall back.
fn clustering(type_desc: &str) -> String {
    let description = type_desc.replace('_', " ");
    if description.contains("CLUSTERED") {
        description
    } else {
        "NONCLUSTERED".to_string()
    }
}

fn render_foreign_key(identifier: &str, fk: &ForeignKeyRow) -> String {
    let check = if fk.not_trusted {
        "WITH NOCHECK"
    } else {
        "WITH CHECK"
    };
    let columns = fk
        .columns
        .iter()
        .map(|column| quote_name(&column.parent_column))
        .collect::<Vec<_>>()
        .join(", ");
    let referenced_columns = fk
        .columns
        .iter()
        .map(|column| quote_name(&column.referenced_column))
        .collect::<Vec<_>>()
        .join(", ");
    let referenced = format!(
        "{}.{}",
        quote_name(&fk.referenced_schema),
        quote_name(&fk.referenced_table)
    );

    let mut statement = format!(
        "ALTER TABLE {} {} ADD CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {} ({})",
        identifier,
        check,
        quote_name(&fk.name),
        columns,
        referenced,
        referenced_columns
    );
    if let Some(action) = referential_action(&fk.delete_action) {
        statement.push_str(" ON DELETE ");
        statement.push_str(action);
    }
    if let Some(action) = referential_action(&fk.update_action) {
        statement.push_str(" ON UPDATE ");
        statement.push_str(action);
    }
    if fk.not_for_replication {
        statement.push_str(" NOT FOR REPLICATION");
    }
    statement.push(';');
    if fk.disabled {
        statement.push_str(&format!(
            "\nALTER TABLE {} NOCHECK CONSTRAINT {};",
            identifier,
            quote_name(&fk.name)
        ));
    }
    statement
}

fn referential_action(description: &str) -> Option<&'static str> {
    match description {
        "CASCADE" => Some("CASCADE"),
        "SET_NULL" => Some("SET NULL"),
        "SET_DEFAULT" => Some("SET DEFAULT"),
        _ => None,
    }
}

fn render_check(identifier: &str, check: &CheckRow) -> String {
    let with = if check.not_trusted {
        "WITH NOCHECK"
    } else {
        "WITH CHECK"
    };
    let mut statement = format!(
        "ALTER TABLE {} {} ADD CONSTRAINT {} CHECK {};",
        identifier,
        with,
        quote_name(&check.name),
        check.expression
    );
    if check.disabled {
        statement.push_str(&format!(
            "\nALTER TABLE {} NOCHECK CONSTRAINT {};",
            identifier,
            quote_name(&check.name)
        ));
    }
    statement
}

fn render_index(identifier: &str, index: &IndexRow) -> String {
    let unique = if index.unique { "UNIQUE " } else { "" };
    let keys = index
        .columns
        .iter()
        .filter(|column| !column.included && column.key_ordinal > 0)
        .map(|column| {
            format!(
                "{} {}",
                quote_name(&column.name),
                if column.descending { "DESC" } else { "ASC" }
            )
        })
        .collect::<Vec<_>>()
        .join(", ");

    let mut statement = format!(
        "CREATE {}{} INDEX {} ON {} ({})",
        unique,
        index.type_desc.replace('_', " "),
        quote_name(&index.name),
        identifier,
        keys
    );
    let includes = index
        .columns
        .iter()
        .filter(|column| column.included)
        .map(|column| quote_name(&column.name))
        .collect::<Vec<_>>();
    if !includes.is_empty() {
        statement.push_str(&format!(" INCLUDE ({})", includes.join(", ")));
    }
    if let Some(filter) = &index.filter {
        statement.push_str(" WHERE ");
        statement.push_str(filter);
    }
    statement.push(';');
    if index.disabled {
        statement.push_str(&format!(
            "\nALTER INDEX {} ON {} DISABLE;",
            quote_name(&index.name),
            identifier
        ));
    }
    statement
}
