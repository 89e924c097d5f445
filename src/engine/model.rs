use std::collections::BTreeSet;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, ErrorKind};

/// The four object kinds the engine understands. Kind drives creation and
/// drop ordering, DDL shape, and whether `CREATE OR ALTER` substitution
/// applies on change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    Table,
    View,
    StoredProcedure,
    Function,
}

impl ObjectKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ObjectKind::Table => "Table",
            ObjectKind::View => "View",
            ObjectKind::StoredProcedure => "StoredProcedure",
            ObjectKind::Function => "Function",
        }
    }

    /// Map a `sys.objects.type` code to a kind. Unknown codes fail fast.
    pub fn from_type_code(code: &str) -> Result<Self> {
        match code.trim() {
            "U" => Ok(ObjectKind::Table),
            "V" => Ok(ObjectKind::View),
            "P" => Ok(ObjectKind::StoredProcedure),
            "FN" | "IF" | "TF" | "FS" | "FT" => Ok(ObjectKind::Function),
            other => Err(AppError::new(
                ErrorKind::Catalog,
                format!("Unknown object type code '{}'", other),
            )
            .into()),
        }
    }

    /// Lower values are created earlier.
    pub fn create_priority(self) -> u8 {
        match self {
            ObjectKind::Table => 0,
            ObjectKind::Function => 1,
            ObjectKind::View => 2,
            ObjectKind::StoredProcedure => 3,
        }
    }

    /// Lower values are dropped earlier; the reverse of dependency order.
    pub fn drop_priority(self) -> u8 {
        match self {
            ObjectKind::View => 0,
            ObjectKind::StoredProcedure => 1,
            ObjectKind::Function => 2,
            ObjectKind::Table => 3,
        }
    }

    pub fn drop_keyword(self) -> &'static str {
        match self {
            ObjectKind::Table => "TABLE",
            ObjectKind::View => "VIEW",
            ObjectKind::StoredProcedure => "PROCEDURE",
            ObjectKind::Function => "FUNCTION",
        }
    }
}

/// Bracket-quote an identifier part, doubling any `]` inside the name.
pub fn quote_name(name: &str) -> String {
    format!("[{}]", name.replace(']', "]]"))
}

/// Dependency key in the `Kind:schema.name` form used for referential
/// linkage between snapshot objects.
pub fn dependency_key(kind: ObjectKind, schema: &str, name: &str) -> String {
    format!("{}:{}.{}", kind.as_str(), schema, name)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaObject {
    #[serde(rename = "Type")]
    pub kind: ObjectKind,
    #[serde(rename = "Schema")]
    pub schema: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Definition")]
    pub definition: String,
    #[serde(rename = "Dependencies")]
    pub dependencies: BTreeSet<String>,
}

impl SchemaObject {
    /// `[schema].[name]`, ready to splice into DDL.
    pub fn identifier(&self) -> String {
        format!("{}.{}", quote_name(&self.schema), quote_name(&self.name))
    }

    pub fn key(&self) -> String {
        dependency_key(self.kind, &self.schema, &self.name)
    }

    /// Case-folded key for map lookups; identifiers compare
    /// case-insensitively.
    pub fn lookup_key(&self) -> String {
        self.key().to_lowercase()
    }
}

/// Immutable projection of a database's user-defined schema objects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(rename = "DatabaseName")]
    pub database_name: String,
    #[serde(rename = "GeneratedAtUtc")]
    pub generated_at_utc: DateTime<Utc>,
    #[serde(rename = "Objects")]
    pub objects: Vec<SchemaObject>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unquote(quoted: &str) -> String {
        quoted
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .expect("bracketed")
            .replace("]]", "]")
    }

    #[test]
    fn quoting_round_trips_bracket_names() {
        for name in ["Orders", "we]ird", "]]", "a]b]c"] {
            assert_eq!(unquote(&quote_name(name)), name);
        }
    }

    #[test]
    fn maps_type_codes() {
        assert_eq!(ObjectKind::from_type_code("U").unwrap(), ObjectKind::Table);
        assert_eq!(ObjectKind::from_type_code("V").unwrap(), ObjectKind::View);
        assert_eq!(
            ObjectKind::from_type_code("P").unwrap(),
            ObjectKind::StoredProcedure
        );
        for code in ["FN", "IF", "TF", "FS", "FT"] {
            assert_eq!(
                ObjectKind::from_type_code(code).unwrap(),
                ObjectKind::Function
            );
        }
        assert!(ObjectKind::from_type_code("TR").is_err());
    }

    #[test]
    fn priorities_reverse_between_create_and_drop() {
        assert!(ObjectKind::Table.create_priority() < ObjectKind::Function.create_priority());
        assert!(ObjectKind::View.drop_priority() < ObjectKind::Table.drop_priority());
    }

    #[test]
    fn keys_and_identifiers_use_expected_shapes() {
        let object = SchemaObject {
            kind: ObjectKind::View,
            schema: "dbo".to_string(),
            name: "Orders".to_string(),
            definition: String::new(),
            dependencies: BTreeSet::new(),
        };
        assert_eq!(object.key(), "View:dbo.Orders");
        assert_eq!(object.lookup_key(), "view:dbo.orders");
        assert_eq!(object.identifier(), "[dbo].[Orders]");
    }
}
