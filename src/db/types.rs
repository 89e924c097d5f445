use anyhow::Result;

use crate::error::{AppError, ErrorKind};

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    pub fn as_display(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(value) => value.to_string(),
            Value::Int(value) => value.to_string(),
            Value::Float(value) => value.to_string(),
            Value::Text(value) => value.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultSet {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<Value>>,
}

impl ResultSet {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|column| column.name.eq_ignore_ascii_case(name))
    }
}

/// Read a required text cell; NULL or a missing column is a catalog error.
pub fn req_text(row: &[Value], index: Option<usize>, column: &str) -> Result<String> {
    match index.and_then(|i| row.get(i)) {
        Some(Value::Text(text)) => Ok(text.clone()),
        Some(Value::Null) | None => Err(null_column(column)),
        Some(other) => Ok(other.as_display()),
    }
}

/// Read an optional (LEFT JOIN) text cell; NULL maps to `None`, never to an
/// empty string.
pub fn opt_text(row: &[Value], index: Option<usize>) -> Option<String> {
    match index.and_then(|i| row.get(i)) {
        Some(Value::Text(text)) => Some(text.clone()),
        Some(Value::Null) | None => None,
        Some(other) => Some(other.as_display()),
    }
}

pub fn req_int(row: &[Value], index: Option<usize>, column: &str) -> Result<i64> {
    match index.and_then(|i| row.get(i)) {
        Some(Value::Int(value)) => Ok(*value),
        Some(Value::Bool(value)) => Ok(i64::from(*value)),
        Some(Value::Float(value)) => Ok(*value as i64),
        Some(Value::Text(text)) => text.parse::<i64>().map_err(|_| {
            AppError::new(
                ErrorKind::Catalog,
                format!("Non-numeric value in catalog column '{}'", column),
            )
            .into()
        }),
        Some(Value::Null) | None => Err(null_column(column)),
    }
}

pub fn get_bool(row: &[Value], index: Option<usize>) -> bool {
    match index.and_then(|i| row.get(i)) {
        Some(Value::Bool(value)) => *value,
        Some(Value::Int(value)) => *value != 0,
        Some(Value::Text(text)) => matches!(text.as_str(), "1" | "true" | "True" | "TRUE"),
        _ => false,
    }
}

fn null_column(column: &str) -> anyhow::Error {
    AppError::new(
        ErrorKind::Catalog,
        format!("Unexpected NULL in required catalog column '{}'", column),
    )
    .into()
}
