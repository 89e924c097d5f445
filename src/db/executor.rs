use anyhow::Result;

use crate::db::client::SqlClient;
use crate::db::types::{Column, ResultSet, Value};
use crate::error::{AppError, ErrorKind};

pub async fn run_query(query: tiberius::Query<'_>, client: &mut SqlClient) -> Result<Vec<ResultSet>> {
    let stream = query
        .query(client)
        .await
        .map_err(|err| AppError::new(ErrorKind::Query, err.to_string()))?;
    collect_result_sets(stream).await
}

/// Execute a statement that returns no rows (DDL, batch apply).
pub async fn run_execute(sql: &str, client: &mut SqlClient) -> Result<u64> {
    let result = client
        .execute(sql, &[])
        .await
        .map_err(|err| AppError::new(ErrorKind::Query, err.to_string()))?;
    Ok(result.rows_affected().iter().sum())
}

async fn collect_result_sets(stream: tiberius::QueryStream<'_>) -> Result<Vec<ResultSet>> {
    let result_sets = stream
        .into_results()
        .await
        .map_err(|err| AppError::new(ErrorKind::Query, err.to_string()))?;
    let mut output = Vec::new();

    for rows in result_sets {
        let columns = rows
            .first()
            .map(|row| {
                row.columns()
                    .iter()
                    .map(|col| Column {
                        name: col.name().to_string(),
                    })
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();

        let mut converted_rows = Vec::new();
        for row in rows {
            let values = row.cells().map(|(_, data)| map_column_data(data)).collect();
            converted_rows.push(values);
        }

        output.push(ResultSet {
            columns,
            rows: converted_rows,
        });
    }

    Ok(output)
}

// The catalog queries CONVERT temporal and variant columns to nvarchar
// server-side, so only the scalar arms below carry real traffic; the
// temporal arms exist to keep the match total.
fn map_column_data(data: &tiberius::ColumnData<'_>) -> Value {
    use tiberius::ColumnData::*;
    match data {
        U8(value) => value.map(|v| Value::Int(v as i64)).unwrap_or(Value::Null),
        I16(value) => value.map(|v| Value::Int(v as i64)).unwrap_or(Value::Null),
        I32(value) => value.map(|v| Value::Int(v as i64)).unwrap_or(Value::Null),
        I64(value) => value.map(Value::Int).unwrap_or(Value::Null),
        F32(value) => value.map(|v| Value::Float(v as f64)).unwrap_or(Value::Null),
        F64(value) => value.map(Value::Float).unwrap_or(Value::Null),
        Bit(value) => value.map(Value::Bool).unwrap_or(Value::Null),
        String(value) => value
            .as_ref()
            .map(|v| Value::Text(v.to_string()))
            .unwrap_or(Value::Null),
        Guid(value) => value
            .as_ref()
            .map(|v| Value::Text(v.to_string()))
            .unwrap_or(Value::Null),
        Binary(value) => value
            .as_ref()
            .map(|v| Value::Text(format!("{:?}", v)))
            .unwrap_or(Value::Null),
        Numeric(value) => value
            .as_ref()
            .map(|v| Value::Text(v.to_string()))
            .unwrap_or(Value::Null),
        Xml(value) => value
            .as_ref()
            .map(|v| Value::Text(v.to_string()))
            .unwrap_or(Value::Null),
        DateTime(value) => value
            .as_ref()
            .map(|v| Value::Text(format!("{:?}", v)))
            .unwrap_or(Value::Null),
        SmallDateTime(value) => value
            .as_ref()
            .map(|v| Value::Text(format!("{:?}", v)))
            .unwrap_or(Value::Null),
        Time(value) => value
            .as_ref()
            .map(|v| Value::Text(format!("{:?}", v)))
            .unwrap_or(Value::Null),
        Date(value) => value
            .as_ref()
            .map(|v| Value::Text(format!("{:?}", v)))
            .unwrap_or(Value::Null),
        DateTime2(value) => value
            .as_ref()
            .map(|v| Value::Text(format!("{:?}", v)))
            .unwrap_or(Value::Null),
        DateTimeOffset(value) => value
            .as_ref()
            .map(|v| Value::Text(format!("{:?}", v)))
            .unwrap_or(Value::Null),
    }
}
