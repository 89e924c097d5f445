//! Typed views over the `sys.*` catalog for everything the scripter needs.
//!
//! Queries run serially on one connection; required columns that come back
//! NULL fail the whole extraction.

use std::collections::{BTreeSet, HashMap};

use anyhow::Result;
use tiberius::Query;

use crate::db::client::SqlClient;
use crate::db::executor;
use crate::db::types::{self, ResultSet};
use crate::engine::model::{dependency_key, ObjectKind};

const TABLES: &str = r#"
SELECT t.object_id, s.name AS schema_name, t.name
FROM sys.tables t
JOIN sys.schemas s ON s.schema_id = t.schema_id
WHERE t.is_ms_shipped = 0
ORDER BY s.name, t.name
"#;

const COLUMNS: &str = r#"
SELECT c.column_id,
       c.name,
       ts.name AS type_schema,
       ty.name AS type_name,
       ty.is_user_defined,
       c.max_length,
       c.precision,
       c.scale,
       c.is_nullable,
       c.is_identity,
       c.is_computed,
       c.collation_name,
       c.is_rowguidcol,
       cc.definition AS computed_definition,
       cc.is_persisted,
       df.name AS default_name,
       df.definition AS default_definition,
       CONVERT(nvarchar(40), ic.seed_value) AS seed_value,
       CONVERT(nvarchar(40), ic.increment_value) AS increment_value
FROM sys.columns c
JOIN sys.types ty ON ty.user_type_id = c.user_type_id
JOIN sys.schemas ts ON ts.schema_id = ty.schema_id
LEFT JOIN sys.computed_columns cc
       ON cc.object_id = c.object_id AND cc.column_id = c.column_id
LEFT JOIN sys.default_constraints df ON df.object_id = c.default_object_id
LEFT JOIN sys.identity_columns ic
       ON ic.object_id = c.object_id AND ic.column_id = c.column_id
WHERE c.object_id = @P1
ORDER BY c.column_id
"#;

const KEY_CONSTRAINTS: &str = r#"
SELECT kc.name, kc.type AS kind_code, kc.unique_index_id, i.type_desc
FROM sys.key_constraints kc
JOIN sys.indexes i
  ON i.object_id = kc.parent_object_id AND i.index_id = kc.unique_index_id
WHERE kc.parent_object_id = @P1
ORDER BY kc.name
"#;

const INDEX_COLUMNS: &str = r#"
SELECT c.name, ic.key_ordinal, ic.is_descending_key, ic.is_included_column,
       ic.index_column_id
FROM sys.index_columns ic
JOIN sys.columns c
  ON c.object_id = ic.object_id AND c.column_id = ic.column_id
WHERE ic.object_id = @P1 AND ic.index_id = @P2
ORDER BY ic.key_ordinal, ic.index_column_id
"#;

const FOREIGN_KEYS: &str = r#"
SELECT fk.object_id, fk.name,
       rs.name AS referenced_schema, rt.name AS referenced_table,
       fk.delete_referential_action_desc, fk.update_referential_action_desc,
       fk.is_not_for_replication, fk.is_not_trusted, fk.is_disabled
FROM sys.foreign_keys fk
JOIN sys.tables rt ON rt.object_id = fk.referenced_object_id
JOIN sys.schemas rs ON rs.schema_id = rt.schema_id
WHERE fk.parent_object_id = @P1
ORDER BY fk.name
"#;

const FOREIGN_KEY_COLUMNS: &str = r#"
SELECT pc.name AS parent_column, rc.name AS referenced_column,
       fkc.constraint_column_id
FROM sys.foreign_key_columns fkc
JOIN sys.columns pc
  ON pc.object_id = fkc.parent_object_id AND pc.column_id = fkc.parent_column_id
JOIN sys.columns rc
  ON rc.object_id = fkc.referenced_object_id AND rc.column_id = fkc.referenced_column_id
WHERE fkc.constraint_object_id = @P1
ORDER BY fkc.constraint_column_id
"#;

const CHECK_CONSTRAINTS: &str = r#"
SELECT cc.name, cc.definition, cc.is_not_trusted, cc.is_disabled
FROM sys.check_constraints cc
WHERE cc.parent_object_id = @P1
ORDER BY cc.name
"#;

const INDEXES: &str = r#"
SELECT i.index_id, i.name, i.is_unique, i.type_desc, i.filter_definition,
       i.is_disabled
FROM sys.indexes i
WHERE i.object_id = @P1
  AND i.is_primary_key = 0
  AND i.is_unique_constraint = 0
  AND i.is_hypothetical = 0
  AND i.name IS NOT NULL
  AND i.type_desc IN
      ('CLUSTERED', 'NONCLUSTERED', 'CLUSTERED_COLUMNSTORE', 'NONCLUSTERED_COLUMNSTORE')
ORDER BY i.name
"#;

const MODULES: &str = r#"
SELECT o.object_id, o.type AS kind_code, s.name AS schema_name, o.name,
       sm.definition
FROM sys.objects o
JOIN sys.schemas s ON s.schema_id = o.schema_id
JOIN sys.sql_modules sm ON sm.object_id = o.object_id
WHERE o.type IN ('V', 'P', 'FN', 'IF', 'TF', 'FS', 'FT')
  AND o.is_ms_shipped = 0
ORDER BY s.name, o.name
"#;

const DEPENDENCIES: &str = r#"
SELECT d.referencing_id, ro.type AS kind_code,
       rs.name AS referenced_schema, ro.name AS referenced_name
FROM sys.sql_expression_dependencies d
JOIN sys.objects ro ON ro.object_id = d.referenced_id
JOIN sys.schemas rs ON rs.schema_id = ro.schema_id
WHERE d.referenced_id IS NOT NULL
  AND ro.type IN ('U', 'V', 'P', 'FN', 'IF', 'TF', 'FS', 'FT')
"#;

#[derive(Debug, Clone)]
pub struct TableRow {
    pub object_id: i64,
    pub schema: String,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct ColumnRow {
    pub ordinal: i64,
    pub name: String,
    pub type_schema: String,
    pub type_name: String,
    pub user_defined: bool,
    pub max_length: i64,
    pub precision: i64,
    pub scale: i64,
    pub nullable: bool,
    pub identity: bool,
    pub computed: bool,
    pub collation: Option<String>,
    pub rowguid: bool,
    pub computed_expression: Option<String>,
    pub persisted: bool,
    pub default_name: Option<String>,
    pub default_expression: Option<String>,
    pub identity_seed: Option<String>,
    pub identity_increment: Option<String>,
}

#[derive(Debug, Clone)]
pub struct KeyConstraintRow {
    pub name: String,
    pub kind_code: String,
    pub index_id: i64,
    pub index_type_desc: String,
    pub key_columns: Vec<IndexColumnRow>,
}

#[derive(Debug, Clone)]
pub struct ForeignKeyRow {
    pub object_id: i64,
    pub name: String,
    pub referenced_schema: String,
    pub referenced_table: String,
    pub delete_action: String,
    pub update_action: String,
    pub not_for_replication: bool,
    pub not_trusted: bool,
    pub disabled: bool,
    pub columns: Vec<ForeignKeyColumnRow>,
}

#[derive(Debug, Clone)]
pub struct ForeignKeyColumnRow {
    pub parent_column: String,
    pub referenced_column: String,
    pub ordinal: i64,
}

#[derive(Debug, Clone)]
pub struct CheckRow {
    pub name: String,
    pub expression: String,
    pub not_trusted: bool,
    pub disabled: bool,
}

#[derive(Debug, Clone)]
pub struct IndexRow {
    pub index_id: i64,
    pub name: String,
    pub unique: bool,
    pub type_desc: String,
    pub filter: Option<String>,
    pub disabled: bool,
    pub columns: Vec<IndexColumnRow>,
}

#[derive(Debug, Clone)]
pub struct IndexColumnRow {
    pub name: String,
    pub key_ordinal: i64,
    pub descending: bool,
    pub included: bool,
    pub ordinal: i64,
}

#[derive(Debug, Clone)]
pub struct ModuleRow {
    pub object_id: i64,
    pub kind: ObjectKind,
    pub schema: String,
    pub name: String,
    pub definition: String,
}

/// Everything the scripter needs to rebuild one table's DDL.
#[derive(Debug, Clone)]
pub struct TableDetails {
    pub table: TableRow,
    pub columns: Vec<ColumnRow>,
    pub key_constraints: Vec<KeyConstraintRow>,
    pub foreign_keys: Vec<ForeignKeyRow>,
    pub checks: Vec<CheckRow>,
    pub indexes: Vec<IndexRow>,
}

pub async fn read_tables(client: &mut SqlClient) -> Result<Vec<TableRow>> {
    let sets = executor::run_query(Query::new(TABLES), client).await?;
    map_tables(sets.first())
}

pub async fn read_table_details(
    client: &mut SqlClient,
    table: &TableRow,
) -> Result<TableDetails> {
    let columns = read_columns(client, table.object_id).await?;
    let mut key_constraints = read_key_constraints(client, table.object_id).await?;
    for key in &mut key_constraints {
        key.key_columns = read_index_columns(client, table.object_id, key.index_id).await?;
    }
    let mut foreign_keys = read_foreign_keys(client, table.object_id).await?;
    for fk in &mut foreign_keys {
        fk.columns = read_foreign_key_columns(client, fk.object_id).await?;
    }
    let checks = read_check_constraints(client, table.object_id).await?;
    let mut indexes = read_indexes(client, table.object_id).await?;
    for index in &mut indexes {
        index.columns = read_index_columns(client, table.object_id, index.index_id).await?;
    }
    Ok(TableDetails {
        table: table.clone(),
        columns,
        key_constraints,
        foreign_keys,
        checks,
        indexes,
    })
}

pub async fn read_modules(client: &mut SqlClient) -> Result<Vec<ModuleRow>> {
    let sets = executor::run_query(Query::new(MODULES), client).await?;
    map_modules(sets.first())
}

/// Dependency edges aggregated into `referencing object id -> set of
/// dependency keys`. Edges pointing at unsupported kinds are filtered out
/// by the query itself.
pub async fn read_dependencies(
    client: &mut SqlClient,
) -> Result<HashMap<i64, BTreeSet<String>>> {
    let sets = executor::run_query(Query::new(DEPENDENCIES), client).await?;
    let Some(rs) = sets.first() else {
        return Ok(HashMap::new());
    };
    let referencing_id = rs.column_index("referencing_id");
    let kind_code = rs.column_index("kind_code");
    let referenced_schema = rs.column_index("referenced_schema");
    let referenced_name = rs.column_index("referenced_name");

    let mut edges: HashMap<i64, BTreeSet<String>> = HashMap::new();
    for row in &rs.rows {
        let id = types::req_int(row, referencing_id, "referencing_id")?;
        let kind = ObjectKind::from_type_code(&types::req_text(row, kind_code, "kind_code")?)?;
        let schema = types::req_text(row, referenced_schema, "referenced_schema")?;
        let name = types::req_text(row, referenced_name, "referenced_name")?;
        edges
            .entry(id)
            .or_default()
            .insert(dependency_key(kind, &schema, &name));
    }
    Ok(edges)
}

async fn read_columns(client: &mut SqlClient, object_id: i64) -> Result<Vec<ColumnRow>> {
    let mut query = Query::new(COLUMNS);
    query.bind(object_id as i32);
    let sets = executor::run_query(query, client).await?;
    map_columns(sets.first())
}

async fn read_key_constraints(
    client: &mut SqlClient,
    object_id: i64,
) -> Result<Vec<KeyConstraintRow>> {
    let mut query = Query::new(KEY_CONSTRAINTS);
    query.bind(object_id as i32);
    let sets = executor::run_query(query, client).await?;
    map_key_constraints(sets.first())
}

async fn read_index_columns(
    client: &mut SqlClient,
    object_id: i64,
    index_id: i64,
) -> Result<Vec<IndexColumnRow>> {
    let mut query = Query::new(INDEX_COLUMNS);
    query.bind(object_id as i32);
    query.bind(index_id as i32);
    let sets = executor::run_query(query, client).await?;
    map_index_columns(sets.first())
}

async fn read_foreign_keys(
    client: &mut SqlClient,
    object_id: i64,
) -> Result<Vec<ForeignKeyRow>> {
    let mut query = Query::new(FOREIGN_KEYS);
    query.bind(object_id as i32);
    let sets = executor::run_query(query, client).await?;
    map_foreign_keys(sets.first())
}

async fn read_foreign_key_columns(
    client: &mut SqlClient,
    constraint_id: i64,
) -> Result<Vec<ForeignKeyColumnRow>> {
    let mut query = Query::new(FOREIGN_KEY_COLUMNS);
    query.bind(constraint_id as i32);
    let sets = executor::run_query(query, client).await?;
    map_foreign_key_columns(sets.first())
}

async fn read_check_constraints(
    client: &mut SqlClient,
    object_id: i64,
) -> Result<Vec<CheckRow>> {
    let mut query = Query::new(CHECK_CONSTRAINTS);
    query.bind(object_id as i32);
    let sets = executor::run_query(query, client).await?;
    map_check_constraints(sets.first())
}

async fn read_indexes(client: &mut SqlClient, object_id: i64) -> Result<Vec<IndexRow>> {
    let mut query = Query::new(INDEXES);
    query.bind(object_id as i32);
    let sets = executor::run_query(query, client).await?;
    map_indexes(sets.first())
}

fn map_tables(rs: Option<&ResultSet>) -> Result<Vec<TableRow>> {
    let Some(rs) = rs else {
        return Ok(Vec::new());
    };
    let object_id = rs.column_index("object_id");
    let schema = rs.column_index("schema_name");
    let name = rs.column_index("name");

    let mut rows = Vec::with_capacity(rs.rows.len());
    for row in &rs.rows {
        rows.push(TableRow {
            object_id: types::req_int(row, object_id, "object_id")?,
            schema: types::req_text(row, schema, "schema_name")?,
            name: types::req_text(row, name, "name")?,
        });
    }
    Ok(rows)
}

fn map_columns(rs: Option<&ResultSet>) -> Result<Vec<ColumnRow>> {
    let Some(rs) = rs else {
        return Ok(Vec::new());
    };
    let ordinal = rs.column_index("column_id");
    let name = rs.column_index("name");
    let type_schema = rs.column_index("type_schema");
    let type_name = rs.column_index("type_name");
    let user_defined = rs.column_index("is_user_defined");
    let max_length = rs.column_index("max_length");
    let precision = rs.column_index("precision");
    let scale = rs.column_index("scale");
    let nullable = rs.column_index("is_nullable");
    let identity = rs.column_index("is_identity");
    let computed = rs.column_index("is_computed");
    let collation = rs.column_index("collation_name");
    let rowguid = rs.column_index("is_rowguidcol");
    let computed_expression = rs.column_index("computed_definition");
    let persisted = rs.column_index("is_persisted");
    let default_name = rs.column_index("default_name");
    let default_expression = rs.column_index("default_definition");
    let seed = rs.column_index("seed_value");
    let increment = rs.column_index("increment_value");

    let mut rows = Vec::with_capacity(rs.rows.len());
    for row in &rs.rows {
        rows.push(ColumnRow {
            ordinal: types::req_int(row, ordinal, "column_id")?,
            name: types::req_text(row, name, "name")?,
            type_schema: types::req_text(row, type_schema, "type_schema")?,
            type_name: types::req_text(row, type_name, "type_name")?,
            user_defined: types::get_bool(row, user_defined),
            max_length: types::req_int(row, max_length, "max_length")?,
            precision: types::req_int(row, precision, "precision")?,
            scale: types::req_int(row, scale, "scale")?,
            nullable: types::get_bool(row, nullable),
            identity: types::get_bool(row, identity),
            computed: types::get_bool(row, computed),
            collation: types::opt_text(row, collation),
            rowguid: types::get_bool(row, rowguid),
            computed_expression: types::opt_text(row, computed_expression),
            persisted: types::get_bool(row, persisted),
            default_name: types::opt_text(row, default_name),
            default_expression: types::opt_text(row, default_expression),
            identity_seed: types::opt_text(row, seed),
            identity_increment: types::opt_text(row, increment),
        });
    }
    Ok(rows)
}

fn map_key_constraints(rs: Option<&ResultSet>) -> Result<Vec<KeyConstraintRow>> {
    let Some(rs) = rs else {
        return Ok(Vec::new());
    };
    let name = rs.column_index("name");
    let kind_code = rs.column_index("kind_code");
    let index_id = rs.column_index("unique_index_id");
    let type_desc = rs.column_index("type_desc");

    let mut rows = Vec::with_capacity(rs.rows.len());
    for row in &rs.rows {
        rows.push(KeyConstraintRow {
            name: types::req_text(row, name, "name")?,
            kind_code: types::req_text(row, kind_code, "kind_code")?,
            index_id: types::req_int(row, index_id, "unique_index_id")?,
            index_type_desc: types::req_text(row, type_desc, "type_desc")?,
            key_columns: Vec::new(),
        });
    }
    Ok(rows)
}

fn map_index_columns(rs: Option<&ResultSet>) -> Result<Vec<IndexColumnRow>> {
    let Some(rs) = rs else {
        return Ok(Vec::new());
    };
    let name = rs.column_index("name");
    let key_ordinal = rs.column_index("key_ordinal");
    let descending = rs.column_index("is_descending_key");
    let included = rs.column_index("is_included_column");
    let ordinal = rs.column_index("index_column_id");

    let mut rows = Vec::with_capacity(rs.rows.len());
    for row in &rs.rows {
        rows.push(IndexColumnRow {
            name: types::req_text(row, name, "name")?,
            key_ordinal: types::req_int(row, key_ordinal, "key_ordinal")?,
            descending: types::get_bool(row, descending),
            included: types::get_bool(row, included),
            ordinal: types::req_int(row, ordinal, "index_column_id")?,
        });
    }
    Ok(rows)
}

fn map_foreign_keys(rs: Option<&ResultSet>) -> Result<Vec<ForeignKeyRow>> {
    let Some(rs) = rs else {
        return Ok(Vec::new());
    };
    let object_id = rs.column_index("object_id");
    let name = rs.column_index("name");
    let referenced_schema = rs.column_index("referenced_schema");
    let referenced_table = rs.column_index("referenced_table");
    let delete_action = rs.column_index("delete_referential_action_desc");
    let update_action = rs.column_index("update_referential_action_desc");
    let not_for_replication = rs.column_index("is_not_for_replication");
    let not_trusted = rs.column_index("is_not_trusted");
    let disabled = rs.column_index("is_disabled");

    let mut rows = Vec::with_capacity(rs.rows.len());
    for row in &rs.rows {
        rows.push(ForeignKeyRow {
            object_id: types::req_int(row, object_id, "object_id")?,
            name: types::req_text(row, name, "name")?,
            referenced_schema: types::req_text(row, referenced_schema, "referenced_schema")?,
            referenced_table: types::req_text(row, referenced_table, "referenced_table")?,
            delete_action: types::req_text(row, delete_action, "delete_referential_action_desc")?,
            update_action: types::req_text(row, update_action, "update_referential_action_desc")?,
            not_for_replication: types::get_bool(row, not_for_replication),
            not_trusted: types::get_bool(row, not_trusted),
            disabled: types::get_bool(row, disabled),
            columns: Vec::new(),
        });
    }
    Ok(rows)
}

fn map_foreign_key_columns(rs: Option<&ResultSet>) -> Result<Vec<ForeignKeyColumnRow>> {
    let Some(rs) = rs else {
        return Ok(Vec::new());
    };
    let parent_column = rs.column_index("parent_column");
    let referenced_column = rs.column_index("referenced_column");
    let ordinal = rs.column_index("constraint_column_id");

    let mut rows = Vec::with_capacity(rs.rows.len());
    for row in &rs.rows {
        rows.push(ForeignKeyColumnRow {
            parent_column: types::req_text(row, parent_column, "parent_column")?,
            referenced_column: types::req_text(row, referenced_column, "referenced_column")?,
            ordinal: types::req_int(row, ordinal, "constraint_column_id")?,
        });
    }
    Ok(rows)
}

fn map_check_constraints(rs: Option<&ResultSet>) -> Result<Vec<CheckRow>> {
    let Some(rs) = rs else {
        return Ok(Vec::new());
    };
    let name = rs.column_index("name");
    let expression = rs.column_index("definition");
    let not_trusted = rs.column_index("is_not_trusted");
    let disabled = rs.column_index("is_disabled");

    let mut rows = Vec::with_capacity(rs.rows.len());
    for row in &rs.rows {
        rows.push(CheckRow {
            name: types::req_text(row, name, "name")?,
            expression: types::req_text(row, expression, "definition")?,
            not_trusted: types::get_bool(row, not_trusted),
            disabled: types::get_bool(row, disabled),
        });
    }
    Ok(rows)
}

fn map_indexes(rs: Option<&ResultSet>) -> Result<Vec<IndexRow>> {
    let Some(rs) = rs else {
        return Ok(Vec::new());
    };
    let index_id = rs.column_index("index_id");
    let name = rs.column_index("name");
    let unique = rs.column_index("is_unique");
    let type_desc = rs.column_index("type_desc");
    let filter = rs.column_index("filter_definition");
    let disabled = rs.column_index("is_disabled");

    let mut rows = Vec::with_capacity(rs.rows.len());
    for row in &rs.rows {
        rows.push(IndexRow {
            index_id: types::req_int(row, index_id, "index_id")?,
            name: types::req_text(row, name, "name")?,
            unique: types::get_bool(row, unique),
            type_desc: types::req_text(row, type_desc, "type_desc")?,
            filter: types::opt_text(row, filter),
            disabled: types::get_bool(row, disabled),
            columns: Vec::new(),
        });
    }
    Ok(rows)
}

fn map_modules(rs: Option<&ResultSet>) -> Result<Vec<ModuleRow>> {
    let Some(rs) = rs else {
        return Ok(Vec::new());
    };
    let object_id = rs.column_index("object_id");
    let kind_code = rs.column_index("kind_code");
    let schema = rs.column_index("schema_name");
    let name = rs.column_index("name");
    let definition = rs.column_index("definition");

    let mut rows = Vec::with_capacity(rs.rows.len());
    for row in &rs.rows {
        rows.push(ModuleRow {
            object_id: types::req_int(row, object_id, "object_id")?,
            kind: ObjectKind::from_type_code(&types::req_text(row, kind_code, "kind_code")?)?,
            schema: types::req_text(row, schema, "schema_name")?,
            name: types::req_text(row, name, "name")?,
            definition: types::req_text(row, definition, "definition")?.trim().to_string(),
        });
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::types::{Column, Value};

    fn rs(columns: &[&str], rows: Vec<Vec<Value>>) -> ResultSet {
        ResultSet {
            columns: columns
                .iter()
                .map(|name| Column {
                    name: name.to_string(),
                })
                .collect(),
            rows,
        }
    }

    #[test]
    fn maps_tables_by_column_name() {
        let set = rs(
            &["object_id", "schema_name", "name"],
            vec![vec![
                Value::Int(101),
                Value::Text("dbo".to_string()),
                Value::Text("Orders".to_string()),
            ]],
        );
        let tables = map_tables(Some(&set)).unwrap();
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].object_id, 101);
        assert_eq!(tables[0].schema, "dbo");
        assert_eq!(tables[0].name, "Orders");
    }

    #[test]
    fn missing_result_set_maps_to_empty() {
        assert!(map_tables(None).unwrap().is_empty());
        assert!(map_modules(None).unwrap().is_empty());
    }

    #[test]
    fn module_definitions_are_trimmed_and_kinds_mapped() {
        let set = rs(
            &["object_id", "kind_code", "schema_name", "name", "definition"],
            vec![vec![
                Value::Int(7),
                Value::Text("IF".to_string()),
                Value::Text("dbo".to_string()),
                Value::Text("fn_totals".to_string()),
                Value::Text("\n  CREATE FUNCTION dbo.fn_totals() ...  \n".to_string()),
            ]],
        );
        let modules = map_modules(Some(&set)).unwrap();
        assert_eq!(modules[0].kind, ObjectKind::Function);
        assert!(modules[0].definition.starts_with("CREATE FUNCTION"));
        assert!(!modules[0].definition.ends_with(char::is_whitespace));
    }

    #[test]
    fn unknown_module_kind_fails_fast() {
        let set = rs(
            &["object_id", "kind_code", "schema_name", "name", "definition"],
            vec![vec![
                Value::Int(7),
                Value::Text("TR".to_string()),
                Value::Text("dbo".to_string()),
                Value::Text("trg".to_string()),
                Value::Text("CREATE TRIGGER ...".to_string()),
            ]],
        );
        assert!(map_modules(Some(&set)).is_err());
    }

    #[test]
    fn null_left_join_columns_stay_absent() {
        let set = rs(
            &[
                "column_id",
                "name",
                "type_schema",
                "type_name",
                "is_user_defined",
                "max_length",
                "precision",
                "scale",
                "is_nullable",
                "is_identity",
                "is_computed",
                "collation_name",
                "is_rowguidcol",
                "computed_definition",
                "is_persisted",
                "default_name",
                "default_definition",
                "seed_value",
                "increment_value",
            ],
            vec![vec![
                Value::Int(1),
                Value::Text("Id".to_string()),
                Value::Text("sys".to_string()),
                Value::Text("int".to_string()),
                Value::Bool(false),
                Value::Int(4),
                Value::Int(10),
                Value::Int(0),
                Value::Bool(false),
                Value::Bool(false),
                Value::Bool(false),
                Value::Null,
                Value::Bool(false),
                Value::Null,
                Value::Null,
                Value::Null,
                Value::Null,
                Value::Null,
                Value::Null,
            ]],
        );
        let columns = map_columns(Some(&set)).unwrap();
        let column = &columns[0];
        assert_eq!(column.collation, None);
        assert_eq!(column.computed_expression, None);
        assert_eq!(column.default_name, None);
        assert_eq!(column.identity_seed, None);
        assert!(!column.persisted);
    }
}
