use actix_web::error::ErrorBadRequest;
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;
use sqlx::MySqlPool;

/// SQL bindable value enum
#[derive(Debug, PartialEq)]
pub enum SqlValue {
    String(String),
    I64(i64),
    F64(f64),
    Bool(bool),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Null,
}

/// Dynamic UPDATE statement plus its bind values, in SET-clause order.
#[derive(Debug)]
pub struct SqlUpdate {
    pub sql: String,
    pub values: Vec<SqlValue>,
}

/// Builds a partial-merge UPDATE from a JSON object.
///
/// Only keys present in `allowed_columns` may appear in the payload; anything
/// else is a 400. Date-looking strings are bound as dates so MySQL DATE and
/// DATETIME columns accept them.
pub fn build_update_sql(
    table: &str,
    payload: &Value,
    allowed_columns: &[&str],
    id_column: &str,
    id_value: i64,
) -> Result<SqlUpdate, actix_web::Error> {
    let obj = payload
        .as_object()
        .ok_or_else(|| ErrorBadRequest("Payload must be a JSON object"))?;

    if obj.is_empty() {
        return Err(ErrorBadRequest("No fields provided for update"));
    }

    if let Some(unknown) = obj.keys().find(|k| !allowed_columns.contains(&k.as_str())) {
        return Err(ErrorBadRequest(format!("Unknown field: {}", unknown)));
    }

    let set_clause = obj
        .keys()
        .map(|k| format!("{} = ?", k))
        .collect::<Vec<_>>()
        .join(", ");

    let sql = format!("UPDATE {} SET {} WHERE {} = ?", table, set_clause, id_column);

    let mut values = Vec::with_capacity(obj.len() + 1);

    for value in obj.values() {
        match value {
            Value::String(s) => {
                if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                    values.push(SqlValue::Date(d));
                } else if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
                    values.push(SqlValue::DateTime(dt));
                } else {
                    values.push(SqlValue::String(s.clone()));
                }
            }
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    values.push(SqlValue::I64(i));
                } else if let Some(f) = n.as_f64() {
                    values.push(SqlValue::F64(f));
                }
            }
            Value::Bool(b) => values.push(SqlValue::Bool(*b)),
            Value::Null => values.push(SqlValue::Null),
            _ => return Err(ErrorBadRequest("Unsupported JSON value type")),
        }
    }

    // WHERE id = ?
    values.push(SqlValue::I64(id_value));

    Ok(SqlUpdate { sql, values })
}

/// Executes the update, returning the number of affected rows.
pub async fn execute_update(pool: &MySqlPool, update: SqlUpdate) -> Result<u64, sqlx::Error> {
    let mut query = sqlx::query(&update.sql);

    for value in update.values {
        query = match value {
            SqlValue::String(v) => query.bind(v),
            SqlValue::I64(v) => query.bind(v),
            SqlValue::F64(v) => query.bind(v),
            SqlValue::Bool(v) => query.bind(v),
            SqlValue::Date(v) => query.bind(v),
            SqlValue::DateTime(v) => query.bind(v),
            SqlValue::Null => query.bind(None::<String>),
        };
    }

    let result = query.execute(pool).await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const COLUMNS: &[&str] = &["first_name", "email", "hire_date", "status"];

    #[test]
    fn test_builds_set_clause_and_binds_in_order() {
        let payload = json!({"email": "a@b.com", "first_name": "Ana"});

        let update = build_update_sql("employees", &payload, COLUMNS, "id", 7).unwrap();

        // serde_json maps iterate in sorted key order
        assert_eq!(
            update.sql,
            "UPDATE employees SET email = ?, first_name = ? WHERE id = ?"
        );
        assert_eq!(update.values.len(), 3);
        assert_eq!(update.values[2], SqlValue::I64(7));
    }

    #[test]
    fn test_date_strings_bind_as_dates() {
        let payload = json!({"hire_date": "2024-01-15"});

        let update = build_update_sql("employees", &payload, COLUMNS, "id", 1).unwrap();

        assert_eq!(
            update.values[0],
            SqlValue::Date(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap())
        );
    }

    #[test]
    fn test_empty_payload_is_rejected() {
        let payload = json!({});

        assert!(build_update_sql("employees", &payload, COLUMNS, "id", 1).is_err());
    }

    #[test]
    fn test_non_object_payload_is_rejected() {
        let payload = json!(["status", "active"]);

        assert!(build_update_sql("employees", &payload, COLUMNS, "id", 1).is_err());
    }

    #[test]
    fn test_unknown_column_is_rejected() {
        let payload = json!({"role_id": 1});

        let err = build_update_sql("employees", &payload, COLUMNS, "id", 1).unwrap_err();
        assert!(err.to_string().contains("role_id"));
    }

    #[test]
    fn test_null_clears_a_column() {
        let payload = json!({"status": null});

        let update = build_update_sql("employees", &payload, COLUMNS, "id", 1).unwrap();
        assert_eq!(update.values[0], SqlValue::Null);
    }
}
