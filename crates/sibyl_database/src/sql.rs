//! SQL rendering for resolved structured calls.
//!
//! Statements are rendered as text and executed through `diesel::sql_query`
//! with results pulled back as JSON rows, so no compile-time table schema is
//! required. Every identifier is checked against the entity's column set and
//! sanitized, and every value is rendered as an escaped literal; nothing
//! from the model reaches the statement as executable syntax.

use crate::{EntityHandle, QueryArguments, QueryResult};
use serde_json::{Map, Value as JsonValue};
use sibyl_error::{QueryError, QueryErrorKind};

/// Renders the inner SELECT for `findMany`/`findUnique`/`findFirst`.
///
/// Single-row methods get `LIMIT 1` regardless of `take`.
pub fn select_statement(
    handle: &EntityHandle,
    args: &QueryArguments,
    single_row: bool,
) -> QueryResult<String> {
    let mut sql = format!(
        "SELECT {} FROM {}",
        projection(handle, args)?,
        handle.table()
    );

    if let Some(where_clause) = &args.where_clause {
        sql.push_str(&format!(" WHERE {}", render_where(handle, where_clause)?));
    }
    if let Some(order_by) = &args.order_by {
        sql.push_str(&format!(" ORDER BY {}", render_order_by(handle, order_by)?));
    }

    if single_row {
        sql.push_str(" LIMIT 1");
    } else if let Some(take) = args.take {
        sql.push_str(&format!(" LIMIT {}", take));
    }
    if let Some(skip) = args.skip {
        sql.push_str(&format!(" OFFSET {}", skip));
    }

    Ok(sql)
}

/// Renders a COUNT statement.
pub fn count_statement(handle: &EntityHandle, args: &QueryArguments) -> QueryResult<String> {
    let mut sql = format!("SELECT COUNT(*) AS count FROM {}", handle.table());
    if let Some(where_clause) = &args.where_clause {
        sql.push_str(&format!(" WHERE {}", render_where(handle, where_clause)?));
    }
    Ok(sql)
}

/// Renders an INSERT wrapped so the created row comes back as JSON.
pub fn insert_statement(handle: &EntityHandle, args: &QueryArguments) -> QueryResult<String> {
    let data = args.data.as_ref().ok_or_else(|| {
        QueryError::new(QueryErrorKind::ArgumentParse(
            "create requires a data object".to_string(),
        ))
    })?;
    if data.is_empty() {
        return Err(QueryError::new(QueryErrorKind::ArgumentParse(
            "create data object is empty".to_string(),
        )));
    }

    let mut columns = Vec::with_capacity(data.len());
    let mut values = Vec::with_capacity(data.len());
    for (column, value) in data {
        columns.push(quoted_column(handle, column)?);
        values.push(render_literal(value)?);
    }

    Ok(format!(
        "WITH affected AS (INSERT INTO {} ({}) VALUES ({}) RETURNING *) \
         SELECT row_to_json(affected) AS json FROM affected",
        handle.table(),
        columns.join(", "),
        values.join(", ")
    ))
}

/// Renders an UPDATE wrapped so affected rows come back as JSON.
///
/// A WHERE clause is mandatory; whole-table updates are never generated.
pub fn update_statement(handle: &EntityHandle, args: &QueryArguments) -> QueryResult<String> {
    let data = args.data.as_ref().ok_or_else(|| {
        QueryError::new(QueryErrorKind::ArgumentParse(
            "update requires a data object".to_string(),
        ))
    })?;
    let where_clause = require_where(args, "update")?;

    let mut assignments = Vec::with_capacity(data.len());
    for (column, value) in data {
        assignments.push(format!(
            "{} = {}",
            quoted_column(handle, column)?,
            render_literal(value)?
        ));
    }
    if assignments.is_empty() {
        return Err(QueryError::new(QueryErrorKind::ArgumentParse(
            "update data object is empty".to_string(),
        )));
    }

    Ok(format!(
        "WITH affected AS (UPDATE {} SET {} WHERE {} RETURNING *) \
         SELECT row_to_json(affected) AS json FROM affected",
        handle.table(),
        assignments.join(", "),
        render_where(handle, where_clause)?
    ))
}

/// Renders a DELETE wrapped so deleted rows come back as JSON.
///
/// A WHERE clause is mandatory; whole-table deletes are never generated.
pub fn delete_statement(handle: &EntityHandle, args: &QueryArguments) -> QueryResult<String> {
    let where_clause = require_where(args, "delete")?;

    Ok(format!(
        "WITH affected AS (DELETE FROM {} WHERE {} RETURNING *) \
         SELECT row_to_json(affected) AS json FROM affected",
        handle.table(),
        render_where(handle, where_clause)?
    ))
}

fn require_where<'a>(
    args: &'a QueryArguments,
    method: &str,
) -> QueryResult<&'a Map<String, JsonValue>> {
    match &args.where_clause {
        Some(where_clause) if !where_clause.is_empty() => Ok(where_clause),
        _ => Err(QueryError::new(QueryErrorKind::UnsafeStatement(format!(
            "{} without a WHERE clause",
            method
        )))),
    }
}

fn projection(handle: &EntityHandle, args: &QueryArguments) -> QueryResult<String> {
    let Some(select) = &args.select else {
        return Ok("*".to_string());
    };

    let mut columns = Vec::new();
    for (column, flag) in select {
        if flag == &JsonValue::Bool(true) {
            columns.push(quoted_column(handle, column)?);
        }
    }
    if columns.is_empty() {
        return Ok("*".to_string());
    }
    Ok(columns.join(", "))
}

fn render_where(
    handle: &EntityHandle,
    where_clause: &Map<String, JsonValue>,
) -> QueryResult<String> {
    if where_clause.is_empty() {
        return Err(QueryError::new(QueryErrorKind::ArgumentParse(
            "empty where object".to_string(),
        )));
    }

    let mut predicates = Vec::with_capacity(where_clause.len());
    for (column, criteria) in where_clause {
        let column = quoted_column(handle, column)?;
        match criteria {
            JsonValue::Object(operators) => {
                for (operator, operand) in operators {
                    predicates.push(render_operator(&column, operator, operand)?);
                }
            }
            JsonValue::Null => predicates.push(format!("{} IS NULL", column)),
            scalar => predicates.push(format!("{} = {}", column, render_literal(scalar)?)),
        }
    }

    Ok(predicates.join(" AND "))
}

fn render_operator(column: &str, operator: &str, operand: &JsonValue) -> QueryResult<String> {
    let rendered = match operator {
        "equals" => match operand {
            JsonValue::Null => format!("{} IS NULL", column),
            value => format!("{} = {}", column, render_literal(value)?),
        },
        "not" => match operand {
            JsonValue::Null => format!("{} IS NOT NULL", column),
            value => format!("{} <> {}", column, render_literal(value)?),
        },
        "gt" => format!("{} > {}", column, render_literal(operand)?),
        "gte" => format!("{} >= {}", column, render_literal(operand)?),
        "lt" => format!("{} < {}", column, render_literal(operand)?),
        "lte" => format!("{} <= {}", column, render_literal(operand)?),
        "contains" => format!("{} ILIKE {}", column, render_pattern(operand, true, true)?),
        "startsWith" => format!("{} ILIKE {}", column, render_pattern(operand, false, true)?),
        "endsWith" => format!("{} ILIKE {}", column, render_pattern(operand, true, false)?),
        "in" => {
            let JsonValue::Array(items) = operand else {
                return Err(QueryError::new(QueryErrorKind::ArgumentParse(
                    "'in' operand must be an array".to_string(),
                )));
            };
            if items.is_empty() {
                return Err(QueryError::new(QueryErrorKind::ArgumentParse(
                    "'in' operand is empty".to_string(),
                )));
            }
            let rendered: QueryResult<Vec<String>> = items.iter().map(render_literal).collect();
            format!("{} IN ({})", column, rendered?.join(", "))
        }
        other => {
            return Err(QueryError::new(QueryErrorKind::ArgumentParse(format!(
                "unsupported filter operator '{}'",
                other
            ))));
        }
    };
    Ok(rendered)
}

fn render_pattern(operand: &JsonValue, leading: bool, trailing: bool) -> QueryResult<String> {
    let JsonValue::String(text) = operand else {
        return Err(QueryError::new(QueryErrorKind::ArgumentParse(
            "pattern operand must be a string".to_string(),
        )));
    };
    let escaped = text.replace('%', "\\%").replace('_', "\\_");
    let pattern = format!(
        "{}{}{}",
        if leading { "%" } else { "" },
        escaped,
        if trailing { "%" } else { "" }
    );
    render_literal(&JsonValue::String(pattern))
}

fn render_order_by(handle: &EntityHandle, order_by: &JsonValue) -> QueryResult<String> {
    match order_by {
        JsonValue::Object(pairs) => {
            let mut terms = Vec::with_capacity(pairs.len());
            for (column, direction) in pairs {
                let direction = match direction.as_str() {
                    Some(d) if d.eq_ignore_ascii_case("asc") => "ASC",
                    Some(d) if d.eq_ignore_ascii_case("desc") => "DESC",
                    _ => {
                        return Err(QueryError::new(QueryErrorKind::ArgumentParse(
                            "orderBy direction must be 'asc' or 'desc'".to_string(),
                        )));
                    }
                };
                terms.push(format!("{} {}", quoted_column(handle, column)?, direction));
            }
            Ok(terms.join(", "))
        }
        JsonValue::Array(items) => {
            let rendered: QueryResult<Vec<String>> = items
                .iter()
                .map(|item| render_order_by(handle, item))
                .collect();
            Ok(rendered?.join(", "))
        }
        _ => Err(QueryError::new(QueryErrorKind::ArgumentParse(
            "orderBy must be an object or array of objects".to_string(),
        ))),
    }
}

/// Validates a column against the entity and returns it double-quoted.
fn quoted_column(handle: &EntityHandle, column: &str) -> QueryResult<String> {
    if !column.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return Err(QueryError::new(QueryErrorKind::ArgumentParse(format!(
            "column name '{}' contains invalid characters",
            column
        ))));
    }
    if !handle.has_column(column) {
        return Err(QueryError::new(QueryErrorKind::ArgumentParse(format!(
            "column '{}' is not declared on {}",
            column,
            handle.model_name()
        ))));
    }
    Ok(format!("\"{}\"", column))
}

/// Renders a JSON scalar as a SQL literal.
fn render_literal(value: &JsonValue) -> QueryResult<String> {
    match value {
        JsonValue::Null => Ok("NULL".to_string()),
        JsonValue::Bool(true) => Ok("TRUE".to_string()),
        JsonValue::Bool(false) => Ok("FALSE".to_string()),
        JsonValue::Number(number) => Ok(number.to_string()),
        JsonValue::String(text) => {
            if text.contains('\0') {
                return Err(QueryError::new(QueryErrorKind::ArgumentParse(
                    "string literal contains NUL".to_string(),
                )));
            }
            Ok(format!("'{}'", text.replace('\'', "''")))
        }
        JsonValue::Array(_) | JsonValue::Object(_) => Err(QueryError::new(
            QueryErrorKind::ArgumentParse("composite values are not valid literals".to_string()),
        )),
    }
}
