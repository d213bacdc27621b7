//! Query execution against the live store.

use crate::{EntityRegistry, QueryMethod, QueryResult, RawStatementGuard, StructuredCall, sql};
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_types::BigInt;
use serde_json::{Value as JsonValue, json};
use sibyl_core::strip_code_fences;
use sibyl_error::{QueryError, QueryErrorKind, SibylResult};
use sibyl_interface::{ExecutionResult, QueryDispatch};
use std::sync::{Arc, Mutex};
use tracing::{debug, instrument};

#[derive(QueryableByName)]
struct JsonRow {
    #[diesel(sql_type = diesel::sql_types::Json)]
    json: JsonValue,
}

#[derive(QueryableByName)]
struct CountRow {
    #[diesel(sql_type = BigInt)]
    count: i64,
}

/// Executes generated queries against PostgreSQL.
///
/// Shares a single connection handle across concurrent pipeline runs; the
/// registry is the closed set of entities structured calls may touch.
#[derive(Clone)]
pub struct QueryExecutor {
    connection: Arc<Mutex<PgConnection>>,
    registry: EntityRegistry,
    guard: RawStatementGuard,
}

impl QueryExecutor {
    /// Creates a new query executor.
    pub fn new(connection: Arc<Mutex<PgConnection>>, registry: EntityRegistry) -> Self {
        Self {
            connection,
            registry,
            guard: RawStatementGuard,
        }
    }

    /// The entity registry backing structured dispatch.
    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    /// Validates and runs raw SQL, returning JSON rows.
    #[instrument(skip(self, query_text))]
    pub fn run_raw(&self, query_text: &str) -> QueryResult<ExecutionResult> {
        let cleaned = strip_code_fences(query_text);
        let statement = self.guard.validate(&cleaned)?;

        debug!(statement = %statement, "Executing raw statement");
        let rows = self.load_json_rows(&wrap_row_to_json(&statement))?;
        Ok(ExecutionResult::Rows(rows))
    }

    /// Parses, resolves, and runs a structured call expression.
    ///
    /// Entity and method resolution happen before the connection is
    /// touched; an unknown entity never reaches the store.
    #[instrument(skip(self, expr_text))]
    pub fn run_structured(&self, expr_text: &str) -> QueryResult<ExecutionResult> {
        let resolved = StructuredCall::parse(expr_text)?.resolve(&self.registry)?;
        let (handle, args) = (&resolved.handle, &resolved.arguments);

        debug!(
            model = %handle.model_name(),
            method = %resolved.method,
            "Dispatching structured call"
        );

        match resolved.method {
            QueryMethod::FindMany => {
                let statement = sql::select_statement(handle, args, false)?;
                let rows = self.load_json_rows(&wrap_row_to_json(&statement))?;
                Ok(ExecutionResult::Rows(rows))
            }
            QueryMethod::FindUnique | QueryMethod::FindFirst => {
                let statement = sql::select_statement(handle, args, true)?;
                let rows = self.load_json_rows(&wrap_row_to_json(&statement))?;
                Ok(ExecutionResult::Value(
                    rows.into_iter().next().unwrap_or(JsonValue::Null),
                ))
            }
            QueryMethod::Count => {
                let statement = sql::count_statement(handle, args)?;
                let count = self.load_count(&statement)?;
                Ok(ExecutionResult::Value(json!({ "count": count })))
            }
            QueryMethod::Create => {
                let statement = sql::insert_statement(handle, args)?;
                let rows = self.load_json_rows(&statement)?;
                Ok(ExecutionResult::Value(
                    rows.into_iter().next().unwrap_or(JsonValue::Null),
                ))
            }
            QueryMethod::Update => {
                let statement = sql::update_statement(handle, args)?;
                let rows = self.load_json_rows(&statement)?;
                Ok(ExecutionResult::Rows(rows))
            }
            QueryMethod::Delete => {
                let statement = sql::delete_statement(handle, args)?;
                let rows = self.load_json_rows(&statement)?;
                Ok(ExecutionResult::Rows(rows))
            }
        }
    }

    fn load_json_rows(&self, statement: &str) -> QueryResult<Vec<JsonValue>> {
        let mut conn = self.lock_connection()?;
        let rows: Vec<JsonRow> = diesel::sql_query(statement)
            .load(&mut *conn)
            .map_err(|e| QueryError::new(QueryErrorKind::Execution(e.to_string())))?;
        debug!(count = rows.len(), "Retrieved rows");
        Ok(rows.into_iter().map(|row| row.json).collect())
    }

    fn load_count(&self, statement: &str) -> QueryResult<i64> {
        let mut conn = self.lock_connection()?;
        let row: CountRow = diesel::sql_query(statement)
            .get_result(&mut *conn)
            .map_err(|e| QueryError::new(QueryErrorKind::Execution(e.to_string())))?;
        Ok(row.count)
    }

    fn lock_connection(&self) -> QueryResult<std::sync::MutexGuard<'_, PgConnection>> {
        self.connection
            .lock()
            .map_err(|e| QueryError::new(QueryErrorKind::Connection(e.to_string())))
    }
}

/// Wraps an inner SELECT so each row comes back as one JSON object.
fn wrap_row_to_json(statement: &str) -> String {
    format!("SELECT row_to_json(t) AS json FROM ({}) t", statement)
}

#[async_trait]
impl QueryDispatch for QueryExecutor {
    async fn execute_raw(&self, query_text: &str) -> SibylResult<ExecutionResult> {
        Ok(self.run_raw(query_text)?)
    }

    async fn execute_structured(&self, expr_text: &str) -> SibylResult<ExecutionResult> {
        Ok(self.run_structured(expr_text)?)
    }
}
