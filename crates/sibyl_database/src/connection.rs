//! Database connection utilities.

use crate::QueryResult;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use sibyl_error::{QueryError, QueryErrorKind};
use tracing::{debug, instrument};

/// Establish a connection to the PostgreSQL database at `database_url`.
///
/// The connection string is passed in rather than read from the
/// environment so callers control where credentials come from.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
#[instrument(skip(database_url))]
pub fn establish_connection(database_url: &str) -> QueryResult<PgConnection> {
    debug!("Establishing PostgreSQL connection");
    PgConnection::establish(database_url)
        .map_err(|e| QueryError::new(QueryErrorKind::Connection(e.to_string())))
}
