//! Validation gate for model-generated raw SQL.
//!
//! Raw mode hands the store a statement written by a language model. The
//! source system executed that text directly; here nothing reaches the
//! connection until it passes this guard. The guard is deliberately
//! conservative: it admits only a single read-only statement, and rejects
//! anything containing comment tokens or mutation keywords even inside
//! string literals. Mutations remain expressible through structured mode,
//! where arguments are parsed rather than executed.

use crate::QueryResult;
use regex::Regex;
use sibyl_error::{QueryError, QueryErrorKind};
use std::sync::LazyLock;

static FORBIDDEN_KEYWORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(insert|update|delete|drop|alter|truncate|create|grant|revoke|copy|vacuum|do|call|execute)\b",
    )
    .expect("forbidden keyword pattern")
});

/// Admits a single read-only statement, rejects everything else.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawStatementGuard;

impl RawStatementGuard {
    /// Validates raw SQL text, returning the normalized statement.
    ///
    /// Normalization strips surrounding whitespace and at most one trailing
    /// semicolon.
    ///
    /// # Errors
    ///
    /// Returns `UnsafeStatement` when the text is empty, contains more than
    /// one statement, carries comment tokens, does not begin with
    /// `SELECT`/`WITH`, or mentions a mutation keyword.
    pub fn validate(&self, sql: &str) -> QueryResult<String> {
        let trimmed = sql.trim().trim_end_matches(';').trim_end();

        if trimmed.is_empty() {
            return Err(unsafe_statement("empty statement"));
        }
        if trimmed.contains(';') {
            return Err(unsafe_statement("multiple statements"));
        }
        if trimmed.contains("--") || trimmed.contains("/*") {
            return Err(unsafe_statement("comment tokens not allowed"));
        }

        let first_word = trimmed
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_lowercase();
        if first_word != "select" && first_word != "with" {
            return Err(unsafe_statement(format!(
                "statement must begin with SELECT or WITH, got '{}'",
                first_word
            )));
        }

        if let Some(found) = FORBIDDEN_KEYWORD.find(trimmed) {
            return Err(unsafe_statement(format!(
                "forbidden keyword '{}'",
                found.as_str()
            )));
        }

        Ok(trimmed.to_string())
    }
}

#[track_caller]
fn unsafe_statement(message: impl Into<String>) -> QueryError {
    QueryError::new(QueryErrorKind::UnsafeStatement(message.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_select_passes() {
        let guard = RawStatementGuard;
        let sql = guard
            .validate("SELECT id, email FROM \"User\" WHERE active = TRUE;")
            .unwrap();
        assert!(!sql.ends_with(';'));
    }

    #[test]
    fn with_cte_passes() {
        let guard = RawStatementGuard;
        assert!(
            guard
                .validate("WITH recent AS (SELECT * FROM \"Order\") SELECT count(*) FROM recent")
                .is_ok()
        );
    }

    #[test]
    fn stacked_statements_are_rejected() {
        let guard = RawStatementGuard;
        let err = guard
            .validate("SELECT 1; SELECT pg_sleep(10)")
            .unwrap_err();
        assert!(matches!(err.kind, QueryErrorKind::UnsafeStatement(_)));
    }

    #[test]
    fn mutations_are_rejected() {
        let guard = RawStatementGuard;
        for sql in [
            "DELETE FROM \"User\"",
            "SELECT 1 UNION SELECT 1; DROP TABLE x",
            "WITH d AS (DELETE FROM t RETURNING *) SELECT * FROM d",
        ] {
            assert!(guard.validate(sql).is_err(), "admitted: {}", sql);
        }
    }

    #[test]
    fn comment_tokens_are_rejected() {
        let guard = RawStatementGuard;
        assert!(guard.validate("SELECT 1 -- hidden").is_err());
        assert!(guard.validate("SELECT /* hidden */ 1").is_err());
    }

    #[test]
    fn empty_text_is_rejected() {
        let guard = RawStatementGuard;
        assert!(guard.validate("  ;  ").is_err());
    }
}
