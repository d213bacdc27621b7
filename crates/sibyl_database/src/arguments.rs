//! Constrained parsing of generated argument objects.
//!
//! The generator emits argument objects in loose object-literal syntax
//! (bare keys, single quotes, trailing commas). The source system evaluated
//! that text as code; here it is normalized into strict JSON and parsed as
//! data. Anything that is not a pure literal — function calls, arithmetic,
//! identifiers in value position — fails with `ArgumentParse`.

use crate::QueryResult;
use serde::Deserialize;
use serde_json::{Map, Value as JsonValue};
use sibyl_error::{QueryError, QueryErrorKind};

/// Parsed argument object for a structured call.
///
/// Unknown keys are ignored; the executor only acts on the fields below.
///
/// # Examples
///
/// ```
/// use sibyl_database::QueryArguments;
///
/// let args = QueryArguments::parse(Some("{ where: { active: true }, take: 10 }")).unwrap();
/// assert_eq!(args.take, Some(10));
/// assert!(args.where_clause.is_some());
///
/// let empty = QueryArguments::parse(None).unwrap();
/// assert_eq!(empty, QueryArguments::default());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct QueryArguments {
    /// Filter criteria, column name to scalar or operator object
    #[serde(rename = "where", default)]
    pub where_clause: Option<Map<String, JsonValue>>,
    /// Column projection, column name to `true`
    #[serde(default)]
    pub select: Option<Map<String, JsonValue>>,
    /// Values for create/update
    #[serde(default)]
    pub data: Option<Map<String, JsonValue>>,
    /// Sort specification, column name to `"asc"`/`"desc"`
    #[serde(rename = "orderBy", default)]
    pub order_by: Option<JsonValue>,
    /// Row limit
    #[serde(default)]
    pub take: Option<i64>,
    /// Row offset
    #[serde(default)]
    pub skip: Option<i64>,
}

impl QueryArguments {
    /// Parses an optional argument-object literal.
    ///
    /// `None` and `{}` both yield the default (empty) arguments.
    ///
    /// # Errors
    ///
    /// Returns `ArgumentParse` when the text is not a literal object after
    /// normalization.
    pub fn parse(text: Option<&str>) -> QueryResult<Self> {
        let Some(text) = text else {
            return Ok(Self::default());
        };

        let normalized = normalize_literal(text);
        serde_json::from_str(&normalized).map_err(|e| {
            QueryError::new(QueryErrorKind::ArgumentParse(format!(
                "{} (normalized: {})",
                e, normalized
            )))
        })
    }
}

/// Rewrites a loose object literal into strict JSON.
///
/// Three normalizations, applied in one pass with string-literal awareness:
/// bare identifier keys are quoted, single-quoted strings become
/// double-quoted, and trailing commas are dropped. Everything else passes
/// through and must already be valid JSON.
fn normalize_literal(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + 16);
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        match ch {
            '"' => {
                // Copy a double-quoted string verbatim.
                out.push(ch);
                i += 1;
                while i < chars.len() {
                    out.push(chars[i]);
                    if chars[i] == '\\' && i + 1 < chars.len() {
                        i += 1;
                        out.push(chars[i]);
                    } else if chars[i] == '"' {
                        break;
                    }
                    i += 1;
                }
                i += 1;
            }
            '\'' => {
                // Re-quote a single-quoted string as JSON.
                out.push('"');
                i += 1;
                while i < chars.len() && chars[i] != '\'' {
                    match chars[i] {
                        '\\' if i + 1 < chars.len() && chars[i + 1] == '\'' => {
                            out.push('\'');
                            i += 1;
                        }
                        '"' => out.push_str("\\\""),
                        c => out.push(c),
                    }
                    i += 1;
                }
                out.push('"');
                i += 1;
            }
            ',' => {
                // Drop the comma if only whitespace separates it from a
                // closing bracket.
                let mut j = i + 1;
                while j < chars.len() && chars[j].is_whitespace() {
                    j += 1;
                }
                if j < chars.len() && (chars[j] == '}' || chars[j] == ']') {
                    i += 1;
                } else {
                    out.push(ch);
                    i += 1;
                }
            }
            c if c.is_ascii_alphabetic() || c == '_' || c == '$' => {
                // Read an identifier; quote it iff it is in key position.
                let start = i;
                while i < chars.len()
                    && (chars[i].is_ascii_alphanumeric() || chars[i] == '_' || chars[i] == '$')
                {
                    i += 1;
                }
                let ident: String = chars[start..i].iter().collect();
                let mut j = i;
                while j < chars.len() && chars[j].is_whitespace() {
                    j += 1;
                }
                if j < chars.len() && chars[j] == ':' {
                    out.push('"');
                    out.push_str(&ident);
                    out.push('"');
                } else {
                    out.push_str(&ident);
                }
            }
            c => {
                out.push(c);
                i += 1;
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bare_keys_are_quoted() {
        let args = QueryArguments::parse(Some("{ where: { id: 5 } }")).unwrap();
        let where_clause = args.where_clause.unwrap();
        assert_eq!(where_clause["id"], json!(5));
    }

    #[test]
    fn single_quotes_become_json_strings() {
        let args = QueryArguments::parse(Some("{ where: { name: 'O\\'Brien' } }")).unwrap();
        assert_eq!(args.where_clause.unwrap()["name"], json!("O'Brien"));
    }

    #[test]
    fn trailing_commas_are_dropped() {
        let args = QueryArguments::parse(Some("{ take: 3, }")).unwrap();
        assert_eq!(args.take, Some(3));
    }

    #[test]
    fn already_strict_json_passes_through() {
        let args =
            QueryArguments::parse(Some(r#"{ "where": { "active": true }, "skip": 2 }"#)).unwrap();
        assert_eq!(args.skip, Some(2));
        assert_eq!(args.where_clause.unwrap()["active"], json!(true));
    }

    #[test]
    fn keywords_in_value_position_survive() {
        let args = QueryArguments::parse(Some("{ where: { flag: true, note: null } }")).unwrap();
        let where_clause = args.where_clause.unwrap();
        assert_eq!(where_clause["flag"], json!(true));
        assert_eq!(where_clause["note"], json!(null));
    }

    #[test]
    fn braces_inside_strings_are_preserved() {
        let args = QueryArguments::parse(Some(r#"{ where: { msg: "a: {b}" } }"#)).unwrap();
        assert_eq!(args.where_clause.unwrap()["msg"], json!("a: {b}"));
    }

    #[test]
    fn code_expressions_are_rejected() {
        let err = QueryArguments::parse(Some("{ where: { createdAt: new Date() } }")).unwrap_err();
        assert!(matches!(err.kind, QueryErrorKind::ArgumentParse(_)));
    }

    #[test]
    fn non_object_input_is_rejected() {
        let err = QueryArguments::parse(Some("[1, 2, 3]")).unwrap_err();
        assert!(matches!(err.kind, QueryErrorKind::ArgumentParse(_)));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let args = QueryArguments::parse(Some("{ include: { posts: true }, take: 1 }")).unwrap();
        assert_eq!(args.take, Some(1));
    }
}
