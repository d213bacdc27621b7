//! Structured call expression parsing.
//!
//! The generator is prompted to emit a single object-accessor expression of
//! the shape `store.<model>.<method>({...})` or `store.<model>.<method>()`.
//! Models decorate this freely (code fences, `const x = await ...`,
//! trailing semicolons), so the parser searches for the call shape anywhere
//! in the cleaned text rather than anchoring to the start.

use crate::{EntityHandle, EntityRegistry, QueryArguments, QueryMethod, QueryResult};
use regex::Regex;
use sibyl_core::strip_code_fences;
use sibyl_error::{QueryError, QueryErrorKind};
use std::sync::LazyLock;

static CALL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\w+)\.(\w+)\.(\w+)\(").expect("call shape pattern"));

/// A parsed but unresolved structured call.
///
/// Entity and method are still raw strings at this stage; resolution
/// against the registry and method set happens in the executor so that
/// unknown names fail before any store access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuredCall {
    /// The receiver identifier (e.g. `store`, `prisma`); informational only
    pub receiver: String,
    /// Entity name as written by the model
    pub model: String,
    /// Method name as written by the model
    pub method: String,
    /// Argument object literal text, `None` for the zero-arg call form
    pub arguments: Option<String>,
}

impl StructuredCall {
    /// Parses a generated expression into a structured call.
    ///
    /// Strips code-fence decoration, locates the first
    /// `ident.ident.ident(` occurrence, and extracts a balanced-brace
    /// argument object if one follows.
    ///
    /// # Errors
    ///
    /// Returns `InvalidFormat` when no call shape is present or the
    /// argument braces never balance.
    pub fn parse(text: &str) -> QueryResult<Self> {
        let cleaned = strip_code_fences(text);

        let capture = CALL_SHAPE.captures(&cleaned).ok_or_else(|| {
            QueryError::new(QueryErrorKind::InvalidFormat(format!(
                "no call expression found in: {}",
                truncate(&cleaned, 120)
            )))
        })?;

        let open = capture.get(0).map(|m| m.end()).unwrap_or(0);
        let rest = cleaned[open..].trim_start();

        let arguments = if rest.starts_with(')') {
            None
        } else if rest.starts_with('{') {
            Some(extract_balanced_object(rest)?)
        } else {
            return Err(QueryError::new(QueryErrorKind::InvalidFormat(format!(
                "arguments must be an object literal or empty, got: {}",
                truncate(rest, 60)
            ))));
        };

        Ok(Self {
            receiver: capture[1].to_string(),
            model: capture[2].to_string(),
            method: capture[3].to_string(),
            arguments,
        })
    }

    /// Resolves this call against the registry and method set.
    ///
    /// Resolution is pure: no store access happens here, so an unknown
    /// entity or method fails before any connection is used.
    ///
    /// # Errors
    ///
    /// `UnknownModel` for an unregistered entity, `UnknownMethod` for an
    /// unsupported method, `ArgumentParse` for a non-literal argument
    /// object.
    pub fn resolve(&self, registry: &EntityRegistry) -> QueryResult<ResolvedCall> {
        let handle = registry.resolve(&self.model)?.clone();
        let method = QueryMethod::parse(&self.method)?;
        let arguments = QueryArguments::parse(self.arguments.as_deref())?;
        Ok(ResolvedCall {
            handle,
            method,
            arguments,
        })
    }
}

/// A structured call resolved to a known entity, method, and parsed
/// arguments, ready for SQL rendering.
#[derive(Debug, Clone)]
pub struct ResolvedCall {
    /// The registry handle for the named entity
    pub handle: EntityHandle,
    /// The dispatchable method
    pub method: QueryMethod,
    /// Parsed argument object
    pub arguments: QueryArguments,
}

/// Extracts a balanced `{...}` prefix, respecting string literals.
fn extract_balanced_object(text: &str) -> QueryResult<String> {
    let mut depth = 0usize;
    let mut in_string: Option<char> = None;
    let mut escaped = false;

    for (idx, ch) in text.char_indices() {
        if let Some(quote) = in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == quote {
                in_string = None;
            }
            continue;
        }
        match ch {
            '"' | '\'' => in_string = Some(ch),
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(text[..=idx].to_string());
                }
            }
            _ => {}
        }
    }

    Err(QueryError::new(QueryErrorKind::InvalidFormat(
        "unbalanced braces in argument object".to_string(),
    )))
}

fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
