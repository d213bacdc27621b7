//! Schema source scanning.

use crate::{FieldDescriptor, ModelDescriptor, SchemaSnapshot};
use regex::Regex;
use sibyl_error::{SchemaError, SchemaErrorKind};
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, instrument};

static MODEL_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"model\s+(\w+)\s*\{([^}]+)\}").expect("model block pattern"));

static FIELD_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\w+)\s+([^{}\s]+)").expect("field line pattern"));

/// Reads a schema source file and produces a snapshot.
///
/// # Errors
///
/// Returns a [`SchemaError`] with kind `Read` if the source cannot be
/// located or read. Parsing itself never fails; unparseable lines are
/// skipped.
#[instrument(fields(path = %path.as_ref().display()))]
pub fn describe_schema(path: impl AsRef<Path>) -> Result<SchemaSnapshot, SchemaError> {
    let source = std::fs::read_to_string(path.as_ref()).map_err(|e| {
        SchemaError::new(SchemaErrorKind::Read(format!(
            "{}: {}",
            path.as_ref().display(),
            e
        )))
    })?;

    Ok(parse_schema(&source))
}

/// Parses schema source text into a snapshot.
///
/// Scans for `model <Name> { ... }` blocks. Within each block, blank lines
/// and `//` comments are skipped, relation-annotated lines are dropped
/// entirely, and the remaining lines contribute one field each. List-ness
/// and required-ness are classified purely from punctuation on the type
/// token: `[]` marks a list, `?` marks an optional.
pub fn parse_schema(source: &str) -> SchemaSnapshot {
    let mut models = Vec::new();

    for capture in MODEL_BLOCK.captures_iter(source) {
        let name = capture[1].to_string();
        let body = &capture[2];

        let mut fields = Vec::new();
        for line in body.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with("//") {
                continue;
            }
            // Relation fields leak traversal paths into generated queries;
            // drop the whole line rather than nulling the relation.
            if trimmed.contains("@relation") {
                continue;
            }

            if let Some(field) = FIELD_LINE.captures(trimmed) {
                let field_type = field[2].to_string();
                fields.push(FieldDescriptor {
                    name: field[1].to_string(),
                    is_list: field_type.contains("[]"),
                    is_required: !field_type.contains('?'),
                    field_type,
                    relation: None,
                });
            }
        }

        models.push(ModelDescriptor { name, fields });
    }

    debug!(model_count = models.len(), "Parsed schema snapshot");
    SchemaSnapshot { models }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: &str = r#"
        datasource db {
          provider = "postgresql"
          url      = env("DATABASE_URL")
        }

        model User {
          id        Int      @id @default(autoincrement())
          email     String   @unique
          name      String?
          // soft-delete marker
          deletedAt DateTime?
          posts     Post[]   @relation("author")
        }

        model Post {
          id       Int    @id
          title    String
          tags     String[]
          author   User   @relation("author", fields: [authorId], references: [id])
          authorId Int
        }
    "#;

    #[test]
    fn parses_one_descriptor_per_model_block() {
        let snapshot = parse_schema(SCHEMA);
        assert_eq!(snapshot.models.len(), 2);
        assert_eq!(snapshot.models[0].name, "User");
        assert_eq!(snapshot.models[1].name, "Post");
    }

    #[test]
    fn excludes_relation_lines_and_keeps_the_rest() {
        let snapshot = parse_schema(SCHEMA);
        let user = snapshot.find_model("user").unwrap();
        let names: Vec<&str> = user.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["id", "email", "name", "deletedAt"]);

        let post = snapshot.find_model("Post").unwrap();
        assert!(post.fields.iter().all(|f| f.name != "author"));
        assert!(post.fields.iter().any(|f| f.name == "authorId"));
    }

    #[test]
    fn classifies_list_and_required_from_punctuation() {
        let snapshot = parse_schema(SCHEMA);
        let post = snapshot.find_model("Post").unwrap();

        let tags = post.fields.iter().find(|f| f.name == "tags").unwrap();
        assert!(tags.is_list);
        assert!(tags.is_required);

        let user = snapshot.find_model("User").unwrap();
        let name = user.fields.iter().find(|f| f.name == "name").unwrap();
        assert!(!name.is_list);
        assert!(!name.is_required);
    }

    #[test]
    fn skips_comments_and_blank_lines() {
        let snapshot = parse_schema(SCHEMA);
        let user = snapshot.find_model("User").unwrap();
        assert!(user.fields.iter().all(|f| !f.name.starts_with("//")));
    }

    #[test]
    fn relation_field_is_serialized_null() {
        let snapshot = parse_schema(SCHEMA);
        let rendered = snapshot.to_prompt_json();
        assert!(rendered.contains("\"relation\": null"));
        assert!(rendered.contains("\"isRequired\": true"));
    }

    #[test]
    fn empty_source_yields_empty_snapshot() {
        let snapshot = parse_schema("generator client { provider = \"prisma\" }");
        assert!(snapshot.models.is_empty());
        assert_eq!(snapshot.to_prompt_json(), "[]");
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = describe_schema("/nonexistent/schema.prisma").unwrap_err();
        assert!(matches!(err.kind, SchemaErrorKind::Read(_)));
    }
}
