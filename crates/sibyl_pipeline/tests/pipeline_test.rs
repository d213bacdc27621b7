//! End-to-end pipeline tests against scripted model and store mocks.

use async_trait::async_trait;
use serde_json::json;
use sibyl_core::{GenerateRequest, GenerateResponse, Output};
use sibyl_error::SibylResult;
use sibyl_interface::{ExecutionResult, QueryDispatch, SibylDriver};
use sibyl_pipeline::{PipelineOutput, QueryMode, QueryPipeline, ResultEnvelope};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

const SCHEMA: &str = r#"
model User {
    id    Int     @id @default(autoincrement())
    email String  @unique
    name  String?
}
"#;

/// Writes the test schema to a unique temp path, removed on drop.
struct SchemaFile {
    path: PathBuf,
}

impl SchemaFile {
    fn new(tag: &str) -> Self {
        let path = std::env::temp_dir().join(format!("sibyl-pipeline-{}-{}.prisma", tag, std::process::id()));
        std::fs::write(&path, SCHEMA).unwrap();
        Self { path }
    }
}

impl Drop for SchemaFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

/// Driver replaying scripted replies in order.
struct ScriptedDriver {
    replies: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl ScriptedDriver {
    fn new(replies: &[&str]) -> Arc<Self> {
        let mut replies: Vec<String> = replies.iter().map(|s| s.to_string()).collect();
        replies.reverse();
        Arc::new(Self {
            replies: Mutex::new(replies),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SibylDriver for ScriptedDriver {
    async fn generate(&self, _req: &GenerateRequest) -> SibylResult<GenerateResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop()
            .expect("driver called more times than scripted");
        Ok(GenerateResponse {
            outputs: vec![Output::Text(reply)],
        })
    }

    fn provider_name(&self) -> &'static str {
        "scripted"
    }

    fn model_name(&self) -> &str {
        "scripted-model"
    }
}

/// Store stub returning a canned result and recording which entry point ran.
struct CannedStore {
    result: ExecutionResult,
    raw_calls: AtomicUsize,
    structured_calls: AtomicUsize,
    last_query: Mutex<String>,
}

impl CannedStore {
    fn new(result: ExecutionResult) -> Arc<Self> {
        Arc::new(Self {
            result,
            raw_calls: AtomicUsize::new(0),
            structured_calls: AtomicUsize::new(0),
            last_query: Mutex::new(String::new()),
        })
    }
}

#[async_trait]
impl QueryDispatch for CannedStore {
    async fn execute_raw(&self, query_text: &str) -> SibylResult<ExecutionResult> {
        self.raw_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_query.lock().unwrap() = query_text.to_string();
        Ok(self.result.clone())
    }

    async fn execute_structured(&self, expr_text: &str) -> SibylResult<ExecutionResult> {
        self.structured_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_query.lock().unwrap() = expr_text.to_string();
        Ok(self.result.clone())
    }
}

#[tokio::test]
async fn structured_run_produces_a_table_envelope() {
    let schema = SchemaFile::new("table");
    let driver = ScriptedDriver::new(&[
        "```js\nstore.user.findMany()\n```",
        r#"{
            "type": "table",
            "data": {
                "columns": ["email", "name"],
                "rows": [
                    {"email": "ada@example.com", "name": "Ada"},
                    {"email": "grace@example.com", "name": "Grace"}
                ]
            }
        }"#,
    ]);
    let store = CannedStore::new(ExecutionResult::Rows(vec![
        json!({"email": "ada@example.com", "name": "Ada"}),
        json!({"email": "grace@example.com", "name": "Grace"}),
    ]));

    let pipeline = QueryPipeline::new(driver.clone(), store.clone(), &schema.path);
    let output = pipeline.run("list all users").await.unwrap();

    match output {
        PipelineOutput::Envelope(ResultEnvelope::Table(data)) => {
            assert_eq!(data.columns, vec!["email", "name"]);
            assert_eq!(data.rows.len(), 2);
        }
        other => panic!("expected table envelope, got {:?}", other),
    }
    assert_eq!(store.structured_calls.load(Ordering::SeqCst), 1);
    assert_eq!(store.raw_calls.load(Ordering::SeqCst), 0);
    assert_eq!(
        store.last_query.lock().unwrap().as_str(),
        "```js\nstore.user.findMany()\n```"
    );
    assert_eq!(driver.calls(), 2);
}

#[tokio::test]
async fn raw_mode_routes_through_the_sql_entry_point() {
    let schema = SchemaFile::new("raw");
    let driver = ScriptedDriver::new(&[
        "```sql\nSELECT count(*) FROM \"User\"\n```",
        r#"{"type": "raw", "data": {"count": 2}}"#,
    ]);
    let store = CannedStore::new(ExecutionResult::Value(json!({"count": 2})));

    let pipeline = QueryPipeline::new(driver.clone(), store.clone(), &schema.path)
        .with_mode(QueryMode::Raw);
    let output = pipeline.run("how many users are there").await.unwrap();

    assert_eq!(
        output,
        PipelineOutput::Envelope(ResultEnvelope::Raw(json!({"count": 2})))
    );
    assert_eq!(store.raw_calls.load(Ordering::SeqCst), 1);
    assert_eq!(store.structured_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn empty_result_short_circuits_without_classification() {
    let schema = SchemaFile::new("empty");
    // One scripted reply only: the classifier must never be consulted.
    let driver = ScriptedDriver::new(&["store.user.findMany({ where: { name: 'Nobody' } })"]);
    let store = CannedStore::new(ExecutionResult::Rows(vec![]));

    let pipeline = QueryPipeline::new(driver.clone(), store, &schema.path);
    let output = pipeline.run("find a user named Nobody").await.unwrap();

    assert!(output.is_no_data());
    assert_eq!(format!("{}", output), "No data found for the given query.");
    assert_eq!(driver.calls(), 1);
}

#[tokio::test]
async fn classifier_retry_recovers_from_malformed_output() {
    let schema = SchemaFile::new("retry");
    let driver = ScriptedDriver::new(&[
        "store.user.count()",
        "Happy to help! The count is 2.",
        r#"{"type": "raw", "data": {"count": 2}}"#,
    ]);
    let store = CannedStore::new(ExecutionResult::Value(json!({"count": 2})));

    let pipeline = QueryPipeline::new(driver.clone(), store, &schema.path);
    let output = pipeline.run("how many users").await.unwrap();

    assert_eq!(
        output,
        PipelineOutput::Envelope(ResultEnvelope::Raw(json!({"count": 2})))
    );
    assert_eq!(driver.calls(), 3);
}

#[tokio::test]
async fn classifier_exhaustion_surfaces_as_an_error() {
    let schema = SchemaFile::new("exhaust");
    let driver = ScriptedDriver::new(&["store.user.findMany()", "prose", "more prose"]);
    let store = CannedStore::new(ExecutionResult::Rows(vec![json!({"id": 1})]));

    let pipeline = QueryPipeline::new(driver, store, &schema.path)
        .with_classifier_attempts(2);
    let err = pipeline.run("list users").await.unwrap_err();

    assert!(format!("{}", err).contains("after 2 attempts"));
}

#[tokio::test]
async fn missing_schema_fails_before_any_model_call() {
    let driver = ScriptedDriver::new(&[]);
    let store = CannedStore::new(ExecutionResult::Rows(vec![]));

    let pipeline = QueryPipeline::new(driver.clone(), store, "/nonexistent/schema.prisma");
    assert!(pipeline.run("list users").await.is_err());
    assert_eq!(driver.calls(), 0);
}
