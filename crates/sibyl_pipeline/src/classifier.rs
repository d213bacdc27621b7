//! Result classification: deciding how to present query output.

use crate::envelope::ResultEnvelope;
use sibyl_core::{GenerateRequest, Message, strip_code_fences};
use sibyl_error::{
    ClassifierError, ClassifierErrorKind, ModelsError, ModelsErrorKind, SibylResult,
};
use sibyl_interface::{ExecutionResult, SibylDriver};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Default number of classification attempts before giving up.
pub const DEFAULT_CLASSIFIER_ATTEMPTS: u32 = 3;

/// Asks a model to choose a presentation envelope for an execution result,
/// re-prompting a bounded number of times when the output fails validation.
pub struct ResultClassifier {
    driver: Arc<dyn SibylDriver>,
    timeout: Duration,
    max_attempts: u32,
}

impl ResultClassifier {
    /// Creates a classifier with the default attempt bound.
    pub fn new(driver: Arc<dyn SibylDriver>, timeout: Duration) -> Self {
        Self {
            driver,
            timeout,
            max_attempts: DEFAULT_CLASSIFIER_ATTEMPTS,
        }
    }

    /// Overrides the attempt bound. Zero is clamped to one.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Classifies `result` into a table or raw envelope.
    ///
    /// Driver failures propagate immediately; validation failures are fed
    /// back to the model until an attempt validates or the bound is hit.
    ///
    /// # Errors
    ///
    /// Returns `AttemptsExhausted` when no attempt produced a valid
    /// envelope, or the underlying driver error.
    #[instrument(skip(self, result))]
    pub async fn classify(
        &self,
        user_input: &str,
        result: &ExecutionResult,
    ) -> SibylResult<ResultEnvelope> {
        let mut last_error = String::new();
        for attempt in 1..=self.max_attempts {
            let feedback = (attempt > 1).then_some(last_error.as_str());
            let request = self.build_request(user_input, result, feedback);
            let response = tokio::time::timeout(self.timeout, self.driver.generate(&request))
                .await
                .map_err(|_| {
                    ModelsError::new(ModelsErrorKind::Timeout(self.timeout.as_secs()))
                })??;

            let text = strip_code_fences(&response.text());
            match ResultEnvelope::decode(&text) {
                Ok(envelope) => {
                    debug!(attempt, "Classifier produced a valid envelope");
                    return Ok(envelope);
                }
                Err(e) => {
                    warn!(attempt, error = %e, "Classifier output failed validation");
                    last_error = format!("{}", e.kind);
                }
            }
        }

        Err(ClassifierError::new(ClassifierErrorKind::AttemptsExhausted {
            attempts: self.max_attempts,
            last_error,
        })
        .into())
    }

    fn build_request(
        &self,
        user_input: &str,
        result: &ExecutionResult,
        feedback: Option<&str>,
    ) -> GenerateRequest {
        let data = serde_json::to_string_pretty(&result.to_json())
            .unwrap_or_else(|_| "null".to_string());

        let mut system = format!(
            "You are a data formatter that decides how to present database query results.\n\
             CRITICAL DECISION RULES:\n\
               1. Use type: \"table\" ONLY when:\n\
                 - Data has multiple records (2+ items in array)\n\
                 - Data has multiple fields per record (3+ fields)\n\
                 - User asks for \"list\", \"show\", \"display\"\n\
                 - Examples: \"show all products\", \"list orders\"\n\n\
               2. Use type: \"raw\" for:\n\
                 - Single values: {{\"count\": 5}}, {{\"success\": true}}\n\
                 - Count queries: \"how many\"\n\
                 - Update/Insert/Delete results\n\
                 - Simple aggregations: sum, average, min, max\n\
                 - Boolean results: true/false\n\n\
             FORMATTING RULES:\n\
                 - For type: \"table\": Extract field names as columns, convert records to rows\n\
                 - For type: \"raw\": Return data as-is\n\
                 - NEVER add explanatory text\n\
                 - Respond with a single JSON object of the form\n\
                   {{\"type\": \"table\", \"data\": {{\"columns\": [...], \"rows\": [...]}}}}\n\
                   or {{\"type\": \"raw\", \"data\": ...}}\n\
               The user's question was: \"{user_input}\"\n\
               The raw data is: {data}",
        );
        if let Some(error) = feedback {
            system.push_str(&format!(
                "\n\nYour previous answer was rejected: {}. Respond again with only the \
                 corrected JSON object.",
                error
            ));
        }

        GenerateRequest::new(vec![Message::system(system)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use sibyl_core::{GenerateResponse, Output};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Driver that replays a scripted sequence of replies.
    struct ScriptedDriver {
        replies: Mutex<Vec<String>>,
        calls: AtomicUsize,
    }

    impl ScriptedDriver {
        fn new(replies: &[&str]) -> Self {
            let mut replies: Vec<String> = replies.iter().map(|s| s.to_string()).collect();
            replies.reverse();
            Self {
                replies: Mutex::new(replies),
                calls: AtomicUsize::new(0),
            }
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
                .unwrap_or_else(|| "out of scripted replies".to_string());
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

    fn classifier(driver: Arc<ScriptedDriver>) -> ResultClassifier {
        ResultClassifier::new(driver, Duration::from_secs(5))
    }

    #[tokio::test]
    async fn accepts_valid_envelope_on_first_attempt() {
        let driver = Arc::new(ScriptedDriver::new(&[
            r#"{"type": "raw", "data": {"count": 3}}"#,
        ]));
        let result = ExecutionResult::Value(json!({"count": 3}));
        let envelope = classifier(driver.clone())
            .classify("how many users", &result)
            .await
            .unwrap();
        assert_eq!(envelope, ResultEnvelope::Raw(json!({"count": 3})));
        assert_eq!(driver.calls(), 1);
    }

    #[tokio::test]
    async fn strips_fences_before_decoding() {
        let driver = Arc::new(ScriptedDriver::new(&[
            "```json\n{\"type\": \"raw\", \"data\": true}\n```",
        ]));
        let result = ExecutionResult::Value(json!(true));
        let envelope = classifier(driver)
            .classify("is the service up", &result)
            .await
            .unwrap();
        assert_eq!(envelope, ResultEnvelope::Raw(json!(true)));
    }

    #[tokio::test]
    async fn reprompts_after_invalid_output() {
        let driver = Arc::new(ScriptedDriver::new(&[
            "Sure! Here are the results you asked for.",
            r#"{"type": "raw", "data": 7}"#,
        ]));
        let result = ExecutionResult::Value(json!(7));
        let envelope = classifier(driver.clone())
            .classify("how many orders", &result)
            .await
            .unwrap();
        assert_eq!(envelope, ResultEnvelope::Raw(json!(7)));
        assert_eq!(driver.calls(), 2);
    }

    #[tokio::test]
    async fn exhausts_attempts_and_reports_last_error() {
        let driver = Arc::new(ScriptedDriver::new(&[
            "not json",
            "still not json",
            "never json",
        ]));
        let result = ExecutionResult::Rows(vec![json!({"id": 1})]);
        let err = classifier(driver.clone())
            .classify("list users", &result)
            .await
            .unwrap_err();
        assert!(format!("{}", err).contains("after 3 attempts"));
        assert_eq!(driver.calls(), 3);
    }

    #[tokio::test]
    async fn attempt_bound_is_configurable() {
        let driver = Arc::new(ScriptedDriver::new(&["bad"]));
        let result = ExecutionResult::Value(json!(1));
        let err = classifier(driver.clone())
            .with_max_attempts(1)
            .classify("count", &result)
            .await
            .unwrap_err();
        assert!(format!("{}", err).contains("after 1 attempts"));
        assert_eq!(driver.calls(), 1);
    }
}
