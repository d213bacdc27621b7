//! Terminal rendering for pipeline output.

use serde_json::Value as JsonValue;
use sibyl_pipeline::{PipelineOutput, ResultEnvelope, TableData};

/// Renders a pipeline outcome for display: a markdown table, pretty JSON,
/// or the fixed no-data message.
pub fn render_output(output: &PipelineOutput) -> String {
    match output {
        PipelineOutput::NoData => format!("{}", output),
        PipelineOutput::Envelope(envelope) => render_envelope(envelope),
    }
}

/// Renders a classified envelope.
pub fn render_envelope(envelope: &ResultEnvelope) -> String {
    match envelope {
        ResultEnvelope::Table(data) => format_as_markdown(data),
        ResultEnvelope::Raw(value) => {
            serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
        }
    }
}

/// Formats tabular data as a markdown table.
fn format_as_markdown(data: &TableData) -> String {
    if data.columns.is_empty() {
        return "No columns".to_string();
    }

    let mut output = String::new();

    // Header row
    output.push_str("| ");
    output.push_str(&data.columns.join(" | "));
    output.push_str(" |\n");

    // Separator
    output.push('|');
    for _ in &data.columns {
        output.push_str(" --- |");
    }
    output.push('\n');

    // Data rows
    for row in &data.rows {
        output.push_str("| ");
        let values: Vec<String> = data
            .columns
            .iter()
            .map(|col| row.get(col).map(render_cell).unwrap_or_default())
            .collect();
        output.push_str(&values.join(" | "));
        output.push_str(" |\n");
    }

    output
}

fn render_cell(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn table() -> TableData {
        let rows = vec![
            json!({"email": "ada@example.com", "name": "Ada", "visits": 3}),
            json!({"email": "grace@example.com", "name": null, "visits": 7}),
        ]
        .into_iter()
        .map(|v| v.as_object().unwrap().clone())
        .collect();
        TableData {
            columns: vec!["email".to_string(), "name".to_string(), "visits".to_string()],
            rows,
        }
    }

    #[test]
    fn renders_markdown_table_with_nulls_blank() {
        let rendered = render_envelope(&ResultEnvelope::Table(table()));
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "| email | name | visits |");
        assert_eq!(lines[1], "| --- | --- | --- |");
        assert_eq!(lines[2], "| ada@example.com | Ada | 3 |");
        assert_eq!(lines[3], "| grace@example.com |  | 7 |");
    }

    #[test]
    fn renders_raw_as_pretty_json() {
        let rendered = render_envelope(&ResultEnvelope::Raw(json!({"count": 5})));
        assert!(rendered.contains("\"count\": 5"));
    }

    #[test]
    fn renders_no_data_message() {
        assert_eq!(
            render_output(&PipelineOutput::NoData),
            "No data found for the given query."
        );
    }
}
