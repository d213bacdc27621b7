//! Text cleanup for model output.

/// Fence tokens models wrap query text in despite instructions.
///
/// Ordered longest-first: a token that is a prefix of another (`` ```js ``
/// vs `` ```json ``) would otherwise leave the suffix behind.
const FENCE_TOKENS: [&str; 6] = [
    "```typescript",
    "```javascript",
    "```json",
    "```sql",
    "```js",
    "```",
];

/// Strips markdown code-fence decoration from model output.
///
/// Models routinely wrap generated queries in code fences even when the
/// prompt forbids prose. Every recognized fence token is removed wherever
/// it appears, then the remainder is trimmed.
///
/// # Examples
///
/// ```
/// use sibyl_core::strip_code_fences;
///
/// let fenced = "```sql\nSELECT 1\n```";
/// assert_eq!(strip_code_fences(fenced), "SELECT 1");
/// assert_eq!(strip_code_fences("SELECT 1"), "SELECT 1");
/// ```
pub fn strip_code_fences(text: &str) -> String {
    let mut cleaned = text.to_string();
    for token in FENCE_TOKENS {
        cleaned = cleaned.replace(token, "");
    }
    cleaned.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_each_fence_variant() {
        let expr = "store.user.findMany()";
        for lang in ["typescript", "javascript", "js", ""] {
            let fenced = format!("```{}\n{}\n```", lang, expr);
            assert_eq!(strip_code_fences(&fenced), expr, "variant: {:?}", lang);
        }
    }

    #[test]
    fn unfenced_text_passes_through() {
        assert_eq!(strip_code_fences("  SELECT 1  "), "SELECT 1");
    }

    #[test]
    fn strips_inline_fences() {
        assert_eq!(
            strip_code_fences("```json{\"type\":\"raw\"}```"),
            "{\"type\":\"raw\"}"
        );
    }

    #[test]
    fn json_fence_is_removed_whole() {
        // "```js" is a prefix of "```json"; the longer token must win.
        let fenced = "```json\n{\"type\": \"table\", \"data\": {\"columns\": [], \"rows\": []}}\n```";
        assert_eq!(
            strip_code_fences(fenced),
            "{\"type\": \"table\", \"data\": {\"columns\": [], \"rows\": []}}"
        );
        assert_eq!(strip_code_fences("```js\nstore.user.count()\n```"), "store.user.count()");
    }
}
