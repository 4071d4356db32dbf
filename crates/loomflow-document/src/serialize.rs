//! Document serialization
//!
//! A [`WorkflowDocument`] persists in one of two textual forms:
//!
//! - **JSON** (canonical), via serde.
//! - **Text**, a line-oriented `key: value` format with two-space nested
//!   indentation. Object members are written as `key: scalar` or as `key:`
//!   followed by an indented block; array items as `- scalar` or a bare `-`
//!   followed by an indented block. Strings are JSON-quoted, so values with
//!   newlines or colons are unambiguous; numbers, booleans and `null` are
//!   written literally. Blank lines and `#` comments are accepted on read.
//!
//! Both round-trip through `serde_json::Value`, so
//! `deserialize(serialize(d, f), f)` reproduces `d` field-for-field.
//! Only [`deserialize`] can fail on bad input, and only with a
//! [`ParseError`]; schema problems in a well-formed document are the
//! validator's business.

use serde_json::Value;

use crate::error::{ParseError, SerializeError};
use crate::types::WorkflowDocument;

/// Supported persistence formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// Canonical JSON form.
    Json,
    /// Line-oriented structured text form.
    Text,
}

/// Serialize a document into the given format.
pub fn serialize(
    document: &WorkflowDocument,
    format: DocumentFormat,
) -> Result<String, SerializeError> {
    match format {
        DocumentFormat::Json => Ok(serde_json::to_string_pretty(document)?),
        DocumentFormat::Text => {
            let value = serde_json::to_value(document)?;
            Ok(text::write(&value))
        }
    }
}

/// Parse a document from the given format.
pub fn deserialize(input: &str, format: DocumentFormat) -> Result<WorkflowDocument, ParseError> {
    match format {
        DocumentFormat::Json => serde_json::from_str(input).map_err(ParseError::Json),
        DocumentFormat::Text => {
            let value = text::parse(input)?;
            serde_json::from_value(value).map_err(|e| ParseError::Document(e.to_string()))
        }
    }
}

mod text {
    use super::*;

    /// One significant input line: 1-based number, indent depth, trimmed text.
    struct Line<'a> {
        number: usize,
        depth: usize,
        content: &'a str,
    }

    pub fn write(value: &Value) -> String {
        let mut out = String::new();
        match value {
            Value::Object(map) => write_object(&mut out, map, 0),
            Value::Array(items) => write_array(&mut out, items, 0),
            scalar => {
                out.push_str(&scalar_token(scalar));
                out.push('\n');
            }
        }
        out
    }

    fn pad(out: &mut String, depth: usize) {
        for _ in 0..depth {
            out.push_str("  ");
        }
    }

    fn write_object(out: &mut String, map: &serde_json::Map<String, Value>, depth: usize) {
        for (key, value) in map {
            pad(out, depth);
            out.push_str(&key_token(key));
            match value {
                Value::Object(nested) if !nested.is_empty() => {
                    out.push_str(":\n");
                    write_object(out, nested, depth + 1);
                }
                Value::Array(items) if !items.is_empty() => {
                    out.push_str(":\n");
                    write_array(out, items, depth + 1);
                }
                scalar => {
                    out.push_str(": ");
                    out.push_str(&scalar_token(scalar));
                    out.push('\n');
                }
            }
        }
    }

    fn write_array(out: &mut String, items: &[Value], depth: usize) {
        for item in items {
            pad(out, depth);
            match item {
                Value::Object(nested) if !nested.is_empty() => {
                    out.push_str("-\n");
                    write_object(out, nested, depth + 1);
                }
                Value::Array(inner) if !inner.is_empty() => {
                    out.push_str("-\n");
                    write_array(out, inner, depth + 1);
                }
                scalar => {
                    out.push_str("- ");
                    out.push_str(&scalar_token(scalar));
                    out.push('\n');
                }
            }
        }
    }

    /// Render a scalar (or empty container) as a single-line token.
    fn scalar_token(value: &Value) -> String {
        match value {
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => n.to_string(),
            Value::String(s) => quote(s),
            Value::Object(_) => "{}".to_string(),
            Value::Array(_) => "[]".to_string(),
        }
    }

    /// Bare identifiers stay readable; anything else gets JSON-quoted.
    fn key_token(key: &str) -> String {
        let bare = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if bare {
            key.to_string()
        } else {
            quote(key)
        }
    }

    /// JSON-quote a string without going through a serializer.
    fn quote(s: &str) -> String {
        let mut out = String::with_capacity(s.len() + 2);
        out.push('"');
        for c in s.chars() {
            match c {
                '"' => out.push_str("\\\""),
                '\\' => out.push_str("\\\\"),
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\t' => out.push_str("\\t"),
                c if (c as u32) < 0x20 => {
                    out.push_str(&format!("\\u{:04x}", c as u32));
                }
                c => out.push(c),
            }
        }
        out.push('"');
        out
    }

    pub fn parse(input: &str) -> Result<Value, ParseError> {
        let lines = scan(input)?;
        if lines.is_empty() {
            return Err(ParseError::Syntax {
                line: 1,
                message: "empty document".to_string(),
            });
        }

        let mut pos = 0;
        let value = parse_block(&lines, &mut pos, 0)?;
        if pos < lines.len() {
            return Err(syntax(&lines[pos], "unexpected content after document"));
        }
        Ok(value)
    }

    /// Split the input into significant lines with their indent depth.
    fn scan(input: &str) -> Result<Vec<Line<'_>>, ParseError> {
        let mut lines = Vec::new();
        for (index, raw) in input.lines().enumerate() {
            let number = index + 1;
            if raw.trim().is_empty() {
                continue;
            }
            let rest = raw.trim_start_matches(' ');
            if rest.starts_with('\t') {
                return Err(ParseError::Syntax {
                    line: number,
                    message: "tab indentation is not supported".to_string(),
                });
            }
            if rest.starts_with('#') {
                continue;
            }
            let spaces = raw.len() - rest.len();
            if spaces % 2 != 0 {
                return Err(ParseError::Syntax {
                    line: number,
                    message: format!("indentation of {spaces} spaces is not a multiple of two"),
                });
            }
            lines.push(Line {
                number,
                depth: spaces / 2,
                content: rest.trim_end(),
            });
        }
        Ok(lines)
    }

    fn syntax(line: &Line<'_>, message: impl Into<String>) -> ParseError {
        ParseError::Syntax {
            line: line.number,
            message: message.into(),
        }
    }

    fn is_list_item(content: &str) -> bool {
        content == "-" || content.starts_with("- ")
    }

    fn parse_block(lines: &[Line<'_>], pos: &mut usize, depth: usize) -> Result<Value, ParseError> {
        if is_list_item(lines[*pos].content) {
            parse_array(lines, pos, depth)
        } else {
            parse_object(lines, pos, depth)
        }
    }

    fn parse_array(lines: &[Line<'_>], pos: &mut usize, depth: usize) -> Result<Value, ParseError> {
        let mut items = Vec::new();
        while *pos < lines.len() {
            let line = &lines[*pos];
            if line.depth < depth {
                break;
            }
            if line.depth > depth {
                return Err(syntax(line, "unexpected indentation"));
            }
            if line.content == "-" {
                *pos += 1;
                if *pos < lines.len() && lines[*pos].depth > depth {
                    items.push(parse_block(lines, pos, depth + 1)?);
                } else {
                    items.push(Value::Null);
                }
            } else if let Some(rest) = line.content.strip_prefix("- ") {
                items.push(parse_scalar(rest.trim(), line.number)?);
                *pos += 1;
            } else {
                return Err(syntax(line, "expected a list item"));
            }
        }
        Ok(Value::Array(items))
    }

    fn parse_object(lines: &[Line<'_>], pos: &mut usize, depth: usize) -> Result<Value, ParseError> {
        let mut map = serde_json::Map::new();
        while *pos < lines.len() {
            let line = &lines[*pos];
            if line.depth < depth {
                break;
            }
            if line.depth > depth {
                return Err(syntax(line, "unexpected indentation"));
            }
            if is_list_item(line.content) {
                return Err(syntax(line, "expected 'key: value', found a list item"));
            }
            let (key, rest) = split_key(line)?;
            if rest.is_empty() {
                *pos += 1;
                if *pos < lines.len() && lines[*pos].depth > depth {
                    let value = parse_block(lines, pos, depth + 1)?;
                    map.insert(key, value);
                } else {
                    map.insert(key, Value::Null);
                }
            } else {
                map.insert(key, parse_scalar(rest, line.number)?);
                *pos += 1;
            }
        }
        Ok(Value::Object(map))
    }

    /// Split a `key: value` line into the decoded key and the raw value text.
    fn split_key<'a>(line: &Line<'a>) -> Result<(String, &'a str), ParseError> {
        let content = line.content;
        if let Some(quoted) = content.strip_prefix('"') {
            let mut escaped = false;
            for (offset, c) in quoted.char_indices() {
                if escaped {
                    escaped = false;
                    continue;
                }
                match c {
                    '\\' => escaped = true,
                    '"' => {
                        let end = 1 + offset + c.len_utf8();
                        let key: String = serde_json::from_str(&content[..end])
                            .map_err(|e| syntax(line, format!("malformed quoted key: {e}")))?;
                        let rest = content[end..]
                            .strip_prefix(':')
                            .ok_or_else(|| syntax(line, "expected ':' after key"))?;
                        return Ok((key, rest.trim()));
                    }
                    _ => {}
                }
            }
            Err(syntax(line, "unterminated quoted key"))
        } else {
            let (key, rest) = content
                .split_once(':')
                .ok_or_else(|| syntax(line, "expected ':' after key"))?;
            Ok((key.trim().to_string(), rest.trim()))
        }
    }

    /// Parse a single-line value token.
    ///
    /// Quoted strings and inline containers must be valid JSON; bare words
    /// fall back to plain strings so hand-edited files stay forgiving.
    fn parse_scalar(token: &str, line: usize) -> Result<Value, ParseError> {
        match token.chars().next() {
            Some('"') | Some('{') | Some('[') => {
                serde_json::from_str(token).map_err(|e| ParseError::Syntax {
                    line,
                    message: format!("malformed value: {e}"),
                })
            }
            _ => Ok(serde_json::from_str(token)
                .unwrap_or_else(|_| Value::String(token.to_string()))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::DocumentBuilder;
    use crate::types::{EdgeCondition, EdgeGroup, EdgeGroupKind, ExecutorKind, SwitchCaseArm};

    fn rich_document() -> WorkflowDocument {
        DocumentBuilder::new("wf-serialize")
            .name("Serialization fixture")
            .version("0.3.0")
            .executor(
                "plan",
                ExecutorKind::MagenticAgent {
                    agent_role: "planner".to_string(),
                    capabilities: vec!["planning".to_string()],
                    system_prompt: "Plan carefully.\nUse lists: always.".to_string(),
                    tools: vec![],
                },
            )
            .executor(
                "run",
                ExecutorKind::Function {
                    function_name: "execute_step".to_string(),
                    code: Some("return input".to_string()),
                    parameters: None,
                },
            )
            .executor("review", ExecutorKind::Base)
            .conditional_edge(
                "plan",
                "run",
                EdgeCondition::Predicate {
                    expression: "state.ready == true".to_string(),
                },
            )
            .edge("run", "review")
            .edge_group(EdgeGroup::new(
                "route-1",
                EdgeGroupKind::SwitchCase {
                    source: "review".to_string(),
                    expression: "review.verdict".to_string(),
                    cases: vec![SwitchCaseArm {
                        value: serde_json::json!("approved"),
                        target: "run".to_string(),
                    }],
                    default_target: Some("plan".to_string()),
                },
            ))
            .position("plan", 40.0, 80.0)
            .position("run", 320.0, 80.0)
            .build()
    }

    #[test]
    fn test_json_round_trip() {
        let doc = rich_document();
        let json = serialize(&doc, DocumentFormat::Json).unwrap();
        let restored = deserialize(&json, DocumentFormat::Json).unwrap();
        assert_eq!(restored, doc);
    }

    #[test]
    fn test_text_round_trip() {
        let doc = rich_document();
        let out = serialize(&doc, DocumentFormat::Text).unwrap();
        let restored = deserialize(&out, DocumentFormat::Text).unwrap();
        assert_eq!(restored, doc);
    }

    #[test]
    fn test_text_shape() {
        let doc = rich_document();
        let out = serialize(&doc, DocumentFormat::Text).unwrap();
        assert!(out.contains("id: \"wf-serialize\"\n"));
        assert!(out.contains("executors:\n"));
        assert!(out.lines().any(|l| l.trim() == "-"));
        // Newlines in prompts stay escaped on one line
        assert!(out.contains("\\nUse lists: always."));
    }

    #[test]
    fn test_minimal_json_shape() {
        let input = r#"{"id": "workflow-1", "executors": [], "edges": []}"#;
        let doc = deserialize(input, DocumentFormat::Json).unwrap();
        assert_eq!(doc.id, "workflow-1");
        assert!(doc.edge_groups.is_empty());
    }

    #[test]
    fn test_text_accepts_comments_and_blanks() {
        let input = "# exported workflow\n\nid: \"wf-c\"\nexecutors: []\nedges: []\n";
        let doc = deserialize(input, DocumentFormat::Text).unwrap();
        assert_eq!(doc.id, "wf-c");
    }

    #[test]
    fn test_text_bare_scalar_values() {
        // Hand-edited files may leave ids unquoted
        let input = "id: wf-bare\nexecutors: []\nedges: []\n";
        let doc = deserialize(input, DocumentFormat::Text).unwrap();
        assert_eq!(doc.id, "wf-bare");
    }

    #[test]
    fn test_text_rejects_odd_indentation() {
        let input = "id: \"wf\"\nexecutors:\n   - \"x\"\n";
        let err = deserialize(input, DocumentFormat::Text).unwrap_err();
        match err {
            ParseError::Syntax { line, .. } => assert_eq!(line, 3),
            other => panic!("expected syntax error, got {other:?}"),
        }
    }

    #[test]
    fn test_text_rejects_unterminated_string() {
        let input = "id: \"wf\nexecutors: []\n";
        assert!(matches!(
            deserialize(input, DocumentFormat::Text),
            Err(ParseError::Syntax { line: 1, .. })
        ));
    }

    #[test]
    fn test_json_error_is_parse_error() {
        let err = deserialize("{not json", DocumentFormat::Json).unwrap_err();
        assert!(matches!(err, ParseError::Json(_)));
    }

    #[test]
    fn test_unknown_condition_type_fails_document_mapping() {
        // A condition with an unrecognized discriminant is a broken document,
        // not broken syntax
        let input = r#"{
            "id": "wf-x",
            "executors": [],
            "edges": [{"id": "e", "source": "a", "target": "b",
                       "condition": {"type": "horoscope"}}]
        }"#;
        assert!(deserialize(input, DocumentFormat::Json).is_err());
    }
}
