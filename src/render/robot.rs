//! Robot-mode output (JSON and Markdown).
//!
//! JSON is the proto-JSON object itself, stable and easy to pipe into `jq`.

use serde::Serialize;
use serde_yaml::Value;

use crate::error::Result;

/// Render a value as JSON, compact or pretty.
pub fn render_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}

/// Render a value as a Markdown section of key/value bullets.
///
/// Goes through `serde_yaml::Value` because its mappings keep field order.
pub fn render_md<T: Serialize>(value: &T, heading: &str) -> Result<String> {
    let tree = serde_yaml::to_value(value)?;
    let mut output = format!("## {heading}\n\n");

    match &tree {
        Value::Mapping(map) => {
            for (key, value) in map {
                push_entry(&mut output, &scalar(key), value, 0);
            }
        }
        Value::Sequence(items) => push_items(&mut output, items, 0),
        other => output.push_str(&format!("- {}\n", scalar(other))),
    }

    Ok(output)
}

fn push_entry(output: &mut String, key: &str, value: &Value, depth: usize) {
    let indent = "  ".repeat(depth);
    match value {
        Value::Mapping(map) if !map.is_empty() => {
            output.push_str(&format!("{indent}- {key}:\n"));
            for (k, v) in map {
                push_entry(output, &scalar(k), v, depth + 1);
            }
        }
        Value::Sequence(items) if !items.is_empty() => {
            output.push_str(&format!("{indent}- {key}:\n"));
            push_items(output, items, depth + 1);
        }
        Value::Sequence(_) => output.push_str(&format!("{indent}- {key}: (none)\n")),
        other => output.push_str(&format!("{indent}- {key}: {}\n", scalar(other))),
    }
}

fn push_items(output: &mut String, items: &[Value], depth: usize) {
    let indent = "  ".repeat(depth);
    for (i, item) in items.iter().enumerate() {
        match item {
            Value::Mapping(map) => {
                output.push_str(&format!("{indent}- [{i}]\n"));
                for (k, v) in map {
                    push_entry(output, &scalar(k), v, depth + 1);
                }
            }
            Value::Sequence(inner) => {
                output.push_str(&format!("{indent}- [{i}]\n"));
                push_items(output, inner, depth + 1);
            }
            other => output.push_str(&format!("{indent}- {}\n", scalar(other))),
        }
    }
}

fn scalar(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Mapping(map) if map.is_empty() => "{}".to_string(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}
