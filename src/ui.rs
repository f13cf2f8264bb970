use anyhow::Result;
use serde_json::Value;

use crate::cli::OutputFormat;

pub fn warn(message: &str) {
    eprintln!("WARNING: {}", message);
}

pub fn fatal(message: &str) {
    eprintln!("FATAL: {}", message);
}

pub fn format_for_display(content: &Value, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(content)?),
        OutputFormat::Text => {
            let mut out = String::new();
            write_text(&mut out, content, 0);
            Ok(out.trim_end().to_string())
        }
    }
}

pub fn output(content: &Value, format: OutputFormat) -> Result<()> {
    println!("{}", format_for_display(content, format)?);
    Ok(())
}

fn write_text(out: &mut String, value: &Value, indent: usize) {
    let pad = "  ".repeat(indent);
    match value {
        Value::Object(map) => {
            for (key, value) in map {
                if is_scalar(value) {
                    out.push_str(&format!("{}{}: {}\n", pad, key, scalar_text(value)));
                } else {
                    out.push_str(&format!("{}{}:\n", pad, key));
                    write_text(out, value, indent + 1);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                if is_scalar(item) {
                    out.push_str(&format!("{}{}\n", pad, scalar_text(item)));
                } else {
                    write_text(out, item, indent);
                }
            }
        }
        scalar => out.push_str(&format!("{}{}\n", pad, scalar_text(scalar))),
    }
}

fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Object(_) | Value::Array(_))
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_is_pretty() {
        let out = format_for_display(&json!({"id": "alice"}), OutputFormat::Json).unwrap();
        assert_eq!(out, "{\n  \"id\": \"alice\"\n}");
    }

    #[test]
    fn test_text_nests_mappings() {
        let content = json!({
            "id": "alice",
            "groups": ["admin", "ops"],
            "ssh": {"port": 22}
        });
        let out = format_for_display(&content, OutputFormat::Text).unwrap();
        assert!(out.contains("id: alice\n"));
        assert!(out.contains("groups:\n  admin\n  ops\n"));
        assert!(out.contains("ssh:\n  port: 22"));
    }
}
