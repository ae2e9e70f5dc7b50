// Output formatting for CLI

use anyhow::Result;
use serde::Serialize;
use serde_json::Value;
use std::io::Write;

use super::config::OutputFormat;

/// Format and output reports
pub struct OutputFormatter {
    format: OutputFormat,
    quiet: bool,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat, quiet: bool) -> Self {
        Self { format, quiet }
    }

    /// Write one report in the configured format
    pub fn output<T: Serialize>(&self, report: &T, writer: &mut dyn Write) -> Result<()> {
        let value = serde_json::to_value(report)?;
        match self.format {
            OutputFormat::Pretty => {
                writeln!(writer, "{}", serde_json::to_string_pretty(&value)?)?;
            }
            OutputFormat::Json => {
                writeln!(writer, "{}", serde_json::to_string(&value)?)?;
            }
            OutputFormat::KeyValue => {
                let mut lines = Vec::new();
                flatten("", &value, &mut lines);
                for (key, value) in lines {
                    writeln!(writer, "{}: {}", key, value)?;
                }
                writeln!(writer)?;
            }
        }
        Ok(())
    }

    /// Print success message
    pub fn print_success(&self, message: &str) {
        if !self.quiet {
            eprintln!("✓ {}", message);
        }
    }

    /// Print error message
    pub fn print_error(&self, message: &str) {
        eprintln!("✗ {}", message);
    }

    /// Print info message
    pub fn print_info(&self, message: &str) {
        if !self.quiet {
            eprintln!("  {}", message);
        }
    }
}

/// Nested objects become dotted keys, arrays get an index segment.
/// Nulls are left out.
fn flatten(prefix: &str, value: &Value, out: &mut Vec<(String, String)>) {
    let join = |key: &str| {
        if prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", prefix, key)
        }
    };
    match value {
        Value::Object(map) => {
            for (key, value) in map {
                flatten(&join(key), value, out);
            }
        }
        Value::Array(items) if !items.is_empty() => {
            for (index, value) in items.iter().enumerate() {
                flatten(&join(&index.to_string()), value, out);
            }
        }
        Value::Array(_) => out.push((prefix.to_string(), "[]".to_string())),
        Value::Null => {}
        Value::String(s) => out.push((prefix.to_string(), s.clone())),
        other => out.push((prefix.to_string(), other.to_string())),
    }
}
