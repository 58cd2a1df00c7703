//! JSON output formatting for machine-readable output.

use super::OutputConfig;
use serde::Serialize;

/// JSON output formatter
pub struct JsonOutput;

impl JsonOutput {
    /// Format data as JSON string
    ///
    /// Pretty-printed unless `config.compact` is set.
    pub fn format<T: Serialize + ?Sized>(data: &T, config: &OutputConfig) -> String {
        if config.compact {
            serde_json::to_string(data).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
        } else {
            serde_json::to_string_pretty(data)
                .unwrap_or_else(|e| format!("{{\n  \"error\": \"{}\"\n}}", e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;

    #[derive(Serialize)]
    struct Example {
        dialect: String,
        start_line: u32,
    }

    #[test]
    fn test_format_pretty() {
        let data = Example {
            dialect: "python".to_string(),
            start_line: 12,
        };
        let output = JsonOutput::format(&data, &OutputConfig::new(OutputFormat::Json));

        assert!(output.contains("\"dialect\": \"python\""));
        assert!(output.contains("12"));
        assert!(output.contains('\n'));
    }

    #[test]
    fn test_format_compact() {
        let data = vec![
            Example {
                dialect: "go".to_string(),
                start_line: 1,
            },
            Example {
                dialect: "shell".to_string(),
                start_line: 9,
            },
        ];
        let config = OutputConfig::new(OutputFormat::Json).compact();
        let output = JsonOutput::format(&data, &config);

        assert!(output.starts_with('['));
        assert!(!output.contains('\n'));
    }
}
