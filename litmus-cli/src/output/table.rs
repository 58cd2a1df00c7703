//! Table output formatting using the `tabled` crate
//!
//! Column widths follow the terminal width; long cells are truncated when
//! writing to a TTY.

use super::{truncate, Alignment, Column, OutputConfig};
use serde::Serialize;
use tabled::{
    builder::Builder,
    settings::{object::Columns, style::Style, Alignment as TabledAlignment, Modify, Width},
    Table,
};

/// Table output formatter
pub struct TableOutput;

impl TableOutput {
    /// Format serializable rows as a table with the given columns
    pub fn format_with_columns<T: Serialize>(
        data: &[T],
        columns: &[Column],
        config: &OutputConfig,
    ) -> String {
        if data.is_empty() {
            return "(no results)".to_string();
        }

        let mut builder = Builder::default();
        builder.push_record(columns.iter().map(|c| c.name.as_str()));

        for item in data {
            let json = serde_json::to_value(item).unwrap_or_default();
            let row: Vec<String> = columns
                .iter()
                .map(|col| {
                    let value = json.get(&col.key).cloned().unwrap_or_default();
                    Self::format_value(&value, col, config)
                })
                .collect();
            builder.push_record(row);
        }

        let mut table = builder.build();
        Self::apply_style(&mut table, config);

        for (i, col) in columns.iter().enumerate() {
            let alignment = match col.align {
                Alignment::Left => TabledAlignment::left(),
                Alignment::Right => TabledAlignment::right(),
            };
            table.with(Modify::new(Columns::single(i)).with(alignment));
        }

        if config.should_truncate() {
            table.with(Width::wrap(config.effective_width()));
        }

        table.to_string()
    }

    /// Create a simple table from rows of strings
    pub fn from_rows(headers: &[&str], rows: &[Vec<String>], config: &OutputConfig) -> String {
        if rows.is_empty() {
            return "(no results)".to_string();
        }

        let mut builder = Builder::default();
        builder.push_record(headers.iter().copied());
        for row in rows {
            builder.push_record(row.iter().map(|s| s.as_str()));
        }

        let mut table = builder.build();
        Self::apply_style(&mut table, config);

        if config.should_truncate() {
            table.with(Width::wrap(config.effective_width()));
        }

        table.to_string()
    }

    fn apply_style(table: &mut Table, config: &OutputConfig) {
        if config.compact {
            table.with(Style::blank());
        } else {
            table.with(Style::rounded());
        }
    }

    /// Format a single JSON value for display
    fn format_value(value: &serde_json::Value, col: &Column, config: &OutputConfig) -> String {
        let s = Self::value_to_string(value);
        match col.max_width {
            Some(max_width) if config.should_truncate() => truncate(&s, max_width),
            _ => s,
        }
    }

    /// Convert a JSON value to a display string
    fn value_to_string(value: &serde_json::Value) -> String {
        match value {
            serde_json::Value::Null => "-".to_string(),
            serde_json::Value::Bool(true) => "yes".to_string(),
            serde_json::Value::Bool(false) => "no".to_string(),
            serde_json::Value::Number(n) => n.to_string(),
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Array(arr) => arr
                .iter()
                .map(Self::value_to_string)
                .collect::<Vec<_>>()
                .join(" "),
            serde_json::Value::Object(obj) => format!("{{{} fields}}", obj.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;

    #[derive(Serialize)]
    struct Row {
        name: String,
        extensions: Vec<String>,
        nested: bool,
        count: usize,
    }

    #[test]
    fn test_format_with_columns() {
        let data = vec![Row {
            name: "rust".to_string(),
            extensions: vec!["rs".to_string()],
            nested: true,
            count: 3,
        }];
        let columns = vec![
            Column::new("Host", "name"),
            Column::new("Extensions", "extensions"),
            Column::new("Nested", "nested"),
            Column::new("Count", "count").with_alignment(Alignment::Right),
        ];
        let config = OutputConfig::new(OutputFormat::Table).without_truncation();
        let output = TableOutput::format_with_columns(&data, &columns, &config);

        assert!(output.contains("Host"));
        assert!(output.contains("rust"));
        assert!(output.contains("rs"));
        assert!(output.contains("yes"));
        assert!(output.contains('3'));
    }

    #[test]
    fn test_truncated_column() {
        let data = vec![Row {
            name: "a-very-long-host-language-name".to_string(),
            extensions: vec![],
            nested: false,
            count: 0,
        }];
        let columns = vec![Column::new("Host", "name").with_max_width(10)];
        let config = OutputConfig {
            width: Some(200),
            ..OutputConfig::new(OutputFormat::Table)
        };
        let output = TableOutput::format_with_columns(&data, &columns, &config);

        assert!(output.contains("a-very-..."));
    }

    #[test]
    fn test_empty_data() {
        let data: Vec<Row> = vec![];
        let columns = vec![Column::new("Host", "name")];
        let config = OutputConfig::new(OutputFormat::Table);
        assert_eq!(
            TableOutput::format_with_columns(&data, &columns, &config),
            "(no results)"
        );
    }

    #[test]
    fn test_from_rows() {
        let rows = vec![
            vec!["lib.go".to_string(), "3-4".to_string()],
            vec!["calc.py".to_string(), "10".to_string()],
        ];
        let config = OutputConfig::new(OutputFormat::Table).compact();
        let output = TableOutput::from_rows(&["File", "Lines"], &rows, &config);

        assert!(output.contains("File"));
        assert!(output.contains("calc.py"));
        assert!(output.contains("3-4"));
    }
}
