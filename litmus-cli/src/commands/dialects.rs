//! Dialects command - show the prompt conventions litmus looks for

use crate::config::LitmusConfig;
use crate::output::{Column, Output, OutputConfig, Outputter, TableOutput};
use anyhow::{Context, Result};
use litmus_core::Dialect;
use serde::Serialize;

/// The active dialect registry, in registration order.
#[derive(Debug, Serialize)]
pub struct DialectList {
    pub dialects: Vec<Dialect>,
}

impl Outputter for DialectList {
    fn to_table(&self, config: &OutputConfig) -> String {
        let columns = vec![
            Column::new("Name", "name"),
            Column::new("Language", "language"),
            Column::new("Start", "start_prompt"),
            Column::new("Continuation", "continuation_prompt"),
            Column::new("Output ends at", "output_boundary"),
            Column::new("Options after", "option_comment"),
        ];
        TableOutput::format_with_columns(&self.dialects, &columns, config)
    }
}

pub fn run(selected: &[String], config: &LitmusConfig, output: OutputConfig) -> Result<()> {
    let registry = config
        .build_registry(selected)
        .context("Invalid dialect selection")?;
    let list = DialectList {
        dialects: registry.iter().map(|d| d.as_ref().clone()).collect(),
    };
    Output::new(list, output).render()
}
