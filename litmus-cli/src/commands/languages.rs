//! Languages command - show the host languages and their comment rules

use crate::output::{Output, OutputConfig, Outputter, TableOutput};
use anyhow::Result;
use litmus_core::{HostLanguage, HostTable};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HostList {
    pub hosts: Vec<HostLanguage>,
}

fn describe(host: &HostLanguage) -> Vec<String> {
    let blocks: Vec<String> = host
        .block_comments
        .iter()
        .map(|b| format!("{} {}", b.open, b.close))
        .collect();

    let mut notes = Vec::new();
    if host.whole_file {
        notes.push("whole file".to_string());
    }
    if !host.ignored_line_comments.is_empty() {
        notes.push(format!("skips {}", host.ignored_line_comments.join(" ")));
    }
    if host.nested_blocks {
        notes.push("nested".to_string());
    }
    if !host.fences.is_empty() {
        notes.push(format!("fences {}", host.fences.join(" ")));
    }
    if let Some(deco) = host.decoration {
        notes.push(format!("strips {}", deco));
    }

    vec![
        host.name.clone(),
        host.extensions.join(" "),
        host.line_comments.join(" "),
        blocks.join(", "),
        notes.join(", "),
    ]
}

impl Outputter for HostList {
    fn to_table(&self, config: &OutputConfig) -> String {
        let rows: Vec<Vec<String>> = self.hosts.iter().map(describe).collect();
        TableOutput::from_rows(
            &["Host", "Extensions", "Line", "Block", "Notes"],
            &rows,
            config,
        )
    }
}

pub fn run(output: OutputConfig) -> Result<()> {
    let list = HostList {
        hosts: HostTable::builtin().iter().cloned().collect(),
    };
    Output::new(list, output).render()
}
