//! Query results and errors → printable strings.
//!
//! Two modes:
//! - **Human** (default): one `key  title` line per record of a result that
//!   no command printed, errors as red `Error: <message>`
//! - **JSON** (`--json`): `serde_json::to_string_pretty` of the result

use colored::Colorize;

use bibliophant_executor::{Error, Outcome, Output};

/// Output formatting mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

/// Format the outcome of a query; empty when there is nothing to print.
pub fn format_outcome(outcome: &Outcome, mode: OutputMode) -> String {
    match (outcome, mode) {
        (Outcome::Exit, _) => String::new(),
        (Outcome::Completed(None), OutputMode::Human) => String::new(),
        (Outcome::Completed(None), OutputMode::Json) => "null".to_string(),
        (Outcome::Completed(Some(output)), OutputMode::Human) => format_human(output),
        (Outcome::Completed(Some(output)), OutputMode::Json) => format_json(output),
    }
}

/// Format an error.
pub fn format_error(err: &Error, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => serde_json::to_string_pretty(&serde_json::json!({
            "error": err.to_string()
        }))
        .unwrap_or_else(|_| format!("{{\"error\": \"{}\"}}", err)),
        OutputMode::Human => format!("{} {}", "Error:".red().bold(), err.to_string().red()),
    }
}

fn format_json(output: &Output) -> String {
    serde_json::to_string_pretty(output).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
}

fn format_human(output: &Output) -> String {
    let records = output.records();
    if records.is_empty() {
        return "(no records)".to_string();
    }
    let width = records.iter().map(|r| r.key.len()).max().unwrap_or(0);
    records
        .iter()
        .map(|r| format!("{:<width$}  {}", r.key, r.title, width = width))
        .collect::<Vec<_>>()
        .join("\n")
}
