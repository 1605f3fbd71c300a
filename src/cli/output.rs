//! Output formatting for CLI commands.

use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Table};
use serde::Serialize;

/// Output mode for CLI commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
    Markdown,
}

impl OutputMode {
    pub fn from_flags(json: bool, md: bool) -> Self {
        if json {
            OutputMode::Json
        } else if md {
            OutputMode::Markdown
        } else {
            OutputMode::Human
        }
    }
}

/// Print a single item as pretty-printed JSON.
pub fn output_json<T: Serialize + ?Sized>(item: &T) {
    match serde_json::to_string_pretty(item) {
        Ok(json) => println!("{}", json),
        Err(e) => print_error(&format!("Failed to serialize to JSON: {}", e)),
    }
}

/// Render rows in the table style of `mode`. JSON callers should use
/// [`output_json`] instead.
pub fn print_rows(mode: OutputMode, headers: &[&str], rows: Vec<Vec<String>>) {
    match mode {
        OutputMode::Markdown => print!("{}", markdown_table(headers, &rows)),
        _ => print_table(headers, rows),
    }
}

/// Print a formatted table with headers and rows.
pub fn print_table(headers: &[&str], rows: Vec<Vec<String>>) {
    if rows.is_empty() {
        println!("{}", "No results found.".dimmed());
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(headers);

    for row in rows {
        table.add_row(row);
    }

    println!("{table}");
}

/// GitHub-flavoured table. Pipes inside cells are escaped.
pub fn markdown_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let escape = |s: &str| s.replace('|', "\\|");
    let mut out = String::new();
    out.push_str(&format!(
        "| {} |\n",
        headers.iter().map(|h| escape(h)).collect::<Vec<_>>().join(" | ")
    ));
    out.push_str(&format!(
        "|{}\n",
        headers.iter().map(|_| "---|").collect::<String>()
    ));
    for row in rows {
        out.push_str(&format!(
            "| {} |\n",
            row.iter().map(|c| escape(c)).collect::<Vec<_>>().join(" | ")
        ));
    }
    out
}

/// Print an error message to stderr.
pub fn print_error(msg: &str) {
    eprintln!("{} {}", "Error:".red().bold(), msg);
}

/// Print a bold section header.
pub fn print_header(mode: OutputMode, title: &str) {
    match mode {
        OutputMode::Markdown => println!("\n## {}\n", title),
        _ => println!("\n{}\n", title.bold()),
    }
}

/// Print a key-value pair line.
pub fn print_kv(key: &str, value: &str) {
    println!("  {}: {}", key.dimmed(), value);
}

/// Print a dimmed hint/suggestion message.
pub fn print_hint(msg: &str) {
    println!("{}", msg.dimmed());
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_markdown_table() {
        let rendered = markdown_table(
            &["Name", "Count"],
            &[vec!["Luffy".into(), "3".into()], vec!["a|b".into(), "1".into()]],
        );
        assert_eq!(
            rendered,
            "| Name | Count |\n|---|---|\n| Luffy | 3 |\n| a\\|b | 1 |\n"
        );
    }

    #[test]
    fn test_mode_flags() {
        assert_eq!(OutputMode::from_flags(true, true), OutputMode::Json);
        assert_eq!(OutputMode::from_flags(false, true), OutputMode::Markdown);
        assert_eq!(OutputMode::from_flags(false, false), OutputMode::Human);
    }
}
