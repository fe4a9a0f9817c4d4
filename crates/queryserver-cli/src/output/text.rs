//! Human-readable report formatting.

use is_terminal::IsTerminal;
use owo_colors::OwoColorize;
use std::fmt::Write;

use super::MetaReport;

/// Format the report as text with optional colors.
pub fn format_text(report: &MetaReport, use_colors: bool) -> String {
    let colored = use_colors && std::io::stdout().is_terminal();
    let mut out = String::new();

    write_header(&mut out, colored);

    let variant = report.variant.to_string();
    if colored {
        writeln!(out, "Provider:   {}", variant.green()).unwrap();
    } else {
        writeln!(out, "Provider:   {variant}").unwrap();
    }
    writeln!(out, "Factory:    {}", report.factory).unwrap();
    writeln!(out, "URL:        {}", report.url).unwrap();

    writeln!(out).unwrap();
    if report.properties.is_empty() {
        writeln!(out, "Properties: (none)").unwrap();
    } else {
        writeln!(out, "Properties:").unwrap();
        let width = report.properties.keys().map(String::len).max().unwrap_or(0);
        for (key, value) in &report.properties {
            if colored {
                writeln!(out, "  {:width$}  {}", key.cyan(), value).unwrap();
            } else {
                writeln!(out, "  {key:width$}  {value}").unwrap();
            }
        }
    }

    out
}

fn write_header(out: &mut String, colored: bool) {
    let title = "Query Server Metadata Provider";
    let line = "═".repeat(50);

    if colored {
        writeln!(out, "{}", title.bold()).unwrap();
        writeln!(out, "{}", line.dimmed()).unwrap();
    } else {
        writeln!(out, "{title}").unwrap();
        writeln!(out, "{line}").unwrap();
    }
}
