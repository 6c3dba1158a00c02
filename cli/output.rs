use anyhow::{Context, Result};
use colored::*;
use comfy_table::{Cell, CellAlignment, Color, ContentArrangement, Table, presets::UTF8_FULL};
use serde::Serialize;
use std::fmt::Display;
use std::io::{self, Write};
use std::path::Path;
use walkthrough_core::render;

use crate::cli_args::DataFormatOpts;
use crate::commands::stats::StatsReport;

/// Prints `plain_text` for the text format, otherwise `data` as JSON or YAML.
pub fn print_data_or_text<T: Serialize>(
    data: &T,
    plain_text: impl FnOnce() -> String,
    format_opts: &DataFormatOpts,
) -> Result<()> {
    let format = format_opts
        .format
        .as_deref()
        .unwrap_or("text")
        .to_lowercase();
    let content = match format.as_str() {
        "json" => render::serialize_to_json(data, true)?,
        "yaml" | "yml" => render::serialize_to_yaml(data)?,
        _ => plain_text(),
    };
    write_to_stdout(&content)
}

pub fn write_to_stdout(content: &str) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(content.as_bytes())
        .context("Failed to write to stdout")?;
    if !content.ends_with('\n') {
        handle
            .write_all(b"\n")
            .context("Failed to write newline to stdout")?;
    }
    handle.flush().context("Failed to flush stdout")?;
    Ok(())
}

pub fn print_warnings<W: Display>(title: &str, warnings: &[W], quiet: bool) {
    if warnings.is_empty() || quiet {
        return;
    }
    eprintln!("\n{}", format!("⚠️ Warning: {}:", title).yellow());
    for warning in warnings {
        eprintln!(" - {}", warning);
    }
    eprintln!("---");
}

pub fn print_saved(path: &Path, files: usize, lines: usize, quiet: bool) {
    if quiet {
        return;
    }
    println!(
        "{} Walkthrough saved to: {} ({} files, {} lines)",
        "✅".green(),
        path.display().to_string().blue(),
        files,
        lines
    );
}

pub fn print_stats_pretty_table(report: &StatsReport) {
    println!();
    println!("{}", " Walkthrough Statistics ".green().bold().underline());
    println!(
        "{:<20} {}",
        "Total Files:".green(),
        report.total_files.to_string().cyan()
    );
    println!(
        "{:<20} {}",
        "Total Lines:".green(),
        report.total_lines.to_string().cyan()
    );
    println!(
        "{:<20} {}",
        "Total Size:".green(),
        report.total_bytes_readable.cyan()
    );
    if report.unreadable_files > 0 {
        println!(
            "{:<20} {}",
            "Unreadable Files:".yellow(),
            report.unreadable_files.to_string().yellow()
        );
    }

    if report.projects.is_empty() {
        println!("\n{}", "(No files matched the discovery settings)".yellow());
        println!();
        return;
    }

    println!("\n{}", " Projects ".green().bold().underline());
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Project").fg(Color::Green),
        Cell::new("Files").fg(Color::Green),
        Cell::new("Lines").fg(Color::Green),
        Cell::new("Size").fg(Color::Green),
    ]);
    for project in &report.projects {
        table.add_row(vec![
            Cell::new(&project.name).fg(Color::Cyan),
            Cell::new(project.files).set_alignment(CellAlignment::Right),
            Cell::new(project.lines).set_alignment(CellAlignment::Right),
            Cell::new(&project.bytes_readable)
                .set_alignment(CellAlignment::Right)
                .fg(Color::DarkGrey),
        ]);
    }
    println!("{table}");

    println!("\n{}", " Rule Matches ".green().bold().underline());
    let mut rules = Table::new();
    rules
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    rules.set_header(vec![
        Cell::new("Rule").fg(Color::Green),
        Cell::new("Lines").fg(Color::Green),
        Cell::new("Share").fg(Color::Green),
    ]);
    for (rule, count) in &report.rule_histogram {
        let share = if report.total_lines == 0 {
            0.0
        } else {
            *count as f64 * 100.0 / report.total_lines as f64
        };
        rules.add_row(vec![
            Cell::new(rule).fg(Color::Cyan),
            Cell::new(count).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.1}%", share)).set_alignment(CellAlignment::Right),
        ]);
    }
    println!("{rules}");
    println!();
}
