use anyhow::{Context, Result};
use byte_unit::{Byte, UnitType};
use serde::Serialize;
use std::collections::BTreeMap;
use walkthrough_core::{Config, Walkthrough, discover_files, group_files};

use crate::cli_args::StatsArgs;
use crate::load_config_for_command;
use crate::output::{print_data_or_text, print_stats_pretty_table, print_warnings};

#[derive(Debug, Serialize)]
pub struct StatsReport {
    pub total_files: usize,
    pub total_lines: usize,
    pub total_bytes: u64,
    pub total_bytes_readable: String,
    pub unreadable_files: usize,
    pub projects: Vec<ProjectStats>,
    /// Lines matched per rule, keyed by rule name.
    pub rule_histogram: BTreeMap<String, usize>,
}

#[derive(Debug, Serialize)]
pub struct ProjectStats {
    pub name: String,
    pub files: usize,
    pub lines: usize,
    pub bytes: u64,
    pub bytes_readable: String,
}

pub fn handle_stats_command(args: StatsArgs, quiet: bool) -> Result<()> {
    let project_root = Config::determine_project_root(args.project_config.root_override())
        .context("Failed to determine project root")?;
    log::info!("Project root determined: {}", project_root.display());

    let mut config = load_config_for_command(
        &project_root,
        &args.project_config,
        Some(&args.discovery),
        None,
    )
    .context("Failed to load configuration for stats command")?;
    config.output.include_timestamp = false;
    config.narrative.enabled = false;

    let discovery = discover_files(&project_root, &config.discovery)
        .context("Failed to discover files for stats")?;
    print_warnings(
        "Errors encountered during discovery",
        &discovery.warnings,
        quiet,
    );

    let doc = Walkthrough::build(&project_root, &config, &group_files(&discovery.files));
    let report = calculate_stats(&doc);

    match args.format_output.format.as_deref() {
        None | Some("text") => {
            print_stats_pretty_table(&report);
            Ok(())
        }
        Some(_) => print_data_or_text(&report, String::new, &args.format_output),
    }
}

fn readable(bytes: u64) -> String {
    Byte::from_u64(bytes)
        .get_appropriate_unit(UnitType::Binary)
        .to_string()
}

fn calculate_stats(doc: &Walkthrough) -> StatsReport {
    let mut rule_histogram = BTreeMap::new();
    let projects: Vec<ProjectStats> = doc
        .projects
        .iter()
        .map(|project| {
            let mut stats = ProjectStats {
                name: project.name.clone(),
                files: 0,
                lines: 0,
                bytes: 0,
                bytes_readable: String::new(),
            };
            for file in project.files() {
                stats.files += 1;
                stats.lines += file.lines.len();
                stats.bytes = stats.bytes.saturating_add(file.size);
                for line in &file.lines {
                    *rule_histogram.entry(line.rule.to_string()).or_insert(0) += 1;
                }
            }
            stats.bytes_readable = readable(stats.bytes);
            stats
        })
        .collect();

    let total_bytes = projects.iter().map(|p| p.bytes).sum();
    StatsReport {
        total_files: projects.iter().map(|p| p.files).sum(),
        total_lines: projects.iter().map(|p| p.lines).sum(),
        total_bytes,
        total_bytes_readable: readable(total_bytes),
        unreadable_files: doc.unreadable_files().count(),
        projects,
        rule_histogram,
    }
}
