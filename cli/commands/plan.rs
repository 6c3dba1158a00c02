use anyhow::{Context, Result};
use colored::*;
use serde::Serialize;
use std::fmt::Write as _;
use walkthrough_core::{Config, ProjectGroup, discover_files, group_files};

use crate::cli_args::PlanArgs;
use crate::load_config_for_command;
use crate::output::{print_data_or_text, print_warnings};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PlanInfo<'a> {
    project_root: String,
    effective_config: &'a Config,
    total_files: usize,
    projects: &'a [ProjectGroup],
}

pub fn handle_plan_command(args: PlanArgs, quiet: bool) -> Result<()> {
    let project_root = Config::determine_project_root(args.project_config.root_override())
        .context("Failed to determine project root")?;
    log::info!("Project root determined: {}", project_root.display());

    let config = load_config_for_command(
        &project_root,
        &args.project_config,
        Some(&args.discovery),
        None,
    )
    .context("Failed to load configuration for plan command")?;

    let discovery = discover_files(&project_root, &config.discovery)
        .context("Failed to discover files for plan")?;
    print_warnings(
        "Errors encountered during discovery",
        &discovery.warnings,
        quiet,
    );
    let groups = group_files(&discovery.files);

    let plan = PlanInfo {
        project_root: project_root.display().to_string(),
        effective_config: &config,
        total_files: discovery.files.len(),
        projects: &groups,
    };

    let config_toml = config
        .to_toml_string()
        .context("Failed to serialize effective config to TOML")?;
    print_data_or_text(&plan, || format_plan_pretty(&plan, &config_toml), &args.format_output)
}

fn format_plan_pretty(plan: &PlanInfo, config_toml: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}",
        "\n--- Effective Configuration ---".green().bold().underline()
    );
    let _ = writeln!(out, "{}", config_toml);

    let _ = writeln!(
        out,
        "{}",
        format!("--- Traversal Plan ({} files) ---", plan.total_files)
            .green()
            .bold()
            .underline()
    );
    if plan.projects.is_empty() {
        let _ = writeln!(out, "{}", "(None)".dimmed());
    }
    for project in plan.projects {
        let _ = writeln!(out, "{} {}", "Project:".bold(), project.name.blue());
        for folder in &project.folders {
            let _ = writeln!(out, "  {} {}", "Folder:".bold(), folder.name.cyan());
            for file in &folder.files {
                let _ = writeln!(
                    out,
                    "    - {} {}",
                    file.display_path(),
                    format!("({})", file.category).dimmed()
                );
            }
        }
    }
    let _ = write!(out, "{}", "\n--- End Plan ---".green().bold());
    out
}
