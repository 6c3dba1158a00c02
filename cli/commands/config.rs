use anyhow::{Context, Result};
use colored::*;
use walkthrough_core::{AppError, Config, write_document};

use crate::cli_args::ConfigArgs;
use crate::output::write_to_stdout;

pub fn handle_config_command(args: ConfigArgs, quiet: bool) -> Result<()> {
    let content = Config::default()
        .to_toml_string()
        .context("Failed to serialize default configuration")?;

    if !args.save {
        return write_to_stdout(&content);
    }

    let project_root = Config::determine_project_root(args.project_config.root_override())
        .context("Failed to determine project root for config command")?;
    let save_path = Config::default_config_path(&project_root);

    if save_path.exists() && !args.force {
        anyhow::bail!(AppError::InvalidArgument(format!(
            "Config file '{}' already exists. Use --force to overwrite it.",
            save_path.display()
        )));
    }

    write_document(&save_path, &content)
        .with_context(|| format!("Failed to save config to {}", save_path.display()))?;
    if !quiet {
        println!(
            "{} Default configuration saved to: {}",
            "✅".green(),
            save_path.display().to_string().blue()
        );
    }
    Ok(())
}
