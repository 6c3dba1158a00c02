mod cli_args;
mod commands;
mod output;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use colored::*;
use std::path::Path;
use std::process;

use cli_args::{Cli, Commands, DiscoveryOpts, GenerateArgs, ProjectConfigOpts};
use walkthrough_core::{AppError, Config};

fn main() {
    let cli_args = Cli::parse();

    setup_logging(cli_args.quiet, cli_args.verbose);

    let quiet = cli_args.quiet;
    log::debug!("CLI args parsed: {:?}", cli_args);

    let exit_code = match run_app(cli_args, quiet) {
        Ok(_) => {
            log::info!("Application finished successfully.");
            0
        }
        Err(e) => {
            let exit_code = exit_code_for(&e);
            // Config and argument errors are always shown, even with -q.
            if !quiet || exit_code == 1 || exit_code == 5 {
                eprintln!("{} {:#}", "Error:".red().bold(), e);
            } else {
                log::error!("Application failed: {:#}", e);
            }
            exit_code
        }
    };
    log::debug!("Exiting with code {}", exit_code);
    process::exit(exit_code);
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<AppError>() {
        Some(AppError::Config(_)) => 1,
        Some(AppError::TomlParse(_)) => 1,
        Some(AppError::TomlSerialize(_)) => 1,
        Some(AppError::Io(_)) => 2,
        Some(AppError::FileRead { .. }) => 2,
        Some(AppError::FileWrite { .. }) => 2,
        Some(AppError::DirCreation { .. }) => 2,
        Some(AppError::Discovery(_)) => 2,
        Some(AppError::Walk(_)) => 2,
        Some(AppError::Glob(_)) => 2,
        Some(AppError::InvalidArgument(_)) => 5,
        Some(AppError::JsonSerialize(_)) => 6,
        Some(AppError::YamlError(_)) => 6,
        Some(AppError::XmlSerialize(_)) => 6,
        Some(_) => 1,
        None => 1,
    }
}

fn setup_logging(quiet: bool, verbose: u8) {
    let log_level = if quiet {
        log::LevelFilter::Off
    } else {
        match verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    };
    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();
    log::trace!("Logger initialized with level: {:?}", log_level);
}

fn run_app(cli: Cli, quiet: bool) -> Result<()> {
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };
    match command {
        Commands::Generate(args) => {
            log::debug!("Executing 'generate' command...");
            commands::generate::handle_generate_command(args, quiet)?;
        }
        Commands::Explain(args) => {
            log::debug!("Executing 'explain' command...");
            commands::explain::handle_explain_command(args)?;
        }
        Commands::Plan(args) => {
            log::debug!("Executing 'plan' command...");
            commands::plan::handle_plan_command(args, quiet)?;
        }
        Commands::Stats(args) => {
            log::debug!("Executing 'stats' command...");
            commands::stats::handle_stats_command(args, quiet)?;
        }
        Commands::Config(args) => {
            log::debug!("Executing 'config' command...");
            commands::config::handle_config_command(args, quiet)?;
        }
    }
    Ok(())
}

fn apply_discovery_overrides(config: &mut Config, opts: &DiscoveryOpts) {
    if !opts.include_ext.is_empty() {
        config.discovery.include_extensions = opts.include_ext.clone();
    }
    config
        .discovery
        .exclude_dirs
        .extend(opts.exclude_dir.iter().cloned());
    config.discovery.exclude.extend(opts.exclude.iter().cloned());
    if opts.gitignore {
        config.discovery.use_gitignore = true;
    }
    if opts.no_gitignore {
        config.discovery.use_gitignore = false;
    }
    if opts.follow_links {
        config.discovery.follow_links = true;
    }
    if opts.skip_hidden {
        config.discovery.include_hidden = false;
    }
}

fn merge_config_with_cli_overrides(mut config: Config, args: &GenerateArgs) -> Config {
    log::trace!("Applying generate command CLI overrides to config...");
    if let Some(format) = &args.format_output.format {
        config.output.format = format.clone();
    }
    if let Some(path) = &args.output {
        config.output.path = Some(path.clone());
    }
    if let Some(title) = &args.title {
        config.general.title = Some(title.clone());
    }
    if let Some(delimiter) = &args.comment_delimiter {
        config.output.comment_delimiter = delimiter.clone();
    }
    if args.exclude_timestamp {
        config.output.include_timestamp = false;
    }
    if args.no_narrative {
        config.narrative.enabled = false;
    }
    log::trace!("Config after CLI overrides: {:?}", config);
    config
}

/// Loads the config file (if any) for `project_root` and layers CLI overrides on top.
pub fn load_config_for_command(
    project_root: &Path,
    project_opts: &ProjectConfigOpts,
    discovery_opts: Option<&DiscoveryOpts>,
    generate_args: Option<&GenerateArgs>,
) -> Result<Config> {
    let config_path = Config::resolve_config_path(
        project_root,
        project_opts.config.as_ref(),
        project_opts.no_config,
    )
    .context("Failed to resolve configuration path")?;

    let mut config = match &config_path {
        Some(path) => Config::load_from_path(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    };

    if let Some(name) = &project_opts.project_name {
        config.general.project_name = Some(name.clone());
    }
    if let Some(opts) = discovery_opts {
        apply_discovery_overrides(&mut config, opts);
    }
    if let Some(gen_args) = generate_args {
        config = merge_config_with_cli_overrides(config, gen_args);
    }

    config.general.project_name = Some(config.get_effective_project_name(project_root));
    Ok(config)
}
