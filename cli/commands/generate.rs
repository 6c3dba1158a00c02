use anyhow::{Context, Result};
use std::env;
use std::path::{Path, PathBuf};
use walkthrough_core::{
    self as core, Config, OutputFormat, SourceFile, Walkthrough, discover_files, group_files,
};

use crate::cli_args::GenerateArgs;
use crate::load_config_for_command;
use crate::output;

pub fn handle_generate_command(args: GenerateArgs, quiet: bool) -> Result<()> {
    let project_root = Config::determine_project_root(args.project_config.root_override())
        .context("Failed to determine project root")?;
    log::info!("Project root determined: {}", project_root.display());

    let config = load_config_for_command(
        &project_root,
        &args.project_config,
        Some(&args.discovery),
        Some(&args),
    )
    .context("Failed to load configuration")?;

    let format: OutputFormat = config
        .output
        .format
        .parse()
        .context("Invalid output format in configuration")?;

    let output_path = if args.stdout {
        None
    } else {
        Some(resolve_output_path(&config, &project_root, format)?)
    };

    log::debug!("Discovering files...");
    let mut discovery = discover_files(&project_root, &config.discovery)
        .context("Failed to discover project files")?;
    if let Some(path) = &output_path {
        exclude_output_file(&mut discovery.files, path);
    }
    output::print_warnings(
        "Errors encountered during discovery",
        &discovery.warnings,
        quiet,
    );

    let groups = group_files(&discovery.files);
    let doc = Walkthrough::build(&project_root, &config, &groups);

    let unreadable: Vec<String> = doc
        .unreadable_files()
        .map(|f| format!("{}: {}", f.path, f.error.as_deref().unwrap_or_default()))
        .collect();
    output::print_warnings("Errors encountered during file reading", &unreadable, quiet);

    let content = core::render(&doc, format, &config.output.comment_delimiter)
        .context("Failed to render walkthrough")?;

    match output_path {
        Some(path) => {
            core::write_document(&path, &content)
                .with_context(|| format!("Failed to write walkthrough to {}", path.display()))?;
            output::print_saved(&path, doc.file_count(), doc.line_count(), quiet);
        }
        None => output::write_to_stdout(&content)?,
    }
    Ok(())
}

/// `output.path` (relative to the current dir), else `<cwd>/<project>_Walkthrough.<ext>`.
fn resolve_output_path(
    config: &Config,
    project_root: &Path,
    format: OutputFormat,
) -> Result<PathBuf> {
    let cwd = env::current_dir().context("Failed to determine current directory")?;
    let path = match &config.output.path {
        Some(path) if path.is_absolute() => path.clone(),
        Some(path) => cwd.join(path),
        None => {
            let name = config.get_effective_project_name(project_root);
            cwd.join(format!("{}_Walkthrough.{}", name, format.extension()))
        }
    };
    log::debug!("Output path resolved: {}", path.display());
    Ok(path)
}

// A previous run's document inside the root must not annotate itself.
fn exclude_output_file(files: &mut Vec<SourceFile>, output_path: &Path) {
    let target = output_path
        .canonicalize()
        .unwrap_or_else(|_| output_path.to_path_buf());
    let before = files.len();
    files.retain(|f| f.path != target);
    if files.len() != before {
        log::debug!("Skipping output file {}", target.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;
    use walkthrough_core::Category;

    #[test]
    fn default_output_name_uses_project_and_extension() {
        let mut config = Config::default();
        config.general.project_name = Some("Auto-Insurance".into());
        let path =
            resolve_output_path(&config, Path::new("/repo"), OutputFormat::Markdown).unwrap();
        assert!(path.ends_with("Auto-Insurance_Walkthrough.md"));
        assert!(path.is_absolute());
    }

    #[test]
    fn configured_absolute_path_is_kept() {
        let mut config = Config::default();
        config.output.path = Some(PathBuf::from("/tmp/out/doc.json"));
        let path = resolve_output_path(&config, Path::new("/repo"), OutputFormat::Json).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/out/doc.json"));
    }

    #[test]
    fn output_file_is_not_annotated() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().canonicalize().unwrap();
        let doc_path = root.join("report.json");
        fs::write(&doc_path, "{}").unwrap();
        let mut files = vec![SourceFile {
            path: doc_path.clone(),
            relative_path: PathBuf::from("report.json"),
            extension: "json".into(),
            category: Category::StructuredConfig,
        }];
        exclude_output_file(&mut files, &doc_path);
        assert!(files.is_empty());
    }
}
