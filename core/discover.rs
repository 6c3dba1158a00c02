use crate::category::Category;
use crate::config::DiscoveryConfig;
use crate::error::{AppError, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::{DirEntry, WalkBuilder};
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

pub const ROOT_FOLDER: &str = ".";

/// A file selected for the walkthrough. Immutable once discovered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceFile {
    #[serde(skip)]
    pub path: PathBuf,
    pub relative_path: PathBuf,
    /// Lowercase, without the leading dot.
    pub extension: String,
    pub category: Category,
}

impl SourceFile {
    fn segments(&self) -> Vec<String> {
        self.relative_path
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect()
    }

    /// First relative segment. A file directly under the root is its own project.
    pub fn project(&self) -> String {
        self.segments().into_iter().next().unwrap_or_default()
    }

    /// Second relative segment, or `"."` when the file sits directly in the project directory.
    pub fn folder(&self) -> String {
        let segments = self.segments();
        if segments.len() > 2 {
            segments[1].clone()
        } else {
            ROOT_FOLDER.to_string()
        }
    }

    /// Relative path with `/` separators on every platform.
    pub fn display_path(&self) -> String {
        self.segments().join("/")
    }
}

#[derive(Debug, Default)]
pub struct Discovery {
    pub files: Vec<SourceFile>,
    /// Entries the walk could not visit. The walk continues past them.
    pub warnings: Vec<AppError>,
}

pub fn discover_files(root: &Path, config: &DiscoveryConfig) -> Result<Discovery> {
    if !root.exists() {
        return Err(AppError::Discovery(format!(
            "Root directory '{}' does not exist",
            root.display()
        )));
    }
    if !root.is_dir() {
        return Err(AppError::Discovery(format!(
            "Root path '{}' is not a directory",
            root.display()
        )));
    }

    let extensions = config.normalized_extensions();
    let excluded_dirs = config.excluded_dir_names();
    let exclude_set = build_glob_set_from_vec(&config.exclude)?;
    log::debug!(
        "Discovering files under {} (extensions: {}, excluded dirs: {}, globs: {})",
        root.display(),
        extensions.len(),
        excluded_dirs.len(),
        config.exclude.len()
    );

    let mut builder = WalkBuilder::new(root);
    builder
        .standard_filters(config.use_gitignore)
        .hidden(!config.include_hidden)
        .follow_links(config.follow_links)
        .require_git(false);

    let filter_root = root.to_path_buf();
    builder.filter_entry(move |entry| keep_entry(entry, &filter_root, &excluded_dirs, &exclude_set));

    let mut discovery = Discovery::default();
    for result in builder.build() {
        let entry = match result {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("Skipping unreadable entry: {}", e);
                discovery.warnings.push(AppError::Walk(e));
                continue;
            }
        };
        if entry.depth() == 0 || !is_regular_file(&entry) {
            continue;
        }

        let path = entry.path();
        let Some(extension) = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        else {
            log::trace!("No extension, skipping: {}", path.display());
            continue;
        };
        if !extensions.contains(&extension) {
            log::trace!("Extension not allowed, skipping: {}", path.display());
            continue;
        }
        let Some(relative_path) = pathdiff::diff_paths(path, root) else {
            log::warn!("Could not get relative path for: {}", path.display());
            continue;
        };

        log::trace!("Discovered: {}", relative_path.display());
        discovery.files.push(SourceFile {
            path: path.to_path_buf(),
            category: Category::from_extension(&extension),
            relative_path,
            extension,
        });
    }

    // Component order, not string order: `App/A/x.cs` sorts before `App/A.cs`.
    discovery
        .files
        .sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    log::info!(
        "Discovery complete: {} files, {} warnings",
        discovery.files.len(),
        discovery.warnings.len()
    );
    Ok(discovery)
}

// Returning false prunes the entry, so excluded directories are never entered.
fn keep_entry(
    entry: &DirEntry,
    root: &Path,
    excluded_dirs: &HashSet<String>,
    exclude_set: &GlobSet,
) -> bool {
    if entry.depth() == 0 {
        return true;
    }
    let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
    if is_dir
        && excluded_dirs.contains(entry.file_name().to_string_lossy().as_ref())
    {
        log::trace!("Pruning excluded directory: {}", entry.path().display());
        return false;
    }
    if !exclude_set.is_empty() {
        if let Ok(relative) = entry.path().strip_prefix(root) {
            if exclude_set.is_match(relative) {
                log::trace!("Excluded by glob: {}", relative.display());
                return false;
            }
        }
    }
    true
}

fn is_regular_file(entry: &DirEntry) -> bool {
    entry
        .file_type()
        .is_some_and(|ft| ft.is_file() || (ft.is_symlink() && entry.path().is_file()))
}

pub(crate) fn build_glob_set_from_vec(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern_str in patterns {
        let mut processed_pattern = pattern_str.trim().to_string();
        if processed_pattern.is_empty() {
            continue;
        }
        if processed_pattern.ends_with('/') && processed_pattern.len() > 1 {
            processed_pattern.pop();
        }
        let glob = Glob::new(&processed_pattern).map_err(|e| {
            log::error!("Invalid glob pattern \"{}\": {}", pattern_str, e);
            AppError::Glob(format!(
                "Invalid glob pattern \"{}\" (processed as \"{}\"): {}",
                pattern_str, processed_pattern, e
            ))
        })?;
        log::trace!("Adding exclude glob: {}", processed_pattern);
        builder.add(glob);
    }
    Ok(builder.build()?)
}
