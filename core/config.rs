use crate::assets::get_builtin_defaults;
use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_DIR: &str = ".walkthrough";
pub const DEFAULT_CONFIG_FILENAME: &str = "walkthrough.toml";
pub const DEFAULT_FORMAT: &str = "markdown";
pub const DEFAULT_COMMENT_DELIMITER: &str = " // ";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub discovery: DiscoveryConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub narrative: NarrativeConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct GeneralConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intro: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DiscoveryConfig {
    #[serde(default = "default_include_extensions")]
    pub include_extensions: Vec<String>,
    #[serde(default = "default_exclude_dirs")]
    pub exclude_dirs: Vec<String>,
    /// Extra glob patterns, matched against paths relative to the root.
    #[serde(default)]
    pub exclude: Vec<String>,
    #[serde(default = "default_false")]
    pub use_gitignore: bool,
    #[serde(default = "default_true")]
    pub include_hidden: bool,
    #[serde(default = "default_false")]
    pub follow_links: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    #[serde(default = "default_format")]
    pub format: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(default = "default_true")]
    pub include_timestamp: bool,
    #[serde(default = "default_comment_delimiter")]
    pub comment_delimiter: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct NarrativeConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intro: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connections_heading: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connections: Option<Vec<String>>,
}

fn default_true() -> bool {
    true
}
fn default_false() -> bool {
    false
}
fn default_format() -> String {
    DEFAULT_FORMAT.to_string()
}
fn default_comment_delimiter() -> String {
    DEFAULT_COMMENT_DELIMITER.to_string()
}
fn default_include_extensions() -> Vec<String> {
    get_builtin_defaults().include_extensions.clone()
}
fn default_exclude_dirs() -> Vec<String> {
    get_builtin_defaults().exclude_dirs.clone()
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            include_extensions: default_include_extensions(),
            exclude_dirs: default_exclude_dirs(),
            exclude: Vec::new(),
            use_gitignore: default_false(),
            include_hidden: default_true(),
            follow_links: default_false(),
        }
    }
}
impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            path: None,
            include_timestamp: default_true(),
            comment_delimiter: default_comment_delimiter(),
        }
    }
}
impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            heading: None,
            intro: None,
            steps: None,
            connections_heading: None,
            connections: None,
        }
    }
}

impl DiscoveryConfig {
    /// Lowercase extensions without the leading dot.
    pub fn normalized_extensions(&self) -> HashSet<String> {
        self.include_extensions
            .iter()
            .map(|ext| ext.trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect()
    }

    pub fn excluded_dir_names(&self) -> HashSet<String> {
        self.exclude_dirs
            .iter()
            .map(|dir| dir.trim().trim_matches(['/', '\\']).to_string())
            .filter(|dir| !dir.is_empty())
            .collect()
    }
}

impl Config {
    pub fn determine_project_root(cli_project_root: Option<&PathBuf>) -> Result<PathBuf> {
        let path_str_opt = cli_project_root
            .map(|p| p.to_string_lossy().to_string())
            .or_else(|| env::var("PROJECT_ROOT").ok().filter(|s| !s.is_empty()));

        let path_to_resolve = match path_str_opt {
            Some(p_str) => PathBuf::from(shellexpand::tilde(&p_str).as_ref()),
            None => env::current_dir().map_err(AppError::Io)?,
        };

        path_to_resolve.canonicalize().map_err(|e| {
            AppError::Discovery(format!(
                "Failed to resolve root directory '{}': {}",
                path_to_resolve.display(),
                e
            ))
        })
    }

    pub fn resolve_config_path(
        project_root: &Path,
        cli_config_file: Option<&String>,
        cli_disable_config: bool,
    ) -> Result<Option<PathBuf>> {
        if cli_disable_config {
            log::debug!("Config file loading disabled via CLI flag.");
            return Ok(None);
        }

        let Some(p_str) = cli_config_file else {
            let default_path = Self::default_config_path(project_root);
            if default_path.exists() {
                log::debug!("Using default config file path: {}", default_path.display());
                return Ok(Some(default_path));
            }
            log::debug!(
                "No config file specified and default not found at: {}",
                default_path.display()
            );
            return Ok(None);
        };

        let mut path = PathBuf::from(shellexpand::tilde(p_str).as_ref());
        let looks_like_path =
            path.is_absolute() || path.components().count() > 1 || p_str.contains(['/', '\\']);

        if looks_like_path {
            if !path.exists() && path.extension().is_none() {
                path.set_extension("toml");
            }
            if !path.exists() {
                return Err(AppError::Config(format!(
                    "Specified config file not found at path: {}",
                    path.display()
                )));
            }
            log::debug!("Using specified config file path: {}", path.display());
            return Ok(Some(path));
        }

        // A bare name is looked up in the project's config directory.
        let filename = if path.extension().is_some_and(|e| e == "toml") {
            p_str.to_string()
        } else {
            format!("{}.toml", p_str)
        };
        let config_dir = project_root.join(DEFAULT_CONFIG_DIR);
        let full_path = config_dir.join(filename);
        if !full_path.exists() {
            return Err(AppError::Config(format!(
                "Specified config file '{}' not found in default directory: {}",
                p_str,
                config_dir.display()
            )));
        }
        log::debug!(
            "Using specified config filename in default directory: {}",
            full_path.display()
        );
        Ok(Some(full_path))
    }

    pub fn default_config_path(project_root: &Path) -> PathBuf {
        project_root
            .join(DEFAULT_CONFIG_DIR)
            .join(DEFAULT_CONFIG_FILENAME)
    }

    pub fn load_from_path(config_path: &Path) -> Result<Self> {
        log::info!("Loading configuration from: {}", config_path.display());
        let toml_content = fs::read_to_string(config_path).map_err(|e| AppError::FileRead {
            path: config_path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml_str(&toml_content).map_err(|e| match e {
            AppError::TomlParse(msg) => AppError::TomlParse(format!(
                "Error parsing config file '{}': {}",
                config_path.display(),
                msg
            )),
            other => other,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str::<Config>(content).map_err(|e| {
            AppError::TomlParse(format!("{}. Check TOML syntax and structure.", e))
        })
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn get_effective_project_name(&self, project_root: &Path) -> String {
        self.general.project_name.clone().unwrap_or_else(|| {
            project_root
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| "UnknownProject".to_string())
        })
    }
}
