use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Coarse syntax family of a file. Picks the rule chain the classifier runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    /// C#-style code and Razor templates.
    #[serde(rename = "procedural-code-or-template")]
    ProceduralCode,
    StructuredConfig,
    BuildManifest,
    PlainText,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::ProceduralCode,
        Category::StructuredConfig,
        Category::BuildManifest,
        Category::PlainText,
    ];

    // Extensions are matched lowercase and without the leading dot.
    pub fn from_extension(extension: &str) -> Self {
        let ext = extension.trim_start_matches('.').to_ascii_lowercase();
        match ext.as_str() {
            "cs" | "cshtml" | "razor" => Category::ProceduralCode,
            "json" | "config" => Category::StructuredConfig,
            "csproj" => Category::BuildManifest,
            _ => Category::PlainText,
        }
    }

    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map_or(Category::PlainText, Category::from_extension)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::ProceduralCode => "procedural-code-or-template",
            Category::StructuredConfig => "structured-config",
            Category::BuildManifest => "build-manifest",
            Category::PlainText => "plain-text",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "procedural" | "code" | "procedural-code-or-template" => Ok(Category::ProceduralCode),
            "config" | "structured-config" => Ok(Category::StructuredConfig),
            "manifest" | "build-manifest" => Ok(Category::BuildManifest),
            "plain" | "text" | "plain-text" => Ok(Category::PlainText),
            other => Err(AppError::InvalidArgument(format!(
                "Unknown category '{}'. Expected one of: procedural, config, manifest, plain",
                other
            ))),
        }
    }
}
