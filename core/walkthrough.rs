use crate::category::Category;
use crate::classify::{RuleId, explain_line};
use crate::config::Config;
use crate::discover::SourceFile;
use crate::group::ProjectGroup;
use crate::narrative::{self, FlowNarrative};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// The assembled document, ready to render in any output format.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Walkthrough {
    pub title: String,
    pub intro: String,
    pub project_root: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_timestamp: Option<DateTime<Utc>>,
    pub projects: Vec<ProjectSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flow_summary: Option<FlowNarrative>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectSection {
    pub name: String,
    pub folders: Vec<FolderSection>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FolderSection {
    pub name: String,
    pub files: Vec<FileSection>,
}

/// One file of the walkthrough. `error` is set instead of `lines` when the file could not be read.
#[derive(Debug, Clone, Serialize)]
pub struct FileSection {
    pub path: String,
    pub category: Category,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub lines: Vec<AnnotatedLine>,
    #[serde(skip)]
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnnotatedLine {
    /// 1-based.
    pub number: usize,
    pub text: String,
    pub rule: RuleId,
    pub explanation: String,
}

impl Walkthrough {
    pub fn build(project_root: &Path, config: &Config, groups: &[ProjectGroup]) -> Self {
        log::debug!("Assembling walkthrough for {} projects", groups.len());

        let projects = groups
            .iter()
            .map(|project| ProjectSection {
                name: project.name.clone(),
                folders: project
                    .folders
                    .iter()
                    .map(|folder| FolderSection {
                        name: folder.name.clone(),
                        files: folder.files.iter().map(FileSection::read).collect(),
                    })
                    .collect(),
            })
            .collect();

        let walkthrough = Walkthrough {
            title: config
                .general
                .title
                .clone()
                .unwrap_or_else(|| narrative::default_title().to_string()),
            intro: config
                .general
                .intro
                .clone()
                .unwrap_or_else(|| narrative::default_intro().to_string()),
            project_root: project_root.display().to_string(),
            generation_timestamp: config.output.include_timestamp.then(Utc::now),
            projects,
            flow_summary: FlowNarrative::from_config(&config.narrative),
        };
        log::info!(
            "Walkthrough assembled: {} files, {} annotated lines",
            walkthrough.file_count(),
            walkthrough.line_count()
        );
        walkthrough
    }

    pub fn files(&self) -> impl Iterator<Item = &FileSection> {
        self.projects
            .iter()
            .flat_map(|p| p.folders.iter())
            .flat_map(|f| f.files.iter())
    }

    pub fn file_count(&self) -> usize {
        self.files().count()
    }

    pub fn line_count(&self) -> usize {
        self.files().map(|f| f.lines.len()).sum()
    }

    pub fn unreadable_files(&self) -> impl Iterator<Item = &FileSection> {
        self.files().filter(|f| f.error.is_some())
    }
}

impl ProjectSection {
    pub fn files(&self) -> impl Iterator<Item = &FileSection> {
        self.folders.iter().flat_map(|f| f.files.iter())
    }
}

impl FileSection {
    /// Reads and annotates one file. A read failure becomes a placeholder, never an error.
    pub fn read(file: &SourceFile) -> Self {
        let path = file.display_path();
        match fs::read(&file.path) {
            Ok(bytes) => {
                log::trace!("Read {} bytes from {}", bytes.len(), path);
                let content = String::from_utf8_lossy(&bytes);
                FileSection {
                    lines: annotate_text(file.category, &content),
                    path,
                    category: file.category,
                    error: None,
                    size: bytes.len() as u64,
                }
            }
            Err(e) => {
                log::warn!("Could not read {}: {}", file.path.display(), e);
                FileSection {
                    path,
                    category: file.category,
                    error: Some(format!("[Could not read file due to error: {}]", e)),
                    lines: Vec::new(),
                    size: 0,
                }
            }
        }
    }
}

static LINE_BREAK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r\n|\r|\n").unwrap());

/// Splits on `\r\n`, `\n` or a lone `\r`. A final line break does not start a new line.
pub fn split_lines(content: &str) -> Vec<&str> {
    let mut lines: Vec<&str> = LINE_BREAK_RE.split(content).collect();
    if lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    lines
}

/// Pairs every line of `content` with its explanation, numbered from 1.
pub fn annotate_text(category: Category, content: &str) -> Vec<AnnotatedLine> {
    split_lines(content)
        .into_iter()
        .enumerate()
        .map(|(idx, text)| {
            let explanation = explain_line(category, text);
            AnnotatedLine {
                number: idx + 1,
                text: text.to_string(),
                rule: explanation.rule,
                explanation: explanation.text,
            }
        })
        .collect()
}
