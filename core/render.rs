use crate::error::{AppError, Result};
use crate::walkthrough::{FileSection, Walkthrough};
use serde::Serialize;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use std::str::FromStr;

pub const XML_ROOT: &str = "Walkthrough";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Markdown,
    Text,
    Json,
    Yaml,
    Xml,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Markdown => "md",
            OutputFormat::Text => "txt",
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
            OutputFormat::Xml => "xml",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            "xml" => Ok(OutputFormat::Xml),
            other => Err(AppError::InvalidArgument(format!(
                "Unsupported output format '{}'. Expected one of: markdown, text, json, yaml, xml",
                other
            ))),
        }
    }
}

/// Appends the explanation to a raw line as an inline comment.
pub fn annotate(line: &str, explanation: &str, delimiter: &str) -> String {
    let separator = if line.ends_with(' ') { "" } else { " " };
    format!("{line}{separator}{delimiter}{explanation}")
}

pub fn render(doc: &Walkthrough, format: OutputFormat, delimiter: &str) -> Result<String> {
    log::debug!("Rendering walkthrough as {:?}", format);
    match format {
        OutputFormat::Markdown => Ok(render_markdown(doc, delimiter)),
        OutputFormat::Text => Ok(render_text(doc, delimiter)),
        OutputFormat::Json => serialize_to_json(doc, true),
        OutputFormat::Yaml => serialize_to_yaml(doc),
        OutputFormat::Xml => serialize_to_xml(doc, XML_ROOT),
    }
}

pub fn serialize_to_json<T: Serialize>(data: &T, pretty: bool) -> Result<String> {
    if pretty {
        Ok(serde_json::to_string_pretty(data)?)
    } else {
        Ok(serde_json::to_string(data)?)
    }
}

pub fn serialize_to_yaml<T: Serialize>(data: &T) -> Result<String> {
    Ok(serde_yml::to_string(data)?)
}

/// Serializes to XML. Characters XML 1.0 cannot carry become U+FFFD.
pub fn serialize_to_xml<T: Serialize>(data: &T, root_name: &str) -> Result<String> {
    let xml = quick_xml::se::to_string_with_root(root_name, data)?;
    Ok(replace_invalid_xml_chars(xml))
}

fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..
    )
}

fn replace_invalid_xml_chars(xml: String) -> String {
    if xml.chars().all(is_xml_char) {
        return xml;
    }
    log::warn!("Replacing characters not allowed in XML with U+FFFD");
    xml.chars()
        .map(|c| if is_xml_char(c) { c } else { char::REPLACEMENT_CHARACTER })
        .collect()
}

// A fence must be longer than any backtick run inside the block.
fn code_fence(file: &FileSection) -> String {
    let longest_run = file
        .lines
        .iter()
        .map(|line| {
            line.text
                .split(|c| c != '`')
                .map(str::len)
                .max()
                .unwrap_or(0)
        })
        .max()
        .unwrap_or(0);
    "`".repeat(longest_run.max(2) + 1)
}

fn render_markdown(doc: &Walkthrough, delimiter: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# {}\n", doc.title);
    let _ = writeln!(out, "{}\n", doc.intro);
    if let Some(ts) = doc.generation_timestamp {
        let _ = writeln!(out, "_Generated: {}_\n", ts.to_rfc3339());
    }

    for project in &doc.projects {
        let _ = writeln!(out, "## Project: {}\n", project.name);
        for folder in &project.folders {
            let _ = writeln!(out, "### Folder: {}\n", folder.name);
            for file in &folder.files {
                let _ = writeln!(out, "#### File: {}\n", file.path);
                if let Some(error) = &file.error {
                    let _ = writeln!(out, "{}\n", error);
                    continue;
                }
                let fence = code_fence(file);
                let _ = writeln!(out, "{fence}");
                for line in &file.lines {
                    let _ = writeln!(out, "{}", annotate(&line.text, &line.explanation, delimiter));
                }
                let _ = writeln!(out, "{fence}\n");
            }
        }
    }

    if let Some(flow) = &doc.flow_summary {
        let _ = writeln!(out, "## {}\n", flow.heading);
        let _ = writeln!(out, "{}\n", flow.intro);
        for (idx, step) in flow.steps.iter().enumerate() {
            let _ = writeln!(out, "{}. {}", idx + 1, step);
        }
        let _ = writeln!(out, "\n### {}\n", flow.connections_heading);
        for connection in &flow.connections {
            let _ = writeln!(out, "- {}", connection);
        }
    }
    out
}

fn render_text(doc: &Walkthrough, delimiter: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", doc.title);
    let _ = writeln!(out, "{}\n", "=".repeat(doc.title.chars().count()));
    let _ = writeln!(out, "{}\n", doc.intro);
    if let Some(ts) = doc.generation_timestamp {
        let _ = writeln!(out, "Generated: {}\n", ts.to_rfc3339());
    }

    for project in &doc.projects {
        let _ = writeln!(out, "Project: {}\n", project.name);
        for folder in &project.folders {
            let _ = writeln!(out, "Folder: {}\n", folder.name);
            for file in &folder.files {
                let _ = writeln!(out, "File: {}", file.path);
                match &file.error {
                    Some(error) => {
                        let _ = writeln!(out, "{}", error);
                    }
                    None => {
                        for line in &file.lines {
                            let _ = writeln!(
                                out,
                                "{}",
                                annotate(&line.text, &line.explanation, delimiter)
                            );
                        }
                    }
                }
                out.push('\n');
            }
        }
    }

    if let Some(flow) = &doc.flow_summary {
        let _ = writeln!(out, "{}\n", flow.heading);
        let _ = writeln!(out, "{}\n", flow.intro);
        for (idx, step) in flow.steps.iter().enumerate() {
            let _ = writeln!(out, "{}. {}", idx + 1, step);
        }
        let _ = writeln!(out, "\n{}\n", flow.connections_heading);
        for connection in &flow.connections {
            let _ = writeln!(out, "- {}", connection);
        }
    }
    out
}

/// Writes the rendered document, creating parent directories as needed.
pub fn write_document(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| AppError::DirCreation {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    fs::write(path, content).map_err(|e| AppError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })?;
    log::info!("Wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}
