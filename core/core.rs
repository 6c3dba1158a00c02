//! Annotated walkthrough generation for source trees.
//!
//! Discovery, grouping and assembly live here. The `walkthrough` binary in the
//! `cli` crate wires them to the command line.

pub mod assets;
pub mod category;
pub mod classify;
pub mod config;
pub mod discover;
pub mod error;
pub mod group;
pub mod narrative;
pub mod render;
pub mod walkthrough;

pub use category::Category;
pub use classify::{Explanation, Rule, RuleId, explain_line, rule_chain};
pub use config::{Config, DiscoveryConfig, NarrativeConfig, OutputConfig};
pub use discover::{Discovery, ROOT_FOLDER, SourceFile, discover_files};
pub use error::{AppError, Result};
pub use group::{FolderGroup, ProjectGroup, group_files};
pub use narrative::FlowNarrative;
pub use render::{OutputFormat, annotate, render, write_document};
pub use walkthrough::{
    AnnotatedLine, FileSection, FolderSection, ProjectSection, Walkthrough, split_lines,
};
