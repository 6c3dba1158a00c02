use anyhow::{Context, Result};
use serde::Serialize;
use std::io::{self, Read};
use walkthrough_core::config::DEFAULT_COMMENT_DELIMITER;
use walkthrough_core::{Category, RuleId, annotate, explain_line, split_lines};

use crate::cli_args::ExplainArgs;
use crate::output::print_data_or_text;

#[derive(Debug, Serialize)]
struct ExplainedLine {
    line: String,
    rule: RuleId,
    explanation: String,
}

pub fn handle_explain_command(args: ExplainArgs) -> Result<()> {
    let category = resolve_category(&args)?;
    log::debug!("Explaining lines as {}", category);

    let lines = if args.lines.is_empty() {
        log::debug!("No lines given, reading stdin");
        let mut bytes = Vec::new();
        io::stdin()
            .lock()
            .read_to_end(&mut bytes)
            .context("Failed to read lines from stdin")?;
        lines_from_bytes(&bytes)
    } else {
        args.lines
    };

    let explained = explain_all(category, lines);
    print_data_or_text(
        &explained,
        || {
            explained
                .iter()
                .map(|e| annotate(&e.line, &e.explanation, DEFAULT_COMMENT_DELIMITER))
                .collect::<Vec<_>>()
                .join("\n")
        },
        &args.format_output,
    )
}

fn resolve_category(args: &ExplainArgs) -> Result<Category> {
    match (&args.category, &args.ext) {
        (Some(name), _) => Ok(name.parse::<Category>()?),
        (None, Some(ext)) => Ok(Category::from_extension(ext)),
        (None, None) => Ok(Category::ProceduralCode),
    }
}

// Same decoding and line splitting as files on disk.
fn lines_from_bytes(bytes: &[u8]) -> Vec<String> {
    split_lines(&String::from_utf8_lossy(bytes))
        .into_iter()
        .map(String::from)
        .collect()
}

fn explain_all(category: Category, lines: Vec<String>) -> Vec<ExplainedLine> {
    lines
        .into_iter()
        .map(|line| {
            let explanation = explain_line(category, &line);
            ExplainedLine {
                line,
                rule: explanation.rule,
                explanation: explanation.text,
            }
        })
        .collect()
}
