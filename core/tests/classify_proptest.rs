//! Property-based tests for the line classifier
//!
//! Classification must be total: whatever the line and category, exactly one
//! non-empty explanation comes back.

use proptest::prelude::*;
use walkthrough_core::walkthrough::annotate_text;
use walkthrough_core::{Category, RuleId, explain_line};

fn category_strategy() -> impl Strategy<Value = Category> {
    prop_oneof![
        Just(Category::ProceduralCode),
        Just(Category::StructuredConfig),
        Just(Category::BuildManifest),
        Just(Category::PlainText),
    ]
}

/// Lines shaped like the code the rules look for, plus arbitrary noise
fn line_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        any::<String>(),
        "[ \t]{0,8}",
        "\\s*using [A-Za-z.]{1,20};",
        "\\s*\\[[A-Za-z]{1,12}(\\(\"[a-z/{}]{0,16}\"\\))?\\]",
        "\\s*(public|private) (async )?[A-Za-z<>]{1,10} [A-Za-z]{1,10}\\([a-z ,]{0,20}\\)",
        "\\s*\"[A-Za-z.]{1,12}\": .{0,20}",
        "\\s*<[A-Za-z]{1,12}( [a-z]+=\"[a-z0-9.]*\")* ?/?>",
        "\\s*@(model|using|if|foreach|section) .{0,20}",
    ]
}

proptest! {
    #[test]
    fn classification_is_total(category in category_strategy(), line in line_strategy()) {
        let explanation = explain_line(category, &line);
        prop_assert!(!explanation.text.trim().is_empty());
    }

    #[test]
    fn whitespace_lines_are_always_blank(
        category in category_strategy(),
        line in "[ \t]{0,12}",
    ) {
        prop_assert_eq!(explain_line(category, &line).rule, RuleId::Blank);
    }

    #[test]
    fn one_annotation_per_line(
        category in category_strategy(),
        lines in prop::collection::vec(line_strategy(), 0..20),
        ending in prop_oneof![Just("\n"), Just("\r\n"), Just("\r")],
    ) {
        let lines: Vec<String> = lines
            .into_iter()
            .map(|line| line.replace(['\r', '\n'], " "))
            .collect();
        let content: String = lines.iter().map(|line| format!("{line}{ending}")).collect();
        let annotated = annotate_text(category, &content);
        prop_assert_eq!(annotated.len(), lines.len());
        for (idx, line) in annotated.iter().enumerate() {
            prop_assert_eq!(line.number, idx + 1);
            prop_assert_eq!(&line.text, &lines[idx]);
        }
    }
}
