use once_cell::sync::Lazy;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct BuiltinDefaults {
    #[serde(default)]
    pub include_extensions: Vec<String>,
    #[serde(default)]
    pub exclude_dirs: Vec<String>,
}

/// Authored closing section text. Not derived from the annotated files.
#[derive(Debug, Deserialize)]
pub struct NarrativeText {
    pub title: String,
    pub intro: String,
    pub flow_heading: String,
    pub flow_intro: String,
    pub steps: Vec<String>,
    pub connections_heading: String,
    pub connections: Vec<String>,
}

static BUILTIN_DEFAULTS: Lazy<BuiltinDefaults> = Lazy::new(|| {
    let yaml_content = include_str!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/../data/defaults.yaml"
    ));
    serde_yml::from_str(yaml_content).expect("Failed to parse embedded data/defaults.yaml")
});
static NARRATIVE_TEXT: Lazy<NarrativeText> = Lazy::new(|| {
    let yaml_content = include_str!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/../data/narrative.yaml"
    ));
    serde_yml::from_str(yaml_content).expect("Failed to parse embedded data/narrative.yaml")
});

pub fn get_builtin_defaults() -> &'static BuiltinDefaults {
    &BUILTIN_DEFAULTS
}
pub fn get_narrative_text() -> &'static NarrativeText {
    &NARRATIVE_TEXT
}
