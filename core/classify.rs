//! Line classifier.
//!
//! Every category owns an ordered chain of [`Rule`]s. A line is offered to each
//! rule in declaration order and the first one that recognizes it produces the
//! [`Explanation`]. When nothing matches, the category's fallback text is used,
//! so classification is total and never fails.
//!
//! Several patterns overlap (a bracketed route marker also looks like a generic
//! marker, a Razor `<text>` line is also markup), which makes the order of the
//! chains part of the observable behavior. Changing it changes output.

use crate::category::Category;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;

/// Which rule produced an explanation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleId {
    Blank,
    Import,
    Namespace,
    ControllerMarker,
    AuthorizationMarker,
    HttpVerbMarker,
    RouteMarker,
    Marker,
    Class,
    Interface,
    Method,
    ReturnView,
    ReturnJson,
    DataContext,
    ServiceCall,
    TemplateModel,
    TemplateUsing,
    TemplateCodeBlock,
    TemplateSection,
    TemplateConditional,
    TemplateLoop,
    Markup,
    CodeFallback,
    ConfigKey,
    ObjectOpen,
    ObjectClose,
    ArrayOpen,
    ArrayClose,
    ConfigFallback,
    PackageReference,
    ManifestTag,
    ManifestComment,
    ManifestFallback,
    TextFallback,
}

impl RuleId {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleId::Blank => "blank",
            RuleId::Import => "import",
            RuleId::Namespace => "namespace",
            RuleId::ControllerMarker => "controller_marker",
            RuleId::AuthorizationMarker => "authorization_marker",
            RuleId::HttpVerbMarker => "http_verb_marker",
            RuleId::RouteMarker => "route_marker",
            RuleId::Marker => "marker",
            RuleId::Class => "class",
            RuleId::Interface => "interface",
            RuleId::Method => "method",
            RuleId::ReturnView => "return_view",
            RuleId::ReturnJson => "return_json",
            RuleId::DataContext => "data_context",
            RuleId::ServiceCall => "service_call",
            RuleId::TemplateModel => "template_model",
            RuleId::TemplateUsing => "template_using",
            RuleId::TemplateCodeBlock => "template_code_block",
            RuleId::TemplateSection => "template_section",
            RuleId::TemplateConditional => "template_conditional",
            RuleId::TemplateLoop => "template_loop",
            RuleId::Markup => "markup",
            RuleId::CodeFallback => "code_fallback",
            RuleId::ConfigKey => "config_key",
            RuleId::ObjectOpen => "object_open",
            RuleId::ObjectClose => "object_close",
            RuleId::ArrayOpen => "array_open",
            RuleId::ArrayClose => "array_close",
            RuleId::ConfigFallback => "config_fallback",
            RuleId::PackageReference => "package_reference",
            RuleId::ManifestTag => "manifest_tag",
            RuleId::ManifestComment => "manifest_comment",
            RuleId::ManifestFallback => "manifest_fallback",
            RuleId::TextFallback => "text_fallback",
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(
            self,
            RuleId::CodeFallback
                | RuleId::ConfigFallback
                | RuleId::ManifestFallback
                | RuleId::TextFallback
        )
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Explanation {
    pub rule: RuleId,
    pub text: String,
}

impl Explanation {
    fn new(rule: RuleId, text: impl Into<String>) -> Self {
        Self {
            rule,
            text: text.into(),
        }
    }
}

pub type Matcher = fn(&str) -> Option<Explanation>;

/// One step of a rule chain.
#[derive(Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    matcher: Matcher,
}

impl Rule {
    const fn new(name: &'static str, matcher: Matcher) -> Self {
        Self { name, matcher }
    }

    pub fn apply(&self, line: &str) -> Option<Explanation> {
        (self.matcher)(line)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule").field("name", &self.name).finish()
    }
}

pub const BLANK_LINE_TEXT: &str = "Blank line for readability";

static PROCEDURAL_RULES: &[Rule] = &[
    Rule::new("blank", blank_line),
    Rule::new("import", import_statement),
    Rule::new("namespace", namespace_declaration),
    Rule::new("marker", bracketed_marker),
    Rule::new("class", class_declaration),
    Rule::new("interface", interface_declaration),
    Rule::new("method", method_signature),
    Rule::new("return_view", return_view),
    Rule::new("return_json", return_json),
    Rule::new("data_context", data_context),
    Rule::new("service_call", service_call),
    Rule::new("template_model", template_model),
    Rule::new("template_using", template_using),
    Rule::new("template_code_block", template_code_block),
    Rule::new("template_section", template_section),
    Rule::new("template_conditional", template_conditional),
    Rule::new("template_loop", template_loop),
    Rule::new("markup", markup_line),
];

static CONFIG_RULES: &[Rule] = &[
    Rule::new("blank", blank_line),
    Rule::new("config_key", config_key),
    Rule::new("delimiter", config_delimiter),
];

static MANIFEST_RULES: &[Rule] = &[
    Rule::new("blank", blank_line),
    Rule::new("package_reference", package_reference),
    Rule::new("manifest_tag", manifest_tag),
    Rule::new("manifest_comment", manifest_comment),
];

static TEXT_RULES: &[Rule] = &[Rule::new("blank", blank_line)];

pub fn rule_chain(category: Category) -> &'static [Rule] {
    match category {
        Category::ProceduralCode => PROCEDURAL_RULES,
        Category::StructuredConfig => CONFIG_RULES,
        Category::BuildManifest => MANIFEST_RULES,
        Category::PlainText => TEXT_RULES,
    }
}

pub fn fallback(category: Category) -> Explanation {
    match category {
        Category::ProceduralCode => Explanation::new(
            RuleId::CodeFallback,
            "Code statement that contributes to the application's behavior",
        ),
        Category::StructuredConfig => Explanation::new(
            RuleId::ConfigFallback,
            "JSON/config line setting application behavior",
        ),
        Category::BuildManifest => {
            Explanation::new(RuleId::ManifestFallback, "XML/project configuration line")
        }
        Category::PlainText => Explanation::new(RuleId::TextFallback, "Line explanation"),
    }
}

/// Explains a single line. Trailing line terminators are ignored.
pub fn explain_line(category: Category, line: &str) -> Explanation {
    let line = line.trim_end_matches(['\n', '\r']);
    for rule in rule_chain(category) {
        if let Some(explanation) = rule.apply(line) {
            log::trace!("Rule '{}' matched line: {}", rule.name, line);
            return explanation;
        }
    }
    log::trace!("No rule matched, using {} fallback: {}", category, line);
    fallback(category)
}

// --- Shared ---

fn blank_line(line: &str) -> Option<Explanation> {
    line.trim()
        .is_empty()
        .then(|| Explanation::new(RuleId::Blank, BLANK_LINE_TEXT))
}

// --- Procedural code and templates ---

static USING_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*using\s+([\w.=]+)\s*;\s*$").unwrap());
static NAMESPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*namespace\s+([\w.]+)\s*[{;]?\s*$").unwrap());
static CLASS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(?:public|internal|protected|private)?\s*(?:(?:abstract|static|sealed|partial)\s+)*class\s+([A-Za-z_][A-Za-z0-9_]*)\s*(?::\s*([^{]+))?\s*\{?\s*$",
    )
    .unwrap()
});
static INTERFACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*public\s+interface\s+([A-Za-z_][A-Za-z0-9_]*)").unwrap());
static METHOD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(public|private|protected|internal)\s+(?:(?:static|virtual|override|abstract|sealed)\s+)*(async\s+)?([\w<>\[\]]+)\s+([A-Za-z_][A-Za-z0-9_]*)\s*\(([^)]*)\)",
    )
    .unwrap()
});
// The argument may itself contain brackets, as in [Route("api/[controller]")].
static MARKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\[([A-Za-z_][A-Za-z0-9_]*(?:\(.*\))?)\]\s*$").unwrap());
static HTTP_MARKER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[(HttpGet|HttpPost|HttpPut|HttpDelete|HttpPatch)(?:\((.*?)\))?\]").unwrap()
});
static ROUTE_MARKER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[Route\((.*?)\)\]").unwrap());
static RETURN_VIEW_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"return\s+View\((.*?)\)\s*;").unwrap());
static RETURN_JSON_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"return\s+Json\((.*?)\)\s*;").unwrap());
static SERVICE_CALL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\w+Service)\.").unwrap());
static TEMPLATE_MODEL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*@model\s+(.*)").unwrap());
static TEMPLATE_USING_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*@using\s+(.*)").unwrap());
static TEMPLATE_SECTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*@section\s+(\w+)\s*\{").unwrap());
static TEMPLATE_IF_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*@if\s*\((.*)\)\s*\{").unwrap());
static TEMPLATE_LOOP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*@for(?:each)?\s*\((.*)\)\s*\{").unwrap());

fn import_statement(line: &str) -> Option<Explanation> {
    let caps = USING_RE.captures(line)?;
    Some(Explanation::new(
        RuleId::Import,
        format!("Imports the {} namespace so its types are available", &caps[1]),
    ))
}

fn namespace_declaration(line: &str) -> Option<Explanation> {
    let caps = NAMESPACE_RE.captures(line)?;
    Some(Explanation::new(
        RuleId::Namespace,
        format!(
            "Declares the namespace {} to logically group related code",
            &caps[1]
        ),
    ))
}

fn bracketed_marker(line: &str) -> Option<Explanation> {
    let caps = MARKER_RE.captures(line)?;
    let marker = &caps[1];

    if marker.starts_with("ApiController") {
        return Some(Explanation::new(
            RuleId::ControllerMarker,
            "Marks this class as a Web API controller for automatic behaviors",
        ));
    }
    if marker.starts_with("Authorize") {
        return Some(Explanation::new(
            RuleId::AuthorizationMarker,
            "Requires the user to be authorized to access the decorated action/class",
        ));
    }
    if let Some(http) = HTTP_MARKER_RE.captures(line) {
        let verb = &http[1];
        let path = http.get(2).map_or("", |m| m.as_str());
        let text = format!("Maps this action to HTTP {} {}", verb, path);
        return Some(Explanation::new(RuleId::HttpVerbMarker, text.trim_end()));
    }
    if let Some(route) = ROUTE_MARKER_RE.captures(line) {
        return Some(Explanation::new(
            RuleId::RouteMarker,
            format!(
                "Defines a route template {} for this controller/action",
                &route[1]
            ),
        ));
    }
    Some(Explanation::new(
        RuleId::Marker,
        format!(
            "Applies the {} attribute which modifies behavior/metadata",
            marker
        ),
    ))
}

fn class_declaration(line: &str) -> Option<Explanation> {
    let caps = CLASS_RE.captures(line)?;
    let name = &caps[1];
    let base = caps.get(2).map_or("", |m| m.as_str().trim());
    let text = if base.is_empty() {
        format!("Declares class {}", name)
    } else {
        format!("Declares class {} inheriting from {}", name, base)
    };
    Some(Explanation::new(RuleId::Class, text))
}

fn interface_declaration(line: &str) -> Option<Explanation> {
    let caps = INTERFACE_RE.captures(line)?;
    Some(Explanation::new(
        RuleId::Interface,
        format!(
            "Declares interface {} (contract of methods/properties)",
            &caps[1]
        ),
    ))
}

fn method_signature(line: &str) -> Option<Explanation> {
    let caps = METHOD_RE.captures(line)?;
    let access = capitalize(&caps[1]);
    let async_note = if caps.get(2).is_some() {
        " asynchronously"
    } else {
        ""
    };
    Some(Explanation::new(
        RuleId::Method,
        format!(
            "{} method {} returns {}{} with parameters ({})",
            access, &caps[4], &caps[3], async_note, &caps[5]
        ),
    ))
}

fn return_view(line: &str) -> Option<Explanation> {
    RETURN_VIEW_RE.is_match(line).then(|| {
        Explanation::new(
            RuleId::ReturnView,
            "Returns a Razor View to render HTML to the client",
        )
    })
}

fn return_json(line: &str) -> Option<Explanation> {
    RETURN_JSON_RE
        .is_match(line)
        .then(|| Explanation::new(RuleId::ReturnJson, "Returns JSON data as the HTTP response"))
}

fn data_context(line: &str) -> Option<Explanation> {
    line.contains("DbContext").then(|| {
        Explanation::new(
            RuleId::DataContext,
            "Uses the EF Core DbContext to query or modify the database",
        )
    })
}

fn service_call(line: &str) -> Option<Explanation> {
    let caps = SERVICE_CALL_RE.captures(line)?;
    Some(Explanation::new(
        RuleId::ServiceCall,
        format!("Calls {} to execute business logic", &caps[1]),
    ))
}

fn template_model(line: &str) -> Option<Explanation> {
    if !line.trim_start().starts_with("@model") {
        return None;
    }
    let model = TEMPLATE_MODEL_RE
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map_or("", |m| m.as_str().trim());
    Some(Explanation::new(
        RuleId::TemplateModel,
        format!("Specifies the model type for this view: {}", model),
    ))
}

fn template_using(line: &str) -> Option<Explanation> {
    if !line.trim_start().starts_with("@using") {
        return None;
    }
    let namespace = TEMPLATE_USING_RE
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map_or("", |m| m.as_str().trim());
    Some(Explanation::new(
        RuleId::TemplateUsing,
        format!("Imports namespace in the view: {}", namespace),
    ))
}

fn template_code_block(line: &str) -> Option<Explanation> {
    line.trim_start().starts_with("@{").then(|| {
        Explanation::new(
            RuleId::TemplateCodeBlock,
            "Begins a Razor code block for server-side logic",
        )
    })
}

fn template_section(line: &str) -> Option<Explanation> {
    let caps = TEMPLATE_SECTION_RE.captures(line)?;
    Some(Explanation::new(
        RuleId::TemplateSection,
        format!(
            "Defines a Razor section named {} to inject content into layout",
            &caps[1]
        ),
    ))
}

fn template_conditional(line: &str) -> Option<Explanation> {
    TEMPLATE_IF_RE.is_match(line).then(|| {
        Explanation::new(
            RuleId::TemplateConditional,
            "Razor conditional block that runs only when the condition is true",
        )
    })
}

fn template_loop(line: &str) -> Option<Explanation> {
    TEMPLATE_LOOP_RE.is_match(line).then(|| {
        Explanation::new(
            RuleId::TemplateLoop,
            "Razor loop to iterate over a collection and render repeated markup",
        )
    })
}

fn markup_line(line: &str) -> Option<Explanation> {
    let trimmed = line.trim();
    (trimmed.starts_with('<') && trimmed.ends_with('>')).then(|| {
        Explanation::new(
            RuleId::Markup,
            "HTML/Razor markup element rendered to the page",
        )
    })
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// --- Structured config ---

static CONFIG_KEY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"^\s*"([^"]+)"\s*:\s*(.*)"#).unwrap());

fn config_key(line: &str) -> Option<Explanation> {
    let caps = CONFIG_KEY_RE.captures(line)?;
    Some(Explanation::new(
        RuleId::ConfigKey,
        format!("Configures the setting '{}'", &caps[1]),
    ))
}

fn config_delimiter(line: &str) -> Option<Explanation> {
    let trimmed = line.trim_start();
    let (rule, text) = match trimmed.chars().next()? {
        '{' => (RuleId::ObjectOpen, "Begins a JSON object"),
        '}' => (RuleId::ObjectClose, "Ends a JSON object"),
        '[' => (RuleId::ArrayOpen, "Begins a JSON array"),
        ']' => (RuleId::ArrayClose, "Ends a JSON array"),
        _ => return None,
    };
    Some(Explanation::new(rule, text))
}

// --- Build manifests ---

static PACKAGE_REF_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<PackageReference\s+Include="([^"]+)"\s+Version="([^"]+)"\s*/>"#).unwrap()
});
static XML_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*<([A-Za-z0-9_\-.]+)(\s+[^>]*)?>").unwrap());

fn package_reference(line: &str) -> Option<Explanation> {
    let caps = PACKAGE_REF_RE.captures(line)?;
    Some(Explanation::new(
        RuleId::PackageReference,
        format!(
            "Adds NuGet package dependency '{}' version {}",
            &caps[1], &caps[2]
        ),
    ))
}

fn manifest_tag(line: &str) -> Option<Explanation> {
    let caps = XML_TAG_RE.captures(line)?;
    Some(Explanation::new(
        RuleId::ManifestTag,
        format!(
            "XML element <{}> configuring project/build settings",
            &caps[1]
        ),
    ))
}

fn manifest_comment(line: &str) -> Option<Explanation> {
    line.trim_start()
        .starts_with("<!--")
        .then(|| Explanation::new(RuleId::ManifestComment, "XML comment"))
}
