use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Args, Debug, Clone, Default)]
pub struct ProjectConfigOpts {
    #[arg(
        value_name = "ROOT",
        help = "Directory to walk (default: current dir).",
        conflicts_with = "project_root"
    )]
    pub root: Option<PathBuf>,

    #[arg(
        long,
        help = "Specify the root directory (same as the ROOT argument).",
        help_heading = "Project Setup",
        value_name = "PATH"
    )]
    pub project_root: Option<PathBuf>,

    #[arg(
        long,
        help = "Specify path/filename of the TOML config file (default: .walkthrough/walkthrough.toml).",
        value_name = "CONFIG_FILE",
        conflicts_with = "no_config",
        help_heading = "Project Setup"
    )]
    pub config: Option<String>,

    #[arg(
        long,
        help = "Disable loading any TOML config file.",
        conflicts_with = "config",
        help_heading = "Project Setup"
    )]
    pub no_config: bool,

    #[arg(
        long,
        help = "Specify the project name (overrides config/dir name).",
        value_name = "NAME",
        help_heading = "Project Setup"
    )]
    pub project_name: Option<String>,
}

impl ProjectConfigOpts {
    pub fn root_override(&self) -> Option<&PathBuf> {
        self.project_root.as_ref().or(self.root.as_ref())
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct DiscoveryOpts {
    #[arg(long = "include-ext", value_name = "EXT", value_delimiter = ',', action = clap::ArgAction::Append, help = "Replace the extension allow-list (e.g. 'cs,json').", help_heading = "Discovery")]
    pub include_ext: Vec<String>,

    #[arg(long = "exclude-dir", value_name = "NAME", value_delimiter = ',', action = clap::ArgAction::Append, help = "Add a directory name to skip entirely.", help_heading = "Discovery")]
    pub exclude_dir: Vec<String>,

    #[arg(long, value_name = "PATTERN", action = clap::ArgAction::Append, help = "Add an exclude glob, relative to the root.", help_heading = "Discovery")]
    pub exclude: Vec<String>,

    #[arg(
        long,
        help = "Respect .gitignore/.ignore files.",
        overrides_with = "no_gitignore",
        help_heading = "Discovery"
    )]
    pub gitignore: bool,

    #[arg(
        long,
        help = "Ignore .gitignore/.ignore files [default].",
        overrides_with = "gitignore",
        help_heading = "Discovery"
    )]
    pub no_gitignore: bool,

    #[arg(long, help = "Follow symbolic links.", help_heading = "Discovery")]
    pub follow_links: bool,

    #[arg(long, help = "Skip hidden files and directories.", help_heading = "Discovery")]
    pub skip_hidden: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct FormatOutputOpts {
    #[arg(short = 'f', long, help = "Set the document format.", value_name = "FORMAT", value_parser = ["markdown", "md", "text", "txt", "json", "yaml", "yml", "xml"], help_heading = "Output Formatting")]
    pub format: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct DataFormatOpts {
    #[arg(short = 'f', long, help = "Print structured data instead of text.", value_name = "FORMAT", value_parser = ["text", "json", "yaml"], help_heading = "Output Formatting")]
    pub format: Option<String>,
}

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Generate an annotated, line-by-line walkthrough of a source tree.",
    long_about = "walkthrough scans a project directory, explains every line of every matching file \nwith a short heuristic comment, groups files by project and folder, and closes with \na summary of how the application fits together.",
    help_template = "{about-section}\nUsage: {usage}\n\n{all-args}{after-help}",
    after_help = "EXAMPLES:\n  walkthrough generate ./Auto-Insurance\n  walkthrough generate -f json --stdout\n  walkthrough explain --ext cs 'using System.Linq;'\n  walkthrough stats",
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(short, long, action = clap::ArgAction::Count, global = true, help = "Increase message verbosity (-v, -vv, -vvv).")]
    pub verbose: u8,

    #[arg(
        short,
        long,
        global = true,
        help = "Silence informational messages and warnings."
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    #[command(
        visible_alias = "g",
        visible_alias = "gen",
        about = "Generate the annotated walkthrough document."
    )]
    Generate(GenerateArgs),

    #[command(visible_alias = "e", about = "Explain individual lines of code.")]
    Explain(ExplainArgs),

    #[command(
        visible_alias = "p",
        about = "Show effective configuration and the files that would be annotated."
    )]
    Plan(PlanArgs),

    #[command(
        visible_alias = "s",
        about = "Show per-project line counts and rule usage."
    )]
    Stats(StatsArgs),

    #[command(about = "Show or save the default configuration file structure.")]
    Config(ConfigArgs),
}

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    #[clap(flatten)]
    pub project_config: ProjectConfigOpts,
    #[clap(flatten)]
    pub discovery: DiscoveryOpts,
    #[clap(flatten)]
    pub format_output: FormatOutputOpts,

    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        help = "Write the document to FILE (default: <project>_Walkthrough.<ext> in the current dir).",
        help_heading = "Output Control",
        conflicts_with = "stdout"
    )]
    pub output: Option<PathBuf>,

    #[arg(
        long,
        help = "Print the document to standard output instead of a file.",
        help_heading = "Output Control"
    )]
    pub stdout: bool,

    #[arg(
        long,
        value_name = "TITLE",
        help = "Set the document title.",
        help_heading = "Document"
    )]
    pub title: Option<String>,

    #[arg(
        long,
        help = "Omit the closing flow summary.",
        help_heading = "Document"
    )]
    pub no_narrative: bool,

    #[arg(
        long,
        help = "Omit the generation timestamp.",
        help_heading = "Document"
    )]
    pub exclude_timestamp: bool,

    #[arg(
        long,
        value_name = "DELIM",
        help = "Set the inline comment delimiter [default: ' // '].",
        allow_hyphen_values = true,
        help_heading = "Document"
    )]
    pub comment_delimiter: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct ExplainArgs {
    #[arg(
        short = 'c',
        long,
        value_name = "CATEGORY",
        help = "Category to classify under (procedural, config, manifest, plain).",
        conflicts_with = "ext",
        required_unless_present = "ext"
    )]
    pub category: Option<String>,

    #[arg(
        short = 'e',
        long,
        value_name = "EXT",
        help = "Pick the category from a file extension (e.g. cs, json, csproj)."
    )]
    pub ext: Option<String>,

    #[clap(flatten)]
    pub format_output: DataFormatOpts,

    #[arg(
        value_name = "LINE",
        help = "Lines to explain (default: read from stdin). Use -- before lines starting with '-'."
    )]
    pub lines: Vec<String>,
}

#[derive(Args, Debug, Clone)]
pub struct PlanArgs {
    #[clap(flatten)]
    pub project_config: ProjectConfigOpts,
    #[clap(flatten)]
    pub discovery: DiscoveryOpts,
    #[clap(flatten)]
    pub format_output: DataFormatOpts,
}

#[derive(Args, Debug, Clone)]
pub struct StatsArgs {
    #[clap(flatten)]
    pub project_config: ProjectConfigOpts,
    #[clap(flatten)]
    pub discovery: DiscoveryOpts,
    #[clap(flatten)]
    pub format_output: DataFormatOpts,
}

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[clap(flatten)]
    pub project_config: ProjectConfigOpts,

    #[arg(
        long,
        help = "Save the configuration to <ROOT>/.walkthrough/walkthrough.toml."
    )]
    pub save: bool,

    #[arg(long, requires = "save", help = "Overwrite an existing config file.")]
    pub force: bool,
}
