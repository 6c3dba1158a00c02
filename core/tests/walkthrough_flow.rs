use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use walkthrough_core::{
    Category, Config, OutputFormat, RuleId, Walkthrough, discover_files, group_files, render,
    split_lines, write_document,
};

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// A small two-project solution with build output and VCS noise that must be skipped.
fn fixture() -> TempDir {
    let temp = TempDir::new().expect("tempdir");
    let root = temp.path();
    write(
        root,
        "Api/Controllers/PolicyController.cs",
        "using System.Linq;\n\nnamespace Api.Controllers\n{\n    [ApiController]\n    [Route(\"api/[controller]\")]\n    public class PolicyController : ControllerBase\n    {\n        [HttpGet(\"/policies/{id}\")]\n        public IActionResult Get(int id)\n        {\n            Console.WriteLine(id);\n            return Json(_policyService.Find(id));\n        }\n    }\n}\n",
    );
    write(
        root,
        "Api/appsettings.json",
        "{\n  \"ConnectionString\": \"Server=.;Database=Cars;\"\n}\n",
    );
    write(
        root,
        "Api/Api.csproj",
        "<Project Sdk=\"Microsoft.NET.Sdk.Web\">\n  <ItemGroup>\n    <PackageReference Include=\"Newtonsoft.Json\" Version=\"13.0.1\" />\n  </ItemGroup>\n</Project>\n",
    );
    write(
        root,
        "Web/Views/Home/Index.cshtml",
        "@model HomeViewModel\n<h1>Welcome</h1>\n@if (Model.Items.Any()) {\n",
    );
    write(root, "Web/bin/Debug/Generated.cs", "class Generated {}\n");
    write(root, "Api/obj/project.assets.json", "{}\n");
    write(root, ".git/config.json", "{}\n");
    write(root, "node_modules/pkg/index.json", "{}\n");
    write(root, "README.md", "# not included\n");
    write(root, "global.json", "{\n}\n");
    temp
}

fn no_timestamp_config() -> Config {
    let mut config = Config::default();
    config.output.include_timestamp = false;
    config
}

#[test]
fn excluded_directories_are_never_walked() {
    let temp = fixture();
    let discovery = discover_files(temp.path(), &Config::default().discovery).unwrap();
    let paths: Vec<_> = discovery.files.iter().map(|f| f.display_path()).collect();
    assert_eq!(
        paths,
        vec![
            "Api/Api.csproj",
            "Api/Controllers/PolicyController.cs",
            "Api/appsettings.json",
            "Web/Views/Home/Index.cshtml",
            "global.json",
        ]
    );
    assert!(discovery.warnings.is_empty());
    for file in &discovery.files {
        for segment in file.relative_path.components() {
            let name = segment.as_os_str().to_string_lossy();
            assert!(!["bin", "obj", ".git", "node_modules"].contains(&name.as_ref()));
        }
    }
}

#[test]
fn discovery_and_grouping_are_idempotent() {
    let temp = fixture();
    let config = Config::default();
    let first = discover_files(temp.path(), &config.discovery).unwrap();
    let second = discover_files(temp.path(), &config.discovery).unwrap();
    assert_eq!(first.files, second.files);
    assert_eq!(group_files(&first.files), group_files(&second.files));
}

#[test]
fn grouping_partitions_discovered_files() {
    let temp = fixture();
    let discovery = discover_files(temp.path(), &Config::default().discovery).unwrap();
    let groups = group_files(&discovery.files);

    let names: Vec<_> = groups.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, vec!["Api", "Web", "global.json"]);
    let api_folders: Vec<_> = groups[0].folders.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(api_folders, vec![".", "Controllers"]);

    let total: usize = groups.iter().map(|g| g.file_count()).sum();
    assert_eq!(total, discovery.files.len());
}

#[test]
fn every_line_gets_one_explanation() {
    let temp = fixture();
    let config = no_timestamp_config();
    let discovery = discover_files(temp.path(), &config.discovery).unwrap();
    let doc = Walkthrough::build(temp.path(), &config, &group_files(&discovery.files));

    assert_eq!(doc.file_count(), discovery.files.len());
    for file in doc.files() {
        let on_disk = fs::read_to_string(temp.path().join(&file.path)).unwrap();
        assert_eq!(file.lines.len(), split_lines(&on_disk).len(), "{}", file.path);
        assert!(file.lines.iter().all(|l| !l.explanation.is_empty()));
    }
}

#[test]
fn scenario_lines_are_explained() {
    let temp = fixture();
    let config = no_timestamp_config();
    let discovery = discover_files(temp.path(), &config.discovery).unwrap();
    let doc = Walkthrough::build(temp.path(), &config, &group_files(&discovery.files));

    let file = |path: &str| doc.files().find(|f| f.path == path).unwrap();

    let controller = file("Api/Controllers/PolicyController.cs");
    assert_eq!(controller.category, Category::ProceduralCode);
    assert_eq!(controller.lines[0].rule, RuleId::Import);
    assert!(controller.lines[0].explanation.contains("System.Linq"));
    assert_eq!(controller.lines[1].explanation, "Blank line for readability");
    assert_eq!(controller.lines[4].rule, RuleId::ControllerMarker);
    assert_eq!(controller.lines[5].rule, RuleId::RouteMarker);
    assert_eq!(controller.lines[8].rule, RuleId::HttpVerbMarker);
    assert!(controller.lines[8].explanation.contains("HttpGet"));
    assert!(controller.lines[8].explanation.contains("/policies/{id}"));
    assert_eq!(controller.lines[11].rule, RuleId::CodeFallback);
    assert_eq!(controller.lines[12].rule, RuleId::ReturnJson);

    let settings = file("Api/appsettings.json");
    assert_eq!(settings.lines[1].rule, RuleId::ConfigKey);
    assert!(settings.lines[1].explanation.contains("ConnectionString"));

    let manifest = file("Api/Api.csproj");
    assert_eq!(manifest.lines[2].rule, RuleId::PackageReference);
    assert!(manifest.lines[2].explanation.contains("Newtonsoft.Json"));
    assert!(manifest.lines[2].explanation.contains("13.0.1"));

    let view = file("Web/Views/Home/Index.cshtml");
    assert_eq!(view.lines[0].rule, RuleId::TemplateModel);
    assert_eq!(view.lines[1].rule, RuleId::Markup);
    assert_eq!(view.lines[2].rule, RuleId::TemplateConditional);
}

#[test]
fn widened_allow_list_classifies_plain_text() {
    let temp = fixture();
    let mut config = no_timestamp_config();
    config.discovery.include_extensions.push("md".into());
    let discovery = discover_files(temp.path(), &config.discovery).unwrap();
    let doc = Walkthrough::build(temp.path(), &config, &group_files(&discovery.files));
    let readme = doc.files().find(|f| f.path == "README.md").unwrap();
    assert_eq!(readme.category, Category::PlainText);
    assert_eq!(readme.lines[0].rule, RuleId::TextFallback);
}

#[test]
fn markdown_document_is_written() {
    let temp = fixture();
    let config = no_timestamp_config();
    let discovery = discover_files(temp.path(), &config.discovery).unwrap();
    let doc = Walkthrough::build(temp.path(), &config, &group_files(&discovery.files));
    let content = render(&doc, OutputFormat::Markdown, &config.output.comment_delimiter).unwrap();

    let out = temp.path().join("out/Walkthrough.md");
    write_document(&out, &content).unwrap();
    let written = fs::read_to_string(&out).unwrap();

    assert!(written.starts_with("# ASP.NET Core Project Walkthrough"));
    let project_pos = written.find("## Project: Api").unwrap();
    let web_pos = written.find("## Project: Web").unwrap();
    let flow_pos = written.find("## Application Working Flow Summary").unwrap();
    assert!(project_pos < web_pos && web_pos < flow_pos);
    assert!(written.contains("#### File: Api/appsettings.json"));
    assert!(written.contains("- Controllers depend on Services via constructor injection (DI)."));
}

#[test]
fn rendering_is_deterministic_without_timestamp() {
    let temp = fixture();
    let config = no_timestamp_config();
    let run = || {
        let discovery = discover_files(temp.path(), &config.discovery).unwrap();
        let doc = Walkthrough::build(temp.path(), &config, &group_files(&discovery.files));
        render(&doc, OutputFormat::Json, " // ").unwrap()
    };
    assert_eq!(run(), run());
}

#[cfg(unix)]
#[test]
fn unreadable_file_becomes_placeholder() {
    use std::os::unix::fs::PermissionsExt;

    let temp = fixture();
    let locked = temp.path().join("Api/Controllers/PolicyController.cs");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
    // Root ignores permission bits; nothing to observe then.
    if fs::read(&locked).is_ok() {
        return;
    }

    let config = no_timestamp_config();
    let discovery = discover_files(temp.path(), &config.discovery).unwrap();
    let doc = Walkthrough::build(temp.path(), &config, &group_files(&discovery.files));
    let section = doc
        .files()
        .find(|f| f.path == "Api/Controllers/PolicyController.cs")
        .unwrap();
    assert!(section.lines.is_empty());
    assert!(
        section
            .error
            .as_deref()
            .unwrap()
            .starts_with("[Could not read file due to error:")
    );
    assert_eq!(doc.unreadable_files().count(), 1);
    assert!(doc.files().filter(|f| f.error.is_none()).count() >= 4);
}
