use crate::discover::SourceFile;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectGroup {
    pub name: String,
    pub folders: Vec<FolderGroup>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FolderGroup {
    pub name: String,
    pub files: Vec<SourceFile>,
}

impl ProjectGroup {
    pub fn file_count(&self) -> usize {
        self.folders.iter().map(|f| f.files.len()).sum()
    }

    pub fn files(&self) -> impl Iterator<Item = &SourceFile> {
        self.folders.iter().flat_map(|f| f.files.iter())
    }
}

/// Partitions files into (project, folder) groups. Every input file lands in exactly one folder.
pub fn group_files(files: &[SourceFile]) -> Vec<ProjectGroup> {
    let mut tree: BTreeMap<String, BTreeMap<String, Vec<SourceFile>>> = BTreeMap::new();
    for file in files {
        tree.entry(file.project())
            .or_default()
            .entry(file.folder())
            .or_default()
            .push(file.clone());
    }

    let groups: Vec<ProjectGroup> = tree
        .into_iter()
        .map(|(name, folders)| ProjectGroup {
            name,
            folders: folders
                .into_iter()
                .map(|(name, mut files)| {
                    // Path components, matching discovery order.
                    files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
                    FolderGroup { name, files }
                })
                .collect(),
        })
        .collect();

    log::debug!(
        "Grouped {} files into {} projects",
        files.len(),
        groups.len()
    );
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;
    use crate::discover::ROOT_FOLDER;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn file(relative: &str) -> SourceFile {
        SourceFile {
            path: PathBuf::from("/repo").join(relative),
            relative_path: PathBuf::from(relative),
            extension: "cs".to_string(),
            category: Category::ProceduralCode,
        }
    }

    fn shape(groups: &[ProjectGroup]) -> Vec<(String, String, Vec<String>)> {
        groups
            .iter()
            .flat_map(|p| {
                p.folders.iter().map(move |f| {
                    (
                        p.name.clone(),
                        f.name.clone(),
                        f.files.iter().map(|s| s.display_path()).collect(),
                    )
                })
            })
            .collect()
    }

    #[test]
    fn groups_by_project_then_folder() {
        let files = vec![
            file("Web/Views/Home/Index.cs"),
            file("Api/Program.cs"),
            file("Api/Controllers/PolicyController.cs"),
            file("Api/Controllers/ClaimController.cs"),
            file("Root.cs"),
        ];
        let groups = group_files(&files);
        assert_eq!(
            shape(&groups),
            vec![
                (
                    "Api".to_string(),
                    ".".to_string(),
                    vec!["Api/Program.cs".to_string()]
                ),
                (
                    "Api".to_string(),
                    "Controllers".to_string(),
                    vec![
                        "Api/Controllers/ClaimController.cs".to_string(),
                        "Api/Controllers/PolicyController.cs".to_string(),
                    ]
                ),
                (
                    "Root.cs".to_string(),
                    ROOT_FOLDER.to_string(),
                    vec!["Root.cs".to_string()]
                ),
                (
                    "Web".to_string(),
                    "Views".to_string(),
                    vec!["Web/Views/Home/Index.cs".to_string()]
                ),
            ]
        );
    }

    #[test]
    fn grouping_is_a_partition() {
        let files: Vec<_> = [
            "A/x.cs", "A/B/y.cs", "A/B/C/z.cs", "B/w.cs", "top.cs", "A/B/y2.cs",
        ]
        .iter()
        .map(|p| file(p))
        .collect();
        let groups = group_files(&files);

        let mut grouped: Vec<_> = groups.iter().flat_map(|g| g.files()).cloned().collect();
        grouped.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
        let mut expected = files.clone();
        expected.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
        assert_eq!(grouped, expected);
        assert_eq!(groups.iter().map(|g| g.file_count()).sum::<usize>(), files.len());
    }

    #[test]
    fn empty_input_yields_no_groups() {
        assert!(group_files(&[]).is_empty());
    }
}
