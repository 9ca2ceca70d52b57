// Projects already present in the storage root.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProjectKind {
    /// Packed `.sb3` archive
    Archive,
    /// Unpacked project directory containing `project.json`
    Unpacked,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProjectEntry {
    pub name: String,
    pub path: PathBuf,
    pub kind: ProjectKind,
    pub size: u64,
}

/// List the projects the engine can open from `root`, sorted by name.
///
/// A root that does not exist yet has no projects.
pub fn list_projects(root: &Path) -> Result<Vec<ProjectEntry>> {
    if !root.exists() {
        return Ok(Vec::new());
    }

    let mut entries = Vec::new();
    for entry in std::fs::read_dir(root).with_context(|| format!("failed to list {}", root.display()))? {
        let entry = entry?;
        let path = entry.path();
        let meta = entry.metadata()?;
        let name = entry.file_name().to_string_lossy().into_owned();

        let kind = if meta.is_dir() {
            if !path.join("project.json").is_file() {
                continue;
            }
            ProjectKind::Unpacked
        } else if is_archive(&path) {
            ProjectKind::Archive
        } else {
            continue;
        };

        entries.push(ProjectEntry {
            name,
            path,
            kind,
            size: meta.len(),
        });
    }
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

fn is_archive(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "sb3")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_archives_and_unpacked_projects() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.sb3"), "bb").unwrap();
        std::fs::write(dir.path().join("a.sb3"), "a").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "skip").unwrap();
        std::fs::write(dir.path().join("a.sb3.json"), "{}").unwrap();
        std::fs::create_dir(dir.path().join("unpacked")).unwrap();
        std::fs::write(dir.path().join("unpacked").join("project.json"), "{}").unwrap();
        std::fs::create_dir(dir.path().join("empty_dir")).unwrap();

        let projects = list_projects(dir.path()).unwrap();
        let names: Vec<&str> = projects.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["a.sb3", "b.sb3", "unpacked"]);
        assert_eq!(projects[1].size, 2);
        assert_eq!(projects[2].kind, ProjectKind::Unpacked);
    }

    #[test]
    fn missing_root_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(list_projects(&dir.path().join("nope")).unwrap().is_empty());
    }
}
