//! Typed snapshot model: lessons, sections, projects and folders
//!
//! Snapshots are read-only views handed over by whatever fetched them from
//! the relational store. Field names accept both snake_case and the
//! camelCase spelling used by stored project content.
//!
//! Two folder shapes are supported:
//! - nested ([`Folder`] with `children` and `projects`), already a tree
//! - flat ([`Workspace`] with `parent_id` / `folder_id` references), turned
//!   into a tree by [`Workspace::into_forest`], which rejects cycles

use crate::tiers::{self, QualityTier};
use crate::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// One lesson, always owned by a section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    #[serde(default)]
    pub title: String,

    /// Free-form completion time, e.g. `"5m"`; missing counts as zero
    #[serde(
        default,
        alias = "completionTime",
        deserialize_with = "deserialize_completion_time",
        skip_serializing_if = "Option::is_none"
    )]
    pub completion_time: Option<String>,

    #[serde(
        default,
        alias = "qualityTier",
        deserialize_with = "tiers::deserialize_optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub quality_tier: Option<QualityTier>,

    /// Explicit rate, bypassing the tier table
    #[serde(default, alias = "customRate", skip_serializing_if = "Option::is_none")]
    pub custom_rate: Option<u32>,
}

/// A section ("module") of a project
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Section {
    #[serde(default)]
    pub title: String,

    #[serde(
        default,
        alias = "qualityTier",
        deserialize_with = "tiers::deserialize_optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub quality_tier: Option<QualityTier>,

    #[serde(default, alias = "customRate", skip_serializing_if = "Option::is_none")]
    pub custom_rate: Option<u32>,

    #[serde(default)]
    pub lessons: Vec<Lesson>,
}

/// Top-level content unit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    #[serde(default)]
    pub name: String,

    /// Containing folder, used by the flat [`Workspace`] form
    #[serde(default, alias = "folderId", skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<i64>,

    #[serde(
        default,
        alias = "qualityTier",
        deserialize_with = "tiers::deserialize_optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub quality_tier: Option<QualityTier>,

    #[serde(default, alias = "customRate", skip_serializing_if = "Option::is_none")]
    pub custom_rate: Option<u32>,

    #[serde(default, alias = "modules")]
    pub sections: Vec<Section>,
}

/// Folder in nested form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    #[serde(default)]
    pub name: String,

    /// Fallback tier for contained projects that set none
    #[serde(
        default,
        alias = "qualityTier",
        deserialize_with = "tiers::deserialize_optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub quality_tier: Option<QualityTier>,

    #[serde(default)]
    pub children: Vec<Folder>,

    #[serde(default)]
    pub projects: Vec<Project>,
}

/// Folder row in flat form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolderRecord {
    pub id: i64,

    #[serde(default)]
    pub name: String,

    #[serde(default, alias = "parentId")]
    pub parent_id: Option<i64>,

    #[serde(
        default,
        alias = "qualityTier",
        deserialize_with = "tiers::deserialize_optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub quality_tier: Option<QualityTier>,
}

/// Flat folder/project listing as returned by the relational store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workspace {
    #[serde(default)]
    pub folders: Vec<FolderRecord>,

    #[serde(default)]
    pub projects: Vec<Project>,
}

/// Nested folder trees plus projects that live outside any folder
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Forest {
    pub folders: Vec<Folder>,
    pub unfiled: Vec<Project>,
}

/// Any supported input shape, tagged by `kind`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Snapshot {
    Project(Project),
    Folder(Folder),
    Workspace(Workspace),
}

impl Snapshot {
    /// Decode a snapshot from JSON text
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read and decode a snapshot file
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}

impl Project {
    /// Number of lessons across all sections
    pub fn lesson_count(&self) -> usize {
        self.sections.iter().map(|s| s.lessons.len()).sum()
    }
}

impl Folder {
    /// Number of folders in this subtree, this one included
    pub fn folder_count(&self) -> usize {
        1 + self.children.iter().map(Folder::folder_count).sum::<usize>()
    }
}

impl Workspace {
    /// Build nested folder trees from parent references
    ///
    /// Input order of folders and projects is preserved among siblings.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if two folders share an id
    /// - `NotFound` if a folder's parent or a project's folder is missing
    /// - `CycleDetected` if following parent links revisits a folder
    pub fn into_forest(self) -> Result<Forest> {
        let mut parents: HashMap<i64, Option<i64>> = HashMap::with_capacity(self.folders.len());
        for record in &self.folders {
            if parents.insert(record.id, record.parent_id).is_some() {
                return Err(Error::InvalidInput(format!(
                    "folder {} appears more than once",
                    record.id
                )));
            }
        }

        for record in &self.folders {
            if let Some(parent) = record.parent_id {
                if !parents.contains_key(&parent) {
                    return Err(Error::NotFound(format!(
                        "parent folder {} of folder {}",
                        parent, record.id
                    )));
                }
            }
        }

        for record in &self.folders {
            check_ancestry(record.id, &parents)?;
        }

        let mut projects_of: HashMap<i64, Vec<Project>> = HashMap::new();
        let mut unfiled = Vec::new();
        for project in self.projects {
            match project.folder_id {
                Some(folder_id) if parents.contains_key(&folder_id) => {
                    projects_of.entry(folder_id).or_default().push(project);
                }
                Some(folder_id) => {
                    return Err(Error::NotFound(format!(
                        "folder {} of project {}",
                        folder_id,
                        project.id.map_or_else(|| project.name.clone(), |id| id.to_string())
                    )));
                }
                None => unfiled.push(project),
            }
        }

        let mut roots = Vec::new();
        let mut children_of: HashMap<i64, Vec<FolderRecord>> = HashMap::new();
        for record in self.folders {
            match record.parent_id {
                Some(parent) => children_of.entry(parent).or_default().push(record),
                None => roots.push(record),
            }
        }

        let folders = roots
            .into_iter()
            .map(|record| build_folder(record, &mut children_of, &mut projects_of))
            .collect();

        Ok(Forest { folders, unfiled })
    }
}

/// Follow parent links from `start`; revisiting a folder means a cycle
fn check_ancestry(start: i64, parents: &HashMap<i64, Option<i64>>) -> Result<()> {
    let mut seen = HashSet::new();
    let mut current = Some(start);
    while let Some(id) = current {
        if !seen.insert(id) {
            return Err(Error::CycleDetected(id));
        }
        current = parents.get(&id).copied().flatten();
    }
    Ok(())
}

fn build_folder(
    record: FolderRecord,
    children_of: &mut HashMap<i64, Vec<FolderRecord>>,
    projects_of: &mut HashMap<i64, Vec<Project>>,
) -> Folder {
    let children = children_of
        .remove(&record.id)
        .unwrap_or_default()
        .into_iter()
        .map(|child| build_folder(child, children_of, projects_of))
        .collect();

    Folder {
        id: Some(record.id),
        projects: projects_of.remove(&record.id).unwrap_or_default(),
        name: record.name,
        quality_tier: record.quality_tier,
        children,
    }
}

/// Completion time may be stored as text (`"5m"`) or as a bare number
///
/// Any other value (fractions, booleans, objects, out-of-range integers)
/// reads as missing so the lesson counts zero minutes instead of rejecting
/// the whole snapshot.
fn deserialize_completion_time<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawCompletion {
        Text(String),
        Minutes(i64),
        Other(serde::de::IgnoredAny),
    }

    Ok(Option::<RawCompletion>::deserialize(deserializer)?.and_then(|raw| match raw {
        RawCompletion::Text(text) => Some(text),
        RawCompletion::Minutes(minutes) => Some(minutes.to_string()),
        RawCompletion::Other(_) => None,
    }))
}
