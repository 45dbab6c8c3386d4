//! Recursive aggregation of production time
//!
//! Walks project → sections → lessons and folder → subfolders → projects,
//! producing a report per node with its `AggregateTotals`. Aggregation is a
//! pure read of the snapshot: nothing is mutated or cached, so repeated and
//! concurrent calls on the same snapshot return identical results.
//!
//! Lesson-level problems never abort a rollup. A missing or malformed
//! completion time contributes zero minutes, and the lesson is still counted.

use crate::completion::{parse_optional_minutes, production_minutes};
use crate::resolver::{resolve, resolve_chain, RateOverride, RateSource, ResolvedRate};
use crate::tiers::QualityTier;
use crate::totals::AggregateTotals;
use crate::tree::{Folder, Forest, Lesson, Project, Section, Snapshot};
use crate::{Error, Result};
use serde::Serialize;
use std::collections::HashSet;
use tracing::trace;

/// Calculation result for a single lesson
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LessonReport {
    pub title: String,
    pub completion_minutes: u32,
    pub production_minutes: u64,
    #[serde(flatten)]
    pub resolved: ResolvedRate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionReport {
    pub title: String,
    pub totals: AggregateTotals,
    pub lessons: Vec<LessonReport>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub totals: AggregateTotals,
    pub sections: Vec<SectionReport>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FolderReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    /// Tier applied to contained projects that set none (own or inherited)
    pub default_tier: Option<QualityTier>,
    /// Direct projects only
    pub own_totals: AggregateTotals,
    /// Direct projects plus the full rollup of every child folder
    pub totals: AggregateTotals,
    pub projects: Vec<ProjectReport>,
    pub children: Vec<FolderReport>,
}

/// Rollup of a whole workspace: every root folder plus unfiled projects
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForestReport {
    pub totals: AggregateTotals,
    pub folders: Vec<FolderReport>,
    pub unfiled: Vec<ProjectReport>,
}

/// Report for any snapshot kind
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Report {
    Project(ProjectReport),
    Folder(FolderReport),
    Workspace(ForestReport),
}

impl Report {
    /// Totals of the snapshot's top node
    pub fn totals(&self) -> &AggregateTotals {
        match self {
            Report::Project(report) => &report.totals,
            Report::Folder(report) => &report.totals,
            Report::Workspace(report) => &report.totals,
        }
    }
}

/// Aggregate one lesson within its hierarchy
pub fn aggregate_lesson(
    lesson: &Lesson,
    section: &Section,
    project: &Project,
    folder_default: Option<QualityTier>,
) -> LessonReport {
    let resolved = resolve(lesson, section, project, folder_default);
    let completion_minutes = parse_optional_minutes(lesson.completion_time.as_deref());

    LessonReport {
        title: lesson.title.clone(),
        completion_minutes,
        production_minutes: production_minutes(completion_minutes, resolved.rate),
        resolved,
    }
}

/// Calculate a lesson on its own, outside any section or project
///
/// Only the lesson's own overrides apply; otherwise the global default tier.
pub fn preview_lesson(lesson: &Lesson) -> LessonReport {
    let resolved = resolve_chain(&[(RateSource::Lesson, lesson as &dyn RateOverride)], None);
    let completion_minutes = parse_optional_minutes(lesson.completion_time.as_deref());

    LessonReport {
        title: lesson.title.clone(),
        completion_minutes,
        production_minutes: production_minutes(completion_minutes, resolved.rate),
        resolved,
    }
}

/// Aggregate a section: the sum of its lessons
///
/// Sections are modules; they are counted by the enclosing project.
pub fn aggregate_section(
    section: &Section,
    project: &Project,
    folder_default: Option<QualityTier>,
) -> SectionReport {
    let mut totals = AggregateTotals::new();
    let lessons: Vec<LessonReport> = section
        .lessons
        .iter()
        .map(|lesson| aggregate_lesson(lesson, section, project, folder_default))
        .collect();

    for lesson in &lessons {
        totals.add_lesson(
            lesson.resolved.tier,
            lesson.completion_minutes,
            lesson.production_minutes,
        );
    }

    SectionReport {
        title: section.title.clone(),
        totals,
        lessons,
    }
}

/// Aggregate a project: the sum of its sections, one module per section
pub fn aggregate_project(project: &Project, folder_default: Option<QualityTier>) -> ProjectReport {
    let sections: Vec<SectionReport> = project
        .sections
        .iter()
        .map(|section| aggregate_section(section, project, folder_default))
        .collect();

    let mut totals: AggregateTotals = sections.iter().map(|s| &s.totals).sum();
    totals.add_modules(project.sections.len());

    trace!(
        "Project '{}': {} lessons, {} production minutes",
        project.name,
        totals.lesson_count,
        totals.production_minutes
    );

    ProjectReport {
        id: project.id,
        name: project.name.clone(),
        totals,
        sections,
    }
}

/// Aggregate a folder subtree without structural checks
///
/// The tree is assumed acyclic. Use [`aggregate_folder_checked`] for trees
/// whose folder ids have not been validated.
pub fn aggregate_folder(folder: &Folder) -> FolderReport {
    aggregate_folder_within(folder, None)
}

/// Aggregate a folder that sits below folders with their own default tier
///
/// A folder without a tier inherits `inherited_tier` from its nearest
/// ancestor that sets one.
pub fn aggregate_folder_within(folder: &Folder, inherited_tier: Option<QualityTier>) -> FolderReport {
    let default_tier = folder.quality_tier.or(inherited_tier);

    let projects: Vec<ProjectReport> = folder
        .projects
        .iter()
        .map(|project| aggregate_project(project, default_tier))
        .collect();
    let children: Vec<FolderReport> = folder
        .children
        .iter()
        .map(|child| aggregate_folder_within(child, default_tier))
        .collect();

    let own_totals: AggregateTotals = projects.iter().map(|p| &p.totals).sum();
    let mut totals = own_totals.clone();
    for child in &children {
        totals.absorb(&child.totals);
    }

    FolderReport {
        id: folder.id,
        name: folder.name.clone(),
        default_tier,
        own_totals,
        totals,
        projects,
        children,
    }
}

/// Aggregate a folder subtree after checking that no folder id repeats
///
/// # Errors
///
/// - `CycleDetected` if a folder id reappears below itself
/// - `InvalidInput` if a folder id appears in two separate branches
pub fn aggregate_folder_checked(folder: &Folder) -> Result<FolderReport> {
    check_folder_tree(folder, &mut Vec::new(), &mut HashSet::new())?;
    Ok(aggregate_folder(folder))
}

fn check_folder_tree(folder: &Folder, path: &mut Vec<i64>, seen: &mut HashSet<i64>) -> Result<()> {
    if let Some(id) = folder.id {
        if path.contains(&id) {
            return Err(Error::CycleDetected(id));
        }
        if !seen.insert(id) {
            return Err(Error::InvalidInput(format!(
                "folder {} appears more than once",
                id
            )));
        }
        path.push(id);
    }

    for child in &folder.children {
        check_folder_tree(child, path, seen)?;
    }

    if folder.id.is_some() {
        path.pop();
    }
    Ok(())
}

/// Aggregate every root folder and every unfiled project
pub fn aggregate_forest(forest: &Forest) -> ForestReport {
    let folders: Vec<FolderReport> = forest.folders.iter().map(aggregate_folder).collect();
    let unfiled: Vec<ProjectReport> = forest
        .unfiled
        .iter()
        .map(|project| aggregate_project(project, None))
        .collect();

    let totals: AggregateTotals = folders
        .iter()
        .map(|f| &f.totals)
        .chain(unfiled.iter().map(|p| &p.totals))
        .sum();

    ForestReport {
        totals,
        folders,
        unfiled,
    }
}

/// Aggregate any snapshot kind
///
/// Folder snapshots are checked for repeated ids; workspace snapshots are
/// turned into a forest first, which rejects cycles and dangling references.
pub fn aggregate(snapshot: &Snapshot) -> Result<Report> {
    match snapshot {
        Snapshot::Project(project) => Ok(Report::Project(aggregate_project(project, None))),
        Snapshot::Folder(folder) => Ok(Report::Folder(aggregate_folder_checked(folder)?)),
        Snapshot::Workspace(workspace) => {
            let forest = workspace.clone().into_forest()?;
            Ok(Report::Workspace(aggregate_forest(&forest)))
        }
    }
}
