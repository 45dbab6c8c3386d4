//! Text and JSON rendering of aggregation reports for the CLI

use anyhow::Result;
use prodtime_common::aggregate::{FolderReport, ProjectReport};
use prodtime_common::human_time::{format_hours, format_minutes};
use prodtime_common::totals::AggregateTotals;
use prodtime_common::Report;
use serde_json::json;
use std::fmt::Write;

const NAME_WIDTH: usize = 40;

/// Output format for `prodtime-report`
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

/// Render a report in the requested format
pub fn render(report: &Report, format: OutputFormat, with_tiers: bool) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(render_table(report, with_tiers)),
        OutputFormat::Json => render_json(report, with_tiers),
    }
}

/// Pretty JSON with a generation timestamp
pub fn render_json(report: &Report, with_tiers: bool) -> Result<String> {
    let totals = report.totals();
    let mut document = json!({
        "generated_at": chrono::Utc::now().to_rfc3339(),
        "completion_hours": totals.completion_hours(),
        "production_hours": totals.production_hours(),
        "report": report,
    });
    if with_tiers {
        document["tier_breakdown"] = serde_json::to_value(totals.tier_breakdown())?;
    }
    Ok(serde_json::to_string_pretty(&document)?)
}

/// Indented table: folders end with `/`, projects and sections nest below
pub fn render_table(report: &Report, with_tiers: bool) -> String {
    let mut out = String::new();
    header(&mut out);

    match report {
        Report::Project(project) => project_rows(&mut out, project, 0),
        Report::Folder(folder) => folder_rows(&mut out, folder, 0),
        Report::Workspace(forest) => {
            for folder in &forest.folders {
                folder_rows(&mut out, folder, 0);
            }
            for project in &forest.unfiled {
                project_rows(&mut out, project, 0);
            }
            row(&mut out, "TOTAL", 0, &forest.totals);
        }
    }

    if with_tiers {
        tier_rows(&mut out, report.totals());
    }
    out
}

fn header(out: &mut String) {
    let _ = writeln!(
        out,
        "{:<width$}{:>8}{:>9}{:>12}{:>14}{:>10}",
        "NAME",
        "LESSONS",
        "MODULES",
        "COMPLETION",
        "PRODUCTION",
        "HOURS",
        width = NAME_WIDTH
    );
}

fn row(out: &mut String, name: &str, depth: usize, totals: &AggregateTotals) {
    let mut label = format!("{}{}", "  ".repeat(depth), name);
    if label.chars().count() > NAME_WIDTH - 1 {
        label = label.chars().take(NAME_WIDTH - 2).collect::<String>() + "…";
    }
    let _ = writeln!(
        out,
        "{:<width$}{:>8}{:>9}{:>12}{:>14}{:>10}",
        label,
        totals.lesson_count,
        totals.module_count,
        format_minutes(totals.completion_minutes),
        format_minutes(totals.production_minutes),
        format_hours(totals.production_minutes),
        width = NAME_WIDTH
    );
}

fn folder_rows(out: &mut String, folder: &FolderReport, depth: usize) {
    row(out, &format!("{}/", folder.name), depth, &folder.totals);
    for child in &folder.children {
        folder_rows(out, child, depth + 1);
    }
    for project in &folder.projects {
        project_rows(out, project, depth + 1);
    }
}

fn project_rows(out: &mut String, project: &ProjectReport, depth: usize) {
    row(out, &project.name, depth, &project.totals);
    for section in &project.sections {
        row(out, &section.title, depth + 1, &section.totals);
    }
}

fn tier_rows(out: &mut String, totals: &AggregateTotals) {
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{:<14}{:>12}{:>14}{:>10}{:>8}",
        "TIER", "COMPLETION", "PRODUCTION", "HOURS", "SHARE"
    );
    for line in totals.tier_breakdown() {
        let _ = writeln!(
            out,
            "{:<14}{:>12}{:>14}{:>10}{:>7.1}%",
            line.tier.as_str(),
            format_minutes(line.completion_minutes),
            format_minutes(line.production_minutes),
            format_hours(line.production_minutes),
            line.share_percent
        );
    }
}
