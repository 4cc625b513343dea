use super::exec::HeatmapReport;
use super::Aggregation;
use crate::config::Config;
use crate::model::{DayEntry, HeatmapOutput, SCHEMA_VERSION};
use anyhow::Result;
use chrono::{DateTime, Utc};
use console::style;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Writes the document, creating missing parent directories.
pub fn write_svg(path: &Path, svg: &str) -> crate::error::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, svg)?;
    Ok(())
}

fn day_entries(aggregation: &Aggregation) -> Vec<DayEntry> {
    aggregation
        .tally
        .iter()
        .filter(|(_, count)| *count > 0)
        .map(|(date, commit_count)| DayEntry { date, commit_count })
        .collect()
}

/// The `--json` document for one run.
pub fn build_output(report: &HeatmapReport, config: &Config, generated_at: DateTime<Utc>) -> HeatmapOutput {
    HeatmapOutput {
        version: SCHEMA_VERSION,
        generated_at,
        organization: config.organization.clone(),
        window: report.window,
        output_path: config.output.to_string_lossy().to_string(),
        total_commits: report.aggregation.total_commits(),
        days: day_entries(&report.aggregation),
        repositories: report.aggregation.repositories.clone(),
    }
}

pub fn output_json(report: &HeatmapReport, config: &Config) -> Result<()> {
    let output = build_output(report, config, Utc::now());
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// One compact JSON object per active day, oldest first.
pub fn write_ndjson<W: Write>(mut writer: W, aggregation: &Aggregation) -> Result<()> {
    for entry in day_entries(aggregation) {
        serde_json::to_writer(&mut writer, &entry)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

pub fn output_ndjson(aggregation: &Aggregation) -> Result<()> {
    write_ndjson(io::stdout().lock(), aggregation)
}

pub fn output_summary(report: &HeatmapReport, config: &Config) -> Result<()> {
    let aggregation = &report.aggregation;

    println!("{}", style("Azure DevOps Commit Heatmap").bold());
    println!("{}", "─".repeat(50));
    println!("Organization: {}", style(&config.organization).cyan());
    println!(
        "Window: {} to {}",
        style(report.window.start).dim(),
        style(report.window.end).dim()
    );
    println!("Total commits: {}", style(aggregation.total_commits()).green());
    println!("Active days: {}", style(aggregation.tally.active_days()).green());
    if let Some((date, count)) = aggregation.tally.iter().max_by_key(|(d, c)| (*c, std::cmp::Reverse(*d))) {
        if count > 0 {
            println!("Busiest day: {} ({} commits)", style(date).yellow(), count);
        }
    }

    if !aggregation.repositories.is_empty() {
        println!("\n{}", style("Repositories").bold());
        for repo in aggregation.repositories.iter().take(10) {
            println!("  {:<50} {:>6}", format!("{}/{}", repo.project, repo.repository), repo.commit_count);
        }
        if aggregation.repositories.len() > 10 {
            println!("  ... and {} more", aggregation.repositories.len() - 10);
        }
    }

    println!("\nSaved to {}", style(config.output.display()).cyan());
    Ok(())
}
