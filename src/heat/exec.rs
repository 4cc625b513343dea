use super::{aggregate_commits, enumerate_repositories, output_json, output_ndjson, output_summary, write_svg, Aggregation};
use crate::azure::{AzureClient, DevOpsApi};
use crate::config::Config;
use crate::model::DateWindow;
use crate::render::render_heatmap;
use anyhow::Context;
use chrono::Utc;
use tracing::{info, warn};

/// Everything one pass produced.
#[derive(Debug, Clone)]
pub struct HeatmapReport {
    pub window: DateWindow,
    pub aggregation: Aggregation,
    pub svg: String,
}

pub fn exec(config: &Config, json: bool, ndjson: bool) -> anyhow::Result<()> {
    let client = AzureClient::new(config).context("Failed to create Azure DevOps client")?;

    let today = Utc::now().date_naive();
    let window = DateWindow::trailing(today, config.window_days)
        .context("Failed to resolve date window")?;

    // Progress goes to stderr; keep it off when stdout carries machine output
    let report = run_pipeline(&client, config, &window, !json && !ndjson)?;

    write_svg(&config.output, &report.svg)
        .with_context(|| format!("Failed to write {}", config.output.display()))?;
    info!(path = %config.output.display(), "saved heatmap");

    if json {
        output_json(&report, config)?;
    } else if ndjson {
        output_ndjson(&report.aggregation)?;
    } else {
        output_summary(&report, config)?;
    }

    Ok(())
}

/// Enumerate, aggregate, render. Nothing is written to disk.
pub fn run_pipeline(
    api: &dyn DevOpsApi,
    config: &Config,
    window: &DateWindow,
    show_progress: bool,
) -> anyhow::Result<HeatmapReport> {
    info!(
        organization = %config.organization,
        window_start = %window.start,
        window_end = %window.end,
        "collecting commit activity"
    );
    if config.author_emails.is_unrestricted() {
        warn!("AUTHOR_EMAILS is empty, counting commits from every author");
    } else {
        info!(authors = config.author_emails.len(), "filtering by author email");
    }

    let repos = enumerate_repositories(api).context("Failed to enumerate repositories")?;

    let aggregation = aggregate_commits(api, &repos, &config.author_emails, window, show_progress)
        .context("Failed to aggregate commits")?;
    info!(
        commits = aggregation.total_commits(),
        active_days = aggregation.tally.active_days(),
        "aggregated commits"
    );

    let svg = render_heatmap(&aggregation.tally, window, config.scale);

    Ok(HeatmapReport {
        window: *window,
        aggregation,
        svg,
    })
}
