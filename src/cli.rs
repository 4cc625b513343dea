use crate::config::{
    Config, Scale, DEFAULT_BASE_URL, DEFAULT_OUTPUT_FILE, DEFAULT_TIMEOUT_SECS,
    DEFAULT_WINDOW_DAYS,
};
use crate::model::AuthorFilter;
use anyhow::Result;
use clap::{Args, Parser};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "ado-heatmap")]
#[command(about = "Render Azure DevOps commit activity as a GitHub-style SVG heatmap")]
#[command(version)]
pub struct Cli {
    #[clap(flatten)]
    pub common: CommonArgs,

    #[arg(long, help = "Print a JSON summary of the tally to stdout")]
    pub json: bool,

    #[arg(long, help = "Print one JSON line per active day to stdout")]
    pub ndjson: bool,
}

#[derive(Args, Clone)]
pub struct CommonArgs {
    #[arg(long, env = "AZURE_ORG", help = "Azure DevOps organization name")]
    pub org: Option<String>,

    #[arg(long, env = "AZURE_DEVOPS_PAT", hide_env_values = true, help = "Personal access token")]
    pub token: Option<String>,

    #[arg(long, env = "AUTHOR_EMAILS", help = "Comma-separated author emails to count")]
    pub authors: Option<String>,

    #[arg(long, env = "HEATMAP_WINDOW_DAYS", default_value_t = DEFAULT_WINDOW_DAYS, help = "Trailing window length in days")]
    pub window_days: u32,

    #[arg(long, env = "OUTPUT_FILE", default_value = DEFAULT_OUTPUT_FILE, help = "Path of the SVG to write")]
    pub output: PathBuf,

    #[arg(long, env = "AZURE_DEVOPS_URL", default_value = DEFAULT_BASE_URL, help = "Azure DevOps base URL")]
    pub base_url: String,

    #[arg(long, env = "HEATMAP_SCALE", value_enum, ignore_case = true, default_value_t = Scale::Fixed, help = "Color scale")]
    pub scale: Scale,

    #[arg(long, env = "AZURE_HTTP_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS, help = "Per-request timeout in seconds")]
    pub timeout_secs: u64,
}

impl CommonArgs {
    pub fn into_config(self) -> Result<Config> {
        let config = Config::new(
            self.org.unwrap_or_default(),
            self.token.unwrap_or_default(),
        )
        .with_authors(AuthorFilter::parse(self.authors.as_deref().unwrap_or("")))
        .with_window_days(self.window_days)
        .with_output(self.output)
        .with_base_url(self.base_url.trim_end_matches('/'))
        .with_scale(self.scale)
        .with_timeout(Duration::from_secs(self.timeout_secs));
        config.validate()?;
        Ok(config)
    }
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn execute(self) -> Result<()> {
        let config = self.common.into_config()?;
        crate::heat::exec(&config, self.json, self.ndjson)
    }
}
