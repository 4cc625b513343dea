use crate::error::{HeatmapError, Result};
use crate::model::AuthorFilter;
use clap::ValueEnum;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://dev.azure.com";
pub const DEFAULT_OUTPUT_FILE: &str = "commits-heatmap.svg";
pub const DEFAULT_WINDOW_DAYS: u32 = 365;
pub const MAX_WINDOW_DAYS: u32 = 3660;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// How commit counts map onto color buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Scale {
    /// Absolute thresholds: 0, 1-3, 4-6, 7-9, 10+.
    #[default]
    Fixed,
    /// Quartiles of the busiest day in the window.
    Relative,
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scale::Fixed => f.write_str("fixed"),
            Scale::Relative => f.write_str("relative"),
        }
    }
}

/// Everything one run needs, resolved once and handed to each stage.
#[derive(Clone)]
pub struct Config {
    pub organization: String,
    pub author_emails: AuthorFilter,
    pub access_token: String,
    pub window_days: u32,
    pub output: PathBuf,
    pub base_url: String,
    pub scale: Scale,
    pub timeout: Duration,
}

impl Config {
    pub fn new(organization: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            organization: organization.into(),
            author_emails: AuthorFilter::default(),
            access_token: access_token.into(),
            window_days: DEFAULT_WINDOW_DAYS,
            output: PathBuf::from(DEFAULT_OUTPUT_FILE),
            base_url: DEFAULT_BASE_URL.to_string(),
            scale: Scale::Fixed,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_authors(mut self, authors: AuthorFilter) -> Self {
        self.author_emails = authors;
        self
    }

    pub fn with_window_days(mut self, days: u32) -> Self {
        self.window_days = days;
        self
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_scale(mut self, scale: Scale) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Rejects configurations that cannot produce a meaningful run.
    pub fn validate(&self) -> Result<()> {
        if self.organization.trim().is_empty() {
            return Err(HeatmapError::Config(
                "AZURE_ORG environment variable is not set".to_string(),
            ));
        }
        if self.access_token.trim().is_empty() {
            return Err(HeatmapError::Config(
                "AZURE_DEVOPS_PAT environment variable is not set".to_string(),
            ));
        }
        if self.window_days == 0 || self.window_days > MAX_WINDOW_DAYS {
            return Err(HeatmapError::Config(format!(
                "HEATMAP_WINDOW_DAYS must be between 1 and {MAX_WINDOW_DAYS}, got {}",
                self.window_days
            )));
        }
        if !(self.base_url.starts_with("https://") || self.base_url.starts_with("http://")) {
            return Err(HeatmapError::Config(format!(
                "AZURE_DEVOPS_URL must be an http(s) URL, got '{}'",
                self.base_url
            )));
        }
        Ok(())
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("organization", &self.organization)
            .field("author_emails", &self.author_emails)
            .field("access_token", &"<redacted>")
            .field("window_days", &self.window_days)
            .field("output", &self.output)
            .field("base_url", &self.base_url)
            .field("scale", &self.scale)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> Config {
        Config::new("acme", "secret-token")
    }

    #[test]
    fn defaults_follow_the_daily_job() {
        let cfg = valid();
        assert_eq!(cfg.window_days, 365);
        assert_eq!(cfg.output, PathBuf::from("commits-heatmap.svg"));
        assert_eq!(cfg.base_url, "https://dev.azure.com");
        assert_eq!(cfg.scale, Scale::Fixed);
        assert!(cfg.author_emails.is_unrestricted());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn missing_token_is_rejected() {
        let err = Config::new("acme", "  ").validate().unwrap_err();
        assert!(err.to_string().contains("AZURE_DEVOPS_PAT"));
    }

    #[test]
    fn missing_organization_is_rejected() {
        let err = Config::new("", "t").validate().unwrap_err();
        assert!(err.to_string().contains("AZURE_ORG"));
    }

    #[test]
    fn window_must_be_in_range() {
        assert!(valid().with_window_days(0).validate().is_err());
        assert!(valid().with_window_days(MAX_WINDOW_DAYS + 1).validate().is_err());
        assert!(valid().with_window_days(30).validate().is_ok());
    }

    #[test]
    fn base_url_must_be_http() {
        assert!(valid().with_base_url("dev.azure.com").validate().is_err());
        assert!(valid().with_base_url("http://localhost:8080").validate().is_ok());
    }

    #[test]
    fn debug_output_never_contains_the_token() {
        let rendered = format!("{:?}", valid());
        assert!(!rendered.contains("secret-token"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn scale_values_match_their_display_names() {
        assert_eq!(Scale::from_str("Relative", true).unwrap(), Scale::Relative);
        assert_eq!(Scale::from_str("fixed", false).unwrap(), Scale::Fixed);
        assert!(Scale::from_str("log", true).is_err());
        for scale in Scale::value_variants() {
            let name = scale.to_possible_value().unwrap();
            assert_eq!(name.get_name(), scale.to_string());
        }
    }
}
