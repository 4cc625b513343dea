use crate::error::{HeatmapError, Result};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

pub const SCHEMA_VERSION: u32 = 1;

/// Envelope used by every Azure DevOps list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ListResponse<T> {
    #[serde(default)]
    pub count: usize,
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Project {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Repository {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub is_disabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GitUserDate {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Commit {
    pub commit_id: String,
    pub author: GitUserDate,
    #[serde(default)]
    pub committer: Option<GitUserDate>,
}

impl Commit {
    /// Calendar day the commit is attributed to: the author date in UTC.
    pub fn day(&self) -> NaiveDate {
        self.author.date.date_naive()
    }
}

/// A repository together with the project that owns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub project: String,
    pub repository: Repository,
}

/// Inclusive range of calendar days covered by one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(HeatmapError::InvalidDate(format!(
                "Invalid window: start ({start}) is after end ({end})"
            )));
        }
        Ok(Self { start, end })
    }

    /// The `days`-long window ending on `today`.
    pub fn trailing(today: NaiveDate, days: u32) -> Result<Self> {
        if days == 0 {
            return Err(HeatmapError::InvalidDate(
                "Window must cover at least one day".to_string(),
            ));
        }
        let start = today
            .checked_sub_signed(Duration::days(i64::from(days) - 1))
            .ok_or_else(|| HeatmapError::InvalidDate(format!("Window of {days} days overflows")))?;
        Self::new(start, today)
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        day >= self.start && day <= self.end
    }

    pub fn days(&self) -> u32 {
        ((self.end - self.start).num_days() + 1) as u32
    }

    pub fn iter_days(&self) -> impl Iterator<Item = NaiveDate> {
        self.start.iter_days().take_while({
            let end = self.end;
            move |d| *d <= end
        })
    }

    pub fn from_datetime(&self) -> DateTime<Utc> {
        Utc.from_utc_datetime(&self.start.and_time(NaiveTime::default()))
    }

    pub fn to_datetime(&self) -> DateTime<Utc> {
        let last = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or_default();
        Utc.from_utc_datetime(&self.end.and_time(last))
    }
}

/// Commit counts per calendar day. Days never recorded count as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayTally {
    counts: BTreeMap<NaiveDate, u32>,
}

impl DayTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one commit on `day` if it lies inside `window`.
    pub fn record(&mut self, day: NaiveDate, window: &DateWindow) -> bool {
        if !window.contains(day) {
            return false;
        }
        *self.counts.entry(day).or_insert(0) += 1;
        true
    }

    pub fn set(&mut self, day: NaiveDate, count: u32) {
        self.counts.insert(day, count);
    }

    pub fn get(&self, day: NaiveDate) -> u32 {
        self.counts.get(&day).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.counts.values().map(|&c| u64::from(c)).sum()
    }

    pub fn max(&self) -> u32 {
        self.counts.values().copied().max().unwrap_or(0)
    }

    pub fn active_days(&self) -> usize {
        self.counts.values().filter(|&&c| c > 0).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, u32)> + '_ {
        self.counts.iter().map(|(d, c)| (*d, *c))
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

impl FromIterator<(NaiveDate, u32)> for DayTally {
    fn from_iter<I: IntoIterator<Item = (NaiveDate, u32)>>(iter: I) -> Self {
        Self {
            counts: iter.into_iter().collect(),
        }
    }
}

/// Set of author emails whose commits are counted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorFilter {
    emails: BTreeSet<String>,
}

impl AuthorFilter {
    pub fn new<I, S>(emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let emails = emails
            .into_iter()
            .map(|e| normalize_email(e.as_ref()))
            .filter(|e| !e.is_empty())
            .collect();
        Self { emails }
    }

    /// Parses a comma-separated list such as `AUTHOR_EMAILS`.
    pub fn parse(raw: &str) -> Self {
        Self::new(raw.split(','))
    }

    /// True when no email was configured; every commit matches.
    pub fn is_unrestricted(&self) -> bool {
        self.emails.is_empty()
    }

    pub fn matches(&self, email: &str) -> bool {
        self.is_unrestricted() || self.emails.contains(&normalize_email(email))
    }

    pub fn emails(&self) -> impl Iterator<Item = &str> {
        self.emails.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.emails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DayEntry {
    pub date: NaiveDate,
    pub commit_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RepoActivity {
    pub project: String,
    pub repository: String,
    pub commit_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeatmapOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub organization: String,
    pub window: DateWindow,
    pub output_path: String,
    pub total_commits: u64,
    pub days: Vec<DayEntry>,
    pub repositories: Vec<RepoActivity>,
}
