pub mod client;
#[doc(hidden)]
pub mod fake;

pub use client::AzureClient;

use crate::error::Result;
use crate::model::{Commit, Project, Repository};
use chrono::{DateTime, Utc};

/// Largest page the commits endpoint is asked for.
pub const COMMIT_PAGE_SIZE: usize = 10_000;

/// One page request against a repository's commit history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitQuery<'a> {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    pub author: Option<&'a str>,
    pub top: usize,
    pub skip: usize,
}

/// The slice of the Azure DevOps REST API the heatmap needs.
pub trait DevOpsApi {
    fn list_projects(&self) -> Result<Vec<Project>>;

    /// Repositories of `project`; empty when the project has no Git service.
    fn list_repositories(&self, project: &str) -> Result<Vec<Repository>>;

    /// One page of commits; empty when the repository has no history.
    fn list_commits(&self, project: &str, repo_id: &str, query: &CommitQuery<'_>) -> Result<Vec<Commit>>;
}
