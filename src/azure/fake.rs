//! In-memory stand-in for the Azure DevOps API, used by tests.

use super::{CommitQuery, DevOpsApi};
use crate::error::{HeatmapError, Result};
use crate::model::{Commit, GitUserDate, Project, Repository};
use chrono::{DateTime, Utc};
use std::cell::RefCell;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedQuery {
    pub project: String,
    pub repo_id: String,
    pub author: Option<String>,
    pub top: usize,
    pub skip: usize,
}

#[derive(Default)]
pub struct FakeDevOps {
    projects: Vec<Project>,
    repositories: HashMap<String, Vec<Repository>>,
    commits: HashMap<String, Vec<Commit>>,
    failing_repo: Option<String>,
    queries: RefCell<Vec<RecordedQuery>>,
}

impl FakeDevOps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_project(mut self, name: &str) -> Self {
        self.projects.push(Project {
            id: format!("project-{name}"),
            name: name.to_string(),
        });
        self
    }

    pub fn with_repository(mut self, project: &str, id: &str, disabled: bool) -> Self {
        self.repositories
            .entry(project.to_string())
            .or_default()
            .push(Repository {
                id: id.to_string(),
                name: format!("repo-{id}"),
                is_disabled: disabled,
            });
        self
    }

    pub fn with_commit(mut self, repo_id: &str, email: &str, date: DateTime<Utc>) -> Self {
        let commits = self.commits.entry(repo_id.to_string()).or_default();
        let commit_id = format!("{repo_id}-{}", commits.len());
        commits.push(commit(&commit_id, email, date));
        self
    }

    /// Every commit query against `repo_id` fails with a 401.
    pub fn failing_on(mut self, repo_id: &str) -> Self {
        self.failing_repo = Some(repo_id.to_string());
        self
    }

    pub fn queries(&self) -> Vec<RecordedQuery> {
        self.queries.borrow().clone()
    }
}

pub fn commit(commit_id: &str, email: &str, date: DateTime<Utc>) -> Commit {
    let user = GitUserDate {
        name: email.split('@').next().unwrap_or_default().to_string(),
        email: email.to_string(),
        date,
    };
    Commit {
        commit_id: commit_id.to_string(),
        author: user.clone(),
        committer: Some(user),
    }
}

impl DevOpsApi for FakeDevOps {
    fn list_projects(&self) -> Result<Vec<Project>> {
        Ok(self.projects.clone())
    }

    fn list_repositories(&self, project: &str) -> Result<Vec<Repository>> {
        Ok(self.repositories.get(project).cloned().unwrap_or_default())
    }

    fn list_commits(&self, project: &str, repo_id: &str, query: &CommitQuery<'_>) -> Result<Vec<Commit>> {
        self.queries.borrow_mut().push(RecordedQuery {
            project: project.to_string(),
            repo_id: repo_id.to_string(),
            author: query.author.map(str::to_string),
            top: query.top,
            skip: query.skip,
        });

        if self.failing_repo.as_deref() == Some(repo_id) {
            return Err(HeatmapError::status(401, format!("fake://{project}/{repo_id}")));
        }

        // The real service matches the author criterion as a substring of name or email
        let needle = query.author.map(str::to_lowercase);
        let matching = self
            .commits
            .get(repo_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .filter(|c| c.author.date >= query.from && c.author.date <= query.to)
            .filter(|c| match &needle {
                Some(n) => {
                    c.author.email.to_lowercase().contains(n.as_str())
                        || c.author.name.to_lowercase().contains(n.as_str())
                }
                None => true,
            })
            .skip(query.skip)
            .take(query.top)
            .cloned()
            .collect();
        Ok(matching)
    }
}
