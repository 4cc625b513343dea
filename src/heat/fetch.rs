use crate::azure::{CommitQuery, DevOpsApi, COMMIT_PAGE_SIZE};
use crate::error::Result;
use crate::model::{Commit, DateWindow, RepoRef};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

/// Lists every enabled repository of every project in the organization.
pub fn enumerate_repositories(api: &dyn DevOpsApi) -> Result<Vec<RepoRef>> {
    let projects = api.list_projects()?;
    info!(projects = projects.len(), "fetched projects");

    let mut repos = Vec::new();
    for project in projects {
        let found = api.list_repositories(&project.name)?;
        debug!(project = %project.name, repositories = found.len(), "fetched repositories");

        for repository in found {
            if repository.is_disabled {
                debug!(project = %project.name, repository = %repository.name, "skipping disabled repository");
                continue;
            }
            repos.push(RepoRef {
                project: project.name.clone(),
                repository,
            });
        }
    }

    info!(repositories = repos.len(), "enumerated repositories");
    Ok(repos)
}

/// Fetches the full commit history of `repo` inside `window`, page by page.
pub fn fetch_commits(
    api: &dyn DevOpsApi,
    repo: &RepoRef,
    window: &DateWindow,
    author: Option<&str>,
) -> Result<Vec<Commit>> {
    fetch_commits_paged(api, repo, window, author, COMMIT_PAGE_SIZE)
}

pub fn fetch_commits_paged(
    api: &dyn DevOpsApi,
    repo: &RepoRef,
    window: &DateWindow,
    author: Option<&str>,
    page_size: usize,
) -> Result<Vec<Commit>> {
    let mut all = Vec::new();
    let mut skip = 0usize;

    loop {
        let query = CommitQuery {
            from: window.from_datetime(),
            to: window.to_datetime(),
            author,
            top: page_size,
            skip,
        };
        let page = api.list_commits(&repo.project, &repo.repository.id, &query)?;
        let len = page.len();
        all.extend(page);
        skip += len;

        if len == 0 || len < page_size {
            break;
        }
    }

    Ok(all)
}

/// Spinner on stderr while repositories are scanned; hidden when stderr is not a terminal.
pub fn repo_progress(total: usize, enabled: bool) -> ProgressBar {
    if !enabled || !console::user_attended_stderr() {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{pos}/{len}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    pb.set_message("Collecting commits...");
    pb
}
