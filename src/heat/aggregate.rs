use super::fetch::{fetch_commits, repo_progress};
use crate::azure::DevOpsApi;
use crate::error::Result;
use crate::model::{normalize_email, AuthorFilter, Commit, DateWindow, DayTally, RepoActivity, RepoRef};
use std::collections::HashSet;
use tracing::{debug, info};

/// Outcome of scanning every repository.
#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    pub tally: DayTally,
    pub repositories: Vec<RepoActivity>,
}

impl Aggregation {
    pub fn total_commits(&self) -> u64 {
        self.tally.total()
    }
}

/// Tallies matching commits of every repository into one `DayTally`.
pub fn aggregate_commits(
    api: &dyn DevOpsApi,
    repos: &[RepoRef],
    authors: &AuthorFilter,
    window: &DateWindow,
    show_progress: bool,
) -> Result<Aggregation> {
    let mut aggregation = Aggregation::default();
    let pb = repo_progress(repos.len(), show_progress);

    for repo in repos {
        pb.set_message(format!("{}/{}", repo.project, repo.repository.name));
        let matched = aggregate_repository(api, repo, authors, window, &mut aggregation.tally)?;
        pb.inc(1);

        if matched > 0 {
            info!(
                project = %repo.project,
                repository = %repo.repository.name,
                commits = matched,
                "matched commits"
            );
            aggregation.repositories.push(RepoActivity {
                project: repo.project.clone(),
                repository: repo.repository.name.clone(),
                commit_count: matched,
            });
        }
    }

    pb.finish_and_clear();
    aggregation
        .repositories
        .sort_by(|a, b| b.commit_count.cmp(&a.commit_count).then_with(|| a.repository.cmp(&b.repository)));
    Ok(aggregation)
}

/// Tallies one repository and returns how many commits it contributed.
pub fn aggregate_repository(
    api: &dyn DevOpsApi,
    repo: &RepoRef,
    authors: &AuthorFilter,
    window: &DateWindow,
    tally: &mut DayTally,
) -> Result<u32> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut matched = 0u32;

    if authors.is_unrestricted() {
        let commits = fetch_commits(api, repo, window, None)?;
        matched += tally_commits(&commits, None, window, &mut seen, tally);
    } else {
        for email in authors.emails() {
            let commits = fetch_commits(api, repo, window, Some(email))?;
            debug!(repository = %repo.repository.name, author = email, fetched = commits.len(), "fetched commits");
            matched += tally_commits(&commits, Some(email), window, &mut seen, tally);
        }
    }

    Ok(matched)
}

/// Records every commit authored by `email` (or by anyone when `None`) whose
/// author date is inside `window`. Commit ids already in `seen` are skipped.
pub fn tally_commits(
    commits: &[Commit],
    email: Option<&str>,
    window: &DateWindow,
    seen: &mut HashSet<String>,
    tally: &mut DayTally,
) -> u32 {
    let expected = email.map(normalize_email);
    let mut matched = 0;

    for commit in commits {
        if let Some(expected) = &expected {
            if normalize_email(&commit.author.email) != *expected {
                continue;
            }
        }
        if seen.contains(&commit.commit_id) {
            continue;
        }
        if tally.record(commit.day(), window) {
            seen.insert(commit.commit_id.clone());
            matched += 1;
        }
    }

    matched
}
