use super::{CommitQuery, DevOpsApi};
use crate::config::Config;
use crate::error::{HeatmapError, Result};
use crate::model::{Commit, ListResponse, Project, Repository};
use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderValue, ACCEPT};
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

pub const API_VERSION: &str = "7.0";
const PROJECT_PAGE_SIZE: &str = "100";
const CONTINUATION_HEADER: &str = "x-ms-continuationtoken";

/// Blocking client for one Azure DevOps organization.
pub struct AzureClient {
    http: Client,
    base: Url,
    organization: String,
    token: String,
}

impl AzureClient {
    pub fn new(config: &Config) -> Result<Self> {
        let base = Url::parse(&config.base_url)
            .map_err(|e| HeatmapError::Config(format!("Invalid AZURE_DEVOPS_URL '{}': {e}", config.base_url)))?;
        if base.cannot_be_a_base() {
            return Err(HeatmapError::Config(format!(
                "AZURE_DEVOPS_URL cannot be used as a base: {}",
                config.base_url
            )));
        }
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("ado-heatmap/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base,
            organization: config.organization.clone(),
            token: config.access_token.clone(),
        })
    }

    /// `{base}/{org}/{segments...}` with every segment percent-encoded.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push(&self.organization).extend(segments);
        }
        url
    }

    fn get(&self, url: Url, query: &[(&str, String)]) -> Result<Option<Response>> {
        debug!(url = %url, "GET");
        let response = self
            .http
            .get(url.clone())
            .basic_auth("", Some(&self.token))
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .query(&[("api-version", API_VERSION)])
            .query(query)
            .send()?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!(url = %url, "not found, treating as empty");
            return Ok(None);
        }
        // An invalid PAT gets a 203 with the HTML sign-in page instead of a 401
        if status == StatusCode::NON_AUTHORITATIVE_INFORMATION || !status.is_success() {
            return Err(HeatmapError::status(status.as_u16(), url.to_string()));
        }
        Ok(Some(response))
    }

    fn get_list<T: DeserializeOwned>(&self, url: Url, query: &[(&str, String)]) -> Result<Vec<T>> {
        match self.get(url, query)? {
            Some(response) => Ok(parse_list(&response.text()?)?),
            None => Ok(Vec::new()),
        }
    }
}

fn parse_list<T: DeserializeOwned>(body: &str) -> Result<Vec<T>> {
    let list: ListResponse<T> = serde_json::from_str(body)?;
    Ok(list.value)
}

impl DevOpsApi for AzureClient {
    fn list_projects(&self) -> Result<Vec<Project>> {
        let url = self.endpoint(&["_apis", "projects"]);
        let mut projects = Vec::new();
        let mut continuation: Option<String> = None;

        loop {
            let mut query = vec![("$top", PROJECT_PAGE_SIZE.to_string())];
            if let Some(token) = continuation.take() {
                query.push(("continuationToken", token));
            }

            let Some(response) = self.get(url.clone(), &query)? else {
                return Err(HeatmapError::status(404, url.to_string()));
            };
            continuation = response
                .headers()
                .get(CONTINUATION_HEADER)
                .and_then(|v| v.to_str().ok())
                .filter(|v| !v.is_empty())
                .map(str::to_string);

            let page: Vec<Project> = parse_list(&response.text()?)?;
            projects.extend(page);

            if continuation.is_none() {
                break;
            }
        }

        Ok(projects)
    }

    fn list_repositories(&self, project: &str) -> Result<Vec<Repository>> {
        let url = self.endpoint(&[project, "_apis", "git", "repositories"]);
        self.get_list(url, &[])
    }

    fn list_commits(&self, project: &str, repo_id: &str, query: &CommitQuery<'_>) -> Result<Vec<Commit>> {
        let url = self.endpoint(&[project, "_apis", "git", "repositories", repo_id, "commits"]);
        self.get_list(url, &commit_params(query))
    }
}

pub fn commit_params(query: &CommitQuery<'_>) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("searchCriteria.fromDate", query.from.to_rfc3339()),
        ("searchCriteria.toDate", query.to.to_rfc3339()),
        ("$top", query.top.to_string()),
        ("$skip", query.skip.to_string()),
    ];
    if let Some(author) = query.author {
        params.push(("searchCriteria.author", author.to_string()));
    }
    params
}
