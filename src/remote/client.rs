use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use serde::de::DeserializeOwned;

use super::errors::{ApiError, ApiResult};
use crate::common::{Config, Issue, IssueId, Note, NotesQuery, ProjectPath};

/// Read access to issues and their notes on a tracking service
pub trait IssueSource {
    fn get_issue(&self, project: &ProjectPath, iid: IssueId) -> ApiResult<Issue>;

    fn list_issue_notes(
        &self,
        project: &ProjectPath,
        iid: IssueId,
        query: &NotesQuery,
    ) -> ApiResult<Vec<Note>>;
}

/// Blocking client for the GitLab REST API (v4)
pub struct GitLabClient {
    http: Client,
    config: Config,
}

impl GitLabClient {
    pub fn new(config: Config) -> ApiResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("gitlab-issue/", env!("CARGO_PKG_VERSION"))),
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = Client::builder().default_headers(headers).build()?;
        Ok(Self { http, config })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&'static str, String)],
        resource: &str,
    ) -> ApiResult<T> {
        let url = self.config.api_url(path);
        log::debug!("GET {} {:?}", url, params);

        let mut request = self.http.get(&url).query(params);
        if let Some(ref token) = self.config.token {
            request = request.header("PRIVATE-TOKEN", token);
        }

        let response = request.send()?;
        let status = response.status();
        let body = response.text()?;
        log::debug!("{} -> {} ({} bytes)", url, status, body.len());

        if !status.is_success() {
            return Err(ApiError::from_response(status.as_u16(), &body, resource));
        }

        Ok(serde_json::from_str(&body)?)
    }
}

impl IssueSource for GitLabClient {
    fn get_issue(&self, project: &ProjectPath, iid: IssueId) -> ApiResult<Issue> {
        self.get(
            &format!("projects/{}/issues/{}", project.api_id(), iid),
            &[],
            &format!("Issue {}#{}", project, iid),
        )
    }

    fn list_issue_notes(
        &self,
        project: &ProjectPath,
        iid: IssueId,
        query: &NotesQuery,
    ) -> ApiResult<Vec<Note>> {
        self.get(
            &format!("projects/{}/issues/{}/notes", project.api_id(), iid),
            &query.to_params(),
            &format!("Notes for issue {}#{}", project, iid),
        )
    }
}
