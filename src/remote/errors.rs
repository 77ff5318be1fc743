use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed")]
    Http(#[from] reqwest::Error),

    #[error("{resource} not found")]
    NotFound { resource: String },

    #[error("Unauthorized ({status}): {message}")]
    Unauthorized { status: u16, message: String },

    #[error("GitLab API returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Failed to decode response")]
    Decode(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum GitError {
    #[error("Not a git repository: {path} ({message})")]
    RepositoryNotFound { path: String, message: String },

    #[error("No git remote configured; use --repo to select a project")]
    NoRemote,

    #[error("Failed to read remote: {message}")]
    RemoteLookupFailed { message: String },

    #[error("Remote '{remote}' has no fetch URL")]
    RemoteUrlMissing { remote: String },
}

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("Invalid issue number '{value}': expected a positive integer")]
    InvalidIssueNumber { value: String },

    #[error("Invalid repository '{value}': expected OWNER/REPO or GROUP/NAMESPACE/REPO")]
    InvalidRepository { value: String },

    #[error("Unsupported remote URL '{url}'")]
    UnsupportedRemoteUrl { url: String },

    #[error(transparent)]
    Git(#[from] GitError),
}

impl ApiError {
    /// Map a non-success HTTP response to an error
    ///
    /// GitLab reports failures as `{"message": ...}` or `{"error": ...}`; the
    /// raw body is used when neither is present.
    pub fn from_response(status: u16, body: &str, resource: &str) -> Self {
        let message = extract_message(body);
        match status {
            404 => ApiError::NotFound {
                resource: resource.to_string(),
            },
            401 | 403 => ApiError::Unauthorized { status, message },
            _ => ApiError::Status { status, message },
        }
    }
}

fn extract_message(body: &str) -> String {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
    let field = parsed.as_ref().and_then(|value| {
        value
            .get("message")
            .or_else(|| value.get("error"))
            .map(|field| match field {
                serde_json::Value::String(text) => text.clone(),
                other => other.to_string(),
            })
    });

    field.unwrap_or_else(|| body.trim().to_string())
}

impl ResolveError {
    pub fn invalid_issue_number(value: impl AsRef<str>) -> Self {
        ResolveError::InvalidIssueNumber {
            value: value.as_ref().to_string(),
        }
    }

    pub fn invalid_repository(value: impl AsRef<str>) -> Self {
        ResolveError::InvalidRepository {
            value: value.as_ref().to_string(),
        }
    }

    pub fn unsupported_remote_url(url: impl AsRef<str>) -> Self {
        ResolveError::UnsupportedRemoteUrl {
            url: url.as_ref().to_string(),
        }
    }
}

// Result type alias for convenience
pub type ApiResult<T> = Result<T, ApiError>;
pub type GitResult<T> = Result<T, GitError>;
pub type ResolveResult<T> = Result<T, ResolveError>;
