use crate::common::EnvProvider;

pub const DEFAULT_BASE_URL: &str = "https://gitlab.com";

const URI_VARS: &[&str] = &["GITLAB_URI", "GITLAB_HOST"];
const TOKEN_VARS: &[&str] = &["GITLAB_TOKEN", "GITLAB_PRIVATE_TOKEN"];

/// Connection settings for the GitLab instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub base_url: String,
    pub token: Option<String>,
}

impl Config {
    /// Resolve settings from the environment
    ///
    /// An explicit `GITLAB_URI`/`GITLAB_HOST` wins over `fallback_base_url`
    /// (usually the host of the repository's remote), which wins over gitlab.com.
    pub fn from_env(env: impl EnvProvider, fallback_base_url: Option<&str>) -> Self {
        let base_url = env
            .first_var(URI_VARS)
            .or_else(|| fallback_base_url.map(str::to_string))
            .map(|raw| normalize_base_url(&raw))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Self {
            base_url,
            token: env.first_var(TOKEN_VARS),
        }
    }

    pub fn api_url(&self, path: &str) -> String {
        format!("{}/api/v4/{}", self.base_url, path.trim_start_matches('/'))
    }
}

/// Turn `gitlab.example.com` or `https://gitlab.example.com/` into a base URL
pub fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    }
}
