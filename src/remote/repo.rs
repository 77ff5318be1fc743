use std::path::Path;

use super::errors::{GitError, GitResult, ResolveError, ResolveResult};
use crate::common::ProjectPath;

/// A git remote URL split into the GitLab instance and the project path
///
/// Understands the forms GitLab hands out for cloning:
///
/// - `git@gitlab.com:group/sub/repo.git`
/// - `ssh://git@gitlab.com:2222/group/repo.git`
/// - `https://gitlab.com/group/repo.git`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteUrl {
    /// Web base URL of the instance, e.g. `https://gitlab.com`
    pub base_url: String,
    pub project: ProjectPath,
}

impl RemoteUrl {
    pub fn parse(url: &str) -> ResolveResult<Self> {
        let trimmed = url.trim();
        if trimmed.contains("://") {
            Self::parse_url_style(trimmed)
        } else {
            Self::parse_scp_style(trimmed)
        }
    }

    /// Build from a URL gix has already parsed out of the repository config
    pub fn from_git_url(url: &gix::Url) -> ResolveResult<Self> {
        let original = url.to_bstring().to_string();
        let unsupported = || ResolveError::unsupported_remote_url(&original);

        let host = url.host().filter(|host| !host.is_empty()).ok_or_else(unsupported)?;
        let base_url = match url.scheme {
            gix::url::Scheme::Http | gix::url::Scheme::Https => {
                web_base_url(url.scheme.as_str(), host, url.port)
            }
            gix::url::Scheme::Ssh | gix::url::Scheme::Git => web_base_url("https", host, None),
            _ => return Err(unsupported()),
        };

        let project = project_from_path(&url.path.to_string(), &original)?;
        Ok(Self { base_url, project })
    }

    fn parse_url_style(url: &str) -> ResolveResult<Self> {
        let unsupported = || ResolveError::unsupported_remote_url(url);
        let parsed = url::Url::parse(url).map_err(|_| unsupported())?;
        let host = parsed
            .host_str()
            .filter(|host| !host.is_empty())
            .ok_or_else(unsupported)?;

        let base_url = match parsed.scheme() {
            "http" | "https" => web_base_url(parsed.scheme(), host, parsed.port()),
            // SSH ports say nothing about where the web UI lives
            "ssh" | "git" | "git+ssh" | "ssh+git" => web_base_url("https", host, None),
            _ => return Err(unsupported()),
        };

        let project = project_from_path(parsed.path(), url)?;
        Ok(Self { base_url, project })
    }

    /// `[user@]host:path`, including `[user@][ipv6]:path`
    fn parse_scp_style(url: &str) -> ResolveResult<Self> {
        let unsupported = || ResolveError::unsupported_remote_url(url);

        let rest = match (url.find('@'), url.find(':')) {
            (Some(at), Some(colon)) if at < colon => url.get(at + 1..).unwrap_or(""),
            _ => url,
        };

        let (host, path) = match rest.strip_prefix('[') {
            Some(bracketed) => {
                let (host, after) = bracketed.split_once(']').ok_or_else(unsupported)?;
                (host, after.strip_prefix(':').ok_or_else(unsupported)?)
            }
            None => rest.split_once(':').ok_or_else(unsupported)?,
        };

        if host.is_empty() || host.contains('/') {
            return Err(unsupported());
        }

        let project = project_from_path(path, url)?;
        Ok(Self {
            base_url: web_base_url("https", host, None),
            project,
        })
    }
}

fn web_base_url(scheme: &str, host: &str, port: Option<u16>) -> String {
    let host = if host.contains(':') && !host.starts_with('[') {
        format!("[{}]", host)
    } else {
        host.to_string()
    };
    match port {
        Some(port) => format!("{}://{}:{}", scheme, host, port),
        None => format!("{}://{}", scheme, host),
    }
}

fn project_from_path(path: &str, url: &str) -> ResolveResult<ProjectPath> {
    path.parse::<ProjectPath>()
        .map_err(|_| ResolveError::unsupported_remote_url(url))
}

/// The git repository enclosing the working directory
pub struct GitContext {
    repo: gix::Repository,
}

impl GitContext {
    /// Find the repository containing the current working directory
    pub fn discover_current() -> GitResult<Self> {
        let cwd = std::env::current_dir().map_err(|e| GitError::RepositoryNotFound {
            path: ".".to_string(),
            message: format!("cannot read current directory: {}", e),
        })?;
        Self::discover(cwd)
    }

    /// Find the repository containing `path`, walking up parent directories
    pub fn discover<P: AsRef<Path>>(path: P) -> GitResult<Self> {
        let repo =
            gix::discover(path.as_ref()).map_err(|e| GitError::RepositoryNotFound {
                path: path.as_ref().display().to_string(),
                message: e.to_string(),
            })?;
        Ok(Self { repo })
    }

    /// URL of the default fetch remote (`origin` or the only configured remote)
    pub fn default_remote_url(&self) -> GitResult<gix::Url> {
        let remote = self
            .repo
            .find_default_remote(gix::remote::Direction::Fetch)
            .ok_or(GitError::NoRemote)?
            .map_err(|e| GitError::RemoteLookupFailed {
                message: e.to_string(),
            })?;

        let remote_name = remote
            .name()
            .map(|name| name.as_bstr().to_string())
            .unwrap_or_else(|| "(anonymous)".to_string());

        let url = remote
            .url(gix::remote::Direction::Fetch)
            .ok_or(GitError::RemoteUrlMissing {
                remote: remote_name,
            })?;

        Ok(url.clone())
    }

    /// Project and instance behind the default remote
    pub fn remote(&self) -> ResolveResult<RemoteUrl> {
        let url = self.default_remote_url()?;
        log::debug!("Default remote URL: {}", url.to_bstring());
        RemoteUrl::from_git_url(&url)
    }
}
