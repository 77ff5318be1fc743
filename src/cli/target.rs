use crate::common::{IssueId, ProjectPath};
use crate::remote::{RemoteUrl, ResolveError, ResolveResult};

/// The issue a command operates on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueTarget {
    pub project: ProjectPath,
    pub iid: IssueId,
    /// Instance implied by the repository argument or git remote, if any
    pub base_url: Option<String>,
}

/// Parse the positional issue number
pub fn parse_issue_number(token: &str) -> ResolveResult<IssueId> {
    match token.trim().parse::<IssueId>() {
        Ok(iid) if iid > 0 => Ok(iid),
        _ => Err(ResolveError::invalid_issue_number(token)),
    }
}

/// Work out which issue to show
///
/// A non-empty `repo_override` (`OWNER/REPO`, `GROUP/SUB/REPO` or a clone URL)
/// wins; otherwise `ambient` is asked for the current repository's remote.
/// The issue number is validated first so a bad argument fails without
/// touching git.
pub fn resolve_target<F>(
    id_token: &str,
    repo_override: Option<&str>,
    ambient: F,
) -> ResolveResult<IssueTarget>
where
    F: FnOnce() -> ResolveResult<RemoteUrl>,
{
    let iid = parse_issue_number(id_token)?;

    let (project, base_url) = match repo_override.map(str::trim).filter(|r| !r.is_empty()) {
        Some(repo) if repo.contains("://") || repo.contains(':') => {
            let remote = RemoteUrl::parse(repo)?;
            (remote.project, Some(remote.base_url))
        }
        Some(repo) => (repo.parse::<ProjectPath>()?, None),
        None => {
            let remote = ambient()?;
            (remote.project, Some(remote.base_url))
        }
    };

    log::debug!("Resolved issue {}#{}", project, iid);
    Ok(IssueTarget {
        project,
        iid,
        base_url,
    })
}
