use std::fmt;

use crate::remote::{ResolveError, ResolveResult};

/// A GitLab project addressed by its full path, e.g. `group/sub/repo`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProjectPath {
    pub namespace: String,
    pub name: String,
}

impl ProjectPath {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Path-encoded form accepted by the `:id` segment of the REST API
    pub fn api_id(&self) -> String {
        url::form_urlencoded::byte_serialize(self.to_string().as_bytes()).collect()
    }
}

impl fmt::Display for ProjectPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

impl std::str::FromStr for ProjectPath {
    type Err = ResolveError;

    fn from_str(s: &str) -> ResolveResult<Self> {
        let trimmed = s.trim().trim_matches('/');
        let trimmed = trimmed.strip_suffix(".git").unwrap_or(trimmed);

        let segments: Vec<&str> = trimmed.split('/').collect();
        if segments.len() < 2 || segments.iter().any(|segment| segment.trim().is_empty()) {
            return Err(ResolveError::invalid_repository(s));
        }

        let (name, namespace) = match segments.split_last() {
            Some((name, namespace)) => (*name, namespace.join("/")),
            None => return Err(ResolveError::invalid_repository(s)),
        };

        Ok(Self::new(namespace, name))
    }
}
