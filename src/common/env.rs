//! Environment variable access that tests can substitute
//!
//! Configuration and the browser launcher read through [`EnvProvider`] so tests
//! can inject values without touching the process environment.

#[cfg(test)]
use std::collections::HashMap;

pub trait EnvProvider {
    /// Get the value of an environment variable
    fn get_var(&self, key: &str) -> Option<String>;

    /// First non-blank value among `keys`, in order
    fn first_var(&self, keys: &[&str]) -> Option<String> {
        keys.iter()
            .filter_map(|key| self.get_var(key))
            .map(|value| value.trim().to_string())
            .find(|value| !value.is_empty())
    }
}

impl<T: EnvProvider + ?Sized> EnvProvider for &T {
    fn get_var(&self, key: &str) -> Option<String> {
        (**self).get_var(key)
    }
}

/// Production implementation that uses the system environment
pub struct SystemEnvProvider;

impl EnvProvider for SystemEnvProvider {
    fn get_var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Test-only mock implementation for environment variables
#[cfg(test)]
#[derive(Default)]
pub struct MockEnvProvider {
    vars: HashMap<String, String>,
}

#[cfg(test)]
impl MockEnvProvider {
    /// Create a new empty mock environment provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an environment variable in the mock
    pub fn set_var(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    /// Remove an environment variable from the mock
    pub fn remove_var(&mut self, key: &str) -> &mut Self {
        self.vars.remove(key);
        self
    }

    /// Create a mock pointing at a GitLab instance with a token
    pub fn with_gitlab(uri: &str, token: &str) -> Self {
        let mut mock = Self::new();
        mock.set_var("GITLAB_URI", uri);
        mock.set_var("GITLAB_TOKEN", token);
        mock
    }
}

#[cfg(test)]
impl EnvProvider for MockEnvProvider {
    fn get_var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}
