pub mod client;
pub mod errors;
pub mod repo;

pub use client::{GitLabClient, IssueSource};
pub use errors::{ApiError, ApiResult, GitError, GitResult, ResolveError, ResolveResult};
pub use repo::{GitContext, RemoteUrl};
