use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::common::User;

/// Project-scoped issue number (GitLab's `iid`)
pub type IssueId = u64;
pub type ProjectId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IssueState {
    #[serde(rename = "opened")]
    Opened,
    #[serde(rename = "closed")]
    Closed,
}

impl fmt::Display for IssueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueState::Opened => write!(f, "opened"),
            IssueState::Closed => write!(f, "closed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    pub title: String,
}

impl fmt::Display for Milestone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct References {
    #[serde(default)]
    pub full: String,
}

/// An issue snapshot as returned by `GET /projects/:id/issues/:iid`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub iid: IssueId,
    pub project_id: ProjectId,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    pub state: IssueState,
    pub author: User,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub closed_by: Option<User>,
    #[serde(default)]
    pub upvotes: u64,
    #[serde(default)]
    pub downvotes: u64,
    #[serde(default)]
    pub user_notes_count: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub labels: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub assignees: Vec<User>,
    #[serde(default)]
    pub milestone: Option<Milestone>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub weight: Option<i64>,
    #[serde(default)]
    pub confidential: bool,
    #[serde(default)]
    pub discussion_locked: Option<bool>,
    #[serde(default)]
    pub subscribed: Option<bool>,
    #[serde(default)]
    pub references: References,
    pub web_url: String,
}

impl Issue {
    pub fn new(
        iid: IssueId,
        project_id: ProjectId,
        title: impl Into<String>,
        author: User,
        created_at: DateTime<Utc>,
        web_url: impl Into<String>,
    ) -> Self {
        Self {
            iid,
            project_id,
            title: title.into(),
            description: String::new(),
            state: IssueState::Opened,
            author,
            created_at,
            closed_at: None,
            closed_by: None,
            upvotes: 0,
            downvotes: 0,
            user_notes_count: 0,
            labels: Vec::new(),
            assignees: Vec::new(),
            milestone: None,
            due_date: None,
            weight: None,
            confidential: false,
            discussion_locked: None,
            subscribed: None,
            references: References {
                full: format!("#{}", iid),
            },
            web_url: web_url.into(),
        }
    }

    pub fn close(&mut self, closed_by: User, closed_at: DateTime<Utc>) {
        self.state = IssueState::Closed;
        self.closed_by = Some(closed_by);
        self.closed_at = Some(closed_at);
    }

    /// Who closed the issue and when
    ///
    /// Only yields a value for closed issues carrying both fields, so stale
    /// closure data on a reopened issue is never shown.
    pub fn closure(&self) -> Option<(&User, DateTime<Utc>)> {
        if self.state != IssueState::Closed {
            return None;
        }
        match (&self.closed_by, self.closed_at) {
            (Some(user), Some(at)) => Some((user, at)),
            _ => None,
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const CLOSED_ISSUE_JSON: &str = r##"{
        "id": 9001,
        "iid": 42,
        "project_id": 278964,
        "title": "Fix crash",
        "description": null,
        "state": "closed",
        "created_at": "2024-01-10T08:00:00.000Z",
        "closed_at": "2024-01-12T09:30:00.000Z",
        "closed_by": {"id": 2, "username": "bob", "name": "Bob B"},
        "labels": ["bug", "crash"],
        "milestone": {"id": 3, "title": "v1.0"},
        "assignees": [{"id": 1, "username": "alice", "name": "Alice A"}],
        "author": {"id": 1, "username": "alice", "name": "Alice A"},
        "user_notes_count": 3,
        "upvotes": 4,
        "downvotes": 1,
        "due_date": "2024-02-01",
        "confidential": false,
        "discussion_locked": null,
        "web_url": "https://gitlab.com/group/proj/-/issues/42",
        "references": {"short": "#42", "relative": "#42", "full": "group/proj#42"},
        "weight": null
    }"##;

    #[test]
    fn test_issue_deserializes_gitlab_payload() {
        let issue: Issue = serde_json::from_str(CLOSED_ISSUE_JSON).expect("issue should parse");

        assert_eq!(issue.iid, 42);
        assert_eq!(issue.project_id, 278964);
        assert_eq!(issue.state, IssueState::Closed);
        assert_eq!(issue.description, "", "null description should become empty");
        assert_eq!(issue.labels, vec!["bug".to_string(), "crash".to_string()]);
        assert_eq!(issue.milestone.as_ref().map(|m| m.title.as_str()), Some("v1.0"));
        assert_eq!(issue.due_date, NaiveDate::from_ymd_opt(2024, 2, 1));
        assert_eq!(issue.weight, None);
        assert_eq!(issue.discussion_locked, None);
        assert_eq!(issue.subscribed, None, "absent field should be None");
        assert_eq!(issue.references.full, "group/proj#42");
    }

    #[test]
    fn test_closure_requires_closed_state() {
        let mut issue: Issue = serde_json::from_str(CLOSED_ISSUE_JSON).unwrap();
        let (closer, at) = issue.closure().expect("closed issue should have closure");
        assert_eq!(closer.username, "bob");
        assert_eq!(at, Utc.with_ymd_and_hms(2024, 1, 12, 9, 30, 0).unwrap());

        issue.state = IssueState::Opened;
        assert!(issue.closure().is_none());
    }

    #[test]
    fn test_closure_requires_both_fields() {
        let mut issue: Issue = serde_json::from_str(CLOSED_ISSUE_JSON).unwrap();
        issue.closed_by = None;
        assert!(issue.closure().is_none());
    }

    #[test]
    fn test_unknown_state_is_rejected() {
        let json = CLOSED_ISSUE_JSON.replace(r#""state": "closed""#, r#""state": "locked""#);
        assert!(serde_json::from_str::<Issue>(&json).is_err());
    }
}
