use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::User;

pub type NoteId = u64;

/// A discussion entry on an issue
///
/// GitLab stores both human comments and its own audit entries ("changed the
/// milestone", "assigned to @bob") as notes. The latter carry `system = true`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    #[serde(default)]
    pub body: String,
    pub author: User,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub system: bool,
}

impl Note {
    pub fn new(id: NoteId, body: impl Into<String>, author: User, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            body: body.into(),
            author,
            created_at,
            system: false,
        }
    }

    pub fn is_human(&self) -> bool {
        !self.system
    }
}

/// Page selection for a notes listing
///
/// `None` leaves the choice to the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotesQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl NotesQuery {
    /// Build a query from raw flag values, where zero means "not set"
    pub fn from_flags(page: u32, per_page: u32) -> Self {
        Self {
            page: (page != 0).then_some(page),
            per_page: (per_page != 0).then_some(per_page),
        }
    }

    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(page) = self.page {
            params.push(("page", page.to_string()));
        }
        if let Some(per_page) = self.per_page {
            params.push(("per_page", per_page.to_string()));
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notes_query_forwards_non_zero_flags() {
        let query = NotesQuery::from_flags(2, 5);
        assert_eq!(query.page, Some(2));
        assert_eq!(query.per_page, Some(5));
        assert_eq!(
            query.to_params(),
            vec![("page", "2".to_string()), ("per_page", "5".to_string())]
        );
    }

    #[test]
    fn test_notes_query_zero_means_server_default() {
        let query = NotesQuery::from_flags(0, 0);
        assert_eq!(query, NotesQuery::default());
        assert!(query.to_params().is_empty());

        let query = NotesQuery::from_flags(0, 50);
        assert_eq!(query.to_params(), vec![("per_page", "50".to_string())]);
    }

    #[test]
    fn test_note_deserializes_system_flag() {
        let json = r#"{
            "id": 7,
            "body": "changed milestone to %v1.0",
            "author": {"username": "bot", "name": "Bot"},
            "created_at": "2024-03-01T10:00:00.000Z",
            "system": true
        }"#;

        let note: Note = serde_json::from_str(json).expect("note should parse");
        assert!(note.system);
        assert!(!note.is_human());
        assert_eq!(note.author.username, "bot");
    }
}
