use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(skip)]
    pub password_hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A server-side session. The raw bearer token is shown to the client once;
/// only its hash and an indexed lookup prefix are stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    #[serde(skip)]
    pub token_hash: String,
    #[serde(skip)]
    pub token_lookup: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_used_at: Option<DateTime<Utc>>,
}

/// A named, ownable collection of flashcards. `owner_id` never changes after
/// creation; visibility is the only ownership-independent knob.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Set {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub owner_id: String,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub id: String,
    pub set_id: String,
    pub author_id: String,
    pub front: String,
    pub back: String,
}

/// A user's personal link to a set, independent of ownership.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryEntry {
    pub user_id: String,
    pub set_id: String,
    pub added_at: DateTime<Utc>,
    pub last_accessed_at: DateTime<Utc>,
}

/// A set as it appears in a listing: annotated with the derived card count
/// (never stored) and whether the viewing user owns it.
#[derive(Debug, Clone, Serialize)]
pub struct SetSummary {
    #[serde(flatten)]
    pub set: Set,
    pub card_count: i64,
    pub is_owner: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subject {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topic {
    pub id: String,
    pub subject_id: String,
    pub title: String,
    pub explanation: String,
}

/// Topic explanations are authored with the literal two-character sequence
/// `\n` standing in for line breaks; expand it before display.
#[must_use]
pub fn unescape_newlines(text: &str) -> String {
    text.replace("\\n", "\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unescape_expands_literal_sequences() {
        assert_eq!(unescape_newlines("a\\nb\\nc"), "a\nb\nc");
    }

    #[test]
    fn unescape_leaves_plain_text_alone() {
        assert_eq!(unescape_newlines("no breaks here"), "no breaks here");
        assert_eq!(unescape_newlines("already\nreal"), "already\nreal");
    }
}
