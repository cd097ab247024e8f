mod schema;
mod sqlite;

pub use sqlite::SqliteStore;

use crate::error::Result;
use crate::types::*;

/// Ordering for a user's repository listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOrder {
    /// Strictly `last_accessed_at` descending; ties fall back to row order.
    Recent,
    /// Whatever order the query produces.
    Unordered,
}

/// A card row to insert-or-update during a save.
#[derive(Debug, Clone)]
pub struct CardUpsert {
    pub id: String,
    pub front: String,
    pub back: String,
}

/// Store defines the database interface.
pub trait Store: Send + Sync {
    fn initialize(&self) -> Result<()>;

    // User operations
    fn create_user(&self, user: &User) -> Result<()>;
    fn get_user(&self, id: &str) -> Result<Option<User>>;
    fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    fn update_user(&self, user: &User) -> Result<()>;

    // Session operations
    fn create_session(&self, session: &Session) -> Result<()>;
    fn get_session_by_lookup(&self, lookup: &str) -> Result<Option<Session>>;
    fn delete_session(&self, id: &str) -> Result<bool>;
    fn update_session_last_used(&self, id: &str) -> Result<()>;

    // Set operations
    /// Creates the set and the owner's repository link in one transaction.
    fn create_set_with_entry(&self, set: &Set) -> Result<()>;
    fn get_set(&self, id: &str) -> Result<Option<Set>>;
    fn update_set(&self, set: &Set) -> Result<()>;
    fn delete_set(&self, id: &str) -> Result<bool>;
    fn count_set_cards(&self, set_id: &str) -> Result<i64>;

    // Repository operations (user <-> set, independent of ownership)
    fn add_repository_entry(&self, entry: &RepositoryEntry) -> Result<()>;
    fn remove_repository_entry(&self, user_id: &str, set_id: &str) -> Result<bool>;
    fn get_repository_entry(&self, user_id: &str, set_id: &str) -> Result<Option<RepositoryEntry>>;
    fn touch_repository_entry(&self, user_id: &str, set_id: &str) -> Result<()>;
    fn list_user_sets(&self, user_id: &str, order: SetOrder) -> Result<Vec<SetSummary>>;
    /// Public sets the user has not linked yet; all public sets if the user
    /// has no links at all.
    fn list_discoverable_sets(&self, user_id: &str) -> Result<Vec<SetSummary>>;

    // Flashcard operations
    fn list_set_cards(&self, set_id: &str) -> Result<Vec<Flashcard>>;
    /// Bulk delete then bulk upsert, in one transaction. A failure anywhere
    /// leaves the set untouched.
    fn apply_card_changes(
        &self,
        set_id: &str,
        author_id: &str,
        delete_ids: &[String],
        upserts: &[CardUpsert],
    ) -> Result<()>;

    // Learn section
    fn list_subjects(&self) -> Result<Vec<Subject>>;
    fn list_subject_topics(&self, subject_id: &str) -> Result<Vec<Topic>>;
    fn get_topic(&self, id: &str) -> Result<Option<Topic>>;
    fn create_subject(&self, subject: &Subject) -> Result<()>;
    fn create_topic(&self, topic: &Topic) -> Result<()>;

    fn close(&self) -> Result<()>;
}
