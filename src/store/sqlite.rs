use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, ErrorCode, OptionalExtension, Row, params};

use super::schema::SCHEMA;
use super::{CardUpsert, SetOrder, Store};
use crate::error::{Error, Result};
use crate::types::*;

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.pragma_update(None, "journal_mode", "WAL")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Returns a guard to the underlying database connection.
    /// This allows consuming applications to execute custom SQL.
    pub fn connection(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn()
    }
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            // Handle SQLite's default datetime format: "YYYY-MM-DD HH:MM:SS"
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            tracing::error!("Invalid datetime in database: '{}' - {}", s, e);
            Utc::now()
        })
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
    )
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        name: row.get(2)?,
        password_hash: row.get(3)?,
        profile_picture: row.get(4)?,
        created_at: parse_datetime(&row.get::<_, String>(5)?),
        updated_at: parse_datetime(&row.get::<_, String>(6)?),
    })
}

fn set_from_row(row: &Row<'_>) -> rusqlite::Result<Set> {
    Ok(Set {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        owner_id: row.get(3)?,
        is_public: row.get(4)?,
        created_at: parse_datetime(&row.get::<_, String>(5)?),
        updated_at: parse_datetime(&row.get::<_, String>(6)?),
    })
}

// Expects the set columns followed by a COUNT aggregate; ownership is
// computed against the viewing user, not stored.
fn summary_from_row(row: &Row<'_>, viewer_id: &str) -> rusqlite::Result<SetSummary> {
    let set = set_from_row(row)?;
    let card_count: i64 = row.get(7)?;
    let is_owner = set.owner_id == viewer_id;
    Ok(SetSummary {
        set,
        card_count,
        is_owner,
    })
}

const SET_COLUMNS: &str = "id, title, description, owner_id, is_public, created_at, updated_at";

impl Store for SqliteStore {
    fn initialize(&self) -> Result<()> {
        self.conn().execute_batch(SCHEMA)?;
        Ok(())
    }

    // User operations

    fn create_user(&self, user: &User) -> Result<()> {
        self.conn()
            .execute(
                "INSERT INTO users (id, email, name, password_hash, profile_picture, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    user.id,
                    user.email,
                    user.name,
                    user.password_hash,
                    user.profile_picture,
                    format_datetime(&user.created_at),
                    format_datetime(&user.updated_at),
                ],
            )
            .map_err(|e| {
                if is_unique_violation(&e) {
                    Error::AlreadyExists
                } else {
                    Error::from(e)
                }
            })?;
        Ok(())
    }

    fn get_user(&self, id: &str) -> Result<Option<User>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT id, email, name, password_hash, profile_picture, created_at, updated_at
             FROM users WHERE id = ?1",
            params![id],
            user_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT id, email, name, password_hash, profile_picture, created_at, updated_at
             FROM users WHERE email = ?1",
            params![email],
            user_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn update_user(&self, user: &User) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE users SET name = ?1, profile_picture = ?2, updated_at = ?3 WHERE id = ?4",
            params![
                user.name,
                user.profile_picture,
                format_datetime(&Utc::now()),
                user.id
            ],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    // Session operations

    fn create_session(&self, session: &Session) -> Result<()> {
        self.conn()
            .execute(
                "INSERT INTO sessions (id, token_hash, token_lookup, user_id, created_at, expires_at, last_used_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    session.id,
                    session.token_hash,
                    session.token_lookup,
                    session.user_id,
                    format_datetime(&session.created_at),
                    session.expires_at.as_ref().map(format_datetime),
                    session.last_used_at.as_ref().map(format_datetime),
                ],
            )
            .map_err(|e| {
                if is_unique_violation(&e) {
                    Error::AlreadyExists
                } else {
                    Error::from(e)
                }
            })?;
        Ok(())
    }

    fn get_session_by_lookup(&self, lookup: &str) -> Result<Option<Session>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT id, token_hash, token_lookup, user_id, created_at, expires_at, last_used_at
             FROM sessions WHERE token_lookup = ?1",
            params![lookup],
            |row| {
                Ok(Session {
                    id: row.get(0)?,
                    token_hash: row.get(1)?,
                    token_lookup: row.get(2)?,
                    user_id: row.get(3)?,
                    created_at: parse_datetime(&row.get::<_, String>(4)?),
                    expires_at: row
                        .get::<_, Option<String>>(5)?
                        .map(|s| parse_datetime(&s)),
                    last_used_at: row
                        .get::<_, Option<String>>(6)?
                        .map(|s| parse_datetime(&s)),
                })
            },
        )
        .optional()
        .map_err(Error::from)
    }

    fn delete_session(&self, id: &str) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM sessions WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    fn update_session_last_used(&self, id: &str) -> Result<()> {
        self.conn().execute(
            "UPDATE sessions SET last_used_at = ?1 WHERE id = ?2",
            params![format_datetime(&Utc::now()), id],
        )?;
        Ok(())
    }

    // Set operations

    fn create_set_with_entry(&self, set: &Set) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT INTO sets (id, title, description, owner_id, is_public, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                set.id,
                set.title,
                set.description,
                set.owner_id,
                set.is_public,
                format_datetime(&set.created_at),
                format_datetime(&set.updated_at),
            ],
        )?;
        tx.execute(
            "INSERT INTO user_repository (user_id, set_id, added_at, last_accessed_at)
             VALUES (?1, ?2, ?3, ?3)",
            params![set.owner_id, set.id, format_datetime(&set.created_at)],
        )?;

        tx.commit()?;
        Ok(())
    }

    fn get_set(&self, id: &str) -> Result<Option<Set>> {
        let conn = self.conn();
        conn.query_row(
            &format!("SELECT {SET_COLUMNS} FROM sets WHERE id = ?1"),
            params![id],
            set_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn update_set(&self, set: &Set) -> Result<()> {
        let rows = self.conn().execute(
            "UPDATE sets SET title = ?1, description = ?2, is_public = ?3, updated_at = ?4
             WHERE id = ?5",
            params![
                set.title,
                set.description,
                set.is_public,
                format_datetime(&Utc::now()),
                set.id
            ],
        )?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn delete_set(&self, id: &str) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM sets WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    fn count_set_cards(&self, set_id: &str) -> Result<i64> {
        let conn = self.conn();
        conn.query_row(
            "SELECT COUNT(*) FROM flashcards WHERE set_id = ?1",
            params![set_id],
            |row| row.get(0),
        )
        .map_err(Error::from)
    }

    // Repository operations

    fn add_repository_entry(&self, entry: &RepositoryEntry) -> Result<()> {
        self.conn()
            .execute(
                "INSERT INTO user_repository (user_id, set_id, added_at, last_accessed_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    entry.user_id,
                    entry.set_id,
                    format_datetime(&entry.added_at),
                    format_datetime(&entry.last_accessed_at),
                ],
            )
            .map_err(|e| {
                if is_unique_violation(&e) {
                    Error::AlreadyExists
                } else {
                    Error::from(e)
                }
            })?;
        Ok(())
    }

    fn remove_repository_entry(&self, user_id: &str, set_id: &str) -> Result<bool> {
        let rows = self.conn().execute(
            "DELETE FROM user_repository WHERE user_id = ?1 AND set_id = ?2",
            params![user_id, set_id],
        )?;
        Ok(rows > 0)
    }

    fn get_repository_entry(&self, user_id: &str, set_id: &str) -> Result<Option<RepositoryEntry>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT user_id, set_id, added_at, last_accessed_at
             FROM user_repository WHERE user_id = ?1 AND set_id = ?2",
            params![user_id, set_id],
            |row| {
                Ok(RepositoryEntry {
                    user_id: row.get(0)?,
                    set_id: row.get(1)?,
                    added_at: parse_datetime(&row.get::<_, String>(2)?),
                    last_accessed_at: parse_datetime(&row.get::<_, String>(3)?),
                })
            },
        )
        .optional()
        .map_err(Error::from)
    }

    fn touch_repository_entry(&self, user_id: &str, set_id: &str) -> Result<()> {
        self.conn().execute(
            "UPDATE user_repository SET last_accessed_at = ?1 WHERE user_id = ?2 AND set_id = ?3",
            params![format_datetime(&Utc::now()), user_id, set_id],
        )?;
        Ok(())
    }

    fn list_user_sets(&self, user_id: &str, order: SetOrder) -> Result<Vec<SetSummary>> {
        let conn = self.conn();
        let sql = format!(
            "SELECT s.id, s.title, s.description, s.owner_id, s.is_public, s.created_at, s.updated_at,
                    (SELECT COUNT(*) FROM flashcards f WHERE f.set_id = s.id)
             FROM sets s
             JOIN user_repository ur ON ur.set_id = s.id
             WHERE ur.user_id = ?1{}",
            match order {
                SetOrder::Recent => " ORDER BY ur.last_accessed_at DESC",
                SetOrder::Unordered => "",
            }
        );
        let mut stmt = conn.prepare(&sql)?;

        let rows = stmt.query_map(params![user_id], |row| summary_from_row(row, user_id))?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn list_discoverable_sets(&self, user_id: &str) -> Result<Vec<SetSummary>> {
        let conn = self.conn();
        // The NOT IN subquery is vacuously empty for a user with no links,
        // which yields the "discover everything" fallback.
        let mut stmt = conn.prepare(
            "SELECT s.id, s.title, s.description, s.owner_id, s.is_public, s.created_at, s.updated_at,
                    (SELECT COUNT(*) FROM flashcards f WHERE f.set_id = s.id)
             FROM sets s
             WHERE s.is_public = 1
               AND s.id NOT IN (SELECT set_id FROM user_repository WHERE user_id = ?1)",
        )?;

        let rows = stmt.query_map(params![user_id], |row| summary_from_row(row, user_id))?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    // Flashcard operations

    fn list_set_cards(&self, set_id: &str) -> Result<Vec<Flashcard>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, set_id, author_id, front, back
             FROM flashcards WHERE set_id = ?1 ORDER BY created_at, id",
        )?;

        let rows = stmt.query_map(params![set_id], |row| {
            Ok(Flashcard {
                id: row.get(0)?,
                set_id: row.get(1)?,
                author_id: row.get(2)?,
                front: row.get(3)?,
                back: row.get(4)?,
            })
        })?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn apply_card_changes(
        &self,
        set_id: &str,
        author_id: &str,
        delete_ids: &[String],
        upserts: &[CardUpsert],
    ) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        for id in delete_ids {
            tx.execute(
                "DELETE FROM flashcards WHERE id = ?1 AND set_id = ?2",
                params![id, set_id],
            )?;
        }

        for card in upserts {
            tx.execute(
                "INSERT INTO flashcards (id, set_id, author_id, front, back)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(id) DO UPDATE SET
                     front = excluded.front,
                     back = excluded.back,
                     updated_at = datetime('now')",
                params![card.id, set_id, author_id, card.front, card.back],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    // Learn section

    fn list_subjects(&self) -> Result<Vec<Subject>> {
        let conn = self.conn();
        let mut stmt = conn.prepare("SELECT id, title FROM subjects ORDER BY title")?;

        let rows = stmt.query_map([], |row| {
            Ok(Subject {
                id: row.get(0)?,
                title: row.get(1)?,
            })
        })?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn list_subject_topics(&self, subject_id: &str) -> Result<Vec<Topic>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, subject_id, title, explanation
             FROM topics WHERE subject_id = ?1 ORDER BY title",
        )?;

        let rows = stmt.query_map(params![subject_id], |row| {
            Ok(Topic {
                id: row.get(0)?,
                subject_id: row.get(1)?,
                title: row.get(2)?,
                explanation: row.get(3)?,
            })
        })?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn get_topic(&self, id: &str) -> Result<Option<Topic>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT id, subject_id, title, explanation FROM topics WHERE id = ?1",
            params![id],
            |row| {
                Ok(Topic {
                    id: row.get(0)?,
                    subject_id: row.get(1)?,
                    title: row.get(2)?,
                    explanation: row.get(3)?,
                })
            },
        )
        .optional()
        .map_err(Error::from)
    }

    fn create_subject(&self, subject: &Subject) -> Result<()> {
        self.conn().execute(
            "INSERT INTO subjects (id, title) VALUES (?1, ?2)",
            params![subject.id, subject.title],
        )?;
        Ok(())
    }

    fn create_topic(&self, topic: &Topic) -> Result<()> {
        self.conn().execute(
            "INSERT INTO topics (id, subject_id, title, explanation) VALUES (?1, ?2, ?3, ?4)",
            params![topic.id, topic.subject_id, topic.title, topic.explanation],
        )?;
        Ok(())
    }

    fn close(&self) -> Result<()> {
        Ok(())
    }
}
