//! Save-on-exit reconciliation for a set-editing session. The in-memory card
//! list is freely mutable; at save time the surviving entries are diffed
//! against the card ids snapshotted when the screen loaded.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::CardUpsert;

/// Per-card editing state. New cards get client-generated ids before they are
/// ever persisted, so the save diff is a pure function over these tags rather
/// than a guess about what an id looks like.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CardEntry {
    /// Created locally this session; not yet persisted.
    New {
        #[serde(default)]
        id: Option<String>,
        front: String,
        back: String,
    },
    /// Loaded from the store and untouched.
    Persisted { id: String, front: String, back: String },
    /// Loaded from the store and edited locally.
    Modified { id: String, front: String, back: String },
    /// Loaded from the store and removed locally.
    Deleted { id: String },
}

impl CardEntry {
    /// The persisted id this entry refers to, if any.
    fn persisted_id(&self) -> Option<&str> {
        match self {
            CardEntry::New { .. } => None,
            CardEntry::Persisted { id, .. }
            | CardEntry::Modified { id, .. }
            | CardEntry::Deleted { id } => Some(id),
        }
    }
}

/// The two bulk operations a save issues, in order: delete, then upsert.
#[derive(Debug, Clone, Default)]
pub struct SavePlan {
    pub delete_ids: Vec<String>,
    pub upserts: Vec<CardUpsert>,
}

/// Computes the save plan. `original_ids` must be the snapshot of persisted
/// card ids taken when the editing screen loaded.
///
/// Deletions are original ids that no surviving entry refers to, plus entries
/// explicitly tagged `Deleted`. Upserts cover every surviving entry; `New`
/// entries without an id are assigned one here.
#[must_use]
pub fn plan_save(original_ids: &[String], entries: &[CardEntry]) -> SavePlan {
    let surviving: HashSet<&str> = entries
        .iter()
        .filter(|e| !matches!(e, CardEntry::Deleted { .. }))
        .filter_map(CardEntry::persisted_id)
        .collect();

    let mut delete_ids: Vec<String> = original_ids
        .iter()
        .filter(|id| !surviving.contains(id.as_str()))
        .cloned()
        .collect();

    // Explicit Deleted tags may cover cards the snapshot missed.
    for entry in entries {
        if let CardEntry::Deleted { id } = entry {
            if !delete_ids.contains(id) {
                delete_ids.push(id.clone());
            }
        }
    }

    let upserts = entries
        .iter()
        .filter_map(|entry| match entry {
            CardEntry::New { id, front, back } => Some(CardUpsert {
                id: id
                    .clone()
                    .unwrap_or_else(|| Uuid::new_v4().to_string()),
                front: front.clone(),
                back: back.clone(),
            }),
            CardEntry::Persisted { id, front, back } | CardEntry::Modified { id, front, back } => {
                Some(CardUpsert {
                    id: id.clone(),
                    front: front.clone(),
                    back: back.clone(),
                })
            }
            CardEntry::Deleted { .. } => None,
        })
        .collect();

    SavePlan {
        delete_ids,
        upserts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn persisted(id: &str) -> CardEntry {
        CardEntry::Persisted {
            id: id.to_string(),
            front: format!("{id}-front"),
            back: format!("{id}-back"),
        }
    }

    #[test]
    fn diff_deletes_missing_and_upserts_survivors() {
        // originals {a, b, c}; survivors {a, c} plus one new card.
        let original = ids(&["a", "b", "c"]);
        let entries = vec![
            persisted("a"),
            persisted("c"),
            CardEntry::New {
                id: None,
                front: "fresh".to_string(),
                back: "card".to_string(),
            },
        ];

        let plan = plan_save(&original, &entries);

        assert_eq!(plan.delete_ids, ids(&["b"]));
        assert_eq!(plan.upserts.len(), 3);

        let upsert_ids: Vec<&str> = plan.upserts.iter().map(|u| u.id.as_str()).collect();
        assert!(upsert_ids.contains(&"a"));
        assert!(upsert_ids.contains(&"c"));
        // The new card got a generated id.
        assert!(plan.upserts.iter().any(|u| u.front == "fresh" && !u.id.is_empty()));
    }

    #[test]
    fn explicit_deleted_tag_is_honored() {
        let original = ids(&["a", "b"]);
        let entries = vec![
            persisted("a"),
            CardEntry::Deleted { id: "b".to_string() },
        ];

        let plan = plan_save(&original, &entries);
        assert_eq!(plan.delete_ids, ids(&["b"]));
        assert_eq!(plan.upserts.len(), 1);
        assert_eq!(plan.upserts[0].id, "a");
    }

    #[test]
    fn deleted_tag_outside_snapshot_is_not_duplicated() {
        let original = ids(&["a"]);
        let entries = vec![
            persisted("a"),
            CardEntry::Deleted { id: "z".to_string() },
        ];

        let plan = plan_save(&original, &entries);
        assert_eq!(plan.delete_ids, ids(&["z"]));
    }

    #[test]
    fn modified_entries_are_upserted_not_deleted() {
        let original = ids(&["a"]);
        let entries = vec![CardEntry::Modified {
            id: "a".to_string(),
            front: "edited".to_string(),
            back: "card".to_string(),
        }];

        let plan = plan_save(&original, &entries);
        assert!(plan.delete_ids.is_empty());
        assert_eq!(plan.upserts.len(), 1);
        assert_eq!(plan.upserts[0].front, "edited");
    }

    #[test]
    fn clearing_every_card_deletes_the_whole_snapshot() {
        let original = ids(&["a", "b"]);
        let plan = plan_save(&original, &[]);

        assert_eq!(plan.delete_ids, ids(&["a", "b"]));
        assert!(plan.upserts.is_empty());
    }

    #[test]
    fn new_entry_keeps_a_client_generated_id() {
        let entries = vec![CardEntry::New {
            id: Some("client-uuid".to_string()),
            front: "f".to_string(),
            back: "b".to_string(),
        }];

        let plan = plan_save(&[], &entries);
        assert_eq!(plan.upserts[0].id, "client-uuid");
    }
}
