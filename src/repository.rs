//! Deletion flow for a set in a user's repository. What a delete request
//! means depends on who is asking: an owner chooses between removing the set
//! for themselves or for everyone; a non-owner can only unlink it. The flow
//! is a small total state machine a UI drives; every transition from an
//! unexpected state is a no-op back to the same state.

/// Confirmation choice made by a set owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteScope {
    /// Remove only the caller's repository link.
    SelfOnly,
    /// Remove the set itself, for every user. Owner-only.
    Everyone,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteFlow {
    Idle,
    /// Owner is choosing between self-only and everyone.
    ConfirmingOwnerChoice { set_id: String },
    /// Non-owner is confirming removal of their link.
    ConfirmingMemberDelete { set_id: String },
    /// Deletion request is in flight.
    Deleting { set_id: String, scope: DeleteScope },
}

impl Default for DeleteFlow {
    fn default() -> Self {
        Self::Idle
    }
}

impl DeleteFlow {
    #[must_use]
    pub fn new() -> Self {
        Self::Idle
    }

    /// A delete was requested. Ownership decides which confirmation to show.
    pub fn request(&mut self, set_id: impl Into<String>, is_owner: bool) {
        if *self != Self::Idle {
            return;
        }
        let set_id = set_id.into();
        *self = if is_owner {
            Self::ConfirmingOwnerChoice { set_id }
        } else {
            Self::ConfirmingMemberDelete { set_id }
        };
    }

    /// Dismisses any pending confirmation.
    pub fn cancel(&mut self) {
        if matches!(
            self,
            Self::ConfirmingOwnerChoice { .. } | Self::ConfirmingMemberDelete { .. }
        ) {
            *self = Self::Idle;
        }
    }

    /// Confirms the pending dialog. `Everyone` is only reachable from the
    /// owner choice; a member confirmation always resolves to `SelfOnly`.
    /// Returns the deletion to execute, or None if nothing was pending.
    pub fn confirm(&mut self, scope: DeleteScope) -> Option<(String, DeleteScope)> {
        let (set_id, scope) = match (&*self, scope) {
            (Self::ConfirmingOwnerChoice { set_id }, scope) => (set_id.clone(), scope),
            (Self::ConfirmingMemberDelete { set_id }, _) => (set_id.clone(), DeleteScope::SelfOnly),
            _ => return None,
        };
        *self = Self::Deleting {
            set_id: set_id.clone(),
            scope,
        };
        Some((set_id, scope))
    }

    /// The in-flight deletion finished. On success the caller removes the set
    /// from its displayed collection; on failure it surfaces the error. Either
    /// way the flow returns to idle with no partial state retained.
    pub fn finish(&mut self) {
        if matches!(self, Self::Deleting { .. }) {
            *self = Self::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_request_offers_the_choice() {
        let mut flow = DeleteFlow::new();
        flow.request("s1", true);
        assert_eq!(
            flow,
            DeleteFlow::ConfirmingOwnerChoice {
                set_id: "s1".to_string()
            }
        );
    }

    #[test]
    fn member_request_confirms_link_removal_only() {
        let mut flow = DeleteFlow::new();
        flow.request("s1", false);
        assert_eq!(
            flow,
            DeleteFlow::ConfirmingMemberDelete {
                set_id: "s1".to_string()
            }
        );

        // A member cannot escalate to delete-for-everyone.
        let (set_id, scope) = flow.confirm(DeleteScope::Everyone).unwrap();
        assert_eq!(set_id, "s1");
        assert_eq!(scope, DeleteScope::SelfOnly);
    }

    #[test]
    fn owner_can_delete_for_everyone() {
        let mut flow = DeleteFlow::new();
        flow.request("s1", true);
        let (_, scope) = flow.confirm(DeleteScope::Everyone).unwrap();
        assert_eq!(scope, DeleteScope::Everyone);
    }

    #[test]
    fn cancel_returns_to_idle() {
        let mut flow = DeleteFlow::new();
        flow.request("s1", true);
        flow.cancel();
        assert_eq!(flow, DeleteFlow::Idle);

        // Nothing pending: confirm is a no-op.
        assert!(flow.confirm(DeleteScope::SelfOnly).is_none());
    }

    #[test]
    fn finish_completes_the_cycle() {
        let mut flow = DeleteFlow::new();
        flow.request("s1", false);
        flow.confirm(DeleteScope::SelfOnly).unwrap();
        assert!(matches!(flow, DeleteFlow::Deleting { .. }));

        flow.finish();
        assert_eq!(flow, DeleteFlow::Idle);
    }

    #[test]
    fn request_while_busy_is_ignored() {
        let mut flow = DeleteFlow::new();
        flow.request("s1", true);
        flow.request("s2", false);
        assert_eq!(
            flow,
            DeleteFlow::ConfirmingOwnerChoice {
                set_id: "s1".to_string()
            }
        );
    }
}
