//! Group edit and delete orchestration
//!
//! A slot group has no server-side identity of its own, so editing one is a
//! destructive two-phase operation: delete every member rule, then create a
//! fresh set from the submitted form. The two phases are strictly sequential
//! so a create can never race ahead of a stale delete and duplicate rules.
//! There is no client-side atomicity: deletes that completed before a
//! failure are not rolled back, and the failure report names the rules that
//! could not be removed so the operator can retry.

use async_trait::async_trait;
use bw_core::models::{CreateSlotRulesRequest, SlotInterval, TimeSlotRule};
use tracing::{debug, info, warn};

use crate::error::{DeleteFailure, Result, SlotError};
use crate::grouping::SlotGroup;

/// Collaborator seam for slot-rule persistence, implemented over the remote
/// API by bw-api and by in-memory mocks in tests.
#[async_trait]
pub trait SlotRuleStore: Send + Sync {
    /// Create the stored rules for one logical group.
    async fn create_rules(&self, request: CreateSlotRulesRequest) -> Result<Vec<TimeSlotRule>>;

    /// Delete one stored rule by id.
    async fn delete_rule(&self, id: &str) -> Result<()>;
}

/// Editable form state for one group, used to pre-populate the edit dialog
/// and to carry the submitted replacement.
#[derive(Debug, Clone)]
pub struct GroupForm {
    pub scope: bw_core::models::RecurrenceScope,
    pub specific_date: Option<chrono::NaiveDate>,
    /// `"HH:MM-HH:MM"` strings, deduplicated
    pub intervals: Vec<String>,
    pub max_bookings: u32,
    pub is_active: bool,
}

impl GroupForm {
    /// Capture a group's current shape as pre-filled form state.
    pub fn from_group(group: &SlotGroup) -> Self {
        Self {
            scope: group.scope,
            specific_date: group.specific_date,
            intervals: group.intervals(),
            max_bookings: group.max_bookings,
            is_active: group.is_active,
        }
    }

    /// Convert the form into the create request for the replacement rules.
    pub fn into_request(self) -> Result<CreateSlotRulesRequest> {
        let intervals = self
            .intervals
            .iter()
            .map(|s| {
                SlotInterval::from_interval_string(s)
                    .ok_or_else(|| SlotError::MalformedInterval(s.clone()))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(CreateSlotRulesRequest {
            scope: self.scope,
            intervals,
            specific_date: self.specific_date,
            max_bookings: self.max_bookings,
            is_active: self.is_active,
        })
    }
}

/// Delete every member of `group`, letting all deletes settle before
/// reporting. A rule the server no longer knows counts as deleted.
async fn delete_members(store: &dyn SlotRuleStore, group: &SlotGroup) -> Vec<DeleteFailure> {
    let mut failed = Vec::new();
    for rule in &group.rules {
        match store.delete_rule(&rule.id).await {
            Ok(()) => debug!("Deleted slot rule {}", rule.id),
            Err(SlotError::RuleNotFound(_)) => {
                // Already gone server-side; the outcome is what we wanted
                debug!("Slot rule {} was already deleted", rule.id);
            }
            Err(e) => {
                warn!("Failed to delete slot rule {}: {}", rule.id, e);
                failed.push(DeleteFailure {
                    rule_id: rule.id.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }
    failed
}

/// Replace a group: delete every current member, then create the submitted
/// rules. If any delete fails the create is never attempted and the failed
/// rule ids are returned; deletes that already completed stay deleted.
pub async fn replace_group(
    store: &dyn SlotRuleStore,
    group: &SlotGroup,
    form: GroupForm,
) -> Result<Vec<TimeSlotRule>> {
    let request = form.into_request()?;

    let failed = delete_members(store, group).await;
    if !failed.is_empty() {
        return Err(SlotError::DeleteFailed { failed });
    }

    let created = store.create_rules(request).await?;
    info!(
        "Replaced group of {} rule(s) with {} new rule(s)",
        group.rules.len(),
        created.len()
    );
    Ok(created)
}

/// Delete a group: one delete per member rule, settle-and-report semantics,
/// no create phase.
pub async fn delete_group(store: &dyn SlotRuleStore, group: &SlotGroup) -> Result<()> {
    let failed = delete_members(store, group).await;
    if !failed.is_empty() {
        return Err(SlotError::DeleteFailed { failed });
    }
    info!("Deleted group of {} rule(s)", group.rules.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grouping::group_slots;
    use bw_core::models::RecurrenceScope;
    use std::collections::HashSet;
    use std::sync::Mutex;

    struct MockStore {
        fail_deletes: HashSet<String>,
        missing: HashSet<String>,
        deleted: Mutex<Vec<String>>,
        created: Mutex<Vec<CreateSlotRulesRequest>>,
    }

    impl MockStore {
        fn new() -> Self {
            Self {
                fail_deletes: HashSet::new(),
                missing: HashSet::new(),
                deleted: Mutex::new(Vec::new()),
                created: Mutex::new(Vec::new()),
            }
        }

        fn failing(ids: &[&str]) -> Self {
            let mut store = Self::new();
            store.fail_deletes = ids.iter().map(|s| s.to_string()).collect();
            store
        }

        fn create_count(&self) -> usize {
            self.created.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl SlotRuleStore for MockStore {
        async fn create_rules(
            &self,
            request: CreateSlotRulesRequest,
        ) -> Result<Vec<TimeSlotRule>> {
            self.created.lock().unwrap().push(request);
            Ok(Vec::new())
        }

        async fn delete_rule(&self, id: &str) -> Result<()> {
            if self.fail_deletes.contains(id) {
                return Err(SlotError::Store(format!("delete rejected for {}", id)));
            }
            if self.missing.contains(id) {
                return Err(SlotError::RuleNotFound(id.to_string()));
            }
            self.deleted.lock().unwrap().push(id.to_string());
            Ok(())
        }
    }

    fn weekend_rule(id: &str, start: &str, end: &str) -> TimeSlotRule {
        TimeSlotRule {
            id: id.to_string(),
            start_time: start.to_string(),
            end_time: end.to_string(),
            day_of_week: None,
            is_weekend: true,
            specific_date: None,
            max_bookings: 2,
            current_bookings: 0,
            is_active: true,
        }
    }

    fn weekend_group(ids: &[&str]) -> SlotGroup {
        let rules: Vec<TimeSlotRule> = ids
            .iter()
            .enumerate()
            .map(|(i, id)| weekend_rule(id, &format!("{:02}:00", 8 + i), &format!("{:02}:00", 9 + i)))
            .collect();
        let mut groups = group_slots(&rules).unwrap();
        assert_eq!(groups.len(), 1);
        groups.remove(0)
    }

    #[tokio::test]
    async fn test_replace_group_happy_path() {
        let store = MockStore::new();
        let group = weekend_group(&["a", "b"]);
        let form = GroupForm::from_group(&group);

        replace_group(&store, &group, form).await.unwrap();

        assert_eq!(*store.deleted.lock().unwrap(), vec!["a", "b"]);
        let created = store.created.lock().unwrap();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].scope, RecurrenceScope::Weekend);
        assert_eq!(created[0].intervals.len(), 2);
    }

    #[tokio::test]
    async fn test_create_skipped_when_any_delete_fails() {
        // The failing rule's position in the batch must not matter
        for failing in ["a", "b", "c"] {
            let store = MockStore::failing(&[failing]);
            let group = weekend_group(&["a", "b", "c"]);
            let form = GroupForm::from_group(&group);

            let err = replace_group(&store, &group, form).await.unwrap_err();
            match err {
                SlotError::DeleteFailed { failed } => {
                    assert_eq!(failed.len(), 1);
                    assert_eq!(failed[0].rule_id, failing);
                }
                other => panic!("unexpected error: {:?}", other),
            }
            assert_eq!(store.create_count(), 0, "create ran despite failed delete");
        }
    }

    #[tokio::test]
    async fn test_all_deletes_settle_before_reporting() {
        // A failure early in the batch must not stop the remaining deletes
        let store = MockStore::failing(&["a"]);
        let group = weekend_group(&["a", "b", "c"]);

        let err = delete_group(&store, &group).await.unwrap_err();
        assert!(matches!(err, SlotError::DeleteFailed { .. }));
        assert_eq!(*store.deleted.lock().unwrap(), vec!["b", "c"]);
    }

    #[tokio::test]
    async fn test_already_deleted_rule_is_not_fatal() {
        let mut store = MockStore::new();
        store.missing.insert("a".to_string());
        let group = weekend_group(&["a", "b"]);
        let form = GroupForm::from_group(&group);

        replace_group(&store, &group, form).await.unwrap();
        assert_eq!(store.create_count(), 1);
    }

    #[tokio::test]
    async fn test_form_prefill_captures_group_shape() {
        let group = weekend_group(&["a", "b"]);
        let form = GroupForm::from_group(&group);

        assert_eq!(form.scope, RecurrenceScope::Weekend);
        assert_eq!(form.intervals, vec!["08:00-09:00", "09:00-10:00"]);
        assert_eq!(form.max_bookings, 2);
        assert!(form.is_active);
    }

    #[tokio::test]
    async fn test_malformed_form_interval_fails_before_any_delete() {
        let store = MockStore::new();
        let group = weekend_group(&["a"]);
        let mut form = GroupForm::from_group(&group);
        form.intervals = vec!["0800".to_string()];

        let err = replace_group(&store, &group, form).await.unwrap_err();
        assert!(matches!(err, SlotError::MalformedInterval(_)));
        assert!(store.deleted.lock().unwrap().is_empty());
        assert_eq!(store.create_count(), 0);
    }
}
