//! Time-slot grouping engine
//!
//! The administrative slot screen edits logical "rules", not the individual
//! stored rows the server expands them into. This module reduces a flat rule
//! list into those logical units: rules sharing a recurrence scope (plus the
//! specific date, for date-scoped rules), capacity, and active state form one
//! group. Grouping is a pure function of the rule fields; it is recomputed
//! from every fetched snapshot and holds no state across calls.

use std::collections::HashMap;

use bw_core::models::{RecurrenceScope, TimeSlotRule};
use serde::Serialize;

use crate::error::{Result, SlotError};

/// A set of slot rules the administrator manages as one unit.
///
/// Member order preserves the order in which the rules first appeared in
/// the input snapshot.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotGroup {
    pub scope: RecurrenceScope,
    /// Set iff `scope` is `SpecificDate`
    pub specific_date: Option<chrono::NaiveDate>,
    pub max_bookings: u32,
    pub is_active: bool,
    pub rules: Vec<TimeSlotRule>,
}

impl SlotGroup {
    /// Deduplicated `"HH:MM-HH:MM"` interval strings, in first-appearance
    /// order. Weekday recurrence persists one row per day, so structurally
    /// identical intervals are common and collapse to one entry here.
    pub fn intervals(&self) -> Vec<String> {
        let mut seen = Vec::new();
        for rule in &self.rules {
            let interval = rule.interval();
            if !seen.contains(&interval) {
                seen.push(interval);
            }
        }
        seen
    }

    /// Ids of every member rule, in member order.
    pub fn rule_ids(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.id.as_str()).collect()
    }
}

/// Grouping key for a rule: scope, the specific date where applicable,
/// capacity, and active state.
fn group_key(rule: &TimeSlotRule) -> String {
    // specific_date drives the scope, so matching on it directly keeps the
    // key and the classification in lockstep
    if let Some(date) = rule.specific_date {
        format!("specific:{}:{}:{}", date, rule.max_bookings, rule.is_active)
    } else {
        let scope = RecurrenceScope::of(rule);
        format!("{}:{}:{}", scope.key_name(), rule.max_bookings, rule.is_active)
    }
}

/// Group a rule snapshot into administrator-facing units.
///
/// Pure and deterministic: the partition depends only on rule fields, group
/// emission follows first-seen key order, and each group's members keep
/// input order. Malformed rules are a precondition violation and fail the
/// whole call rather than producing a partial grouping.
pub fn group_slots(rules: &[TimeSlotRule]) -> Result<Vec<SlotGroup>> {
    for rule in rules {
        rule.validate()
            .map_err(|e| SlotError::MalformedRule(e.to_string()))?;
    }

    let mut groups: Vec<SlotGroup> = Vec::new();
    let mut index_by_key: HashMap<String, usize> = HashMap::new();

    for rule in rules {
        let key = group_key(rule);
        match index_by_key.get(&key).copied() {
            Some(i) => groups[i].rules.push(rule.clone()),
            None => {
                index_by_key.insert(key, groups.len());
                groups.push(SlotGroup {
                    scope: RecurrenceScope::of(rule),
                    specific_date: rule.specific_date,
                    max_bookings: rule.max_bookings,
                    is_active: rule.is_active,
                    rules: vec![rule.clone()],
                });
            }
        }
    }

    tracing::debug!("Grouped {} rules into {} groups", rules.len(), groups.len());
    Ok(groups)
}

/// Named scope views over an already-computed grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeFilter {
    All,
    Specific,
    Weekend,
    AllDays,
}

impl ScopeFilter {
    /// Parse a view name as used in filter queries.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "all" => Some(ScopeFilter::All),
            "specific" => Some(ScopeFilter::Specific),
            "weekend" => Some(ScopeFilter::Weekend),
            "allDays" => Some(ScopeFilter::AllDays),
            _ => None,
        }
    }

    fn matches(&self, scope: RecurrenceScope) -> bool {
        match self {
            ScopeFilter::All => true,
            ScopeFilter::Specific => scope == RecurrenceScope::SpecificDate,
            ScopeFilter::Weekend => scope == RecurrenceScope::Weekend,
            ScopeFilter::AllDays => scope == RecurrenceScope::AllDays,
        }
    }
}

/// Filter groups by scope. This is a view over the grouping, never a
/// re-grouping, and uses the same scope classification the grouping did.
pub fn filter_groups<'a>(groups: &'a [SlotGroup], filter: ScopeFilter) -> Vec<&'a SlotGroup> {
    groups.iter().filter(|g| filter.matches(g.scope)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn rule(id: &str, start: &str, end: &str) -> TimeSlotRule {
        TimeSlotRule {
            id: id.to_string(),
            start_time: start.to_string(),
            end_time: end.to_string(),
            day_of_week: None,
            is_weekend: false,
            specific_date: None,
            max_bookings: 2,
            current_bookings: 0,
            is_active: true,
        }
    }

    fn weekend_rule(id: &str, start: &str, end: &str) -> TimeSlotRule {
        let mut r = rule(id, start, end);
        r.is_weekend = true;
        r.max_bookings = 1;
        r
    }

    fn dated_rule(id: &str, date: &str, start: &str, end: &str) -> TimeSlotRule {
        let mut r = rule(id, start, end);
        r.specific_date = Some(date.parse::<NaiveDate>().unwrap());
        r
    }

    fn all_permutations(rules: &[TimeSlotRule]) -> Vec<Vec<TimeSlotRule>> {
        if rules.len() <= 1 {
            return vec![rules.to_vec()];
        }
        let mut result = Vec::new();
        for i in 0..rules.len() {
            let mut rest = rules.to_vec();
            let head = rest.remove(i);
            for mut tail in all_permutations(&rest) {
                tail.insert(0, head.clone());
                result.push(tail);
            }
        }
        result
    }

    #[test]
    fn test_end_to_end_grouping() {
        let rules = vec![
            dated_rule("a", "2024-12-25", "08:00", "09:00"),
            dated_rule("b", "2024-12-25", "09:00", "10:00"),
            weekend_rule("c", "10:00", "11:00"),
        ];

        let groups = group_slots(&rules).unwrap();
        assert_eq!(groups.len(), 2);

        assert_eq!(groups[0].scope, RecurrenceScope::SpecificDate);
        assert_eq!(groups[0].rule_ids(), vec!["a", "b"]);
        assert_eq!(groups[0].intervals(), vec!["08:00-09:00", "09:00-10:00"]);

        assert_eq!(groups[1].scope, RecurrenceScope::Weekend);
        assert_eq!(groups[1].rule_ids(), vec!["c"]);
    }

    #[test]
    fn test_grouping_deterministic_under_permutation() {
        let rules = vec![
            dated_rule("a", "2024-12-25", "08:00", "09:00"),
            weekend_rule("b", "10:00", "11:00"),
            rule("c", "12:00", "13:00"),
            dated_rule("d", "2024-12-25", "09:00", "10:00"),
        ];

        let baseline = group_slots(&rules).unwrap();
        let mut baseline_keys: Vec<Vec<&str>> =
            baseline.iter().map(|g| g.rule_ids()).collect();
        baseline_keys.iter_mut().for_each(|ids| ids.sort());
        baseline_keys.sort();

        for permutation in all_permutations(&rules) {
            let groups = group_slots(&permutation).unwrap();
            let mut keys: Vec<Vec<&str>> = groups.iter().map(|g| g.rule_ids()).collect();
            keys.iter_mut().for_each(|ids| ids.sort());
            keys.sort();
            assert_eq!(keys, baseline_keys, "partition differs for {:?}", permutation);
        }
    }

    #[test]
    fn test_grouping_idempotent() {
        let rules = vec![
            dated_rule("a", "2024-12-25", "08:00", "09:00"),
            weekend_rule("b", "10:00", "11:00"),
            dated_rule("c", "2024-12-25", "09:00", "10:00"),
            rule("d", "12:00", "13:00"),
        ];

        let first = group_slots(&rules).unwrap();
        let flattened: Vec<TimeSlotRule> = first
            .iter()
            .flat_map(|g| g.rules.iter().cloned())
            .collect();
        let second = group_slots(&flattened).unwrap();

        let keys = |groups: &[SlotGroup]| -> Vec<Vec<String>> {
            groups
                .iter()
                .map(|g| g.rules.iter().map(|r| r.id.clone()).collect())
                .collect()
        };
        assert_eq!(keys(&first), keys(&second));
    }

    #[test]
    fn test_group_splits_on_capacity_and_active_state() {
        let mut a = weekend_rule("a", "08:00", "09:00");
        let mut b = weekend_rule("b", "09:00", "10:00");
        a.max_bookings = 1;
        b.max_bookings = 2;
        let mut c = weekend_rule("c", "10:00", "11:00");
        c.max_bookings = 1;
        c.is_active = false;

        let groups = group_slots(&[a, b, c]).unwrap();
        assert_eq!(groups.len(), 3);
    }

    #[test]
    fn test_interval_dedup_preserves_first_appearance_order() {
        let rules = vec![
            weekend_rule("a", "08:00", "09:00"),
            weekend_rule("b", "09:00", "10:00"),
            weekend_rule("c", "08:00", "09:00"),
        ];
        let groups = group_slots(&rules).unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].intervals(), vec!["08:00-09:00", "09:00-10:00"]);
    }

    #[test]
    fn test_malformed_rule_rejected() {
        let mut bad = rule("a", "09:00", "08:00");
        bad.id = "backwards".to_string();
        let err = group_slots(&[bad]).unwrap_err();
        assert!(matches!(err, SlotError::MalformedRule(_)));
    }

    #[test]
    fn test_scope_filter_views() {
        let rules = vec![
            dated_rule("a", "2024-12-25", "08:00", "09:00"),
            weekend_rule("b", "10:00", "11:00"),
            rule("c", "12:00", "13:00"),
        ];
        let groups = group_slots(&rules).unwrap();

        assert_eq!(filter_groups(&groups, ScopeFilter::All).len(), 3);
        let specific = filter_groups(&groups, ScopeFilter::Specific);
        assert_eq!(specific.len(), 1);
        assert_eq!(specific[0].rule_ids(), vec!["a"]);
        assert_eq!(filter_groups(&groups, ScopeFilter::Weekend).len(), 1);
        assert_eq!(filter_groups(&groups, ScopeFilter::AllDays).len(), 1);

        assert_eq!(ScopeFilter::parse("allDays"), Some(ScopeFilter::AllDays));
        assert_eq!(ScopeFilter::parse("bogus"), None);
    }
}
