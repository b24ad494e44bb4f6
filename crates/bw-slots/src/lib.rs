//! bw-slots: Time-slot grouping and group editing
//!
//! This crate turns the flat slot-rule list the server stores into the
//! logical units the administrator works with.
//!
//! ## Features
//!
//! - Pure grouping of rules by recurrence scope, capacity, and active state
//! - Scope-filtered views over a grouping
//! - Deduplicated per-group interval summaries
//! - Two-phase (delete-then-create) group replacement with explicit
//!   partial-failure reporting
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bw_slots::{group_slots, filter_groups, GroupForm, ScopeFilter};
//!
//! let groups = group_slots(&rules)?;
//! let weekend = filter_groups(&groups, ScopeFilter::Weekend);
//!
//! let form = GroupForm::from_group(&groups[0]);
//! bw_slots::replace_group(store.as_ref(), &groups[0], form).await?;
//! ```

pub mod editor;
pub mod error;
pub mod grouping;

pub use editor::{delete_group, replace_group, GroupForm, SlotRuleStore};
pub use error::{DeleteFailure, Result, SlotError};
pub use grouping::{filter_groups, group_slots, ScopeFilter, SlotGroup};
