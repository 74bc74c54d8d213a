//! Schema Snapshot
//!
//! Field names and priority levels defined in the tracker, fetched once per
//! session. A snapshot is never edited; refreshing replaces it.

use std::collections::BTreeMap;

use jira_assistant_core::{FieldDefinition, PriorityLevel};
use serde::Serialize;

/// Display name of the priority field
pub const PRIORITY_FIELD: &str = "Priority";
/// Display name of the story point custom field
pub const STORY_POINTS_FIELD: &str = "Story point estimate";
/// Display name of the due date field
pub const DUE_DATE_FIELD: &str = "Due date";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SchemaSnapshot {
    fields: BTreeMap<String, String>,
    priorities: Vec<String>,
}

impl SchemaSnapshot {
    /// Build a snapshot. When two fields share a display name the first
    /// identifier wins.
    pub fn new(fields: Vec<FieldDefinition>, priorities: Vec<PriorityLevel>) -> Self {
        let mut by_name = BTreeMap::new();
        for field in fields {
            by_name.entry(field.name).or_insert(field.id);
        }

        let mut names: Vec<String> = Vec::with_capacity(priorities.len());
        for level in priorities {
            if !names.contains(&level.name) {
                names.push(level.name);
            }
        }

        Self {
            fields: by_name,
            priorities: names,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.priorities.is_empty()
    }

    /// Field identifier for a display name
    pub fn field_id(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Field display names in sorted order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Priority names in the order the tracker reported them
    pub fn priority_names(&self) -> &[String] {
        &self.priorities
    }

    /// Canonical spelling of a priority name, matched case-insensitively
    pub fn resolve_priority(&self, name: &str) -> Option<&str> {
        let wanted = name.trim();
        self.priorities
            .iter()
            .find(|p| p.eq_ignore_ascii_case(wanted))
            .map(String::as_str)
    }

    pub fn story_points_field_id(&self) -> Option<&str> {
        self.field_id(STORY_POINTS_FIELD)
    }
}
