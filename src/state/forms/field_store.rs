//! Ordered, typed store of every field a wizard collects

use super::field::{FieldKind, FieldValue, FormField};
use std::collections::BTreeMap;

/// Key/value snapshot of a store, as persisted and submitted
pub type FieldSnapshot = BTreeMap<String, FieldValue>;

/// All fields of one wizard, in declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldStore {
    fields: Vec<FormField>,
}

impl FieldStore {
    pub fn new(fields: Vec<FormField>) -> Self {
        Self { fields }
    }

    pub fn get(&self, key: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.name == key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut FormField> {
        self.fields.iter_mut().find(|f| f.name == key)
    }

    /// Value of `key`, or `None` for unknown keys
    pub fn value(&self, key: &str) -> Option<&FieldValue> {
        self.get(key).map(|f| &f.value)
    }

    /// Replace the value for `key`.
    ///
    /// Returns false (and changes nothing) when the key is unknown or the
    /// value's variant does not match the field's kind.
    pub fn set(&mut self, key: &str, value: FieldValue) -> bool {
        let Some(field) = self.get_mut(key) else {
            tracing::debug!(key, "ignoring write to unknown field");
            return false;
        };
        if !field.kind.accepts(&value) {
            tracing::warn!(key, ?value, "ignoring write with mismatched field kind");
            return false;
        }
        field.value = value;
        true
    }

    /// Add `value` to the set at `key` if absent, remove it if present.
    ///
    /// Insertion order is kept, so toggling the same value twice restores
    /// the previous set exactly.
    pub fn toggle_member(&mut self, key: &str, value: &str) -> bool {
        let Some(field) = self.get_mut(key) else {
            tracing::debug!(key, "ignoring toggle on unknown field");
            return false;
        };
        let FieldValue::Set(items) = &mut field.value else {
            tracing::warn!(key, "ignoring toggle on non multi-select field");
            return false;
        };
        if let Some(pos) = items.iter().position(|v| v == value) {
            items.remove(pos);
        } else {
            items.push(value.to_string());
        }
        true
    }

    /// Restore every field to the given defaults
    pub fn reset(&mut self, defaults: &FieldStore) {
        self.fields = defaults.fields.clone();
    }

    /// Ordered key/value copy of the current values
    pub fn snapshot(&self) -> FieldSnapshot {
        self.fields
            .iter()
            .map(|f| (f.name.to_string(), f.value.clone()))
            .collect()
    }

    /// Overlay values from a snapshot, skipping unknown keys and values whose
    /// variant no longer matches the field. Returns how many values applied.
    pub fn apply_snapshot(&mut self, snapshot: &FieldSnapshot) -> usize {
        let mut applied = 0;
        for field in &mut self.fields {
            match snapshot.get(field.name) {
                Some(value) if field.kind.accepts(value) => {
                    field.value = sanitize(&field.kind, value.clone());
                    applied += 1;
                }
                Some(_) => {
                    tracing::warn!(key = field.name, "draft value has wrong kind, keeping default");
                }
                None => {}
            }
        }
        applied
    }
}

/// Drop duplicate set members that may have been hand-edited into a draft
fn sanitize(kind: &FieldKind, value: FieldValue) -> FieldValue {
    match (kind, value) {
        (FieldKind::MultiSelect(_), FieldValue::Set(items)) => {
            let mut unique: Vec<String> = Vec::with_capacity(items.len());
            for item in items {
                if !unique.contains(&item) {
                    unique.push(item);
                }
            }
            FieldValue::Set(unique)
        }
        (_, value) => value,
    }
}

#[cfg(test)]
impl FieldStore {
    pub fn set_text(&mut self, key: &str, value: impl Into<String>) -> bool {
        self.set(key, FieldValue::Text(value.into()))
    }

    pub fn set_choice(&mut self, key: &str, value: Option<&str>) -> bool {
        self.set(key, FieldValue::Choice(value.map(str::to_string)))
    }

    pub fn set_flag(&mut self, key: &str, value: bool) -> bool {
        self.set(key, FieldValue::Flag(value))
    }
}
