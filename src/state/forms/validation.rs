//! Per-step validation rules
//!
//! Validation runs only when the user tries to move forward or submit.
//! Rules are pure: they read a [`FieldStore`] and never touch it.

use super::field::{FieldKind, FieldValue};
use super::field_store::FieldStore;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeMap;

lazy_static! {
    static ref EMAIL_REGEX: Regex =
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid");
}

/// How strictly an email field is checked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailCheck {
    /// Non-empty only
    Presence,
    /// Non-empty and shaped like `local@domain.tld`
    Format,
}

/// A single validation rule bound to one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// Text must be non-blank
    Required {
        key: &'static str,
        message: &'static str,
    },
    /// A choice must be made, and it must be one of the field's options
    ChoiceRequired {
        key: &'static str,
        message: &'static str,
    },
    /// At least `min` members selected
    MinSelected {
        key: &'static str,
        min: usize,
        message: &'static str,
    },
    /// `key` is required only while `when` currently equals `equals`
    RequiredWhen {
        key: &'static str,
        when: &'static str,
        equals: &'static str,
        message: &'static str,
    },
    /// Checkbox must be ticked
    MustAccept {
        key: &'static str,
        message: &'static str,
    },
    Email {
        key: &'static str,
        check: EmailCheck,
        message: &'static str,
    },
}

impl Rule {
    /// The field an error from this rule is reported against
    pub fn key(&self) -> &'static str {
        match self {
            Rule::Required { key, .. }
            | Rule::ChoiceRequired { key, .. }
            | Rule::MinSelected { key, .. }
            | Rule::RequiredWhen { key, .. }
            | Rule::MustAccept { key, .. }
            | Rule::Email { key, .. } => *key,
        }
    }

    /// Whether the outcome of this rule depends on `field`
    pub fn reads(&self, field: &str) -> bool {
        match self {
            Rule::RequiredWhen { key, when, .. } => *key == field || *when == field,
            other => other.key() == field,
        }
    }

    /// Evaluate against the store; `Some(message)` when failing
    pub fn check(&self, store: &FieldStore) -> Option<&'static str> {
        let value = store.value(self.key());
        let failed = match self {
            Rule::Required { .. } => value.map_or(true, FieldValue::is_empty),
            Rule::ChoiceRequired { key, .. } => !choice_is_valid(store, key),
            Rule::MinSelected { min, .. } => match value {
                Some(FieldValue::Set(items)) => items.len() < *min,
                _ => true,
            },
            Rule::RequiredWhen { when, equals, .. } => {
                let triggered = store
                    .value(when)
                    .is_some_and(|v| v.as_plain().as_str() == *equals);
                triggered && value.map_or(true, FieldValue::is_empty)
            }
            Rule::MustAccept { .. } => !matches!(value, Some(FieldValue::Flag(true))),
            Rule::Email { check, .. } => match value {
                Some(v) if !v.is_empty() => {
                    *check == EmailCheck::Format && !is_valid_email(&v.as_plain())
                }
                _ => true,
            },
        };
        failed.then(|| self.message())
    }

    fn message(&self) -> &'static str {
        match self {
            Rule::Required { message, .. }
            | Rule::ChoiceRequired { message, .. }
            | Rule::MinSelected { message, .. }
            | Rule::RequiredWhen { message, .. }
            | Rule::MustAccept { message, .. }
            | Rule::Email { message, .. } => *message,
        }
    }
}

fn choice_is_valid(store: &FieldStore, key: &str) -> bool {
    let Some(field) = store.get(key) else {
        return false;
    };
    match (&field.kind, field.as_choice()) {
        (FieldKind::Choice(options), Some(choice)) => options.iter().any(|o| *o == choice),
        _ => false,
    }
}

/// Loose structural email check: something@something.tld, no whitespace
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email.trim())
}

/// Field key to error message for exactly the fields currently failing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    errors: BTreeMap<String, String>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.errors.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Drop errors whose key satisfies `stale`
    pub fn invalidate(&mut self, mut stale: impl FnMut(&str) -> bool) {
        self.errors.retain(|key, _| !stale(key));
    }

    pub fn clear(&mut self) {
        self.errors.clear();
    }

    fn insert_first(&mut self, key: &str, message: &str) {
        self.errors
            .entry(key.to_string())
            .or_insert_with(|| message.to_string());
    }
}

/// Run every rule; the first failing rule for a field supplies its message
pub fn validate(rules: &[Rule], store: &FieldStore) -> ValidationResult {
    let mut result = ValidationResult::default();
    for rule in rules {
        if let Some(message) = rule.check(store) {
            result.insert_first(rule.key(), message);
        }
    }
    result
}
