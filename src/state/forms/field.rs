//! Form field value objects

use serde::{Deserialize, Serialize};

/// What a field holds and how it is edited
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    ShortText,
    LongText,
    /// Exactly one of a fixed option set; starts unselected unless seeded
    Choice(&'static [&'static str]),
    Flag,
    /// Any subset of a fixed option set, kept in selection order
    MultiSelect(&'static [&'static str]),
}

impl FieldKind {
    /// The empty value for this kind
    pub fn empty_value(&self) -> FieldValue {
        match self {
            FieldKind::ShortText | FieldKind::LongText => FieldValue::Text(String::new()),
            FieldKind::Choice(_) => FieldValue::Choice(None),
            FieldKind::Flag => FieldValue::Flag(false),
            FieldKind::MultiSelect(_) => FieldValue::Set(Vec::new()),
        }
    }

    /// Whether `value` has the variant this kind stores
    pub fn accepts(&self, value: &FieldValue) -> bool {
        matches!(
            (self, value),
            (FieldKind::ShortText | FieldKind::LongText, FieldValue::Text(_))
                | (FieldKind::Choice(_), FieldValue::Choice(_))
                | (FieldKind::Flag, FieldValue::Flag(_))
                | (FieldKind::MultiSelect(_), FieldValue::Set(_))
        )
    }

    pub fn options(&self) -> &'static [&'static str] {
        match self {
            FieldKind::Choice(options) | FieldKind::MultiSelect(options) => options,
            _ => &[],
        }
    }
}

/// Type-safe field values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Text(String),
    Choice(Option<String>),
    Flag(bool),
    Set(Vec<String>),
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Text(String::new())
    }
}

impl FieldValue {
    /// Empty text (after trimming), no selection, unchecked flag, or empty set
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::Choice(c) => c.as_deref().map_or(true, |c| c.trim().is_empty()),
            FieldValue::Flag(b) => !*b,
            FieldValue::Set(items) => items.is_empty(),
        }
    }

    /// Flat string form used for summaries and equality checks in rules
    pub fn as_plain(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Choice(c) => c.clone().unwrap_or_default(),
            FieldValue::Flag(b) => if *b { "yes" } else { "no" }.to_string(),
            FieldValue::Set(items) => items.join(", "),
        }
    }
}

/// Represents a single form field with its configuration and value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub value: FieldValue,
}

impl FormField {
    fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        let value = kind.empty_value();
        Self {
            name,
            label,
            kind,
            value,
        }
    }

    /// Create a single-line text field
    pub fn text(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::ShortText)
    }

    /// Create a multi-line text field
    pub fn long_text(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::LongText)
    }

    /// Create a single-choice field with no selection
    pub fn choice(
        name: &'static str,
        label: &'static str,
        options: &'static [&'static str],
    ) -> Self {
        Self::new(name, label, FieldKind::Choice(options))
    }

    /// Create a checkbox field, unchecked
    pub fn flag(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Flag)
    }

    /// Create a multi-select chip field with nothing selected
    pub fn multi_select(
        name: &'static str,
        label: &'static str,
        options: &'static [&'static str],
    ) -> Self {
        Self::new(name, label, FieldKind::MultiSelect(options))
    }

    /// Replace the default value, keeping the field's kind
    pub fn with_value(mut self, value: FieldValue) -> Self {
        if self.kind.accepts(&value) {
            self.value = value;
        }
        self
    }

    pub fn is_multiline(&self) -> bool {
        self.kind == FieldKind::LongText
    }

    /// Get the text value (returns empty string for non-text fields)
    pub fn as_text(&self) -> &str {
        match &self.value {
            FieldValue::Text(s) => s,
            _ => "",
        }
    }

    pub fn as_choice(&self) -> Option<&str> {
        match &self.value {
            FieldValue::Choice(c) => c.as_deref(),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> bool {
        matches!(self.value, FieldValue::Flag(true))
    }

    pub fn as_set(&self) -> &[String] {
        match &self.value {
            FieldValue::Set(items) => items,
            _ => &[],
        }
    }

    /// Push a character to a text field
    pub fn push_char(&mut self, c: char) {
        if let FieldValue::Text(s) = &mut self.value {
            if c == '\n' && self.kind != FieldKind::LongText {
                return;
            }
            s.push(c);
        }
    }

    /// Remove the last character from a text field
    pub fn pop_char(&mut self) {
        if let FieldValue::Text(s) = &mut self.value {
            s.pop();
        }
    }

    /// Step the selection of a choice field forward or backward, wrapping
    pub fn cycle_choice(&mut self, forward: bool) {
        let FieldKind::Choice(options) = self.kind else {
            return;
        };
        if options.is_empty() {
            return;
        }
        let current = self
            .as_choice()
            .and_then(|c| options.iter().position(|o| *o == c));
        let next = match (current, forward) {
            (None, true) => 0,
            (None, false) => options.len() - 1,
            (Some(i), true) => (i + 1) % options.len(),
            (Some(0), false) => options.len() - 1,
            (Some(i), false) => i - 1,
        };
        self.value = FieldValue::Choice(Some(options[next].to_string()));
    }

    /// Get the display value for rendering
    pub fn display_value(&self) -> String {
        match &self.value {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Choice(None) => "Select...".to_string(),
            FieldValue::Choice(Some(c)) => c.clone(),
            FieldValue::Flag(true) => "[x]".to_string(),
            FieldValue::Flag(false) => "[ ]".to_string(),
            FieldValue::Set(items) if items.is_empty() => "(none)".to_string(),
            FieldValue::Set(items) => items.join(", "),
        }
    }
}
