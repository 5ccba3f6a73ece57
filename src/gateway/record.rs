//! Immutable snapshot handed to a submission sink

use crate::state::{FieldSnapshot, PriceBreakdown};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// A finished wizard, frozen at the moment of final confirmation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    id: String,
    wizard: String,
    created_at: DateTime<Utc>,
    fields: FieldSnapshot,
    /// Denormalized values for triage (organization type, cohort size, ...)
    summary: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    price: Option<PriceBreakdown>,
}

impl SubmissionRecord {
    pub fn new(
        wizard: &str,
        fields: FieldSnapshot,
        summary_keys: &[&str],
        price: Option<PriceBreakdown>,
    ) -> Self {
        let summary = summary_keys
            .iter()
            .filter_map(|key| {
                fields
                    .get(*key)
                    .map(|value| (key.to_string(), value.as_plain()))
            })
            .collect();
        Self {
            id: Uuid::new_v4().to_string(),
            wizard: wizard.to_string(),
            created_at: Utc::now(),
            fields,
            summary,
            price,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn wizard(&self) -> &str {
        &self.wizard
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn fields(&self) -> &FieldSnapshot {
        &self.fields
    }

    pub fn summary(&self) -> &BTreeMap<String, String> {
        &self.summary
    }

    pub fn price(&self) -> Option<&PriceBreakdown> {
        self.price.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::FieldValue;
    use pretty_assertions::assert_eq;

    fn snapshot() -> FieldSnapshot {
        let mut fields = FieldSnapshot::new();
        fields.insert("orgName".into(), FieldValue::Text("Acme".into()));
        fields.insert(
            "orgType".into(),
            FieldValue::Choice(Some("University".into())),
        );
        fields.insert(
            "formats".into(),
            FieldValue::Set(vec!["Online".into(), "Hybrid".into()]),
        );
        fields
    }

    #[test]
    fn test_new_generates_id_and_timestamp() {
        let before = Utc::now();
        let record = SubmissionRecord::new("partnership", snapshot(), &[], None);
        assert!(!record.id().is_empty());
        assert!(Uuid::parse_str(record.id()).is_ok());
        assert!(record.created_at() >= before);
        assert_eq!(record.wizard(), "partnership");
    }

    #[test]
    fn test_ids_are_unique() {
        let a = SubmissionRecord::new("apply", snapshot(), &[], None);
        let b = SubmissionRecord::new("apply", snapshot(), &[], None);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_summary_picks_known_keys() {
        let record = SubmissionRecord::new(
            "partnership",
            snapshot(),
            &["orgType", "formats", "missing"],
            None,
        );
        assert_eq!(record.summary().len(), 2);
        assert_eq!(record.summary()["orgType"], "University");
        assert_eq!(record.summary()["formats"], "Online, Hybrid");
    }

    #[test]
    fn test_serializes_without_price_when_absent() {
        let record = SubmissionRecord::new("partnership", snapshot(), &[], None);
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("price").is_none());
        let back: SubmissionRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }
}
