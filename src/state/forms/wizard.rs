//! The wizard engine: fields, steps, validation gate, drafts, submission

use super::field::{FieldValue, FormField};
use super::field_store::FieldStore;
use super::offer::Offer;
use super::pricing::{PriceBreakdown, DEFAULT_TAX_RATE};
use super::steps::{StepController, StepSchema, Transition};
use super::validation::ValidationResult;
use crate::draft::{DraftPersistence, DraftStatus};
use crate::gateway::SubmissionRecord;
use rust_decimal::Decimal;
use thiserror::Error;

/// When drafts are written and dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DraftPolicy {
    /// Save after every field mutation
    pub autosave: bool,
    /// Remove the saved draft once a submission is delivered
    pub clear_on_submit: bool,
}

/// Static description of one wizard
#[derive(Debug, Clone)]
pub struct WizardSchema {
    pub id: &'static str,
    pub title: &'static str,
    pub steps: Vec<StepSchema>,
    /// Fields copied into the record summary for triage
    pub summary_keys: &'static [&'static str],
    pub policy: DraftPolicy,
    /// Whether this wizard shows a price breakdown for its offer
    pub priced: bool,
    /// Builds the default store, optionally seeded from an offer
    pub defaults: fn(Option<&Offer>) -> FieldStore,
}

/// Where the wizard is in its lifecycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Editing,
    /// Delivery in flight; fields stay editable, submit is disabled
    Submitting(SubmissionRecord),
    /// Last delivery failed; still on the final step and retryable
    Failed(String),
    Submitted(SubmissionRecord),
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("submission is only possible from the final step")]
    NotOnFinalStep,
    #[error("{} field(s) need attention", .0.len())]
    Invalid(ValidationResult),
    #[error("a submission is already in flight")]
    InFlight,
    #[error("this form was already submitted")]
    AlreadySubmitted,
}

/// A running wizard instance
#[derive(Debug)]
pub struct Wizard {
    schema: WizardSchema,
    defaults: FieldStore,
    fields: FieldStore,
    controller: StepController,
    errors: ValidationResult,
    phase: Phase,
    offer: Option<Offer>,
    tax_rate: Decimal,
    drafts: Option<DraftPersistence>,
    draft_status: Option<DraftStatus>,
    /// Focused field within the current step
    active_field: usize,
}

impl Wizard {
    /// Create a wizard, restoring a saved draft when one is available
    pub fn new(schema: WizardSchema, offer: Option<Offer>, drafts: Option<DraftPersistence>) -> Self {
        let offer = if schema.priced {
            Some(offer.unwrap_or_default())
        } else {
            offer
        };
        let defaults = (schema.defaults)(offer.as_ref());
        let mut fields = defaults.clone();
        if let Some(snapshot) = drafts.as_ref().and_then(DraftPersistence::load) {
            let applied = fields.apply_snapshot(&snapshot);
            tracing::info!(wizard = schema.id, applied, "rehydrated from draft");
        }
        let controller = StepController::new(schema.steps.len());
        Self {
            schema,
            defaults,
            fields,
            controller,
            errors: ValidationResult::default(),
            phase: Phase::Editing,
            offer,
            tax_rate: DEFAULT_TAX_RATE,
            drafts,
            draft_status: None,
            active_field: 0,
        }
    }

    pub fn with_tax_rate(mut self, rate: Decimal) -> Self {
        self.tax_rate = rate;
        self
    }

    pub fn id(&self) -> &'static str {
        self.schema.id
    }

    pub fn title(&self) -> &'static str {
        self.schema.title
    }

    pub fn steps(&self) -> &[StepSchema] {
        &self.schema.steps
    }

    pub fn step_index(&self) -> usize {
        self.controller.current()
    }

    pub fn current_step(&self) -> &StepSchema {
        &self.schema.steps[self.controller.current()]
    }

    pub fn is_completed(&self, index: usize) -> bool {
        self.controller.is_completed(index)
    }

    pub fn is_current(&self, index: usize) -> bool {
        self.controller.is_current(index)
    }

    pub fn is_last_step(&self) -> bool {
        self.controller.is_last()
    }

    pub fn field(&self, key: &str) -> Option<&FormField> {
        self.fields.get(key)
    }

    /// Errors surfaced by the last blocked move or submit on this step
    pub fn errors(&self) -> &ValidationResult {
        &self.errors
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn offer(&self) -> Option<&Offer> {
        self.offer.as_ref()
    }

    pub fn draft_status(&self) -> Option<&DraftStatus> {
        self.draft_status.as_ref()
    }

    pub fn has_drafts(&self) -> bool {
        self.drafts.is_some()
    }

    /// Price for the current offer, recomputed on every call
    pub fn price(&self) -> Option<PriceBreakdown> {
        if !self.schema.priced {
            return None;
        }
        self.offer
            .as_ref()
            .map(|offer| PriceBreakdown::compute(offer.base_price, self.tax_rate))
    }

    fn is_locked(&self) -> bool {
        matches!(self.phase, Phase::Submitted(_))
    }

    /// Steps only change while nothing is in flight or delivered
    fn can_navigate(&self) -> bool {
        matches!(self.phase, Phase::Editing | Phase::Failed(_))
    }

    // ------------------------------------------------------------------
    // Field mutation
    // ------------------------------------------------------------------

    pub fn set(&mut self, key: &str, value: FieldValue) -> bool {
        self.mutate(key, |fields| fields.set(key, value))
    }

    pub fn set_flag(&mut self, key: &str, value: bool) -> bool {
        self.set(key, FieldValue::Flag(value))
    }

    pub fn toggle_member(&mut self, key: &str, value: &str) -> bool {
        self.mutate(key, |fields| fields.toggle_member(key, value))
    }

    /// Apply an in-place edit (keystroke, choice cycling) to one field
    pub fn edit_field(&mut self, key: &str, edit: impl FnOnce(&mut FormField)) -> bool {
        self.mutate(key, |fields| {
            let Some(field) = fields.get_mut(key) else {
                return false;
            };
            let before = field.value.clone();
            edit(field);
            field.value != before
        })
    }

    fn mutate(&mut self, key: &str, change: impl FnOnce(&mut FieldStore) -> bool) -> bool {
        if self.is_locked() {
            return false;
        }
        let changed = change(&mut self.fields);
        if changed {
            self.after_mutation(key);
        }
        changed
    }

    fn after_mutation(&mut self, key: &str) {
        let rules = &self.schema.steps[self.controller.current()].rules;
        self.errors
            .invalidate(|field| rules.iter().any(|r| r.key() == field && r.reads(key)));
        if self.schema.policy.autosave {
            self.save_draft();
        }
    }

    // ------------------------------------------------------------------
    // Focus within a step
    // ------------------------------------------------------------------

    pub fn active_field(&self) -> usize {
        self.active_field
    }

    pub fn active_field_key(&self) -> Option<&'static str> {
        self.current_step().fields.get(self.active_field).copied()
    }

    pub fn focus_next(&mut self) {
        let count = self.current_step().fields.len();
        if count > 0 {
            self.active_field = (self.active_field + 1) % count;
        }
    }

    pub fn focus_prev(&mut self) {
        let count = self.current_step().fields.len();
        if count > 0 {
            self.active_field = (self.active_field + count - 1) % count;
        }
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    pub fn next(&mut self) -> Transition {
        if !self.can_navigate() {
            return Transition::Unchanged;
        }
        let transition = self.controller.next(&self.schema.steps, &self.fields);
        self.apply_transition(&transition);
        transition
    }

    pub fn back(&mut self) -> Transition {
        if !self.can_navigate() {
            return Transition::Unchanged;
        }
        let transition = self.controller.back();
        self.apply_transition(&transition);
        transition
    }

    pub fn jump_to(&mut self, index: usize) -> Transition {
        if !self.can_navigate() {
            return Transition::Unchanged;
        }
        let transition = self
            .controller
            .jump_to(index, &self.schema.steps, &self.fields);
        self.apply_transition(&transition);
        transition
    }

    fn apply_transition(&mut self, transition: &Transition) {
        match transition {
            Transition::Moved { from, to } => {
                tracing::debug!(wizard = self.schema.id, from, to, "step changed");
                self.errors.clear();
                self.active_field = 0;
            }
            Transition::Blocked { errors, .. } => {
                self.errors = errors.clone();
                self.active_field = 0;
                self.focus_first_error();
            }
            Transition::Unchanged => {}
        }
    }

    fn focus_first_error(&mut self) {
        let step = &self.schema.steps[self.controller.current()];
        if let Some(pos) = step
            .fields
            .iter()
            .position(|key| self.errors.get(key).is_some())
        {
            self.active_field = pos;
        }
    }

    // ------------------------------------------------------------------
    // Drafts
    // ------------------------------------------------------------------

    /// Save now. Without configured persistence this reports a failure.
    pub fn save_draft(&mut self) -> DraftStatus {
        let status = match &self.drafts {
            Some(drafts) => drafts.save(&self.fields),
            None => DraftStatus::Failed("drafts are not kept for this form".to_string()),
        };
        self.draft_status = Some(status.clone());
        status
    }

    // ------------------------------------------------------------------
    // Submission
    // ------------------------------------------------------------------

    /// Whether the submit action should be enabled
    pub fn can_submit(&self) -> bool {
        self.controller.is_last() && matches!(self.phase, Phase::Editing | Phase::Failed(_))
    }

    /// Validate the final step and freeze a record; enters `Submitting`.
    pub fn prepare_submission(&mut self) -> Result<SubmissionRecord, SubmitError> {
        match self.phase {
            Phase::Submitting(_) => return Err(SubmitError::InFlight),
            Phase::Submitted(_) => return Err(SubmitError::AlreadySubmitted),
            Phase::Editing | Phase::Failed(_) => {}
        }
        if !self.controller.is_last() {
            return Err(SubmitError::NotOnFinalStep);
        }
        let errors = self.current_step().validate(&self.fields);
        if !errors.is_valid() {
            self.errors = errors.clone();
            self.focus_first_error();
            return Err(SubmitError::Invalid(errors));
        }
        self.errors.clear();

        let record = SubmissionRecord::new(
            self.schema.id,
            self.fields.snapshot(),
            self.schema.summary_keys,
            self.price(),
        );
        tracing::info!(wizard = self.schema.id, id = record.id(), "submission prepared");
        self.phase = Phase::Submitting(record.clone());
        Ok(record)
    }

    /// Record the sink's answer for the in-flight submission
    pub fn complete_submission(&mut self, outcome: anyhow::Result<()>) {
        let Phase::Submitting(record) = &self.phase else {
            tracing::warn!(wizard = self.schema.id, "delivery result without a pending submission");
            return;
        };
        match outcome {
            Ok(()) => {
                tracing::info!(wizard = self.schema.id, id = record.id(), "submission delivered");
                self.phase = Phase::Submitted(record.clone());
                if self.schema.policy.clear_on_submit {
                    if let Some(drafts) = &self.drafts {
                        self.draft_status = Some(drafts.clear());
                    }
                }
            }
            Err(e) => {
                tracing::warn!(wizard = self.schema.id, error = %e, "submission failed");
                self.phase = Phase::Failed(format!("{e:#}"));
            }
        }
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Start over for a different offer; nothing from the previous context survives
    pub fn reopen(&mut self, offer: Option<Offer>) {
        self.offer = if self.schema.priced {
            Some(offer.unwrap_or_default())
        } else {
            offer
        };
        self.defaults = (self.schema.defaults)(self.offer.as_ref());
        self.fields.reset(&self.defaults);
        self.controller.restart();
        self.errors.clear();
        self.phase = Phase::Editing;
        self.active_field = 0;
        self.draft_status = None;
        tracing::debug!(wizard = self.schema.id, "wizard reopened");
    }

    /// Close the wizard. Unpersisted wizards lose their in-memory state;
    /// persisted ones keep the last saved draft.
    pub fn dismiss(&mut self) {
        if self.drafts.is_none() {
            self.fields.reset(&self.defaults);
            self.controller.restart();
            self.errors.clear();
        }
        tracing::info!(wizard = self.schema.id, "wizard dismissed");
    }
}

#[cfg(test)]
impl Wizard {
    pub fn fields(&self) -> &FieldStore {
        &self.fields
    }

    pub fn set_text(&mut self, key: &str, value: impl Into<String>) -> bool {
        self.mutate(key, |fields| fields.set_text(key, value))
    }

    pub fn set_choice(&mut self, key: &str, value: Option<&str>) -> bool {
        self.mutate(key, |fields| fields.set_choice(key, value))
    }

    /// Prepare, deliver, and settle in one call
    pub async fn submit(
        &mut self,
        sink: &dyn crate::gateway::SubmissionSink,
    ) -> anyhow::Result<SubmissionRecord> {
        let record = self.prepare_submission()?;
        let outcome = sink.deliver(&record).await;
        let failure = outcome.as_ref().err().map(|e| format!("{e:#}"));
        self.complete_submission(outcome);
        match failure {
            None => Ok(record),
            Some(message) => Err(anyhow::anyhow!(message)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::{DraftStore, MemoryDraftStore};
    use crate::gateway::MockSubmissionSink;
    use crate::state::forms::validation::Rule;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn defaults(offer: Option<&Offer>) -> FieldStore {
        FieldStore::new(vec![
            FormField::text("name", "Name")
                .with_value(FieldValue::Text(offer.map(|o| o.title.clone()).unwrap_or_default())),
            FormField::multi_select("topics", "Topics", &["A", "B"]),
            FormField::flag("consent", "Consent"),
        ])
    }

    fn schema(priced: bool, autosave: bool) -> WizardSchema {
        WizardSchema {
            id: "test",
            title: "Test",
            steps: vec![
                StepSchema::new(
                    "Details",
                    vec!["name", "topics"],
                    vec![
                        Rule::Required {
                            key: "name",
                            message: "Name is required",
                        },
                        Rule::MinSelected {
                            key: "topics",
                            min: 1,
                            message: "Pick one",
                        },
                    ],
                ),
                StepSchema::new(
                    "Confirm",
                    vec!["consent"],
                    vec![Rule::MustAccept {
                        key: "consent",
                        message: "Consent is required",
                    }],
                ),
            ],
            summary_keys: &["name"],
            policy: DraftPolicy {
                autosave,
                clear_on_submit: true,
            },
            priced,
            defaults,
        }
    }

    fn filled() -> Wizard {
        let mut wizard = Wizard::new(schema(false, false), None, None);
        wizard.set_text("name", "Ada");
        wizard.toggle_member("topics", "A");
        wizard
    }

    fn ok_sink() -> MockSubmissionSink {
        let mut sink = MockSubmissionSink::new();
        sink.expect_deliver().returning(|_| Ok(()));
        sink
    }

    #[test]
    fn test_blocked_next_surfaces_errors() {
        let mut wizard = Wizard::new(schema(false, false), None, None);
        let transition = wizard.next();
        assert!(matches!(transition, Transition::Blocked { at: 0, .. }));
        assert_eq!(wizard.step_index(), 0);
        assert_eq!(wizard.errors().get("name"), Some("Name is required"));
        assert_eq!(wizard.errors().get("topics"), Some("Pick one"));
    }

    #[test]
    fn test_mutation_invalidates_only_affected_error() {
        let mut wizard = Wizard::new(schema(false, false), None, None);
        wizard.next();
        wizard.set_text("name", "Ada");
        assert!(wizard.errors().get("name").is_none());
        assert_eq!(wizard.errors().get("topics"), Some("Pick one"));
    }

    #[test]
    fn test_blocked_next_focuses_first_error() {
        let mut wizard = Wizard::new(schema(false, false), None, None);
        wizard.set_text("name", "Ada");
        wizard.next();
        assert_eq!(wizard.active_field_key(), Some("topics"));
    }

    #[test]
    fn test_successful_move_clears_errors() {
        let mut wizard = filled();
        assert_eq!(wizard.next(), Transition::Moved { from: 0, to: 1 });
        assert!(wizard.errors().is_valid());
        assert!(wizard.is_completed(0));
    }

    #[test]
    fn test_focus_wraps_within_step() {
        let mut wizard = filled();
        assert_eq!(wizard.active_field_key(), Some("name"));
        wizard.focus_next();
        assert_eq!(wizard.active_field_key(), Some("topics"));
        wizard.focus_next();
        assert_eq!(wizard.active_field_key(), Some("name"));
        wizard.focus_prev();
        assert_eq!(wizard.active_field_key(), Some("topics"));
    }

    #[test]
    fn test_edit_field_reports_change() {
        let mut wizard = filled();
        assert!(wizard.edit_field("name", |f| f.push_char('!')));
        assert_eq!(wizard.field("name").unwrap().as_text(), "Ada!");
        assert!(!wizard.edit_field("consent", |f| f.pop_char()));
        assert!(!wizard.edit_field("ghost", |f| f.push_char('x')));
    }

    #[test]
    fn test_prepare_rejected_before_final_step() {
        let mut wizard = filled();
        assert!(matches!(
            wizard.prepare_submission(),
            Err(SubmitError::NotOnFinalStep)
        ));
        assert_eq!(wizard.phase(), &Phase::Editing);
    }

    #[test]
    fn test_prepare_rejected_when_final_step_invalid() {
        let mut wizard = filled();
        wizard.next();
        let err = wizard.prepare_submission().unwrap_err();
        assert!(matches!(err, SubmitError::Invalid(ref e) if e.get("consent").is_some()));
        assert_eq!(wizard.phase(), &Phase::Editing);
        assert_eq!(wizard.errors().get("consent"), Some("Consent is required"));
        assert!(wizard.can_submit());
    }

    #[tokio::test]
    async fn test_submit_enters_submitted() {
        let mut wizard = filled();
        wizard.next();
        wizard.set_flag("consent", true);

        let record = wizard.submit(&ok_sink()).await.unwrap();
        assert_eq!(record.summary()["name"], "Ada");
        assert!(matches!(wizard.phase(), Phase::Submitted(r) if r.id() == record.id()));
        assert!(!wizard.can_submit());
    }

    #[tokio::test]
    async fn test_submit_failure_keeps_fields_and_allows_retry() {
        let mut wizard = filled();
        wizard.next();
        wizard.set_flag("consent", true);
        let before = wizard.fields().clone();

        let mut failing = MockSubmissionSink::new();
        failing
            .expect_deliver()
            .times(1)
            .returning(|_| Err(anyhow::anyhow!("backend unreachable")));
        let err = wizard.submit(&failing).await.unwrap_err();
        assert!(err.to_string().contains("unreachable"));
        assert!(matches!(wizard.phase(), Phase::Failed(_)));
        assert_eq!(wizard.fields(), &before);
        assert_eq!(wizard.step_index(), 1);
        assert!(wizard.can_submit());

        assert!(wizard.submit(&ok_sink()).await.is_ok());
    }

    #[test]
    fn test_second_prepare_while_in_flight_is_rejected() {
        let mut wizard = filled();
        wizard.next();
        wizard.set_flag("consent", true);
        wizard.prepare_submission().unwrap();
        assert!(!wizard.can_submit());
        assert!(matches!(
            wizard.prepare_submission(),
            Err(SubmitError::InFlight)
        ));
        // Fields stay editable while in flight
        assert!(wizard.set_text("name", "Grace"));
    }

    #[test]
    fn test_steps_frozen_while_in_flight() {
        let mut wizard = filled();
        wizard.next();
        wizard.set_flag("consent", true);
        wizard.prepare_submission().unwrap();

        assert_eq!(wizard.back(), Transition::Unchanged);
        assert_eq!(wizard.jump_to(0), Transition::Unchanged);
        assert_eq!(wizard.next(), Transition::Unchanged);
        assert!(wizard.is_current(1));

        wizard.complete_submission(Err(anyhow::anyhow!("down")));
        assert_eq!(wizard.phase(), &Phase::Failed("down".to_string()));
        assert!(wizard.is_last_step());
        assert!(wizard.can_submit());
        // Once settled as failed, the user may leave the final step again
        assert_eq!(wizard.back(), Transition::Moved { from: 1, to: 0 });
    }

    #[test]
    fn test_submitted_wizard_is_locked() {
        let mut wizard = filled();
        wizard.next();
        wizard.set_flag("consent", true);
        wizard.prepare_submission().unwrap();
        wizard.complete_submission(Ok(()));
        assert!(!wizard.set_text("name", "Grace"));
        assert_eq!(wizard.back(), Transition::Unchanged);
        assert!(matches!(
            wizard.prepare_submission(),
            Err(SubmitError::AlreadySubmitted)
        ));
    }

    #[test]
    fn test_complete_without_pending_is_ignored() {
        let mut wizard = filled();
        wizard.complete_submission(Ok(()));
        assert_eq!(wizard.phase(), &Phase::Editing);
    }

    #[test]
    fn test_autosave_and_rehydrate() {
        let store = Arc::new(MemoryDraftStore::new());
        let drafts = DraftPersistence::new(store.clone(), "test");
        let mut wizard = Wizard::new(schema(false, true), None, Some(drafts.clone()));
        wizard.set_text("name", "Ada");
        wizard.toggle_member("topics", "B");
        assert_eq!(wizard.draft_status(), Some(&DraftStatus::Saved));

        let restored = Wizard::new(schema(false, true), None, Some(drafts));
        assert_eq!(restored.fields(), wizard.fields());
        assert_eq!(restored.step_index(), 0);
    }

    #[test]
    fn test_corrupt_draft_falls_back_to_defaults() {
        let store = Arc::new(MemoryDraftStore::new());
        store.write("test", "][").unwrap();
        let drafts = DraftPersistence::new(store, "test");
        let wizard = Wizard::new(schema(false, true), None, Some(drafts));
        assert_eq!(wizard.fields(), &defaults(None));
    }

    #[test]
    fn test_save_without_persistence_reports_failure() {
        let mut wizard = filled();
        assert!(matches!(wizard.save_draft(), DraftStatus::Failed(_)));
    }

    #[tokio::test]
    async fn test_draft_cleared_after_submit() {
        let store = Arc::new(MemoryDraftStore::new());
        let drafts = DraftPersistence::new(store.clone(), "test");
        let mut wizard = Wizard::new(schema(false, true), None, Some(drafts));
        wizard.set_text("name", "Ada");
        wizard.toggle_member("topics", "A");
        wizard.next();
        wizard.set_flag("consent", true);
        wizard.submit(&ok_sink()).await.unwrap();

        assert_eq!(store.read("test").unwrap(), None);
        assert_eq!(wizard.draft_status(), Some(&DraftStatus::Cleared));
    }

    #[test]
    fn test_price_follows_offer() {
        let wizard = Wizard::new(schema(true, false), None, None);
        let price = wizard.price().unwrap();
        assert_eq!(price.base, Offer::default().base_price);
        assert_eq!(price.total, price.base + price.tax);

        let unpriced = Wizard::new(schema(false, false), Some(Offer::default()), None);
        assert!(unpriced.price().is_none());
    }

    #[test]
    fn test_reopen_does_not_leak_previous_context() {
        let mut wizard = Wizard::new(schema(true, false), None, None);
        wizard.toggle_member("topics", "A");
        wizard.next();

        let other = Offer {
            title: "Custom Training".to_string(),
            base_price: Decimal::new(250000, 2),
            ..Offer::default()
        };
        wizard.reopen(Some(other));
        assert_eq!(wizard.step_index(), 0);
        assert_eq!(wizard.field("name").unwrap().as_text(), "Custom Training");
        assert!(wizard.field("topics").unwrap().as_set().is_empty());
        assert_eq!(wizard.price().unwrap().base, Decimal::new(250000, 2));
        assert_eq!(wizard.phase(), &Phase::Editing);
    }

    #[test]
    fn test_dismiss_discards_unpersisted_state() {
        let mut wizard = filled();
        wizard.next();
        wizard.dismiss();
        assert_eq!(wizard.step_index(), 0);
        assert_eq!(wizard.fields(), &defaults(None));
    }
}
