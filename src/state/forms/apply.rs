//! Three-step Apply / Review / Pay flow for a single offer

use super::field::{FieldValue, FormField};
use super::field_store::FieldStore;
use super::offer::Offer;
use super::steps::StepSchema;
use super::validation::{EmailCheck, Rule};
use super::wizard::{DraftPolicy, WizardSchema};

pub const ID: &str = "apply";

const EXPERIENCE: &[&str] = &["Beginner", "Some experience", "Professional"];
const BILLING: &[&str] = &["Individual", "Company"];
const PAYMENT_METHODS: &[&str] = &["Card", "Bank transfer", "Invoice"];

fn defaults(offer: Option<&Offer>) -> FieldStore {
    let program = offer.map(|o| o.title.clone()).unwrap_or_default();
    FieldStore::new(vec![
        // Apply
        FormField::text("program", "Program").with_value(FieldValue::Text(program)),
        FormField::text("fullName", "Full name"),
        FormField::text("email", "Email"),
        FormField::text("country", "Country"),
        FormField::choice("experience", "Experience level", EXPERIENCE),
        FormField::long_text("motivation", "Why this program? (optional)"),
        // Review
        FormField::choice("billingType", "Billing as", BILLING),
        FormField::text("companyName", "Company name"),
        FormField::text("vatId", "VAT ID (optional)"),
        // Pay
        FormField::choice("paymentMethod", "Payment method", PAYMENT_METHODS)
            .with_value(FieldValue::Choice(Some("Card".to_string()))),
        FormField::flag("authorized", "I authorize this payment"),
        FormField::flag("agreeContact", "I agree to be contacted about my application"),
    ])
}

/// Schema for the Apply modal; nothing is persisted between sessions
pub fn schema(email: EmailCheck) -> WizardSchema {
    WizardSchema {
        id: ID,
        title: "Apply",
        steps: vec![
            StepSchema::new(
                "Apply",
                vec!["program", "fullName", "email", "country", "experience", "motivation"],
                vec![
                    Rule::Required {
                        key: "program",
                        message: "Program is required",
                    },
                    Rule::Required {
                        key: "fullName",
                        message: "Full name is required",
                    },
                    Rule::Email {
                        key: "email",
                        check: email,
                        message: "A valid email is required",
                    },
                    Rule::Required {
                        key: "country",
                        message: "Country is required",
                    },
                    Rule::ChoiceRequired {
                        key: "experience",
                        message: "Select your experience level",
                    },
                ],
            ),
            StepSchema::new(
                "Review",
                vec!["billingType", "companyName", "vatId"],
                vec![
                    Rule::ChoiceRequired {
                        key: "billingType",
                        message: "Choose how you will be billed",
                    },
                    Rule::RequiredWhen {
                        key: "companyName",
                        when: "billingType",
                        equals: "Company",
                        message: "Company name is required for company billing",
                    },
                ],
            ),
            StepSchema::new(
                "Pay",
                vec!["paymentMethod", "authorized", "agreeContact"],
                vec![
                    Rule::ChoiceRequired {
                        key: "paymentMethod",
                        message: "Select a payment method",
                    },
                    Rule::MustAccept {
                        key: "authorized",
                        message: "Please authorize the payment",
                    },
                    Rule::MustAccept {
                        key: "agreeContact",
                        message: "We need your consent to contact you",
                    },
                ],
            ),
        ],
        summary_keys: &["program", "fullName", "email", "billingType"],
        policy: DraftPolicy {
            autosave: false,
            clear_on_submit: false,
        },
        priced: true,
        defaults,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MockSubmissionSink;
    use crate::state::forms::steps::Transition;
    use crate::state::forms::wizard::{Phase, SubmitError, Wizard};
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn at_pay_step() -> Wizard {
        let mut w = Wizard::new(schema(EmailCheck::Format), None, None);
        w.set_text("fullName", "Ada Lovelace");
        w.set_text("email", "ada@example.org");
        w.set_text("country", "UK");
        w.set_choice("experience", Some("Professional"));
        w.set_choice("billingType", Some("Individual"));
        assert_eq!(w.jump_to(2), Transition::Moved { from: 0, to: 2 });
        w
    }

    #[test]
    fn test_program_seeded_from_offer() {
        let w = Wizard::new(schema(EmailCheck::Format), None, None);
        assert_eq!(
            w.field("program").unwrap().as_text(),
            Offer::default().title
        );
        assert_eq!(
            w.field("paymentMethod").unwrap().as_choice(),
            Some("Card")
        );
    }

    #[test]
    fn test_price_breakdown_for_default_offer() {
        let w = Wizard::new(schema(EmailCheck::Format), None, None);
        let price = w.price().unwrap();
        assert_eq!(price.base, dec!(1499.00));
        assert_eq!(price.tax, dec!(284.81));
        assert_eq!(price.total, dec!(1783.81));
    }

    #[test]
    fn test_custom_tax_rate() {
        let w = Wizard::new(schema(EmailCheck::Format), None, None).with_tax_rate(dec!(0.07));
        let price = w.price().unwrap();
        assert_eq!(price.tax, dec!(104.93));
        assert_eq!(price.total, dec!(1603.93));
    }

    #[test]
    fn test_company_billing_requires_company_name() {
        let mut w = Wizard::new(schema(EmailCheck::Format), None, None);
        w.set_text("fullName", "Ada Lovelace");
        w.set_text("email", "ada@example.org");
        w.set_text("country", "UK");
        w.set_choice("experience", Some("Beginner"));
        w.set_choice("billingType", Some("Company"));
        assert!(matches!(w.jump_to(2), Transition::Blocked { at: 1, .. }));
        assert!(w.errors().get("companyName").is_some());
    }

    #[tokio::test]
    async fn test_submit_requires_authorization() {
        let mut w = at_pay_step();
        let mut sink = MockSubmissionSink::new();
        sink.expect_deliver().never();

        let err = w.submit(&sink).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SubmitError>(),
            Some(SubmitError::Invalid(e)) if e.get("authorized").is_some()
        ));
        assert_eq!(w.phase(), &Phase::Editing);
    }

    #[tokio::test]
    async fn test_submit_with_consent_produces_record() {
        let mut w = at_pay_step();
        w.set_flag("authorized", true);
        w.set_flag("agreeContact", true);

        let mut sink = MockSubmissionSink::new();
        sink.expect_deliver()
            .withf(|record| record.wizard() == ID)
            .times(1)
            .returning(|_| Ok(()));

        let before = Utc::now();
        let record = w.submit(&sink).await.unwrap();
        assert!(!record.id().is_empty());
        assert!(record.created_at() >= before);
        assert_eq!(record.price().unwrap().total, dec!(1783.81));
        assert_eq!(record.summary()["fullName"], "Ada Lovelace");
        assert!(matches!(w.phase(), Phase::Submitted(_)));
    }

    #[test]
    fn test_not_persisted() {
        let schema = schema(EmailCheck::Format);
        assert!(!schema.policy.autosave);
        assert!(schema.priced);
    }
}
