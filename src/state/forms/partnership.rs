//! Five-step institutional partnership inquiry

use super::field::FormField;
use super::field_store::FieldStore;
use super::offer::Offer;
use super::steps::StepSchema;
use super::validation::{EmailCheck, Rule};
use super::wizard::{DraftPolicy, WizardSchema};

pub const ID: &str = "partnership";

const ORG_TYPES: &[&str] = &[
    "University",
    "School",
    "Company",
    "NGO / Non-profit",
    "Public institution",
];
const COLLAB_TYPES: &[&str] = &[
    "AI Upskilling",
    "Bootcamp",
    "Custom Training",
    "Internship Program",
    "Workshops",
];
const FORMATS: &[&str] = &["Online", "On-site", "Hybrid"];
const AUDIENCES: &[&str] = &["Students", "Graduates", "Faculty", "Employees", "Executives"];
const COHORT_SIZES: &[&str] = &["1-25", "26-100", "101-500", "500+"];
const TIMELINES: &[&str] = &["This quarter", "Next quarter", "Within 6 months", "Exploring"];
const OBJECTIVES: &[&str] = &[
    "Employability",
    "Digital transformation",
    "Research collaboration",
    "Talent pipeline",
    "Certification",
];
const YES_NO: &[&str] = &["Yes", "No"];

fn defaults(_offer: Option<&Offer>) -> FieldStore {
    FieldStore::new(vec![
        // Institution
        FormField::text("orgName", "Organization name"),
        FormField::choice("orgType", "Organization type", ORG_TYPES),
        FormField::text("countryCity", "Country / City"),
        FormField::text("field", "Field / Specialization"),
        FormField::text("website", "Website (optional)"),
        // Collaboration
        FormField::multi_select("collabTypes", "Collaboration types", COLLAB_TYPES),
        FormField::multi_select("formats", "Formats", FORMATS),
        FormField::multi_select("targetAudience", "Target audience", AUDIENCES),
        // Program scope
        FormField::choice("cohortSize", "Cohort size", COHORT_SIZES),
        FormField::choice("timeline", "Timeline", TIMELINES),
        FormField::multi_select("objectives", "Objectives", OBJECTIVES),
        FormField::choice("implementedBefore", "Implemented a similar program before?", YES_NO),
        FormField::long_text("implementedDetails", "Describe briefly"),
        // Contact
        FormField::text("contactName", "Full name"),
        FormField::text("contactEmail", "Work email"),
        FormField::text("contactRole", "Role / Position"),
        FormField::text("contactPhone", "Phone (optional)"),
        FormField::long_text("message", "Anything else? (optional)"),
        // Confirm
        FormField::flag("agreePrivacy", "I agree to the privacy policy"),
        FormField::flag("agreeContact", "I agree to be contacted about this inquiry"),
        FormField::flag("newsletter", "Send me program news (optional)"),
    ])
}

/// Schema for the partnership inquiry; drafts autosave and clear on submit
pub fn schema(email: EmailCheck) -> WizardSchema {
    WizardSchema {
        id: ID,
        title: "Institutional Partnership",
        steps: vec![
            StepSchema::new(
                "Institution",
                vec!["orgName", "orgType", "countryCity", "field", "website"],
                vec![
                    Rule::Required {
                        key: "orgName",
                        message: "Organization name is required",
                    },
                    Rule::ChoiceRequired {
                        key: "orgType",
                        message: "Select an organization type",
                    },
                    Rule::Required {
                        key: "countryCity",
                        message: "Country / City is required",
                    },
                    Rule::Required {
                        key: "field",
                        message: "Field / Specialization is required",
                    },
                ],
            ),
            StepSchema::new(
                "Collaboration",
                vec!["collabTypes", "formats", "targetAudience"],
                vec![
                    Rule::MinSelected {
                        key: "collabTypes",
                        min: 1,
                        message: "Select at least one collaboration type",
                    },
                    Rule::MinSelected {
                        key: "formats",
                        min: 1,
                        message: "Select at least one format",
                    },
                    Rule::MinSelected {
                        key: "targetAudience",
                        min: 1,
                        message: "Select at least one target audience",
                    },
                ],
            ),
            StepSchema::new(
                "Program Scope",
                vec![
                    "cohortSize",
                    "timeline",
                    "objectives",
                    "implementedBefore",
                    "implementedDetails",
                ],
                vec![
                    Rule::ChoiceRequired {
                        key: "cohortSize",
                        message: "Select a cohort size",
                    },
                    Rule::ChoiceRequired {
                        key: "timeline",
                        message: "Select a timeline",
                    },
                    Rule::MinSelected {
                        key: "objectives",
                        min: 1,
                        message: "Select at least one objective",
                    },
                    Rule::ChoiceRequired {
                        key: "implementedBefore",
                        message: "Please answer Yes or No",
                    },
                    Rule::RequiredWhen {
                        key: "implementedDetails",
                        when: "implementedBefore",
                        equals: "Yes",
                        message: "Please describe what you implemented",
                    },
                ],
            ),
            StepSchema::new(
                "Contact",
                vec![
                    "contactName",
                    "contactEmail",
                    "contactRole",
                    "contactPhone",
                    "message",
                ],
                vec![
                    Rule::Required {
                        key: "contactName",
                        message: "Full name is required",
                    },
                    Rule::Email {
                        key: "contactEmail",
                        check: email,
                        message: "A valid email is required",
                    },
                    Rule::Required {
                        key: "contactRole",
                        message: "Role is required",
                    },
                ],
            ),
            StepSchema::new(
                "Confirm",
                vec!["agreePrivacy", "agreeContact", "newsletter"],
                vec![
                    Rule::MustAccept {
                        key: "agreePrivacy",
                        message: "You must accept the privacy policy",
                    },
                    Rule::MustAccept {
                        key: "agreeContact",
                        message: "We need your consent to contact you",
                    },
                ],
            ),
        ],
        summary_keys: &["orgName", "orgType", "countryCity", "cohortSize", "collabTypes"],
        policy: DraftPolicy {
            autosave: true,
            clear_on_submit: true,
        },
        priced: false,
        defaults,
    }
}
