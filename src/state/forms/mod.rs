//! Form domain layer
//!
//! Typed fields, per-step validation, forward-gated navigation, drafts and
//! submission for the multi-step lead-capture wizards.

pub mod apply;
mod field;
mod field_store;
mod offer;
pub mod partnership;
mod pricing;
mod steps;
mod validation;
mod wizard;

pub use field::{FieldKind, FormField};
pub use field_store::{FieldSnapshot, FieldStore};
pub use offer::Offer;
pub use pricing::{format_money, PriceBreakdown, DEFAULT_TAX_RATE};
pub use steps::Transition;
pub use validation::EmailCheck;
pub use wizard::{Phase, SubmitError, Wizard};

#[cfg(test)]
pub use field::FieldValue;
#[cfg(test)]
pub use wizard::WizardSchema;
