//! Wizard rendering module
//!
//! - `field_renderer`: one field per kind, with inline errors
//! - `step_form`: the current step and its action panel
//! - `summary`: price breakdown and the post-submission confirmation

mod field_renderer;
mod step_form;
mod summary;

pub use step_form::draw as draw_step;
pub use summary::draw_submitted;
