//! Hand-off of finished wizards to the outside world

mod record;
mod sinks;
mod traits;

pub use record::SubmissionRecord;
pub use sinks::{JsonlFileSink, LogSink};
pub use traits::SubmissionSink;

#[cfg(test)]
pub use traits::MockSubmissionSink;
