//! Draft persistence for in-progress wizards
//!
//! A [`DraftStore`] is the raw key/value backend; [`DraftPersistence`]
//! serializes a wizard's fields under one fixed key and never lets a
//! storage failure interrupt the user.

mod persistence;
mod store;

pub use persistence::{DraftPersistence, DraftStatus};
pub use store::{DraftStore, FileDraftStore, MemoryDraftStore};

#[cfg(test)]
pub use store::MockDraftStore;
