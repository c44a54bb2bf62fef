//! # Framework Errors
//!
//! Errors raised by the actor plumbing and the store, as opposed to the entity's own
//! validation errors, which travel inside [`FrameworkError::EntityError`].

use crate::store::StoreError;

/// Errors that can occur within the registry framework itself.
#[derive(Debug, thiserror::Error)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Item with the same id already exists: {0}")]
    DuplicateId(String),
    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
    #[error("Entity error: {0}")]
    EntityError(Box<dyn std::error::Error + Send + Sync>),
}
