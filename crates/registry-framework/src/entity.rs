//! # RegistryEntity Trait
//!
//! The `RegistryEntity` trait defines the contract every record type must satisfy to be
//! managed by the generic [`ResourceActor`](crate::ResourceActor). It names the types for
//! ids, DTOs, actions, queries, context and errors, and provides lifecycle hooks
//! (`on_create`, `on_update`, `on_delete`, `on_share`, `handle_action`).
//!
//! # Provided Methods (Hooks)
//! Hooks with default implementations do nothing (`Ok(())`):
//! - [`RegistryEntity::on_create`]
//! - [`RegistryEntity::on_delete`]
//! - [`RegistryEntity::on_share`]
//! - [`RegistryEntity::validate_id`]
//! - [`RegistryEntity::validate_query`]
//! - [`RegistryEntity::validate_update`]
//! - [`RegistryEntity::validate_action`]
//!
//! # Atomicity
//! Mutating hooks run against a *copy* of the stored entity. The actor only persists the
//! copy when the hook returns `Ok`, so a hook that fails halfway leaves no trace.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::{Debug, Display};

use crate::collab::Origin;

/// Trait that any record type must implement to be managed by `ResourceActor`.
///
/// # Async & Context
/// This trait is `#[async_trait]` so hooks may await. The `Context` type is injected into
/// hooks at `run()` time; use it for registry-wide policy rather than global state.
#[async_trait]
pub trait RegistryEntity: Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Unique, immutable identifier. Ordered, because the store iterates in key order.
    type Id: Ord
        + Clone
        + Send
        + Sync
        + Display
        + Debug
        + Serialize
        + DeserializeOwned
        + 'static;

    /// The data required to create a new instance.
    type Create: Send + Sync + Debug;

    /// The data required to update an existing instance.
    type Update: Send + Sync + Debug;

    /// Enum representing record-specific operations beyond CRUD.
    type Action: Send + Sync + Debug;

    /// The result type returned by custom actions.
    type ActionResult: Send + Sync + Debug;

    /// Filter evaluated against every active record by a `Query` request.
    type Query: Send + Sync + Debug;

    /// The runtime context (policy, dependencies) injected into the actor.
    type Context: Send + Sync;

    /// The error type for this entity.
    ///
    /// One enum for the whole entity rather than one per message keeps clients simple.
    type Error: std::error::Error + Send + Sync + 'static;

    /// The stored id of this instance.
    fn id(&self) -> &Self::Id;

    /// Construct the full entity from its freshly generated id and the payload.
    /// Validation of the payload belongs here.
    fn from_create_params(
        id: Self::Id,
        params: Self::Create,
        origin: &Origin,
        ctx: &Self::Context,
    ) -> Result<Self, Self::Error>;

    /// Reject malformed ids before any lookup.
    fn validate_id(_id: &Self::Id) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Reject malformed queries before any scan.
    fn validate_query(_query: &Self::Query) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Reject a malformed update payload before the target is looked up.
    fn validate_update(_update: &Self::Update, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Reject a malformed action before the target is looked up.
    fn validate_action(_action: &Self::Action, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Whether this record belongs in the result of `query` issued by `origin`.
    fn matches(&self, query: &Self::Query, origin: &Origin, ctx: &Self::Context) -> bool;

    // --- Lifecycle Hooks (Async) ---

    /// Called after construction, before the entity is stored.
    async fn on_create(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Applies an update to (a copy of) the stored entity.
    async fn on_update(
        &mut self,
        update: Self::Update,
        origin: &Origin,
        ctx: &Self::Context,
    ) -> Result<(), Self::Error>;

    /// Called immediately before the entity is removed.
    async fn on_delete(&self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called immediately before the entity moves into the shared pool.
    async fn on_share(&self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    // --- Action Handler (Async) ---

    /// Handle a custom record-specific action against (a copy of) the stored entity.
    async fn handle_action(
        &mut self,
        action: Self::Action,
        origin: &Origin,
        ctx: &Self::Context,
    ) -> Result<Self::ActionResult, Self::Error>;
}
