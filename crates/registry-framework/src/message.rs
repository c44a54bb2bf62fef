//! # Generic Messages
//!
//! This module defines the message types exchanged between the `ResourceClient` and the
//! `ResourceActor`.

use crate::collab::Principal;
use crate::entity::RegistryEntity;
use crate::error::FrameworkError;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by actors.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Request sent to the actor.
///
/// The variants are the CRUD lifecycle of a record, plus:
///
/// - **Query**: linear scan of active records through [`RegistryEntity::matches`].
/// - **Action**: a custom [`RegistryEntity::Action`] against one record.
/// - **Share**: moves a record, unmodified, from the active map into the shared pool.
/// - **ListShared**: the whole shared pool in insertion order.
///
/// Requests that create, mutate or filter by ownership carry the caller's
/// [`Principal`]; the actor adds the timestamp.
#[derive(Debug)]
pub enum ResourceRequest<T: RegistryEntity> {
    Create {
        params: T::Create,
        caller: Principal,
        respond_to: Response<T>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    Query {
        query: T::Query,
        caller: Principal,
        respond_to: Response<Vec<T>>,
    },
    Update {
        id: T::Id,
        update: T::Update,
        caller: Principal,
        respond_to: Response<T>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<T>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        caller: Principal,
        respond_to: Response<T::ActionResult>,
    },
    Share {
        id: T::Id,
        respond_to: Response<T>,
    },
    ListShared {
        respond_to: Response<Vec<T>>,
    },
}
