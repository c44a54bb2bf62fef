//! # Generic Client
//!
//! This module defines the generic client for communicating with actors.

use crate::collab::Principal;
use crate::entity::RegistryEntity;
use crate::error::FrameworkError;
use crate::message::ResourceRequest;
use tokio::sync::{mpsc, oneshot};

/// A type-safe client for interacting with a `ResourceActor`.
///
/// Holds only a sender, so cloning is cheap and clones can be handed to any number of
/// tasks. Every method resolves to `Result<…, FrameworkError>`.
pub struct ResourceClient<T: RegistryEntity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
}

impl<T: RegistryEntity> Clone for ResourceClient<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T: RegistryEntity> ResourceClient<T> {
    pub fn new(sender: mpsc::Sender<ResourceRequest<T>>) -> Self {
        Self { sender }
    }

    async fn call<R>(
        &self,
        build: impl FnOnce(oneshot::Sender<Result<R, FrameworkError>>) -> ResourceRequest<T>,
    ) -> Result<R, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn create(&self, params: T::Create, caller: Principal) -> Result<T, FrameworkError> {
        self.call(|respond_to| ResourceRequest::Create {
            params,
            caller,
            respond_to,
        })
        .await
    }

    pub async fn get(&self, id: T::Id) -> Result<Option<T>, FrameworkError> {
        self.call(|respond_to| ResourceRequest::Get { id, respond_to })
            .await
    }

    pub async fn query(
        &self,
        query: T::Query,
        caller: Principal,
    ) -> Result<Vec<T>, FrameworkError> {
        self.call(|respond_to| ResourceRequest::Query {
            query,
            caller,
            respond_to,
        })
        .await
    }

    pub async fn update(
        &self,
        id: T::Id,
        update: T::Update,
        caller: Principal,
    ) -> Result<T, FrameworkError> {
        self.call(|respond_to| ResourceRequest::Update {
            id,
            update,
            caller,
            respond_to,
        })
        .await
    }

    pub async fn delete(&self, id: T::Id) -> Result<T, FrameworkError> {
        self.call(|respond_to| ResourceRequest::Delete { id, respond_to })
            .await
    }

    pub async fn perform_action(
        &self,
        id: T::Id,
        action: T::Action,
        caller: Principal,
    ) -> Result<T::ActionResult, FrameworkError> {
        self.call(|respond_to| ResourceRequest::Action {
            id,
            action,
            caller,
            respond_to,
        })
        .await
    }

    pub async fn share(&self, id: T::Id) -> Result<T, FrameworkError> {
        self.call(|respond_to| ResourceRequest::Share { id, respond_to })
            .await
    }

    pub async fn list_shared(&self) -> Result<Vec<T>, FrameworkError> {
        self.call(|respond_to| ResourceRequest::ListShared { respond_to })
            .await
    }
}
