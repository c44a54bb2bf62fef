//! # ActorClient Trait
//!
//! Provides a common interface for record-specific clients, adding default `get`,
//! `delete`, `share` and `list_shared` methods built on top of a generic
//! `ResourceClient`.
use crate::{FrameworkError, RegistryEntity, ResourceClient};
use async_trait::async_trait;

/// Trait for record-specific clients to inherit the operations that need no payload.
///
/// Implementors supply the inner client and an error mapping; everything else is
/// provided.
///
/// ```rust,ignore
/// #[async_trait]
/// impl ActorClient<FoodItem> for FoodClient {
///     type Error = FoodError;
///
///     fn inner(&self) -> &ResourceClient<FoodItem> {
///         &self.inner
///     }
///
///     fn map_error(e: FrameworkError) -> Self::Error {
///         FoodError::from(e)
///     }
/// }
///
/// // get(), delete(), share() and list_shared() are now available.
/// let item = client.get(id).await?;
/// ```
#[async_trait]
pub trait ActorClient<T: RegistryEntity>: Send + Sync {
    /// The record-specific error type.
    type Error: Send + Sync;

    /// Access the inner generic ResourceClient.
    fn inner(&self) -> &ResourceClient<T>;

    /// Map framework errors to the record-specific error type.
    fn map_error(e: FrameworkError) -> Self::Error;

    /// Fetch a record by id. `None` when no active record has that id.
    #[tracing::instrument(skip(self))]
    async fn get(&self, id: T::Id) -> Result<Option<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().get(id).await.map_err(Self::map_error)
    }

    /// Delete a record by id, returning what was removed.
    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: T::Id) -> Result<T, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().delete(id).await.map_err(Self::map_error)
    }

    /// Move a record into the shared pool, returning it.
    #[tracing::instrument(skip(self))]
    async fn share(&self, id: T::Id) -> Result<T, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().share(id).await.map_err(Self::map_error)
    }

    /// The shared pool in insertion order.
    #[tracing::instrument(skip(self))]
    async fn list_shared(&self) -> Result<Vec<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().list_shared().await.map_err(Self::map_error)
    }
}
