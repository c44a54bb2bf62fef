//! # Generic Actor Server
//!
//! This module defines the `ResourceActor`, the component that owns a [`RegistryStore`]
//! and applies requests to it. It is the "server" side of the actor model: requests are
//! processed strictly one after another, so every operation is atomic with respect to
//! the store without any locking.

use crate::client::ResourceClient;
use crate::collab::{Clock, IdGenerator, Origin, Principal};
use crate::entity::RegistryEntity;
use crate::error::FrameworkError;
use crate::message::ResourceRequest;
use crate::store::RegistryStore;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// The generic actor that manages a store of entities.
///
/// # Concurrency Model
/// Any number of clients may send requests concurrently, but the actor drains its
/// channel in a single task. The store is owned exclusively by that task, so there is
/// no `Mutex` and no interleaving between operations.
///
/// # Usage Pattern
///
/// 1.  **Open**: Open a [`RegistryStore`] for the entity type.
/// 2.  **Create**: Call `ResourceActor::new()` with the store and the id/clock
///     collaborators to get the `actor` (server) and `client` (interface).
/// 3.  **Run**: Spawn `actor.run(context)` in a background task.
///
/// # Operations
///
/// * **Create**: stamps an [`Origin`], draws a fresh id (rejecting collisions with any
///   active or shared record), builds the entity, runs `on_create`, persists it.
/// * **Get**: validates the id and returns a clone, or `None`.
/// * **Query**: validates the query and returns every active record that `matches`,
///   in key order.
/// * **Update / Action**: validates the payload and the id, applies the hook to a copy,
///   persists the copy only on success.
/// * **Delete**: runs `on_delete` and removes the record for good.
/// * **Share**: runs `on_share` and moves the record into the shared pool.
/// * **ListShared**: returns the pool in insertion order.
pub struct ResourceActor<T: RegistryEntity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: RegistryStore<T>,
    ids: Box<dyn IdGenerator<T::Id>>,
    clock: Box<dyn Clock>,
    entity_type: &'static str,
}

fn entity_error<E: std::error::Error + Send + Sync + 'static>(e: E) -> FrameworkError {
    FrameworkError::EntityError(Box::new(e))
}

impl<T: RegistryEntity> ResourceActor<T> {
    /// Creates a new `ResourceActor` over `store` and its associated `ResourceClient`.
    ///
    /// # Arguments
    ///
    /// * `buffer_size` - Capacity of the request channel. When full, client calls wait.
    /// * `store` - The opened store; the actor takes ownership.
    /// * `ids` - Source of ids for created entities.
    /// * `clock` - Source of operation timestamps.
    pub fn new(
        buffer_size: usize,
        store: RegistryStore<T>,
        ids: impl IdGenerator<T::Id>,
        clock: impl Clock,
    ) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        // "FoodItem" rather than "food_registry::model::food_item::FoodItem"
        let entity_type = std::any::type_name::<T>()
            .rsplit("::")
            .next()
            .unwrap_or("Unknown");
        let actor = Self {
            receiver,
            store,
            ids: Box::new(ids),
            clock: Box::new(clock),
            entity_type,
        };
        (actor, ResourceClient::new(sender))
    }

    /// Runs the actor's event loop until every client has been dropped.
    ///
    /// # Context Injection
    /// `context` is handed to every entity hook. It is bound here rather than in `new()`
    /// so it can hold things created after the actor.
    pub async fn run(mut self, context: T::Context) {
        let entity_type = self.entity_type;
        info!(
            entity_type,
            active = self.store.items().len(),
            shared = self.store.shared().len(),
            "Actor started"
        );

        while let Some(msg) = self.receiver.recv().await {
            self.dispatch(msg, &context).await;
        }

        info!(
            entity_type,
            active = self.store.items().len(),
            shared = self.store.shared().len(),
            "Shutdown"
        );
    }

    async fn dispatch(&mut self, msg: ResourceRequest<T>, ctx: &T::Context) {
        match msg {
            ResourceRequest::Create {
                params,
                caller,
                respond_to,
            } => {
                debug!(entity_type = self.entity_type, ?params, %caller, "Create");
                let result = self.create(params, caller, ctx).await;
                self.report("Create", &result);
                let _ = respond_to.send(result);
            }
            ResourceRequest::Get { id, respond_to } => {
                let result = self.get(&id);
                if let Ok(item) = &result {
                    debug!(entity_type = self.entity_type, %id, found = item.is_some(), "Get");
                }
                self.report("Get", &result);
                let _ = respond_to.send(result);
            }
            ResourceRequest::Query {
                query,
                caller,
                respond_to,
            } => {
                debug!(entity_type = self.entity_type, ?query, %caller, "Query");
                let result = self.query(&query, caller, ctx);
                self.report("Query", &result);
                let _ = respond_to.send(result);
            }
            ResourceRequest::Update {
                id,
                update,
                caller,
                respond_to,
            } => {
                debug!(entity_type = self.entity_type, %id, ?update, "Update");
                let result = self.update(&id, update, caller, ctx).await;
                self.report("Update", &result);
                let _ = respond_to.send(result);
            }
            ResourceRequest::Delete { id, respond_to } => {
                debug!(entity_type = self.entity_type, %id, "Delete");
                let result = self.delete(&id, ctx).await;
                self.report("Delete", &result);
                let _ = respond_to.send(result);
            }
            ResourceRequest::Action {
                id,
                action,
                caller,
                respond_to,
            } => {
                debug!(entity_type = self.entity_type, %id, ?action, "Action");
                let result = self.action(&id, action, caller, ctx).await;
                self.report("Action", &result);
                let _ = respond_to.send(result);
            }
            ResourceRequest::Share { id, respond_to } => {
                debug!(entity_type = self.entity_type, %id, "Share");
                let result = self.share(&id, ctx).await;
                self.report("Share", &result);
                let _ = respond_to.send(result);
            }
            ResourceRequest::ListShared { respond_to } => {
                let shared: Vec<T> = self.store.shared().iter().cloned().collect();
                debug!(entity_type = self.entity_type, count = shared.len(), "ListShared");
                let _ = respond_to.send(Ok(shared));
            }
        }
    }

    fn report<R>(&self, op: &'static str, result: &Result<R, FrameworkError>) {
        match result {
            Ok(_) => {}
            Err(e @ FrameworkError::DuplicateId(_)) => {
                error!(entity_type = self.entity_type, op, error = %e, "Invariant violated");
            }
            Err(e) => warn!(entity_type = self.entity_type, op, error = %e, "Request failed"),
        }
    }

    fn stamp(&mut self, caller: Principal) -> Origin {
        Origin {
            caller,
            at: self.clock.now(),
        }
    }

    fn require(&self, id: &T::Id) -> Result<T, FrameworkError> {
        T::validate_id(id).map_err(entity_error)?;
        self.store
            .items()
            .get(id)
            .cloned()
            .ok_or_else(|| FrameworkError::NotFound(id.to_string()))
    }

    async fn create(
        &mut self,
        params: T::Create,
        caller: Principal,
        ctx: &T::Context,
    ) -> Result<T, FrameworkError> {
        let origin = self.stamp(caller);
        let id = self.ids.next_id();
        if self.store.items().contains_key(&id) || self.store.shared().contains(|s| s.id() == &id) {
            return Err(FrameworkError::DuplicateId(id.to_string()));
        }

        let mut item =
            T::from_create_params(id.clone(), params, &origin, ctx).map_err(entity_error)?;
        item.on_create(ctx).await.map_err(entity_error)?;
        self.store.items_mut().insert(id.clone(), item.clone())?;
        info!(entity_type = self.entity_type, %id, size = self.store.items().len(), "Created");
        Ok(item)
    }

    fn get(&self, id: &T::Id) -> Result<Option<T>, FrameworkError> {
        T::validate_id(id).map_err(entity_error)?;
        Ok(self.store.items().get(id).cloned())
    }

    fn query(
        &mut self,
        query: &T::Query,
        caller: Principal,
        ctx: &T::Context,
    ) -> Result<Vec<T>, FrameworkError> {
        T::validate_query(query).map_err(entity_error)?;
        let origin = self.stamp(caller);
        Ok(self
            .store
            .items()
            .values()
            .filter(|item| item.matches(query, &origin, ctx))
            .cloned()
            .collect())
    }

    async fn update(
        &mut self,
        id: &T::Id,
        update: T::Update,
        caller: Principal,
        ctx: &T::Context,
    ) -> Result<T, FrameworkError> {
        T::validate_update(&update, ctx).map_err(entity_error)?;
        let mut item = self.require(id)?;
        let origin = self.stamp(caller);
        item.on_update(update, &origin, ctx).await.map_err(entity_error)?;
        self.store.items_mut().insert(id.clone(), item.clone())?;
        info!(entity_type = self.entity_type, %id, "Updated");
        Ok(item)
    }

    async fn delete(&mut self, id: &T::Id, ctx: &T::Context) -> Result<T, FrameworkError> {
        let item = self.require(id)?;
        item.on_delete(ctx).await.map_err(entity_error)?;
        self.store.items_mut().remove(id)?;
        info!(entity_type = self.entity_type, %id, size = self.store.items().len(), "Deleted");
        Ok(item)
    }

    async fn action(
        &mut self,
        id: &T::Id,
        action: T::Action,
        caller: Principal,
        ctx: &T::Context,
    ) -> Result<T::ActionResult, FrameworkError> {
        T::validate_action(&action, ctx).map_err(entity_error)?;
        let mut item = self.require(id)?;
        let origin = self.stamp(caller);
        let outcome = item
            .handle_action(action, &origin, ctx)
            .await
            .map_err(entity_error)?;
        self.store.items_mut().insert(id.clone(), item)?;
        info!(entity_type = self.entity_type, %id, "Action ok");
        Ok(outcome)
    }

    async fn share(&mut self, id: &T::Id, ctx: &T::Context) -> Result<T, FrameworkError> {
        let item = self.require(id)?;
        item.on_share(ctx).await.map_err(entity_error)?;
        self.store.share(id)?;
        info!(
            entity_type = self.entity_type,
            %id,
            size = self.store.items().len(),
            shared = self.store.shared().len(),
            "Shared"
        );
        Ok(item)
    }
}
