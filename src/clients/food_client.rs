//! # Food Client
//!
//! Provides the registry's public operations on top of a `ResourceClient<FoodItem>`.
//! A client is bound to one caller identity; [`FoodClient::acting_as`] rebinds a clone.
use crate::food_actor::{FoodAction, FoodActionResult, FoodError};
use crate::model::{FoodItem, FoodItemId, FoodItemPayload, FoodQuery};
use async_trait::async_trait;
use registry_framework::{ActorClient, FrameworkError, Principal, ResourceClient};
use tracing::{debug, instrument};

/// Client for interacting with the Food actor.
#[derive(Clone)]
pub struct FoodClient {
    inner: ResourceClient<FoodItem>,
    caller: Principal,
}

impl FoodClient {
    pub fn new(inner: ResourceClient<FoodItem>) -> Self {
        Self {
            inner,
            caller: Principal::anonymous(),
        }
    }

    /// A clone of this client that issues requests as `caller`.
    pub fn acting_as(&self, caller: impl Into<Principal>) -> Self {
        Self {
            inner: self.inner.clone(),
            caller: caller.into(),
        }
    }

    pub fn caller(&self) -> &Principal {
        &self.caller
    }
}

#[async_trait]
impl ActorClient<FoodItem> for FoodClient {
    type Error = FoodError;

    fn inner(&self) -> &ResourceClient<FoodItem> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        FoodError::from(e)
    }
}

impl FoodClient {
    #[instrument(skip(self), fields(caller = %self.caller))]
    pub async fn create_food_item(&self, payload: FoodItemPayload) -> Result<FoodItem, FoodError> {
        debug!("Sending request");
        self.inner
            .create(payload, self.caller.clone())
            .await
            .map_err(FoodError::from)
    }

    /// Fails with [`FoodError::NotFound`] when no active item has this id.
    #[instrument(skip(self))]
    pub async fn get_food_item_by_id(
        &self,
        id: impl Into<FoodItemId> + std::fmt::Debug + Send,
    ) -> Result<FoodItem, FoodError> {
        let id = id.into();
        self.get(id.clone())
            .await?
            .ok_or_else(|| FoodError::NotFound(id.to_string()))
    }

    /// Case-insensitive exact match. An empty result is not an error.
    pub async fn get_food_items_by_name(&self, name: &str) -> Result<Vec<FoodItem>, FoodError> {
        self.query(FoodQuery::ByName(name.to_string())).await
    }

    pub async fn get_all_food_items(&self) -> Result<Vec<FoodItem>, FoodError> {
        self.query(FoodQuery::All).await
    }

    /// Items with `min <= quantity <= max`; empty when `min > max`.
    pub async fn get_food_items_by_quantity(
        &self,
        min: f64,
        max: f64,
    ) -> Result<Vec<FoodItem>, FoodError> {
        self.query(FoodQuery::QuantityRange { min, max }).await
    }

    #[instrument(skip(self), fields(caller = %self.caller))]
    async fn query(&self, query: FoodQuery) -> Result<Vec<FoodItem>, FoodError> {
        debug!("Sending request");
        self.inner
            .query(query, self.caller.clone())
            .await
            .map_err(FoodError::from)
    }

    #[instrument(skip(self), fields(caller = %self.caller))]
    pub async fn update_food_item(
        &self,
        id: impl Into<FoodItemId> + std::fmt::Debug + Send,
        payload: FoodItemPayload,
    ) -> Result<FoodItem, FoodError> {
        debug!("Sending request");
        self.inner
            .update(id.into(), payload, self.caller.clone())
            .await
            .map_err(FoodError::from)
    }

    /// Overwrites only the quantity.
    #[instrument(skip(self), fields(caller = %self.caller))]
    pub async fn update_food_item_quantity(
        &self,
        id: impl Into<FoodItemId> + std::fmt::Debug + Send,
        quantity: f64,
    ) -> Result<FoodItem, FoodError> {
        debug!("Sending request");
        match self
            .inner
            .perform_action(id.into(), FoodAction::SetQuantity(quantity), self.caller.clone())
            .await
        {
            Ok(FoodActionResult::SetQuantity(item)) => Ok(item),
            Err(e) => Err(FoodError::from(e)),
        }
    }

    pub async fn delete_food_item(
        &self,
        id: impl Into<FoodItemId> + Send,
    ) -> Result<FoodItem, FoodError> {
        self.delete(id.into()).await
    }

    /// Moves the item, unmodified, into the shared community pool.
    pub async fn share_excess_food(
        &self,
        id: impl Into<FoodItemId> + Send,
    ) -> Result<FoodItem, FoodError> {
        self.share(id.into()).await
    }

    /// The shared pool in the order items were shared.
    pub async fn get_all_shared_food_items(&self) -> Result<Vec<FoodItem>, FoodError> {
        self.list_shared().await
    }
}
