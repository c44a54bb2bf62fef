//! Food-specific resource logic: validation, ownership, sharing and the quantity action.

mod actions;
pub mod entity;
pub mod error;
mod policy;

pub use actions::*;
pub use error::*;
pub use policy::*;

use crate::clients::FoodClient;
use crate::model::{FoodItem, FoodItemId};
use registry_framework::store::RegistryStore;
use registry_framework::{Clock, IdGenerator, ResourceActor};

/// Creates a new Food actor over an opened store, and its client.
///
/// The client acts as the anonymous principal until rebound with
/// [`FoodClient::acting_as`].
pub fn new(
    channel_capacity: usize,
    store: RegistryStore<FoodItem>,
    ids: impl IdGenerator<FoodItemId>,
    clock: impl Clock,
) -> (ResourceActor<FoodItem>, FoodClient) {
    let (actor, generic_client) = ResourceActor::new(channel_capacity, store, ids, clock);
    let client = FoodClient::new(generic_client);

    (actor, client)
}
