//! Domain-specific clients over the generic `ResourceClient`.

mod food_client;

pub use food_client::FoodClient;
pub use registry_framework::ActorClient;
