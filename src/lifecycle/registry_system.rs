use crate::clients::FoodClient;
use crate::config::RegistryConfig;
use crate::food_actor::FoodError;
use crate::model::{FoodItem, FoodItemId};
use registry_framework::collab::{SystemClock, UuidGenerator};
use registry_framework::store::RegistryStore;
use registry_framework::{Clock, IdGenerator};
use tracing::{error, info};

/// The runtime orchestrator for the food registry.
///
/// `FoodRegistrySystem` is responsible for:
/// - **Startup**: opening the durable store in the configured data directory
/// - **Wiring**: handing the store, id generator and clock to the Food actor, and the
///   configured policy to its `run()`
/// - **Shutdown**: closing the actor's channel and waiting for it to drain
///
/// # Example
///
/// ```ignore
/// let system = FoodRegistrySystem::open(&RegistryConfig::default())?;
///
/// let alice = system.food_client.acting_as("alice");
/// let rice = alice.create_food_item(FoodItemPayload::new("Rice", 10.0, "2025-06-01")).await?;
///
/// system.shutdown().await?;
/// ```
pub struct FoodRegistrySystem {
    /// Client for interacting with the Food actor, bound to the anonymous caller.
    pub food_client: FoodClient,

    handle: tokio::task::JoinHandle<()>,
}

impl FoodRegistrySystem {
    /// Opens the registry with random v4 ids and the system clock.
    pub fn open(config: &RegistryConfig) -> Result<Self, FoodError> {
        Self::open_with(config, UuidGenerator, SystemClock::new())
    }

    /// Opens the registry with injected collaborators.
    ///
    /// Must be called inside a Tokio runtime: the actor is spawned immediately.
    pub fn open_with(
        config: &RegistryConfig,
        ids: impl IdGenerator<FoodItemId>,
        clock: impl Clock,
    ) -> Result<Self, FoodError> {
        let store = RegistryStore::<FoodItem>::open(&config.data_dir, &config.store_options())
            .map_err(|e| {
                error!(data_dir = %config.data_dir.display(), error = %e, "Failed to open store");
                FoodError::Storage(e.to_string())
            })?;

        let (actor, food_client) =
            crate::food_actor::new(config.channel_capacity, store, ids, clock);
        let handle = tokio::spawn(actor.run(config.policy()));

        Ok(Self {
            food_client,
            handle,
        })
    }

    /// Gracefully shuts down the registry.
    ///
    /// Drops this system's client, which closes the channel once every clone made with
    /// [`FoodClient::acting_as`] is gone too, then waits for the actor to finish the
    /// requests still queued.
    pub async fn shutdown(self) -> Result<(), FoodError> {
        info!("Shutting down registry...");
        drop(self.food_client);

        if let Err(e) = self.handle.await {
            error!("Actor task failed: {:?}", e);
            return Err(FoodError::ActorCommunicationError(format!(
                "Actor task failed: {e}"
            )));
        }

        info!("Registry shutdown complete.");
        Ok(())
    }
}
