//! # System Lifecycle
//!
//! Starting and stopping the registry: open the store, spawn the actor with its policy
//! injected as context, and shut it down cleanly.
//!
//! ## Startup
//!
//! ```rust,ignore
//! let store = RegistryStore::<FoodItem>::open(&config.data_dir, &config.store_options())?;
//! let (actor, food_client) = food_actor::new(config.channel_capacity, store, ids, clock);
//! let handle = tokio::spawn(actor.run(config.policy()));
//! ```
//!
//! The policy ([`FoodPolicy`](crate::food_actor::FoodPolicy)) is bound at `run()` rather
//! than at construction, so the same actor type serves every configuration.
//!
//! ## Graceful Shutdown
//!
//! 1. **Drop all clients** - closes the sender side of the channel
//! 2. **Actor drains** - requests already queued are still applied
//! 3. **Actor exits** - `receiver.recv()` returns `None`; final sizes are logged
//! 4. **Await completion** - the join handle reports a panicked actor as an error
//!
//! Writes reach the log before they are acknowledged, so shutdown has nothing to flush.

pub mod registry_system;

pub use registry_framework::tracing::setup_tracing;
pub use registry_system::*;
