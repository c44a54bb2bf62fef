//! # Registry Framework
//!
//! Building blocks for durable, single-writer record registries. A registry is a
//! **Resource-Oriented** set of operations (create, read, query, update, delete, plus
//! custom actions and sharing) served by an **actor** that owns the storage outright.
//!
//! ## Architecture Overview
//!
//! 1. **Entity Layer** ([`RegistryEntity`]) - the record type, its payloads, validation
//!    and lifecycle hooks
//! 2. **Runtime Layer** ([`ResourceActor`]) - sequential request processing over a
//!    [`RegistryStore`](store::RegistryStore)
//! 3. **Interface Layer** ([`ResourceClient`], [`ActorClient`]) - typed async handles
//! 4. **Storage Layer** ([`store`]) - an ordered map and an append-only pool, both
//!    persisted as checksummed logs
//! 5. **Collaborators** ([`collab`]) - caller identity, clock and id generation, injected
//!    so tests can be deterministic
//!
//! ## Concurrency Model
//!
//! - One actor task per registry; it alone touches the store
//! - Requests are applied one at a time, each to completion
//! - Clients are cheap clones of a channel sender and may live in any task
//!
//! ## Example
//!
//! ```rust,ignore
//! let store = RegistryStore::<FoodItem>::open(&data_dir, &StoreOptions::default())?;
//! let (actor, client) = ResourceActor::new(32, store, UuidGenerator, SystemClock::new());
//! tokio::spawn(actor.run(FoodPolicy::default()));
//!
//! let item = client.create(payload, Principal::new("alice")).await?;
//! ```
//!
//! ## Testing
//!
//! [`mock::MockClient`] answers client requests from canned expectations; see the
//! [`mock`] module. [`collab::StepClock`] and [`collab::SequentialIds`] make real-actor
//! tests deterministic.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod collab;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;
pub mod store;
pub mod tracing;

// Re-export core types for convenience
pub use actor::ResourceActor;
pub use client::ResourceClient;
pub use client_trait::ActorClient;
pub use collab::{Clock, IdGenerator, Origin, Principal, Timestamp};
pub use entity::RegistryEntity;
pub use error::FrameworkError;
pub use message::{ResourceRequest, Response};
