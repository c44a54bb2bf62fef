//! # Food Registry
//!
//! A persistent registry of perishable food items. Owners record items, update them, and
//! eventually either delete them or share them with the community, which moves them into
//! a durable shared pool for good.
//!
//! ## Module Tour
//!
//! ### 1. The Data ([`model`])
//! [`FoodItem`](model::FoodItem), its payload and the queries run against the registry.
//!
//! ### 2. The Rules ([`food_actor`])
//! `impl RegistryEntity for FoodItem`: validation, ownership, the update merge, the
//! quantity action and the policy knobs ([`FoodPolicy`](food_actor::FoodPolicy)).
//!
//! ### 3. The Interface ([`clients`])
//! [`FoodClient`](clients::FoodClient) exposes the ten registry operations by name,
//! bound to a caller identity.
//!
//! ### 4. The Orchestrator ([`lifecycle`])
//! [`FoodRegistrySystem`](lifecycle::FoodRegistrySystem) opens the store, spawns the
//! actor and shuts it down.
//!
//! ### 5. The Host ([`config`], [`cli`])
//! JSON configuration and the `food-registry` command line.
//!
//! The generic machinery (actor loop, durable map, shared pool, collaborators) lives in
//! the `registry-framework` crate.
//!
//! ## Running
//!
//! ```bash
//! RUST_LOG=info food-registry --caller alice create --name Rice --quantity 10 --expires 2025-06-01
//! ```

pub mod cli;
pub mod clients;
pub mod config;
pub mod food_actor;
pub mod lifecycle;
pub mod model;
