//! # Observability & Tracing
//!
//! [`setup_tracing`] initializes structured logging with the `tracing` crate for the
//! whole process.
//!
//! ## What Gets Traced
//!
//! - **Actor lifecycle**: startup and shutdown, with active/shared counts
//! - **Store lifecycle**: log replay, torn-tail truncation, compaction
//! - **Operations**: Create, Get, Query, Update, Delete, Action, Share
//! - **Errors**: failed requests at `warn`, invariant violations at `error`
//!
//! ## Usage
//!
//! ```bash
//! # Default: info
//! food-registry list
//!
//! # Show payloads and lookups
//! RUST_LOG=debug food-registry list
//!
//! # Only the store
//! RUST_LOG=registry_framework::store=debug food-registry list
//! ```
//!
//! Each line carries structured fields (`entity_type`, `id`, `size`, `error`) rather than
//! formatted prose, so they can be filtered downstream.

use tracing_subscriber::EnvFilter;

/// Installs a compact `fmt` subscriber filtered by `RUST_LOG` (default `info`).
///
/// Calling it twice is harmless; the second call keeps the first subscriber.
pub fn setup_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}
