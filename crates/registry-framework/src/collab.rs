//! # Collaborators
//!
//! The registry never reaches for ambient process state. Caller identity, the clock and
//! identifier generation are handed to it, so every operation can be replayed with
//! deterministic fakes in tests.
//!
//! - [`Principal`] - who invoked an operation
//! - [`Timestamp`] / [`Clock`] - when it happened
//! - [`IdGenerator`] - what id a newly created entity receives
//! - [`Origin`] - caller and timestamp of a single operation, passed to entity hooks

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// Identity of whoever invokes an operation, supplied by the hosting environment.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Principal(String);

impl Principal {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identity used when the host supplies none.
    pub fn anonymous() -> Self {
        Self("anonymous".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Principal {
    fn default() -> Self {
        Self::anonymous()
    }
}

impl Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Principal {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Nanoseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(pub u64);

impl Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Caller and time of one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    pub caller: Principal,
    pub at: Timestamp,
}

/// Source of operation timestamps. Must never go backwards.
pub trait Clock: Send + 'static {
    fn now(&mut self) -> Timestamp;
}

/// Wall clock that is strictly increasing, even if the system time steps back
/// or two operations land in the same nanosecond.
#[derive(Debug, Default)]
pub struct SystemClock {
    last: u64,
}

impl SystemClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for SystemClock {
    fn now(&mut self) -> Timestamp {
        let wall = chrono::Utc::now()
            .timestamp_nanos_opt()
            .map(|n| n.max(0) as u64)
            .unwrap_or(u64::MAX);
        self.last = wall.max(self.last.saturating_add(1));
        Timestamp(self.last)
    }
}

/// Deterministic clock: yields `start`, `start + step`, `start + 2 * step`, ...
#[derive(Debug)]
pub struct StepClock {
    next: u64,
    step: u64,
}

impl StepClock {
    pub fn new(start: u64, step: u64) -> Self {
        Self { next: start, step }
    }
}

impl Clock for StepClock {
    fn now(&mut self) -> Timestamp {
        let now = self.next;
        self.next = self.next.saturating_add(self.step);
        Timestamp(now)
    }
}

/// Source of fresh entity identifiers.
pub trait IdGenerator<Id>: Send + 'static {
    fn next_id(&mut self) -> Id;
}

/// Random (v4) UUIDs in hyphenated form.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl<Id: From<String>> IdGenerator<Id> for UuidGenerator {
    fn next_id(&mut self) -> Id {
        Id::from(uuid::Uuid::new_v4().to_string())
    }
}

/// Counter-based ids: `"<prefix>_1"`, `"<prefix>_2"`, ...
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl<Id: From<String>> IdGenerator<Id> for SequentialIds {
    fn next_id(&mut self) -> Id {
        let id = format!("{}_{}", self.prefix, self.next);
        self.next += 1;
        Id::from(id)
    }
}
