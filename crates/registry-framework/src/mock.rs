//! # Mock Framework & Testing Guide
//!
//! `MockClient<T>` hands out a real [`ResourceClient<T>`] whose requests are answered from
//! a queue of expectations instead of a store. Use it to test client wrappers (error
//! mapping, argument plumbing) without opening a data directory or spawning an actor.
//!
//! ## When to use Mocks vs Real Actors
//!
//! | Feature | MockClient | Real Actor |
//! |---------|------------|------------|
//! | **Speed** | Instant (in-memory) | Fast, but touches the filesystem |
//! | **State** | None (expectations) | Real store, real validation |
//! | **Use Case** | Logic *around* the client | The entity, the actor, the full system |
//! | **Error Injection** | Easy (`return_err`) | Hard (needs a failing disk) |
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut mock = MockClient::<FoodItem>::new();
//! mock.expect_get(FoodItemId::from("food_1")).return_ok(None);
//!
//! let client = FoodClient::new(mock.client());
//! let result = client.get_food_item_by_id("food_1").await;
//! assert!(matches!(result, Err(FoodError::NotFound(_))));
//!
//! mock.verify(); // every expectation was consumed
//! ```
//!
//! ## Raw Helpers
//!
//! [`create_mock_client`] returns a client plus the receiving end of its channel, so a
//! test can inspect each [`ResourceRequest`] and answer it by hand with the
//! `expect_*` functions at the bottom of this module.

use crate::client::ResourceClient;
use crate::entity::RegistryEntity;
use crate::error::FrameworkError;
use crate::message::ResourceRequest;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, oneshot};

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

/// An expected request and the response it should receive.
enum Expectation<T: RegistryEntity> {
    Create(Result<T, FrameworkError>),
    Get(T::Id, Result<Option<T>, FrameworkError>),
    Query(Result<Vec<T>, FrameworkError>),
    Update(T::Id, Result<T, FrameworkError>),
    Delete(T::Id, Result<T, FrameworkError>),
    Action(T::Id, Result<T::ActionResult, FrameworkError>),
    Share(T::Id, Result<T, FrameworkError>),
    ListShared(Result<Vec<T>, FrameworkError>),
}

type Queue<T> = Arc<Mutex<VecDeque<Expectation<T>>>>;

fn check_id<I: PartialEq + std::fmt::Debug>(op: &str, expected: &I, actual: &I) {
    assert_eq!(expected, actual, "{op} request for unexpected id");
}

/// A mock client with expectation tracking for fluent testing.
pub struct MockClient<T: RegistryEntity> {
    client: ResourceClient<T>,
    expectations: Queue<T>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: RegistryEntity> Default for MockClient<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: RegistryEntity> MockClient<T> {
    /// Creates a new mock client with no expectations. Must be called inside a Tokio
    /// runtime.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<ResourceRequest<T>>(100);
        let expectations: Queue<T> = Arc::new(Mutex::new(VecDeque::new()));
        let queue = expectations.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let expectation = queue.lock().unwrap().pop_front();

                match (request, expectation) {
                    (ResourceRequest::Create { respond_to, .. }, Some(Expectation::Create(r))) => {
                        let _ = respond_to.send(r);
                    }
                    (ResourceRequest::Get { id, respond_to }, Some(Expectation::Get(want, r))) => {
                        check_id("Get", &want, &id);
                        let _ = respond_to.send(r);
                    }
                    (ResourceRequest::Query { respond_to, .. }, Some(Expectation::Query(r))) => {
                        let _ = respond_to.send(r);
                    }
                    (
                        ResourceRequest::Update { id, respond_to, .. },
                        Some(Expectation::Update(want, r)),
                    ) => {
                        check_id("Update", &want, &id);
                        let _ = respond_to.send(r);
                    }
                    (
                        ResourceRequest::Delete { id, respond_to },
                        Some(Expectation::Delete(want, r)),
                    ) => {
                        check_id("Delete", &want, &id);
                        let _ = respond_to.send(r);
                    }
                    (
                        ResourceRequest::Action { id, respond_to, .. },
                        Some(Expectation::Action(want, r)),
                    ) => {
                        check_id("Action", &want, &id);
                        let _ = respond_to.send(r);
                    }
                    (
                        ResourceRequest::Share { id, respond_to },
                        Some(Expectation::Share(want, r)),
                    ) => {
                        check_id("Share", &want, &id);
                        let _ = respond_to.send(r);
                    }
                    (
                        ResourceRequest::ListShared { respond_to },
                        Some(Expectation::ListShared(r)),
                    ) => {
                        let _ = respond_to.send(r);
                    }
                    (request, _) => {
                        panic!("Unexpected request or expectation mismatch: {request:?}");
                    }
                }
            }
        });

        Self {
            client: ResourceClient::new(sender),
            expectations,
            _handle: handle,
        }
    }

    /// Returns the client for use in tests.
    pub fn client(&self) -> ResourceClient<T> {
        self.client.clone()
    }

    fn expect<R>(
        &self,
        make: impl FnOnce(Result<R, FrameworkError>) -> Expectation<T> + 'static,
    ) -> ExpectationBuilder<T, R> {
        ExpectationBuilder {
            expectations: self.expectations.clone(),
            make: Box::new(make),
        }
    }

    pub fn expect_create(&mut self) -> ExpectationBuilder<T, T> {
        self.expect(Expectation::Create)
    }

    pub fn expect_get(&mut self, id: T::Id) -> ExpectationBuilder<T, Option<T>> {
        self.expect(move |r| Expectation::Get(id, r))
    }

    pub fn expect_query(&mut self) -> ExpectationBuilder<T, Vec<T>> {
        self.expect(Expectation::Query)
    }

    pub fn expect_update(&mut self, id: T::Id) -> ExpectationBuilder<T, T> {
        self.expect(move |r| Expectation::Update(id, r))
    }

    pub fn expect_delete(&mut self, id: T::Id) -> ExpectationBuilder<T, T> {
        self.expect(move |r| Expectation::Delete(id, r))
    }

    pub fn expect_action(&mut self, id: T::Id) -> ExpectationBuilder<T, T::ActionResult> {
        self.expect(move |r| Expectation::Action(id, r))
    }

    pub fn expect_share(&mut self, id: T::Id) -> ExpectationBuilder<T, T> {
        self.expect(move |r| Expectation::Share(id, r))
    }

    pub fn expect_list_shared(&mut self) -> ExpectationBuilder<T, Vec<T>> {
        self.expect(Expectation::ListShared)
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let remaining = self.expectations.lock().unwrap().len();
        if remaining != 0 {
            panic!("Not all expectations were met. {remaining} remaining");
        }
    }
}

/// Completes an expectation with the response the mock should send.
pub struct ExpectationBuilder<T: RegistryEntity, R> {
    expectations: Queue<T>,
    make: Box<dyn FnOnce(Result<R, FrameworkError>) -> Expectation<T>>,
}

impl<T: RegistryEntity, R> ExpectationBuilder<T, R> {
    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, value: R) {
        let expectation = (self.make)(Ok(value));
        self.expectations.lock().unwrap().push_back(expectation);
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: FrameworkError) {
        let expectation = (self.make)(Err(error));
        self.expectations.lock().unwrap().push_back(expectation);
    }
}

// =============================================================================
// RAW HELPERS
// =============================================================================

/// Creates a client and the receiver its requests arrive on.
///
/// The test plays the actor: it pulls each request off `receiver`, asserts on it, and
/// answers through the request's responder.
pub fn create_mock_client<T: RegistryEntity>(
    buffer_size: usize,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

type Responder<R> = oneshot::Sender<Result<R, FrameworkError>>;

/// Next message, if it is a Create request.
pub async fn expect_create<T: RegistryEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Create, crate::Principal, Responder<T>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create {
            params,
            caller,
            respond_to,
        }) => Some((params, caller, respond_to)),
        _ => None,
    }
}

/// Next message, if it is a Query request.
pub async fn expect_query<T: RegistryEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Query, crate::Principal, Responder<Vec<T>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Query {
            query,
            caller,
            respond_to,
        }) => Some((query, caller, respond_to)),
        _ => None,
    }
}

/// Next message, if it is an Action request.
pub async fn expect_action<T: RegistryEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, T::Action, Responder<T::ActionResult>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Action {
            id,
            action,
            respond_to,
            ..
        }) => Some((id, action, respond_to)),
        _ => None,
    }
}
