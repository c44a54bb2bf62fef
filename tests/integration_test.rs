use food_registry::clients::FoodClient;
use food_registry::config::RegistryConfig;
use food_registry::food_actor::{FoodError, ListScope, QuantityUpdatePolicy};
use food_registry::lifecycle::FoodRegistrySystem;
use food_registry::model::{FoodItemId, FoodItemPayload};
use registry_framework::collab::{SequentialIds, StepClock};
use registry_framework::{Principal, Timestamp};
use tempfile::TempDir;

fn open(config: &RegistryConfig) -> FoodRegistrySystem {
    FoodRegistrySystem::open_with(config, SequentialIds::new("food"), StepClock::new(1_000, 1_000))
        .expect("Failed to open registry")
}

fn payload(name: &str, quantity: f64) -> FoodItemPayload {
    FoodItemPayload::new(name, quantity, "2025-06-01")
}

/// The reference scenario: create, change the quantity, share.
#[tokio::test]
async fn test_rice_is_created_reduced_and_shared() {
    let dir = TempDir::new().unwrap();
    let system = open(&RegistryConfig::with_data_dir(dir.path()));
    let alice = system.food_client.acting_as("alice");

    let rice = alice
        .create_food_item(FoodItemPayload::new("Rice", 10.0, "2025-06-01"))
        .await
        .expect("Failed to create item");
    assert_eq!(rice.owner_id, Principal::new("alice"));
    assert_eq!(rice.updated_at, None);

    let fetched = alice.get_food_item_by_id(rice.id.clone()).await.unwrap();
    assert_eq!(fetched, rice);

    alice
        .update_food_item_quantity(rice.id.clone(), 3.0)
        .await
        .expect("Failed to update quantity");
    let reduced = alice.get_food_item_by_id(rice.id.clone()).await.unwrap();
    assert_eq!(reduced.quantity, 3.0);
    assert!(reduced.updated_at.is_some());

    let shared = alice.share_excess_food(rice.id.clone()).await.unwrap();
    assert_eq!(shared, reduced);

    assert_eq!(
        alice.get_food_item_by_id(rice.id.clone()).await,
        Err(FoodError::NotFound(rice.id.to_string()))
    );
    let pool = alice.get_all_shared_food_items().await.unwrap();
    assert_eq!(pool.len(), 1);
    assert_eq!(pool[0].id, rice.id);
    assert_eq!(pool[0].quantity, 3.0);

    drop(alice);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_map_and_pool_survive_restart() {
    let dir = TempDir::new().unwrap();
    let config = RegistryConfig::with_data_dir(dir.path());

    let system = open(&config);
    let client = system.food_client.acting_as("alice");
    let bread = client.create_food_item(payload("Bread", 2.0)).await.unwrap();
    let milk = client.create_food_item(payload("Milk", 1.0)).await.unwrap();
    let eggs = client.create_food_item(payload("Eggs", 12.0)).await.unwrap();
    client.update_food_item_quantity(bread.id.clone(), 1.0).await.unwrap();
    client.delete_food_item(milk.id.clone()).await.unwrap();
    client.share_excess_food(eggs.id.clone()).await.unwrap();
    drop(client);
    system.shutdown().await.unwrap();

    // A different id prefix so the new process cannot collide with the old one.
    let ids = SequentialIds::new("later");
    let system = FoodRegistrySystem::open_with(&config, ids, StepClock::new(9_000, 1)).unwrap();
    let client = &system.food_client;

    let all = client.get_all_food_items().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, bread.id);
    assert_eq!(all[0].quantity, 1.0);
    assert_eq!(all[0].created_at, bread.created_at);

    assert!(matches!(
        client.get_food_item_by_id(milk.id.clone()).await,
        Err(FoodError::NotFound(_))
    ));

    let pool = client.get_all_shared_food_items().await.unwrap();
    assert_eq!(pool.len(), 1);
    assert_eq!(pool[0], eggs);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_invalid_payloads_change_nothing() {
    let dir = TempDir::new().unwrap();
    let system = open(&RegistryConfig::with_data_dir(dir.path()));
    let client = &system.food_client;

    assert!(matches!(
        client.create_food_item(payload("", 5.0)).await,
        Err(FoodError::Validation(_))
    ));
    assert!(matches!(
        client.create_food_item(FoodItemPayload::new("Bread", 0.0, "2025-01-01")).await,
        Err(FoodError::Validation(_))
    ));
    assert!(client.get_all_food_items().await.unwrap().is_empty());

    let bread = client.create_food_item(payload("Bread", 2.0)).await.unwrap();
    assert!(matches!(
        client.update_food_item(bread.id.clone(), payload("Bread", -1.0)).await,
        Err(FoodError::Validation(_))
    ));
    assert!(matches!(
        client.get_food_item_by_id("").await,
        Err(FoodError::Validation(_))
    ));
    assert!(matches!(
        client.get_food_items_by_name("  ").await,
        Err(FoodError::Validation(_))
    ));
    assert!(matches!(
        client.share_excess_food("").await,
        Err(FoodError::Validation(_))
    ));
    assert_eq!(client.get_food_item_by_id(bread.id.clone()).await.unwrap(), bread);

    // Unknown ids are not found for every id-keyed operation.
    let ghost = FoodItemId::from("food_404");
    assert!(matches!(
        client.update_food_item(ghost.clone(), payload("X", 1.0)).await,
        Err(FoodError::NotFound(_))
    ));
    assert!(matches!(
        client.update_food_item_quantity(ghost.clone(), 1.0).await,
        Err(FoodError::NotFound(_))
    ));
    assert!(matches!(
        client.delete_food_item(ghost.clone()).await,
        Err(FoodError::NotFound(_))
    ));
    assert!(matches!(
        client.share_excess_food(ghost).await,
        Err(FoodError::NotFound(_))
    ));

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_update_preserves_identity_and_advances_time() {
    let dir = TempDir::new().unwrap();
    let system = open(&RegistryConfig::with_data_dir(dir.path()));
    let alice = system.food_client.acting_as("alice");
    let bob = system.food_client.acting_as("bob");

    let rice = alice.create_food_item(payload("Rice", 10.0)).await.unwrap();

    let first = bob
        .update_food_item(rice.id.clone(), FoodItemPayload::new("Basmati", 8.0, 1_767_225_600u64))
        .await
        .unwrap();
    let second = alice.update_food_item(rice.id.clone(), payload("Basmati", 7.0)).await.unwrap();

    for updated in [&first, &second] {
        assert_eq!(updated.id, rice.id);
        assert_eq!(updated.owner_id, Principal::new("alice"));
        assert_eq!(updated.created_at, rice.created_at);
    }
    let (Some(t1), Some(t2)) = (first.updated_at, second.updated_at) else {
        panic!("updatedAt must be set by every update");
    };
    assert!(t1 > rice.created_at);
    assert!(t2 > t1);
    assert_eq!(second.name, "Basmati");
    assert_eq!(second.quantity, 7.0);

    drop((alice, bob));
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_name_and_quantity_queries() {
    let dir = TempDir::new().unwrap();
    let system = open(&RegistryConfig::with_data_dir(dir.path()));
    let client = &system.food_client;

    for (name, quantity) in [("Rice", 10.0), ("rice", 2.0), ("Beans", 5.0), ("Apples", 0.5)] {
        client.create_food_item(payload(name, quantity)).await.unwrap();
    }

    let rice: Vec<f64> = client
        .get_food_items_by_name("RICE")
        .await
        .unwrap()
        .iter()
        .map(|item| item.quantity)
        .collect();
    assert_eq!(rice, vec![10.0, 2.0]);
    assert!(client.get_food_items_by_name("Ric").await.unwrap().is_empty());

    let mut mid: Vec<String> = client
        .get_food_items_by_quantity(2.0, 10.0)
        .await
        .unwrap()
        .into_iter()
        .map(|item| item.name)
        .collect();
    mid.sort();
    assert_eq!(mid, vec!["Beans", "Rice", "rice"]);
    assert!(client.get_food_items_by_quantity(10.0, 2.0).await.unwrap().is_empty());

    system.shutdown().await.unwrap();
}

async fn owned_by(client: &FoodClient) -> Vec<Principal> {
    client
        .get_all_food_items()
        .await
        .unwrap()
        .into_iter()
        .map(|item| item.owner_id)
        .collect()
}

#[tokio::test]
async fn test_list_scope_policies() {
    let dir = TempDir::new().unwrap();
    let mut config = RegistryConfig::with_data_dir(dir.path());

    let system = open(&config);
    let alice = system.food_client.acting_as("alice");
    let bob = system.food_client.acting_as("bob");
    alice.create_food_item(payload("Rice", 1.0)).await.unwrap();
    bob.create_food_item(payload("Beans", 1.0)).await.unwrap();
    assert_eq!(owned_by(&bob).await.len(), 2);
    drop((alice, bob));
    system.shutdown().await.unwrap();

    config.list_scope = ListScope::Owner;
    let ids = SequentialIds::new("owner");
    let system = FoodRegistrySystem::open_with(&config, ids, StepClock::new(50_000, 1)).unwrap();
    let bob = system.food_client.acting_as("bob");
    assert_eq!(owned_by(&bob).await, vec![Principal::new("bob")]);
    let carol = system.food_client.acting_as("carol");
    assert!(owned_by(&carol).await.is_empty());
    drop((bob, carol));
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_quantity_update_policies() {
    let dir = TempDir::new().unwrap();
    let mut config = RegistryConfig::with_data_dir(dir.path());

    let system = open(&config);
    let client = &system.food_client;
    let bread = client.create_food_item(payload("Bread", 2.0)).await.unwrap();
    let zero = client.update_food_item_quantity(bread.id.clone(), 0.0).await.unwrap();
    assert_eq!(zero.quantity, 0.0);
    let negative = client.update_food_item_quantity(bread.id.clone(), -3.0).await.unwrap();
    assert_eq!(negative.quantity, -3.0);
    assert!(matches!(
        client.update_food_item_quantity(bread.id.clone(), f64::INFINITY).await,
        Err(FoodError::Validation(_))
    ));
    system.shutdown().await.unwrap();

    config.quantity_update = QuantityUpdatePolicy::RequirePositive;
    let ids = SequentialIds::new("strict");
    let system = FoodRegistrySystem::open_with(&config, ids, StepClock::new(50_000, 1)).unwrap();
    let client = &system.food_client;
    assert!(matches!(
        client.update_food_item_quantity(bread.id.clone(), 0.0).await,
        Err(FoodError::Validation(_))
    ));
    let restored = client.update_food_item_quantity(bread.id.clone(), 4.0).await.unwrap();
    assert_eq!(restored.quantity, 4.0);
    assert_eq!(restored.updated_at, Some(Timestamp(50_000)));
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_concurrent_clients_are_serialized() {
    let dir = TempDir::new().unwrap();
    let system = open(&RegistryConfig::with_data_dir(dir.path()));

    let mut tasks = Vec::new();
    for n in 0..16 {
        let client = system.food_client.acting_as(format!("user{n}").as_str());
        tasks.push(tokio::spawn(async move {
            client.create_food_item(payload("Soup", 1.0 + n as f64)).await
        }));
    }
    let mut ids = Vec::new();
    for task in tasks {
        ids.push(task.await.unwrap().unwrap().id);
    }
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 16);

    let created: Vec<Timestamp> = system
        .food_client
        .get_all_food_items()
        .await
        .unwrap()
        .into_iter()
        .map(|item| item.created_at)
        .collect();
    let mut distinct = created.clone();
    distinct.sort();
    distinct.dedup();
    assert_eq!(distinct.len(), created.len());

    system.shutdown().await.unwrap();
}
