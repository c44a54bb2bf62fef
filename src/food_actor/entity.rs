//! RegistryEntity trait implementation for the FoodItem domain type.
//!
//! This module contains the [`RegistryEntity`] implementation that lets [`FoodItem`] be
//! managed by the generic [`ResourceActor`](registry_framework::ResourceActor): payload
//! validation, query matching, the update merge, the quantity action and the share
//! notice.

use super::actions::{FoodAction, FoodActionResult};
use super::error::FoodError;
use super::policy::{FoodPolicy, ListScope, QuantityUpdatePolicy};
use crate::model::{ExpirationDate, FoodItem, FoodItemId, FoodItemPayload, FoodQuery};
use async_trait::async_trait;
use registry_framework::{Origin, RegistryEntity};
use tracing::info;

fn check_quantity(quantity: f64) -> Result<f64, FoodError> {
    if !quantity.is_finite() {
        return Err(FoodError::validation("quantity must be a finite number"));
    }
    Ok(quantity)
}

fn check_positive(quantity: f64) -> Result<f64, FoodError> {
    if check_quantity(quantity)? <= 0.0 {
        return Err(FoodError::validation("quantity must be greater than zero"));
    }
    Ok(quantity)
}

/// Shared by create and update: name, positive quantity and expiration date are required.
fn check_payload(payload: &FoodItemPayload) -> Result<(f64, &ExpirationDate), FoodError> {
    if payload.name.trim().is_empty() {
        return Err(FoodError::validation("name must not be empty"));
    }
    let quantity = payload
        .quantity
        .ok_or_else(|| FoodError::validation("quantity is required"))?;
    let quantity = check_positive(quantity)?;
    let expiration_date = payload
        .expiration_date
        .as_ref()
        .filter(|date| !date.is_blank())
        .ok_or_else(|| FoodError::validation("expirationDate is required"))?;
    Ok((quantity, expiration_date))
}

#[async_trait]
impl RegistryEntity for FoodItem {
    type Id = FoodItemId;
    type Create = FoodItemPayload;
    type Update = FoodItemPayload;
    type Action = FoodAction;
    type ActionResult = FoodActionResult;
    type Query = FoodQuery;
    type Context = FoodPolicy;
    type Error = FoodError;

    fn id(&self) -> &FoodItemId {
        &self.id
    }

    /// Builds a new item owned by the caller, stamped with the operation time.
    fn from_create_params(
        id: FoodItemId,
        params: FoodItemPayload,
        origin: &Origin,
        _ctx: &FoodPolicy,
    ) -> Result<Self, FoodError> {
        let (quantity, expiration_date) = check_payload(&params)?;
        let expiration_date = expiration_date.clone();
        Ok(Self {
            id,
            name: params.name,
            quantity,
            expiration_date,
            owner_id: origin.caller.clone(),
            created_at: origin.at,
            updated_at: None,
        })
    }

    fn validate_id(id: &FoodItemId) -> Result<(), FoodError> {
        if id.as_str().trim().is_empty() {
            return Err(FoodError::validation("id must not be empty"));
        }
        Ok(())
    }

    fn validate_query(query: &FoodQuery) -> Result<(), FoodError> {
        match query {
            FoodQuery::All => Ok(()),
            FoodQuery::ByName(name) if name.trim().is_empty() => {
                Err(FoodError::validation("name must not be empty"))
            }
            FoodQuery::ByName(_) => Ok(()),
            FoodQuery::QuantityRange { min, max } => {
                check_quantity(*min)?;
                check_quantity(*max)?;
                Ok(())
            }
        }
    }

    fn validate_update(update: &FoodItemPayload, _ctx: &FoodPolicy) -> Result<(), FoodError> {
        check_payload(update).map(|_| ())
    }

    fn validate_action(action: &FoodAction, ctx: &FoodPolicy) -> Result<(), FoodError> {
        match action {
            FoodAction::SetQuantity(quantity) => match ctx.quantity_update {
                QuantityUpdatePolicy::AllowAny => check_quantity(*quantity).map(|_| ()),
                QuantityUpdatePolicy::RequirePositive => check_positive(*quantity).map(|_| ()),
            },
        }
    }

    fn matches(&self, query: &FoodQuery, origin: &Origin, ctx: &FoodPolicy) -> bool {
        match query {
            FoodQuery::All => match ctx.list_scope {
                ListScope::All => true,
                ListScope::Owner => self.owner_id == origin.caller,
            },
            FoodQuery::ByName(name) => self.name.to_lowercase() == name.to_lowercase(),
            // min > max matches nothing
            FoodQuery::QuantityRange { min, max } => *min <= self.quantity && self.quantity <= *max,
        }
    }

    /// Replaces name, quantity and expiration date. `id`, `ownerId` and `createdAt`
    /// are kept.
    async fn on_update(
        &mut self,
        update: FoodItemPayload,
        origin: &Origin,
        _ctx: &FoodPolicy,
    ) -> Result<(), FoodError> {
        let (quantity, expiration_date) = check_payload(&update)?;
        self.quantity = quantity;
        self.expiration_date = expiration_date.clone();
        self.name = update.name;
        self.updated_at = Some(origin.at);
        Ok(())
    }

    async fn on_share(&self, _ctx: &FoodPolicy) -> Result<(), FoodError> {
        info!(
            id = %self.id,
            "Shared: Food item \"{}\" has been shared with the community!",
            self.name
        );
        Ok(())
    }

    /// # Actions
    /// - `SetQuantity`: overwrites the quantity, returns the updated item
    async fn handle_action(
        &mut self,
        action: FoodAction,
        origin: &Origin,
        ctx: &FoodPolicy,
    ) -> Result<FoodActionResult, FoodError> {
        Self::validate_action(&action, ctx)?;
        match action {
            FoodAction::SetQuantity(quantity) => {
                self.quantity = quantity;
                self.updated_at = Some(origin.at);
                Ok(FoodActionResult::SetQuantity(self.clone()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use registry_framework::{Principal, Timestamp};

    fn origin(caller: &str, at: u64) -> Origin {
        Origin {
            caller: Principal::new(caller),
            at: Timestamp(at),
        }
    }

    fn rice() -> FoodItem {
        FoodItem::from_create_params(
            FoodItemId::from("food_1"),
            FoodItemPayload::new("Rice", 10.0, "2025-06-01"),
            &origin("alice", 100),
            &FoodPolicy::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_create_stamps_owner_and_time() {
        let item = rice();
        assert_eq!(item.owner_id, Principal::new("alice"));
        assert_eq!(item.created_at, Timestamp(100));
        assert_eq!(item.updated_at, None);
        assert_eq!(item.quantity, 10.0);
    }

    #[test]
    fn test_create_rejects_bad_payloads() {
        let ctx = FoodPolicy::default();
        let at = origin("alice", 1);
        let cases = [
            FoodItemPayload::new("", 5.0, "2025-01-01"),
            FoodItemPayload::new("   ", 5.0, "2025-01-01"),
            FoodItemPayload::new("Bread", 0.0, "2025-01-01"),
            FoodItemPayload::new("Bread", -1.0, "2025-01-01"),
            FoodItemPayload::new("Bread", f64::NAN, "2025-01-01"),
            FoodItemPayload::new("Bread", f64::INFINITY, "2025-01-01"),
            FoodItemPayload::new("Bread", 5.0, ""),
            FoodItemPayload {
                name: "Bread".into(),
                quantity: None,
                expiration_date: Some("2025-01-01".into()),
            },
            FoodItemPayload {
                name: "Bread".into(),
                quantity: Some(5.0),
                expiration_date: None,
            },
        ];

        for payload in cases {
            let result =
                FoodItem::from_create_params(FoodItemId::from("x"), payload.clone(), &at, &ctx);
            assert!(
                matches!(result, Err(FoodError::Validation(_))),
                "accepted {payload:?}"
            );
        }
    }

    #[test]
    fn test_numeric_expiration_date_is_accepted() {
        let item = FoodItem::from_create_params(
            FoodItemId::from("x"),
            FoodItemPayload::new("Milk", 1.0, 1_735_689_600u64),
            &origin("bob", 1),
            &FoodPolicy::default(),
        )
        .unwrap();
        assert_eq!(item.expiration_date, ExpirationDate::from(1_735_689_600u64));

        let fractional = FoodItem::from_create_params(
            FoodItemId::from("y"),
            FoodItemPayload::new("Milk", 1.0, ExpirationDate::from_f64(-0.5).unwrap()),
            &origin("bob", 2),
            &FoodPolicy::default(),
        )
        .unwrap();
        assert_eq!(fractional.expiration_date.to_string(), "-0.5");
    }

    #[test]
    fn test_validate_id_and_query() {
        assert!(FoodItem::validate_id(&FoodItemId::from("")).is_err());
        assert!(FoodItem::validate_id(&FoodItemId::from("food_1")).is_ok());

        assert!(FoodItem::validate_query(&FoodQuery::ByName(" ".into())).is_err());
        assert!(FoodItem::validate_query(&FoodQuery::ByName("rice".into())).is_ok());
        let nan = FoodQuery::QuantityRange {
            min: f64::NAN,
            max: 1.0,
        };
        assert!(FoodItem::validate_query(&nan).is_err());
        // An inverted range is valid; it just matches nothing.
        let inverted = FoodQuery::QuantityRange { min: 5.0, max: 1.0 };
        assert!(FoodItem::validate_query(&inverted).is_ok());
    }

    #[test]
    fn test_matches_name_ignoring_case() {
        let item = rice();
        let ctx = FoodPolicy::default();
        let at = origin("bob", 2);
        assert!(item.matches(&FoodQuery::ByName("rICE".into()), &at, &ctx));
        assert!(!item.matches(&FoodQuery::ByName("Ric".into()), &at, &ctx));
    }

    #[test]
    fn test_matches_quantity_range_inclusive() {
        let item = rice();
        let ctx = FoodPolicy::default();
        let at = origin("bob", 2);
        let range = |min, max| FoodQuery::QuantityRange { min, max };
        assert!(item.matches(&range(10.0, 10.0), &at, &ctx));
        assert!(item.matches(&range(0.0, 20.0), &at, &ctx));
        assert!(!item.matches(&range(11.0, 20.0), &at, &ctx));
        assert!(!item.matches(&range(20.0, 0.0), &at, &ctx));
    }

    #[test]
    fn test_list_scope_decides_owner_filter() {
        let item = rice();
        let owner_only = FoodPolicy {
            list_scope: ListScope::Owner,
            ..FoodPolicy::default()
        };
        assert!(item.matches(&FoodQuery::All, &origin("bob", 2), &FoodPolicy::default()));
        assert!(!item.matches(&FoodQuery::All, &origin("bob", 2), &owner_only));
        assert!(item.matches(&FoodQuery::All, &origin("alice", 2), &owner_only));
    }

    #[tokio::test]
    async fn test_update_keeps_immutable_fields() {
        let mut item = rice();
        item.on_update(
            FoodItemPayload::new("Brown rice", 4.0, "2025-07-01"),
            &origin("bob", 200),
            &FoodPolicy::default(),
        )
        .await
        .unwrap();

        assert_eq!(item.id, FoodItemId::from("food_1"));
        assert_eq!(item.owner_id, Principal::new("alice"));
        assert_eq!(item.created_at, Timestamp(100));
        assert_eq!(item.updated_at, Some(Timestamp(200)));
        assert_eq!(item.name, "Brown rice");
        assert_eq!(item.quantity, 4.0);
    }

    #[tokio::test]
    async fn test_set_quantity_follows_policy() {
        let mut item = rice();
        let lenient = FoodPolicy::default();
        let strict = FoodPolicy {
            quantity_update: QuantityUpdatePolicy::RequirePositive,
            ..FoodPolicy::default()
        };

        let result = item
            .handle_action(FoodAction::SetQuantity(0.0), &origin("alice", 300), &lenient)
            .await
            .unwrap();
        assert!(matches!(
            result,
            FoodActionResult::SetQuantity(ref updated) if updated.quantity == 0.0
        ));
        assert_eq!(item.updated_at, Some(Timestamp(300)));

        let rejected = item
            .handle_action(FoodAction::SetQuantity(-2.0), &origin("alice", 400), &strict)
            .await;
        assert!(matches!(rejected, Err(FoodError::Validation(_))));

        let rejected = item
            .handle_action(FoodAction::SetQuantity(f64::NAN), &origin("alice", 500), &lenient)
            .await;
        assert!(matches!(rejected, Err(FoodError::Validation(_))));
    }
}
