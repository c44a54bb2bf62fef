//! Registry-wide policy, injected into the Food actor as its context.

use serde::{Deserialize, Serialize};

/// Which items `getAllFoodItems` returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListScope {
    /// Every active item, whoever owns it.
    #[default]
    All,
    /// Only items owned by the caller.
    Owner,
}

/// What `updateFoodItemQuantity` accepts. Non-finite numbers are rejected either way.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuantityUpdatePolicy {
    /// Zero and negative quantities are stored as given.
    #[default]
    AllowAny,
    /// Same rule as creation: quantity must be greater than zero.
    RequirePositive,
}

/// Context handed to every [`FoodItem`](crate::model::FoodItem) hook.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FoodPolicy {
    pub list_scope: ListScope,
    pub quantity_update: QuantityUpdatePolicy,
}
