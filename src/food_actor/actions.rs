//! Custom actions for the Food actor.
//!
//! Operations on a [`FoodItem`] beyond plain create/update/delete. They are handled by
//! [`RegistryEntity::handle_action`](registry_framework::RegistryEntity::handle_action);
//! see [`impl RegistryEntity for FoodItem`](crate::model::FoodItem#impl-RegistryEntity-for-FoodItem).

use crate::model::FoodItem;

/// Custom actions for food items.
#[derive(Debug, Clone, PartialEq)]
pub enum FoodAction {
    /// Overwrites only the quantity (and `updatedAt`).
    ///
    /// Whether zero or negative values are accepted depends on the registry's
    /// [`QuantityUpdatePolicy`](super::QuantityUpdatePolicy).
    SetQuantity(f64),
}

/// Results from FoodActions - variants match 1:1 with FoodAction
#[derive(Debug, Clone, PartialEq)]
pub enum FoodActionResult {
    /// The item as stored after the change.
    SetQuantity(FoodItem),
}
