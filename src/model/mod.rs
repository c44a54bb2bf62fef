//! Domain data: the food item record, its payloads and the queries run against the
//! registry.

mod food_item;

pub use food_item::*;

/// Read-only scans over the active records. Results follow id order.
#[derive(Debug, Clone, PartialEq)]
pub enum FoodQuery {
    /// Every active item, subject to the registry's [`ListScope`](crate::food_actor::ListScope).
    All,
    /// Items whose name equals this one, ignoring case.
    ByName(String),
    /// Items with `min <= quantity <= max`. Empty when `min > max`.
    QuantityRange { min: f64, max: f64 },
}
