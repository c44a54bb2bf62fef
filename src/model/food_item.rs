/// A perishable food item recorded in the registry.
///
/// # Registry Framework
/// This struct implements the [`RegistryEntity`](registry_framework::RegistryEntity) trait,
/// allowing it to be managed by a [`ResourceActor`](registry_framework::ResourceActor).
///
/// See [`impl RegistryEntity for FoodItem`](#impl-RegistryEntity-for-FoodItem) for details on:
/// - Creation and update payloads ([`FoodItemPayload`])
/// - Queries ([`FoodQuery`](crate::model::FoodQuery))
/// - Custom actions ([`FoodAction`](crate::food_actor::FoodAction))
use registry_framework::{Principal, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// Type-safe identifier for food items. Assigned by the registry, never by the caller.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FoodItemId(String);

impl FoodItemId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for FoodItemId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for FoodItemId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl Display for FoodItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Caller-supplied expiration date. Stored as given and never interpreted.
///
/// Any JSON number is kept, including negative and fractional ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExpirationDate {
    Number(serde_json::Number),
    Text(String),
}

impl ExpirationDate {
    /// An empty string counts as no date at all.
    pub fn is_blank(&self) -> bool {
        match self {
            ExpirationDate::Text(text) => text.trim().is_empty(),
            ExpirationDate::Number(_) => false,
        }
    }

    /// `None` for NaN and the infinities, which JSON cannot carry.
    pub fn from_f64(at: f64) -> Option<Self> {
        serde_json::Number::from_f64(at).map(Self::Number)
    }
}

impl From<&str> for ExpirationDate {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<u64> for ExpirationDate {
    fn from(at: u64) -> Self {
        Self::Number(at.into())
    }
}

impl From<i64> for ExpirationDate {
    fn from(at: i64) -> Self {
        Self::Number(at.into())
    }
}

impl Display for ExpirationDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpirationDate::Number(at) => write!(f, "{at}"),
            ExpirationDate::Text(text) => f.write_str(text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodItem {
    pub id: FoodItemId,
    pub name: String,
    pub quantity: f64,
    pub expiration_date: ExpirationDate,
    /// Creator of the record; never changes.
    pub owner_id: Principal,
    /// Never changes.
    pub created_at: Timestamp,
    /// Absent until the first update.
    pub updated_at: Option<Timestamp>,
}

/// Payload for creating or replacing a food item.
///
/// Every field is optional on the wire so that a missing field surfaces as a
/// validation error instead of a decoding error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FoodItemPayload {
    pub name: String,
    pub quantity: Option<f64>,
    pub expiration_date: Option<ExpirationDate>,
}

impl FoodItemPayload {
    pub fn new(
        name: impl Into<String>,
        quantity: f64,
        expiration_date: impl Into<ExpirationDate>,
    ) -> Self {
        Self {
            name: name.into(),
            quantity: Some(quantity),
            expiration_date: Some(expiration_date.into()),
        }
    }
}
