//! Error types for the Food actor.

use registry_framework::FrameworkError;
use thiserror::Error;

/// Errors that can occur during food registry operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FoodError {
    /// No active food item has the requested id.
    #[error("Food Item with ID={0} not found.")]
    NotFound(String),

    /// Missing or malformed caller input. Nothing was changed.
    #[error("Invalid input: {0}")]
    Validation(String),

    /// A freshly generated id collided with an existing record.
    #[error("Food item with the same id already exists: {0}")]
    DuplicateId(String),

    /// The durable store could not be read or written.
    #[error("Food registry storage error: {0}")]
    Storage(String),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl FoodError {
    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        FoodError::Validation(msg.into())
    }
}

impl From<FrameworkError> for FoodError {
    fn from(e: FrameworkError) -> Self {
        match e {
            FrameworkError::NotFound(id) => FoodError::NotFound(id),
            FrameworkError::DuplicateId(id) => FoodError::DuplicateId(id),
            FrameworkError::Storage(e) => FoodError::Storage(e.to_string()),
            // Entity hooks fail with FoodError; recover it intact.
            FrameworkError::EntityError(inner) => match inner.downcast::<FoodError>() {
                Ok(food) => *food,
                Err(other) => FoodError::ActorCommunicationError(other.to_string()),
            },
            e @ (FrameworkError::ActorClosed | FrameworkError::ActorDropped) => {
                FoodError::ActorCommunicationError(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_error_is_recovered_by_downcast() {
        let wrapped =
            FrameworkError::EntityError(Box::new(FoodError::validation("name must not be empty")));
        assert_eq!(
            FoodError::from(wrapped),
            FoodError::Validation("name must not be empty".into())
        );
    }

    #[test]
    fn test_foreign_entity_error_becomes_communication_error() {
        let wrapped = FrameworkError::EntityError(Box::new(std::io::Error::other("boom")));
        assert!(matches!(
            FoodError::from(wrapped),
            FoodError::ActorCommunicationError(msg) if msg.contains("boom")
        ));
    }

    #[test]
    fn test_framework_variants_map_one_to_one() {
        assert_eq!(
            FoodError::from(FrameworkError::NotFound("x".into())),
            FoodError::NotFound("x".into())
        );
        assert_eq!(
            FoodError::from(FrameworkError::DuplicateId("x".into())),
            FoodError::DuplicateId("x".into())
        );
        assert!(matches!(
            FoodError::from(FrameworkError::ActorClosed),
            FoodError::ActorCommunicationError(_)
        ));
    }
}
