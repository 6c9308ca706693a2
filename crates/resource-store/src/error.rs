//! # Store Errors
//!
//! Errors raised by the store plumbing itself. Entity-level failures travel inside
//! [`FrameworkError::EntityError`] and can be recovered with [`FrameworkError::into_entity_error`].

/// Errors that can occur within the store framework.
#[derive(Debug, thiserror::Error)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Entity error: {0}")]
    EntityError(Box<dyn std::error::Error + Send + Sync>),
}

impl FrameworkError {
    /// Recovers the concrete entity error `E` if this is an `EntityError` carrying one.
    ///
    /// Any other variant, or an entity error of a different type, is handed back unchanged.
    pub fn into_entity_error<E>(self) -> Result<E, FrameworkError>
    where
        E: std::error::Error + 'static,
    {
        match self {
            FrameworkError::EntityError(inner) => match inner.downcast::<E>() {
                Ok(err) => Ok(*err),
                Err(other) => Err(FrameworkError::EntityError(other)),
            },
            other => Err(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error, PartialEq)]
    #[error("quantity must be positive")]
    struct QuantityError;

    #[derive(Debug, thiserror::Error)]
    #[error("other")]
    struct OtherError;

    #[test]
    fn entity_error_downcasts_to_its_concrete_type() {
        let err = FrameworkError::EntityError(Box::new(QuantityError));
        assert_eq!(err.into_entity_error::<QuantityError>().unwrap(), QuantityError);
    }

    #[test]
    fn mismatched_entity_error_is_returned_untouched() {
        let err = FrameworkError::EntityError(Box::new(OtherError));
        let back = err.into_entity_error::<QuantityError>().unwrap_err();
        assert_eq!(back.to_string(), "Entity error: other");

        let closed = FrameworkError::ActorClosed.into_entity_error::<QuantityError>();
        assert!(matches!(closed, Err(FrameworkError::ActorClosed)));
    }
}
