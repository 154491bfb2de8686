//! Domain error types
//!
//! Typed errors for the example domain model. Construction failures are
//! enum variants, never strings, and carry enough context to print a
//! user-facing message.

use thiserror::Error;

/// Validation failures raised at domain object construction time.
///
/// Note the deliberate asymmetry kept from the original code: constructors
/// return these errors, but `Order::add_item` swallows its failure into a
/// boolean instead of propagating.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// A price must be strictly positive
    #[error("price must be positive, got {0} minor units")]
    NonPositivePrice(i64),

    /// Phone numbers need a country code
    #[error("phone country code must not be empty")]
    EmptyCountryCode,

    /// The subscriber part of a phone number is digits only
    #[error("phone subscriber must be numeric, got '{0}'")]
    NonNumericSubscriber(String),

    /// Line item quantities are positive integers
    #[error("quantity must be a positive integer, got {0}")]
    InvalidQuantity(i64),

    /// A completed order accepts no further line items
    #[error("order #{0} is completed, no further items may be added")]
    OrderCompleted(u64),

    /// Only phones can hold a SIM
    #[error("product '{0}' has no SIM slot")]
    NoSimSlot(String),
}

/// Convenience alias for domain results
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            DomainError::NonPositivePrice(-5).to_string(),
            "price must be positive, got -5 minor units"
        );
        assert_eq!(
            DomainError::OrderCompleted(7).to_string(),
            "order #7 is completed, no further items may be added"
        );
        assert_eq!(
            DomainError::NonNumericSubscriber("12a4".into()).to_string(),
            "phone subscriber must be numeric, got '12a4'"
        );
    }
}
