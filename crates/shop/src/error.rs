//! Application-level error type.

use domain::DomainError;
use thiserror::Error;

/// Errors surfaced by the shop binary.
#[derive(Debug, Error)]
pub enum ShopError {
    /// A workflow or catalog operation failed.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// A report could not be rendered.
    #[error("Report error: {0}")]
    Report(#[from] serde_json::Error),

    /// The tracing subscriber could not be installed.
    #[error("Telemetry error: {0}")]
    Telemetry(String),
}

impl ShopError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            ShopError::Domain(DomainError::Store(_)) => 3,
            ShopError::Domain(_) => 1,
            ShopError::Report(_) | ShopError::Telemetry(_) => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use common::OrderId;
    use store::StoreError;

    use super::*;

    #[test]
    fn test_domain_errors_pass_through() {
        let err = ShopError::from(DomainError::OrderNotFound(OrderId::new(4)));
        assert_eq!(err.to_string(), "Order not found: 4");
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_store_errors_get_own_code() {
        let err = ShopError::from(DomainError::from(StoreError::Unavailable {
            entity_type: "Order",
            reason: "down".to_string(),
        }));
        assert_eq!(err.exit_code(), 3);
    }
}
