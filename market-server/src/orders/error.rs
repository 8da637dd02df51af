//! Fulfillment engine errors

use shared::error::AppError;
use shared::order::OrderStatus;
use thiserror::Error;

use crate::storage::StoreError;

/// Errors raised by checkout and status transitions
///
/// Business-rule variants never leave partial state behind: the owning
/// write transaction is dropped uncommitted.
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Cart is empty")]
    EmptyCart,

    #[error("Invalid shipping address: {0}")]
    InvalidAddress(String),

    #[error("Insufficient stock for product {product}{}", size_suffix(.size))]
    InsufficientStock {
        product: String,
        size: Option<String>,
    },

    #[error("Order {0} not found")]
    OrderNotFound(u64),

    #[error("Cannot move order from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error("You are not authorized to update this order")]
    NotAuthorized,

    #[error("Vendors cannot mark orders as delivered; only customers can confirm receipt")]
    VendorCannotDeliver,

    #[error(transparent)]
    Store(#[from] StoreError),
}

fn size_suffix(size: &Option<String>) -> String {
    match size {
        Some(s) => format!(" (size {})", s),
        None => String::new(),
    }
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::EmptyCart => AppError::Validation(err.to_string()),
            OrderError::InvalidAddress(_) => AppError::Validation(err.to_string()),
            OrderError::InsufficientStock { .. } => AppError::BusinessRule(err.to_string()),
            OrderError::OrderNotFound(id) => AppError::NotFound(format!("Order {} not found", id)),
            OrderError::InvalidTransition { .. } => AppError::BusinessRule(err.to_string()),
            OrderError::NotAuthorized => AppError::Forbidden(err.to_string()),
            OrderError::VendorCannotDeliver => AppError::Forbidden(err.to_string()),
            OrderError::Store(e) => e.into(),
        }
    }
}

/// Result type for engine operations
pub type OrderResult<T> = Result<T, OrderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_error_names_product_and_size() {
        let err = OrderError::InsufficientStock {
            product: "Linen Shirt".to_string(),
            size: Some("M".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for product Linen Shirt (size M)"
        );

        let err = OrderError::InsufficientStock {
            product: "Mug".to_string(),
            size: None,
        };
        assert_eq!(err.to_string(), "Insufficient stock for product Mug");
    }

    #[test]
    fn test_transition_error_names_both_states() {
        let err = OrderError::InvalidTransition {
            from: OrderStatus::Delivered,
            to: OrderStatus::Confirmed,
        };
        assert_eq!(err.to_string(), "Cannot move order from delivered to confirmed");
    }
}
