use thiserror::Error;
use vnm_common::{ProductId, VendorId};
use vnm_errors::AppError;

use crate::domain::product::ProductStatus;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("Unknown role code: {0}")]
    UnknownRole(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("Cannot move product from {from} to {to}")]
    NotAllowed {
        from: ProductStatus,
        to: ProductStatus,
    },
    #[error("Product is already {0}")]
    AlreadyInStatus(ProductStatus),
}

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Product {0} not found")]
    NotFound(ProductId),
    #[error("Vendor {vendor_id} already has a product with slug '{slug}'")]
    DuplicateSlug { vendor_id: VendorId, slug: String },
    #[error("At least one VND price is required")]
    MissingVndPrice,
    #[error("Prices must not be negative")]
    NegativePrice,
    #[error("Duplicate SKU '{0}'")]
    DuplicateSku(String),
    #[error(transparent)]
    Transition(#[from] TransitionError),
}

impl From<AccessError> for AppError {
    fn from(error: AccessError) -> Self {
        match error {
            AccessError::UnknownRole(_) => AppError::validation(error.to_string()),
        }
    }
}

impl From<TransitionError> for AppError {
    fn from(error: TransitionError) -> Self {
        AppError::conflict(error.to_string())
    }
}

impl From<ProductError> for AppError {
    fn from(error: ProductError) -> Self {
        match error {
            ProductError::NotFound(_) => AppError::not_found(error.to_string()),
            ProductError::DuplicateSlug { .. } => AppError::conflict(error.to_string()),
            ProductError::MissingVndPrice
            | ProductError::NegativePrice
            | ProductError::DuplicateSku(_) => AppError::validation(error.to_string()),
            ProductError::Transition(e) => e.into(),
        }
    }
}
