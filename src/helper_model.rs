use serde_derive::{Deserialize, Serialize};
use thiserror::Error;

use crate::store::StoreError;

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct ErrorResponse {
    pub title: String,
    pub message: String,
}

/// Business outcomes of the booking engine. Everything except
/// `Persistence` is an expected rejection that goes back to the caller
/// with its kind; `Persistence` is a fault.
#[derive(Debug, Error)]
pub enum BookingError {
    #[error("{0}")]
    Validation(String),
    #[error("{0} not found")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    State(String),
    #[error("{0}")]
    RateLimit(String),
    #[error("price mismatch: server calculated {expected}, client sent {provided}")]
    PriceMismatch { expected: f64, provided: f64 },
    #[error("storage failure")]
    Persistence(#[from] StoreError),
}

impl BookingError {
    pub fn kind(&self) -> &'static str {
        match self {
            BookingError::Validation(_) => "VALIDATION",
            BookingError::NotFound(_) => "NOT_FOUND",
            BookingError::Conflict(_) => "CONFLICT",
            BookingError::State(_) => "STATE",
            BookingError::RateLimit(_) => "RATE_LIMIT",
            BookingError::PriceMismatch { .. } => "PRICE_MISMATCH",
            BookingError::Persistence(_) => "PERSISTENCE",
        }
    }
}
