//! Error types for Pizzeria Core

use thiserror::Error;

use crate::price::PriceError;
use crate::validation::ValidationError;

/// Result type alias using Pizzeria's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Pizzeria error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("Restaurant not found")]
    RestaurantNotFound,

    #[error("Pizza not found")]
    PizzaNotFound,

    #[error("{0}")]
    Price(#[from] PriceError),

    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Whether this error means a referenced entity does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::RestaurantNotFound | Self::PizzaNotFound)
    }
}
