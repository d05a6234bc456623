//! Restaurant types

use serde::{Deserialize, Serialize};

use crate::validation::{validate_required, ValidationError};

/// Unique identifier for a restaurant
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RestaurantId(pub i64);

impl RestaurantId {
    pub fn get(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for RestaurantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A restaurant, in its bare shape: `{id, name, address}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restaurant {
    /// Identifier assigned by the store
    pub id: RestaurantId,

    /// Display name
    pub name: String,

    /// Street address
    pub address: String,
}

impl Restaurant {
    pub fn new(id: RestaurantId, new: NewRestaurant) -> Self {
        Self {
            id,
            name: new.name,
            address: new.address,
        }
    }
}

/// Data for creating a new restaurant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRestaurant {
    pub name: String,
    pub address: String,
}

impl NewRestaurant {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
        }
    }

    /// Check that name and address are both present
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_required(&self.name, ValidationError::MissingName)?;
        validate_required(&self.address, ValidationError::MissingAddress)?;
        Ok(())
    }
}
