//! Pizza types

use serde::{Deserialize, Serialize};

use crate::validation::{validate_required, ValidationError};

/// Unique identifier for a pizza
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PizzaId(pub i64);

impl PizzaId {
    pub fn get(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for PizzaId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A pizza, in its bare shape: `{id, name, ingredients}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pizza {
    pub id: PizzaId,
    pub name: String,

    /// Free-text ingredient list, e.g. "Dough, Tomato Sauce, Cheese"
    pub ingredients: String,
}

impl Pizza {
    pub fn new(id: PizzaId, new: NewPizza) -> Self {
        Self {
            id,
            name: new.name,
            ingredients: new.ingredients,
        }
    }
}

/// Data for creating a new pizza
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPizza {
    pub name: String,
    pub ingredients: String,
}

impl NewPizza {
    pub fn new(name: impl Into<String>, ingredients: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ingredients: ingredients.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_required(&self.name, ValidationError::MissingName)?;
        validate_required(&self.ingredients, ValidationError::MissingIngredients)?;
        Ok(())
    }
}
