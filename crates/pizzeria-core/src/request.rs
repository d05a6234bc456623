//! Request payload for creating a restaurant pizza
//!
//! Validation happens in a fixed order, and callers are expected to
//! follow it:
//!
//! 1. [`CreateRestaurantPizzaRequest::require_fields`] collects every
//!    missing field at once
//! 2. the pizza is looked up by [`RequiredFields::pizza_id`]
//! 3. the restaurant is looked up by [`RequiredFields::restaurant_id`]
//! 4. [`RequiredFields::price`] applies the price rule

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::pizza::PizzaId;
use crate::price::{validate_price, Price, PriceError};
use crate::restaurant::RestaurantId;

/// Raw body of `POST /restaurant_pizzas`
///
/// Fields stay untyped so that a wrong type is reported by the matching
/// rule instead of failing deserialization as a whole.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateRestaurantPizzaRequest {
    #[serde(default)]
    pub price: Option<Value>,
    #[serde(default)]
    pub pizza_id: Option<Value>,
    #[serde(default)]
    pub restaurant_id: Option<Value>,
}

impl CreateRestaurantPizzaRequest {
    pub fn new(price: impl Into<Value>, pizza_id: impl Into<Value>, restaurant_id: impl Into<Value>) -> Self {
        Self {
            price: Some(price.into()),
            pizza_id: Some(pizza_id.into()),
            restaurant_id: Some(restaurant_id.into()),
        }
    }

    /// Parse a request body, treating anything that is not a JSON object as `{}`
    pub fn from_body(body: &[u8]) -> Self {
        let value = match serde_json::from_slice::<Value>(body) {
            Ok(value @ Value::Object(_)) => value,
            Ok(_) => {
                tracing::debug!("Request body is not a JSON object, treating as empty");
                return Self::default();
            }
            Err(e) => {
                tracing::debug!("Unreadable request body, treating as empty: {}", e);
                return Self::default();
            }
        };

        serde_json::from_value(value).unwrap_or_default()
    }

    /// Check that every field is present, collecting all missing ones
    pub fn require_fields(&self) -> Result<RequiredFields<'_>, Vec<String>> {
        let mut errors = Vec::new();

        let price = present(&self.price);
        let pizza_id = present(&self.pizza_id);
        let restaurant_id = present(&self.restaurant_id);

        if price.is_none() {
            errors.push(PriceError::Missing.to_string());
        }
        if pizza_id.is_none() {
            errors.push("pizza_id is required".to_string());
        }
        if restaurant_id.is_none() {
            errors.push("restaurant_id is required".to_string());
        }

        match (price, pizza_id, restaurant_id) {
            (Some(price), Some(pizza_id), Some(restaurant_id)) => Ok(RequiredFields {
                price,
                pizza_id,
                restaurant_id,
            }),
            _ => Err(errors),
        }
    }
}

fn present(value: &Option<Value>) -> Option<&Value> {
    value.as_ref().filter(|v| !v.is_null())
}

/// A request whose fields are all present
#[derive(Debug, Clone, Copy)]
pub struct RequiredFields<'a> {
    price: &'a Value,
    pizza_id: &'a Value,
    restaurant_id: &'a Value,
}

impl<'a> RequiredFields<'a> {
    /// The pizza id, or `None` when the value can never name a pizza
    pub fn pizza_id(&self) -> Option<PizzaId> {
        parse_id(self.pizza_id).map(PizzaId)
    }

    /// The restaurant id, or `None` when the value can never name a restaurant
    pub fn restaurant_id(&self) -> Option<RestaurantId> {
        parse_id(self.restaurant_id).map(RestaurantId)
    }

    pub fn price(&self) -> Result<Price, PriceError> {
        validate_price(Some(self.price))
    }
}

/// Ids may arrive as integers, integral floats or integer strings
fn parse_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_all_missing_fields_are_collected() {
        let request = CreateRestaurantPizzaRequest::default();
        let errors = request.require_fields().unwrap_err();
        assert_eq!(
            errors,
            vec!["Price is required", "pizza_id is required", "restaurant_id is required"]
        );
    }

    #[test]
    fn test_null_counts_as_missing() {
        let request: CreateRestaurantPizzaRequest =
            serde_json::from_value(json!({"price": null, "pizza_id": 1, "restaurant_id": 1})).unwrap();
        assert_eq!(request.require_fields().unwrap_err(), vec!["Price is required"]);
    }

    #[test]
    fn test_price_is_checked_after_presence() {
        let request = CreateRestaurantPizzaRequest::new(35, 1, 1);
        let fields = request.require_fields().unwrap();
        assert_eq!(fields.pizza_id(), Some(PizzaId(1)));
        assert_eq!(fields.restaurant_id(), Some(RestaurantId(1)));
        assert_eq!(fields.price(), Err(PriceError::OutOfRange));
    }

    #[test]
    fn test_id_forms() {
        let request = CreateRestaurantPizzaRequest::new(5, "2", 3.0);
        let fields = request.require_fields().unwrap();
        assert_eq!(fields.pizza_id(), Some(PizzaId(2)));
        assert_eq!(fields.restaurant_id(), Some(RestaurantId(3)));

        let request = CreateRestaurantPizzaRequest::new(5, "two", json!({"id": 1}));
        let fields = request.require_fields().unwrap();
        assert_eq!(fields.pizza_id(), None);
        assert_eq!(fields.restaurant_id(), None);
    }

    #[test]
    fn test_from_body_falls_back_to_empty() {
        assert_eq!(
            CreateRestaurantPizzaRequest::from_body(b"not json"),
            CreateRestaurantPizzaRequest::default()
        );
        assert_eq!(
            CreateRestaurantPizzaRequest::from_body(b"[1, 2]"),
            CreateRestaurantPizzaRequest::default()
        );

        let request = CreateRestaurantPizzaRequest::from_body(br#"{"price": 5, "extra": true}"#);
        assert_eq!(request.price, Some(json!(5)));
        assert_eq!(request.pizza_id, None);
    }
}
