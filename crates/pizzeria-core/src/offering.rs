//! RestaurantPizza types: a restaurant selling a pizza at a price

use serde::{Deserialize, Serialize};

use crate::pizza::PizzaId;
use crate::price::Price;
use crate::restaurant::RestaurantId;

/// Unique identifier for a restaurant pizza
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RestaurantPizzaId(pub i64);

impl RestaurantPizzaId {
    pub fn get(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for RestaurantPizzaId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A menu offering, in its bare shape: `{id, price, pizza_id, restaurant_id}`
///
/// Rows only hold foreign keys. The same (restaurant, pizza) pair may
/// appear any number of times.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestaurantPizza {
    pub id: RestaurantPizzaId,
    pub price: Price,
    pub pizza_id: PizzaId,
    pub restaurant_id: RestaurantId,
}

impl RestaurantPizza {
    pub fn new(id: RestaurantPizzaId, new: NewRestaurantPizza) -> Self {
        Self {
            id,
            price: new.price,
            pizza_id: new.pizza_id,
            restaurant_id: new.restaurant_id,
        }
    }
}

/// Data for creating a new restaurant pizza
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRestaurantPizza {
    pub price: Price,
    pub pizza_id: PizzaId,
    pub restaurant_id: RestaurantId,
}

impl NewRestaurantPizza {
    pub fn new(price: Price, pizza_id: PizzaId, restaurant_id: RestaurantId) -> Self {
        Self {
            price,
            pizza_id,
            restaurant_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restaurant_pizza_bare_shape() {
        let new = NewRestaurantPizza::new(Price::new(5).unwrap(), PizzaId(2), RestaurantId(1));
        let rp = RestaurantPizza::new(RestaurantPizzaId(9), new);

        let json = serde_json::to_value(&rp).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": 9, "price": 5, "pizza_id": 2, "restaurant_id": 1})
        );
    }

    #[test]
    fn test_deserialize_rejects_bad_price() {
        let raw = serde_json::json!({"id": 1, "price": 0, "pizza_id": 1, "restaurant_id": 1});
        assert!(serde_json::from_value::<RestaurantPizza>(raw).is_err());
    }
}
