//! Nested response shapes
//!
//! Bare shapes are the entity types themselves. The types here embed
//! related entities:
//!
//! - [`PizzaOffering`]: a restaurant pizza with its pizza
//! - [`RestaurantDetail`]: a restaurant with all of its offerings
//! - [`RestaurantPizzaDetail`]: a restaurant pizza with both its pizza and
//!   its restaurant
//!
//! Field declaration order is the documented key order of each shape.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::offering::{RestaurantPizza, RestaurantPizzaId};
use crate::pizza::{Pizza, PizzaId};
use crate::price::Price;
use crate::restaurant::{Restaurant, RestaurantId};

/// `{id, pizza, pizza_id, price, restaurant_id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PizzaOffering {
    pub id: RestaurantPizzaId,
    pub pizza: Pizza,
    pub pizza_id: PizzaId,
    pub price: Price,
    pub restaurant_id: RestaurantId,
}

impl PizzaOffering {
    pub fn new(restaurant_pizza: RestaurantPizza, pizza: Pizza) -> Self {
        debug_assert_eq!(restaurant_pizza.pizza_id, pizza.id);
        Self {
            id: restaurant_pizza.id,
            pizza,
            pizza_id: restaurant_pizza.pizza_id,
            price: restaurant_pizza.price,
            restaurant_id: restaurant_pizza.restaurant_id,
        }
    }
}

/// `{id, name, address, restaurant_pizzas: [PizzaOffering]}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestaurantDetail {
    pub id: RestaurantId,
    pub name: String,
    pub address: String,
    pub restaurant_pizzas: Vec<PizzaOffering>,
}

impl RestaurantDetail {
    /// Join a restaurant with its offerings.
    ///
    /// Only rows whose `restaurant_id` matches are kept. A row whose pizza
    /// is missing from `pizzas` is skipped.
    pub fn assemble(
        restaurant: Restaurant,
        restaurant_pizzas: impl IntoIterator<Item = RestaurantPizza>,
        pizzas: impl IntoIterator<Item = Pizza>,
    ) -> Self {
        let pizzas: HashMap<PizzaId, Pizza> = pizzas.into_iter().map(|p| (p.id, p)).collect();

        let offerings = restaurant_pizzas
            .into_iter()
            .filter(|rp| rp.restaurant_id == restaurant.id)
            .filter_map(|rp| match pizzas.get(&rp.pizza_id) {
                Some(pizza) => Some(PizzaOffering::new(rp, pizza.clone())),
                None => {
                    tracing::warn!("Restaurant pizza {} references missing pizza {}", rp.id, rp.pizza_id);
                    None
                }
            })
            .collect();

        Self {
            id: restaurant.id,
            name: restaurant.name,
            address: restaurant.address,
            restaurant_pizzas: offerings,
        }
    }
}

/// `{id, pizza, pizza_id, price, restaurant, restaurant_id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestaurantPizzaDetail {
    pub id: RestaurantPizzaId,
    pub pizza: Pizza,
    pub pizza_id: PizzaId,
    pub price: Price,
    pub restaurant: Restaurant,
    pub restaurant_id: RestaurantId,
}

impl RestaurantPizzaDetail {
    pub fn new(restaurant_pizza: RestaurantPizza, pizza: Pizza, restaurant: Restaurant) -> Self {
        debug_assert_eq!(restaurant_pizza.pizza_id, pizza.id);
        debug_assert_eq!(restaurant_pizza.restaurant_id, restaurant.id);
        Self {
            id: restaurant_pizza.id,
            pizza,
            pizza_id: restaurant_pizza.pizza_id,
            price: restaurant_pizza.price,
            restaurant,
            restaurant_id: restaurant_pizza.restaurant_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::offering::NewRestaurantPizza;
    use crate::pizza::NewPizza;
    use crate::restaurant::NewRestaurant;
    use serde_json::json;

    fn restaurant(id: i64) -> Restaurant {
        Restaurant::new(RestaurantId(id), NewRestaurant::new(format!("R{}", id), "Main St"))
    }

    fn pizza(id: i64) -> Pizza {
        Pizza::new(PizzaId(id), NewPizza::new(format!("P{}", id), "Dough, Cheese"))
    }

    fn offering(id: i64, price: i64, pizza_id: i64, restaurant_id: i64) -> RestaurantPizza {
        RestaurantPizza::new(
            RestaurantPizzaId(id),
            NewRestaurantPizza::new(Price::new(price).unwrap(), PizzaId(pizza_id), RestaurantId(restaurant_id)),
        )
    }

    #[test]
    fn test_detail_keeps_only_own_offerings() {
        let rows = vec![offering(1, 5, 1, 1), offering(2, 7, 2, 2), offering(3, 9, 2, 1)];
        let detail = RestaurantDetail::assemble(restaurant(1), rows, vec![pizza(1), pizza(2)]);

        let ids: Vec<i64> = detail.restaurant_pizzas.iter().map(|o| o.id.get()).collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(detail.restaurant_pizzas.iter().all(|o| o.restaurant_id == RestaurantId(1)));
        assert_eq!(detail.restaurant_pizzas[1].pizza, pizza(2));
    }

    #[test]
    fn test_detail_shape() {
        let detail = RestaurantDetail::assemble(restaurant(1), vec![offering(4, 12, 2, 1)], vec![pizza(2)]);

        assert_eq!(
            serde_json::to_value(&detail).unwrap(),
            json!({
                "id": 1,
                "name": "R1",
                "address": "Main St",
                "restaurant_pizzas": [{
                    "id": 4,
                    "pizza": {"id": 2, "name": "P2", "ingredients": "Dough, Cheese"},
                    "pizza_id": 2,
                    "price": 12,
                    "restaurant_id": 1
                }]
            })
        );
    }

    #[test]
    fn test_restaurant_pizza_detail_nests_bare_shapes() {
        let detail = RestaurantPizzaDetail::new(offering(1, 5, 1, 3), pizza(1), restaurant(3));
        let json = serde_json::to_value(&detail).unwrap();

        assert_eq!(json["pizza"], serde_json::to_value(pizza(1)).unwrap());
        assert_eq!(json["restaurant"], serde_json::to_value(restaurant(3)).unwrap());
        assert_eq!(json["price"], 5);
        assert_eq!(json["pizza_id"], 1);
        assert_eq!(json["restaurant_id"], 3);
    }

    #[test]
    fn test_key_order() {
        let detail = RestaurantPizzaDetail::new(offering(1, 5, 1, 3), pizza(1), restaurant(3));
        let text = serde_json::to_string(&detail).unwrap();

        let positions: Vec<usize> = ["\"pizza\"", "\"pizza_id\"", "\"price\"", "\"restaurant\"", "\"restaurant_id\""]
            .iter()
            .map(|key| text.find(key).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }
}
