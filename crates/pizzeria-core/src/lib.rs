//! Pizzeria Core - Data model for the Pizza API
//!
//! This crate provides the entity types, the validation rules shared by
//! the request layer and the storage layer, and the response shapes
//! rendered by the HTTP layer.

pub mod error;
pub mod offering;
pub mod pizza;
pub mod price;
pub mod request;
pub mod restaurant;
pub mod validation;
pub mod view;

pub use error::{Error, Result};
pub use offering::{NewRestaurantPizza, RestaurantPizza, RestaurantPizzaId};
pub use pizza::{NewPizza, Pizza, PizzaId};
pub use price::{validate_price, Price, PriceError, MAX_PRICE, MIN_PRICE};
pub use request::{CreateRestaurantPizzaRequest, RequiredFields};
pub use restaurant::{NewRestaurant, Restaurant, RestaurantId};
pub use validation::ValidationError;
pub use view::{PizzaOffering, RestaurantDetail, RestaurantPizzaDetail};
