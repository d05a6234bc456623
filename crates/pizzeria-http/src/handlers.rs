//! Request handling independent of the HTTP framework

use std::sync::Arc;

use pizzeria_core::{
    CreateRestaurantPizzaRequest, NewRestaurantPizza, Pizza, Restaurant, RestaurantDetail,
    RestaurantId, RestaurantPizzaDetail,
};
use pizzeria_storage::StorageBackend;

use crate::error::ApiError;

const RESTAURANT_NOT_FOUND: &str = "Restaurant not found";
const PIZZA_NOT_FOUND: &str = "Pizza not found";

/// Handler that serves the API operations from a storage backend
pub struct PizzaHandler<S: StorageBackend + ?Sized> {
    storage: Arc<S>,
}

impl<S: StorageBackend + ?Sized> PizzaHandler<S> {
    pub fn new(storage: Arc<S>) -> Self {
        Self { storage }
    }

    pub async fn is_healthy(&self) -> bool {
        match self.storage.health_check().await {
            Ok(healthy) => healthy,
            Err(e) => {
                tracing::warn!("Health check failed: {}", e);
                false
            }
        }
    }

    pub async fn list_restaurants(&self) -> Result<Vec<Restaurant>, ApiError> {
        let restaurants = self.storage.get_all_restaurants().await?;
        tracing::debug!("Listing {} restaurants", restaurants.len());
        Ok(restaurants)
    }

    pub async fn get_restaurant(&self, id: RestaurantId) -> Result<RestaurantDetail, ApiError> {
        self.storage
            .load_restaurant_detail(id)
            .await?
            .ok_or_else(|| ApiError::NotFound(RESTAURANT_NOT_FOUND.to_string()))
    }

    pub async fn delete_restaurant(&self, id: RestaurantId) -> Result<(), ApiError> {
        if !self.storage.delete_restaurant(id).await? {
            return Err(ApiError::NotFound(RESTAURANT_NOT_FOUND.to_string()));
        }
        tracing::info!("Deleted restaurant {}", id);
        Ok(())
    }

    pub async fn list_pizzas(&self) -> Result<Vec<Pizza>, ApiError> {
        Ok(self.storage.get_all_pizzas().await?)
    }

    /// Create a restaurant pizza.
    ///
    /// Checks run in order: required fields (all reported together), pizza
    /// exists, restaurant exists, then the price rule.
    pub async fn create_restaurant_pizza(
        &self,
        request: &CreateRestaurantPizzaRequest,
    ) -> Result<RestaurantPizzaDetail, ApiError> {
        let fields = request.require_fields().map_err(ApiError::Validation)?;

        let pizza = match fields.pizza_id() {
            Some(id) => self.storage.get_pizza(id).await?,
            None => None,
        };
        let Some(pizza) = pizza else {
            return Err(ApiError::MissingReference(PIZZA_NOT_FOUND.to_string()));
        };

        let restaurant = match fields.restaurant_id() {
            Some(id) => self.storage.get_restaurant(id).await?,
            None => None,
        };
        let Some(restaurant) = restaurant else {
            return Err(ApiError::MissingReference(RESTAURANT_NOT_FOUND.to_string()));
        };

        let (pizza_id, restaurant_id) = (pizza.id, restaurant.id);

        let price = fields
            .price()
            .map_err(|e| ApiError::Validation(vec![e.to_string()]))?;

        let new = NewRestaurantPizza::new(price, pizza_id, restaurant_id);
        match self.storage.create_restaurant_pizza_detail(&new).await {
            Ok(detail) => {
                tracing::info!(
                    "Restaurant {} now offers pizza {} at {}",
                    restaurant_id,
                    pizza_id,
                    price
                );
                Ok(detail)
            }
            Err(e) if e.is_not_found() => Err(ApiError::MissingReference(e.to_string())),
            Err(e) => {
                tracing::warn!("Rejected restaurant pizza write: {}", e);
                Err(ApiError::Validation(vec![e.to_string()]))
            }
        }
    }
}
