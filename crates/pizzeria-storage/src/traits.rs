//! Storage backend trait definitions

use crate::error::StorageResult;
use async_trait::async_trait;
use pizzeria_core::{
    NewPizza, NewRestaurant, NewRestaurantPizza, Pizza, PizzaId, Restaurant, RestaurantDetail,
    RestaurantId, RestaurantPizza, RestaurantPizzaDetail, RestaurantPizzaId,
};

/// Trait for storage backend implementations
///
/// Every mutation is atomic: it either commits in full before returning or
/// leaves the store untouched.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Initialize the storage (create tables, etc.)
    async fn initialize(&self) -> StorageResult<()>;

    /// Close the storage connection
    async fn close(&self) -> StorageResult<()>;

    /// Health check
    async fn health_check(&self) -> StorageResult<bool>;

    // ─────────────────────────────────────────────────────────────────────────
    // Restaurant Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Save a new restaurant, assigning its id
    async fn save_restaurant(&self, restaurant: &NewRestaurant) -> StorageResult<Restaurant>;

    /// Get a restaurant by id
    async fn get_restaurant(&self, id: RestaurantId) -> StorageResult<Option<Restaurant>>;

    /// Get all restaurants in id order
    async fn get_all_restaurants(&self) -> StorageResult<Vec<Restaurant>>;

    /// Delete a restaurant and every restaurant pizza referencing it.
    ///
    /// Returns `false` when no restaurant has this id.
    async fn delete_restaurant(&self, id: RestaurantId) -> StorageResult<bool>;

    // ─────────────────────────────────────────────────────────────────────────
    // Pizza Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Save a new pizza, assigning its id
    async fn save_pizza(&self, pizza: &NewPizza) -> StorageResult<Pizza>;

    /// Get a pizza by id
    async fn get_pizza(&self, id: PizzaId) -> StorageResult<Option<Pizza>>;

    /// Get all pizzas in id order
    async fn get_all_pizzas(&self) -> StorageResult<Vec<Pizza>>;

    /// Delete a pizza and every restaurant pizza referencing it
    async fn delete_pizza(&self, id: PizzaId) -> StorageResult<bool>;

    // ─────────────────────────────────────────────────────────────────────────
    // RestaurantPizza Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Create a restaurant pizza.
    ///
    /// Fails with `PizzaNotFound` / `RestaurantNotFound` when a foreign id
    /// does not resolve, and re-checks the price rule before writing.
    async fn create_restaurant_pizza(
        &self,
        restaurant_pizza: &NewRestaurantPizza,
    ) -> StorageResult<RestaurantPizza>;

    /// Get a restaurant pizza by id
    async fn get_restaurant_pizza(
        &self,
        id: RestaurantPizzaId,
    ) -> StorageResult<Option<RestaurantPizza>>;

    /// Get the restaurant pizzas of one restaurant in id order
    async fn get_restaurant_pizzas_for_restaurant(
        &self,
        restaurant_id: RestaurantId,
    ) -> StorageResult<Vec<RestaurantPizza>>;

    /// Get all restaurant pizzas in id order
    async fn get_all_restaurant_pizzas(&self) -> StorageResult<Vec<RestaurantPizza>>;

    // ─────────────────────────────────────────────────────────────────────────
    // Composed Reads
    // ─────────────────────────────────────────────────────────────────────────
    //
    // The defaults issue one call per row, so a concurrent delete can land
    // between them. Backends override these to read under a single lock or
    // transaction.

    /// Load a restaurant together with its offerings
    async fn load_restaurant_detail(
        &self,
        id: RestaurantId,
    ) -> StorageResult<Option<RestaurantDetail>> {
        let Some(restaurant) = self.get_restaurant(id).await? else {
            return Ok(None);
        };

        let restaurant_pizzas = self.get_restaurant_pizzas_for_restaurant(id).await?;
        let mut pizzas = Vec::with_capacity(restaurant_pizzas.len());
        for rp in &restaurant_pizzas {
            if let Some(pizza) = self.get_pizza(rp.pizza_id).await? {
                pizzas.push(pizza);
            }
        }

        Ok(Some(RestaurantDetail::assemble(restaurant, restaurant_pizzas, pizzas)))
    }

    /// Load a restaurant pizza with its pizza and restaurant
    async fn load_restaurant_pizza_detail(
        &self,
        id: RestaurantPizzaId,
    ) -> StorageResult<Option<RestaurantPizzaDetail>> {
        let Some(rp) = self.get_restaurant_pizza(id).await? else {
            return Ok(None);
        };

        let pizza = self.get_pizza(rp.pizza_id).await?;
        let restaurant = self.get_restaurant(rp.restaurant_id).await?;

        Ok(match (pizza, restaurant) {
            (Some(pizza), Some(restaurant)) => {
                Some(RestaurantPizzaDetail::new(rp, pizza, restaurant))
            }
            _ => None,
        })
    }

    /// Create a restaurant pizza and return it fully resolved
    async fn create_restaurant_pizza_detail(
        &self,
        restaurant_pizza: &NewRestaurantPizza,
    ) -> StorageResult<RestaurantPizzaDetail> {
        let created = self.create_restaurant_pizza(restaurant_pizza).await?;
        self.load_restaurant_pizza_detail(created.id)
            .await?
            .ok_or_else(|| {
                crate::StorageError::Transaction(format!(
                    "Restaurant pizza {} vanished after commit",
                    created.id
                ))
            })
    }
}
