//! In-memory storage backend
//!
//! Tables are id-keyed maps; restaurant pizzas refer to restaurants and
//! pizzas by id only. All tables sit behind a single lock, so a cascade
//! delete is never observable half done.

use crate::error::{StorageError, StorageResult};
use crate::traits::StorageBackend;
use async_trait::async_trait;
use pizzeria_core::{
    Error, NewPizza, NewRestaurant, NewRestaurantPizza, Pizza, PizzaId, Price, Restaurant,
    RestaurantDetail, RestaurantId, RestaurantPizza, RestaurantPizzaDetail, RestaurantPizzaId,
};
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Default)]
struct Tables {
    restaurants: BTreeMap<RestaurantId, Restaurant>,
    pizzas: BTreeMap<PizzaId, Pizza>,
    restaurant_pizzas: BTreeMap<RestaurantPizzaId, RestaurantPizza>,
    last_restaurant_id: i64,
    last_pizza_id: i64,
    last_restaurant_pizza_id: i64,
}

impl Tables {
    fn insert_restaurant_pizza(
        &mut self,
        restaurant_pizza: &NewRestaurantPizza,
    ) -> StorageResult<RestaurantPizza> {
        if !self.pizzas.contains_key(&restaurant_pizza.pizza_id) {
            return Err(Error::PizzaNotFound.into());
        }
        if !self.restaurants.contains_key(&restaurant_pizza.restaurant_id) {
            return Err(Error::RestaurantNotFound.into());
        }

        self.last_restaurant_pizza_id += 1;
        let saved = RestaurantPizza::new(
            RestaurantPizzaId(self.last_restaurant_pizza_id),
            *restaurant_pizza,
        );
        self.restaurant_pizzas.insert(saved.id, saved.clone());
        Ok(saved)
    }

    fn restaurant_detail(&self, id: RestaurantId) -> Option<RestaurantDetail> {
        let restaurant = self.restaurants.get(&id)?.clone();
        let offerings: Vec<RestaurantPizza> = self
            .restaurant_pizzas
            .values()
            .filter(|rp| rp.restaurant_id == id)
            .cloned()
            .collect();
        let pizzas: Vec<Pizza> = offerings
            .iter()
            .filter_map(|rp| self.pizzas.get(&rp.pizza_id).cloned())
            .collect();

        Some(RestaurantDetail::assemble(restaurant, offerings, pizzas))
    }

    fn restaurant_pizza_detail(&self, id: RestaurantPizzaId) -> Option<RestaurantPizzaDetail> {
        let rp = self.restaurant_pizzas.get(&id)?;
        let pizza = self.pizzas.get(&rp.pizza_id)?;
        let restaurant = self.restaurants.get(&rp.restaurant_id)?;
        Some(RestaurantPizzaDetail::new(rp.clone(), pizza.clone(), restaurant.clone()))
    }
}

/// In-memory storage backend
///
/// Useful for testing and temporary storage. Ids start at 1 and are
/// never reused.
pub struct MemoryStorage {
    tables: RwLock<Tables>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
        }
    }

    fn read(&self) -> StorageResult<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|e| StorageError::Database(format!("Lock error: {}", e)))
    }

    fn write(&self) -> StorageResult<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|e| StorageError::Database(format!("Lock error: {}", e)))
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StorageBackend for MemoryStorage {
    async fn initialize(&self) -> StorageResult<()> {
        Ok(())
    }

    async fn close(&self) -> StorageResult<()> {
        Ok(())
    }

    async fn health_check(&self) -> StorageResult<bool> {
        Ok(self.read().is_ok())
    }

    // Restaurant operations

    async fn save_restaurant(&self, restaurant: &NewRestaurant) -> StorageResult<Restaurant> {
        restaurant.validate()?;

        let mut tables = self.write()?;
        tables.last_restaurant_id += 1;
        let saved = Restaurant::new(RestaurantId(tables.last_restaurant_id), restaurant.clone());
        tables.restaurants.insert(saved.id, saved.clone());
        Ok(saved)
    }

    async fn get_restaurant(&self, id: RestaurantId) -> StorageResult<Option<Restaurant>> {
        Ok(self.read()?.restaurants.get(&id).cloned())
    }

    async fn get_all_restaurants(&self) -> StorageResult<Vec<Restaurant>> {
        Ok(self.read()?.restaurants.values().cloned().collect())
    }

    async fn delete_restaurant(&self, id: RestaurantId) -> StorageResult<bool> {
        let mut tables = self.write()?;
        if tables.restaurants.remove(&id).is_none() {
            return Ok(false);
        }
        tables.restaurant_pizzas.retain(|_, rp| rp.restaurant_id != id);
        Ok(true)
    }

    // Pizza operations

    async fn save_pizza(&self, pizza: &NewPizza) -> StorageResult<Pizza> {
        pizza.validate()?;

        let mut tables = self.write()?;
        tables.last_pizza_id += 1;
        let saved = Pizza::new(PizzaId(tables.last_pizza_id), pizza.clone());
        tables.pizzas.insert(saved.id, saved.clone());
        Ok(saved)
    }

    async fn get_pizza(&self, id: PizzaId) -> StorageResult<Option<Pizza>> {
        Ok(self.read()?.pizzas.get(&id).cloned())
    }

    async fn get_all_pizzas(&self) -> StorageResult<Vec<Pizza>> {
        Ok(self.read()?.pizzas.values().cloned().collect())
    }

    async fn delete_pizza(&self, id: PizzaId) -> StorageResult<bool> {
        let mut tables = self.write()?;
        if tables.pizzas.remove(&id).is_none() {
            return Ok(false);
        }
        tables.restaurant_pizzas.retain(|_, rp| rp.pizza_id != id);
        Ok(true)
    }

    // RestaurantPizza operations

    async fn create_restaurant_pizza(
        &self,
        restaurant_pizza: &NewRestaurantPizza,
    ) -> StorageResult<RestaurantPizza> {
        Price::new(restaurant_pizza.price.get())?;
        self.write()?.insert_restaurant_pizza(restaurant_pizza)
    }

    async fn get_restaurant_pizza(
        &self,
        id: RestaurantPizzaId,
    ) -> StorageResult<Option<RestaurantPizza>> {
        Ok(self.read()?.restaurant_pizzas.get(&id).cloned())
    }

    async fn get_restaurant_pizzas_for_restaurant(
        &self,
        restaurant_id: RestaurantId,
    ) -> StorageResult<Vec<RestaurantPizza>> {
        Ok(self
            .read()?
            .restaurant_pizzas
            .values()
            .filter(|rp| rp.restaurant_id == restaurant_id)
            .cloned()
            .collect())
    }

    async fn get_all_restaurant_pizzas(&self) -> StorageResult<Vec<RestaurantPizza>> {
        Ok(self.read()?.restaurant_pizzas.values().cloned().collect())
    }

    // Composed reads, each under one guard

    async fn load_restaurant_detail(
        &self,
        id: RestaurantId,
    ) -> StorageResult<Option<RestaurantDetail>> {
        Ok(self.read()?.restaurant_detail(id))
    }

    async fn load_restaurant_pizza_detail(
        &self,
        id: RestaurantPizzaId,
    ) -> StorageResult<Option<RestaurantPizzaDetail>> {
        Ok(self.read()?.restaurant_pizza_detail(id))
    }

    async fn create_restaurant_pizza_detail(
        &self,
        restaurant_pizza: &NewRestaurantPizza,
    ) -> StorageResult<RestaurantPizzaDetail> {
        Price::new(restaurant_pizza.price.get())?;

        let mut tables = self.write()?;
        let created = tables.insert_restaurant_pizza(restaurant_pizza)?;
        tables.restaurant_pizza_detail(created.id).ok_or_else(|| {
            StorageError::Transaction(format!("Restaurant pizza {} has no detail", created.id))
        })
    }
}
