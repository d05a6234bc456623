//! SQLite storage backend

use crate::error::{StorageError, StorageResult};
use crate::migration::Migratable;
use crate::traits::StorageBackend;
use async_trait::async_trait;
use pizzeria_core::{
    Error, NewPizza, NewRestaurant, NewRestaurantPizza, Pizza, PizzaId, Price, Restaurant,
    RestaurantDetail, RestaurantId, RestaurantPizza, RestaurantPizzaDetail, RestaurantPizzaId,
};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

const RESTAURANT_COLUMNS: &str = "id, name, address";
const PIZZA_COLUMNS: &str = "id, name, ingredients";
const RESTAURANT_PIZZA_COLUMNS: &str = "id, price, pizza_id, restaurant_id";

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Mutex<Connection>,
}

impl SqliteStorage {
    /// Open or create a SQLite database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref();
        tracing::debug!("Opening SQLite database at {:?}", path);
        let conn = Connection::open(path).map_err(|e| StorageError::Connection(e.to_string()))?;
        Self::from_connection(conn)
    }

    /// Create an in-memory SQLite database (for testing)
    pub fn in_memory() -> StorageResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| StorageError::Connection(e.to_string()))?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> StorageResult<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        let storage = Self {
            conn: Mutex::new(conn),
        };
        storage.migrate_to_latest()?;

        Ok(storage)
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| StorageError::Database(format!("Lock error: {}", e)))
    }
}

fn restaurant_from_row(row: &Row<'_>) -> rusqlite::Result<Restaurant> {
    Ok(Restaurant {
        id: RestaurantId(row.get(0)?),
        name: row.get(1)?,
        address: row.get(2)?,
    })
}

fn pizza_from_row(row: &Row<'_>) -> rusqlite::Result<Pizza> {
    Ok(Pizza {
        id: PizzaId(row.get(0)?),
        name: row.get(1)?,
        ingredients: row.get(2)?,
    })
}

fn restaurant_pizza_from_row(row: &Row<'_>) -> rusqlite::Result<RestaurantPizza> {
    let price = Price::new(row.get(1)?)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(1, Type::Integer, Box::new(e)))?;

    Ok(RestaurantPizza {
        id: RestaurantPizzaId(row.get(0)?),
        price,
        pizza_id: PizzaId(row.get(2)?),
        restaurant_id: RestaurantId(row.get(3)?),
    })
}

fn select_restaurant(conn: &Connection, id: RestaurantId) -> rusqlite::Result<Option<Restaurant>> {
    conn.query_row(
        &format!("SELECT {} FROM restaurants WHERE id = ?1", RESTAURANT_COLUMNS),
        params![id.get()],
        restaurant_from_row,
    )
    .optional()
}

fn select_pizza(conn: &Connection, id: PizzaId) -> rusqlite::Result<Option<Pizza>> {
    conn.query_row(
        &format!("SELECT {} FROM pizzas WHERE id = ?1", PIZZA_COLUMNS),
        params![id.get()],
        pizza_from_row,
    )
    .optional()
}

fn select_restaurant_pizza(
    conn: &Connection,
    id: RestaurantPizzaId,
) -> rusqlite::Result<Option<RestaurantPizza>> {
    conn.query_row(
        &format!(
            "SELECT {} FROM restaurant_pizzas WHERE id = ?1",
            RESTAURANT_PIZZA_COLUMNS
        ),
        params![id.get()],
        restaurant_pizza_from_row,
    )
    .optional()
}

fn select_offerings(
    conn: &Connection,
    restaurant_id: RestaurantId,
) -> rusqlite::Result<Vec<RestaurantPizza>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM restaurant_pizzas WHERE restaurant_id = ?1 ORDER BY id",
        RESTAURANT_PIZZA_COLUMNS
    ))?;
    let rows: rusqlite::Result<Vec<_>> = stmt
        .query_map(params![restaurant_id.get()], restaurant_pizza_from_row)?
        .collect();
    rows
}

fn select_restaurant_detail(
    conn: &Connection,
    id: RestaurantId,
) -> rusqlite::Result<Option<RestaurantDetail>> {
    let Some(restaurant) = select_restaurant(conn, id)? else {
        return Ok(None);
    };

    let offerings = select_offerings(conn, id)?;
    let mut pizzas = Vec::with_capacity(offerings.len());
    for rp in &offerings {
        if let Some(pizza) = select_pizza(conn, rp.pizza_id)? {
            pizzas.push(pizza);
        }
    }

    Ok(Some(RestaurantDetail::assemble(restaurant, offerings, pizzas)))
}

fn select_restaurant_pizza_detail(
    conn: &Connection,
    id: RestaurantPizzaId,
) -> rusqlite::Result<Option<RestaurantPizzaDetail>> {
    let Some(rp) = select_restaurant_pizza(conn, id)? else {
        return Ok(None);
    };

    let pizza = select_pizza(conn, rp.pizza_id)?;
    let restaurant = select_restaurant(conn, rp.restaurant_id)?;
    Ok(match (pizza, restaurant) {
        (Some(pizza), Some(restaurant)) => Some(RestaurantPizzaDetail::new(rp, pizza, restaurant)),
        _ => None,
    })
}

/// Check both references and insert; the caller owns the transaction
fn insert_restaurant_pizza(
    conn: &Connection,
    restaurant_pizza: &NewRestaurantPizza,
) -> StorageResult<RestaurantPizza> {
    let pizza_exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM pizzas WHERE id = ?1)",
        params![restaurant_pizza.pizza_id.get()],
        |row| row.get(0),
    )?;
    if !pizza_exists {
        return Err(Error::PizzaNotFound.into());
    }

    let restaurant_exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM restaurants WHERE id = ?1)",
        params![restaurant_pizza.restaurant_id.get()],
        |row| row.get(0),
    )?;
    if !restaurant_exists {
        return Err(Error::RestaurantNotFound.into());
    }

    conn.execute(
        "INSERT INTO restaurant_pizzas (price, pizza_id, restaurant_id) VALUES (?1, ?2, ?3)",
        params![
            restaurant_pizza.price.get(),
            restaurant_pizza.pizza_id.get(),
            restaurant_pizza.restaurant_id.get()
        ],
    )?;

    Ok(RestaurantPizza::new(
        RestaurantPizzaId(conn.last_insert_rowid()),
        *restaurant_pizza,
    ))
}

impl Migratable for SqliteStorage {
    fn get_schema_version(&self) -> StorageResult<u32> {
        let conn = self.lock()?;
        let version: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
        u32::try_from(version).map_err(|e| StorageError::Migration(e.to_string()))
    }

    fn set_schema_version(&self, version: u32) -> StorageResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(&format!("PRAGMA user_version = {};", version))?;
        Ok(())
    }

    fn run_migration(&self, version: u32) -> StorageResult<()> {
        let sql = match version {
            1 => {
                r#"
                CREATE TABLE IF NOT EXISTS restaurants (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    name TEXT NOT NULL,
                    address TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS pizzas (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    name TEXT NOT NULL,
                    ingredients TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS restaurant_pizzas (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    price INTEGER NOT NULL CHECK (price BETWEEN 1 AND 30),
                    pizza_id INTEGER NOT NULL REFERENCES pizzas(id),
                    restaurant_id INTEGER NOT NULL REFERENCES restaurants(id)
                );
                "#
            }
            2 => {
                r#"
                CREATE INDEX IF NOT EXISTS idx_restaurant_pizzas_restaurant
                    ON restaurant_pizzas(restaurant_id);
                CREATE INDEX IF NOT EXISTS idx_restaurant_pizzas_pizza
                    ON restaurant_pizzas(pizza_id);
                "#
            }
            other => {
                return Err(StorageError::Migration(format!(
                    "Unknown schema version {}",
                    other
                )))
            }
        };

        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        tx.execute_batch(sql)?;
        tx.commit()?;
        Ok(())
    }
}

#[async_trait]
impl StorageBackend for SqliteStorage {
    async fn initialize(&self) -> StorageResult<()> {
        Ok(())
    }

    async fn close(&self) -> StorageResult<()> {
        Ok(())
    }

    async fn health_check(&self) -> StorageResult<bool> {
        let conn = self.lock()?;
        let one: i64 = conn.query_row("SELECT 1", [], |row| row.get(0))?;
        Ok(one == 1)
    }

    async fn save_restaurant(&self, restaurant: &NewRestaurant) -> StorageResult<Restaurant> {
        restaurant.validate()?;

        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO restaurants (name, address) VALUES (?1, ?2)",
            params![restaurant.name, restaurant.address],
        )?;
        let id = RestaurantId(conn.last_insert_rowid());

        Ok(Restaurant::new(id, restaurant.clone()))
    }

    async fn get_restaurant(&self, id: RestaurantId) -> StorageResult<Option<Restaurant>> {
        let conn = self.lock()?;
        Ok(select_restaurant(&conn, id)?)
    }

    async fn get_all_restaurants(&self) -> StorageResult<Vec<Restaurant>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM restaurants ORDER BY id",
            RESTAURANT_COLUMNS
        ))?;
        let restaurants = stmt
            .query_map([], restaurant_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(restaurants)
    }

    async fn delete_restaurant(&self, id: RestaurantId) -> StorageResult<bool> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        let offerings = tx.execute(
            "DELETE FROM restaurant_pizzas WHERE restaurant_id = ?1",
            params![id.get()],
        )?;
        let deleted = tx.execute("DELETE FROM restaurants WHERE id = ?1", params![id.get()])?;
        if deleted == 0 {
            return Ok(false);
        }

        tx.commit()?;
        tracing::debug!("Deleted restaurant {} and {} restaurant pizzas", id, offerings);
        Ok(true)
    }

    async fn save_pizza(&self, pizza: &NewPizza) -> StorageResult<Pizza> {
        pizza.validate()?;

        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO pizzas (name, ingredients) VALUES (?1, ?2)",
            params![pizza.name, pizza.ingredients],
        )?;
        let id = PizzaId(conn.last_insert_rowid());

        Ok(Pizza::new(id, pizza.clone()))
    }

    async fn get_pizza(&self, id: PizzaId) -> StorageResult<Option<Pizza>> {
        let conn = self.lock()?;
        Ok(select_pizza(&conn, id)?)
    }

    async fn get_all_pizzas(&self) -> StorageResult<Vec<Pizza>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!("SELECT {} FROM pizzas ORDER BY id", PIZZA_COLUMNS))?;
        let pizzas = stmt
            .query_map([], pizza_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(pizzas)
    }

    async fn delete_pizza(&self, id: PizzaId) -> StorageResult<bool> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        let offerings = tx.execute(
            "DELETE FROM restaurant_pizzas WHERE pizza_id = ?1",
            params![id.get()],
        )?;
        let deleted = tx.execute("DELETE FROM pizzas WHERE id = ?1", params![id.get()])?;
        if deleted == 0 {
            return Ok(false);
        }

        tx.commit()?;
        tracing::debug!("Deleted pizza {} and {} restaurant pizzas", id, offerings);
        Ok(true)
    }

    async fn create_restaurant_pizza(
        &self,
        restaurant_pizza: &NewRestaurantPizza,
    ) -> StorageResult<RestaurantPizza> {
        Price::new(restaurant_pizza.price.get())?;

        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let created = insert_restaurant_pizza(&tx, restaurant_pizza)?;
        tx.commit()?;

        Ok(created)
    }

    async fn get_restaurant_pizza(
        &self,
        id: RestaurantPizzaId,
    ) -> StorageResult<Option<RestaurantPizza>> {
        let conn = self.lock()?;
        Ok(select_restaurant_pizza(&conn, id)?)
    }

    async fn get_restaurant_pizzas_for_restaurant(
        &self,
        restaurant_id: RestaurantId,
    ) -> StorageResult<Vec<RestaurantPizza>> {
        let conn = self.lock()?;
        Ok(select_offerings(&conn, restaurant_id)?)
    }

    async fn get_all_restaurant_pizzas(&self) -> StorageResult<Vec<RestaurantPizza>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM restaurant_pizzas ORDER BY id",
            RESTAURANT_PIZZA_COLUMNS
        ))?;
        let restaurant_pizzas = stmt
            .query_map([], restaurant_pizza_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(restaurant_pizzas)
    }

    // Composed reads, each inside one transaction

    async fn load_restaurant_detail(
        &self,
        id: RestaurantId,
    ) -> StorageResult<Option<RestaurantDetail>> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let detail = select_restaurant_detail(&tx, id)?;
        tx.commit()?;
        Ok(detail)
    }

    async fn load_restaurant_pizza_detail(
        &self,
        id: RestaurantPizzaId,
    ) -> StorageResult<Option<RestaurantPizzaDetail>> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let detail = select_restaurant_pizza_detail(&tx, id)?;
        tx.commit()?;
        Ok(detail)
    }

    async fn create_restaurant_pizza_detail(
        &self,
        restaurant_pizza: &NewRestaurantPizza,
    ) -> StorageResult<RestaurantPizzaDetail> {
        Price::new(restaurant_pizza.price.get())?;

        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let created = insert_restaurant_pizza(&tx, restaurant_pizza)?;
        let detail = select_restaurant_pizza_detail(&tx, created.id)?.ok_or_else(|| {
            StorageError::Transaction(format!("Restaurant pizza {} has no detail", created.id))
        })?;
        tx.commit()?;

        tracing::debug!("Created restaurant pizza {}", detail.id);
        Ok(detail)
    }
}
