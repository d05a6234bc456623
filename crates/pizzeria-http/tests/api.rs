use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use async_trait::async_trait;
use axum::Router;
use pizzeria_core::{
    NewPizza, NewRestaurant, NewRestaurantPizza, Pizza, PizzaId, Restaurant, RestaurantId,
    RestaurantPizza, RestaurantPizzaId,
};
use pizzeria_http::{create_router, PizzaHandler};
use pizzeria_storage::{MemoryStorage, SqliteStorage, StorageBackend, StorageError, StorageResult};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn seed(storage: &dyn StorageBackend) {
    for (name, address) in [
        ("Karen's Pizza Shack", "address1"),
        ("Sanjay's Pizza", "address2"),
        ("Kiki's Pizza", "address3"),
    ] {
        storage
            .save_restaurant(&NewRestaurant::new(name, address))
            .await
            .unwrap();
    }
    for (name, ingredients) in [
        ("Emma", "Dough, Tomato Sauce, Cheese"),
        ("Geri", "Dough, Tomato Sauce, Cheese, Pepperoni"),
        ("Melanie", "Dough, Sauce, Ricotta, Red peppers, Mustard"),
    ] {
        storage
            .save_pizza(&NewPizza::new(name, ingredients))
            .await
            .unwrap();
    }
}

async fn app_with(storage: Arc<dyn StorageBackend>) -> Router {
    seed(storage.as_ref()).await;
    create_router(Arc::new(PizzaHandler::new(storage)))
}

async fn app() -> Router {
    app_with(Arc::new(MemoryStorage::new())).await
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn test_home() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Pizza API"}));
}

#[tokio::test]
async fn test_health() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["server"], "pizzeria");
}

#[tokio::test]
async fn test_list_restaurants_bare() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/restaurants", None).await;
    assert_eq!(status, StatusCode::OK);

    let restaurants = body.as_array().unwrap();
    assert_eq!(restaurants.len(), 3);
    assert_eq!(
        restaurants[0],
        json!({"id": 1, "name": "Karen's Pizza Shack", "address": "address1"})
    );
    assert!(restaurants.iter().all(|r| r.get("restaurant_pizzas").is_none()));
}

#[tokio::test]
async fn test_list_pizzas_bare() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/pizzas", None).await;
    assert_eq!(status, StatusCode::OK);

    let pizzas = body.as_array().unwrap();
    assert_eq!(pizzas.len(), 3);
    assert_eq!(
        pizzas[1],
        json!({"id": 2, "name": "Geri", "ingredients": "Dough, Tomato Sauce, Cheese, Pepperoni"})
    );
}

#[tokio::test]
async fn test_get_restaurant_with_pizzas() {
    let app = app().await;
    send(&app, Method::POST, "/restaurant_pizzas", Some(json!({"price": 5, "pizza_id": 1, "restaurant_id": 1}))).await;
    send(&app, Method::POST, "/restaurant_pizzas", Some(json!({"price": 9, "pizza_id": 2, "restaurant_id": 2}))).await;
    send(&app, Method::POST, "/restaurant_pizzas", Some(json!({"price": 7, "pizza_id": 3, "restaurant_id": 1}))).await;

    let (status, body) = send(&app, Method::GET, "/restaurants/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Karen's Pizza Shack");

    let offerings = body["restaurant_pizzas"].as_array().unwrap();
    assert_eq!(offerings.len(), 2);
    assert!(offerings.iter().all(|o| o["restaurant_id"] == 1));
    assert_eq!(
        offerings[0],
        json!({
            "id": 1,
            "pizza": {"id": 1, "name": "Emma", "ingredients": "Dough, Tomato Sauce, Cheese"},
            "pizza_id": 1,
            "price": 5,
            "restaurant_id": 1
        })
    );
}

#[tokio::test]
async fn test_get_missing_restaurant() {
    let app = app().await;
    for uri in ["/restaurants/999", "/restaurants/abc"] {
        let (status, body) = send(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "Restaurant not found"}));
    }
}

#[tokio::test]
async fn test_delete_restaurant() {
    let app = app().await;
    send(&app, Method::POST, "/restaurant_pizzas", Some(json!({"price": 5, "pizza_id": 1, "restaurant_id": 1}))).await;

    let (status, body) = send(&app, Method::DELETE, "/restaurants/1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, body) = send(&app, Method::GET, "/restaurants/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Restaurant not found"}));

    let (_, body) = send(&app, Method::GET, "/restaurants", None).await;
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_delete_missing_restaurant() {
    let app = app().await;
    let (status, body) = send(&app, Method::DELETE, "/restaurants/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Restaurant not found"}));
}

#[tokio::test]
async fn test_create_restaurant_pizza() {
    let app = app().await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/restaurant_pizzas",
        Some(json!({"price": 5, "pizza_id": 1, "restaurant_id": 3})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        body,
        json!({
            "id": 1,
            "pizza": {"id": 1, "name": "Emma", "ingredients": "Dough, Tomato Sauce, Cheese"},
            "pizza_id": 1,
            "price": 5,
            "restaurant": {"id": 3, "name": "Kiki's Pizza", "address": "address3"},
            "restaurant_id": 3
        })
    );
}

#[tokio::test]
async fn test_create_price_out_of_range() {
    let app = app().await;
    for price in [0, 31, 35, -1] {
        let (status, body) = send(
            &app,
            Method::POST,
            "/restaurant_pizzas",
            Some(json!({"price": price, "pizza_id": 1, "restaurant_id": 1})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body, json!({"errors": ["Price must be between 1 and 30"]}));
    }

    let (_, body) = send(&app, Method::GET, "/restaurants/1", None).await;
    assert!(body["restaurant_pizzas"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_create_price_in_range() {
    let app = app().await;
    for price in 1..=30 {
        let (status, body) = send(
            &app,
            Method::POST,
            "/restaurant_pizzas",
            Some(json!({"price": price, "pizza_id": 2, "restaurant_id": 2})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["price"], price);
    }
}

#[tokio::test]
async fn test_create_price_not_integer() {
    let app = app().await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/restaurant_pizzas",
        Some(json!({"price": "cheap", "pizza_id": 1, "restaurant_id": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body, json!({"errors": ["Price must be an integer"]}));
}

#[tokio::test]
async fn test_create_missing_price() {
    let app = app().await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/restaurant_pizzas",
        Some(json!({"pizza_id": 1, "restaurant_id": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["errors"]
        .as_array()
        .unwrap()
        .contains(&json!("Price is required")));
}

#[tokio::test]
async fn test_create_empty_body_collects_all_errors() {
    let app = app().await;
    let (status, body) = send(&app, Method::POST, "/restaurant_pizzas", Some(json!({}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body,
        json!({"errors": ["Price is required", "pizza_id is required", "restaurant_id is required"]})
    );

    let (status, _) = send(&app, Method::POST, "/restaurant_pizzas", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_create_unknown_pizza() {
    let app = app().await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/restaurant_pizzas",
        Some(json!({"price": 5, "pizza_id": 999, "restaurant_id": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"errors": ["Pizza not found"]}));
}

#[tokio::test]
async fn test_create_unknown_restaurant_checked_before_price() {
    let app = app().await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/restaurant_pizzas",
        Some(json!({"price": 35, "pizza_id": 1, "restaurant_id": 999})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"errors": ["Restaurant not found"]}));
}

#[tokio::test]
async fn test_sqlite_backend_cascade() {
    let app = app_with(Arc::new(SqliteStorage::in_memory().unwrap())).await;

    let (status, created) = send(
        &app,
        Method::POST,
        "/restaurant_pizzas",
        Some(json!({"price": 12, "pizza_id": 3, "restaurant_id": 2})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["restaurant"]["name"], "Sanjay's Pizza");

    let (status, _) = send(&app, Method::DELETE, "/restaurants/2", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, Method::GET, "/restaurants/2", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

/// Memory store whose restaurant pizza writes fail at commit time
struct FailingCommit(MemoryStorage);

#[async_trait]
impl StorageBackend for FailingCommit {
    async fn initialize(&self) -> StorageResult<()> {
        self.0.initialize().await
    }

    async fn close(&self) -> StorageResult<()> {
        self.0.close().await
    }

    async fn health_check(&self) -> StorageResult<bool> {
        self.0.health_check().await
    }

    async fn save_restaurant(&self, restaurant: &NewRestaurant) -> StorageResult<Restaurant> {
        self.0.save_restaurant(restaurant).await
    }

    async fn get_restaurant(&self, id: RestaurantId) -> StorageResult<Option<Restaurant>> {
        self.0.get_restaurant(id).await
    }

    async fn get_all_restaurants(&self) -> StorageResult<Vec<Restaurant>> {
        self.0.get_all_restaurants().await
    }

    async fn delete_restaurant(&self, id: RestaurantId) -> StorageResult<bool> {
        self.0.delete_restaurant(id).await
    }

    async fn save_pizza(&self, pizza: &NewPizza) -> StorageResult<Pizza> {
        self.0.save_pizza(pizza).await
    }

    async fn get_pizza(&self, id: PizzaId) -> StorageResult<Option<Pizza>> {
        self.0.get_pizza(id).await
    }

    async fn get_all_pizzas(&self) -> StorageResult<Vec<Pizza>> {
        self.0.get_all_pizzas().await
    }

    async fn delete_pizza(&self, id: PizzaId) -> StorageResult<bool> {
        self.0.delete_pizza(id).await
    }

    async fn create_restaurant_pizza(
        &self,
        _restaurant_pizza: &NewRestaurantPizza,
    ) -> StorageResult<RestaurantPizza> {
        Err(StorageError::Database("disk I/O error".to_string()))
    }

    async fn get_restaurant_pizza(
        &self,
        id: RestaurantPizzaId,
    ) -> StorageResult<Option<RestaurantPizza>> {
        self.0.get_restaurant_pizza(id).await
    }

    async fn get_restaurant_pizzas_for_restaurant(
        &self,
        restaurant_id: RestaurantId,
    ) -> StorageResult<Vec<RestaurantPizza>> {
        self.0.get_restaurant_pizzas_for_restaurant(restaurant_id).await
    }

    async fn get_all_restaurant_pizzas(&self) -> StorageResult<Vec<RestaurantPizza>> {
        self.0.get_all_restaurant_pizzas().await
    }
}

#[tokio::test]
async fn test_failed_commit_is_unprocessable() {
    let storage = Arc::new(FailingCommit(MemoryStorage::new()));
    let app = app_with(storage.clone()).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/restaurant_pizzas",
        Some(json!({"price": 5, "pizza_id": 1, "restaurant_id": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body, json!({"errors": ["Database error: disk I/O error"]}));

    assert!(storage.get_all_restaurant_pizzas().await.unwrap().is_empty());
    let (status, body) = send(&app, Method::GET, "/restaurants/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["restaurant_pizzas"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_boolean_price_follows_integer_conversion() {
    let app = app().await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/restaurant_pizzas",
        Some(json!({"price": true, "pizza_id": 1, "restaurant_id": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["price"], 1);

    let (status, body) = send(
        &app,
        Method::POST,
        "/restaurant_pizzas",
        Some(json!({"price": false, "pizza_id": 1, "restaurant_id": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body, json!({"errors": ["Price must be between 1 and 30"]}));
}
