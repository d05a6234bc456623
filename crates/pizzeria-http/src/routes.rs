//! Axum router and server for the Pizza API

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use pizzeria_core::{CreateRestaurantPizzaRequest, RestaurantId};
use pizzeria_storage::StorageBackend;
use serde::Serialize;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;

use crate::error::ApiError;
use crate::handlers::PizzaHandler;

/// Maximum request body size (1MB)
const MAX_BODY_SIZE: usize = 1024 * 1024;

/// Create the API router
pub fn create_router<S: StorageBackend + ?Sized + 'static>(handler: Arc<PizzaHandler<S>>) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/health", get(health_handler::<S>))
        .route("/restaurants", get(list_restaurants::<S>))
        .route(
            "/restaurants/:id",
            get(get_restaurant::<S>).delete(delete_restaurant::<S>),
        )
        .route("/pizzas", get(list_pizzas::<S>))
        .route("/restaurant_pizzas", post(create_restaurant_pizza::<S>))
        .with_state(handler)
        .layer(CorsLayer::permissive())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
}

/// Path ids that are not integers can never name a restaurant
fn restaurant_id(raw: &str) -> Result<RestaurantId, ApiError> {
    raw.parse::<i64>()
        .map(RestaurantId)
        .map_err(|_| ApiError::NotFound("Restaurant not found".to_string()))
}

async fn home() -> impl IntoResponse {
    Json(json!({ "message": "Pizza API" }))
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    server: &'static str,
    version: &'static str,
}

/// Health check endpoint
async fn health_handler<S: StorageBackend + ?Sized + 'static>(
    State(handler): State<Arc<PizzaHandler<S>>>,
) -> Response {
    let healthy = handler.is_healthy().await;
    let body = Json(HealthResponse {
        status: if healthy { "ok" } else { "unavailable" },
        server: "pizzeria",
        version: env!("CARGO_PKG_VERSION"),
    });

    if healthy {
        body.into_response()
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, body).into_response()
    }
}

async fn list_restaurants<S: StorageBackend + ?Sized + 'static>(
    State(handler): State<Arc<PizzaHandler<S>>>,
) -> Result<Response, ApiError> {
    tracing::debug!("GET /restaurants");
    Ok(Json(handler.list_restaurants().await?).into_response())
}

async fn get_restaurant<S: StorageBackend + ?Sized + 'static>(
    State(handler): State<Arc<PizzaHandler<S>>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    tracing::debug!("GET /restaurants/{}", id);
    let detail = handler.get_restaurant(restaurant_id(&id)?).await?;
    Ok(Json(detail).into_response())
}

async fn delete_restaurant<S: StorageBackend + ?Sized + 'static>(
    State(handler): State<Arc<PizzaHandler<S>>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    tracing::debug!("DELETE /restaurants/{}", id);
    handler.delete_restaurant(restaurant_id(&id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_pizzas<S: StorageBackend + ?Sized + 'static>(
    State(handler): State<Arc<PizzaHandler<S>>>,
) -> Result<Response, ApiError> {
    tracing::debug!("GET /pizzas");
    Ok(Json(handler.list_pizzas().await?).into_response())
}

async fn create_restaurant_pizza<S: StorageBackend + ?Sized + 'static>(
    State(handler): State<Arc<PizzaHandler<S>>>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let request = CreateRestaurantPizzaRequest::from_body(&body);
    tracing::debug!("POST /restaurant_pizzas: {:?}", request);

    let detail = handler.create_restaurant_pizza(&request).await?;
    Ok((StatusCode::CREATED, Json(detail)).into_response())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

/// Run the HTTP server until Ctrl-C
pub async fn run_server<S: StorageBackend + ?Sized + 'static>(
    storage: Arc<S>,
    addr: &str,
) -> anyhow::Result<()> {
    let router = create_router(Arc::new(PizzaHandler::new(storage)));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Pizza API listening on {}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
