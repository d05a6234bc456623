//! Pizzeria HTTP - JSON API over the entity store
//!
//! Routes:
//!
//! | Method | Path | Success |
//! |---|---|---|
//! | GET | `/` | 200 |
//! | GET | `/health` | 200 / 503 |
//! | GET | `/restaurants` | 200 |
//! | GET | `/restaurants/:id` | 200, 404 |
//! | DELETE | `/restaurants/:id` | 204, 404 |
//! | GET | `/pizzas` | 200 |
//! | POST | `/restaurant_pizzas` | 201, 404, 422 |

pub mod error;
pub mod handlers;
pub mod routes;

pub use error::ApiError;
pub use handlers::PizzaHandler;
pub use routes::{create_router, run_server};
