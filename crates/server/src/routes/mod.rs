use axum::Router;

use crate::health;
use crate::state::AppState;

pub mod auth;
pub mod clients;
pub mod favorites;
pub mod products;

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(clients::router())
        .merge(favorites::router())
        .merge(products::router())
        .with_state(state)
}
