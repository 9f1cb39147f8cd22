use axum::Router;

use crate::state::AppState;

pub mod doc;
pub mod extensions;
pub mod health;
pub mod inventory;
pub mod params;
pub mod products;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest(
            "/products",
            products::router().merge(inventory::stock_router()),
        )
        .nest("/inventory", inventory::router())
        .nest("/games", extensions::games_router())
        .nest("/pcs", extensions::pcs_router())
}
