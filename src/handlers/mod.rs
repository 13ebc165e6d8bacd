pub mod public;
pub mod webhooks;

use axum::Router;

use crate::state::AppState;

/// Full application router with state applied.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(public::router())
        .merge(webhooks::router())
        .with_state(state)
}
