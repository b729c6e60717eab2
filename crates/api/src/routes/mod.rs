pub mod health;
pub mod themes;
pub mod transform;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /transform-photo                                 transform (POST)
///
/// /themes                                          catalog and categories
/// /themes/{id}                                     single theme
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/transform-photo", transform::router())
        .nest("/themes", themes::router())
}
