pub mod assets;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/sams` route tree.
///
/// ```text
/// /assets                                  list, create (GET, POST)
/// /assets/{item_id}                        get, update, delete
/// /assets/binary/{item_id}                 asset binary download (GET)
/// /assets/counts[/{set_ids}]               count aggregation (GET)
/// /assets/compressed_binary/{asset_ids}    zip bundle download (GET)
/// ```
pub fn sams_routes() -> Router<AppState> {
    Router::new().nest("/assets", assets::router())
}
