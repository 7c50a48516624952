//! Route definitions for the asset gateway.
//!
//! All routes are mounted under `/sams/assets`.

use axum::routing::get;
use axum::Router;

use crate::handlers::assets;
use crate::state::AppState;

/// Asset gateway routes mounted at `/assets`.
///
/// ```text
/// GET    /                              -> list_assets
/// POST   /                              -> create_asset
/// GET    /{item_id}                     -> get_asset
/// PATCH  /{item_id}                     -> update_asset
/// DELETE /{item_id}                     -> delete_asset
/// GET    /binary/{item_id}              -> get_asset_binary
/// GET    /counts                        -> get_assets_count
/// GET    /counts/{set_ids}              -> get_assets_count_for_sets
/// GET    /compressed_binary/{asset_ids} -> get_assets_compressed_binary
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(assets::list_assets).post(assets::create_asset))
        .route(
            "/{item_id}",
            get(assets::get_asset)
                .patch(assets::update_asset)
                .delete(assets::delete_asset),
        )
        .route("/binary/{item_id}", get(assets::get_asset_binary))
        .route("/counts", get(assets::get_assets_count))
        .route("/counts/{set_ids}", get(assets::get_assets_count_for_sets))
        .route(
            "/compressed_binary/{asset_ids}",
            get(assets::get_assets_compressed_binary),
        )
}
