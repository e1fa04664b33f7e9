// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Route table for the administrative REST API, matching the shape
//! specified for the HVAC edge agent's HTTP surface.

use crate::handlers;
use crate::AppState;
use axum::routing::{delete, get, post, put};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/hvac/api/rooms", get(handlers::list_rooms))
        .route("/hvac/api/room/:room", get(handlers::get_room))
        .route("/hvac/api/room/:room/rack/:rack", get(handlers::get_rack))
        .route("/hvac/api/proxy/forward", post(handlers::proxy_forward))
        .route(
            "/hvac/api/room/:room/policies",
            get(handlers::list_room_policies).post(handlers::create_policy),
        )
        .route("/hvac/api/room/:room/policies/:id", put(handlers::update_policy).delete(handlers::delete_policy))
        .route(
            "/hvac/api/room/:room/rack/:rack/device/:object/policies",
            get(handlers::list_device_policies)
                .post(handlers::create_device_policy)
                .put(handlers::update_device_policy)
                .delete(handlers::delete_device_policy),
        )
        .route("/hvac/api/policies", get(handlers::list_all_policies).post(handlers::create_policy_flat))
}

pub fn build_router(state: Arc<AppState>) -> Router {
    api_routes().layer(CorsLayer::permissive()).layer(TraceLayer::new_for_http()).with_state(state)
}
