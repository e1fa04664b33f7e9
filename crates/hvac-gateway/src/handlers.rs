// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! HTTP request handlers for the administrative REST API. Thin wrappers
//! around the registry/forward/policy cores: no business logic lives
//! here beyond request validation and response shaping.

use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use hvac_policy::ForwardRequest;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

#[derive(Serialize)]
pub struct ApiError {
    pub error: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ApiError { error: message.into() })).into_response()
}

#[derive(Serialize)]
struct RackSummary {
    rack_id: String,
    status: &'static str,
    smart_objects: Vec<String>,
}

#[derive(Serialize)]
struct RoomSummary {
    room_id: String,
    location: String,
    smart_objects: Vec<String>,
    racks: Vec<String>,
}

/// GET /hvac/api/rooms
pub async fn list_rooms(State(state): State<Arc<AppState>>) -> Response {
    let rooms = state.rooms.read();
    let summaries: Vec<RoomSummary> = rooms
        .iter()
        .map(|room| RoomSummary {
            room_id: room.room_id.clone(),
            location: room.location.clone(),
            smart_objects: room.smart_objects().map(|o| o.object_id.clone()).collect(),
            racks: room.racks().map(|r| r.rack_id.clone()).collect(),
        })
        .collect();
    Json(summaries).into_response()
}

/// GET /hvac/api/room/{room}
pub async fn get_room(State(state): State<Arc<AppState>>, Path(room_id): Path<String>) -> Response {
    let rooms = state.rooms.read();
    match rooms.iter().find(|r| r.room_id == room_id) {
        Some(room) => Json(RoomSummary {
            room_id: room.room_id.clone(),
            location: room.location.clone(),
            smart_objects: room.smart_objects().map(|o| o.object_id.clone()).collect(),
            racks: room.racks().map(|r| r.rack_id.clone()).collect(),
        })
        .into_response(),
        None => error_response(StatusCode::NOT_FOUND, format!("no such room: {room_id}")),
    }
}

/// GET /hvac/api/room/{room}/rack/{rack}
pub async fn get_rack(State(state): State<Arc<AppState>>, Path((room_id, rack_id)): Path<(String, String)>) -> Response {
    let rooms = state.rooms.read();
    let Some(room) = rooms.iter().find(|r| r.room_id == room_id) else {
        return error_response(StatusCode::NOT_FOUND, format!("no such room: {room_id}"));
    };
    match room.get_rack(&rack_id) {
        Some(rack) => Json(RackSummary {
            rack_id: rack.rack_id.clone(),
            status: if rack.accepts_commands() { "on" } else { "off" },
            smart_objects: rack.smart_objects().map(|o| o.object_id.clone()).collect(),
        })
        .into_response(),
        None => error_response(StatusCode::NOT_FOUND, format!("no such rack: {rack_id}")),
    }
}

/// POST /hvac/api/proxy/forward
pub async fn proxy_forward(State(state): State<Arc<AppState>>, Json(body): Json<Value>) -> Response {
    let request = ForwardRequest {
        object_id: body.get("object_id").and_then(Value::as_str).unwrap_or_default().to_string(),
        room_id: body.get("room_id").and_then(Value::as_str).unwrap_or_default().to_string(),
        rack_id: body.get("rack_id").and_then(Value::as_str).map(String::from),
        command: body.get("command").cloned().unwrap_or(Value::Null),
    };

    match crate::forward::forward(&state.registry, state.upstream.as_ref(), &request).await {
        Ok(response) => {
            let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::OK);
            (status, Json(response.body)).into_response()
        }
        Err(e) => {
            let status = StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, Json(e.payload())).into_response()
        }
    }
}

fn policy_engine_for(state: &AppState, room_id: &str) -> Result<Arc<hvac_policy::PolicyEngine>, Response> {
    state
        .policy_engines
        .get(room_id)
        .map(|e| e.value().clone())
        .ok_or_else(|| error_response(StatusCode::NOT_FOUND, format!("no such room: {room_id}")))
}

/// GET /hvac/api/room/{room}/policies
pub async fn list_room_policies(State(state): State<Arc<AppState>>, Path(room_id): Path<String>) -> Response {
    match policy_engine_for(&state, &room_id) {
        Ok(engine) => Json(engine.policies()).into_response(),
        Err(resp) => resp,
    }
}

/// POST /hvac/api/room/{room}/policies
pub async fn create_policy(State(state): State<Arc<AppState>>, Path(room_id): Path<String>, Json(body): Json<Value>) -> Response {
    let engine = match policy_engine_for(&state, &room_id) {
        Ok(engine) => engine,
        Err(resp) => return resp,
    };
    match engine.add_policy(body) {
        Ok(policy) => (StatusCode::CREATED, Json(policy)).into_response(),
        Err(e) => error_response(StatusCode::BAD_REQUEST, e.to_string()),
    }
}

/// PUT /hvac/api/room/{room}/policies/{id}
pub async fn update_policy(
    State(state): State<Arc<AppState>>,
    Path((room_id, id)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Response {
    let engine = match policy_engine_for(&state, &room_id) {
        Ok(engine) => engine,
        Err(resp) => return resp,
    };
    match engine.update_policy(&id, body) {
        Ok(policy) => Json(policy).into_response(),
        Err(e) => error_response(StatusCode::BAD_REQUEST, e.to_string()),
    }
}

/// DELETE /hvac/api/room/{room}/policies/{id}
pub async fn delete_policy(State(state): State<Arc<AppState>>, Path((room_id, id)): Path<(String, String)>) -> Response {
    let engine = match policy_engine_for(&state, &room_id) {
        Ok(engine) => engine,
        Err(resp) => return resp,
    };
    match engine.delete_policy(&id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(StatusCode::NOT_FOUND, e.to_string()),
    }
}

/// GET /hvac/api/policies — every room's policies, flattened.
pub async fn list_all_policies(State(state): State<Arc<AppState>>) -> Response {
    let all: Vec<_> = state.policy_engines.iter().flat_map(|e| e.value().policies()).collect();
    Json(all).into_response()
}

/// POST /hvac/api/policies — room_id read from the body.
pub async fn create_policy_flat(State(state): State<Arc<AppState>>, Json(body): Json<Value>) -> Response {
    let Some(room_id) = body.get("room_id").and_then(Value::as_str).map(str::to_string) else {
        return error_response(StatusCode::BAD_REQUEST, "request body must include 'room_id'");
    };
    let engine = match policy_engine_for(&state, &room_id) {
        Ok(engine) => engine,
        Err(resp) => return resp,
    };
    match engine.add_policy(body) {
        Ok(policy) => (StatusCode::CREATED, Json(policy)).into_response(),
        Err(e) => error_response(StatusCode::BAD_REQUEST, e.to_string()),
    }
}

fn device_scope_matches(policy: &hvac_domain::Policy, rack_id: &str, object_id: &str) -> bool {
    match policy {
        hvac_domain::Policy::SmartObject { rack_id: r, object_id: o, .. } => r == rack_id && o == object_id,
        hvac_domain::Policy::Room { .. } => false,
    }
}

fn merge_device_scope(body: &mut Value, room_id: &str, rack_id: &str, object_id: &str) {
    if let Value::Object(map) = body {
        map.insert("type".into(), Value::String("smart_object".into()));
        map.insert("room_id".into(), Value::String(room_id.to_string()));
        map.insert("rack_id".into(), Value::String(rack_id.to_string()));
        map.insert("object_id".into(), Value::String(object_id.to_string()));
    }
}

/// GET /hvac/api/room/{room}/rack/{rack}/device/{object}/policies
pub async fn list_device_policies(
    State(state): State<Arc<AppState>>,
    Path((room_id, rack_id, object_id)): Path<(String, String, String)>,
) -> Response {
    match policy_engine_for(&state, &room_id) {
        Ok(engine) => {
            let scoped: Vec<_> =
                engine.policies().into_iter().filter(|p| device_scope_matches(p, &rack_id, &object_id)).collect();
            Json(scoped).into_response()
        }
        Err(resp) => resp,
    }
}

/// POST /hvac/api/room/{room}/rack/{rack}/device/{object}/policies
pub async fn create_device_policy(
    State(state): State<Arc<AppState>>,
    Path((room_id, rack_id, object_id)): Path<(String, String, String)>,
    Json(mut body): Json<Value>,
) -> Response {
    let engine = match policy_engine_for(&state, &room_id) {
        Ok(engine) => engine,
        Err(resp) => return resp,
    };
    merge_device_scope(&mut body, &room_id, &rack_id, &object_id);
    match engine.add_policy(body) {
        Ok(policy) => (StatusCode::CREATED, Json(policy)).into_response(),
        Err(e) => error_response(StatusCode::BAD_REQUEST, e.to_string()),
    }
}

/// PUT /hvac/api/room/{room}/rack/{rack}/device/{object}/policies — the
/// policy's own `id` must be present in the body, there being no `{id}`
/// path segment at this route.
pub async fn update_device_policy(
    State(state): State<Arc<AppState>>,
    Path((room_id, rack_id, object_id)): Path<(String, String, String)>,
    Json(mut body): Json<Value>,
) -> Response {
    let engine = match policy_engine_for(&state, &room_id) {
        Ok(engine) => engine,
        Err(resp) => return resp,
    };
    let Some(id) = body.get("id").and_then(Value::as_str).map(str::to_string) else {
        return error_response(StatusCode::BAD_REQUEST, "request body must include the policy's 'id'");
    };
    merge_device_scope(&mut body, &room_id, &rack_id, &object_id);
    match engine.update_policy(&id, body) {
        Ok(policy) => Json(policy).into_response(),
        Err(e) => error_response(StatusCode::BAD_REQUEST, e.to_string()),
    }
}

#[derive(serde::Deserialize)]
pub struct PolicyIdQuery {
    pub id: String,
}

/// DELETE /hvac/api/room/{room}/rack/{rack}/device/{object}/policies?id=...
pub async fn delete_device_policy(
    State(state): State<Arc<AppState>>,
    Path((room_id, rack_id, object_id)): Path<(String, String, String)>,
    Query(query): Query<PolicyIdQuery>,
) -> Response {
    let engine = match policy_engine_for(&state, &room_id) {
        Ok(engine) => engine,
        Err(resp) => return resp,
    };
    let in_scope =
        engine.policies().into_iter().any(|p| p.id() == query.id && device_scope_matches(&p, &rack_id, &object_id));
    if !in_scope {
        return error_response(StatusCode::NOT_FOUND, format!("no such policy: {}", query.id));
    }
    match engine.delete_policy(&query.id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(StatusCode::NOT_FOUND, e.to_string()),
    }
}
