//! HTTP handlers for the pet store.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{FromRef, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use bytes::Bytes;
use serde::Serialize;

use crate::pets::store::{NewPet, PetStore};

#[derive(Debug, Serialize)]
struct ApiError {
    code: u16,
    message: &'static str,
}

fn error(status: StatusCode, message: &'static str) -> Response {
    (status, Json(ApiError { code: status.as_u16(), message })).into_response()
}

/// Routes under `/v1`, for any router state the store can be taken from.
pub fn routes<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    Arc<PetStore>: FromRef<S>,
{
    Router::new()
        .route("/v1/pets", get(list).post(create))
        .route("/v1/pets/{pet_id}", get(show))
}

/// `GET /v1/pets?limit=n`
pub async fn list(
    State(store): State<Arc<PetStore>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let limit = params.get("limit").and_then(|l| l.parse::<usize>().ok());
    Json(store.list(limit)).into_response()
}

/// `POST /v1/pets`
pub async fn create(State(store): State<Arc<PetStore>>, body: Bytes) -> Response {
    let new: NewPet = match serde_json::from_slice(&body) {
        Ok(new) => new,
        Err(e) => {
            tracing::debug!(error = %e, "Rejecting pet body");
            return error(StatusCode::BAD_REQUEST, "Invalid request body");
        }
    };
    if new.name.is_empty() {
        return error(StatusCode::BAD_REQUEST, "Pet name is required");
    }

    let pet = store.create(new);
    tracing::info!(pet_id = pet.id, name = %pet.name, "Pet created");
    (StatusCode::CREATED, Json(pet)).into_response()
}

/// `GET /v1/pets/{pet_id}`
pub async fn show(State(store): State<Arc<PetStore>>, Path(pet_id): Path<String>) -> Response {
    let Ok(id) = pet_id.parse::<i64>() else {
        return error(StatusCode::BAD_REQUEST, "Invalid pet ID");
    };
    match store.get(id) {
        Some(pet) => Json(pet).into_response(),
        None => error(StatusCode::NOT_FOUND, "Pet not found"),
    }
}
