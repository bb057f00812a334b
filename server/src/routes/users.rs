//! User registry routes: records, ranking, friends.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use botgame_engine::{FriendView, UserRecord};
use serde_json::{json, Map, Value};

use crate::error::{AppError, Result};
use crate::handlers::{handle_create, handle_update, CreateResponse};
use crate::AppState;

/// Create user registry routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/{user_id}", get(get_user).patch(update_user))
        .route("/ranking", get(ranking))
        .route("/friends/{user_id}", get(friends))
}

/// GET /users - every record, no ordering contract.
async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserRecord>>> {
    Ok(Json(state.ledger.all_records().await?))
}

/// GET /users/{userId} - one record, or an empty object when absent.
async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Value>> {
    let body = match state.ledger.lookup(&user_id).await? {
        Some(record) => {
            serde_json::to_value(record).map_err(|e| AppError::Internal(e.to_string()))?
        }
        None => json!({}),
    };
    Ok(Json(body))
}

/// GET /ranking - top 20 records, points descending.
async fn ranking(State(state): State<AppState>) -> Result<Json<Vec<UserRecord>>> {
    Ok(Json(state.ledger.top_ranked(None).await?))
}

/// GET /friends/{userId} - the record with its friend list resolved, as an
/// array of zero or one elements (empty when the user is unknown).
async fn friends(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<FriendView>>> {
    let views = state.friends.resolve(&user_id).await?.into_iter().collect();
    Ok(Json(views))
}

/// POST /users - create a record from an arbitrary JSON object.
async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<Map<String, Value>>,
) -> Result<Json<CreateResponse>> {
    let response = handle_create(&state.allocator, payload).await?;
    Ok(Json(response))
}

/// PATCH /users/{userId} - numeric `points` delta plus generic field updates.
async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(body): Json<Map<String, Value>>,
) -> Result<Json<botgame_engine::UpdateOutcome>> {
    let outcome = handle_update(&state.ledger, &user_id, body).await?;
    Ok(Json(outcome))
}
