use crate::models::{CardDto, ListCardsQuery, RawCreateCardRequest};
use crate::service::{CardError, CardService};
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get},
    Json, Router,
};
use common::AppState;
use serde_json::json;
use std::sync::Arc;

impl IntoResponse for CardError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            CardError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            CardError::NotFound => (StatusCode::NOT_FOUND, "Card not found".to_string()),
            CardError::Infrastructure(msg) => {
                tracing::error!("Infrastructure error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        (status, Json(json!({ "message": msg }))).into_response()
    }
}

pub fn cards_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_cards).post(create_card))
        .route("/{id}", delete(delete_card))
        .with_state(state)
}

async fn list_cards(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListCardsQuery>,
) -> Result<Json<Vec<CardDto>>, CardError> {
    let user_id = query.user_id().map_err(CardError::InvalidInput)?;
    let cards = CardService::list_cards(&state.db, user_id).await?;
    Ok(Json(cards.into_iter().map(CardDto::from).collect()))
}

async fn create_card(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RawCreateCardRequest>, JsonRejection>,
) -> Result<impl IntoResponse, CardError> {
    let Json(payload) = payload.map_err(|rejection| CardError::InvalidInput(rejection.body_text()))?;
    let card = CardService::create_card(&state.db, payload).await?;
    Ok((StatusCode::CREATED, Json(CardDto::from(card))))
}

async fn delete_card(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, CardError> {
    CardService::delete_card(&state.db, id).await?;
    Ok(Json(json!({ "message": "Card deleted successfully" })))
}
