//! `/api` routes: full records in, full records out.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use models::Car;
use serde::Deserialize;
use serde_json::json;
use service::errors::ServiceError;

use crate::errors::ApiError;
use crate::extract::CarPayload;
use crate::routes::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ModelQuery {
    #[serde(alias = "model")]
    pub modelo: Option<String>,
}

/// Matching records as a list; unknown or missing models give `[]`.
pub async fn get_carro(
    State(state): State<AppState>,
    CarPayload(input): CarPayload,
) -> Result<Json<Vec<Car>>, ApiError> {
    Ok(Json(state.cars.get_full(input.model.as_deref()).await?))
}

pub async fn save_carro(
    State(state): State<AppState>,
    CarPayload(input): CarPayload,
) -> Result<(StatusCode, Json<Car>), ApiError> {
    let car = state.cars.save(input).await?;
    Ok((StatusCode::CREATED, Json(car)))
}

pub async fn update_carro(
    State(state): State<AppState>,
    CarPayload(input): CarPayload,
) -> Result<Json<Car>, ApiError> {
    Ok(Json(state.cars.update(input).await?))
}

/// Model comes from the body, or from `?modelo=` when the body has none.
pub async fn delete_carro(
    State(state): State<AppState>,
    Query(query): Query<ModelQuery>,
    CarPayload(input): CarPayload,
) -> Response {
    let model = input.model.or(query.modelo);
    match state.cars.delete(model.as_deref()).await {
        Ok(()) => Json(json!({"deleted": true})).into_response(),
        Err(ServiceError::NotFound(message)) => {
            (StatusCode::NOT_FOUND, Json(json!({"deleted": false, "message": message}))).into_response()
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

pub async fn listar_carros(State(state): State<AppState>) -> Result<Json<Vec<Car>>, ApiError> {
    Ok(Json(state.cars.list_all().await?))
}
