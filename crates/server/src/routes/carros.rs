//! Legacy routes: terse bodies, `{"error": ...}` on failure.

use axum::{extract::State, http::StatusCode, Json};
use models::Car;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{json, Value};

use crate::errors::ApiError;
use crate::extract::CarPayload;
use crate::routes::AppState;

#[derive(Serialize)]
pub struct PriceBody {
    #[serde(rename = "preco", with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

fn success() -> Json<Value> {
    Json(json!({"success": true}))
}

pub async fn get_carro(
    State(state): State<AppState>,
    CarPayload(input): CarPayload,
) -> Result<Json<PriceBody>, ApiError> {
    let price = state.cars.get_price(input.model.as_deref()).await?;
    Ok(Json(PriceBody { price }))
}

pub async fn save_carro(
    State(state): State<AppState>,
    CarPayload(input): CarPayload,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    state.cars.save(input).await?;
    Ok((StatusCode::CREATED, success()))
}

pub async fn update_carro(
    State(state): State<AppState>,
    CarPayload(input): CarPayload,
) -> Result<Json<Value>, ApiError> {
    state.cars.update(input).await?;
    Ok(success())
}

pub async fn delete_carro(
    State(state): State<AppState>,
    CarPayload(input): CarPayload,
) -> Result<Json<Value>, ApiError> {
    state.cars.delete(input.model.as_deref()).await?;
    Ok(success())
}

pub async fn listar_carros(State(state): State<AppState>) -> Result<Json<Vec<Car>>, ApiError> {
    Ok(Json(state.cars.list_all().await?))
}
