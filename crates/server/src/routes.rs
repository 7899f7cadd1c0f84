use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, Level};

use common::types::{Health, HealthError, StatusReport};
use service::cars::CarService;

pub mod api;
pub mod carros;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub cars: CarService,
}

impl AppState {
    pub fn new(cars: CarService) -> Self {
        Self { cars }
    }
}

pub async fn health(State(state): State<AppState>) -> Response {
    match state.cars.count().await {
        Ok(n) => Json(Health::ok(n)).into_response(),
        Err(e) => {
            error!(error = %e, "health check failed");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(HealthError::new(e.to_string()))).into_response()
        }
    }
}

pub async fn teste(State(state): State<AppState>) -> Response {
    match state.cars.count().await {
        Ok(total_carros) => Json(StatusReport {
            status: "ok".into(),
            message: "AutoPrime API online".into(),
            total_carros,
            backend: state.cars.backend().into(),
            timestamp: chrono::Utc::now().timestamp_micros() as f64 / 1_000_000.0,
        })
        .into_response(),
        Err(e) => {
            error!(error = %e, "status probe failed");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(HealthError::new(e.to_string()))).into_response()
        }
    }
}

/// Build the full application router: legacy routes, `/api` routes and probes.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let legacy = Router::new()
        .route("/getCarro", post(carros::get_carro))
        .route("/saveCarro", post(carros::save_carro))
        .route("/updateCarro", post(carros::update_carro))
        .route("/deleteCarro", post(carros::delete_carro))
        .route("/listarCarros", get(carros::listar_carros));

    let api = Router::new()
        .route("/api/getCarro", post(api::get_carro))
        .route("/api/saveCarro", post(api::save_carro))
        .route("/api/updateCarro", post(api::update_carro).put(api::update_carro))
        .route("/api/deleteCarro", post(api::delete_carro).delete(api::delete_carro))
        .route("/api/listarCarros", get(api::listar_carros));

    let probes = Router::new()
        .route("/health", get(health))
        .route("/teste", get(teste));

    probes
        .merge(legacy)
        .merge(api)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
