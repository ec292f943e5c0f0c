use axum::{
    extract::{Json, State},
    response::IntoResponse,
    routing::get,
    Router,
};

use crate::{
    errors::ServiceError,
    services::reference::{NewCylinderType, PriceUpsert},
    ApiResponse, AppState,
};

async fn list_types(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    let types = state.services.reference.cylinder_types().await?;
    Ok(Json(ApiResponse::success(types)))
}

async fn create_type(
    State(state): State<AppState>,
    Json(payload): Json<NewCylinderType>,
) -> Result<impl IntoResponse, ServiceError> {
    let ty = state.services.reference.create_cylinder_type(payload).await?;
    Ok(Json(ApiResponse::message(ty, "Cylinder type added")))
}

async fn list_prices(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    let prices = state.services.reference.prices().await?;
    Ok(Json(ApiResponse::success(prices)))
}

async fn upsert_price(
    State(state): State<AppState>,
    Json(payload): Json<PriceUpsert>,
) -> Result<impl IntoResponse, ServiceError> {
    let price = state.services.reference.upsert_price(payload).await?;
    Ok(Json(ApiResponse::message(price, "Price components saved")))
}

pub fn cylinder_type_routes() -> Router<AppState> {
    Router::new().route("/", get(list_types).post(create_type))
}

pub fn price_routes() -> Router<AppState> {
    Router::new().route("/", get(list_prices).put(upsert_price))
}
