use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
    routing::{get, post},
    Router,
};

use crate::{errors::ServiceError, services::staff::NewStaff, ApiResponse, AppState};

async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, ServiceError> {
    let staff = state.services.staff.list().await?;
    Ok(Json(ApiResponse::success(staff)))
}

async fn create(
    State(state): State<AppState>,
    Json(payload): Json<NewStaff>,
) -> Result<impl IntoResponse, ServiceError> {
    let staff = state.services.staff.create(payload).await?;
    Ok(Json(ApiResponse::message(staff, "Staff member added")))
}

async fn deactivate(
    State(state): State<AppState>,
    Path(staff_id): Path<i64>,
) -> Result<impl IntoResponse, ServiceError> {
    let staff = state.services.staff.deactivate(staff_id).await?;
    Ok(Json(ApiResponse::message(staff, "Staff member deactivated")))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:staff_id/deactivate", post(deactivate))
}
