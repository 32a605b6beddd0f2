use axum::{extract::{Path, State}, http::StatusCode, Json};
use service::domain::{Calculation, CalculationInput};

use crate::errors::ApiError;
use crate::state::AppState;

/// 列出所有计算记录
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Calculation>>, ApiError> {
    let all = state.calculations.list().await.map_err(ApiError::during("list_calculations"))?;
    Ok(Json(all))
}

/// 获取指定计算记录
pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Calculation>, ApiError> {
    state
        .calculations
        .get(id)
        .await
        .map(Json)
        .map_err(ApiError::during("get_calculation"))
}

/// 创建计算记录，id 由存储分配
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CalculationInput>,
) -> Result<(StatusCode, Json<Calculation>), ApiError> {
    let created = state
        .calculations
        .create(input)
        .await
        .map_err(ApiError::during("create_calculation"))?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<CalculationInput>,
) -> Result<Json<Calculation>, ApiError> {
    state
        .calculations
        .update(id, input)
        .await
        .map(Json)
        .map_err(ApiError::during("update_calculation"))
}

/// 删除计算记录；不存在的 id 同样返回 204
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state
        .calculations
        .delete(id)
        .await
        .map_err(ApiError::during("delete_calculation"))?;
    Ok(StatusCode::NO_CONTENT)
}
