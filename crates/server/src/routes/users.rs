use axum::{extract::{Path, State}, http::StatusCode, Json};
use service::domain::{LoginInput, User, UserInput};
use service::errors::ServiceError;

use crate::errors::ApiError;
use crate::state::AppState;

/// 列出所有用户；列表为空时返回 404
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<User>>, ApiError> {
    let users = state.users.list().await.map_err(ApiError::during("list_users"))?;
    if users.is_empty() {
        return Err(ApiError::new("list_users", ServiceError::not_found("users")));
    }
    Ok(Json(users))
}

pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<User>, ApiError> {
    state
        .users
        .get(id)
        .await
        .map(Json)
        .map_err(ApiError::during("get_user"))
}

/// 注册用户；邮箱已存在时返回 400
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<UserInput>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let user = state
        .users
        .create(input)
        .await
        .map_err(ApiError::during("create_user"))?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// 校验邮箱与密码，成功返回用户记录（不签发令牌）
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginInput>,
) -> Result<Json<User>, ApiError> {
    state
        .users
        .authenticate(&input.email, &input.password)
        .await
        .map(Json)
        .map_err(ApiError::during("login"))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<UserInput>,
) -> Result<Json<User>, ApiError> {
    state
        .users
        .update(id, input)
        .await
        .map(Json)
        .map_err(ApiError::during("update_user"))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state
        .users
        .delete(id)
        .await
        .map_err(ApiError::during("delete_user"))?;
    Ok(StatusCode::NO_CONTENT)
}
