use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    routing::{get, patch},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    db,
    error::{AppError, Result},
    state::AppState,
    users::{
        dto::{UserCreate, UserFilter},
        repo,
        repo_types::User,
    },
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/", get(list_users).post(create_user))
        .route("/users", get(list_users).post(create_user))
        .route("/users/:id", get(get_user).put(update_user))
        .route("/users/:id/premium", patch(make_user_premium))
        .route("/users/status/inactive", get(list_inactive_users))
        .route("/users/status/premium", get(list_premium_users))
        .route("/users/filter/", get(filter_users))
        .route("/users/filter", get(filter_users))
}

fn log_not_found(err: AppError) -> AppError {
    if let AppError::NotFound(id) = err {
        warn!(user_id = id, "user not found");
    }
    err
}

#[utoipa::path(
    post,
    path = "/users/",
    tag = "users",
    request_body = UserCreate,
    responses((status = 201, description = "User created", body = User))
)]
#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<UserCreate>,
) -> Result<(StatusCode, [(header::HeaderName, String); 1], Json<User>)> {
    let mut session = db::open_session(&state.db).await?;
    let user = repo::create(&mut session, &payload).await?;
    session.commit().await?;

    info!(user_id = user.id, "user created");
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/users/{}", user.id))],
        Json(user),
    ))
}

#[utoipa::path(
    get,
    path = "/users/",
    tag = "users",
    responses((status = 200, description = "All users", body = [User]))
)]
#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>> {
    let mut session = db::open_session(&state.db).await?;
    let users = repo::list_all(&mut session).await?;
    session.commit().await?;
    Ok(Json(users))
}

#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "The user", body = User),
        (status = 404, description = "No user with this id")
    )
)]
#[instrument(skip(state))]
pub async fn get_user(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<User>> {
    let mut session = db::open_session(&state.db).await?;
    let user = repo::get_by_id(&mut session, id).await.map_err(log_not_found)?;
    session.commit().await?;
    Ok(Json(user))
}

#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "users",
    params(("id" = i64, Path, description = "User id")),
    request_body = UserCreate,
    responses(
        (status = 200, description = "Updated user", body = User),
        (status = 404, description = "No user with this id")
    )
)]
#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UserCreate>,
) -> Result<Json<User>> {
    let mut session = db::open_session(&state.db).await?;
    let user = repo::update(&mut session, id, &payload)
        .await
        .map_err(log_not_found)?;
    session.commit().await?;

    info!(user_id = id, "user updated");
    Ok(Json(user))
}

#[utoipa::path(
    patch,
    path = "/users/{id}/premium",
    tag = "users",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "Promoted user", body = User),
        (status = 404, description = "No user with this id")
    )
)]
#[instrument(skip(state))]
pub async fn make_user_premium(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<User>> {
    let mut session = db::open_session(&state.db).await?;
    let user = repo::promote_to_premium(&mut session, id)
        .await
        .map_err(log_not_found)?;
    session.commit().await?;

    info!(user_id = id, "user promoted to premium");
    Ok(Json(user))
}

#[utoipa::path(
    get,
    path = "/users/status/inactive",
    tag = "users",
    responses((status = 200, description = "Inactive users", body = [User]))
)]
#[instrument(skip(state))]
pub async fn list_inactive_users(State(state): State<AppState>) -> Result<Json<Vec<User>>> {
    let mut session = db::open_session(&state.db).await?;
    let users = repo::list_inactive(&mut session).await?;
    session.commit().await?;
    Ok(Json(users))
}

#[utoipa::path(
    get,
    path = "/users/status/premium",
    tag = "users",
    responses((status = 200, description = "Premium users", body = [User]))
)]
#[instrument(skip(state))]
pub async fn list_premium_users(State(state): State<AppState>) -> Result<Json<Vec<User>>> {
    let mut session = db::open_session(&state.db).await?;
    let users = repo::list_premium(&mut session).await?;
    session.commit().await?;
    Ok(Json(users))
}

#[utoipa::path(
    get,
    path = "/users/filter/",
    tag = "users",
    params(UserFilter),
    responses(
        (status = 200, description = "Users matching every given flag", body = [User]),
        (status = 400, description = "A flag is not a boolean")
    )
)]
#[instrument(skip(state))]
pub async fn filter_users(
    State(state): State<AppState>,
    Query(by): Query<UserFilter>,
) -> Result<Json<Vec<User>>> {
    let mut session = db::open_session(&state.db).await?;
    let users = repo::filter(&mut session, &by).await?;
    session.commit().await?;
    Ok(Json(users))
}
