mod dto;
pub mod handlers;
mod repo;
mod repo_types;

use crate::state::AppState;
use axum::Router;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(title = "API de Usuarios", description = "API para gestión de usuarios"),
    paths(
        handlers::create_user,
        handlers::list_users,
        handlers::get_user,
        handlers::update_user,
        handlers::make_user_premium,
        handlers::list_inactive_users,
        handlers::list_premium_users,
        handlers::filter_users,
    ),
    components(schemas(repo_types::User, dto::UserCreate)),
    tags((name = "users", description = "User records"))
)]
pub struct UsersApi;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::user_routes())
}
