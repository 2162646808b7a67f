pub mod account_controller;

use axum::routing::{get, Router};

/// 系统健康检查
pub async fn health() -> &'static str {
    "Server is running! 🚀"
}

pub fn app() -> Router {
    Router::new()
        .route("/", get(health))
        .nest("/account", account_controller::AccountController::app())
}
