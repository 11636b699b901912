pub mod auth;

use axum::Router;
use axum::routing::get;

use crate::state::SharedState;
use crate::views;

pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/", get(views::auth::login_page))
        .route("/login", get(views::auth::login_page).post(auth::login))
        .route("/logout", get(auth::logout))
        .route("/register", get(views::auth::register_page).post(auth::register))
        .route(
            "/forgot-password",
            get(views::auth::forgot_password_page).post(auth::forgot_password),
        )
        .route(
            "/reset-password",
            get(views::auth::reset_password_page).post(auth::reset_password),
        )
        .route("/dashboard", get(views::dashboard::index))
}
