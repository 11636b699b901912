use askama::Template;
use axum::extract::{Query, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use crate::auth::{reset_code, session};
use crate::db;
use crate::error::AppError;
use crate::flash;
use crate::state::SharedState;
use crate::views::flash_parts;

#[derive(Template)]
#[template(path = "auth/login.html")]
struct LoginTemplate {
    error: Option<String>,
    message: Option<String>,
}

#[derive(Template)]
#[template(path = "auth/register.html")]
struct RegisterTemplate {
    error: Option<String>,
    message: Option<String>,
}

#[derive(Template)]
#[template(path = "auth/forgot_password.html")]
struct ForgotPasswordTemplate {
    error: Option<String>,
    message: Option<String>,
}

#[derive(Template)]
#[template(path = "auth/reset_password.html")]
struct ResetPasswordTemplate {
    email: String,
    code: String,
    error: Option<String>,
    message: Option<String>,
}

#[derive(Deserialize)]
pub struct ResetQuery {
    pub code: Option<String>,
}

pub async fn login_page(State(state): State<SharedState>, jar: CookieJar) -> Response {
    // Already signed in: straight to the dashboard
    if let Some(cookie) = jar.get(session::SESSION_COOKIE) {
        if session::decode_token(cookie.value(), &state.config.session_secret).is_ok() {
            return Redirect::to("/dashboard").into_response();
        }
    }

    let (jar, pending) = flash::take(jar);
    let (error, message) = flash_parts(pending);
    let template = LoginTemplate { error, message };
    (jar, Html(template.render().unwrap_or_default())).into_response()
}

pub async fn register_page(jar: CookieJar) -> impl IntoResponse {
    let (jar, pending) = flash::take(jar);
    let (error, message) = flash_parts(pending);
    let template = RegisterTemplate { error, message };
    (jar, Html(template.render().unwrap_or_default()))
}

pub async fn forgot_password_page(jar: CookieJar) -> impl IntoResponse {
    let (jar, pending) = flash::take(jar);
    let (error, message) = flash_parts(pending);
    let template = ForgotPasswordTemplate { error, message };
    (jar, Html(template.render().unwrap_or_default()))
}

/// The emailed link lands here. An unknown or expired code bounces back to
/// the request form instead of rendering a dead-end password form.
pub async fn reset_password_page(
    State(state): State<SharedState>,
    jar: CookieJar,
    Query(query): Query<ResetQuery>,
) -> Result<Response, AppError> {
    let Some(code) = query.code.filter(|c| !c.is_empty()) else {
        return Ok(invalid_code(jar));
    };

    let found =
        db::password_reset_codes::find_valid_by_hash(&state.pool, &reset_code::hash(&code)).await?;
    let Some(pending_code) = found else {
        return Ok(invalid_code(jar));
    };

    let (jar, pending) = flash::take(jar);
    let (error, message) = flash_parts(pending);
    let template = ResetPasswordTemplate {
        email: pending_code.email,
        code,
        error,
        message,
    };
    Ok((jar, Html(template.render().unwrap_or_default())).into_response())
}

fn invalid_code(jar: CookieJar) -> Response {
    (
        flash::error(jar, "Invalid reset code"),
        Redirect::to("/forgot-password"),
    )
        .into_response()
}
