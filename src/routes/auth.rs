use std::net::SocketAddr;
use std::sync::LazyLock;

use axum::Form;
use axum::extract::{ConnectInfo, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use chrono::{Duration, Utc};
use regex::Regex;
use serde::Deserialize;

use crate::auth::{password, reset_code, session};
use crate::client_ip;
use crate::db;
use crate::error::AppError;
use crate::flash;
use crate::state::SharedState;

pub const MIN_PASSWORD_LEN: usize = 6;

const RESET_CODE_TTL_HOURS: i64 = 1;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex"));

#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct RegisterForm {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub phone: String,
    pub country: String,
    pub currency: String,
    pub password: String,
    pub password2: String,
}

#[derive(Deserialize)]
pub struct ForgotPasswordForm {
    pub email: String,
}

#[derive(Deserialize)]
pub struct ResetPasswordForm {
    pub email: String,
    pub code: String,
    pub password: String,
    pub password_confirmation: String,
}

fn session_cookie(token: &str) -> Cookie<'static> {
    Cookie::build((session::SESSION_COOKIE, token.to_string()))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .build()
}

fn clear_session(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build((session::SESSION_COOKIE, "")).path("/").build())
}

/// Infrastructure failure: log it, send the user back to the form.
fn oops(err: AppError, back: &str) -> Response {
    tracing::error!("{err}");
    flash::error_redirect("Something went wrong", back)
}

// ── Login / logout ──────────────────────────────────────────────

pub async fn login(
    State(state): State<SharedState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Response {
    let email = form.email.trim();

    if state.login_limiter.check(email).is_err() {
        return (
            flash::error(jar, "Too many login attempts, try again later"),
            Redirect::to("/login"),
        )
            .into_response();
    }

    match try_login(&state, email, &form.password).await {
        Ok(Some(token)) => (jar.add(session_cookie(&token)), Redirect::to("/dashboard")).into_response(),
        Ok(None) => (
            flash::error(jar, "Invalid email or password"),
            Redirect::to("/login"),
        )
            .into_response(),
        Err(err) => oops(err, "/login"),
    }
}

async fn try_login(
    state: &SharedState,
    email: &str,
    submitted: &str,
) -> Result<Option<String>, AppError> {
    let Some(user) = db::users::find_by_email(&state.pool, email).await? else {
        return Ok(None);
    };

    let valid = password::verify(submitted, &user.password_hash).map_err(AppError::Internal)?;
    if !valid {
        state.login_limiter.record_failure(email);
        return Ok(None);
    }

    let claims = session::Claims::new(user.id);
    let token =
        session::encode_token(&claims, &state.config.session_secret).map_err(AppError::Internal)?;
    Ok(Some(token))
}

pub async fn logout(jar: CookieJar) -> (CookieJar, Redirect) {
    let jar = flash::success(clear_session(jar), "You are logged out");
    (jar, Redirect::to("/login"))
}

// ── Registration ────────────────────────────────────────────────

pub async fn register(
    State(state): State<SharedState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    jar: CookieJar,
    Form(form): Form<RegisterForm>,
) -> Response {
    let form = form.trimmed();

    if let Some(message) = validate_registration(&form) {
        return (flash::error(jar, message), Redirect::to("/register")).into_response();
    }

    let signup_ip = client_ip::extract(&headers, Some(addr.ip()), &state.config.trusted_proxies);

    match try_register(&state, &form, &signup_ip).await {
        Ok(true) => (
            flash::success(jar, "Register success, you can now login"),
            Redirect::to("/login"),
        )
            .into_response(),
        Ok(false) => (
            flash::error(jar, "A user with that email already exists"),
            Redirect::to("/register"),
        )
            .into_response(),
        Err(err) => oops(err, "/register"),
    }
}

impl RegisterForm {
    fn trimmed(self) -> Self {
        Self {
            firstname: self.firstname.trim().to_string(),
            lastname: self.lastname.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            country: self.country.trim().to_string(),
            currency: self.currency.trim().to_string(),
            password: self.password,
            password2: self.password2,
        }
    }
}

fn validate_registration(form: &RegisterForm) -> Option<&'static str> {
    let required = [
        &form.firstname,
        &form.lastname,
        &form.email,
        &form.phone,
        &form.country,
        &form.currency,
        &form.password,
        &form.password2,
    ];
    if required.iter().any(|field| field.is_empty()) {
        return Some("Please fill all fields");
    }
    if !EMAIL_RE.is_match(&form.email) {
        return Some("Enter a valid email address");
    }
    if form.password != form.password2 {
        return Some("Both passwords are not the same");
    }
    if form.password.len() < MIN_PASSWORD_LEN {
        return Some("Password length should be min of 6 chars");
    }
    None
}

async fn try_register(
    state: &SharedState,
    form: &RegisterForm,
    signup_ip: &str,
) -> Result<bool, AppError> {
    if db::users::find_by_email(&state.pool, &form.email)
        .await?
        .is_some()
    {
        return Ok(false);
    }

    let password_hash = password::hash(&form.password).map_err(AppError::Internal)?;
    db::users::create(
        &state.pool,
        &form.firstname,
        &form.lastname,
        &form.email,
        &form.phone,
        &form.country,
        &form.currency,
        &password_hash,
        signup_ip,
    )
    .await?;
    Ok(true)
}

// ── Forgot password ─────────────────────────────────────────────

pub async fn forgot_password(
    State(state): State<SharedState>,
    jar: CookieJar,
    Form(form): Form<ForgotPasswordForm>,
) -> Response {
    match try_forgot_password(&state, form.email.trim()).await {
        // Same answer whether or not the email is on file
        Ok(()) => (
            flash::success(jar, "If that email is registered, a reset link has been sent"),
            Redirect::to("/forgot-password"),
        )
            .into_response(),
        Err(err) => oops(err, "/forgot-password"),
    }
}

async fn try_forgot_password(state: &SharedState, email: &str) -> Result<(), AppError> {
    let Some(user) = db::users::find_by_email(&state.pool, email).await? else {
        return Ok(());
    };

    let code = reset_code::generate();
    let expires_at = Utc::now() + Duration::hours(RESET_CODE_TTL_HOURS);
    db::password_reset_codes::create(&state.pool, &user.email, &reset_code::hash(&code), expires_at)
        .await?;

    let reset_url = format!("{}/reset-password?code={code}", state.config.base_url);
    match &state.mailer {
        Some(mailer) => {
            if let Err(e) = mailer.send_password_reset(&user.email, &reset_url).await {
                tracing::error!("Failed to send password reset email: {e}");
            }
        }
        None => {
            tracing::warn!("SMTP not configured. Password reset code for {}: {code}", user.email);
        }
    }

    Ok(())
}

// ── Reset password ──────────────────────────────────────────────

pub async fn reset_password(
    State(state): State<SharedState>,
    jar: CookieJar,
    Form(form): Form<ResetPasswordForm>,
) -> Response {
    if form.password != form.password_confirmation {
        return (
            flash::error(jar, "Passwords do not match"),
            Redirect::to("/reset-password"),
        )
            .into_response();
    }
    if form.password.len() < MIN_PASSWORD_LEN {
        return (
            flash::error(jar, "Password length should be min of 6 chars"),
            Redirect::to("/reset-password"),
        )
            .into_response();
    }

    match try_reset_password(&state, &form).await {
        Ok(true) => (
            flash::success(jar, "Password reset successfully"),
            Redirect::to("/login"),
        )
            .into_response(),
        Ok(false) => (
            flash::error(jar, "Invalid reset code"),
            Redirect::to("/reset-password"),
        )
            .into_response(),
        Err(err) => oops(err, "/reset-password"),
    }
}

async fn try_reset_password(state: &SharedState, form: &ResetPasswordForm) -> Result<bool, AppError> {
    let code_hash = reset_code::hash(&form.code);

    // One atomic delete: single use, unexpired, bound to the email it was issued for
    let Some(code) =
        db::password_reset_codes::consume(&state.pool, &code_hash, form.email.trim()).await?
    else {
        return Ok(false);
    };

    let Some(user) = db::users::find_by_email(&state.pool, &code.email).await? else {
        return Ok(false);
    };

    let password_hash = password::hash(&form.password).map_err(AppError::Internal)?;
    db::users::update_password(&state.pool, user.id, &password_hash).await?;
    Ok(true)
}
