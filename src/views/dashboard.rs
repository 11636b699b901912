use askama::Template;
use axum::extract::State;
use axum::response::{Html, IntoResponse};
use axum_extra::extract::CookieJar;

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::error::AppError;
use crate::flash;
use crate::state::SharedState;
use crate::views::flash_parts;

#[derive(Template)]
#[template(path = "dashboard.html")]
struct DashboardTemplate {
    first_name: String,
    error: Option<String>,
    message: Option<String>,
}

pub async fn index(
    auth: AuthUser,
    State(state): State<SharedState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    let first_name = db::users::find_by_id(&state.pool, auth.user_id)
        .await?
        .map(|u| u.first_name)
        .unwrap_or_default();

    let (jar, pending) = flash::take(jar);
    let (error, message) = flash_parts(pending);
    let template = DashboardTemplate {
        first_name,
        error,
        message,
    };
    Ok((jar, Html(template.render().unwrap_or_default())))
}
