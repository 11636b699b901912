pub mod auth;
pub mod dashboard;

use crate::flash::{Flash, Level};

/// Split a pending flash into the (error, message) pair the templates render.
fn flash_parts(flash: Option<Flash>) -> (Option<String>, Option<String>) {
    match flash {
        Some(Flash {
            level: Level::Error,
            message,
        }) => (Some(message), None),
        Some(Flash {
            level: Level::Success,
            message,
        }) => (None, Some(message)),
        None => (None, None),
    }
}
