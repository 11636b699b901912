mod password_reset_code;
mod user;

pub use password_reset_code::PasswordResetCode;
pub use user::User;
