mod middleware;
mod session;
mod token;

pub use middleware::{AuthError, RequireUser};
pub use session::{SessionValidationError, ValidatedSession, extract_token_from_header, validate_session};
pub use token::{TokenGenerator, parse_token};
