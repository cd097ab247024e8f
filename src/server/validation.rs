use crate::server::response::ApiError;

const MAX_TITLE_LEN: usize = 200;
const MAX_NAME_LEN: usize = 100;
const MIN_PASSWORD_LEN: usize = 6;

fn validate_non_empty(value: &str, entity: &str, max_len: usize) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{entity} cannot be empty"));
    }
    if value.len() > max_len {
        return Err(format!("{entity} cannot exceed {max_len} characters"));
    }
    Ok(())
}

pub fn validate_set_title(title: &str) -> Result<(), ApiError> {
    validate_non_empty(title, "Set title", MAX_TITLE_LEN).map_err(ApiError::bad_request)
}

pub fn validate_display_name(name: &str) -> Result<(), ApiError> {
    validate_non_empty(name, "Name", MAX_NAME_LEN).map_err(ApiError::bad_request)
}

pub fn validate_email(email: &str) -> Result<(), ApiError> {
    let trimmed = email.trim();
    if trimmed.is_empty() {
        return Err(ApiError::bad_request("Email cannot be empty"));
    }
    // Deliverability is the mail server's problem; we only reject obvious junk.
    let valid = match trimmed.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.ends_with('.'),
        None => false,
    };
    if !valid {
        return Err(ApiError::bad_request("Invalid email address"));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), ApiError> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::bad_request(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}
