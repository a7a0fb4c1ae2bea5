use axum::http::StatusCode;
use std::fmt;

#[derive(Debug)]
pub enum HabitError {
    Validation(String),
    /// Unknown habit; carries the id as the caller supplied it.
    NotFound(String),
    Persistence(String),
}

impl fmt::Display for HabitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HabitError::Validation(msg) => write!(f, "invalid input: {msg}"),
            HabitError::NotFound(id) => write!(f, "habit {id} not found"),
            HabitError::Persistence(msg) => write!(f, "storage error: {msg}"),
        }
    }
}

impl std::error::Error for HabitError {}

impl From<std::io::Error> for HabitError {
    fn from(err: std::io::Error) -> Self {
        HabitError::Persistence(err.to_string())
    }
}

impl From<serde_json::Error> for HabitError {
    fn from(err: serde_json::Error) -> Self {
        HabitError::Persistence(err.to_string())
    }
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl From<HabitError> for AppError {
    fn from(err: HabitError) -> Self {
        match err {
            HabitError::Validation(_) => Self::bad_request(err.to_string()),
            HabitError::NotFound(_) => Self::not_found(err.to_string()),
            HabitError::Persistence(_) => Self::internal(err),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn habit_errors_map_to_status_codes() {
        let validation: AppError = HabitError::Validation("name is empty".into()).into();
        assert_eq!(validation.status, StatusCode::BAD_REQUEST);

        let missing: AppError = HabitError::NotFound("7".into()).into();
        assert_eq!(missing.status, StatusCode::NOT_FOUND);
        assert_eq!(missing.message, "habit 7 not found");

        let storage: AppError = HabitError::Persistence("disk full".into()).into();
        assert_eq!(storage.status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
