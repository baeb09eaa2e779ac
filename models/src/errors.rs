// models/src/errors.rs

use std::fmt;

pub use thiserror::Error;

/// Every failure a portal operation can surface. Non-2xx responses are
/// classified by status code; everything else maps onto one of the
/// transport, decoding or local-check variants.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("not found: {0}")]
    NotFound(String), // HTTP 404
    #[error("unauthorized: {0}")]
    Unauthorized(String), // HTTP 401
    #[error("bad request: {0}")]
    BadRequest(String), // HTTP 400
    #[error("service responded with status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("network error: {0}")]
    Network(String), // No response at all (refused, timed out, DNS, ...)
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("forbidden: {0}")]
    Forbidden(String), // Rejected locally by the role policy
    #[error("configuration error: {0}")]
    Config(String),
    #[error(transparent)]
    Invalid(#[from] FormErrors),
}

impl ApiError {
    /// Builds an error from a non-success status and the raw response body.
    /// The services answer `{"error": "..."}` or `{"message": "..."}`; when the
    /// body is neither, the trimmed text (or the status itself) is used.
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = extract_message(body).unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                format!("HTTP {}", status)
            } else {
                trimmed.to_string()
            }
        });

        match status {
            400 => ApiError::BadRequest(message),
            401 => ApiError::Unauthorized(message),
            404 => ApiError::NotFound(message),
            _ => ApiError::Status { status, message },
        }
    }

    /// The HTTP status this error was classified from, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::NotFound(_) => Some(404),
            ApiError::Unauthorized(_) => Some(401),
            ApiError::BadRequest(_) => Some(400),
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound(_))
    }

    /// True when the request never produced a response.
    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::Network(_))
    }

    /// The server-provided message for status errors.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::NotFound(m)
            | ApiError::Unauthorized(m)
            | ApiError::BadRequest(m)
            | ApiError::Status { message: m, .. } => Some(m.as_str()),
            _ => None,
        }
    }
}

fn extract_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["error", "message"]
        .iter()
        .find_map(|key| value.get(key).and_then(|v| v.as_str()))
        .map(str::to_string)
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Serialization(format!("JSON processing error: {}", err))
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Invalid(FormErrors::single(Field::Form, err))
    }
}

/// A single failed form check. The display strings are the exact messages
/// shown next to the offending field.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} must be between {min} and {max} characters.")]
    Length { field: &'static str, min: usize, max: usize },
    #[error("Password must be at least 6 characters and contain a number.")]
    WeakPassword,
    #[error("Passwords do not match.")]
    PasswordMismatch,
    #[error("{0} is required.")]
    Required(&'static str),
    #[error("Please fill in both fields.")]
    MissingCredentials,
    #[error("You cannot select a date in the past.")]
    DateInPast,
    #[error("Please select a time between 9 AM and 6 PM.")]
    TimeOutsideWindow,
    #[error("Please fill out all fields")]
    IncompleteAppointment,
    #[error("Please select both a day and a shift.")]
    IncompleteAvailability,
    #[error("Departure date cannot be before the arrival date.")]
    DepartureBeforeArrival,
    #[error("At least one bed must be requested.")]
    NoBedsRequested,
    #[error("Occupied beds cannot exceed the number of beds.")]
    OccupancyExceedsCapacity,
    #[error("invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: String },
}

/// Form fields that can carry a validation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    FamilyName,
    Email,
    Tel,
    Address,
    Specialty,
    Password,
    Confirmation,
    Doctor,
    Date,
    Time,
    Reason,
    Day,
    Shift,
    Room,
    Beds,
    Invoice,
    /// Errors that belong to the form as a whole.
    Form,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub error: ValidationError,
}

/// All failed checks of one form submission, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    errors: Vec<FieldError>,
}

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: Field, error: ValidationError) -> Self {
        let mut errors = Self::new();
        errors.push(field, error);
        errors
    }

    pub fn push(&mut self, field: Field, error: ValidationError) {
        self.errors.push(FieldError { field, error });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// The message attached to `field`, if that field failed.
    pub fn get(&self, field: Field) -> Option<&ValidationError> {
        self.errors.iter().find(|e| e.field == field).map(|e| &e.error)
    }

    pub fn has(&self, field: Field) -> bool {
        self.get(field).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// `Ok(value)` when no check failed.
    pub fn into_result<T>(self, value: T) -> Result<T, FormErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let messages: Vec<String> = self.errors.iter().map(|e| e.error.to_string()).collect();
        write!(f, "{}", messages.join(" "))
    }
}

impl std::error::Error for FormErrors {}

/// A type alias for a `Result` that returns an `ApiError` on failure.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_statuses() {
        assert!(matches!(ApiError::from_response(404, ""), ApiError::NotFound(_)));
        assert!(matches!(ApiError::from_response(401, ""), ApiError::Unauthorized(_)));
        assert!(matches!(ApiError::from_response(400, ""), ApiError::BadRequest(_)));
        assert!(matches!(
            ApiError::from_response(503, "down"),
            ApiError::Status { status: 503, .. }
        ));
    }

    #[test]
    fn takes_message_from_json_body() {
        let err = ApiError::from_response(400, r#"{"error":"No beds available"}"#);
        assert_eq!(err.server_message(), Some("No beds available"));

        let err = ApiError::from_response(500, r#"{"message":"boom"}"#);
        assert_eq!(err.server_message(), Some("boom"));
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn falls_back_to_status_text() {
        let err = ApiError::from_response(404, "   ");
        assert_eq!(err.server_message(), Some("HTTP 404"));
    }

    #[test]
    fn form_errors_collect_in_order() {
        let mut errors = FormErrors::new();
        errors.push(Field::Password, ValidationError::WeakPassword);
        errors.push(Field::Confirmation, ValidationError::PasswordMismatch);

        assert_eq!(errors.len(), 2);
        assert!(errors.has(Field::Password));
        assert!(!errors.has(Field::Name));
        assert_eq!(
            errors.to_string(),
            "Password must be at least 6 characters and contain a number. Passwords do not match."
        );
        assert!(errors.into_result(()).is_err());
    }
}
