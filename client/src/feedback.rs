// client/src/feedback.rs

// User-facing wording. Flows return `ScreenError` (message plus the
// underlying `ApiError`) or a `Notice`; the text is fixed here so every
// front-end shows the same strings.

use models::errors::{ApiError, FormErrors};
use security::Screen;
use thiserror::Error;

pub const DOCTOR_NOT_FOUND: &str = "Doctor not found. Please check your credentials.";
pub const PATIENT_NOT_FOUND: &str = "Patient not found. Please check your credentials.";
pub const INCORRECT_PASSWORD: &str = "Incorrect password. Please try again.";
pub const CONNECTION_ERROR: &str = "Connection error. Please check your network connection.";
pub const GENERIC_ERROR: &str = "An error occurred. Please try again.";

pub const ACCOUNT_CREATED: &str = "Account created successfully.";
pub const FIX_FIELDS: &str = "Please fill in all fields correctly.";

pub const APPOINTMENT_CREATED: &str = "Appointment successfully created!";
pub const APPOINTMENT_CONFIRMED: &str = "Appointment confirmed.";

pub const RECORD_CREATED: &str = "Medical record created successfully!";
pub const RECORD_FAILED: &str = "Failed to create medical record.";
pub const NO_BEDS: &str = "No beds available";
pub const BED_FAILED: &str = "Failed to assign bed.";
pub const BED_ASSIGNED: &str = "The bed has been assigned successfully!";
pub const APPOINTMENT_NOT_REMOVED: &str =
    "The appointment could not be removed and is still listed.";

pub const ROOM_ADDED: &str = "Room added successfully";
pub const ROOM_EXISTS: &str = "Room number already exists";
pub const ROOM_ADD_FAILED: &str = "Failed to add room";
pub const ROOM_UPDATED: &str = "Room updated successfully";
pub const ROOM_UPDATE_FAILED: &str = "Failed to update room";
pub const ROOM_DELETED: &str = "Room deleted successfully";
pub const ROOM_DELETE_FAILED: &str = "Failed to delete room";

pub const DOCTOR_UPDATED: &str = "Doctor information updated successfully";
pub const DOCTOR_UPDATE_FAILED: &str = "Failed to update doctor information";
pub const DOCTOR_REMOVED: &str = "Doctor deleted successfully";
pub const DOCTOR_REMOVE_FAILED: &str = "Failed to delete doctor";

pub const RECORD_REMOVED: &str = "Medical record deleted successfully";
pub const RECORD_REMOVE_FAILED: &str = "Failed to delete medical record";

pub const AVAILABILITY_UPDATED: &str = "Availability updated";
pub const AVAILABILITY_UPDATE_FAILED: &str = "Failed to update availability";
pub const AVAILABILITY_REMOVED: &str = "Availability deleted";
pub const AVAILABILITY_REMOVE_FAILED: &str = "Failed to delete availability";

pub const DOCTOR_DELETED: &str = "Doctor has been deleted";
pub const CLIENT_DELETED: &str = "Client has been deleted";
pub const UNKNOWN_PERSON: &str = "Unknown";

pub const SAVE_FAILED: &str = "Failed to save changes";

pub const AVAILABILITY_ADDED: &str = "Availability successfully added!";
pub const AVAILABILITY_FAILED: &str = "Error adding availability";

pub const UPLOAD_SUCCEEDED: &str = "Upload Success";
pub const UPLOAD_FAILED: &str = "Upload Failed";
pub const EMPTY_DOCUMENT: &str = "The document is empty.";

pub const FETCH_DOCTORS_FAILED: &str = "Error fetching doctors";
pub const FETCH_APPOINTMENTS_FAILED: &str = "Error fetching appointments";
pub const FETCH_ROOMS_FAILED: &str = "Error fetching rooms";
pub const FETCH_AVAILABILITY_FAILED: &str = "Error fetching availability";
pub const FETCH_RECORDS_FAILED: &str = "Error fetching medical records";
pub const FETCH_OWN_AVAILABILITY_FAILED: &str = "Failed to fetch availability";

/// A failed screen action: the text to show and what caused it.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ScreenError {
    pub message: String,
    #[source]
    pub cause: ApiError,
}

impl ScreenError {
    pub fn new(message: impl Into<String>, cause: ApiError) -> Self {
        ScreenError { message: message.into(), cause }
    }

    /// Uses `fallback` for service failures. Local rejections (role gate,
    /// form checks) keep their own wording.
    pub fn from_api(fallback: &str, cause: ApiError) -> Self {
        let message = match &cause {
            ApiError::Forbidden(_) => cause.to_string(),
            ApiError::Invalid(errors) => errors.to_string(),
            _ => fallback.to_string(),
        };
        ScreenError { message, cause }
    }

    /// Closure form of `from_api` for `map_err`.
    pub fn with(fallback: &'static str) -> impl Fn(ApiError) -> ScreenError {
        move |cause| ScreenError::from_api(fallback, cause)
    }

    /// Per-field messages when the action was rejected by a form check.
    pub fn form_errors(&self) -> Option<&FormErrors> {
        match &self.cause {
            ApiError::Invalid(errors) => Some(errors),
            _ => None,
        }
    }
}

pub type ScreenResult<T> = Result<T, ScreenError>;

/// The outcome of a successful action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    /// Follow-up steps that failed without undoing the action.
    pub warnings: Vec<String>,
    /// Screen the user is sent to next, when the action moves them.
    pub next: Option<Screen>,
}

impl Notice {
    pub fn new(message: impl Into<String>) -> Self {
        Notice { message: message.into(), warnings: Vec::new(), next: None }
    }

    pub fn then(mut self, screen: Screen) -> Self {
        self.next = Some(screen);
        self
    }

    pub fn warn(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }
}

/// Sign-in wording by failure kind. `not_found` differs per portal.
pub fn sign_in_message(not_found: &'static str, err: &ApiError) -> String {
    match err {
        ApiError::NotFound(_) => not_found.to_string(),
        ApiError::Unauthorized(_) => INCORRECT_PASSWORD.to_string(),
        ApiError::Network(_) => CONNECTION_ERROR.to_string(),
        ApiError::Invalid(errors) => errors.to_string(),
        _ => GENERIC_ERROR.to_string(),
    }
}

/// Room creation distinguishes a duplicate number (HTTP 400).
pub fn add_room_message(err: &ApiError) -> &'static str {
    match err {
        ApiError::BadRequest(_) => ROOM_EXISTS,
        _ => ROOM_ADD_FAILED,
    }
}

/// The beds service reports a full room as `{"error": "No beds available"}`.
pub fn assign_bed_message(err: &ApiError) -> &'static str {
    match err.server_message() {
        Some(NO_BEDS) => NO_BEDS,
        _ => BED_FAILED,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::errors::{Field, ValidationError};

    #[test]
    fn sign_in_wording() {
        let nf = ApiError::NotFound("x".into());
        assert_eq!(sign_in_message(DOCTOR_NOT_FOUND, &nf), DOCTOR_NOT_FOUND);
        assert_eq!(sign_in_message(PATIENT_NOT_FOUND, &nf), PATIENT_NOT_FOUND);
        assert_eq!(
            sign_in_message(DOCTOR_NOT_FOUND, &ApiError::Unauthorized("x".into())),
            INCORRECT_PASSWORD
        );
        assert_eq!(
            sign_in_message(DOCTOR_NOT_FOUND, &ApiError::Network("refused".into())),
            CONNECTION_ERROR
        );
        assert_eq!(
            sign_in_message(DOCTOR_NOT_FOUND, &ApiError::from_response(500, "")),
            GENERIC_ERROR
        );
        assert_eq!(
            sign_in_message(DOCTOR_NOT_FOUND, &ValidationError::MissingCredentials.into()),
            "Please fill in both fields."
        );
    }

    #[test]
    fn room_and_bed_wording() {
        assert_eq!(add_room_message(&ApiError::from_response(400, "")), ROOM_EXISTS);
        assert_eq!(add_room_message(&ApiError::from_response(500, "")), ROOM_ADD_FAILED);
        assert_eq!(
            assign_bed_message(&ApiError::from_response(400, r#"{"error":"No beds available"}"#)),
            NO_BEDS
        );
        assert_eq!(assign_bed_message(&ApiError::Network("x".into())), BED_FAILED);
    }

    #[test]
    fn local_rejections_keep_their_text() {
        let err = ScreenError::from_api(
            GENERIC_ERROR,
            ApiError::Invalid(FormErrors::single(Field::Date, ValidationError::DateInPast)),
        );
        assert_eq!(err.message, "You cannot select a date in the past.");
        assert!(err.form_errors().is_some());

        let err = ScreenError::from_api(GENERIC_ERROR, ApiError::from_response(503, ""));
        assert_eq!(err.message, GENERIC_ERROR);
        assert!(err.form_errors().is_none());
    }
}
