// models/src/lib.rs

// Shared data model of the hospital portal: the JSON shapes exchanged with
// the REST services, the client-side form checks, and the error types every
// other crate in the workspace returns.

pub mod errors;
pub mod medical;
pub mod validation;

pub use errors::{ApiError, ApiResult, Field, FieldError, FormErrors, ValidationError};
pub use medical::*;
