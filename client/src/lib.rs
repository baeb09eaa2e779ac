// client/src/lib.rs

// Screen flows of the hospital portal. Every flow takes the backend as a
// `&dyn HospitalApi` and the signed-in `Session`, checks the role policy
// first and reports back with user-facing wording from `feedback`.

pub mod admin;
pub mod appointments;
pub mod auth;
pub mod booking;
pub mod diagnostics;
pub mod feedback;
pub mod fetch;
pub mod lookup;
pub mod profile;
pub mod records;
pub mod staff;

pub use feedback::{Notice, ScreenError, ScreenResult};
pub use fetch::{Loadable, Resource};
pub use lookup::Resolved;
