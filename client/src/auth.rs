// client/src/auth.rs

use log::{info, warn};
use models::errors::ApiError;
use models::medical::Role;
use models::validation::{validate_credentials, DoctorSignUpForm, PatientSignUpForm};
use rest_api::{Directory, HospitalApi};
use security::{Screen, Session};

use crate::feedback::{
    sign_in_message, Notice, ScreenError, ScreenResult, ACCOUNT_CREATED, DOCTOR_NOT_FOUND,
    FIX_FIELDS, GENERIC_ERROR, PATIENT_NOT_FOUND,
};

/// The two sign-in screens. Doctors, staff and admins share one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Portal {
    Doctor,
    Patient,
}

impl Portal {
    pub fn directory(self) -> Directory {
        match self {
            Portal::Doctor => Directory::Doctors,
            Portal::Patient => Directory::Patients,
        }
    }

    pub fn sign_in_screen(self) -> Screen {
        match self {
            Portal::Doctor => Screen::DoctorSignIn,
            Portal::Patient => Screen::PatientSignIn,
        }
    }

    fn not_found(self) -> &'static str {
        match self {
            Portal::Doctor => DOCTOR_NOT_FOUND,
            Portal::Patient => PATIENT_NOT_FOUND,
        }
    }
}

/// Signs in through `portal`. The returned session's role picks the home
/// screen.
pub async fn sign_in(
    api: &dyn HospitalApi,
    portal: Portal,
    email: &str,
    password: &str,
) -> ScreenResult<Session> {
    let fail = |cause: ApiError| {
        ScreenError::new(sign_in_message(portal.not_found(), &cause), cause)
    };

    let credentials = validate_credentials(email.trim(), password).map_err(|e| fail(e.into()))?;
    let mut user = api
        .login(portal.directory(), &credentials)
        .await
        .map_err(|e| {
            warn!("Sign-in for {} failed: {}", credentials.email, e);
            fail(e)
        })?;

    // The clients service stores no role.
    if portal == Portal::Patient {
        user.role = Role::Patient;
    }
    info!("{} signed in as {}", user.email, user.role);
    Ok(Session::new(user))
}

pub async fn sign_up_doctor(
    api: &dyn HospitalApi,
    form: &DoctorSignUpForm,
) -> ScreenResult<Notice> {
    let registration = form
        .validate()
        .map_err(|errors| ScreenError::new(FIX_FIELDS, ApiError::Invalid(errors)))?;
    api.register_doctor(&registration)
        .await
        .map_err(|e| ScreenError::new(GENERIC_ERROR, e))?;
    info!("Registered doctor {}", registration.email);
    Ok(Notice::new(ACCOUNT_CREATED).then(Portal::Doctor.sign_in_screen()))
}

pub async fn sign_up_patient(
    api: &dyn HospitalApi,
    form: &PatientSignUpForm,
) -> ScreenResult<Notice> {
    let registration = form
        .validate()
        .map_err(|errors| ScreenError::new(FIX_FIELDS, ApiError::Invalid(errors)))?;
    api.register_patient(&registration)
        .await
        .map_err(|e| ScreenError::new(GENERIC_ERROR, e))?;
    info!("Registered patient {}", registration.email);
    Ok(Notice::new(ACCOUNT_CREATED).then(Portal::Patient.sign_in_screen()))
}
