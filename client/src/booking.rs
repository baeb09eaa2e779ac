// client/src/booking.rs

use chrono::NaiveDate;
use log::info;
use models::errors::ApiError;
use models::medical::{Role, UserProfile};
use models::validation::BookingForm;
use rest_api::HospitalApi;
use security::{Action, Session};

use crate::feedback::{
    Notice, ScreenError, ScreenResult, APPOINTMENT_CREATED, FETCH_DOCTORS_FAILED, GENERIC_ERROR,
};

/// One entry of the doctor picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoctorChoice {
    pub id: String,
    pub label: String,
}

impl From<&UserProfile> for DoctorChoice {
    fn from(doctor: &UserProfile) -> Self {
        DoctorChoice { id: doctor.id.clone(), label: doctor.doctor_label() }
    }
}

/// Doctors a patient can book with. Staff and admin accounts share the
/// doctors directory and are left out.
pub async fn doctor_choices(
    api: &dyn HospitalApi,
    session: &Session,
) -> ScreenResult<Vec<DoctorChoice>> {
    session.guard(Action::ListDoctors).map_err(ScreenError::with(FETCH_DOCTORS_FAILED))?;
    let doctors = api
        .list_doctors()
        .await
        .map_err(ScreenError::with(FETCH_DOCTORS_FAILED))?;
    Ok(doctors
        .iter()
        .filter(|d| d.role == Role::Doctor)
        .map(DoctorChoice::from)
        .collect())
}

/// Books an appointment for the signed-in patient. `today` is the caller's
/// calendar date, against which past dates are rejected.
pub async fn book(
    api: &dyn HospitalApi,
    session: &Session,
    form: &BookingForm,
    today: NaiveDate,
) -> ScreenResult<Notice> {
    session.guard(Action::BookAppointment).map_err(ScreenError::with(GENERIC_ERROR))?;
    let appointment = form
        .validate(session.user_id(), today)
        .map_err(|errors| ScreenError::from_api(GENERIC_ERROR, ApiError::Invalid(errors)))?;

    api.create_appointment(&appointment)
        .await
        .map_err(ScreenError::with(GENERIC_ERROR))?;
    info!(
        "{} booked {} on {} at {}",
        session.user_id(),
        appointment.doctor_id,
        form.date,
        form.time.format("%H:%M")
    );
    Ok(Notice::new(APPOINTMENT_CREATED))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{sign_in, Portal};
    use chrono::NaiveTime;
    use models::medical::AppointmentQuery;
    use rest_api::{Failure, InMemoryHospital};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2030, 5, 20).unwrap()
    }

    fn form(date: NaiveDate, hour: u32) -> BookingForm {
        BookingForm {
            doctor_id: Some("doc-2".into()),
            date,
            time: NaiveTime::from_hms_opt(hour, 0, 0).unwrap(),
            reason: "Knee pain".into(),
        }
    }

    async fn patient(api: &InMemoryHospital) -> Session {
        sign_in(api, Portal::Patient, "ann@patients.test", "patient123").await.unwrap()
    }

    #[tokio::test]
    async fn picker_lists_only_doctors() {
        let api = InMemoryHospital::seeded();
        let session = patient(&api).await;
        let choices = doctor_choices(&api, &session).await.unwrap();
        assert_eq!(choices.len(), 2);
        assert_eq!(choices[0].label, "Gregory House (Diagnostics)");
    }

    #[tokio::test]
    async fn picker_failure_message() {
        let api = InMemoryHospital::seeded();
        let session = patient(&api).await;
        api.fail("list_doctors", Failure::Network).await;
        let err = doctor_choices(&api, &session).await.unwrap_err();
        assert_eq!(err.message, FETCH_DOCTORS_FAILED);
    }

    #[tokio::test]
    async fn books_unconfirmed_appointment() {
        let api = InMemoryHospital::seeded();
        let session = patient(&api).await;
        let notice = book(&api, &session, &form(today(), 18), today()).await.unwrap();
        assert_eq!(notice.message, APPOINTMENT_CREATED);

        let mine = api.list_appointments(&AppointmentQuery::for_patient("pat-1")).await.unwrap();
        let booked = mine.iter().find(|a| a.doctor_id == "doc-2").unwrap();
        assert!(!booked.status.is_confirmed());
        assert_eq!(booked.subject, "Knee pain");
    }

    #[tokio::test]
    async fn past_date_is_rejected_locally() {
        let api = InMemoryHospital::seeded();
        let session = patient(&api).await;
        let yesterday = today().pred_opt().unwrap();
        let err = book(&api, &session, &form(yesterday, 10), today()).await.unwrap_err();
        assert_eq!(err.message, "You cannot select a date in the past.");
        assert!(!api.calls().await.contains(&"create_appointment".to_string()));
    }

    #[tokio::test]
    async fn time_outside_opening_hours() {
        let api = InMemoryHospital::seeded();
        let session = patient(&api).await;
        let err = book(&api, &session, &form(today(), 8), today()).await.unwrap_err();
        assert_eq!(err.message, "Please select a time between 9 AM and 6 PM.");
    }

    #[tokio::test]
    async fn doctors_cannot_book() {
        let api = InMemoryHospital::seeded();
        let doctor = sign_in(&api, Portal::Doctor, "house@hospital.test", "doctor123")
            .await
            .unwrap();
        let err = book(&api, &doctor, &form(today(), 10), today()).await.unwrap_err();
        assert!(matches!(err.cause, ApiError::Forbidden(_)));
        assert!(!api.calls().await.contains(&"create_appointment".to_string()));
    }
}
