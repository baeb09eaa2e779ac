// client/src/staff.rs

use log::info;
use models::errors::ApiError;
use models::medical::{Availability, Shift, Weekday};
use models::validation::validate_availability;
use rest_api::HospitalApi;
use security::{Action, Session};

use crate::feedback::*;

/// Declares a shift for the signed-in staff member. The slot starts
/// unconfirmed until an admin reviews it.
pub async fn declare(
    api: &dyn HospitalApi,
    session: &Session,
    day: Option<Weekday>,
    shift: Option<Shift>,
) -> ScreenResult<Notice> {
    session
        .guard(Action::DeclareAvailability)
        .map_err(ScreenError::with(AVAILABILITY_FAILED))?;
    let slot = validate_availability(session.user_id(), day, shift)
        .map_err(|e| ScreenError::from_api(AVAILABILITY_FAILED, ApiError::from(e)))?;
    api.add_availability(&slot)
        .await
        .map_err(ScreenError::with(AVAILABILITY_FAILED))?;
    info!("{} declared {} {}", session.user_id(), slot.day, slot.shift);
    Ok(Notice::new(AVAILABILITY_ADDED))
}

/// The signed-in staff member's own declarations.
pub async fn my_availability(
    api: &dyn HospitalApi,
    session: &Session,
) -> ScreenResult<Vec<Availability>> {
    session
        .guard(Action::ViewOwnAvailability)
        .map_err(ScreenError::with(FETCH_OWN_AVAILABILITY_FAILED))?;
    api.staff_availability(session.user_id())
        .await
        .map_err(ScreenError::with(FETCH_OWN_AVAILABILITY_FAILED))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{sign_in, Portal};
    use rest_api::{Failure, InMemoryHospital};

    async fn nurse(api: &InMemoryHospital) -> Session {
        sign_in(api, Portal::Doctor, "carla@hospital.test", "staff123").await.unwrap()
    }

    #[tokio::test]
    async fn declared_slot_is_listed_unconfirmed() {
        let api = InMemoryHospital::seeded();
        let session = nurse(&api).await;

        let notice = declare(&api, &session, Some(Weekday::Friday), Some(Shift::Night))
            .await
            .unwrap();
        assert_eq!(notice.message, AVAILABILITY_ADDED);

        let mine = my_availability(&api, &session).await.unwrap();
        assert_eq!(mine.len(), 2);
        let friday = mine.iter().find(|s| s.day == Weekday::Friday).unwrap();
        assert_eq!(friday.status_label(), "Not Confirmed");
    }

    #[tokio::test]
    async fn day_and_shift_are_both_required() {
        let api = InMemoryHospital::seeded();
        let session = nurse(&api).await;
        let err = declare(&api, &session, Some(Weekday::Monday), None).await.unwrap_err();
        assert_eq!(err.message, "Please select both a day and a shift.");
        assert!(!api.calls().await.contains(&"add_availability".to_string()));
    }

    #[tokio::test]
    async fn service_failures() {
        let api = InMemoryHospital::seeded();
        let session = nurse(&api).await;
        api.fail("add_availability", Failure::Network).await;
        let err = declare(&api, &session, Some(Weekday::Monday), Some(Shift::Morning))
            .await
            .unwrap_err();
        assert_eq!(err.message, AVAILABILITY_FAILED);

        api.fail("staff_availability", Failure::Status(500, "down".into())).await;
        let err = my_availability(&api, &session).await.unwrap_err();
        assert_eq!(err.message, FETCH_OWN_AVAILABILITY_FAILED);
    }

    #[tokio::test]
    async fn patients_cannot_declare() {
        let api = InMemoryHospital::seeded();
        let patient = sign_in(&api, Portal::Patient, "ann@patients.test", "patient123")
            .await
            .unwrap();
        let err = declare(&api, &patient, Some(Weekday::Monday), Some(Shift::Morning))
            .await
            .unwrap_err();
        assert!(matches!(err.cause, ApiError::Forbidden(_)));
    }
}
