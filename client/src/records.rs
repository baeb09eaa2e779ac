// client/src/records.rs

// Closing a confirmed appointment. Either a plain medical record is written,
// or the patient is hospitalized: record, bed, room occupancy and removal of
// the appointment, in that order. The services share no transaction, so a
// failed write undoes the earlier ones itself.

use chrono::NaiveDate;
use log::{error, info, warn};
use models::errors::{ApiError, FormErrors};
use models::medical::{Appointment, BedAssignment, NewMedicalRecord, OccupancyUpdate, Room};
use models::validation::{check_stay, RecordForm};
use models::Field;
use rest_api::HospitalApi;
use security::{Action, Session};
use std::fmt;
use thiserror::Error;

use crate::feedback::{
    assign_bed_message, Notice, ScreenError, ScreenResult, APPOINTMENT_NOT_REMOVED, BED_ASSIGNED,
    BED_FAILED, FETCH_ROOMS_FAILED, NO_BEDS, RECORD_CREATED, RECORD_FAILED,
};

/// Room, bed count and dates of a hospitalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StayRequest {
    pub room_id: String,
    pub beds: u32,
    pub arrival: NaiveDate,
    pub departure: NaiveDate,
}

/// Steps of the hospitalization pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    CreateRecord,
    AssignBed,
    UpdateOccupancy,
    RemoveAppointment,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Step::CreateRecord => write!(f, "create medical record"),
            Step::AssignBed => write!(f, "assign bed"),
            Step::UpdateOccupancy => write!(f, "update room occupancy"),
            Step::RemoveAppointment => write!(f, "remove appointment"),
        }
    }
}

/// A compensating write that itself failed.
#[derive(Debug)]
pub struct CompensationFailure {
    pub step: Step,
    pub error: ApiError,
}

/// A hospitalization that did not go through.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct HospitalizationError {
    pub message: String,
    /// `None` when the request was turned down before anything was written.
    pub failed_step: Option<Step>,
    #[source]
    pub cause: ApiError,
    /// Steps undone, most recent first.
    pub compensated: Vec<Step>,
    pub compensation_failures: Vec<CompensationFailure>,
}

impl HospitalizationError {
    fn rejected(message: impl Into<String>, cause: ApiError) -> Self {
        HospitalizationError {
            message: message.into(),
            failed_step: None,
            cause,
            compensated: Vec::new(),
            compensation_failures: Vec::new(),
        }
    }

    /// True when every completed step was undone.
    pub fn is_clean(&self) -> bool {
        self.compensation_failures.is_empty()
    }
}

impl From<ScreenError> for HospitalizationError {
    fn from(err: ScreenError) -> Self {
        HospitalizationError::rejected(err.message, err.cause)
    }
}

/// A write that has gone through and how to undo it.
#[derive(Debug)]
enum Completed {
    Record { id: Option<String> },
    Bed { id: Option<String> },
    Occupancy { room_id: String, previous: u32 },
}

impl Completed {
    fn step(&self) -> Step {
        match self {
            Completed::Record { .. } => Step::CreateRecord,
            Completed::Bed { .. } => Step::AssignBed,
            Completed::Occupancy { .. } => Step::UpdateOccupancy,
        }
    }

    async fn undo(&self, api: &dyn HospitalApi) -> Result<(), ApiError> {
        match self {
            Completed::Occupancy { room_id, previous } => {
                let restore = OccupancyUpdate { room_id: room_id.clone(), occupied: *previous };
                api.update_occupancy(&restore).await
            }
            Completed::Bed { id: Some(id) } => api.release_bed(id).await,
            Completed::Bed { id: None } => Err(ApiError::Serialization(
                "beds service returned no id for the assignment".to_string(),
            )),
            Completed::Record { id: Some(id) } => api.delete_medical_record(id).await,
            Completed::Record { id: None } => Err(ApiError::Serialization(
                "medical records service returned no id for the record".to_string(),
            )),
        }
    }
}

/// Undoes `completed` in reverse order and builds the error for `step`.
async fn roll_back(
    api: &dyn HospitalApi,
    completed: Vec<Completed>,
    step: Step,
    message: &str,
    cause: ApiError,
) -> HospitalizationError {
    warn!("Hospitalization failed at '{}': {}; rolling back", step, cause);
    let mut compensated = Vec::new();
    let mut compensation_failures = Vec::new();
    for done in completed.iter().rev() {
        match done.undo(api).await {
            Ok(()) => {
                warn!("Rolled back '{}'", done.step());
                compensated.push(done.step());
            }
            Err(error) => {
                error!("Could not roll back '{}': {}", done.step(), error);
                compensation_failures.push(CompensationFailure { step: done.step(), error });
            }
        }
    }
    HospitalizationError {
        message: message.to_string(),
        failed_step: Some(step),
        cause,
        compensated,
        compensation_failures,
    }
}

fn record_for(
    appointment: &Appointment,
    form: &RecordForm,
    hospitalized: bool,
) -> Result<NewMedicalRecord, ApiError> {
    let invoice = form
        .invoice_amount()
        .map_err(|e| ApiError::Invalid(FormErrors::single(Field::Invoice, e)))?;
    Ok(NewMedicalRecord {
        doctor_id: appointment.doctor_id.clone(),
        patient_id: appointment.patient_id.clone(),
        description: appointment.subject.clone(),
        prescription: form.prescription.trim().to_string(),
        invoice,
        hospitalized,
    })
}

fn check_owner(session: &Session, appointment: &Appointment) -> Result<(), ApiError> {
    if appointment.doctor_id != session.user_id() {
        return Err(ApiError::Forbidden(format!(
            "appointment {} belongs to another doctor",
            appointment.id
        )));
    }
    if !appointment.status.is_confirmed() {
        return Err(ApiError::Forbidden(format!(
            "appointment {} is not confirmed",
            appointment.id
        )));
    }
    Ok(())
}

/// Rooms offered by the hospitalization picker.
pub async fn room_choices(api: &dyn HospitalApi, session: &Session) -> ScreenResult<Vec<Room>> {
    session.guard(Action::ViewRooms).map_err(ScreenError::with(FETCH_ROOMS_FAILED))?;
    api.list_rooms().await.map_err(ScreenError::with(FETCH_ROOMS_FAILED))
}

/// Writes a plain medical record and removes the appointment it closes.
/// A failed removal is reported as a warning; the record stands.
pub async fn create_record(
    api: &dyn HospitalApi,
    session: &Session,
    appointment: &Appointment,
    form: &RecordForm,
) -> ScreenResult<Notice> {
    session
        .guard(Action::CreateMedicalRecord)
        .and_then(|_| check_owner(session, appointment))
        .map_err(ScreenError::with(RECORD_FAILED))?;
    let record = record_for(appointment, form, false).map_err(ScreenError::with(RECORD_FAILED))?;

    let created = api
        .create_medical_record(&record)
        .await
        .map_err(ScreenError::with(RECORD_FAILED))?;
    info!(
        "Medical record {} written for appointment {}",
        created.as_deref().unwrap_or("(no id)"),
        appointment.id
    );

    let notice = Notice::new(RECORD_CREATED);
    match api.delete_appointment(&appointment.id).await {
        Ok(()) => Ok(notice),
        Err(e) => {
            warn!("Appointment {} not removed: {}", appointment.id, e);
            Ok(notice.warn(APPOINTMENT_NOT_REMOVED))
        }
    }
}

/// Runs the hospitalization pipeline for `appointment`.
///
/// The room is re-read first; without enough free beds nothing is written.
/// A failure while writing the record, assigning the bed or updating the
/// occupancy undoes the completed steps in reverse order. Removing the
/// appointment comes last and is not undone: if it fails, the patient is
/// hospitalized and the appointment stays listed, which the returned
/// notice reports as a warning.
pub async fn hospitalize(
    api: &dyn HospitalApi,
    session: &Session,
    appointment: &Appointment,
    form: &RecordForm,
    stay: &StayRequest,
) -> Result<Notice, HospitalizationError> {
    session
        .guard(Action::Hospitalize)
        .and_then(|_| check_owner(session, appointment))
        .map_err(ScreenError::with(BED_FAILED))?;
    check_stay(stay.beds, stay.arrival, stay.departure)
        .map_err(|errors| ScreenError::from_api(BED_FAILED, ApiError::Invalid(errors)))?;
    let record = record_for(appointment, form, true).map_err(ScreenError::with(RECORD_FAILED))?;

    let rooms = api.list_rooms().await.map_err(ScreenError::with(BED_FAILED))?;
    let room = rooms
        .into_iter()
        .find(|r| r.id == stay.room_id)
        .ok_or_else(|| {
            let cause = ApiError::NotFound(format!("room {}", stay.room_id));
            HospitalizationError::rejected(BED_FAILED, cause)
        })?;
    if !room.can_take(stay.beds) {
        info!(
            "Room {} has {} free beds, {} requested",
            room.number,
            room.available_beds(),
            stay.beds
        );
        return Err(HospitalizationError::rejected(
            NO_BEDS,
            ApiError::BadRequest(NO_BEDS.to_string()),
        ));
    }

    let mut completed = Vec::new();

    let created = match api.create_medical_record(&record).await {
        Ok(r) => r,
        Err(e) => return Err(roll_back(api, completed, Step::CreateRecord, RECORD_FAILED, e).await),
    };
    completed.push(Completed::Record { id: created.clone() });

    let assignment = BedAssignment::new(
        appointment.doctor_id.clone(),
        room.id.clone(),
        stay.beds,
        stay.arrival,
        stay.departure,
    );
    let bed = match api.assign_bed(&assignment).await {
        Ok(b) => b,
        Err(e) => {
            let message = assign_bed_message(&e);
            return Err(roll_back(api, completed, Step::AssignBed, message, e).await);
        }
    };
    completed.push(Completed::Bed { id: bed });

    let occupancy =
        OccupancyUpdate { room_id: room.id.clone(), occupied: room.occupied + stay.beds };
    if let Err(e) = api.update_occupancy(&occupancy).await {
        // Without a response the update may have been applied.
        if e.is_network() {
            let previous = room.occupied;
            completed.push(Completed::Occupancy { room_id: room.id.clone(), previous });
        }
        return Err(roll_back(api, completed, Step::UpdateOccupancy, BED_FAILED, e).await);
    }

    info!(
        "Patient {} hospitalized in room {} ({} beds, record {})",
        appointment.patient_id,
        room.number,
        stay.beds,
        created.as_deref().unwrap_or("(no id)")
    );

    let notice = Notice::new(BED_ASSIGNED);
    match api.delete_appointment(&appointment.id).await {
        Ok(()) => Ok(notice),
        Err(e) => {
            warn!("Step '{}' failed for {}: {}", Step::RemoveAppointment, appointment.id, e);
            Ok(notice.warn(APPOINTMENT_NOT_REMOVED))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appointments::{confirm, find_confirmed};
    use crate::auth::{sign_in, Portal};
    use rest_api::{Failure, InMemoryHospital};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2030, 2, d).unwrap()
    }

    fn form() -> RecordForm {
        RecordForm { prescription: "Rest and fluids".into(), invoice: "150".into() }
    }

    fn stay(room_id: &str, beds: u32) -> StayRequest {
        StayRequest { room_id: room_id.into(), beds, arrival: day(1), departure: day(4) }
    }

    async fn confirmed(api: &InMemoryHospital) -> (Session, Appointment) {
        let session = sign_in(api, Portal::Doctor, "house@hospital.test", "doctor123")
            .await
            .unwrap();
        confirm(api, &session, "appt-1").await.unwrap();
        let appointment = find_confirmed(api, &session, "appt-1").await.unwrap();
        (session, appointment)
    }

    #[tokio::test]
    async fn plain_record_removes_appointment() {
        let api = InMemoryHospital::seeded();
        let (session, appointment) = confirmed(&api).await;

        let notice = create_record(&api, &session, &appointment, &form()).await.unwrap();
        assert_eq!(notice.message, RECORD_CREATED);
        assert!(notice.warnings.is_empty());

        let records = api.medical_records().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].description, "Persistent cough");
        assert_eq!(records[0].invoice, 150.0);
        assert!(!records[0].hospitalized);
        assert!(api.appointments().await.is_empty());
    }

    #[tokio::test]
    async fn failed_removal_is_a_warning() {
        let api = InMemoryHospital::seeded();
        let (session, appointment) = confirmed(&api).await;
        api.fail("delete_appointment", Failure::Status(500, "x".into())).await;

        let notice = create_record(&api, &session, &appointment, &form()).await.unwrap();
        assert_eq!(notice.warnings, vec![APPOINTMENT_NOT_REMOVED.to_string()]);
        assert_eq!(api.medical_records().await.len(), 1);
    }

    #[tokio::test]
    async fn failed_record_write() {
        let api = InMemoryHospital::seeded();
        let (session, appointment) = confirmed(&api).await;
        api.fail("create_medical_record", Failure::Network).await;
        let err = create_record(&api, &session, &appointment, &form()).await.unwrap_err();
        assert_eq!(err.message, RECORD_FAILED);
        assert_eq!(api.appointments().await.len(), 1);
    }

    #[tokio::test]
    async fn bad_invoice_is_rejected() {
        let api = InMemoryHospital::seeded();
        let (session, appointment) = confirmed(&api).await;
        let bad = RecordForm { prescription: String::new(), invoice: "-5".into() };
        let err = create_record(&api, &session, &appointment, &bad).await.unwrap_err();
        assert!(err.form_errors().unwrap().has(Field::Invoice));
    }

    #[tokio::test]
    async fn hospitalization_runs_every_step() {
        let api = InMemoryHospital::seeded();
        let (session, appointment) = confirmed(&api).await;

        let notice = hospitalize(&api, &session, &appointment, &form(), &stay("room-101", 2))
            .await
            .unwrap();
        assert_eq!(notice.message, BED_ASSIGNED);
        assert!(notice.warnings.is_empty());

        assert_eq!(api.room("room-101").await.unwrap().occupied, 3);
        let records = api.medical_records().await;
        assert_eq!(records.len(), 1);
        assert!(records[0].hospitalized);
        let beds = api.bed_assignments().await;
        assert_eq!(beds.len(), 1);
        assert_eq!(beds[0].doctor_id, "doc-1");
        assert_eq!(beds[0].beds, 2);
        assert!(api.appointments().await.is_empty());
    }

    #[tokio::test]
    async fn full_room_writes_nothing() {
        let api = InMemoryHospital::seeded();
        let (session, appointment) = confirmed(&api).await;

        let err = hospitalize(&api, &session, &appointment, &form(), &stay("room-102", 1))
            .await
            .unwrap_err();
        assert_eq!(err.message, NO_BEDS);
        assert_eq!(err.failed_step, None);
        assert!(api.medical_records().await.is_empty());
        assert!(!api.calls().await.contains(&"create_medical_record".to_string()));
    }

    #[tokio::test]
    async fn bed_failure_removes_record() {
        let api = InMemoryHospital::seeded();
        let (session, appointment) = confirmed(&api).await;
        api.fail("assign_bed", Failure::Status(400, NO_BEDS.into())).await;

        let err = hospitalize(&api, &session, &appointment, &form(), &stay("room-101", 1))
            .await
            .unwrap_err();
        assert_eq!(err.message, NO_BEDS);
        assert_eq!(err.failed_step, Some(Step::AssignBed));
        assert_eq!(err.compensated, vec![Step::CreateRecord]);
        assert!(err.is_clean());
        assert!(api.medical_records().await.is_empty());
        assert_eq!(api.room("room-101").await.unwrap().occupied, 1);
        assert_eq!(api.appointments().await.len(), 1);
    }

    #[tokio::test]
    async fn occupancy_failure_releases_bed_and_record() {
        let api = InMemoryHospital::seeded();
        let (session, appointment) = confirmed(&api).await;
        api.fail("update_occupancy", Failure::Status(500, "write conflict".into())).await;

        let err = hospitalize(&api, &session, &appointment, &form(), &stay("room-101", 2))
            .await
            .unwrap_err();
        assert_eq!(err.message, BED_FAILED);
        assert_eq!(err.failed_step, Some(Step::UpdateOccupancy));
        assert_eq!(err.compensated, vec![Step::AssignBed, Step::CreateRecord]);
        assert!(api.medical_records().await.is_empty());
        assert!(api.bed_assignments().await.is_empty());
        assert_eq!(api.room("room-101").await.unwrap().occupied, 1);
    }

    #[tokio::test]
    async fn lost_occupancy_response_restores_previous_count() {
        let api = InMemoryHospital::seeded();
        let (session, appointment) = confirmed(&api).await;
        api.fail("update_occupancy", Failure::Network).await;

        let err = hospitalize(&api, &session, &appointment, &form(), &stay("room-101", 2))
            .await
            .unwrap_err();
        // Restoring goes through the same endpoint, which is still failing.
        assert_eq!(err.compensated, vec![Step::AssignBed, Step::CreateRecord]);
        assert_eq!(err.compensation_failures.len(), 1);
        assert_eq!(err.compensation_failures[0].step, Step::UpdateOccupancy);
        assert!(!err.is_clean());
        assert!(api.medical_records().await.is_empty());
    }

    #[tokio::test]
    async fn failed_removal_after_hospitalization_is_kept() {
        let api = InMemoryHospital::seeded();
        let (session, appointment) = confirmed(&api).await;
        api.fail("delete_appointment", Failure::Network).await;

        let notice = hospitalize(&api, &session, &appointment, &form(), &stay("room-101", 1))
            .await
            .unwrap();
        assert_eq!(notice.message, BED_ASSIGNED);
        assert_eq!(notice.warnings, vec![APPOINTMENT_NOT_REMOVED.to_string()]);
        assert_eq!(api.room("room-101").await.unwrap().occupied, 2);
        assert_eq!(api.medical_records().await.len(), 1);
        assert_eq!(api.appointments().await.len(), 1);
    }

    #[tokio::test]
    async fn records_without_ids_still_close_the_appointment() {
        let api = InMemoryHospital::seeded();
        let (session, appointment) = confirmed(&api).await;
        api.withhold_ids().await;

        let notice = create_record(&api, &session, &appointment, &form()).await.unwrap();
        assert_eq!(notice.message, RECORD_CREATED);
        assert_eq!(api.medical_records().await.len(), 1);
        assert!(api.appointments().await.is_empty());
    }

    #[tokio::test]
    async fn hospitalization_without_ids_completes() {
        let api = InMemoryHospital::seeded();
        let (session, appointment) = confirmed(&api).await;
        api.withhold_ids().await;

        let notice = hospitalize(&api, &session, &appointment, &form(), &stay("room-101", 1))
            .await
            .unwrap();
        assert_eq!(notice.message, BED_ASSIGNED);
        assert_eq!(api.room("room-101").await.unwrap().occupied, 2);
    }

    #[tokio::test]
    async fn unknown_ids_are_reported_as_uncompensated() {
        let api = InMemoryHospital::seeded();
        let (session, appointment) = confirmed(&api).await;
        api.withhold_ids().await;
        api.fail("update_occupancy", Failure::Status(500, "write conflict".into())).await;

        let err = hospitalize(&api, &session, &appointment, &form(), &stay("room-101", 1))
            .await
            .unwrap_err();
        assert_eq!(err.failed_step, Some(Step::UpdateOccupancy));
        assert!(err.compensated.is_empty());
        let steps: Vec<Step> = err.compensation_failures.iter().map(|f| f.step).collect();
        assert_eq!(steps, vec![Step::AssignBed, Step::CreateRecord]);
        assert!(!err.is_clean());
    }

    #[tokio::test]
    async fn stay_dates_are_checked() {
        let api = InMemoryHospital::seeded();
        let (session, appointment) = confirmed(&api).await;
        let backwards =
            StayRequest { room_id: "room-101".into(), beds: 1, arrival: day(5), departure: day(2) };
        let err = hospitalize(&api, &session, &appointment, &form(), &backwards).await.unwrap_err();
        assert_eq!(err.message, "Departure date cannot be before the arrival date.");
    }

    #[tokio::test]
    async fn unconfirmed_appointment_cannot_be_closed() {
        let api = InMemoryHospital::seeded();
        let session = sign_in(&api, Portal::Doctor, "house@hospital.test", "doctor123")
            .await
            .unwrap();
        let pending = api.appointments().await.remove(0);
        let err = create_record(&api, &session, &pending, &form()).await.unwrap_err();
        assert!(matches!(err.cause, ApiError::Forbidden(_)));
    }
}
