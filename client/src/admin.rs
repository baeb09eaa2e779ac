// client/src/admin.rs

use log::info;
use models::errors::ApiError;
use models::medical::{Availability, MedicalRecord, ProfileChanges, Room, UserProfile};
use models::validation::{validate_new_room, validate_room_update};
use rest_api::{Directory, HospitalApi};
use security::{Action, Session};
use std::future::Future;

use crate::feedback::*;
use crate::fetch::{Loadable, Resource};
use crate::lookup::{name_of, resolve_names, Resolved};

/// Result of an admin action: its notice and the list as re-read afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Refreshed<T> {
    pub notice: Notice,
    pub list: Loadable<Vec<T>>,
}

async fn refreshed<T, F>(notice: Notice, name: &'static str, fetch: F) -> Refreshed<T>
where
    T: Clone,
    F: Future<Output = ScreenResult<Vec<T>>>,
{
    let mut resource = Resource::new(name);
    resource.load(fetch).await;
    Refreshed { notice, list: resource.state().clone() }
}

fn guard(session: &Session, action: Action, fallback: &'static str) -> ScreenResult<()> {
    session.guard(action).map_err(ScreenError::with(fallback))
}

// Rooms

pub async fn rooms(api: &dyn HospitalApi, session: &Session) -> ScreenResult<Vec<Room>> {
    guard(session, Action::ManageRooms, FETCH_ROOMS_FAILED)?;
    api.list_rooms().await.map_err(ScreenError::with(FETCH_ROOMS_FAILED))
}

pub async fn add_room(
    api: &dyn HospitalApi,
    session: &Session,
    number: u32,
    beds: u32,
) -> ScreenResult<Refreshed<Room>> {
    guard(session, Action::ManageRooms, ROOM_ADD_FAILED)?;
    let room = validate_new_room(number, beds)
        .map_err(|errors| ScreenError::from_api(ROOM_ADD_FAILED, ApiError::Invalid(errors)))?;
    api.add_room(&room)
        .await
        .map_err(|e| ScreenError::new(add_room_message(&e), e))?;
    info!("Room {} added with {} beds", number, beds);
    Ok(refreshed(Notice::new(ROOM_ADDED), "rooms", rooms(api, session)).await)
}

pub async fn update_room(
    api: &dyn HospitalApi,
    session: &Session,
    room_id: &str,
    beds: u32,
    occupied: u32,
) -> ScreenResult<Refreshed<Room>> {
    guard(session, Action::ManageRooms, ROOM_UPDATE_FAILED)?;
    let update = validate_room_update(room_id, beds, occupied)
        .map_err(|errors| ScreenError::from_api(ROOM_UPDATE_FAILED, ApiError::Invalid(errors)))?;
    api.update_room(&update)
        .await
        .map_err(ScreenError::with(ROOM_UPDATE_FAILED))?;
    Ok(refreshed(Notice::new(ROOM_UPDATED), "rooms", rooms(api, session)).await)
}

pub async fn delete_room(
    api: &dyn HospitalApi,
    session: &Session,
    room_id: &str,
) -> ScreenResult<Refreshed<Room>> {
    guard(session, Action::ManageRooms, ROOM_DELETE_FAILED)?;
    api.delete_room(room_id)
        .await
        .map_err(ScreenError::with(ROOM_DELETE_FAILED))?;
    info!("Room {} deleted", room_id);
    Ok(refreshed(Notice::new(ROOM_DELETED), "rooms", rooms(api, session)).await)
}

// Doctors

/// Every account of the doctors directory: doctors, staff and admins.
pub async fn personnel(api: &dyn HospitalApi, session: &Session) -> ScreenResult<Vec<UserProfile>> {
    guard(session, Action::ManageDoctors, FETCH_DOCTORS_FAILED)?;
    api.list_doctors().await.map_err(ScreenError::with(FETCH_DOCTORS_FAILED))
}

/// Saves the whole edited record.
pub async fn update_doctor(
    api: &dyn HospitalApi,
    session: &Session,
    doctor: &UserProfile,
) -> ScreenResult<Refreshed<UserProfile>> {
    guard(session, Action::ManageDoctors, DOCTOR_UPDATE_FAILED)?;
    let changes = ProfileChanges::from_profile(doctor)
        .map_err(|e| ScreenError::new(DOCTOR_UPDATE_FAILED, e.into()))?;
    api.update_profile(Directory::Doctors, &doctor.id, &changes)
        .await
        .map_err(ScreenError::with(DOCTOR_UPDATE_FAILED))?;
    Ok(refreshed(Notice::new(DOCTOR_UPDATED), "doctors", personnel(api, session)).await)
}

pub async fn delete_doctor(
    api: &dyn HospitalApi,
    session: &Session,
    doctor_id: &str,
) -> ScreenResult<Refreshed<UserProfile>> {
    guard(session, Action::ManageDoctors, DOCTOR_REMOVE_FAILED)?;
    api.delete_doctor(doctor_id)
        .await
        .map_err(ScreenError::with(DOCTOR_REMOVE_FAILED))?;
    info!("Doctor {} deleted", doctor_id);
    Ok(refreshed(Notice::new(DOCTOR_REMOVED), "doctors", personnel(api, session)).await)
}

// Nurses' availability

#[derive(Debug, Clone, PartialEq)]
pub struct AvailabilityRow {
    pub slot: Availability,
    pub staff: Resolved,
}

pub async fn availability(
    api: &dyn HospitalApi,
    session: &Session,
) -> ScreenResult<Vec<AvailabilityRow>> {
    guard(session, Action::ManageAvailability, FETCH_AVAILABILITY_FAILED)?;
    let slots = api
        .list_availability()
        .await
        .map_err(ScreenError::with(FETCH_AVAILABILITY_FAILED))?;
    let staff_ids = slots.iter().map(|s| s.staff_id.as_str());
    let names = resolve_names(api, Directory::Doctors, staff_ids).await;
    Ok(slots
        .into_iter()
        .map(|slot| {
            let staff = name_of(&names, &slot.staff_id);
            AvailabilityRow { slot, staff }
        })
        .collect())
}

/// Confirms or un-confirms a slot by sending it back whole with the new flag.
pub async fn set_availability_confirmed(
    api: &dyn HospitalApi,
    session: &Session,
    slot_id: &str,
    confirmed: bool,
) -> ScreenResult<Refreshed<AvailabilityRow>> {
    guard(session, Action::ManageAvailability, AVAILABILITY_UPDATE_FAILED)?;
    let slots = api
        .list_availability()
        .await
        .map_err(ScreenError::with(AVAILABILITY_UPDATE_FAILED))?;
    let mut slot = slots
        .into_iter()
        .find(|s| s.id == slot_id)
        .ok_or_else(|| {
            ScreenError::new(AVAILABILITY_UPDATE_FAILED, ApiError::NotFound(slot_id.to_string()))
        })?;
    slot.confirmed = confirmed;
    api.update_availability(&slot)
        .await
        .map_err(ScreenError::with(AVAILABILITY_UPDATE_FAILED))?;
    info!("Availability {} set to {}", slot_id, slot.status_label());
    let notice = Notice::new(AVAILABILITY_UPDATED);
    Ok(refreshed(notice, "availability", availability(api, session)).await)
}

pub async fn delete_availability(
    api: &dyn HospitalApi,
    session: &Session,
    slot_id: &str,
) -> ScreenResult<Refreshed<AvailabilityRow>> {
    guard(session, Action::ManageAvailability, AVAILABILITY_REMOVE_FAILED)?;
    api.delete_availability(slot_id)
        .await
        .map_err(ScreenError::with(AVAILABILITY_REMOVE_FAILED))?;
    let notice = Notice::new(AVAILABILITY_REMOVED);
    Ok(refreshed(notice, "availability", availability(api, session)).await)
}

// Medical records

#[derive(Debug, Clone, PartialEq)]
pub struct RecordRow {
    pub record: MedicalRecord,
    pub doctor: Resolved,
    pub patient: Resolved,
}

impl RecordRow {
    pub fn doctor_label(&self) -> String {
        self.doctor.label(DOCTOR_DELETED)
    }

    pub fn patient_label(&self) -> String {
        self.patient.label(CLIENT_DELETED)
    }
}

/// All medical records with both names resolved; the two directories are
/// queried concurrently.
pub async fn medical_records(
    api: &dyn HospitalApi,
    session: &Session,
) -> ScreenResult<Vec<RecordRow>> {
    guard(session, Action::ManageMedicalRecords, FETCH_RECORDS_FAILED)?;
    let records = api
        .list_medical_records()
        .await
        .map_err(ScreenError::with(FETCH_RECORDS_FAILED))?;
    let (doctors, patients) = futures::join!(
        resolve_names(api, Directory::Doctors, records.iter().map(|r| r.doctor_id.as_str())),
        resolve_names(api, Directory::Patients, records.iter().map(|r| r.patient_id.as_str())),
    );
    Ok(records
        .into_iter()
        .map(|record| {
            let doctor = name_of(&doctors, &record.doctor_id);
            let patient = name_of(&patients, &record.patient_id);
            RecordRow { record, doctor, patient }
        })
        .collect())
}

pub async fn delete_medical_record(
    api: &dyn HospitalApi,
    session: &Session,
    record_id: &str,
) -> ScreenResult<Refreshed<RecordRow>> {
    guard(session, Action::ManageMedicalRecords, RECORD_REMOVE_FAILED)?;
    api.delete_medical_record(record_id)
        .await
        .map_err(ScreenError::with(RECORD_REMOVE_FAILED))?;
    info!("Medical record {} deleted", record_id);
    let notice = Notice::new(RECORD_REMOVED);
    Ok(refreshed(notice, "medical records", medical_records(api, session)).await)
}
