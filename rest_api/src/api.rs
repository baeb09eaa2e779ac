// rest_api/src/api.rs

use async_trait::async_trait;
use models::errors::ApiResult;
use models::medical::{
    Appointment, AppointmentQuery, Availability, BedAssignment, Credentials, DoctorRegistration,
    Document, MedicalRecord, NewAppointment, NewAvailability, NewMedicalRecord, NewRoom,
    OccupancyUpdate, PatientRegistration, ProfileChanges, Role, Room, RoomUpdate, UserProfile,
};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use crate::config::Service;

/// The two account directories. Doctors, staff and admins live in the
/// doctors service; patients in the clients service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Directory {
    Doctors,
    Patients,
}

impl Directory {
    pub fn for_role(role: Role) -> Self {
        if role.is_personnel() {
            Directory::Doctors
        } else {
            Directory::Patients
        }
    }

    pub fn service(self) -> Service {
        match self {
            Directory::Doctors => Service::Doctors,
            Directory::Patients => Service::Clients,
        }
    }
}

impl fmt::Display for Directory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Directory::Doctors => write!(f, "doctors"),
            Directory::Patients => write!(f, "patients"),
        }
    }
}

/// Every call the portal makes to the hospital services. `RestClient` speaks
/// HTTP; `InMemoryHospital` keeps the same contract in process memory.
#[async_trait]
pub trait HospitalApi: Send + Sync + 'static {
    async fn register_doctor(&self, registration: &DoctorRegistration) -> ApiResult<()>;
    async fn register_patient(&self, registration: &PatientRegistration) -> ApiResult<()>;
    async fn login(
        &self,
        directory: Directory,
        credentials: &Credentials,
    ) -> ApiResult<UserProfile>;
    async fn get_profile(&self, directory: Directory, id: &str) -> ApiResult<UserProfile>;
    async fn update_profile(
        &self,
        directory: Directory,
        id: &str,
        changes: &ProfileChanges,
    ) -> ApiResult<()>;
    async fn list_doctors(&self) -> ApiResult<Vec<UserProfile>>;
    async fn delete_doctor(&self, id: &str) -> ApiResult<()>;

    async fn create_appointment(&self, appointment: &NewAppointment) -> ApiResult<()>;
    async fn list_appointments(&self, query: &AppointmentQuery) -> ApiResult<Vec<Appointment>>;
    async fn confirm_appointment(&self, id: &str) -> ApiResult<()>;
    async fn delete_appointment(&self, id: &str) -> ApiResult<()>;

    /// Id of the written record, when the service reports one.
    async fn create_medical_record(&self, record: &NewMedicalRecord) -> ApiResult<Option<String>>;
    async fn list_medical_records(&self) -> ApiResult<Vec<MedicalRecord>>;
    async fn delete_medical_record(&self, id: &str) -> ApiResult<()>;

    /// Id of the bed assignment, when the service reports one.
    async fn assign_bed(&self, assignment: &BedAssignment) -> ApiResult<Option<String>>;
    async fn release_bed(&self, id: &str) -> ApiResult<()>;

    async fn list_rooms(&self) -> ApiResult<Vec<Room>>;
    async fn add_room(&self, room: &NewRoom) -> ApiResult<()>;
    async fn update_room(&self, update: &RoomUpdate) -> ApiResult<()>;
    async fn update_occupancy(&self, update: &OccupancyUpdate) -> ApiResult<()>;
    async fn delete_room(&self, id: &str) -> ApiResult<()>;

    async fn add_availability(&self, availability: &NewAvailability) -> ApiResult<()>;
    async fn list_availability(&self) -> ApiResult<Vec<Availability>>;
    async fn staff_availability(&self, staff_id: &str) -> ApiResult<Vec<Availability>>;
    /// Replaces the whole slot, which is how its confirmation flag changes.
    async fn update_availability(&self, availability: &Availability) -> ApiResult<()>;
    async fn delete_availability(&self, id: &str) -> ApiResult<()>;

    /// Sends a document to the diagnostics upload endpoint and returns its
    /// reply as JSON.
    async fn upload_document(&self, document: &Document) -> ApiResult<Value>;
}

pub type SharedApi = Arc<dyn HospitalApi>;
