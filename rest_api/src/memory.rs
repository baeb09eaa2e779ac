// rest_api/src/memory.rs

use async_trait::async_trait;
use log::debug;
use models::errors::{ApiError, ApiResult};
use models::medical::{
    Appointment, AppointmentQuery, AppointmentStatus, Availability, BedAssignment, Credentials,
    DoctorRegistration, Document, MedicalRecord, NewAppointment, NewAvailability, NewMedicalRecord,
    NewRoom, OccupancyUpdate, PatientRegistration, ProfileChanges, Role, Room, RoomUpdate, Shift,
    UserProfile, Weekday,
};
use std::collections::HashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::api::{Directory, HospitalApi};

/// How an injected failure surfaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// The service answers with this status and `{"error": message}`.
    Status(u16, String),
    /// No response at all.
    Network,
}

impl Failure {
    fn to_error(&self) -> ApiError {
        match self {
            Failure::Status(status, message) => {
                let body = serde_json::json!({ "error": message });
                ApiError::from_response(*status, &body.to_string())
            }
            Failure::Network => ApiError::Network("connection refused".to_string()),
        }
    }
}

#[derive(Debug, Clone)]
struct Account {
    profile: UserProfile,
    password: String,
}

#[derive(Debug, Default)]
struct State {
    doctors: Vec<Account>,
    patients: Vec<Account>,
    appointments: Vec<Appointment>,
    records: Vec<MedicalRecord>,
    beds: Vec<BedAssignment>,
    rooms: Vec<Room>,
    availability: Vec<Availability>,
    failures: HashMap<String, Failure>,
    uploads: Vec<Document>,
    withhold_ids: bool,
    calls: Vec<String>,
}

impl State {
    /// Records the call and returns the failure injected for it, if any.
    fn enter(&mut self, operation: &str) -> ApiResult<()> {
        debug!("in-memory {}", operation);
        self.calls.push(operation.to_string());
        match self.failures.get(operation) {
            Some(failure) => Err(failure.to_error()),
            None => Ok(()),
        }
    }

    fn reported(&self, id: String) -> Option<String> {
        if self.withhold_ids {
            None
        } else {
            Some(id)
        }
    }

    fn directory(&mut self, directory: Directory) -> &mut Vec<Account> {
        match directory {
            Directory::Doctors => &mut self.doctors,
            Directory::Patients => &mut self.patients,
        }
    }

    fn add_account(
        &mut self,
        directory: Directory,
        profile: UserProfile,
        password: String,
    ) -> ApiResult<()> {
        let accounts = self.directory(directory);
        if accounts.iter().any(|a| a.profile.email.eq_ignore_ascii_case(&profile.email)) {
            return Err(ApiError::BadRequest("Email already exists".to_string()));
        }
        accounts.push(Account { profile, password });
        Ok(())
    }
}

fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

fn not_found(what: &str) -> ApiError {
    ApiError::NotFound(format!("{} not found", what))
}

/// `HospitalApi` backed by process memory, for sandbox sessions and tests.
/// It enforces what the real services enforce (unique emails and room
/// numbers, bed capacity, known ids) and nothing more.
#[derive(Debug, Default)]
pub struct InMemoryHospital {
    state: Mutex<State>,
}

impl InMemoryHospital {
    pub fn new() -> Self {
        Self::default()
    }

    /// A small hospital with one account per role, two rooms and one
    /// pending appointment. Every password is `<role>123`.
    pub fn seeded() -> Self {
        let mut state = State::default();

        let personnel = [
            ("doc-1", "Gregory", "House", "house@hospital.test", Some("Diagnostics"), Role::Doctor),
            ("doc-2", "Meredith", "Grey", "grey@hospital.test", Some("Surgery"), Role::Doctor),
            ("staff-1", "Carla", "Espinosa", "carla@hospital.test", None, Role::Staff),
            ("admin-1", "Lisa", "Cuddy", "cuddy@hospital.test", None, Role::Admin),
        ];
        for (id, name, family, email, specialty, role) in personnel {
            state.doctors.push(Account {
                profile: UserProfile {
                    id: id.to_string(),
                    name: name.to_string(),
                    family_name: family.to_string(),
                    email: email.to_string(),
                    tel: "0100000000".to_string(),
                    address: None,
                    specialty: specialty.map(str::to_string),
                    role,
                },
                password: format!("{}123", role),
            });
        }
        state.patients.push(Account {
            profile: UserProfile {
                id: "pat-1".to_string(),
                name: "Ann".to_string(),
                family_name: "Perkins".to_string(),
                email: "ann@patients.test".to_string(),
                tel: "0611111111".to_string(),
                address: Some("12 Elm Street".to_string()),
                specialty: None,
                role: Role::Patient,
            },
            password: "patient123".to_string(),
        });

        state.rooms.push(Room { id: "room-101".to_string(), number: 101, beds: 4, occupied: 1 });
        state.rooms.push(Room { id: "room-102".to_string(), number: 102, beds: 2, occupied: 2 });

        let tomorrow = chrono::Utc::now().date_naive() + chrono::Days::new(1);
        let ten = chrono::NaiveTime::from_hms_opt(10, 0, 0).unwrap_or_default();
        let booked = NewAppointment::new("doc-1", "pat-1", tomorrow, ten, "Persistent cough");
        state.appointments.push(appointment_from(booked, "appt-1".to_string()));

        state.availability.push(Availability {
            id: "slot-1".to_string(),
            staff_id: "staff-1".to_string(),
            day: Weekday::Monday,
            shift: Shift::Morning,
            confirmed: false,
        });

        InMemoryHospital { state: Mutex::new(state) }
    }

    /// Makes every later call to `operation` fail. Operation names are the
    /// `HospitalApi` method names.
    pub async fn fail(&self, operation: &str, failure: Failure) {
        self.state.lock().await.failures.insert(operation.to_string(), failure);
    }

    pub async fn recover(&self, operation: &str) {
        self.state.lock().await.failures.remove(operation);
    }

    /// Writes still land but answer without the created id, like a service
    /// that only returns a status message.
    pub async fn withhold_ids(&self) {
        self.state.lock().await.withhold_ids = true;
    }

    /// Operation names of every call received so far, in order.
    pub async fn calls(&self) -> Vec<String> {
        self.state.lock().await.calls.clone()
    }

    pub async fn room(&self, id: &str) -> Option<Room> {
        self.state.lock().await.rooms.iter().find(|r| r.id == id).cloned()
    }

    pub async fn bed_assignments(&self) -> Vec<BedAssignment> {
        self.state.lock().await.beds.clone()
    }

    pub async fn medical_records(&self) -> Vec<MedicalRecord> {
        self.state.lock().await.records.clone()
    }

    pub async fn appointments(&self) -> Vec<Appointment> {
        self.state.lock().await.appointments.clone()
    }

    pub async fn uploads(&self) -> Vec<Document> {
        self.state.lock().await.uploads.clone()
    }
}

fn appointment_from(new: NewAppointment, id: String) -> Appointment {
    Appointment {
        id,
        doctor_id: new.doctor_id,
        patient_id: new.patient_id,
        day: new.day,
        hour: new.hour,
        subject: new.subject,
        status: new.status,
    }
}

#[async_trait]
impl HospitalApi for InMemoryHospital {
    async fn register_doctor(&self, registration: &DoctorRegistration) -> ApiResult<()> {
        let mut state = self.state.lock().await;
        state.enter("register_doctor")?;
        let profile = UserProfile {
            id: new_id(),
            name: registration.name.clone(),
            family_name: registration.family_name.clone(),
            email: registration.email.clone(),
            tel: registration.tel.clone(),
            address: None,
            specialty: Some(registration.specialty.clone()),
            role: registration.role,
        };
        state.add_account(Directory::Doctors, profile, registration.password.clone())
    }

    async fn register_patient(&self, registration: &PatientRegistration) -> ApiResult<()> {
        let mut state = self.state.lock().await;
        state.enter("register_patient")?;
        let profile = UserProfile {
            id: new_id(),
            name: registration.name.clone(),
            family_name: registration.family_name.clone(),
            email: registration.email.clone(),
            tel: registration.tel.clone(),
            address: Some(registration.address.clone()),
            specialty: None,
            role: Role::Patient,
        };
        state.add_account(Directory::Patients, profile, registration.password.clone())
    }

    async fn login(
        &self,
        directory: Directory,
        credentials: &Credentials,
    ) -> ApiResult<UserProfile> {
        let mut state = self.state.lock().await;
        state.enter("login")?;
        let account = state
            .directory(directory)
            .iter()
            .find(|a| a.profile.email.eq_ignore_ascii_case(&credentials.email))
            .ok_or_else(|| not_found("User"))?;
        if account.password != credentials.password {
            return Err(ApiError::Unauthorized("Invalid password".to_string()));
        }
        Ok(account.profile.clone())
    }

    async fn get_profile(&self, directory: Directory, id: &str) -> ApiResult<UserProfile> {
        let mut state = self.state.lock().await;
        state.enter("get_profile")?;
        state
            .directory(directory)
            .iter()
            .find(|a| a.profile.id == id)
            .map(|a| a.profile.clone())
            .ok_or_else(|| not_found("User"))
    }

    async fn update_profile(
        &self,
        directory: Directory,
        id: &str,
        changes: &ProfileChanges,
    ) -> ApiResult<()> {
        let mut state = self.state.lock().await;
        state.enter("update_profile")?;
        let account = state
            .directory(directory)
            .iter_mut()
            .find(|a| a.profile.id == id)
            .ok_or_else(|| not_found("User"))?;
        changes.apply_to(&mut account.profile);
        Ok(())
    }

    async fn list_doctors(&self) -> ApiResult<Vec<UserProfile>> {
        let mut state = self.state.lock().await;
        state.enter("list_doctors")?;
        Ok(state.doctors.iter().map(|a| a.profile.clone()).collect())
    }

    async fn delete_doctor(&self, id: &str) -> ApiResult<()> {
        let mut state = self.state.lock().await;
        state.enter("delete_doctor")?;
        let before = state.doctors.len();
        state.doctors.retain(|a| a.profile.id != id);
        if state.doctors.len() == before {
            return Err(not_found("Doctor"));
        }
        Ok(())
    }

    async fn create_appointment(&self, appointment: &NewAppointment) -> ApiResult<()> {
        let mut state = self.state.lock().await;
        state.enter("create_appointment")?;
        state.appointments.push(appointment_from(appointment.clone(), new_id()));
        Ok(())
    }

    async fn list_appointments(&self, query: &AppointmentQuery) -> ApiResult<Vec<Appointment>> {
        let mut state = self.state.lock().await;
        state.enter("list_appointments")?;
        let by_doctor = query.role.map_or(false, Role::is_personnel);
        Ok(state
            .appointments
            .iter()
            .filter(|a| {
                if by_doctor {
                    a.doctor_id == query.owner_id
                } else {
                    a.patient_id == query.owner_id
                }
            })
            .cloned()
            .collect())
    }

    async fn confirm_appointment(&self, id: &str) -> ApiResult<()> {
        let mut state = self.state.lock().await;
        state.enter("confirm_appointment")?;
        let appointment = state
            .appointments
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| not_found("Appointment"))?;
        appointment.status = AppointmentStatus::Confirmed;
        Ok(())
    }

    async fn delete_appointment(&self, id: &str) -> ApiResult<()> {
        let mut state = self.state.lock().await;
        state.enter("delete_appointment")?;
        let before = state.appointments.len();
        state.appointments.retain(|a| a.id != id);
        if state.appointments.len() == before {
            return Err(not_found("Appointment"));
        }
        Ok(())
    }

    async fn create_medical_record(&self, record: &NewMedicalRecord) -> ApiResult<Option<String>> {
        let mut state = self.state.lock().await;
        state.enter("create_medical_record")?;
        let id = new_id();
        state.records.push(record.clone().into_record(id.clone()));
        Ok(state.reported(id))
    }

    async fn list_medical_records(&self) -> ApiResult<Vec<MedicalRecord>> {
        let mut state = self.state.lock().await;
        state.enter("list_medical_records")?;
        Ok(state.records.clone())
    }

    async fn delete_medical_record(&self, id: &str) -> ApiResult<()> {
        let mut state = self.state.lock().await;
        state.enter("delete_medical_record")?;
        let before = state.records.len();
        state.records.retain(|r| r.id != id);
        if state.records.len() == before {
            return Err(not_found("Medical record"));
        }
        Ok(())
    }

    async fn assign_bed(&self, assignment: &BedAssignment) -> ApiResult<Option<String>> {
        let mut state = self.state.lock().await;
        state.enter("assign_bed")?;
        let room = state
            .rooms
            .iter()
            .find(|r| r.id == assignment.room_id)
            .ok_or_else(|| not_found("Room"))?;
        if !room.can_take(assignment.beds) {
            return Err(ApiError::BadRequest("No beds available".to_string()));
        }
        let id = new_id();
        let mut stored = assignment.clone();
        stored.id = Some(id.clone());
        state.beds.push(stored);
        Ok(state.reported(id))
    }

    async fn release_bed(&self, id: &str) -> ApiResult<()> {
        let mut state = self.state.lock().await;
        state.enter("release_bed")?;
        let before = state.beds.len();
        state.beds.retain(|b| b.id.as_deref() != Some(id));
        if state.beds.len() == before {
            return Err(not_found("Bed"));
        }
        Ok(())
    }

    async fn list_rooms(&self) -> ApiResult<Vec<Room>> {
        let mut state = self.state.lock().await;
        state.enter("list_rooms")?;
        Ok(state.rooms.clone())
    }

    async fn add_room(&self, room: &NewRoom) -> ApiResult<()> {
        let mut state = self.state.lock().await;
        state.enter("add_room")?;
        if state.rooms.iter().any(|r| r.number == room.number) {
            return Err(ApiError::BadRequest("Room number already exists".to_string()));
        }
        state.rooms.push(Room { id: new_id(), number: room.number, beds: room.beds, occupied: 0 });
        Ok(())
    }

    async fn update_room(&self, update: &RoomUpdate) -> ApiResult<()> {
        let mut state = self.state.lock().await;
        state.enter("update_room")?;
        let room = state
            .rooms
            .iter_mut()
            .find(|r| r.id == update.room_id)
            .ok_or_else(|| not_found("Room"))?;
        room.beds = update.beds;
        room.occupied = update.occupied;
        Ok(())
    }

    async fn update_occupancy(&self, update: &OccupancyUpdate) -> ApiResult<()> {
        let mut state = self.state.lock().await;
        state.enter("update_occupancy")?;
        let room = state
            .rooms
            .iter_mut()
            .find(|r| r.id == update.room_id)
            .ok_or_else(|| not_found("Room"))?;
        if update.occupied > room.beds {
            return Err(ApiError::BadRequest("Occupied exceeds the number of beds".to_string()));
        }
        room.occupied = update.occupied;
        Ok(())
    }

    async fn delete_room(&self, id: &str) -> ApiResult<()> {
        let mut state = self.state.lock().await;
        state.enter("delete_room")?;
        let before = state.rooms.len();
        state.rooms.retain(|r| r.id != id);
        if state.rooms.len() == before {
            return Err(not_found("Room"));
        }
        Ok(())
    }

    async fn add_availability(&self, availability: &NewAvailability) -> ApiResult<()> {
        let mut state = self.state.lock().await;
        state.enter("add_availability")?;
        state.availability.push(availability.clone().into_availability(new_id()));
        Ok(())
    }

    async fn list_availability(&self) -> ApiResult<Vec<Availability>> {
        let mut state = self.state.lock().await;
        state.enter("list_availability")?;
        Ok(state.availability.clone())
    }

    async fn staff_availability(&self, staff_id: &str) -> ApiResult<Vec<Availability>> {
        let mut state = self.state.lock().await;
        state.enter("staff_availability")?;
        Ok(state.availability.iter().filter(|a| a.staff_id == staff_id).cloned().collect())
    }

    async fn update_availability(&self, availability: &Availability) -> ApiResult<()> {
        let mut state = self.state.lock().await;
        state.enter("update_availability")?;
        let slot = state
            .availability
            .iter_mut()
            .find(|a| a.id == availability.id)
            .ok_or_else(|| not_found("Availability"))?;
        *slot = availability.clone();
        Ok(())
    }

    async fn delete_availability(&self, id: &str) -> ApiResult<()> {
        let mut state = self.state.lock().await;
        state.enter("delete_availability")?;
        let before = state.availability.len();
        state.availability.retain(|a| a.id != id);
        if state.availability.len() == before {
            return Err(not_found("Availability"));
        }
        Ok(())
    }

    async fn upload_document(&self, document: &Document) -> ApiResult<serde_json::Value> {
        let mut state = self.state.lock().await;
        state.enter("upload_document")?;
        state.uploads.push(document.clone());
        Ok(serde_json::json!({
            "filename": document.file_name,
            "content_type": document.mime_type,
            "size": document.len(),
        }))
    }
}
