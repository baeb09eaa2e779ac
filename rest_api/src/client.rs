// rest_api/src/client.rs

use async_trait::async_trait;
use log::{debug, warn};
use models::errors::{ApiError, ApiResult};
use models::medical::{
    Appointment, AppointmentQuery, AppointmentRef, Availability, BedAssignment, Credentials,
    DoctorRegistration, Document, MedicalRecord, NewAppointment, NewAvailability, NewMedicalRecord,
    NewRoom, OccupancyUpdate, PatientRegistration, ProfileChanges, Room, RoomUpdate, UserProfile,
};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::api::{Directory, HospitalApi};
use crate::config::{Service, ServiceConfig};

/// `HospitalApi` over HTTP. One `reqwest::Client` is shared by all seven
/// services; only the base URL differs per call.
#[derive(Debug, Clone)]
pub struct RestClient {
    http: Client,
    config: ServiceConfig,
}

impl RestClient {
    pub fn new(config: ServiceConfig) -> ApiResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ApiError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(RestClient { http, config })
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Base URL of `service` with `segments` appended, each percent-encoded.
    fn url(&self, service: Service, segments: &[&str]) -> ApiResult<Url> {
        let base = self.config.base_url(service);
        let mut url = Url::parse(&base)
            .map_err(|e| ApiError::Config(format!("Invalid service URL {}: {}", base, e)))?;
        {
            let mut path = url.path_segments_mut().map_err(|_| {
                ApiError::Config(format!("Service URL cannot take a path: {}", base))
            })?;
            path.pop_if_empty();
            for segment in segments {
                path.push(segment);
            }
        }
        Ok(url)
    }

    fn request(
        &self,
        method: Method,
        service: Service,
        segments: &[&str],
    ) -> ApiResult<RequestBuilder> {
        let url = self.url(service, segments)?;
        debug!("{} {}", method, url);
        Ok(self.http.request(method, url))
    }

    /// Sends the request and returns the raw body of a 2xx response.
    async fn execute(&self, request: RequestBuilder) -> ApiResult<String> {
        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        let url = response.url().clone();
        let body = response.text().await.map_err(transport_error)?;

        if status.is_success() {
            Ok(body)
        } else {
            warn!("{} answered {}: {}", url, status.as_u16(), body.trim());
            Err(ApiError::from_response(status.as_u16(), &body))
        }
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        let body = self.execute(request).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// For endpoints whose response body the portal does not use.
    async fn send(&self, request: RequestBuilder) -> ApiResult<()> {
        self.execute(request).await.map(|_| ())
    }

    /// For writes: once the service answered 2xx the write has landed, so an
    /// unexpected body only loses the id.
    async fn create(&self, request: RequestBuilder) -> ApiResult<Option<String>> {
        let body = self.execute(request).await?;
        let id = created_id(&body);
        if id.is_none() {
            debug!("No _id in create response: {}", body.trim());
        }
        Ok(id)
    }

    fn with_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        service: Service,
        segments: &[&str],
        body: &B,
    ) -> ApiResult<RequestBuilder> {
        Ok(self.request(method, service, segments)?.json(body))
    }
}

/// `_id` of a created document, at the top level or one object down
/// (`{"record": {"_id": ..}}`).
fn created_id(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let top = value.as_object()?;
    let id = top.get("_id").or_else(|| top.values().find_map(|v| v.get("_id")))?;
    id.as_str().map(str::to_string)
}

fn transport_error(err: reqwest::Error) -> ApiError {
    if err.is_decode() {
        ApiError::Serialization(err.to_string())
    } else {
        ApiError::Network(err.to_string())
    }
}

#[async_trait]
impl HospitalApi for RestClient {
    async fn register_doctor(&self, registration: &DoctorRegistration) -> ApiResult<()> {
        self.send(self.with_json(Method::POST, Service::Doctors, &["register"], registration)?)
            .await
    }

    async fn register_patient(&self, registration: &PatientRegistration) -> ApiResult<()> {
        self.send(self.with_json(Method::POST, Service::Clients, &["register"], registration)?)
            .await
    }

    async fn login(
        &self,
        directory: Directory,
        credentials: &Credentials,
    ) -> ApiResult<UserProfile> {
        self.fetch(self.with_json(Method::POST, directory.service(), &["login"], credentials)?)
            .await
    }

    async fn get_profile(&self, directory: Directory, id: &str) -> ApiResult<UserProfile> {
        self.fetch(self.request(Method::GET, directory.service(), &["profile", id])?)
            .await
    }

    async fn update_profile(
        &self,
        directory: Directory,
        id: &str,
        changes: &ProfileChanges,
    ) -> ApiResult<()> {
        self.send(self.with_json(Method::PUT, directory.service(), &["profile", id], changes)?)
            .await
    }

    async fn list_doctors(&self) -> ApiResult<Vec<UserProfile>> {
        self.fetch(self.request(Method::GET, Service::Doctors, &["all"])?).await
    }

    async fn delete_doctor(&self, id: &str) -> ApiResult<()> {
        self.send(self.request(Method::DELETE, Service::Doctors, &[id])?).await
    }

    async fn create_appointment(&self, appointment: &NewAppointment) -> ApiResult<()> {
        self.send(self.with_json(Method::POST, Service::Appointments, &["create"], appointment)?)
            .await
    }

    async fn list_appointments(&self, query: &AppointmentQuery) -> ApiResult<Vec<Appointment>> {
        self.fetch(self.request(Method::GET, Service::Appointments, &["get"])?.query(query))
            .await
    }

    async fn confirm_appointment(&self, id: &str) -> ApiResult<()> {
        let body = AppointmentRef { appointment_id: id.to_string() };
        self.send(self.with_json(Method::POST, Service::Appointments, &["update"], &body)?)
            .await
    }

    async fn delete_appointment(&self, id: &str) -> ApiResult<()> {
        let body = AppointmentRef { appointment_id: id.to_string() };
        self.send(self.with_json(Method::POST, Service::Appointments, &["delete"], &body)?)
            .await
    }

    async fn create_medical_record(&self, record: &NewMedicalRecord) -> ApiResult<Option<String>> {
        self.create(self.with_json(Method::POST, Service::MedicalRecords, &["noauth"], record)?)
            .await
    }

    async fn list_medical_records(&self) -> ApiResult<Vec<MedicalRecord>> {
        self.fetch(self.request(Method::GET, Service::MedicalRecords, &["all"])?)
            .await
    }

    async fn delete_medical_record(&self, id: &str) -> ApiResult<()> {
        self.send(self.request(Method::DELETE, Service::MedicalRecords, &[id])?)
            .await
    }

    async fn assign_bed(&self, assignment: &BedAssignment) -> ApiResult<Option<String>> {
        self.create(self.with_json(Method::POST, Service::Beds, &[], assignment)?)
            .await
    }

    async fn release_bed(&self, id: &str) -> ApiResult<()> {
        self.send(self.request(Method::DELETE, Service::Beds, &[id])?).await
    }

    async fn list_rooms(&self) -> ApiResult<Vec<Room>> {
        self.fetch(self.request(Method::GET, Service::Rooms, &[])?).await
    }

    async fn add_room(&self, room: &NewRoom) -> ApiResult<()> {
        self.send(self.with_json(Method::POST, Service::Rooms, &["add"], room)?)
            .await
    }

    async fn update_room(&self, update: &RoomUpdate) -> ApiResult<()> {
        self.send(self.with_json(Method::PUT, Service::Rooms, &["update"], update)?)
            .await
    }

    async fn update_occupancy(&self, update: &OccupancyUpdate) -> ApiResult<()> {
        self.send(self.with_json(Method::PUT, Service::Rooms, &["updateOccupied"], update)?)
            .await
    }

    async fn delete_room(&self, id: &str) -> ApiResult<()> {
        self.send(self.request(Method::DELETE, Service::Rooms, &[id])?).await
    }

    async fn add_availability(&self, availability: &NewAvailability) -> ApiResult<()> {
        self.send(self.with_json(Method::POST, Service::Availability, &["add"], availability)?)
            .await
    }

    async fn list_availability(&self) -> ApiResult<Vec<Availability>> {
        self.fetch(self.request(Method::GET, Service::Availability, &["all"])?)
            .await
    }

    async fn staff_availability(&self, staff_id: &str) -> ApiResult<Vec<Availability>> {
        self.fetch(self.request(Method::GET, Service::Availability, &["perso", staff_id])?)
            .await
    }

    async fn update_availability(&self, availability: &Availability) -> ApiResult<()> {
        self.send(self.with_json(
            Method::PUT,
            Service::Availability,
            &[availability.id.as_str()],
            availability,
        )?)
        .await
    }

    async fn delete_availability(&self, id: &str) -> ApiResult<()> {
        self.send(self.request(Method::DELETE, Service::Availability, &[id])?)
            .await
    }

    async fn upload_document(&self, document: &Document) -> ApiResult<Value> {
        let url = self.config.upload_url();
        let part = Part::bytes(document.content.clone())
            .file_name(document.file_name.clone())
            .mime_str(&document.mime_type)
            .map_err(|e| {
                ApiError::Config(format!("Invalid content type {}: {}", document.mime_type, e))
            })?;
        debug!("POST {} ({}, {} bytes)", url, document.file_name, document.len());
        let body = self
            .execute(self.http.post(&url).multipart(Form::new().part("file", part)))
            .await?;
        Ok(serde_json::from_str(&body).unwrap_or(Value::String(body)))
    }
}
