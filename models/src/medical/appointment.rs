// models/src/medical/appointment.rs

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::medical::Role;

/// Appointment status as stored by the appointments service. Statuses the
/// client does not know are preserved verbatim and count as unconfirmed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AppointmentStatus {
    NotConfirmed,
    Pending,
    Confirmed,
    Other(String),
}

impl AppointmentStatus {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, AppointmentStatus::Confirmed)
    }

    pub fn as_str(&self) -> &str {
        match self {
            AppointmentStatus::NotConfirmed => "not Confirmed",
            AppointmentStatus::Pending => "Pending",
            AppointmentStatus::Confirmed => "Confirmed",
            AppointmentStatus::Other(s) => s.as_str(),
        }
    }
}

impl From<String> for AppointmentStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "not Confirmed" => AppointmentStatus::NotConfirmed,
            "Pending" => AppointmentStatus::Pending,
            "Confirmed" => AppointmentStatus::Confirmed,
            _ => AppointmentStatus::Other(s),
        }
    }
}

impl From<AppointmentStatus> for String {
    fn from(status: AppointmentStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An appointment as listed by `GET /api/appointments/get`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "idDoctor")]
    pub doctor_id: String,
    #[serde(rename = "idClient")]
    pub patient_id: String,
    /// Day of the appointment.
    #[serde(rename = "jour")]
    pub day: DateTime<Utc>,
    /// Time of the appointment; only the time-of-day part is meaningful.
    #[serde(rename = "heure")]
    pub hour: DateTime<Utc>,
    #[serde(rename = "sujet", default)]
    pub subject: String,
    #[serde(rename = "Status")]
    pub status: AppointmentStatus,
}

impl Appointment {
    pub fn date(&self) -> NaiveDate {
        self.day.date_naive()
    }

    pub fn time(&self) -> NaiveTime {
        self.hour.time()
    }
}

/// Body of `POST /api/appointments/create`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAppointment {
    #[serde(rename = "idDoctor")]
    pub doctor_id: String,
    #[serde(rename = "idClient")]
    pub patient_id: String,
    #[serde(rename = "jour")]
    pub day: DateTime<Utc>,
    #[serde(rename = "heure")]
    pub hour: DateTime<Utc>,
    #[serde(rename = "sujet")]
    pub subject: String,
    #[serde(rename = "Status")]
    pub status: AppointmentStatus,
}

impl NewAppointment {
    /// A freshly booked, not yet confirmed appointment.
    pub fn new(
        doctor_id: impl Into<String>,
        patient_id: impl Into<String>,
        date: NaiveDate,
        time: NaiveTime,
        subject: impl Into<String>,
    ) -> Self {
        NewAppointment {
            doctor_id: doctor_id.into(),
            patient_id: patient_id.into(),
            day: date.and_time(NaiveTime::MIN).and_utc(),
            hour: date.and_time(time).and_utc(),
            subject: subject.into(),
            status: AppointmentStatus::NotConfirmed,
        }
    }
}

/// Query string of `GET /api/appointments/get`. Doctor listings pass their
/// role so the service matches on `idDoctor` instead of `idClient`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentQuery {
    #[serde(rename = "clientID")]
    pub owner_id: String,
    #[serde(rename = "Role", skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl AppointmentQuery {
    pub fn for_patient(patient_id: impl Into<String>) -> Self {
        AppointmentQuery { owner_id: patient_id.into(), role: None }
    }

    pub fn for_doctor(doctor_id: impl Into<String>) -> Self {
        AppointmentQuery { owner_id: doctor_id.into(), role: Some(Role::Doctor) }
    }
}

/// Body of the confirm and delete endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentRef {
    #[serde(rename = "appointmentId")]
    pub appointment_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_appointment_is_not_confirmed() {
        let date = NaiveDate::from_ymd_opt(2030, 3, 4).unwrap();
        let time = NaiveTime::from_hms_opt(10, 30, 0).unwrap();
        let appointment = NewAppointment::new("d1", "c1", date, time, "checkup");
        let body = serde_json::to_value(appointment).unwrap();

        assert_eq!(body["Status"], "not Confirmed");
        assert_eq!(body["idDoctor"], "d1");
        assert_eq!(body["idClient"], "c1");
        assert_eq!(body["sujet"], "checkup");
        assert_eq!(body["heure"], "2030-03-04T10:30:00Z");
    }

    #[test]
    fn unknown_status_is_kept() {
        let appointment: Appointment = serde_json::from_str(
            r#"{"_id":"a1","idDoctor":"d1","idClient":"c1","jour":"2030-03-04T00:00:00.000Z",
                "heure":"2030-03-04T10:30:00.000Z","sujet":"x","Status":"Cancelled"}"#,
        )
        .unwrap();
        assert_eq!(appointment.status, AppointmentStatus::Other("Cancelled".into()));
        assert!(!appointment.status.is_confirmed());
        assert_eq!(appointment.time(), NaiveTime::from_hms_opt(10, 30, 0).unwrap());
    }

    #[test]
    fn doctor_query_sends_role() {
        let query = serde_json::to_value(AppointmentQuery::for_doctor("d1")).unwrap();
        assert_eq!(query["clientID"], "d1");
        assert_eq!(query["Role"], "Docter");

        let query = serde_json::to_value(AppointmentQuery::for_patient("c1")).unwrap();
        assert!(query.get("Role").is_none());
    }
}
