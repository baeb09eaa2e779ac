// models/src/medical/bed.rs

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of `POST /api/beds`, and what the beds service returns for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BedAssignment {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "idDoctor")]
    pub doctor_id: String,
    /// The beds service reads the doctor from this key as well.
    #[serde(rename = "idCoctor", default)]
    pub doctor_id_alias: String,
    #[serde(rename = "chambre")]
    pub room_id: String,
    /// Number of beds taken.
    #[serde(rename = "numLit")]
    pub beds: u32,
    #[serde(rename = "arrivee")]
    pub arrival: DateTime<Utc>,
    #[serde(rename = "depart")]
    pub departure: DateTime<Utc>,
    #[serde(default)]
    pub occupied: bool,
}

impl BedAssignment {
    pub fn new(
        doctor_id: impl Into<String>,
        room_id: impl Into<String>,
        beds: u32,
        arrival: NaiveDate,
        departure: NaiveDate,
    ) -> Self {
        let doctor_id = doctor_id.into();
        BedAssignment {
            id: None,
            doctor_id_alias: doctor_id.clone(),
            doctor_id,
            room_id: room_id.into(),
            beds,
            arrival: arrival.and_time(NaiveTime::MIN).and_utc(),
            departure: departure.and_time(NaiveTime::MIN).and_utc(),
            occupied: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicates_doctor_key() {
        let arrival = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
        let departure = NaiveDate::from_ymd_opt(2030, 1, 5).unwrap();
        let assignment = BedAssignment::new("d1", "r1", 2, arrival, departure);
        let body = serde_json::to_value(assignment).unwrap();

        assert_eq!(body["idDoctor"], "d1");
        assert_eq!(body["idCoctor"], "d1");
        assert_eq!(body["chambre"], "r1");
        assert_eq!(body["numLit"], 2);
        assert_eq!(body["occupied"], true);
        assert!(body.get("_id").is_none());
    }
}
