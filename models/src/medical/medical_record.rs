// models/src/medical/medical_record.rs

use serde::{Deserialize, Deserializer, Serialize};

/// A record as listed by `GET /api/medical-records/all`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicalRecord {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "idDoctor")]
    pub doctor_id: String,
    #[serde(rename = "idClient")]
    pub patient_id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub prescription: String,
    /// Invoice amount.
    #[serde(rename = "facture", default, deserialize_with = "amount")]
    pub invoice: f64,
    #[serde(rename = "hospitalisation", default)]
    pub hospitalized: bool,
}

/// Body of `POST /api/medical-records/noauth`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMedicalRecord {
    #[serde(rename = "idDoctor")]
    pub doctor_id: String,
    #[serde(rename = "idClient")]
    pub patient_id: String,
    pub description: String,
    pub prescription: String,
    #[serde(rename = "facture", deserialize_with = "amount")]
    pub invoice: f64,
    #[serde(rename = "hospitalisation")]
    pub hospitalized: bool,
}

impl NewMedicalRecord {
    pub fn into_record(self, id: impl Into<String>) -> MedicalRecord {
        MedicalRecord {
            id: id.into(),
            doctor_id: self.doctor_id,
            patient_id: self.patient_id,
            description: self.description,
            prescription: self.prescription,
            invoice: self.invoice,
            hospitalized: self.hospitalized,
        }
    }
}

/// Older records store the invoice as the raw text typed into the form, so
/// both numbers and numeric strings are accepted.
fn amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Amount {
        Number(f64),
        Text(String),
        Missing(()),
    }

    match Amount::deserialize(deserializer)? {
        Amount::Number(n) => Ok(n),
        Amount::Text(s) if s.trim().is_empty() => Ok(0.0),
        Amount::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("invalid invoice amount: {}", s))),
        Amount::Missing(()) => Ok(0.0),
    }
}
