// models/src/medical/user.rs

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::medical::Role;

/// An account as returned by the login and profile endpoints of both the
/// doctors and the clients services. Password hashes the services may echo
/// back are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "FamilyName", default)]
    pub family_name: String,
    #[serde(rename = "Email", default)]
    pub email: String,
    #[serde(rename = "Tel", default)]
    pub tel: String,
    #[serde(rename = "Adress", default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(rename = "Specialite", default, skip_serializing_if = "Option::is_none")]
    pub specialty: Option<String>,
    #[serde(rename = "Role", default)]
    pub role: Role,
}

impl UserProfile {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.family_name)
    }

    /// First letter of the first and family names, upper-cased.
    pub fn initials(&self) -> String {
        initial(&self.name) + &initial(&self.family_name)
    }

    /// Label used by the doctor picker: "Name FamilyName (Specialite)".
    pub fn doctor_label(&self) -> String {
        format!(
            "{} {} ({})",
            self.name,
            self.family_name,
            self.specialty.as_deref().unwrap_or("")
        )
    }

    pub fn person_name(&self) -> PersonName {
        PersonName {
            name: self.name.clone(),
            family_name: self.family_name.clone(),
        }
    }

    /// Current value of an editable field.
    pub fn field(&self, field: ProfileField) -> Option<&str> {
        match field {
            ProfileField::Name => Some(&self.name),
            ProfileField::FamilyName => Some(&self.family_name),
            ProfileField::Email => Some(&self.email),
            ProfileField::Tel => Some(&self.tel),
            ProfileField::Address => self.address.as_deref(),
            ProfileField::Specialty => self.specialty.as_deref(),
        }
    }

    /// Writes `value` into the local copy of `field`.
    pub fn set_field(&mut self, field: ProfileField, value: String) {
        match field {
            ProfileField::Name => self.name = value,
            ProfileField::FamilyName => self.family_name = value,
            ProfileField::Email => self.email = value,
            ProfileField::Tel => self.tel = value,
            ProfileField::Address => self.address = Some(value),
            ProfileField::Specialty => self.specialty = Some(value),
        }
    }
}

fn initial(s: &str) -> String {
    s.chars().next().map(|c| c.to_uppercase().collect()).unwrap_or_default()
}

/// The name pair resolved by profile lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonName {
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(rename = "FamilyName", default)]
    pub family_name: String,
}

impl fmt::Display for PersonName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.name, self.family_name)
    }
}

/// Body of `POST /api/doctors/register`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoctorRegistration {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "FamilyName")]
    pub family_name: String,
    #[serde(rename = "Specialite")]
    pub specialty: String,
    #[serde(rename = "Tel")]
    pub tel: String,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Password")]
    pub password: String,
    #[serde(rename = "Role")]
    pub role: Role,
}

/// Body of `POST /api/clients/register`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientRegistration {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "FamilyName")]
    pub family_name: String,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Tel")]
    pub tel: String,
    #[serde(rename = "Adress")]
    pub address: String,
    #[serde(rename = "Password")]
    pub password: String,
}

/// Body of both login endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Password")]
    pub password: String,
}

/// Fields a user may edit from the profile screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileField {
    Name,
    FamilyName,
    Email,
    Tel,
    Address,
    Specialty,
}

impl ProfileField {
    pub const ALL: [ProfileField; 6] = [
        ProfileField::Name,
        ProfileField::FamilyName,
        ProfileField::Email,
        ProfileField::Tel,
        ProfileField::Address,
        ProfileField::Specialty,
    ];

    /// Key used in the PUT body.
    pub fn wire_key(self) -> &'static str {
        match self {
            ProfileField::Name => "Name",
            ProfileField::FamilyName => "FamilyName",
            ProfileField::Email => "Email",
            ProfileField::Tel => "Tel",
            ProfileField::Address => "Adress",
            ProfileField::Specialty => "Specialite",
        }
    }
}

impl FromStr for ProfileField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_'], "").as_str() {
            "name" => Ok(ProfileField::Name),
            "familyname" | "lastname" => Ok(ProfileField::FamilyName),
            "email" => Ok(ProfileField::Email),
            "tel" | "phone" => Ok(ProfileField::Tel),
            "address" | "adress" => Ok(ProfileField::Address),
            "specialty" | "specialite" => Ok(ProfileField::Specialty),
            _ => Err(format!(
                "Unknown profile field: {}. Available: name, family-name, email, tel, address, \
                 specialty",
                s
            )),
        }
    }
}

/// A partial profile update, serialised as a flat JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileChanges(pub Map<String, Value>);

impl ProfileChanges {
    /// The single-field body sent by the profile screen.
    pub fn single(field: ProfileField, value: impl Into<String>) -> Self {
        let mut map = Map::new();
        map.insert(field.wire_key().to_string(), Value::String(value.into()));
        ProfileChanges(map)
    }

    /// The whole-record body sent by the admin doctor editor.
    pub fn from_profile(profile: &UserProfile) -> Result<Self, serde_json::Error> {
        match serde_json::to_value(profile)? {
            Value::Object(map) => Ok(ProfileChanges(map)),
            _ => Ok(ProfileChanges::default()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Applies the string-valued keys onto `profile`.
    pub fn apply_to(&self, profile: &mut UserProfile) {
        for field in ProfileField::ALL {
            if let Some(Value::String(v)) = self.0.get(field.wire_key()) {
                profile.set_field(field, v.clone());
            }
        }
        if let Some(Value::String(tag)) = self.0.get("Role") {
            profile.role = Role::from_wire_tag(tag);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> UserProfile {
        serde_json::from_str(
            r#"{"_id":"d1","Name":"gregory","FamilyName":"house","Email":"gh@pp.org",
                "Tel":"555","Specialite":"Diagnostics","Role":"Docter","Password":"$2b$10$x"}"#,
        )
        .unwrap()
    }

    #[test]
    fn reads_login_payload() {
        let user = sample();
        assert_eq!(user.id, "d1");
        assert_eq!(user.role, Role::Doctor);
        assert_eq!(user.initials(), "GH");
        assert_eq!(user.doctor_label(), "gregory house (Diagnostics)");
    }

    #[test]
    fn patient_payload_without_role() {
        let json = r#"{"_id":"c1","Name":"Ann","FamilyName":"Lee","Adress":"1 Main St"}"#;
        let user: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(user.role, Role::Patient);
        assert_eq!(user.address.as_deref(), Some("1 Main St"));
    }

    #[test]
    fn single_field_change_uses_wire_key() {
        let changes = ProfileChanges::single(ProfileField::Address, "2 Side St");
        assert_eq!(serde_json::to_string(&changes).unwrap(), r#"{"Adress":"2 Side St"}"#);

        let mut user = sample();
        changes.apply_to(&mut user);
        assert_eq!(user.address.as_deref(), Some("2 Side St"));
    }

    #[test]
    fn registration_keeps_capitalised_keys() {
        let body = serde_json::to_value(DoctorRegistration {
            name: "Gregory".into(),
            family_name: "House".into(),
            specialty: "Diagnostics".into(),
            tel: "555".into(),
            email: "gh@pp.org".into(),
            password: "vicodin1".into(),
            role: Role::Doctor,
        })
        .unwrap();
        assert_eq!(body["Specialite"], "Diagnostics");
        assert_eq!(body["Role"], "Docter");
        assert_eq!(body["Password"], "vicodin1");
    }
}
