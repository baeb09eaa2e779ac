// models/src/medical/role.rs

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// The four kinds of account the portal knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Role {
    #[default]
    Patient,
    Doctor,
    Staff,
    Admin,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Patient, Role::Doctor, Role::Staff, Role::Admin];

    /// The tag the services store in the `Role` field. Doctors are stored as
    /// "Docter".
    pub fn wire_tag(self) -> &'static str {
        match self {
            Role::Patient => "Patient",
            Role::Doctor => "Docter",
            Role::Staff => "Staff",
            Role::Admin => "Admin",
        }
    }

    /// Maps a stored tag back to a role. Anything unrecognised is a patient
    /// account, which is also what an absent tag means.
    pub fn from_wire_tag(tag: &str) -> Role {
        match tag.trim() {
            "Docter" | "Doctor" => Role::Doctor,
            "Staff" => Role::Staff,
            "Admin" => Role::Admin,
            _ => Role::Patient,
        }
    }

    /// Doctor, staff and admin accounts all live in the doctors directory.
    pub fn is_personnel(self) -> bool {
        !matches!(self, Role::Patient)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Role::Patient => write!(f, "patient"),
            Role::Doctor => write!(f, "doctor"),
            Role::Staff => write!(f, "staff"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "patient" | "client" => Ok(Role::Patient),
            "doctor" | "docter" => Ok(Role::Doctor),
            "staff" | "nurse" => Ok(Role::Staff),
            "admin" => Ok(Role::Admin),
            _ => Err(format!("Unknown role: {}. Available: patient, doctor, staff, admin", s)),
        }
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.wire_tag())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = Option::<String>::deserialize(deserializer)?;
        Ok(tag.as_deref().map(Role::from_wire_tag).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::Role;

    #[test]
    fn doctor_uses_backend_spelling() {
        assert_eq!(serde_json::to_string(&Role::Doctor).unwrap(), "\"Docter\"");
        let role: Role = serde_json::from_str("\"Docter\"").unwrap();
        assert_eq!(role, Role::Doctor);
    }

    #[test]
    fn unknown_or_null_tag_is_patient() {
        let role: Role = serde_json::from_str("\"Visitor\"").unwrap();
        assert_eq!(role, Role::Patient);
        let role: Role = serde_json::from_str("null").unwrap();
        assert_eq!(role, Role::Patient);
    }

    #[test]
    fn parses_cli_names() {
        assert_eq!("Doctor".parse::<Role>().unwrap(), Role::Doctor);
        assert_eq!("nurse".parse::<Role>().unwrap(), Role::Staff);
        assert!("janitor".parse::<Role>().is_err());
    }
}
