// models/src/medical/availability.rs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Day of the week a staff member offers a shift on, stored by its English name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl FromStr for Weekday {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Weekday::ALL
            .into_iter()
            .find(|d| {
                let name = d.to_string().to_lowercase();
                name == lower || (lower.len() >= 3 && name.starts_with(&lower))
            })
            .ok_or_else(|| format!("Unknown day: {}", s))
    }
}

/// The three eight-hour shifts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shift {
    Night,
    Morning,
    Afternoon,
}

impl Shift {
    pub const ALL: [Shift; 3] = [Shift::Night, Shift::Morning, Shift::Afternoon];

    pub fn hours(self) -> &'static str {
        match self {
            Shift::Night => "00:00 - 08:00",
            Shift::Morning => "08:00 - 16:00",
            Shift::Afternoon => "16:00 - 24:00",
        }
    }

    pub fn label(self) -> String {
        format!("{}  ({})", self, self.hours())
    }
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl FromStr for Shift {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "night" => Ok(Shift::Night),
            "morning" => Ok(Shift::Morning),
            "afternoon" => Ok(Shift::Afternoon),
            _ => Err(format!("Unknown shift: {}. Available: night, morning, afternoon", s)),
        }
    }
}

/// A declared shift slot as listed by the availability service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Availability {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "personnelId")]
    pub staff_id: String,
    #[serde(rename = "Date")]
    pub day: Weekday,
    #[serde(rename = "Shift")]
    pub shift: Shift,
    /// Set once an admin confirms the slot.
    #[serde(rename = "status", default)]
    pub confirmed: bool,
}

impl Availability {
    pub fn status_label(&self) -> &'static str {
        if self.confirmed {
            "Confirmed"
        } else {
            "Not Confirmed"
        }
    }
}

/// Body of `POST /api/availability/add`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAvailability {
    #[serde(rename = "personnelId")]
    pub staff_id: String,
    #[serde(rename = "Date")]
    pub day: Weekday,
    #[serde(rename = "Shift")]
    pub shift: Shift,
    #[serde(rename = "status")]
    pub confirmed: bool,
}

impl NewAvailability {
    pub fn into_availability(self, id: impl Into<String>) -> Availability {
        Availability {
            id: id.into(),
            staff_id: self.staff_id,
            day: self.day,
            shift: self.shift,
            confirmed: self.confirmed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_shape() {
        let slot: Availability = serde_json::from_str(
            r#"{"_id":"s1","personnelId":"n1","Date":"Tuesday","Shift":"Night","status":false}"#,
        )
        .unwrap();
        assert_eq!(slot.day, Weekday::Tuesday);
        assert_eq!(slot.shift, Shift::Night);
        assert_eq!(slot.status_label(), "Not Confirmed");
    }

    #[test]
    fn parses_day_prefixes() {
        assert_eq!("wed".parse::<Weekday>().unwrap(), Weekday::Wednesday);
        assert_eq!("SUNDAY".parse::<Weekday>().unwrap(), Weekday::Sunday);
        assert!("mo".parse::<Weekday>().is_err());
        assert_eq!(Shift::Morning.label(), "Morning  (08:00 - 16:00)");
    }
}
