// models/src/medical/room.rs

use serde::{Deserialize, Serialize};

/// A ward room as listed by `GET /api/rooms`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "Number")]
    pub number: u32,
    #[serde(rename = "BedsNumber")]
    pub beds: u32,
    #[serde(rename = "Occupied", default)]
    pub occupied: u32,
}

impl Room {
    pub fn available_beds(&self) -> u32 {
        self.beds.saturating_sub(self.occupied)
    }

    pub fn can_take(&self, beds: u32) -> bool {
        beds <= self.available_beds()
    }

    /// Label used by the hospitalization room picker.
    pub fn picker_label(&self) -> String {
        format!(
            "Room: {} - Beds: {} - Available: {}",
            self.number,
            self.beds,
            self.available_beds()
        )
    }
}

/// Body of `POST /api/rooms/add`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRoom {
    #[serde(rename = "Number")]
    pub number: u32,
    #[serde(rename = "BedsNumber")]
    pub beds: u32,
}

/// Body of `PUT /api/rooms/update`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomUpdate {
    #[serde(rename = "selectedRoomId")]
    pub room_id: String,
    #[serde(rename = "BedsNumber")]
    pub beds: u32,
    #[serde(rename = "Occupied")]
    pub occupied: u32,
}

/// Body of `PUT /api/rooms/updateOccupied`. `Occupied` is the room's new
/// absolute occupied-bed count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupancyUpdate {
    #[serde(rename = "selectedRoomId")]
    pub room_id: String,
    #[serde(rename = "Occupied")]
    pub occupied: u32,
}

#[cfg(test)]
mod tests {
    use super::Room;

    #[test]
    fn available_beds_never_underflow() {
        let room = Room { id: "r1".into(), number: 12, beds: 2, occupied: 5 };
        assert_eq!(room.available_beds(), 0);
        assert!(!room.can_take(1));
    }

    #[test]
    fn occupied_defaults_to_zero() {
        let room: Room = serde_json::from_str(r#"{"_id":"r1","Number":7,"BedsNumber":4}"#).unwrap();
        assert_eq!(room.occupied, 0);
        assert_eq!(room.picker_label(), "Room: 7 - Beds: 4 - Available: 4");
    }
}
