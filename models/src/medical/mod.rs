pub mod appointment;
pub mod availability;
pub mod bed;
pub mod document;
pub mod medical_record;
pub mod role;
pub mod room;
pub mod user;

pub use appointment::{
    Appointment, AppointmentQuery, AppointmentRef, AppointmentStatus, NewAppointment,
};
pub use availability::{Availability, NewAvailability, Shift, Weekday};
pub use bed::BedAssignment;
pub use document::Document;
pub use medical_record::{MedicalRecord, NewMedicalRecord};
pub use role::Role;
pub use room::{NewRoom, OccupancyUpdate, Room, RoomUpdate};
pub use user::{
    Credentials, DoctorRegistration, PatientRegistration, PersonName, ProfileChanges, ProfileField,
    UserProfile,
};
