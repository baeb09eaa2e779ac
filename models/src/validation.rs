// models/src/validation.rs

// Client-side form checks. They are deliberately shallow: lengths, required
// fields, a digit in the password, the confirmation matching, and the booking
// window. Uniqueness and referential integrity are left to the services.

use chrono::{NaiveDate, NaiveTime, Timelike};
use lazy_static::lazy_static;
use regex::Regex;

use crate::errors::{Field, FormErrors, ValidationError};
use crate::medical::{
    Credentials, DoctorRegistration, NewAppointment, NewAvailability, NewRoom, PatientRegistration,
    Role, RoomUpdate, Shift, Weekday,
};

pub const NAME_MIN_LEN: usize = 3;
pub const NAME_MAX_LEN: usize = 64;
pub const PASSWORD_MIN_LEN: usize = 6;

lazy_static! {
    static ref HAS_DIGIT: Regex = Regex::new(r"[0-9]").expect("static regex");
}

/// Name and FamilyName must hold 3 to 64 characters.
pub fn check_name(label: &'static str, value: &str) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if (NAME_MIN_LEN..=NAME_MAX_LEN).contains(&len) {
        Ok(())
    } else {
        Err(ValidationError::Length { field: label, min: NAME_MIN_LEN, max: NAME_MAX_LEN })
    }
}

/// At least six characters, one of them a digit.
pub fn check_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() >= PASSWORD_MIN_LEN && HAS_DIGIT.is_match(password) {
        Ok(())
    } else {
        Err(ValidationError::WeakPassword)
    }
}

pub fn check_confirmation(password: &str, confirmation: &str) -> Result<(), ValidationError> {
    if password == confirmation {
        Ok(())
    } else {
        Err(ValidationError::PasswordMismatch)
    }
}

fn check_required(label: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        Err(ValidationError::Required(label))
    } else {
        Ok(())
    }
}

fn collect(errors: &mut FormErrors, field: Field, check: Result<(), ValidationError>) {
    if let Err(e) = check {
        errors.push(field, e);
    }
}

/// Input of the doctor sign-up screen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DoctorSignUpForm {
    pub name: String,
    pub family_name: String,
    pub email: String,
    pub tel: String,
    pub specialty: String,
    pub password: String,
    pub confirmation: String,
}

impl DoctorSignUpForm {
    /// Email, phone and specialty are accepted as typed.
    pub fn validate(&self) -> Result<DoctorRegistration, FormErrors> {
        let mut errors = FormErrors::new();
        collect(&mut errors, Field::Name, check_name("Name", &self.name));
        collect(&mut errors, Field::FamilyName, check_name("FamilyName", &self.family_name));
        collect(&mut errors, Field::Password, check_password(&self.password));
        collect(
            &mut errors,
            Field::Confirmation,
            check_confirmation(&self.password, &self.confirmation),
        );

        errors.into_result(DoctorRegistration {
            name: self.name.clone(),
            family_name: self.family_name.clone(),
            specialty: self.specialty.clone(),
            tel: self.tel.clone(),
            email: self.email.clone(),
            password: self.password.clone(),
            role: Role::Doctor,
        })
    }
}

/// Input of the patient sign-up screen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatientSignUpForm {
    pub name: String,
    pub family_name: String,
    pub email: String,
    pub tel: String,
    pub address: String,
    pub password: String,
    pub confirmation: String,
}

impl PatientSignUpForm {
    pub fn validate(&self) -> Result<PatientRegistration, FormErrors> {
        let mut errors = FormErrors::new();
        collect(&mut errors, Field::Name, check_name("Name", &self.name));
        collect(&mut errors, Field::FamilyName, check_name("FamilyName", &self.family_name));
        collect(&mut errors, Field::Email, check_required("Email", &self.email));
        collect(&mut errors, Field::Tel, check_required("Tel", &self.tel));
        collect(&mut errors, Field::Address, check_required("Address", &self.address));
        collect(&mut errors, Field::Password, check_password(&self.password));
        collect(
            &mut errors,
            Field::Confirmation,
            check_confirmation(&self.password, &self.confirmation),
        );

        errors.into_result(PatientRegistration {
            name: self.name.clone(),
            family_name: self.family_name.clone(),
            email: self.email.clone(),
            tel: self.tel.clone(),
            address: self.address.clone(),
            password: self.password.clone(),
        })
    }
}

/// Both sign-in fields are required; nothing else is checked locally.
pub fn validate_credentials(email: &str, password: &str) -> Result<Credentials, ValidationError> {
    if email.is_empty() || password.is_empty() {
        return Err(ValidationError::MissingCredentials);
    }
    Ok(Credentials { email: email.to_string(), password: password.to_string() })
}

/// Bookings are taken between 09:00 and 18:00, both ends included.
pub fn booking_opens() -> NaiveTime {
    NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default()
}

pub fn booking_closes() -> NaiveTime {
    NaiveTime::from_hms_opt(18, 0, 0).unwrap_or_default()
}

pub fn check_appointment_date(date: NaiveDate, today: NaiveDate) -> Result<(), ValidationError> {
    if date >= today {
        Ok(())
    } else {
        Err(ValidationError::DateInPast)
    }
}

pub fn check_appointment_time(time: NaiveTime) -> Result<(), ValidationError> {
    // Seconds and below are ignored, 18:00:30 still counts as 18:00.
    let minute = time.with_second(0).and_then(|t| t.with_nanosecond(0)).unwrap_or(time);
    if minute >= booking_opens() && minute <= booking_closes() {
        Ok(())
    } else {
        Err(ValidationError::TimeOutsideWindow)
    }
}

/// Input of the booking screen.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingForm {
    pub doctor_id: Option<String>,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub reason: String,
}

impl BookingForm {
    pub fn validate(
        &self,
        patient_id: &str,
        today: NaiveDate,
    ) -> Result<NewAppointment, FormErrors> {
        let mut errors = FormErrors::new();
        collect(&mut errors, Field::Date, check_appointment_date(self.date, today));
        collect(&mut errors, Field::Time, check_appointment_time(self.time));

        let doctor_id = self.doctor_id.as_deref().unwrap_or("").trim();
        if doctor_id.is_empty() || self.reason.trim().is_empty() {
            errors.push(Field::Form, ValidationError::IncompleteAppointment);
        }

        errors.into_result(NewAppointment::new(
            doctor_id,
            patient_id,
            self.date,
            self.time,
            self.reason.trim(),
        ))
    }
}

/// Prescription and invoice typed by the doctor when closing an appointment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordForm {
    pub prescription: String,
    pub invoice: String,
}

impl RecordForm {
    /// An empty invoice means nothing was billed.
    pub fn invoice_amount(&self) -> Result<f64, ValidationError> {
        let raw = self.invoice.trim();
        if raw.is_empty() {
            return Ok(0.0);
        }
        match raw.parse::<f64>() {
            Ok(amount) if amount.is_finite() && amount >= 0.0 => Ok(amount),
            _ => Err(ValidationError::InvalidValue { field: "invoice", value: raw.to_string() }),
        }
    }
}

/// Room, bed count and stay dates of a hospitalization.
pub fn check_stay(beds: u32, arrival: NaiveDate, departure: NaiveDate) -> Result<(), FormErrors> {
    let mut errors = FormErrors::new();
    if beds == 0 {
        errors.push(Field::Beds, ValidationError::NoBedsRequested);
    }
    if departure < arrival {
        errors.push(Field::Date, ValidationError::DepartureBeforeArrival);
    }
    errors.into_result(())
}

/// Both a day and a shift must be picked.
pub fn validate_availability(
    staff_id: &str,
    day: Option<Weekday>,
    shift: Option<Shift>,
) -> Result<NewAvailability, ValidationError> {
    match (day, shift) {
        (Some(day), Some(shift)) => Ok(NewAvailability {
            staff_id: staff_id.to_string(),
            day,
            shift,
            confirmed: false,
        }),
        _ => Err(ValidationError::IncompleteAvailability),
    }
}

pub fn validate_new_room(number: u32, beds: u32) -> Result<NewRoom, FormErrors> {
    let mut errors = FormErrors::new();
    if number == 0 {
        errors.push(
            Field::Room,
            ValidationError::InvalidValue { field: "room number", value: number.to_string() },
        );
    }
    if beds == 0 {
        errors.push(Field::Beds, ValidationError::NoBedsRequested);
    }
    errors.into_result(NewRoom { number, beds })
}

pub fn validate_room_update(
    room_id: &str,
    beds: u32,
    occupied: u32,
) -> Result<RoomUpdate, FormErrors> {
    let mut errors = FormErrors::new();
    if beds == 0 {
        errors.push(Field::Beds, ValidationError::NoBedsRequested);
    }
    if occupied > beds {
        errors.push(Field::Beds, ValidationError::OccupancyExceedsCapacity);
    }
    errors.into_result(RoomUpdate { room_id: room_id.to_string(), beds, occupied })
}
