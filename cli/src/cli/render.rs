// cli/src/cli/render.rs

// Terminal output. Lists are printed as fixed-width tables; row formatting
// is kept separate from printing so it can be checked in tests.

use client::admin::{AvailabilityRow, RecordRow};
use client::appointments::AppointmentRow;
use client::booking::DoctorChoice;
use client::diagnostics::ToolLink;
use client::feedback::{CLIENT_DELETED, DOCTOR_DELETED};
use client::profile::ProfileView;
use client::records::HospitalizationError;
use client::{Loadable, Notice, ScreenError};
use colored::Colorize;
use models::medical::{Availability, Room, UserProfile};
use security::{admin_panels, screens_for, Session};

pub fn print_notice(notice: &Notice) {
    println!("{}", notice.message.green());
    for warning in &notice.warnings {
        println!("{} {}", "Warning:".yellow(), warning);
    }
    if let Some(next) = notice.next {
        println!("Next: {}", next);
    }
}

pub fn print_screen_error(err: &ScreenError) {
    eprintln!("{}", err.message.red());
    if let Some(errors) = err.form_errors() {
        for e in errors.iter() {
            eprintln!("  {:<15} {}", format!("{:?}", e.field), e.error);
        }
    }
}

/// Reports a failed command. Screen failures carry their own wording.
pub fn print_failure(err: &anyhow::Error) {
    if let Some(e) = err.downcast_ref::<ScreenError>() {
        print_screen_error(e);
    } else if let Some(e) = err.downcast_ref::<HospitalizationError>() {
        eprintln!("{}", e.message.red());
        print_rollback(e);
    } else {
        eprintln!("{} {:#}", "Error:".red(), err);
    }
}

/// What happened to the writes of a failed hospitalization.
pub fn print_rollback(err: &HospitalizationError) {
    if let Some(step) = err.failed_step {
        eprintln!("Failed step: {}", step);
    }
    for step in &err.compensated {
        eprintln!("  undone: {}", step);
    }
    for failure in &err.compensation_failures {
        eprintln!("  {} {}: {}", "NOT undone:".red(), failure.step, failure.error);
    }
}

pub fn print_session(session: &Session) {
    let user = &session.user;
    println!("\n--- Signed In ---");
    println!("{:<15} {}", "Name", user.full_name());
    println!("{:<15} {}", "Role", session.role());
    println!("{:<15} {}", "Email", user.email);
    println!("{:<15} {}", "Since", session.signed_in_at.format("%Y-%m-%d %H:%M"));
    let screens: Vec<&str> = screens_for(session.role()).iter().map(|s| s.label()).collect();
    println!("{:<15} {}", "Screens", screens.join(", "));
    let panels: Vec<&str> = admin_panels(session.role()).iter().map(|p| p.label()).collect();
    if !panels.is_empty() {
        println!("{:<15} {}", "Panels", panels.join(", "));
    }
}

fn print_table(title: &str, header: String, rows: Vec<String>, empty: &str) {
    println!("\n--- {} ---", title);
    if rows.is_empty() {
        println!("{}", empty);
        return;
    }
    println!("{}", header);
    println!("{}", "-".repeat(header.len()));
    for row in rows {
        println!("{}", row);
    }
}

pub fn appointment_line(row: &AppointmentRow) -> String {
    let a = &row.appointment;
    format!(
        "{:<12} {:<12} {:<6} {:<22} {:<15} {}",
        a.id,
        a.date().format("%Y-%m-%d").to_string(),
        a.time().format("%H:%M").to_string(),
        row.counterpart.to_string(),
        a.status.as_str(),
        a.subject
    )
}

pub fn print_appointments(rows: &[AppointmentRow], counterpart: &str) {
    let header = format!(
        "{:<12} {:<12} {:<6} {:<22} {:<15} {}",
        "Id", "Date", "Time", counterpart, "Status", "Reason"
    );
    let lines = rows.iter().map(appointment_line).collect();
    print_table("Appointments", header, lines, "No appointments.");
}

pub fn print_doctor_choices(choices: &[DoctorChoice]) {
    let header = format!("{:<12} {}", "Id", "Doctor");
    let rows = choices.iter().map(|c| format!("{:<12} {}", c.id, c.label)).collect();
    print_table("Doctors", header, rows, "No doctors available.");
}

pub fn print_tools(links: &[ToolLink]) {
    println!("\n--- Medical Diagnostic Tools ---");
    for link in links {
        println!("{:<45} {}", link.title, link.url);
    }
}

pub fn room_line(room: &Room) -> String {
    format!(
        "{:<12} {:<8} {:<6} {:<9} {}",
        room.id,
        room.number,
        room.beds,
        room.occupied,
        room.available_beds()
    )
}

pub fn print_rooms(rooms: &[Room]) {
    let header =
        format!("{:<12} {:<8} {:<6} {:<9} {}", "Id", "Number", "Beds", "Occupied", "Available");
    print_table("Rooms", header, rooms.iter().map(room_line).collect(), "No rooms.");
}

pub fn print_personnel(people: &[UserProfile]) {
    let header = format!(
        "{:<12} {:<24} {:<8} {:<28} {:<14} {}",
        "Id", "Name", "Role", "Email", "Tel", "Specialty"
    );
    let rows = people
        .iter()
        .map(|p| {
            format!(
                "{:<12} {:<24} {:<8} {:<28} {:<14} {}",
                p.id,
                p.full_name(),
                p.role.to_string(),
                p.email,
                p.tel,
                p.specialty.as_deref().unwrap_or("-")
            )
        })
        .collect();
    print_table("Doctors", header, rows, "No accounts.");
}

pub fn print_own_availability(slots: &[Availability]) {
    let header = format!("{:<12} {:<10} {:<28} {}", "Id", "Day", "Shift", "Status");
    let rows = slots
        .iter()
        .map(|s| {
            let day = s.day.to_string();
            format!("{:<12} {:<10} {:<28} {}", s.id, day, s.shift.label(), s.status_label())
        })
        .collect();
    print_table("My Availability", header, rows, "No availability declared.");
}

pub fn print_availability(rows: &[AvailabilityRow]) {
    let header = format!("{:<12} {:<22} {:<10} {:<10} {}", "Id", "Staff", "Day", "Shift", "Status");
    let lines = rows
        .iter()
        .map(|r| {
            format!(
                "{:<12} {:<22} {:<10} {:<10} {}",
                r.slot.id,
                r.staff.to_string(),
                r.slot.day.to_string(),
                r.slot.shift.to_string(),
                r.slot.status_label()
            )
        })
        .collect();
    print_table("Nurses", header, lines, "No availability declared.");
}

pub fn record_line(row: &RecordRow) -> String {
    let r = &row.record;
    format!(
        "{:<12} {:<24} {:<24} {:<10.2} {:<5} {}",
        r.id,
        row.doctor.label(DOCTOR_DELETED),
        row.patient.label(CLIENT_DELETED),
        r.invoice,
        if r.hospitalized { "yes" } else { "no" },
        r.description
    )
}

pub fn print_records(rows: &[RecordRow]) {
    let header = format!(
        "{:<12} {:<24} {:<24} {:<10} {:<5} {}",
        "Id", "Doctor", "Patient", "Invoice", "Hosp", "Description"
    );
    print_table("Med-Rec", header, rows.iter().map(record_line).collect(), "No medical records.");
}

pub fn print_profile(view: &ProfileView) {
    println!("\n--- Profile ---");
    println!("[{}] {}", view.initials.bold(), view.full_name);
    for line in &view.lines {
        println!("{:<15} {}", line.field.wire_key(), line.value);
    }
}

/// Prints a list re-read after an admin action, or why it could not be.
pub fn print_loadable<T>(list: &Loadable<Vec<T>>, print: impl Fn(&[T])) {
    match list {
        Loadable::Ready(items) => print(items),
        Loadable::Failed(message) => eprintln!("{}", message.red()),
        Loadable::Idle | Loadable::Loading => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use client::Resolved;
    use models::medical::{Appointment, AppointmentStatus, MedicalRecord, PersonName};

    #[test]
    fn appointment_row_layout() {
        let day = NaiveDate::from_ymd_opt(2031, 3, 4).unwrap();
        let row = AppointmentRow {
            appointment: Appointment {
                id: "appt-1".into(),
                doctor_id: "doc-1".into(),
                patient_id: "pat-1".into(),
                day: day.and_time(NaiveTime::MIN).and_utc(),
                hour: day.and_hms_opt(10, 30, 0).unwrap().and_utc(),
                subject: "Persistent cough".into(),
                status: AppointmentStatus::Confirmed,
            },
            counterpart: Resolved::Name(PersonName {
                name: "Ann".into(),
                family_name: "Perkins".into(),
            }),
        };
        let line = appointment_line(&row);
        assert!(line.starts_with("appt-1       2031-03-04   10:30  Ann Perkins"));
        assert!(line.ends_with("Confirmed       Persistent cough"));
    }

    #[test]
    fn record_row_marks_deleted_accounts() {
        let row = RecordRow {
            record: MedicalRecord {
                id: "rec-1".into(),
                doctor_id: "doc-9".into(),
                patient_id: "pat-9".into(),
                description: "Fracture".into(),
                prescription: "Cast".into(),
                invoice: 90.0,
                hospitalized: true,
            },
            doctor: Resolved::Deleted,
            patient: Resolved::Unavailable,
        };
        let line = record_line(&row);
        assert!(line.contains(DOCTOR_DELETED));
        assert!(line.contains("Unknown"));
        assert!(line.contains("90.00"));
    }

    #[test]
    fn room_row_shows_free_beds() {
        let room = Room { id: "room-101".into(), number: 101, beds: 4, occupied: 1 };
        assert_eq!(room_line(&room), "room-101     101      4      1         3");
    }
}
