// client/src/appointments.rs

use log::info;
use models::medical::{Appointment, AppointmentQuery};
use rest_api::{Directory, HospitalApi};
use security::{Action, Session};

use crate::feedback::{
    Notice, ScreenError, ScreenResult, APPOINTMENT_CONFIRMED, FETCH_APPOINTMENTS_FAILED,
    GENERIC_ERROR,
};
use crate::lookup::{name_of, resolve_names, Resolved};

/// An appointment with the name of the other party: the doctor on patient
/// screens, the patient on doctor screens.
#[derive(Debug, Clone, PartialEq)]
pub struct AppointmentRow {
    pub appointment: Appointment,
    pub counterpart: Resolved,
}

async fn with_names(
    api: &dyn HospitalApi,
    appointments: Vec<Appointment>,
    directory: Directory,
) -> Vec<AppointmentRow> {
    let names = resolve_names(
        api,
        directory,
        appointments.iter().map(|a| match directory {
            Directory::Doctors => a.doctor_id.as_str(),
            Directory::Patients => a.patient_id.as_str(),
        }),
    )
    .await;

    appointments
        .into_iter()
        .map(|appointment| {
            let id = match directory {
                Directory::Doctors => &appointment.doctor_id,
                Directory::Patients => &appointment.patient_id,
            };
            let counterpart = name_of(&names, id);
            AppointmentRow { appointment, counterpart }
        })
        .collect()
}

async fn doctor_appointments(
    api: &dyn HospitalApi,
    session: &Session,
) -> ScreenResult<Vec<Appointment>> {
    session
        .guard(Action::ViewOwnAppointments)
        .map_err(ScreenError::with(FETCH_APPOINTMENTS_FAILED))?;
    api.list_appointments(&AppointmentQuery::for_doctor(session.user_id()))
        .await
        .map_err(ScreenError::with(FETCH_APPOINTMENTS_FAILED))
}

/// Patient home: every appointment of the patient with its doctor's name.
pub async fn patient_appointments(
    api: &dyn HospitalApi,
    session: &Session,
) -> ScreenResult<Vec<AppointmentRow>> {
    session
        .guard(Action::ViewOwnAppointments)
        .map_err(ScreenError::with(FETCH_APPOINTMENTS_FAILED))?;
    let appointments = api
        .list_appointments(&AppointmentQuery::for_patient(session.user_id()))
        .await
        .map_err(ScreenError::with(FETCH_APPOINTMENTS_FAILED))?;
    Ok(with_names(api, appointments, Directory::Doctors).await)
}

/// Doctor home: appointments still waiting for confirmation.
pub async fn pending_appointments(
    api: &dyn HospitalApi,
    session: &Session,
) -> ScreenResult<Vec<AppointmentRow>> {
    let pending = doctor_appointments(api, session)
        .await?
        .into_iter()
        .filter(|a| !a.status.is_confirmed())
        .collect();
    Ok(with_names(api, pending, Directory::Patients).await)
}

/// Doctor Appointments tab: confirmed appointments, ready to be closed with
/// a medical record.
pub async fn confirmed_appointments(
    api: &dyn HospitalApi,
    session: &Session,
) -> ScreenResult<Vec<AppointmentRow>> {
    let confirmed = doctor_appointments(api, session)
        .await?
        .into_iter()
        .filter(|a| a.status.is_confirmed())
        .collect();
    Ok(with_names(api, confirmed, Directory::Patients).await)
}

/// Confirms `appointment_id`.
pub async fn confirm(
    api: &dyn HospitalApi,
    session: &Session,
    appointment_id: &str,
) -> ScreenResult<Notice> {
    session
        .guard(Action::ConfirmAppointment)
        .map_err(ScreenError::with(GENERIC_ERROR))?;
    api.confirm_appointment(appointment_id)
        .await
        .map_err(ScreenError::with(GENERIC_ERROR))?;
    info!("{} confirmed appointment {}", session.user_id(), appointment_id);
    Ok(Notice::new(APPOINTMENT_CONFIRMED))
}

/// Finds one of the doctor's confirmed appointments by id.
pub async fn find_confirmed(
    api: &dyn HospitalApi,
    session: &Session,
    appointment_id: &str,
) -> ScreenResult<Appointment> {
    doctor_appointments(api, session)
        .await?
        .into_iter()
        .find(|a| a.id == appointment_id && a.status.is_confirmed())
        .ok_or_else(|| {
            ScreenError::new(
                format!("No confirmed appointment {}", appointment_id),
                models::errors::ApiError::NotFound(appointment_id.to_string()),
            )
        })
}
