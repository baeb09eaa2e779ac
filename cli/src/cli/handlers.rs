// cli/src/cli/handlers.rs

// Handlers for account, patient, doctor and staff commands. Each one runs
// the matching client flow and prints its outcome.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, NaiveTime};
use client::auth::{self, Portal};
use client::records::StayRequest;
use client::{appointments, booking, diagnostics, profile, records, staff};
use log::info;
use models::medical::{Document, ProfileField, Role, Shift, Weekday};
use rest_api::Service;
use std::path::Path;
use models::validation::{BookingForm, DoctorSignUpForm, PatientSignUpForm, RecordForm};

use crate::cli::cli::CliContext;
use crate::cli::commands::{DoctorSignUpArgs, PatientSignUpArgs, RecordArgs, SignInArgs};
use crate::cli::render;

pub async fn handle_sign_in(ctx: &mut CliContext, portal: Portal, args: SignInArgs) -> Result<()> {
    let session = auth::sign_in(ctx.api.as_ref(), portal, &args.email, &args.password).await?;
    println!(
        "Signed in as {} ({}). Home: {}",
        session.user.full_name(),
        session.role(),
        session.home()
    );
    ctx.set_session(session)
}

pub async fn handle_doctor_sign_up(ctx: &mut CliContext, args: DoctorSignUpArgs) -> Result<()> {
    let form = DoctorSignUpForm {
        name: args.name,
        family_name: args.family_name,
        email: args.email,
        tel: args.tel,
        specialty: args.specialty,
        password: args.password,
        confirmation: args.confirmation,
    };
    let notice = auth::sign_up_doctor(ctx.api.as_ref(), &form).await?;
    render::print_notice(&notice);
    Ok(())
}

pub async fn handle_patient_sign_up(ctx: &mut CliContext, args: PatientSignUpArgs) -> Result<()> {
    let form = PatientSignUpForm {
        name: args.name,
        family_name: args.family_name,
        email: args.email,
        tel: args.tel,
        address: args.address,
        password: args.password,
        confirmation: args.confirmation,
    };
    let notice = auth::sign_up_patient(ctx.api.as_ref(), &form).await?;
    render::print_notice(&notice);
    Ok(())
}

pub fn handle_sign_out(ctx: &mut CliContext) -> Result<()> {
    match ctx.session.take() {
        Some(session) => {
            info!("{} signed out", session.user_id());
            println!("Signed out {}.", session.user.full_name());
        }
        None => println!("Not signed in."),
    }
    ctx.clear_session()
}

pub fn handle_whoami(ctx: &CliContext) -> Result<()> {
    match &ctx.session {
        Some(session) => render::print_session(session),
        None => println!("Not signed in."),
    }
    if ctx.sandbox {
        println!("(sandbox backend)");
    }
    Ok(())
}

pub async fn handle_doctor_choices(ctx: &CliContext) -> Result<()> {
    let choices = booking::doctor_choices(ctx.api.as_ref(), ctx.session()?).await?;
    render::print_doctor_choices(&choices);
    Ok(())
}

/// Patients list their bookings; doctors list the unconfirmed requests, or
/// the confirmed ones they still have to close.
pub async fn handle_list_appointments(ctx: &CliContext, confirmed: bool) -> Result<()> {
    let session = ctx.session()?;
    let api = ctx.api.as_ref();
    if session.role() == Role::Patient {
        let rows = appointments::patient_appointments(api, session).await?;
        render::print_appointments(&rows, "Doctor");
    } else if confirmed {
        let rows = appointments::confirmed_appointments(api, session).await?;
        render::print_appointments(&rows, "Patient");
    } else {
        let rows = appointments::pending_appointments(api, session).await?;
        render::print_appointments(&rows, "Patient");
    }
    Ok(())
}

pub async fn handle_book(
    ctx: &CliContext,
    doctor: Option<String>,
    date: NaiveDate,
    time: NaiveTime,
    reason: Option<String>,
) -> Result<()> {
    let form = BookingForm { doctor_id: doctor, date, time, reason: reason.unwrap_or_default() };
    let today = Local::now().date_naive();
    let notice = booking::book(ctx.api.as_ref(), ctx.session()?, &form, today).await?;
    render::print_notice(&notice);
    Ok(())
}

pub async fn handle_confirm(ctx: &CliContext, appointment_id: &str) -> Result<()> {
    let notice = appointments::confirm(ctx.api.as_ref(), ctx.session()?, appointment_id).await?;
    render::print_notice(&notice);
    Ok(())
}

fn record_form(args: RecordArgs) -> RecordForm {
    RecordForm { prescription: args.prescription, invoice: args.invoice }
}

pub async fn handle_create_record(
    ctx: &CliContext,
    appointment_id: &str,
    args: RecordArgs,
) -> Result<()> {
    let session = ctx.session()?;
    let api = ctx.api.as_ref();
    let appointment = appointments::find_confirmed(api, session, appointment_id).await?;
    let notice = records::create_record(api, session, &appointment, &record_form(args)).await?;
    render::print_notice(&notice);
    Ok(())
}

pub async fn handle_hospitalize(
    ctx: &CliContext,
    appointment_id: &str,
    args: RecordArgs,
    stay: StayRequest,
) -> Result<()> {
    let session = ctx.session()?;
    let api = ctx.api.as_ref();
    let appointment = appointments::find_confirmed(api, session, appointment_id).await?;
    let notice = records::hospitalize(api, session, &appointment, &record_form(args), &stay).await?;
    render::print_notice(&notice);
    Ok(())
}

pub async fn handle_rooms(ctx: &CliContext) -> Result<()> {
    let rooms = records::room_choices(ctx.api.as_ref(), ctx.session()?).await?;
    render::print_rooms(&rooms);
    Ok(())
}

pub async fn handle_declare_availability(
    ctx: &CliContext,
    day: Option<Weekday>,
    shift: Option<Shift>,
) -> Result<()> {
    let notice = staff::declare(ctx.api.as_ref(), ctx.session()?, day, shift).await?;
    render::print_notice(&notice);
    Ok(())
}

pub async fn handle_own_availability(ctx: &CliContext) -> Result<()> {
    let slots = staff::my_availability(ctx.api.as_ref(), ctx.session()?).await?;
    render::print_own_availability(&slots);
    Ok(())
}

pub fn handle_profile_show(ctx: &CliContext) -> Result<()> {
    render::print_profile(&profile::view(ctx.session()?));
    Ok(())
}

pub async fn handle_profile_set(
    ctx: &mut CliContext,
    field: ProfileField,
    value: &str,
) -> Result<()> {
    let mut session = ctx.session()?.clone();
    let notice = profile::update_field(ctx.api.as_ref(), &mut session, field, value).await?;
    ctx.set_session(session)?;
    render::print_notice(&notice);
    Ok(())
}

pub fn handle_diagnostic_tools(ctx: &CliContext) -> Result<()> {
    render::print_tools(&diagnostics::tools(ctx.session()?, &ctx.config)?);
    Ok(())
}

pub async fn handle_upload(ctx: &CliContext, path: &Path) -> Result<()> {
    let session = ctx.session()?;
    let content = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let document = Document::from_path(path, content);
    let notice = diagnostics::upload(ctx.api.as_ref(), session, &document).await?;
    render::print_notice(&notice);
    Ok(())
}

pub fn handle_config_show(ctx: &CliContext) -> Result<()> {
    print!("{}", ctx.config.to_toml_string()?);
    if ctx.sandbox {
        println!("# the sandbox backend ignores the service addresses");
    }
    Ok(())
}

pub fn handle_config_url(ctx: &CliContext, service: Option<Service>) -> Result<()> {
    let services = match service {
        Some(service) => vec![service],
        None => Service::ALL.to_vec(),
    };
    for service in services {
        println!("{:<16} {}", service.name(), ctx.config.base_url(service));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::session_store::{SessionStore, SESSION_FILE_NAME};
    use client::ScreenError;
    use rest_api::{HospitalApi, InMemoryHospital, SharedApi};
    use std::sync::Arc;
    use tempfile::tempdir;

    fn sandbox() -> (CliContext, Arc<InMemoryHospital>) {
        let hospital = Arc::new(InMemoryHospital::seeded());
        let api: SharedApi = hospital.clone();
        (CliContext::new(api, true), hospital)
    }

    fn sign_in_args(email: &str, password: &str) -> SignInArgs {
        SignInArgs { email: email.into(), password: password.into() }
    }

    #[tokio::test]
    async fn sign_in_persists_and_sign_out_clears() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path().join(SESSION_FILE_NAME));
        let (ctx, _) = sandbox();
        let mut ctx = ctx.with_store(store.clone()).unwrap();

        handle_sign_in(&mut ctx, Portal::Doctor, sign_in_args("house@hospital.test", "doctor123"))
            .await
            .unwrap();
        assert_eq!(store.load().unwrap().unwrap().user.id, "doc-1");

        handle_sign_out(&mut ctx).unwrap();
        assert!(ctx.session.is_none());
        assert!(store.load().unwrap().is_none());
    }

    #[tokio::test]
    async fn failed_sign_in_keeps_screen_wording() {
        let (mut ctx, _) = sandbox();
        let err = handle_sign_in(&mut ctx, Portal::Patient, sign_in_args("nobody@x.test", "abc123"))
            .await
            .unwrap_err();
        let screen = err.downcast_ref::<ScreenError>().unwrap();
        assert_eq!(screen.message, client::feedback::PATIENT_NOT_FOUND);
        assert!(ctx.session.is_none());
    }

    #[tokio::test]
    async fn commands_need_a_session() {
        let (ctx, hospital) = sandbox();
        assert!(handle_rooms(&ctx).await.is_err());
        assert!(hospital.calls().await.is_empty());
    }

    #[tokio::test]
    async fn patient_books_and_doctor_confirms() {
        let (mut ctx, hospital) = sandbox();
        handle_sign_in(&mut ctx, Portal::Patient, sign_in_args("ann@patients.test", "patient123"))
            .await
            .unwrap();
        let date = Local::now().date_naive() + chrono::Duration::days(3);
        handle_book(
            &ctx,
            Some("doc-2".into()),
            date,
            NaiveTime::from_hms_opt(11, 0, 0).unwrap(),
            Some("Knee pain".into()),
        )
        .await
        .unwrap();

        let booked = hospital
            .appointments()
            .await
            .into_iter()
            .find(|a| a.subject == "Knee pain")
            .unwrap();

        handle_sign_in(&mut ctx, Portal::Doctor, sign_in_args("grey@hospital.test", "doctor123"))
            .await
            .unwrap();
        handle_confirm(&ctx, &booked.id).await.unwrap();
        handle_create_record(
            &ctx,
            &booked.id,
            RecordArgs { prescription: "Rest".into(), invoice: "45".into() },
        )
        .await
        .unwrap();
        assert_eq!(hospital.medical_records().await.len(), 1);
        assert!(hospital.appointments().await.iter().all(|a| a.id != booked.id));
    }

    #[tokio::test]
    async fn profile_edit_updates_the_stored_session() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path().join(SESSION_FILE_NAME));
        let (ctx, hospital) = sandbox();
        let mut ctx = ctx.with_store(store.clone()).unwrap();
        handle_sign_in(&mut ctx, Portal::Doctor, sign_in_args("carla@hospital.test", "staff123"))
            .await
            .unwrap();

        handle_profile_set(&mut ctx, ProfileField::Tel, "0699").await.unwrap();
        assert_eq!(store.load().unwrap().unwrap().user.tel, "0699");
        let stored = hospital
            .get_profile(rest_api::Directory::Doctors, "staff-1")
            .await
            .unwrap();
        assert_eq!(stored.tel, "0699");
    }

    #[tokio::test]
    async fn patient_uploads_a_document() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("xray.png");
        std::fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();
        let (mut ctx, hospital) = sandbox();
        handle_sign_in(&mut ctx, Portal::Patient, sign_in_args("ann@patients.test", "patient123"))
            .await
            .unwrap();

        handle_diagnostic_tools(&ctx).unwrap();
        handle_upload(&ctx, &path).await.unwrap();
        let uploads = hospital.uploads().await;
        assert_eq!(uploads[0].file_name, "xray.png");
        assert_eq!(uploads[0].mime_type, "image/png");

        let err = handle_upload(&ctx, &dir.path().join("missing.pdf")).await.unwrap_err();
        assert!(err.to_string().contains("missing.pdf"));
        assert_eq!(hospital.uploads().await.len(), 1);
    }

    #[test]
    fn config_commands_need_no_session() {
        let (ctx, _) = sandbox();
        let ctx = ctx.with_config(rest_api::ServiceConfig::with_host("10.9.8.7"));
        handle_config_show(&ctx).unwrap();
        handle_config_url(&ctx, Some(Service::Beds)).unwrap();
        handle_config_url(&ctx, None).unwrap();
        assert!(handle_diagnostic_tools(&ctx).is_err());
    }
}
