// cli/src/cli/handlers_admin.rs

// Handlers for the admin panels: rooms, doctors, nurses' availability and
// medical records. Every change prints its notice and the re-read list.

use anyhow::{anyhow, Result};
use client::admin;

use crate::cli::cli::CliContext;
use crate::cli::commands::{
    AdminAvailabilityAction, AdminDoctorsAction, AdminRecordsAction, AdminRoomsAction,
};
use crate::cli::render;

pub async fn handle_rooms(ctx: &CliContext, action: AdminRoomsAction) -> Result<()> {
    let session = ctx.session()?;
    let api = ctx.api.as_ref();
    let done = match action {
        AdminRoomsAction::List => {
            render::print_rooms(&admin::rooms(api, session).await?);
            return Ok(());
        }
        AdminRoomsAction::Add { number, beds } => {
            admin::add_room(api, session, number, beds).await?
        }
        AdminRoomsAction::Update { id, beds, occupied } => {
            admin::update_room(api, session, &id, beds, occupied).await?
        }
        AdminRoomsAction::Delete { id } => admin::delete_room(api, session, &id).await?,
    };
    render::print_notice(&done.notice);
    render::print_loadable(&done.list, render::print_rooms);
    Ok(())
}

pub async fn handle_doctors(ctx: &CliContext, action: AdminDoctorsAction) -> Result<()> {
    let session = ctx.session()?;
    let api = ctx.api.as_ref();
    let done = match action {
        AdminDoctorsAction::List => {
            render::print_personnel(&admin::personnel(api, session).await?);
            return Ok(());
        }
        AdminDoctorsAction::Update { id, name, family_name, email, tel, specialty } => {
            let mut doctor = admin::personnel(api, session)
                .await?
                .into_iter()
                .find(|d| d.id == id)
                .ok_or_else(|| anyhow!("No account with id {}", id))?;
            if let Some(name) = name {
                doctor.name = name;
            }
            if let Some(family_name) = family_name {
                doctor.family_name = family_name;
            }
            if let Some(email) = email {
                doctor.email = email;
            }
            if let Some(tel) = tel {
                doctor.tel = tel;
            }
            if specialty.is_some() {
                doctor.specialty = specialty;
            }
            admin::update_doctor(api, session, &doctor).await?
        }
        AdminDoctorsAction::Delete { id } => admin::delete_doctor(api, session, &id).await?,
    };
    render::print_notice(&done.notice);
    render::print_loadable(&done.list, render::print_personnel);
    Ok(())
}

pub async fn handle_availability(ctx: &CliContext, action: AdminAvailabilityAction) -> Result<()> {
    let session = ctx.session()?;
    let api = ctx.api.as_ref();
    let done = match action {
        AdminAvailabilityAction::List => {
            render::print_availability(&admin::availability(api, session).await?);
            return Ok(());
        }
        AdminAvailabilityAction::Confirm { id } => {
            admin::set_availability_confirmed(api, session, &id, true).await?
        }
        AdminAvailabilityAction::Unconfirm { id } => {
            admin::set_availability_confirmed(api, session, &id, false).await?
        }
        AdminAvailabilityAction::Delete { id } => {
            admin::delete_availability(api, session, &id).await?
        }
    };
    render::print_notice(&done.notice);
    render::print_loadable(&done.list, render::print_availability);
    Ok(())
}

pub async fn handle_records(ctx: &CliContext, action: AdminRecordsAction) -> Result<()> {
    let session = ctx.session()?;
    let api = ctx.api.as_ref();
    match action {
        AdminRecordsAction::List => {
            render::print_records(&admin::medical_records(api, session).await?)
        }
        AdminRecordsAction::Delete { id } => {
            let done = admin::delete_medical_record(api, session, &id).await?;
            render::print_notice(&done.notice);
            render::print_loadable(&done.list, render::print_records);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::SignInArgs;
    use crate::cli::handlers::handle_sign_in;
    use client::auth::Portal;
    use client::ScreenError;
    use rest_api::{InMemoryHospital, SharedApi};
    use std::sync::Arc;

    async fn admin_ctx() -> (CliContext, Arc<InMemoryHospital>) {
        let hospital = Arc::new(InMemoryHospital::seeded());
        let api: SharedApi = hospital.clone();
        let mut ctx = CliContext::new(api, true);
        let args = SignInArgs { email: "cuddy@hospital.test".into(), password: "admin123".into() };
        handle_sign_in(&mut ctx, Portal::Doctor, args).await.unwrap();
        (ctx, hospital)
    }

    #[tokio::test]
    async fn partial_doctor_update_keeps_other_fields() {
        let (ctx, hospital) = admin_ctx().await;
        handle_doctors(
            &ctx,
            AdminDoctorsAction::Update {
                id: "doc-2".into(),
                name: None,
                family_name: None,
                email: None,
                tel: Some("0622222222".into()),
                specialty: None,
            },
        )
        .await
        .unwrap();

        let directory = rest_api::Directory::Doctors;
        let grey = rest_api::HospitalApi::get_profile(hospital.as_ref(), directory, "doc-2")
            .await
            .unwrap();
        assert_eq!(grey.tel, "0622222222");
        assert_eq!(grey.specialty.as_deref(), Some("Surgery"));
        assert_eq!(grey.email, "grey@hospital.test");
    }

    #[tokio::test]
    async fn unknown_doctor_is_reported() {
        let (ctx, _) = admin_ctx().await;
        let err = handle_doctors(
            &ctx,
            AdminDoctorsAction::Update {
                id: "doc-404".into(),
                name: Some("X".into()),
                family_name: None,
                email: None,
                tel: None,
                specialty: None,
            },
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("doc-404"));
    }

    #[tokio::test]
    async fn room_and_slot_actions() {
        let (ctx, hospital) = admin_ctx().await;
        handle_rooms(&ctx, AdminRoomsAction::Add { number: 303, beds: 2 }).await.unwrap();
        assert_eq!(hospital.room("room-101").await.unwrap().beds, 4);

        let err = handle_rooms(&ctx, AdminRoomsAction::Add { number: 303, beds: 2 })
            .await
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<ScreenError>().unwrap().message,
            client::feedback::ROOM_EXISTS
        );

        handle_availability(&ctx, AdminAvailabilityAction::Confirm { id: "slot-1".into() })
            .await
            .unwrap();
        handle_records(&ctx, AdminRecordsAction::List).await.unwrap();
    }
}
