// client/src/profile.rs

use log::info;
use models::medical::{ProfileChanges, ProfileField};
use rest_api::{Directory, HospitalApi};
use security::{Action, Session};

use crate::feedback::*;

/// One row of the profile screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileLine {
    pub field: ProfileField,
    pub value: String,
}

/// What the profile screen shows for the signed-in account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileView {
    pub initials: String,
    pub full_name: String,
    pub lines: Vec<ProfileLine>,
}

/// Fields an account of this session's kind carries: patients have an
/// address, doctors a specialty, staff and admins neither.
pub fn editable_fields(session: &Session) -> Vec<ProfileField> {
    ProfileField::ALL
        .into_iter()
        .filter(|field| match field {
            ProfileField::Address => session.user.address.is_some(),
            ProfileField::Specialty => session.user.specialty.is_some(),
            _ => true,
        })
        .collect()
}

pub fn view(session: &Session) -> ProfileView {
    let user = &session.user;
    ProfileView {
        initials: user.initials(),
        full_name: user.full_name(),
        lines: editable_fields(session)
            .into_iter()
            .map(|field| ProfileLine {
                field,
                value: user.field(field).unwrap_or_default().to_string(),
            })
            .collect(),
    }
}

/// Saves one field and mirrors it into the session on success.
pub async fn update_field(
    api: &dyn HospitalApi,
    session: &mut Session,
    field: ProfileField,
    value: &str,
) -> ScreenResult<Notice> {
    session.guard(Action::EditProfile).map_err(ScreenError::with(SAVE_FAILED))?;
    let changes = ProfileChanges::single(field, value);
    let directory = Directory::for_role(session.role());
    api.update_profile(directory, session.user_id(), &changes)
        .await
        .map_err(ScreenError::with(SAVE_FAILED))?;
    session.apply(&changes);
    info!("{} updated {}", session.user_id(), field.wire_key());
    Ok(Notice::new(format!("Updated {}", field.wire_key())))
}
