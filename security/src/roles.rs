// security/src/roles.rs

use lazy_static::lazy_static;
use models::medical::Role;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Operations the portal gates by role. Every client operation names one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    ListDoctors,
    BookAppointment,
    ViewOwnAppointments,
    ConfirmAppointment,
    CreateMedicalRecord,
    Hospitalize,
    ViewRooms,
    ManageRooms,
    ManageDoctors,
    ManageMedicalRecords,
    DeclareAvailability,
    ViewOwnAvailability,
    ManageAvailability,
    EditProfile,
    UseDiagnostics,
    UploadDocument,
}

impl Action {
    pub const ALL: [Action; 16] = [
        Action::ListDoctors,
        Action::BookAppointment,
        Action::ViewOwnAppointments,
        Action::ConfirmAppointment,
        Action::CreateMedicalRecord,
        Action::Hospitalize,
        Action::ViewRooms,
        Action::ManageRooms,
        Action::ManageDoctors,
        Action::ManageMedicalRecords,
        Action::DeclareAvailability,
        Action::ViewOwnAvailability,
        Action::ManageAvailability,
        Action::EditProfile,
        Action::UseDiagnostics,
        Action::UploadDocument,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Action::ListDoctors => "list_doctors",
            Action::BookAppointment => "book_appointment",
            Action::ViewOwnAppointments => "view_own_appointments",
            Action::ConfirmAppointment => "confirm_appointment",
            Action::CreateMedicalRecord => "create_medical_record",
            Action::Hospitalize => "hospitalize",
            Action::ViewRooms => "view_rooms",
            Action::ManageRooms => "manage_rooms",
            Action::ManageDoctors => "manage_doctors",
            Action::ManageMedicalRecords => "manage_medical_records",
            Action::DeclareAvailability => "declare_availability",
            Action::ViewOwnAvailability => "view_own_availability",
            Action::ManageAvailability => "manage_availability",
            Action::EditProfile => "edit_profile",
            Action::UseDiagnostics => "use_diagnostics",
            Action::UploadDocument => "upload_document",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('-', "_");
        Action::ALL
            .into_iter()
            .find(|a| a.as_str() == wanted)
            .ok_or_else(|| format!("Unknown action: {}", s))
    }
}

/// Actions granted to each role.
#[derive(Debug, Clone)]
pub struct RolesConfig {
    roles: HashMap<Role, Vec<Action>>,
}

impl Default for RolesConfig {
    fn default() -> Self {
        use Action::*;

        let mut roles = HashMap::new();
        roles.insert(
            Role::Patient,
            vec![
                ListDoctors,
                BookAppointment,
                ViewOwnAppointments,
                UseDiagnostics,
                UploadDocument,
                EditProfile,
            ],
        );
        roles.insert(
            Role::Doctor,
            vec![
                ViewOwnAppointments,
                ConfirmAppointment,
                CreateMedicalRecord,
                Hospitalize,
                ViewRooms,
                EditProfile,
            ],
        );
        roles.insert(Role::Staff, vec![DeclareAvailability, ViewOwnAvailability, EditProfile]);
        roles.insert(
            Role::Admin,
            vec![
                ListDoctors,
                ViewRooms,
                ManageRooms,
                ManageDoctors,
                ManageMedicalRecords,
                ManageAvailability,
                EditProfile,
            ],
        );
        RolesConfig { roles }
    }
}

impl RolesConfig {
    pub fn permissions(&self, role: Role) -> &[Action] {
        self.roles.get(&role).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_permission(&self, role: Role, action: Action) -> bool {
        self.permissions(role).contains(&action)
    }
}

lazy_static! {
    static ref DEFAULT_ROLES: RolesConfig = RolesConfig::default();
}

/// Checks `action` against the built-in role table.
pub fn has_permission(role: Role, action: Action) -> bool {
    DEFAULT_ROLES.has_permission(role, action)
}
