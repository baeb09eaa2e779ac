// security/src/navigation.rs

use models::medical::Role;
use std::fmt;

/// Every screen of the portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    Welcome,
    DoctorSignIn,
    DoctorSignUp,
    PatientSignIn,
    PatientSignUp,
    PatientHome,
    Diagnostics,
    BookAppointment,
    DoctorHome,
    Appointments,
    Hospitalization,
    StaffHome,
    StaffAvailability,
    AdminDashboard,
    Profile,
    SignOut,
}

impl Screen {
    pub fn label(self) -> &'static str {
        match self {
            Screen::Welcome => "Welcome",
            Screen::DoctorSignIn => "Doctor sign in",
            Screen::DoctorSignUp => "Doctor sign up",
            Screen::PatientSignIn => "Patient sign in",
            Screen::PatientSignUp => "Patient sign up",
            Screen::PatientHome => "Home",
            Screen::Diagnostics => "AI",
            Screen::BookAppointment => "Book appointment",
            Screen::DoctorHome => "Home",
            Screen::Appointments => "Appointments",
            Screen::Hospitalization => "Hospitalization",
            Screen::StaffHome => "Home",
            Screen::StaffAvailability => "Availability",
            Screen::AdminDashboard => "Dashboard",
            Screen::Profile => "Profile",
            Screen::SignOut => "Sign out",
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Drawer entries of the admin dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdminPanel {
    Doctors,
    Nurses,
    MedicalRecords,
    Rooms,
}

impl AdminPanel {
    pub const ALL: [AdminPanel; 4] = [
        AdminPanel::Doctors,
        AdminPanel::Nurses,
        AdminPanel::MedicalRecords,
        AdminPanel::Rooms,
    ];

    pub fn label(self) -> &'static str {
        match self {
            AdminPanel::Doctors => "Doctors",
            AdminPanel::Nurses => "Nurses",
            AdminPanel::MedicalRecords => "Med-Rec",
            AdminPanel::Rooms => "Beds",
        }
    }
}

/// Screens available before anyone signs in.
pub const ENTRY_SCREENS: [Screen; 5] = [
    Screen::Welcome,
    Screen::DoctorSignIn,
    Screen::DoctorSignUp,
    Screen::PatientSignIn,
    Screen::PatientSignUp,
];

const PATIENT_SCREENS: [Screen; 5] = [
    Screen::PatientHome,
    Screen::Diagnostics,
    Screen::BookAppointment,
    Screen::Profile,
    Screen::SignOut,
];

const DOCTOR_SCREENS: [Screen; 4] = [
    Screen::DoctorHome,
    Screen::Appointments,
    Screen::Profile,
    Screen::SignOut,
];

const STAFF_SCREENS: [Screen; 4] = [
    Screen::StaffHome,
    Screen::StaffAvailability,
    Screen::Profile,
    Screen::SignOut,
];

const ADMIN_SCREENS: [Screen; 3] = [Screen::AdminDashboard, Screen::Profile, Screen::SignOut];

/// The tab set shown to a signed-in role, in display order.
pub fn screens_for(role: Role) -> &'static [Screen] {
    match role {
        Role::Patient => &PATIENT_SCREENS,
        Role::Doctor => &DOCTOR_SCREENS,
        Role::Staff => &STAFF_SCREENS,
        Role::Admin => &ADMIN_SCREENS,
    }
}

/// Where a role lands right after signing in.
pub fn initial_screen(role: Role) -> Screen {
    screens_for(role)[0]
}

/// Screens pushed on top of a tab rather than listed as one.
pub fn nested_screens(role: Role) -> &'static [(Screen, Screen)] {
    match role {
        Role::Doctor => &[(Screen::Appointments, Screen::Hospitalization)],
        _ => &[],
    }
}

/// True when `screen` is a tab of `role` or reachable from one.
pub fn can_reach(role: Role, screen: Screen) -> bool {
    screens_for(role).contains(&screen)
        || nested_screens(role).iter().any(|(_, nested)| *nested == screen)
}

pub fn admin_panels(role: Role) -> &'static [AdminPanel] {
    match role {
        Role::Admin => &AdminPanel::ALL,
        _ => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_screen_sets() {
        assert_eq!(
            screens_for(Role::Patient),
            &[
                Screen::PatientHome,
                Screen::Diagnostics,
                Screen::BookAppointment,
                Screen::Profile,
                Screen::SignOut
            ]
        );
        assert_eq!(
            screens_for(Role::Doctor),
            &[Screen::DoctorHome, Screen::Appointments, Screen::Profile, Screen::SignOut]
        );
        assert_eq!(
            screens_for(Role::Staff),
            &[Screen::StaffHome, Screen::StaffAvailability, Screen::Profile, Screen::SignOut]
        );
        assert_eq!(
            screens_for(Role::Admin),
            &[Screen::AdminDashboard, Screen::Profile, Screen::SignOut]
        );
    }

    #[test]
    fn lands_on_first_tab() {
        assert_eq!(initial_screen(Role::Patient), Screen::PatientHome);
        assert_eq!(initial_screen(Role::Doctor), Screen::DoctorHome);
        assert_eq!(initial_screen(Role::Staff), Screen::StaffHome);
        assert_eq!(initial_screen(Role::Admin), Screen::AdminDashboard);
    }

    #[test]
    fn hospitalization_is_doctor_only() {
        assert!(can_reach(Role::Doctor, Screen::Hospitalization));
        assert!(!screens_for(Role::Doctor).contains(&Screen::Hospitalization));
        for role in [Role::Patient, Role::Staff, Role::Admin] {
            assert!(!can_reach(role, Screen::Hospitalization));
        }
    }

    #[test]
    fn diagnostics_tab_is_patient_only() {
        assert!(can_reach(Role::Patient, Screen::Diagnostics));
        assert_eq!(Screen::Diagnostics.label(), "AI");
        for role in [Role::Doctor, Role::Staff, Role::Admin] {
            assert!(!can_reach(role, Screen::Diagnostics));
        }
    }

    #[test]
    fn drawer_belongs_to_admin() {
        assert_eq!(admin_panels(Role::Admin).len(), 4);
        assert!(admin_panels(Role::Doctor).is_empty());
        assert_eq!(AdminPanel::MedicalRecords.label(), "Med-Rec");
    }

    #[test]
    fn entry_screens_are_not_role_screens() {
        for role in Role::ALL {
            for screen in ENTRY_SCREENS {
                assert!(!can_reach(role, screen));
            }
        }
    }
}
