// security/src/lib.rs

// Who may see which screen and perform which action. The services do not
// enforce roles, so the client gates every operation here before it issues
// a request.

pub mod navigation;
pub mod roles;
pub mod session;

pub use navigation::{
    admin_panels, can_reach, initial_screen, screens_for, AdminPanel, Screen, ENTRY_SCREENS,
};
pub use roles::{has_permission, Action, RolesConfig};
pub use session::Session;
