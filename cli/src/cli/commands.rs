// cli/src/cli/commands.rs

// Command-line arguments and subcommands of the hospital CLI, defined with
// `clap`. The interactive shell re-parses each line through the same tree.

use chrono::{NaiveDate, NaiveTime};
use clap::{Args, Parser, Subcommand};
use models::medical::{ProfileField, Shift, Weekday};
use rest_api::config::HOST_ENV_VAR;
use rest_api::Service;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "hospital-cli")]
#[command(version = "0.1.0")]
#[command(about = "Hospital portal: appointments, medical records, rooms and staff")]
pub struct CliArgs {
    /// Path to a hospital.toml service configuration.
    #[arg(long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Host running the hospital services.
    #[arg(long, global = true, env = HOST_ENV_VAR)]
    pub host: Option<String>,

    /// Use the built-in in-memory hospital instead of the REST services.
    #[arg(long, global = true)]
    pub sandbox: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand, PartialEq)]
pub enum Commands {
    /// Doctor, staff and admin accounts
    Doctor(DoctorCommandWrapper),
    /// Patient accounts
    Patient(PatientCommandWrapper),
    /// Forget the stored sign-in
    SignOut,
    /// Show the signed-in account and its screens
    Whoami,
    /// Doctors available for booking
    Doctors,
    /// List, book and confirm appointments
    Appointments(AppointmentsCommandWrapper),
    /// Close a confirmed appointment with a medical record
    Records(RecordsCommandWrapper),
    /// Rooms and free beds
    Rooms,
    /// Declare and list shift availability (staff)
    Availability(AvailabilityCommandWrapper),
    /// Show or edit the signed-in profile
    Profile(ProfileCommandWrapper),
    /// Diagnostic assistants and document upload (patients)
    Diagnostics(DiagnosticsCommandWrapper),
    /// Administration panels
    Admin(AdminCommandWrapper),
    /// Show the service configuration in effect
    Config(ConfigCommandWrapper),
    /// Start the interactive shell
    Interactive,
}

#[derive(Debug, Args, PartialEq)]
pub struct DoctorCommandWrapper {
    #[clap(subcommand)]
    pub command: DoctorAction,
}

#[derive(Debug, Args, PartialEq)]
pub struct PatientCommandWrapper {
    #[clap(subcommand)]
    pub command: PatientAction,
}

#[derive(Debug, Args, PartialEq)]
pub struct AppointmentsCommandWrapper {
    #[clap(subcommand)]
    pub command: AppointmentsAction,
}

#[derive(Debug, Args, PartialEq)]
pub struct RecordsCommandWrapper {
    #[clap(subcommand)]
    pub command: RecordsAction,
}

#[derive(Debug, Args, PartialEq)]
pub struct AvailabilityCommandWrapper {
    #[clap(subcommand)]
    pub command: AvailabilityAction,
}

#[derive(Debug, Args, PartialEq)]
pub struct ProfileCommandWrapper {
    #[clap(subcommand)]
    pub command: ProfileAction,
}

#[derive(Debug, Args, PartialEq)]
pub struct DiagnosticsCommandWrapper {
    #[clap(subcommand)]
    pub command: DiagnosticsAction,
}

#[derive(Debug, Args, PartialEq)]
pub struct ConfigCommandWrapper {
    #[clap(subcommand)]
    pub command: ConfigAction,
}

#[derive(Debug, Args, PartialEq)]
pub struct AdminCommandWrapper {
    #[clap(subcommand)]
    pub command: AdminArea,
}

#[derive(Debug, Args, PartialEq)]
pub struct SignInArgs {
    #[clap(long, short = 'e')]
    pub email: String,
    #[clap(long, short = 'p')]
    pub password: String,
}

#[derive(Debug, Subcommand, PartialEq)]
pub enum DoctorAction {
    SignIn(SignInArgs),
    SignUp(DoctorSignUpArgs),
}

#[derive(Debug, Subcommand, PartialEq)]
pub enum PatientAction {
    SignIn(SignInArgs),
    SignUp(PatientSignUpArgs),
}

#[derive(Debug, Args, PartialEq)]
pub struct DoctorSignUpArgs {
    #[clap(long)]
    pub name: String,
    #[clap(long)]
    pub family_name: String,
    #[clap(long)]
    pub email: String,
    #[clap(long)]
    pub tel: String,
    #[clap(long)]
    pub specialty: String,
    #[clap(long)]
    pub password: String,
    #[clap(long = "confirm")]
    pub confirmation: String,
}

#[derive(Debug, Args, PartialEq)]
pub struct PatientSignUpArgs {
    #[clap(long)]
    pub name: String,
    #[clap(long)]
    pub family_name: String,
    #[clap(long)]
    pub email: String,
    #[clap(long)]
    pub tel: String,
    #[clap(long)]
    pub address: String,
    #[clap(long)]
    pub password: String,
    #[clap(long = "confirm")]
    pub confirmation: String,
}

#[derive(Debug, Subcommand, PartialEq)]
pub enum AppointmentsAction {
    /// Patients see their bookings; doctors see unconfirmed ones unless
    /// --confirmed is given
    List {
        #[clap(long)]
        confirmed: bool,
    },
    Book {
        #[clap(long)]
        doctor: Option<String>,
        #[clap(long, value_name = "YYYY-MM-DD")]
        date: NaiveDate,
        #[clap(long, value_name = "HH:MM", value_parser = parse_time)]
        time: NaiveTime,
        #[clap(long)]
        reason: Option<String>,
    },
    Confirm {
        #[arg(value_name = "APPOINTMENT_ID")]
        id: String,
    },
}

#[derive(Debug, Subcommand, PartialEq)]
pub enum RecordsAction {
    Create {
        #[arg(value_name = "APPOINTMENT_ID")]
        appointment: String,
        #[clap(flatten)]
        record: RecordArgs,
    },
    Hospitalize {
        #[arg(value_name = "APPOINTMENT_ID")]
        appointment: String,
        #[clap(flatten)]
        record: RecordArgs,
        #[clap(long)]
        room: String,
        #[clap(long, default_value_t = 1)]
        beds: u32,
        #[clap(long, value_name = "YYYY-MM-DD")]
        arrival: NaiveDate,
        #[clap(long, value_name = "YYYY-MM-DD")]
        departure: NaiveDate,
    },
}

#[derive(Debug, Args, PartialEq)]
pub struct RecordArgs {
    #[clap(long, default_value = "")]
    pub prescription: String,
    #[clap(long, default_value = "")]
    pub invoice: String,
}

#[derive(Debug, Subcommand, PartialEq)]
pub enum AvailabilityAction {
    Add {
        #[clap(long)]
        day: Option<Weekday>,
        #[clap(long)]
        shift: Option<Shift>,
    },
    List,
}

#[derive(Debug, Subcommand, PartialEq)]
pub enum ProfileAction {
    Show,
    Set {
        field: ProfileField,
        value: String,
    },
}

#[derive(Debug, Subcommand, PartialEq)]
pub enum DiagnosticsAction {
    /// Links to the diagnostic assistants
    Tools,
    /// Send a document to the assistants
    Upload {
        #[arg(value_hint = clap::ValueHint::FilePath)]
        file: PathBuf,
    },
}

#[derive(Debug, Subcommand, PartialEq)]
pub enum ConfigAction {
    /// Print the configuration as TOML
    Show,
    /// Base URL of one service, or of all of them
    Url { service: Option<Service> },
}

#[derive(Debug, Subcommand, PartialEq)]
pub enum AdminArea {
    Rooms(AdminRoomsWrapper),
    Doctors(AdminDoctorsWrapper),
    Availability(AdminAvailabilityWrapper),
    Records(AdminRecordsWrapper),
}

#[derive(Debug, Args, PartialEq)]
pub struct AdminRoomsWrapper {
    #[clap(subcommand)]
    pub command: AdminRoomsAction,
}

#[derive(Debug, Args, PartialEq)]
pub struct AdminDoctorsWrapper {
    #[clap(subcommand)]
    pub command: AdminDoctorsAction,
}

#[derive(Debug, Args, PartialEq)]
pub struct AdminAvailabilityWrapper {
    #[clap(subcommand)]
    pub command: AdminAvailabilityAction,
}

#[derive(Debug, Args, PartialEq)]
pub struct AdminRecordsWrapper {
    #[clap(subcommand)]
    pub command: AdminRecordsAction,
}

#[derive(Debug, Subcommand, PartialEq)]
pub enum AdminRoomsAction {
    List,
    Add {
        #[clap(long)]
        number: u32,
        #[clap(long)]
        beds: u32,
    },
    Update {
        #[arg(value_name = "ROOM_ID")]
        id: String,
        #[clap(long)]
        beds: u32,
        #[clap(long)]
        occupied: u32,
    },
    Delete {
        #[arg(value_name = "ROOM_ID")]
        id: String,
    },
}

#[derive(Debug, Subcommand, PartialEq)]
pub enum AdminDoctorsAction {
    List,
    /// Edit an account; omitted fields keep their current value
    Update {
        #[arg(value_name = "DOCTOR_ID")]
        id: String,
        #[clap(long)]
        name: Option<String>,
        #[clap(long)]
        family_name: Option<String>,
        #[clap(long)]
        email: Option<String>,
        #[clap(long)]
        tel: Option<String>,
        #[clap(long)]
        specialty: Option<String>,
    },
    Delete {
        #[arg(value_name = "DOCTOR_ID")]
        id: String,
    },
}

#[derive(Debug, Subcommand, PartialEq)]
pub enum AdminAvailabilityAction {
    List,
    Confirm {
        #[arg(value_name = "SLOT_ID")]
        id: String,
    },
    Unconfirm {
        #[arg(value_name = "SLOT_ID")]
        id: String,
    },
    Delete {
        #[arg(value_name = "SLOT_ID")]
        id: String,
    },
}

#[derive(Debug, Subcommand, PartialEq)]
pub enum AdminRecordsAction {
    List,
    Delete {
        #[arg(value_name = "RECORD_ID")]
        id: String,
    },
}

/// Accepts `HH:MM` as well as `HH:MM:SS`.
pub fn parse_time(s: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s.trim(), "%H:%M:%S"))
        .map_err(|_| format!("Invalid time '{}'. Expected HH:MM", s))
}
