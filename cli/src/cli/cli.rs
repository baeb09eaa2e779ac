// cli/src/cli/cli.rs

// Entry point of the CLI: builds the backend from the configuration, loads
// the stored sign-in and dispatches the parsed command.

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use client::auth::Portal;
use client::records::StayRequest;
use log::{debug, info};
use rest_api::{InMemoryHospital, RestClient, ServiceConfig, SharedApi};
use security::Session;
use std::process;
use std::sync::Arc;

use crate::cli::commands::{
    AdminArea, AppointmentsAction, AvailabilityAction, CliArgs, Commands, ConfigAction,
    DiagnosticsAction, DoctorAction, PatientAction, ProfileAction, RecordsAction,
};
use crate::cli::session_store::SessionStore;
use crate::cli::{handlers, handlers_admin, interactive, render};

const NOT_SIGNED_IN: &str = "Not signed in. Use 'doctor sign-in' or 'patient sign-in' first.";

/// State shared by every handler: the backend, the configuration it was
/// built from, the signed-in account and, for one-shot commands, where that
/// account is persisted.
pub struct CliContext {
    pub api: SharedApi,
    pub config: ServiceConfig,
    pub session: Option<Session>,
    pub store: Option<SessionStore>,
    pub sandbox: bool,
}

impl CliContext {
    pub fn new(api: SharedApi, sandbox: bool) -> Self {
        CliContext { api, config: ServiceConfig::default(), session: None, store: None, sandbox }
    }

    pub fn with_config(mut self, config: ServiceConfig) -> Self {
        self.config = config;
        self
    }

    /// Attaches a store and picks up the session saved in it.
    pub fn with_store(mut self, store: SessionStore) -> Result<Self> {
        self.session = store.load()?;
        self.store = Some(store);
        Ok(self)
    }

    /// The backend named by the arguments: the seeded sandbox, or the REST
    /// services described by `config`.
    pub fn backend(args: &CliArgs, config: &ServiceConfig) -> Result<SharedApi> {
        if args.sandbox {
            info!("Using the in-memory sandbox hospital");
            return Ok(Arc::new(InMemoryHospital::seeded()));
        }
        let client = RestClient::new(config.clone()).context("Failed to build the HTTP client")?;
        Ok(Arc::new(client))
    }

    pub fn session(&self) -> Result<&Session> {
        self.session.as_ref().ok_or_else(|| anyhow!(NOT_SIGNED_IN))
    }

    /// Records a new sign-in, or a changed profile, and persists it.
    pub fn set_session(&mut self, session: Session) -> Result<()> {
        if let Some(store) = &self.store {
            store.save(&session)?;
        }
        self.session = Some(session);
        Ok(())
    }

    pub fn clear_session(&mut self) -> Result<()> {
        if let Some(store) = &self.store {
            store.clear()?;
        }
        self.session = None;
        Ok(())
    }

    /// Keeps later changes in memory only.
    pub fn detach_store(&mut self) {
        self.store = None;
    }
}

pub async fn start_cli() -> Result<()> {
    let args = CliArgs::parse();
    let config = ServiceConfig::resolve(args.config.as_deref(), args.host.as_deref())?;
    debug!("Service configuration: {:?}", config);
    let api = CliContext::backend(&args, &config)?;
    let store = SessionStore::default_location(args.sandbox)?;
    let mut ctx = CliContext::new(api, args.sandbox)
        .with_config(config)
        .with_store(store)?;

    match args.command {
        Some(Commands::Interactive) | None => {
            ctx.detach_store();
            interactive::run_cli_interactive(&mut ctx).await
        }
        Some(command) => {
            if let Err(e) = dispatch(&mut ctx, command).await {
                render::print_failure(&e);
                process::exit(1);
            }
            Ok(())
        }
    }
}

/// Runs one command against `ctx`.
pub async fn dispatch(ctx: &mut CliContext, command: Commands) -> Result<()> {
    match command {
        Commands::Doctor(wrapper) => match wrapper.command {
            DoctorAction::SignIn(args) => handlers::handle_sign_in(ctx, Portal::Doctor, args).await,
            DoctorAction::SignUp(args) => handlers::handle_doctor_sign_up(ctx, args).await,
        },
        Commands::Patient(wrapper) => match wrapper.command {
            PatientAction::SignIn(args) => {
                handlers::handle_sign_in(ctx, Portal::Patient, args).await
            }
            PatientAction::SignUp(args) => handlers::handle_patient_sign_up(ctx, args).await,
        },
        Commands::SignOut => handlers::handle_sign_out(ctx),
        Commands::Whoami => handlers::handle_whoami(ctx),
        Commands::Doctors => handlers::handle_doctor_choices(ctx).await,
        Commands::Appointments(wrapper) => match wrapper.command {
            AppointmentsAction::List { confirmed } => {
                handlers::handle_list_appointments(ctx, confirmed).await
            }
            AppointmentsAction::Book { doctor, date, time, reason } => {
                handlers::handle_book(ctx, doctor, date, time, reason).await
            }
            AppointmentsAction::Confirm { id } => handlers::handle_confirm(ctx, &id).await,
        },
        Commands::Records(wrapper) => match wrapper.command {
            RecordsAction::Create { appointment, record } => {
                handlers::handle_create_record(ctx, &appointment, record).await
            }
            RecordsAction::Hospitalize { appointment, record, room, beds, arrival, departure } => {
                let stay = StayRequest { room_id: room, beds, arrival, departure };
                handlers::handle_hospitalize(ctx, &appointment, record, stay).await
            }
        },
        Commands::Rooms => handlers::handle_rooms(ctx).await,
        Commands::Availability(wrapper) => match wrapper.command {
            AvailabilityAction::Add { day, shift } => {
                handlers::handle_declare_availability(ctx, day, shift).await
            }
            AvailabilityAction::List => handlers::handle_own_availability(ctx).await,
        },
        Commands::Profile(wrapper) => match wrapper.command {
            ProfileAction::Show => handlers::handle_profile_show(ctx),
            ProfileAction::Set { field, value } => {
                handlers::handle_profile_set(ctx, field, &value).await
            }
        },
        Commands::Diagnostics(wrapper) => match wrapper.command {
            DiagnosticsAction::Tools => handlers::handle_diagnostic_tools(ctx),
            DiagnosticsAction::Upload { file } => handlers::handle_upload(ctx, &file).await,
        },
        Commands::Config(wrapper) => match wrapper.command {
            ConfigAction::Show => handlers::handle_config_show(ctx),
            ConfigAction::Url { service } => handlers::handle_config_url(ctx, service),
        },
        Commands::Admin(wrapper) => match wrapper.command {
            AdminArea::Rooms(w) => handlers_admin::handle_rooms(ctx, w.command).await,
            AdminArea::Doctors(w) => handlers_admin::handle_doctors(ctx, w.command).await,
            AdminArea::Availability(w) => {
                handlers_admin::handle_availability(ctx, w.command).await
            }
            AdminArea::Records(w) => handlers_admin::handle_records(ctx, w.command).await,
        },
        Commands::Interactive => Err(anyhow!("Already in interactive mode.")),
    }
}
