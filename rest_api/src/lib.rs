// rest_api/src/lib.rs

// Access to the hospital's REST services: where they live (`config`), the
// contract the portal relies on (`api`), and two implementations of it, one
// over HTTP (`client`) and one in memory (`memory`).

pub mod api;
pub mod client;
pub mod config;
pub mod memory;

pub use api::{Directory, HospitalApi, SharedApi};
pub use client::RestClient;
pub use config::{DiagnosticTool, DiagnosticsConfig, Service, ServiceConfig, ServicePorts};
pub use memory::{Failure, InMemoryHospital};
