// rest_api/src/config.rs

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_SCHEME: &str = "http";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Environment variable that overrides the configured host.
pub const HOST_ENV_VAR: &str = "HOSPITAL_API_HOST";

pub const CONFIG_DIR_NAME: &str = "hospital-cli";
pub const CONFIG_FILE_NAME: &str = "hospital.toml";

/// The independent REST services the portal talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Service {
    Clients,
    Doctors,
    MedicalRecords,
    Appointments,
    Beds,
    Rooms,
    Availability,
}

impl Service {
    pub const ALL: [Service; 7] = [
        Service::Clients,
        Service::Doctors,
        Service::MedicalRecords,
        Service::Appointments,
        Service::Beds,
        Service::Rooms,
        Service::Availability,
    ];

    pub fn default_port(self) -> u16 {
        match self {
            Service::Clients => 3000,
            Service::Doctors => 3002,
            Service::MedicalRecords => 3003,
            Service::Appointments => 3004,
            Service::Beds => 3005,
            Service::Rooms => 3010,
            Service::Availability => 3012,
        }
    }

    pub fn base_path(self) -> &'static str {
        match self {
            Service::Clients => "/api/clients",
            Service::Doctors => "/api/doctors",
            Service::MedicalRecords => "/api/medical-records",
            Service::Appointments => "/api/appointments",
            Service::Beds => "/api/beds",
            Service::Rooms => "/api/rooms",
            Service::Availability => "/api/availability",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Service::Clients => "clients",
            Service::Doctors => "doctors",
            Service::MedicalRecords => "medical-records",
            Service::Appointments => "appointments",
            Service::Beds => "beds",
            Service::Rooms => "rooms",
            Service::Availability => "availability",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Service {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        Service::ALL
            .into_iter()
            .find(|svc| svc.name() == wanted)
            .ok_or_else(|| anyhow!("Unknown service: {}", s))
    }
}

/// Diagnostic assistants opened from the patient's AI tab. They run on the
/// services host but outside the REST API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticTool {
    DocumentChatbot,
    Assistant,
}

impl DiagnosticTool {
    pub const ALL: [DiagnosticTool; 2] =
        [DiagnosticTool::DocumentChatbot, DiagnosticTool::Assistant];

    pub fn title(self) -> &'static str {
        match self {
            DiagnosticTool::DocumentChatbot => "Medical Chatbot Diagnostic Assistant (PDF)",
            DiagnosticTool::Assistant => "Medical Diagnostic Assistant",
        }
    }
}

/// Represents the `[diagnostics]` section of hospital.toml.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticsConfig {
    pub chatbot_port: u16,
    pub assistant_port: u16,
    /// Port of the document upload endpoint (`POST /upload`).
    pub upload_port: u16,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        DiagnosticsConfig { chatbot_port: 8502, assistant_port: 8501, upload_port: 8000 }
    }
}

/// Represents the `[ports]` section of hospital.toml.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServicePorts {
    pub clients: u16,
    pub doctors: u16,
    pub medical_records: u16,
    pub appointments: u16,
    pub beds: u16,
    pub rooms: u16,
    pub availability: u16,
}

impl Default for ServicePorts {
    fn default() -> Self {
        ServicePorts {
            clients: Service::Clients.default_port(),
            doctors: Service::Doctors.default_port(),
            medical_records: Service::MedicalRecords.default_port(),
            appointments: Service::Appointments.default_port(),
            beds: Service::Beds.default_port(),
            rooms: Service::Rooms.default_port(),
            availability: Service::Availability.default_port(),
        }
    }
}

impl ServicePorts {
    /// Every service on the same port, as when they sit behind one gateway.
    pub fn uniform(port: u16) -> Self {
        ServicePorts {
            clients: port,
            doctors: port,
            medical_records: port,
            appointments: port,
            beds: port,
            rooms: port,
            availability: port,
        }
    }

    pub fn get(&self, service: Service) -> u16 {
        match service {
            Service::Clients => self.clients,
            Service::Doctors => self.doctors,
            Service::MedicalRecords => self.medical_records,
            Service::Appointments => self.appointments,
            Service::Beds => self.beds,
            Service::Rooms => self.rooms,
            Service::Availability => self.availability,
        }
    }
}

/// Where the services live. Represents the whole of hospital.toml.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub host: String,
    pub scheme: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    pub ports: ServicePorts,
    pub diagnostics: DiagnosticsConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        ServiceConfig {
            host: DEFAULT_HOST.to_string(),
            scheme: DEFAULT_SCHEME.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            ports: ServicePorts::default(),
            diagnostics: DiagnosticsConfig::default(),
        }
    }
}

impl ServiceConfig {
    pub fn with_host(host: impl Into<String>) -> Self {
        ServiceConfig { host: host.into(), ..Self::default() }
    }

    /// Root URL of `service`, e.g. `http://127.0.0.1:3010/api/rooms`.
    pub fn base_url(&self, service: Service) -> String {
        format!(
            "{}://{}:{}{}",
            self.scheme,
            self.host,
            self.ports.get(service),
            service.base_path()
        )
    }

    pub fn tool_url(&self, tool: DiagnosticTool) -> String {
        let port = match tool {
            DiagnosticTool::DocumentChatbot => self.diagnostics.chatbot_port,
            DiagnosticTool::Assistant => self.diagnostics.assistant_port,
        };
        format!("{}://{}:{}", self.scheme, self.host, port)
    }

    pub fn upload_url(&self) -> String {
        format!("{}://{}:{}/upload", self.scheme, self.host, self.diagnostics.upload_port)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse service configuration")
    }

    /// Loads the configuration from `path`.
    ///
    /// # Returns
    /// - `Ok(ServiceConfig::default())` if the file does not exist.
    /// - `Err(anyhow::Error)` if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("In config file {}", path.display()))
    }

    /// Loads `path` (or the default location) and applies the environment
    /// and command-line host overrides, in that order.
    pub fn resolve(path: Option<&Path>, host_flag: Option<&str>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::load(p)?,
            None => match default_config_path() {
                Some(p) => Self::load(&p)?,
                None => Self::default(),
            },
        };
        config.override_host(std::env::var(HOST_ENV_VAR).ok().as_deref());
        config.override_host(host_flag);
        Ok(config)
    }

    /// Replaces the host when `host` is a non-empty value.
    pub fn override_host(&mut self, host: Option<&str>) {
        if let Some(h) = host.map(str::trim).filter(|h| !h.is_empty()) {
            self.host = h.to_string();
        }
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize service configuration")
    }
}

/// `<config dir>/hospital-cli`, where the CLI keeps its files.
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(CONFIG_DIR_NAME))
}

pub fn default_config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults_match_service_table() {
        let config = ServiceConfig::default();
        assert_eq!(config.base_url(Service::Clients), "http://127.0.0.1:3000/api/clients");
        assert_eq!(config.base_url(Service::Doctors), "http://127.0.0.1:3002/api/doctors");
        assert_eq!(
            config.base_url(Service::MedicalRecords),
            "http://127.0.0.1:3003/api/medical-records"
        );
        assert_eq!(
            config.base_url(Service::Appointments),
            "http://127.0.0.1:3004/api/appointments"
        );
        assert_eq!(config.base_url(Service::Beds), "http://127.0.0.1:3005/api/beds");
        assert_eq!(config.base_url(Service::Rooms), "http://127.0.0.1:3010/api/rooms");
        assert_eq!(
            config.base_url(Service::Availability),
            "http://127.0.0.1:3012/api/availability"
        );
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "host = \"10.0.0.5\"\n\n[ports]\nrooms = 4010").unwrap();

        let config = ServiceConfig::load(file.path()).unwrap();
        assert_eq!(config.host, "10.0.0.5");
        assert_eq!(config.ports.rooms, 4010);
        assert_eq!(config.ports.beds, 3005);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn missing_file_means_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ServiceConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, ServiceConfig::default());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "host = [").unwrap();
        assert!(ServiceConfig::load(file.path()).is_err());
    }

    #[test]
    fn host_override_ignores_blank() {
        let mut config = ServiceConfig::default();
        config.override_host(Some("  "));
        assert_eq!(config.host, DEFAULT_HOST);
        config.override_host(Some("192.168.1.20"));
        assert_eq!(config.host, "192.168.1.20");
        config.override_host(None);
        assert_eq!(config.host, "192.168.1.20");
    }

    #[test]
    fn round_trips_through_toml() {
        let mut config = ServiceConfig::with_host("portal.local");
        config.ports = ServicePorts::uniform(8080);
        let text = config.to_toml_string().unwrap();
        assert_eq!(ServiceConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn diagnostic_tools_follow_the_host() {
        let mut config = ServiceConfig::with_host("192.168.65.59");
        assert_eq!(config.tool_url(DiagnosticTool::DocumentChatbot), "http://192.168.65.59:8502");
        assert_eq!(config.tool_url(DiagnosticTool::Assistant), "http://192.168.65.59:8501");
        assert_eq!(config.upload_url(), "http://192.168.65.59:8000/upload");

        config = ServiceConfig::from_toml_str("[diagnostics]\nassistant_port = 9501").unwrap();
        assert_eq!(config.tool_url(DiagnosticTool::Assistant), "http://127.0.0.1:9501");
        assert_eq!(config.diagnostics.chatbot_port, 8502);
    }

    #[test]
    fn parses_service_names() {
        assert_eq!("medical_records".parse::<Service>().unwrap(), Service::MedicalRecords);
        assert!("pharmacy".parse::<Service>().is_err());
    }
}
