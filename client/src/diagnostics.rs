// client/src/diagnostics.rs

// The patient's AI tab: links to the diagnostic assistants and the document
// upload they read from.

use log::info;
use models::errors::ApiError;
use models::medical::Document;
use rest_api::{DiagnosticTool, HospitalApi, ServiceConfig};
use security::{Action, Session};

use crate::feedback::*;

/// One entry of the AI tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolLink {
    pub tool: DiagnosticTool,
    pub title: &'static str,
    pub url: String,
}

pub fn tools(session: &Session, config: &ServiceConfig) -> ScreenResult<Vec<ToolLink>> {
    session
        .guard(Action::UseDiagnostics)
        .map_err(ScreenError::with(GENERIC_ERROR))?;
    Ok(DiagnosticTool::ALL
        .into_iter()
        .map(|tool| ToolLink { tool, title: tool.title(), url: config.tool_url(tool) })
        .collect())
}

/// Uploads `document` for the assistants. The notice carries the service's
/// reply verbatim.
pub async fn upload(
    api: &dyn HospitalApi,
    session: &Session,
    document: &Document,
) -> ScreenResult<Notice> {
    session
        .guard(Action::UploadDocument)
        .map_err(ScreenError::with(UPLOAD_FAILED))?;
    if document.is_empty() {
        return Err(ScreenError::new(
            EMPTY_DOCUMENT,
            ApiError::BadRequest(format!("{} is empty", document.file_name)),
        ));
    }
    let reply = api
        .upload_document(document)
        .await
        .map_err(ScreenError::with(UPLOAD_FAILED))?;
    info!("{} uploaded {} ({} bytes)", session.user_id(), document.file_name, document.len());
    Ok(Notice::new(format!("{}: {}", UPLOAD_SUCCEEDED, reply)))
}
