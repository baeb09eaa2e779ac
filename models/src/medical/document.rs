// models/src/medical/document.rs

use std::path::Path;

/// Fallback content type when the extension says nothing.
pub const DEFAULT_MIME_TYPE: &str = "application/pdf";

/// A file sent to the diagnostics upload endpoint as the `file` part of a
/// multipart form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub file_name: String,
    pub mime_type: String,
    pub content: Vec<u8>,
}

impl Document {
    /// Names the document after the last component of `path` and guesses
    /// its content type from the extension.
    pub fn from_path(path: &Path, content: Vec<u8>) -> Self {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());
        let mime_type = mime_for(&file_name).to_string();
        Document { file_name, mime_type, content }
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

fn mime_for(file_name: &str) -> &'static str {
    let extension = file_name.rsplit_once('.').map(|(_, ext)| ext.to_lowercase());
    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("txt") => "text/plain",
        Some("json") => "application/json",
        _ => DEFAULT_MIME_TYPE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_follows_extension() {
        let scan = Document::from_path(Path::new("/tmp/scans/Chest.JPG"), vec![1, 2]);
        assert_eq!(scan.file_name, "Chest.JPG");
        assert_eq!(scan.mime_type, "image/jpeg");
        assert_eq!(scan.len(), 2);

        let report = Document::from_path(Path::new("report"), Vec::new());
        assert_eq!(report.mime_type, DEFAULT_MIME_TYPE);
        assert!(report.is_empty());
    }
}
