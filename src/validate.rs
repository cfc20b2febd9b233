//! Local checks performed before any network activity: the target file
//! must be a readable, non-empty regular file within the size limit, and
//! the identifier fields must be present.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::UploadRequest;
use crate::error::ConfigurationError;
use crate::report::Reporter;

/// 100 MiB, matching the server-side upload limit.
pub const MAX_FILE_SIZE_BYTES: u64 = 100 * 1024 * 1024;

/// Expected shape of a pathway id. Violations are a warning, not an
/// error; the server is the authority on what it accepts.
const PATHWAY_ID_LEN: usize = 36;
const PATHWAY_ID_SEPARATORS: usize = 4;

/// Document kind derived from the file extension. Closed table; anything
/// outside it is uploaded as a generic octet stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Text,
    Doc,
    Docx,
    Other,
}

impl DocumentKind {
    pub fn from_path(path: &Path) -> Self {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());
        match extension.as_deref() {
            Some("pdf") => DocumentKind::Pdf,
            Some("txt") => DocumentKind::Text,
            Some("doc") => DocumentKind::Doc,
            Some("docx") => DocumentKind::Docx,
            _ => DocumentKind::Other,
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            DocumentKind::Pdf => "application/pdf",
            DocumentKind::Text => "text/plain",
            DocumentKind::Doc => "application/msword",
            DocumentKind::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            DocumentKind::Other => "application/octet-stream",
        }
    }
}

/// A file that passed validation, with everything the uploader needs to
/// build the multipart body.
#[derive(Debug, Clone)]
pub struct ValidatedFile {
    /// Canonicalized absolute path.
    pub path: PathBuf,
    pub size_bytes: u64,
    pub file_name: String,
    pub kind: DocumentKind,
}

impl ValidatedFile {
    pub fn mime_type(&self) -> &'static str {
        self.kind.mime_type()
    }
}

/// Check that the path resolves to a readable, non-empty regular file no
/// larger than [`MAX_FILE_SIZE_BYTES`].
pub fn validate_file(
    path: &Path,
    reporter: &dyn Reporter,
) -> Result<ValidatedFile, ConfigurationError> {
    let metadata = fs::metadata(path).map_err(|_| ConfigurationError::FileNotFound {
        path: path.to_path_buf(),
    })?;

    if !metadata.is_file() {
        return Err(ConfigurationError::NotAFile {
            path: path.to_path_buf(),
        });
    }

    // Probe for read permission; the handle used for the upload body is
    // opened separately, immediately before the request.
    fs::File::open(path).map_err(|source| ConfigurationError::FileUnreadable {
        path: path.to_path_buf(),
        source,
    })?;

    let size_bytes = metadata.len();
    if size_bytes == 0 {
        return Err(ConfigurationError::FileEmpty {
            path: path.to_path_buf(),
        });
    }
    if size_bytes > MAX_FILE_SIZE_BYTES {
        return Err(ConfigurationError::FileTooLarge { size_bytes });
    }

    let resolved = fs::canonicalize(path).map_err(|source| ConfigurationError::FileUnreadable {
        path: path.to_path_buf(),
        source,
    })?;

    let file_name = resolved
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());

    let kind = DocumentKind::from_path(&resolved);
    if kind == DocumentKind::Other {
        reporter.warn(&format!(
            "unknown file type for {file_name}, using generic MIME type"
        ));
    }

    reporter.info(&format!(
        "file validated: {} ({:.2} KiB)",
        resolved.display(),
        size_bytes as f64 / 1024.0
    ));

    Ok(ValidatedFile {
        path: resolved,
        size_bytes,
        file_name,
        kind,
    })
}

/// Check the identifier fields of a resolved request. Empty fields are
/// errors; an unusually shaped pathway id is only warned about.
pub fn validate_request(
    request: &UploadRequest,
    reporter: &dyn Reporter,
) -> Result<(), ConfigurationError> {
    if request.org_id.is_empty() {
        return Err(ConfigurationError::EmptyField {
            field: "organization ID",
        });
    }
    if request.user_id.is_empty() {
        return Err(ConfigurationError::EmptyField { field: "user ID" });
    }
    if request.pathway_id.is_empty() {
        return Err(ConfigurationError::EmptyField { field: "mentor ID" });
    }

    let separators = request.pathway_id.matches('-').count();
    if request.pathway_id.len() != PATHWAY_ID_LEN || separators != PATHWAY_ID_SEPARATORS {
        reporter.warn(&format!(
            "mentor ID format looks unusual: {} (expected UUID format, \
             e.g. 25223e76-fc94-4cc2-aec1-f9fb51f0c2bf)",
            request.pathway_id
        ));
    }

    reporter.info(&format!(
        "configuration validated - org: {}, user: {}",
        request.org_id, request.user_id
    ));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use std::time::Duration;
    use tempfile::{NamedTempFile, tempdir};
    use url::Url;

    use crate::report::{RecordingReporter, Severity};

    fn request_with_pathway(pathway_id: &str) -> UploadRequest {
        UploadRequest {
            org_id: "syracuse".to_string(),
            user_id: "jasidel".to_string(),
            pathway_id: pathway_id.to_string(),
            file_path: PathBuf::from("document.pdf"),
            api_key: "0123456789abcdef".to_string(),
            base_url: Url::parse("https://base.manager.ai.syr.edu").unwrap(),
            timeout: Duration::from_secs(300),
        }
    }

    #[test]
    fn mime_table_is_closed() {
        assert_eq!(
            DocumentKind::from_path(Path::new("report.PDF")),
            DocumentKind::Pdf
        );
        assert_eq!(
            DocumentKind::from_path(Path::new("notes.txt")).mime_type(),
            "text/plain"
        );
        assert_eq!(
            DocumentKind::from_path(Path::new("old.doc")).mime_type(),
            "application/msword"
        );
        assert_eq!(
            DocumentKind::from_path(Path::new("new.docx")).mime_type(),
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        );
        assert_eq!(
            DocumentKind::from_path(Path::new("archive.zip")).mime_type(),
            "application/octet-stream"
        );
        assert_eq!(
            DocumentKind::from_path(Path::new("no_extension")),
            DocumentKind::Other
        );
    }

    #[test]
    fn missing_file_is_rejected() {
        let reporter = RecordingReporter::new();
        let err = validate_file(Path::new("/nonexistent/document.pdf"), &reporter).unwrap_err();
        assert!(matches!(err, ConfigurationError::FileNotFound { .. }));
    }

    #[test]
    fn directory_is_rejected() {
        let dir = tempdir().unwrap();
        let reporter = RecordingReporter::new();
        let err = validate_file(dir.path(), &reporter).unwrap_err();
        assert!(matches!(err, ConfigurationError::NotAFile { .. }));
    }

    #[test]
    fn empty_file_is_rejected() {
        let file = NamedTempFile::new().unwrap();
        let reporter = RecordingReporter::new();
        let err = validate_file(file.path(), &reporter).unwrap_err();
        assert!(matches!(err, ConfigurationError::FileEmpty { .. }));
    }

    #[test]
    fn oversized_file_is_rejected() {
        let file = NamedTempFile::new().unwrap();
        // Sparse on the filesystems CI runs on, so this stays cheap.
        file.as_file()
            .set_len(MAX_FILE_SIZE_BYTES + 1)
            .unwrap();
        let reporter = RecordingReporter::new();
        let err = validate_file(file.path(), &reporter).unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::FileTooLarge {
                size_bytes: 104_857_601
            }
        ));
    }

    #[test]
    fn file_at_exact_limit_is_accepted() {
        let file = NamedTempFile::new().unwrap();
        file.as_file().set_len(MAX_FILE_SIZE_BYTES).unwrap();
        let reporter = RecordingReporter::new();
        let validated = validate_file(file.path(), &reporter).unwrap();
        assert_eq!(validated.size_bytes, MAX_FILE_SIZE_BYTES);
    }

    #[test]
    fn validated_file_carries_name_size_and_kind() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("syllabus.pdf");
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(b"%PDF-1.4 test").unwrap();

        let reporter = RecordingReporter::new();
        let validated = validate_file(&path, &reporter).unwrap();
        assert_eq!(validated.file_name, "syllabus.pdf");
        assert_eq!(validated.size_bytes, 13);
        assert_eq!(validated.kind, DocumentKind::Pdf);
        assert!(validated.path.is_absolute());
        assert!(reporter.messages_at(Severity::Warn).is_empty());
    }

    #[test]
    fn unknown_extension_warns_but_passes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.bin");
        fs::write(&path, b"binary").unwrap();

        let reporter = RecordingReporter::new();
        let validated = validate_file(&path, &reporter).unwrap();
        assert_eq!(validated.kind, DocumentKind::Other);
        let warnings = reporter.messages_at(Severity::Warn);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("unknown file type"));
    }

    #[test]
    fn empty_identifier_fields_are_errors() {
        let reporter = RecordingReporter::new();

        let mut request = request_with_pathway("25223e76-fc94-4cc2-aec1-f9fb51f0c2bf");
        request.org_id.clear();
        assert!(matches!(
            validate_request(&request, &reporter).unwrap_err(),
            ConfigurationError::EmptyField {
                field: "organization ID"
            }
        ));

        let mut request = request_with_pathway("25223e76-fc94-4cc2-aec1-f9fb51f0c2bf");
        request.user_id.clear();
        assert!(matches!(
            validate_request(&request, &reporter).unwrap_err(),
            ConfigurationError::EmptyField { field: "user ID" }
        ));

        let request = request_with_pathway("");
        assert!(matches!(
            validate_request(&request, &reporter).unwrap_err(),
            ConfigurationError::EmptyField { field: "mentor ID" }
        ));
    }

    #[test]
    fn well_formed_pathway_id_passes_silently() {
        let reporter = RecordingReporter::new();
        let request = request_with_pathway("25223e76-fc94-4cc2-aec1-f9fb51f0c2bf");
        validate_request(&request, &reporter).unwrap();
        assert!(reporter.messages_at(Severity::Warn).is_empty());
    }

    #[test]
    fn ill_shaped_pathway_id_warns_but_passes() {
        // Wrong length.
        let reporter = RecordingReporter::new();
        let request = request_with_pathway("abc-123-def-456-ghi");
        validate_request(&request, &reporter).unwrap();
        assert_eq!(reporter.messages_at(Severity::Warn).len(), 1);

        // Right length, wrong separator count.
        let reporter = RecordingReporter::new();
        let request = request_with_pathway("25223e76xfc94x4cc2xaec1xf9fb51f0c2bf");
        validate_request(&request, &reporter).unwrap();
        assert_eq!(reporter.messages_at(Severity::Warn).len(), 1);
    }
}
