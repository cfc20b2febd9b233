//! HTTP client for the AI Mentor training endpoint.

use std::time::Duration;

use anyhow::Context;
use reqwest::{Client, StatusCode, header::AUTHORIZATION, multipart};
use url::Url;

use crate::config::UploadRequest;
use crate::error::DocumentUploadError;
use crate::report::Reporter;
use crate::rest_types::{ErrorBody, TrainDocumentResponse};
use crate::validate::ValidatedFile;

fn train_document_route(org_id: &str, user_id: &str) -> String {
    format!("api/ai-index/orgs/{org_id}/users/{user_id}/documents/train/")
}

pub struct MentorClient {
    client: Client,
    base_url: Url,
    api_key: String,
    timeout_secs: u64,
}

impl MentorClient {
    /// Build a client with the given total request timeout. The timeout
    /// covers the whole exchange including the body upload.
    pub fn new(base_url: Url, api_key: String, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url,
            api_key,
            timeout_secs: timeout.as_secs(),
        })
    }

    /// Upload one validated document and train it into the request's
    /// pathway. Performs exactly one POST; no retries. The file handle
    /// backing the multipart body is opened here and dropped on every
    /// exit path.
    pub async fn train_document(
        &self,
        request: &UploadRequest,
        file: &ValidatedFile,
        reporter: &dyn Reporter,
    ) -> Result<TrainDocumentResponse, DocumentUploadError> {
        let url = self
            .base_url
            .join(&train_document_route(&request.org_id, &request.user_id))?;

        reporter.info(&format!("uploading document: {}", file.file_name));
        reporter.info(&format!("target URL: {url}"));
        reporter.debug(&format!(
            "document type: file, MIME type: {}",
            file.mime_type()
        ));

        let document = multipart::Part::file(&file.path)
            .await?
            .file_name(file.file_name.clone())
            .mime_str(file.mime_type())
            .map_err(DocumentUploadError::Request)?;

        let form = multipart::Form::new()
            .part("file", document)
            .text("pathway", request.pathway_id.clone())
            .text("type", "file")
            .text("name", file.file_name.clone());

        let response = self
            .client
            .post(url)
            .header(AUTHORIZATION, format!("Api-Token {}", self.api_key))
            .multipart(form)
            .send()
            .await
            .map_err(|err| self.classify(err))?;

        let status = response.status();
        let text = response.text().await.map_err(|err| self.classify(err))?;

        match status {
            StatusCode::OK | StatusCode::CREATED => {
                let parsed: TrainDocumentResponse = serde_json::from_str(&text).map_err(
                    |source| DocumentUploadError::MalformedSuccess {
                        status: status.as_u16(),
                        source,
                    },
                )?;
                reporter.info(&format!(
                    "upload successful, document ID: {}",
                    parsed.document_id.as_deref().unwrap_or("N/A")
                ));
                Ok(parsed)
            }
            _ => {
                let detail = serde_json::from_str::<ErrorBody>(&text)
                    .ok()
                    .and_then(|body| body.detail);
                Err(DocumentUploadError::Rejected {
                    status: status.as_u16(),
                    detail,
                    body: (!text.is_empty()).then_some(text),
                })
            }
        }
    }

    fn classify(&self, err: reqwest::Error) -> DocumentUploadError {
        if err.is_timeout() {
            DocumentUploadError::Timeout {
                timeout_secs: self.timeout_secs,
            }
        } else if err.is_connect() {
            DocumentUploadError::Connection(err)
        } else {
            DocumentUploadError::Request(err)
        }
    }
}
