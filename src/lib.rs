//! Upload pipeline for training documents on the AI Mentor platform.
//!
//! Three stages compose linearly: configuration resolution
//! ([`config::resolve`]), local validation ([`validate`]), and the
//! authenticated multipart upload ([`client::MentorClient`]). No network
//! call happens until both the configuration and the file have passed
//! validation.

pub mod client;
pub mod config;
pub mod error;
pub mod report;
pub mod rest_types;
pub mod validate;

pub use client::MentorClient;
pub use config::{Settings, UploadRequest};
pub use error::{ConfigurationError, DocumentUploadError, Error, Result};
pub use report::{Reporter, TracingReporter};
pub use rest_types::TrainDocumentResponse;
pub use validate::{ValidatedFile, validate_file, validate_request};
