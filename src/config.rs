//! Configuration resolution for a single upload invocation.
//!
//! Each field is resolved in precedence order: CLI flag, `MENTOR_*`
//! environment variable, `config.toml` in the platform config directory,
//! built-in default. The only I/O performed here is reading the optional
//! config file and the credential file.

use std::fmt;
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::time::Duration;

use dotenvy::dotenv;
use serde::Deserialize;
use url::Url;

use crate::error::ConfigurationError;

pub const DEFAULT_ORG_ID: &str = "syracuse";
pub const DEFAULT_CREDENTIALS_FILE: &str = "api_credentials.txt";
pub const DEFAULT_BASE_URL: &str = "https://base.manager.ai.syr.edu";
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Anything shorter is assumed to be a paste accident, not a real key.
const MIN_API_KEY_LEN: usize = 10;

const ENV_PREFIX: &str = "MENTOR_";

/// Inputs gathered from the CLI surface, not yet resolved.
#[derive(Debug, Clone)]
pub struct Settings {
    pub org_id: Option<String>,
    pub user_id: String,
    pub pathway_id: String,
    pub file: PathBuf,
    pub credentials: Option<PathBuf>,
    pub base_url: Option<Url>,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Default)]
struct ConfigFile {
    org_id: Option<String>,
    base_url: Option<Url>,
    credentials: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Default)]
struct ConfigEnv {
    org_id: Option<String>,
    base_url: Option<Url>,
    credentials: Option<PathBuf>,
}

/// Fully resolved upload request. Immutable once built; the API key is
/// held only in memory and redacted from the `Debug` output.
#[derive(Clone)]
pub struct UploadRequest {
    pub org_id: String,
    pub user_id: String,
    pub pathway_id: String,
    pub file_path: PathBuf,
    pub api_key: String,
    pub base_url: Url,
    pub timeout: Duration,
}

impl fmt::Debug for UploadRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadRequest")
            .field("org_id", &self.org_id)
            .field("user_id", &self.user_id)
            .field("pathway_id", &self.pathway_id)
            .field("file_path", &self.file_path)
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn merge_config(
    base: ConfigFile,
    env: ConfigEnv,
    settings: Settings,
    api_key: String,
) -> UploadRequest {
    let org_id = settings
        .org_id
        .or(env.org_id)
        .or(base.org_id)
        .unwrap_or_else(|| DEFAULT_ORG_ID.to_string());

    let base_url = settings
        .base_url
        .or(env.base_url)
        .or(base.base_url)
        .unwrap_or_else(|| Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"));

    UploadRequest {
        org_id,
        user_id: settings.user_id,
        pathway_id: settings.pathway_id,
        file_path: settings.file,
        api_key,
        base_url,
        timeout: Duration::from_secs(settings.timeout_secs),
    }
}

fn read_config_file() -> Result<ConfigFile, ConfigurationError> {
    let Some(project_dirs) = directories::ProjectDirs::from("edu", "syr", "mentup") else {
        return Ok(ConfigFile::default());
    };
    let config_file = project_dirs.config_dir().join("config.toml");
    match fs::read_to_string(&config_file) {
        Ok(config) => {
            toml::from_str(&config).map_err(|source| ConfigurationError::ConfigFileInvalid {
                path: config_file,
                source,
            })
        }
        Err(_) => Ok(ConfigFile::default()),
    }
}

fn credentials_path(base: &ConfigFile, env: &ConfigEnv, settings: &Settings) -> PathBuf {
    settings
        .credentials
        .clone()
        .or_else(|| env.credentials.clone())
        .or_else(|| base.credentials.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CREDENTIALS_FILE))
}

/// Produce an [`UploadRequest`] from the CLI settings, the environment,
/// and the optional config file. Fails fast on a timeout below one second,
/// before the credential file is touched.
pub fn resolve(settings: Settings) -> Result<UploadRequest, ConfigurationError> {
    if settings.timeout_secs < 1 {
        return Err(ConfigurationError::TimeoutTooSmall);
    }

    let _ = dotenv();
    let env_config = envy::prefixed(ENV_PREFIX)
        .from_env::<ConfigEnv>()
        .unwrap_or_default();
    let file_config = read_config_file()?;

    let cred_path = credentials_path(&file_config, &env_config, &settings);
    let api_key = load_api_key(&cred_path)?;

    Ok(merge_config(file_config, env_config, settings, api_key))
}

/// Load the API key from the credential file: first line, trimmed of
/// surrounding whitespace. Remaining lines are ignored.
pub fn load_api_key(path: &Path) -> Result<String, ConfigurationError> {
    if !path.exists() {
        return Err(ConfigurationError::CredentialsNotFound {
            path: path.to_path_buf(),
        });
    }

    let file = fs::File::open(path).map_err(|source| ConfigurationError::CredentialsUnreadable {
        path: path.to_path_buf(),
        source,
    })?;
    let mut first_line = String::new();
    BufReader::new(file).read_line(&mut first_line).map_err(|source| {
        ConfigurationError::CredentialsUnreadable {
            path: path.to_path_buf(),
            source,
        }
    })?;

    let api_key = first_line.trim();
    if api_key.is_empty() {
        return Err(ConfigurationError::ApiKeyMissing);
    }
    if api_key.len() < MIN_API_KEY_LEN {
        return Err(ConfigurationError::ApiKeyTooShort);
    }

    Ok(api_key.to_string())
}
