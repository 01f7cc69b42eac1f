use std::{env, fmt, fs::File, io::BufReader, path::Path};

use serde::Deserialize;

use crate::error::BatchError;

const DEFAULT_WORKERS: usize = 2;
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// API key used to authenticate against the remote catalog.
///
/// The key is never printed by `Debug`, so it can travel inside jobs and
/// configuration values that end up in logs.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the raw key for use as a request parameter.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// A blank key can never authenticate a request.
    pub fn is_usable(&self) -> bool {
        !self.0.trim().is_empty()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// An institution zone with its own catalog API key.
#[derive(Debug, Clone, Deserialize)]
pub struct Institution {
    pub code: String,
    pub name: String,
    pub apikey: Credential,
}

/// Importer settings, read from a JSON file.
///
/// # Example
///
/// ```
/// use alma_batch_rs::config::ImporterConfig;
///
/// let config = ImporterConfig::from_json(r#"{
///     "server": "https://api-eu.hosted.exlibrisgroup.com",
///     "institutions": [{ "code": "01ABC", "name": "Main", "apikey": "secret" }]
/// }"#).unwrap();
///
/// assert_eq!(config.workers, 2);
/// assert!(config.credential_for("01ABC").is_ok());
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct ImporterConfig {
    /// Base URL of the catalog API, without the `/almaws` path.
    pub server: String,
    #[serde(default = "default_workers")]
    pub workers: usize,
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    #[serde(default)]
    pub institutions: Vec<Institution>,
}

fn default_workers() -> usize {
    DEFAULT_WORKERS
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_delimiter() -> char {
    ','
}

impl ImporterConfig {
    pub fn from_json(json: &str) -> Result<Self, BatchError> {
        let config: ImporterConfig =
            serde_json::from_str(json).map_err(|error| BatchError::Config(error.to_string()))?;
        config.validate()
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, BatchError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|error| {
            BatchError::Config(format!("unable to open {}: {}", path.display(), error))
        })?;
        let config: ImporterConfig = serde_json::from_reader(BufReader::new(file))
            .map_err(|error| BatchError::Config(error.to_string()))?;
        config.validate()
    }

    /// Applies `ALMA_SERVER` and `ALMA_BATCH_WORKERS` when they are set.
    pub fn with_env_overrides(mut self) -> Result<Self, BatchError> {
        if let Ok(server) = env::var("ALMA_SERVER") {
            self.server = server;
        }
        if let Ok(workers) = env::var("ALMA_BATCH_WORKERS") {
            self.workers = workers.parse().map_err(|_| {
                BatchError::Config(format!("ALMA_BATCH_WORKERS is not a number: {workers}"))
            })?;
        }
        self.validate()
    }

    /// Looks up the API key of an institution by its code.
    pub fn credential_for(&self, code: &str) -> Result<&Credential, BatchError> {
        self.institutions
            .iter()
            .find(|institution| institution.code == code)
            .map(|institution| &institution.apikey)
            .ok_or_else(|| BatchError::UnknownInstitution(code.to_string()))
    }

    /// The delimiter as the single byte the CSV reader expects.
    pub fn delimiter_byte(&self) -> u8 {
        // validate() guarantees an ASCII delimiter
        self.delimiter as u8
    }

    fn validate(self) -> Result<Self, BatchError> {
        if self.server.trim().is_empty() {
            return Err(BatchError::Config("server must not be empty".to_string()));
        }
        if self.workers == 0 {
            return Err(BatchError::Config("workers must be at least 1".to_string()));
        }
        if !self.delimiter.is_ascii() {
            return Err(BatchError::Config(format!(
                "delimiter must be an ASCII character, got {:?}",
                self.delimiter
            )));
        }
        Ok(self)
    }
}
