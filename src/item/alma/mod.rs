//! Client for the Alma item REST API.
//!
//! One [`AlmaClient`] serves every job: the API key travels with each call
//! as a [`Credential`], so a single connection pool covers all institutions.

use std::time::Duration;

use log::debug;
use reqwest::{
    blocking::{Client, Response},
    header::{ACCEPT, CONTENT_TYPE},
    Url,
};
use serde_json::Value;

use crate::{
    config::{Credential, ImporterConfig},
    core::{
        item::{RecordMutator, RecordResolver},
        record::RemoteRecord,
    },
    error::{BatchError, RowError},
};

const API_ROOT: [&str; 2] = ["almaws", "v1"];
const JSON: &str = "application/json";

pub struct AlmaClient {
    server: Url,
    client: Client,
}

impl AlmaClient {
    /// Builds a client for `server`, the catalog base URL.
    pub fn new(server: &str, timeout: Duration) -> Result<Self, BatchError> {
        let server = Url::parse(server)
            .map_err(|error| BatchError::Config(format!("invalid server url {server}: {error}")))?;
        if server.cannot_be_a_base() {
            return Err(BatchError::Config(format!(
                "server url cannot be a base: {server}"
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| BatchError::Config(error.to_string()))?;

        Ok(Self { server, client })
    }

    pub fn from_config(config: &ImporterConfig) -> Result<Self, BatchError> {
        Self::new(
            &config.server,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    /// `{server}/almaws/v1/items`
    pub fn items_url(&self) -> Url {
        self.endpoint(&["items"])
    }

    /// `{server}/almaws/v1/bibs/{mms_id}/holdings/{holding_id}/items/{item_pid}`
    pub fn item_url(&self, record: &RemoteRecord) -> Url {
        let keys = record.keys();
        self.endpoint(&[
            "bibs",
            &keys.mms_id,
            "holdings",
            &keys.holding_id,
            "items",
            &keys.item_pid,
        ])
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.server.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(API_ROOT).extend(segments);
        }
        url
    }
}

impl RecordResolver for AlmaClient {
    fn resolve(&self, barcode: &str, credential: &Credential) -> Result<RemoteRecord, RowError> {
        debug!("GET item for barcode {barcode}");

        let response = self
            .client
            .get(self.items_url())
            .query(&[
                ("apikey", credential.expose()),
                ("item_barcode", barcode),
                ("format", "json"),
            ])
            .header(ACCEPT, JSON)
            .send()
            .map_err(|error| RowError::Resolve(describe(error)))?;

        let response = check_status(response).map_err(RowError::Resolve)?;

        let document: Value = response.json().map_err(|error| {
            RowError::Resolve(format!("invalid item record: {}", describe(error)))
        })?;

        RemoteRecord::from_value(document).map_err(RowError::Resolve)
    }
}

impl RecordMutator for AlmaClient {
    fn mutate(
        &self,
        mut record: RemoteRecord,
        field: &str,
        value: &str,
        credential: &Credential,
    ) -> Result<(), RowError> {
        record.set_item_field(field, value);
        let url = self.item_url(&record);
        debug!("PUT {}", url.path());

        let response = self
            .client
            .put(url)
            .query(&[("apikey", credential.expose())])
            .header(CONTENT_TYPE, JSON)
            .header(ACCEPT, JSON)
            .json(record.document())
            .send()
            .map_err(|error| RowError::Mutate(describe(error)))?;

        check_status(response).map_err(RowError::Mutate)?;
        Ok(())
    }
}

/// Error text without the request URL, which carries the API key.
fn describe(error: reqwest::Error) -> String {
    error.without_url().to_string()
}

/// Passes 2xx responses through; otherwise describes the status and the
/// catalog's own error message when the body has one.
fn check_status(response: Response) -> Result<Response, String> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let mut message = format!("HTTP {status}");
    if let Some(detail) = response
        .text()
        .ok()
        .and_then(|body| catalog_error_message(&body))
    {
        message.push_str(": ");
        message.push_str(&detail);
    }
    Err(message)
}

/// Pulls the first `errorMessage` out of an Alma JSON error body.
fn catalog_error_message(body: &str) -> Option<String> {
    let body: Value = serde_json::from_str(body).ok()?;
    let errors = body.get("errorList")?.get("error")?;
    let first = match errors {
        Value::Array(errors) => errors.first()?,
        error => error,
    };
    first
        .get("errorMessage")
        .and_then(Value::as_str)
        .map(|message| message.trim().to_string())
}
