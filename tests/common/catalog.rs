//! In-memory stand-in for the remote catalog.
use std::{
    collections::{HashMap, HashSet},
    sync::Mutex,
};

use alma_batch_rs::{
    config::Credential,
    core::{
        item::{RecordMutator, RecordResolver},
        record::RemoteRecord,
    },
    error::RowError,
};
use serde_json::{json, Value};

#[derive(Default)]
pub struct FakeCatalog {
    items: Mutex<HashMap<String, Value>>,
    missing: Mutex<HashSet<String>>,
    rejected_writes: Mutex<HashSet<String>>,
    pub lookups: Mutex<Vec<String>>,
    pub writes: Mutex<Vec<(String, String, String)>>,
}

impl FakeCatalog {
    /// A catalog holding one item per barcode.
    pub fn with_items(barcodes: &[&str]) -> Self {
        let catalog = Self::default();
        for (index, barcode) in barcodes.iter().enumerate() {
            catalog.items.lock().unwrap().insert(
                barcode.to_string(),
                json!({
                    "bib_data": { "mms_id": format!("99{index}") },
                    "holding_data": { "holding_id": format!("22{index}") },
                    "item_data": {
                        "pid": format!("23{index}"),
                        "barcode": barcode,
                        "internal_note_1": ""
                    }
                }),
            );
        }
        catalog
    }

    /// Lookups of `barcode` answer 404.
    pub fn without(self, barcode: &str) -> Self {
        self.missing.lock().unwrap().insert(barcode.to_string());
        self
    }

    /// Writes of `barcode` answer 400.
    pub fn rejecting_writes_of(self, barcode: &str) -> Self {
        self.rejected_writes.lock().unwrap().insert(barcode.to_string());
        self
    }

    pub fn field_of(&self, barcode: &str, field: &str) -> Option<Value> {
        self.items
            .lock()
            .unwrap()
            .get(barcode)
            .and_then(|item| item["item_data"].get(field).cloned())
    }

    pub fn lookup_count(&self) -> usize {
        self.lookups.lock().unwrap().len()
    }

    pub fn write_count(&self) -> usize {
        self.writes.lock().unwrap().len()
    }
}

impl RecordResolver for FakeCatalog {
    fn resolve(&self, barcode: &str, credential: &Credential) -> Result<RemoteRecord, RowError> {
        self.lookups.lock().unwrap().push(barcode.to_string());
        if credential.expose() != "secret" {
            return Err(RowError::Resolve("HTTP 400 Bad Request: Invalid API Key".to_string()));
        }
        if self.missing.lock().unwrap().contains(barcode) {
            return Err(RowError::Resolve("HTTP 404 Not Found".to_string()));
        }
        let item = self.items.lock().unwrap().get(barcode).cloned().ok_or_else(|| {
            RowError::Resolve(format!(
                "HTTP 400 Bad Request: No items found for barcode {barcode}."
            ))
        })?;
        RemoteRecord::from_value(item).map_err(RowError::Resolve)
    }
}

impl RecordMutator for FakeCatalog {
    fn mutate(
        &self,
        mut record: RemoteRecord,
        field: &str,
        value: &str,
        _: &Credential,
    ) -> Result<(), RowError> {
        let barcode = record
            .item_field("barcode")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        self.writes
            .lock()
            .unwrap()
            .push((barcode.clone(), field.to_string(), value.to_string()));

        if self.rejected_writes.lock().unwrap().contains(&barcode) {
            return Err(RowError::Mutate("HTTP 400 Bad Request".to_string()));
        }

        record.set_item_field(field, value);
        self.items
            .lock()
            .unwrap()
            .insert(barcode, record.document().clone());
        Ok(())
    }
}
