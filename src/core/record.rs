use serde_json::Value;

/// Identifiers that address an item record for writing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordKeys {
    pub mms_id: String,
    pub holding_id: String,
    pub item_pid: String,
}

/// The catalog's JSON representation of an item.
///
/// The whole document is kept so that a write sends back every field that
/// was read. The keys are checked when the record is built, so a
/// `RemoteRecord` always has all three.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteRecord {
    keys: RecordKeys,
    document: Value,
}

impl RemoteRecord {
    /// Builds a record from a decoded response body.
    ///
    /// Fails with a description of the missing key when `bib_data.mms_id`,
    /// `holding_data.holding_id` or `item_data.pid` is absent or empty.
    pub fn from_value(document: Value) -> Result<Self, String> {
        if !document.get("item_data").is_some_and(Value::is_object) {
            return Err("item record has no item_data object".to_string());
        }

        let keys = RecordKeys {
            mms_id: key(&document, "bib_data", "mms_id")?,
            holding_id: key(&document, "holding_data", "holding_id")?,
            item_pid: key(&document, "item_data", "pid")?,
        };

        Ok(Self { keys, document })
    }

    pub fn keys(&self) -> &RecordKeys {
        &self.keys
    }

    pub fn document(&self) -> &Value {
        &self.document
    }

    /// Current value of an `item_data` field, if any.
    pub fn item_field(&self, field: &str) -> Option<&Value> {
        self.document.get("item_data")?.get(field)
    }

    /// Sets `item_data[field] = value`, adding the field when it is unknown.
    pub fn set_item_field(&mut self, field: &str, value: &str) {
        if let Some(item_data) = self
            .document
            .get_mut("item_data")
            .and_then(Value::as_object_mut)
        {
            item_data.insert(field.to_string(), Value::String(value.to_string()));
        }
    }
}

fn key(document: &Value, section: &str, name: &str) -> Result<String, String> {
    let value = document.get(section).and_then(|section| section.get(name));

    let key = match value {
        Some(Value::String(key)) => key.trim().to_string(),
        Some(Value::Number(key)) => key.to_string(),
        _ => String::new(),
    };

    if key.is_empty() {
        Err(format!("item record is missing {section}.{name}"))
    } else {
        Ok(key)
    }
}
