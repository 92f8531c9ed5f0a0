use serde_json::Value;

/// Outer JSON shape an endpoint wraps its payload in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Envelope {
    /// `[...]` at the top level.
    BareArray,
    /// `{"success": true, "<key>": ...}`.
    Success { key: &'static str },
}

impl Envelope {
    pub const DATA: Envelope = Envelope::Success { key: "data" };
    pub const RIDES: Envelope = Envelope::Success { key: "rides" };

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "bare" | "array" => Some(Self::BareArray),
            "data" => Some(Self::DATA),
            "rides" => Some(Self::RIDES),
            _ => None,
        }
    }

    pub fn label(&self) -> String {
        match self {
            Envelope::BareArray => "bare".to_string(),
            Envelope::Success { key } => format!("{{success, {key}}}"),
        }
    }

    /// The payload value, before any shape check on it.
    fn payload(&self, body: Value) -> Result<Value, String> {
        match self {
            Envelope::BareArray => Ok(body),
            Envelope::Success { key } => {
                let Value::Object(mut map) = body else {
                    return Err(format!("expected an object envelope with '{key}'"));
                };
                match map.get("success") {
                    Some(Value::Bool(true)) => {}
                    Some(Value::Bool(false)) => {
                        return Err("server reported success=false".to_string())
                    }
                    _ => return Err("envelope has no boolean 'success' flag".to_string()),
                }
                map.remove(*key)
                    .ok_or_else(|| format!("envelope has no '{key}' field"))
            }
        }
    }

    pub fn unwrap_collection(&self, body: Value) -> Result<Vec<Value>, String> {
        match self.payload(body)? {
            Value::Array(items) => Ok(items),
            other => Err(format!(
                "expected an array payload, found {}",
                crate::utils::json_kind(&other)
            )),
        }
    }

    pub fn unwrap_record(&self, body: Value) -> Result<Value, String> {
        match self.payload(body)? {
            record @ Value::Object(_) => Ok(record),
            other => Err(format!(
                "expected an object payload, found {}",
                crate::utils::json_kind(&other)
            )),
        }
    }
}
