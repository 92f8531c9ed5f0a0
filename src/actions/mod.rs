//! Mutating actions on a single driver. Each call issues exactly one request;
//! refreshing the list afterwards is the caller's job (see `view`).

use regex::Regex;
use reqwest::Method;
use serde_json::{Map, Value};
use tracing::info;

use crate::entities::drivers;
use crate::fetcher::{ApiClient, ApiError, Envelope};
use crate::utils;

const PHONE_PATTERN: &str = r"^\+?[0-9][0-9 -]{6,14}[0-9]$";

pub const DRIVER_STATUSES: [&str; 2] = ["on-duty", "off-duty"];

fn require_id(id: &str) -> Result<&str, ApiError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(ApiError::validation("id", "driver id is empty"));
    }
    Ok(id)
}

pub async fn get_driver(client: &ApiClient, id: &str) -> Result<Value, ApiError> {
    let id = require_id(id)?;
    client
        .fetch_record(drivers::GET_PATH, id, Envelope::DATA)
        .await
}

/// `PUT updateDriver/{id}` with the full record as body.
pub async fn update_driver(client: &ApiClient, id: &str, body: &Value) -> Result<(), ApiError> {
    let id = require_id(id)?;
    if !body.is_object() {
        return Err(ApiError::validation("body", "driver update must be a JSON object"));
    }
    client
        .execute(Method::PUT, drivers::UPDATE_PATH, id, Some(body))
        .await?;
    info!(id, "driver updated");
    Ok(())
}

pub async fn delete_driver(client: &ApiClient, id: &str) -> Result<(), ApiError> {
    let id = require_id(id)?;
    client
        .execute(Method::DELETE, drivers::DELETE_PATH, id, None)
        .await?;
    info!(id, "driver deleted");
    Ok(())
}

/// Edit-form input as typed by the operator. `None` leaves the field untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DriverForm {
    pub full_name: Option<String>,
    pub contact_number: Option<String>,
    pub email: Option<String>,
    pub status: Option<String>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub number_plate: Option<String>,
    pub salary: Option<String>,
    pub bank_account: Option<String>,
}

/// A form that passed validation, with typed values.
#[derive(Clone, Debug, Default, PartialEq)]
struct ValidForm {
    full_name: Option<String>,
    contact_number: Option<String>,
    email: Option<String>,
    status: Option<String>,
    make: Option<String>,
    model: Option<String>,
    number_plate: Option<String>,
    salary: Option<f64>,
    bank_account: Option<String>,
}

fn trimmed(value: &Option<String>) -> Option<String> {
    value.as_deref().map(|v| v.trim().to_string())
}

impl DriverForm {
    pub fn is_empty(&self) -> bool {
        *self == DriverForm::default()
    }

    fn check(&self) -> Result<ValidForm, ApiError> {
        let full_name = trimmed(&self.full_name);
        if matches!(full_name.as_deref(), Some("")) {
            return Err(ApiError::validation("fullName", "name must not be empty"));
        }

        let contact_number = trimmed(&self.contact_number);
        if let Some(phone) = contact_number.as_deref() {
            let pattern = Regex::new(PHONE_PATTERN)
                .map_err(|e| ApiError::validation("contactNumber", e.to_string()))?;
            if !pattern.is_match(phone) {
                return Err(ApiError::validation(
                    "contactNumber",
                    format!("'{phone}' is not a phone number"),
                ));
            }
        }

        let status = match trimmed(&self.status) {
            Some(raw) => {
                let key = raw.to_ascii_lowercase();
                if !DRIVER_STATUSES.contains(&key.as_str()) {
                    return Err(ApiError::validation(
                        "status",
                        format!("expected one of {}, got '{raw}'", DRIVER_STATUSES.join(", ")),
                    ));
                }
                Some(key)
            }
            None => None,
        };

        let salary = match self.salary.as_deref() {
            Some(raw) => Some(
                utils::parse_amount(raw).map_err(|message| ApiError::validation("salary", message))?,
            ),
            None => None,
        };

        Ok(ValidForm {
            full_name,
            contact_number,
            email: trimmed(&self.email),
            status,
            make: trimmed(&self.make),
            model: trimmed(&self.model),
            number_plate: trimmed(&self.number_plate),
            salary,
            bank_account: trimmed(&self.bank_account),
        })
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        self.check().map(|_| ())
    }

    /// Merges the form onto a fetched driver record, producing the full body
    /// for `update_driver`. Fields the form does not set are kept as fetched.
    pub fn apply(&self, record: &Value) -> Result<Value, ApiError> {
        let form = self.check()?;
        let Value::Object(base) = record else {
            return Err(ApiError::validation("record", "driver record is not an object"));
        };
        let mut merged = base.clone();

        set(&mut merged, "fullName", form.full_name.map(Value::from));
        set(&mut merged, "contactNumber", form.contact_number.map(Value::from));
        set(&mut merged, "email", form.email.map(Value::from));
        set(&mut merged, "status", form.status.map(Value::from));
        set(&mut merged, "salary", form.salary.map(Value::from));

        merge_nested(
            &mut merged,
            "vehicleDetails",
            [
                ("make", form.make.map(Value::from)),
                ("model", form.model.map(Value::from)),
                ("numberPlate", form.number_plate.map(Value::from)),
            ],
        );
        merge_nested(
            &mut merged,
            "bankDetails",
            [("accountNumber", form.bank_account.map(Value::from))],
        );

        Ok(Value::Object(merged))
    }
}

fn set(map: &mut Map<String, Value>, key: &str, value: Option<Value>) {
    if let Some(value) = value {
        map.insert(key.to_string(), value);
    }
}

/// Sets keys inside a nested object, creating it (or replacing a non-object)
/// only when at least one key is set.
fn merge_nested<const N: usize>(
    map: &mut Map<String, Value>,
    key: &str,
    fields: [(&str, Option<Value>); N],
) {
    if fields.iter().all(|(_, value)| value.is_none()) {
        return;
    }
    let mut inner = match map.remove(key) {
        Some(Value::Object(inner)) => inner,
        _ => Map::new(),
    };
    for (name, value) in fields {
        set(&mut inner, name, value);
    }
    map.insert(key.to_string(), Value::Object(inner));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record() -> Value {
        json!({
            "_id": "abc123",
            "fullName": "Ravi Kumar",
            "contactNumber": "9876543210",
            "status": "on-duty",
            "salary": 15000,
            "vehicleDetails": {"make": "Maruti", "model": "Dzire", "numberPlate": "RJ14 AB 1234"}
        })
    }

    #[test]
    fn empty_form_is_valid_and_keeps_record() {
        let form = DriverForm::default();
        assert!(form.is_empty());
        assert_eq!(form.apply(&record()).unwrap(), record());
    }

    #[test]
    fn non_numeric_salary_is_rejected() {
        let form = DriverForm {
            salary: Some("fifteen".to_string()),
            ..DriverForm::default()
        };
        let err = form.validate().unwrap_err();
        assert!(matches!(err, ApiError::Validation { ref field, .. } if field == "salary"));
    }

    #[test]
    fn malformed_phone_is_rejected() {
        for phone in ["12ab", "123", "+91 98765 43210 99999"] {
            let form = DriverForm {
                contact_number: Some(phone.to_string()),
                ..DriverForm::default()
            };
            assert!(form.validate().is_err(), "{phone} accepted");
        }
        let ok = DriverForm {
            contact_number: Some("+91 98765-43210".to_string()),
            ..DriverForm::default()
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn blank_name_and_unknown_status_are_rejected() {
        let blank = DriverForm {
            full_name: Some("   ".to_string()),
            ..DriverForm::default()
        };
        assert!(blank.validate().is_err());
        let status = DriverForm {
            status: Some("sleeping".to_string()),
            ..DriverForm::default()
        };
        assert!(status.validate().is_err());
    }

    #[test]
    fn apply_merges_onto_fetched_record() {
        let form = DriverForm {
            full_name: Some(" Ravi K ".to_string()),
            status: Some("OFF-DUTY".to_string()),
            salary: Some("18000".to_string()),
            model: Some("Swift".to_string()),
            bank_account: Some("001122".to_string()),
            ..DriverForm::default()
        };
        let body = form.apply(&record()).unwrap();
        assert_eq!(body["_id"], "abc123");
        assert_eq!(body["fullName"], "Ravi K");
        assert_eq!(body["status"], "off-duty");
        assert_eq!(body["salary"], 18000.0);
        assert_eq!(body["contactNumber"], "9876543210");
        assert_eq!(body["vehicleDetails"]["make"], "Maruti");
        assert_eq!(body["vehicleDetails"]["model"], "Swift");
        assert_eq!(body["bankDetails"]["accountNumber"], "001122");
    }

    #[test]
    fn apply_creates_missing_vehicle_details() {
        let form = DriverForm {
            number_plate: Some("MH12".to_string()),
            ..DriverForm::default()
        };
        let body = form.apply(&json!({"_id": "x", "vehicleDetails": null})).unwrap();
        assert_eq!(body["vehicleDetails"]["numberPlate"], "MH12");
    }

    #[test]
    fn apply_rejects_non_object_record() {
        assert!(DriverForm::default().apply(&json!([1, 2])).is_err());
    }
}
