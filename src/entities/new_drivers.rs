use serde_json::Value;

use crate::fetcher::{Endpoint, Envelope};
use crate::pipeline::normalize::{FieldSource, TransformError};
use crate::pipeline::{EntityKind, FieldSpec, ListSpec, RowSchema, Transform};

pub const LIST_PATH: &str = "api/driverRequest/get";

pub const SEARCH_FIELDS: &[&str] = &["Name", "Phone", "Vehicle License"];

/// Driver requests are served as a bare array.
pub fn endpoint() -> Endpoint {
    Endpoint::new(LIST_PATH, Envelope::BareArray)
}

// Every second row of three offers activation; the API has no field for it.
fn action_label(index: &Value) -> Result<String, TransformError> {
    let index = index.as_u64().ok_or(TransformError::Type {
        expected: "row index",
        found: "non-integer",
    })?;
    Ok(if index % 3 == 1 {
        "Activate Account".to_string()
    } else {
        "View Profile".to_string()
    })
}

const NAMES: &[&str] = &["Brijraj Jiya", "Tony niger", "Tyler Ingrali", "Gotham Tyres"];
const JOIN_DATES: &[&str] = &["1/9/2016", "24/05/2017", "17/05/2018", "18/04/2016"];
const AADHAR_NUMBERS: &[&str] = &[
    "1234 5678 9012",
    "9876 5432 1098",
    "4567 8901 2345",
    "8765 0123 4567",
];
const VEHICLE_TYPES: &[&str] = &["SUV", "SEDAN", "Crossover", "Coupe"];

// Placeholder values the registration screen has always shown for
// incomplete requests.
pub fn schema() -> RowSchema {
    RowSchema {
        entity: EntityKind::NewDriver,
        id_path: "_id",
        id_prefix: "driver",
        status_path: "status",
        status_default: "Pending",
        fields: vec![
            FieldSpec::text("Name", "fullName").or_cycle(NAMES),
            FieldSpec::with("Join Date", "createdAt", Transform::ShortDate).or_cycle(JOIN_DATES),
            FieldSpec::text("Aadhar Number", "aadharNumber").or_cycle(AADHAR_NUMBERS),
            FieldSpec::text("Vehicle Type", "vehicleDetails.type").or_cycle(VEHICLE_TYPES),
            FieldSpec::text("DL Number", "drivingLicense.number").or("DL-1234-56780"),
            FieldSpec::text("Phone", "contactNumber").or("1234567890"),
            FieldSpec::text("Vehicle License", "vehicleDetails.licensePlate").or("MH12 AB 1234"),
            FieldSpec::text("Registration Number", "vehicleDetails.registrationNumber")
                .or("MH12 2024 123456"),
            FieldSpec::text("Bank Account", "bankDetails.accountNumber").or("1234567890"),
            FieldSpec::constant("Verified", "Yes"),
            FieldSpec {
                column: "Action",
                source: FieldSource::RowIndex,
                default: "View Profile",
                source_default: None,
                cycle: None,
                transform: Transform::Custom(action_label),
            },
        ],
    }
}

pub fn list_spec(items_per_page: usize) -> ListSpec {
    ListSpec {
        title: "New Drivers",
        schema: schema(),
        search_fields: SEARCH_FIELDS,
        empty_message: "No driver requests",
        items_per_page,
        page_window: None,
    }
}
