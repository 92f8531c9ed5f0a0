use crate::fetcher::{Endpoint, Envelope};
use crate::pipeline::{EntityKind, FieldSpec, ListSpec, RowSchema, Transform};
use crate::utils::NOT_AVAILABLE;

pub const LIST_PATH: &str = "api/driverRequest/get";
pub const GET_PATH: &str = "api/admin/getDriver";
pub const UPDATE_PATH: &str = "api/admin/updateDriver";
pub const DELETE_PATH: &str = "api/admin/deleteDriver";

pub const SEARCH_FIELDS: &[&str] = &["Name", "Phone", "Vehicle Number"];

/// The approved-driver listing answers `{success, data}` in the current API,
/// a bare array in older deployments.
pub fn endpoint(envelope: Envelope) -> Endpoint {
    Endpoint::new(LIST_PATH, envelope)
}

pub fn schema() -> RowSchema {
    RowSchema {
        entity: EntityKind::Driver,
        id_path: "_id",
        id_prefix: "driver",
        status_path: "status",
        status_default: NOT_AVAILABLE,
        fields: vec![
            FieldSpec::text("Name", "fullName"),
            FieldSpec::with("Join Date", "createdAt", Transform::ShortDate),
            FieldSpec::with(
                "Vehicle Type",
                "vehicleDetails",
                Transform::Join(&["make", "model"]),
            ),
            FieldSpec::text("Phone", "contactNumber"),
            FieldSpec::text("Vehicle Number", "vehicleDetails.numberPlate"),
        ],
    }
}

pub fn list_spec(items_per_page: usize) -> ListSpec {
    ListSpec {
        title: "Driver's Details",
        schema: schema(),
        search_fields: SEARCH_FIELDS,
        empty_message: "No drivers found",
        items_per_page,
        page_window: None,
    }
}

/// Column order for the single-driver detail view.
pub fn detail_schema() -> RowSchema {
    RowSchema {
        entity: EntityKind::Driver,
        id_path: "_id",
        id_prefix: "driver",
        status_path: "status",
        status_default: NOT_AVAILABLE,
        fields: vec![
            FieldSpec::text("Name", "fullName"),
            FieldSpec::text("Phone", "contactNumber"),
            FieldSpec::text("Email", "email"),
            FieldSpec::with("Join Date", "createdAt", Transform::ShortDate),
            FieldSpec::text("Make", "vehicleDetails.make"),
            FieldSpec::text("Model", "vehicleDetails.model"),
            FieldSpec::text("Vehicle Number", "vehicleDetails.numberPlate"),
            FieldSpec::with("Salary", "salary", Transform::Currency),
            FieldSpec::text("Bank Account", "bankDetails.accountNumber"),
        ],
    }
}
