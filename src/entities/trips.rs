use crate::fetcher::{Endpoint, Envelope};
use crate::pipeline::{EntityKind, FieldSpec, ListSpec, RowSchema, Transform};
use crate::utils::NOT_AVAILABLE;

pub const LIST_PATH: &str = "api/rideRequest/getAllRides";

pub const SEARCH_FIELDS: &[&str] = &["Pickup", "Drop", "Driver", "Phone"];

pub fn endpoint() -> Endpoint {
    Endpoint::new(LIST_PATH, Envelope::RIDES)
}

pub fn schema() -> RowSchema {
    RowSchema {
        entity: EntityKind::Trip,
        id_path: "_id",
        id_prefix: "ride",
        status_path: "status",
        status_default: NOT_AVAILABLE,
        fields: vec![
            FieldSpec::text("Pickup", "pickupAddress"),
            FieldSpec::text("Drop", "dropoffAddress"),
            FieldSpec::with("Date", "requestTime", Transform::ShortDate),
            FieldSpec::text("Ride Type", "rideType"),
            FieldSpec::text("Driver", "name").or("John Brinkley"),
            FieldSpec::text("Phone", "phone").or("1234567890"),
            FieldSpec::with("Fare", "fare", Transform::Currency).or_source("0"),
            FieldSpec::constant("Payment", "Cash"),
            FieldSpec::with("GST", "fare", Transform::Gst).or_source("0"),
        ],
    }
}

pub fn list_spec(items_per_page: usize) -> ListSpec {
    ListSpec {
        title: "Trips",
        schema: schema(),
        search_fields: SEARCH_FIELDS,
        empty_message: "No trips found",
        items_per_page,
        page_window: Some(3),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::normalize_record;
    use crate::utils::DisplayFormat;
    use serde_json::json;

    #[test]
    fn ride_with_fare_gets_gst() {
        let record = json!({
            "_id": "r1",
            "pickupAddress": "MI Road",
            "dropoffAddress": "Airport",
            "requestTime": "2025-01-10T12:00:00Z",
            "rideType": "Sedan",
            "fare": 236
        });
        let row = normalize_record(&record, 0, &schema(), &DisplayFormat::default());
        assert_eq!(row.field("Fare"), Some("₹236"));
        assert_eq!(row.field("GST"), Some("₹23.6"));
        assert_eq!(row.field("Ride Type"), Some("Sedan"));
        assert_eq!(row.field("Payment"), Some("Cash"));
    }

    #[test]
    fn ride_defaults() {
        let row = normalize_record(&json!({}), 4, &schema(), &DisplayFormat::default());
        assert_eq!(row.id, "ride-4");
        assert_eq!(row.field("Ride Type"), Some("N/A"));
        assert_eq!(row.field("Fare"), Some("₹0"));
        assert_eq!(row.field("GST"), Some("₹0.0"));
        assert_eq!(row.field("Pickup"), Some("N/A"));
        assert_eq!(row.field("Driver"), Some("John Brinkley"));
        assert_eq!(row.field("Phone"), Some("1234567890"));
    }

    #[test]
    fn currency_symbol_follows_display_format() {
        let format = DisplayFormat {
            currency_symbol: "$".to_string(),
            ..DisplayFormat::default()
        };
        let row = normalize_record(&json!({"fare": 100}), 0, &schema(), &format);
        assert_eq!(row.field("Fare"), Some("$100"));
        assert_eq!(row.field("GST"), Some("$10.0"));
    }
}
