use serde::Serialize;
use serde_json::{json, Value};

use crate::pipeline::{EntityKind, FieldSpec, ListSpec, ListView, RenderedList, RowSchema, Transform};
use crate::utils::{self, DisplayFormat, NOT_AVAILABLE};

pub const SUMMARY_PATH: &str = "api/admin/dashboard";

pub const DEFAULT_LATITUDE: f64 = 40.7128;
pub const DEFAULT_LONGITUDE: f64 = -74.006;

const WEEKS: usize = 12;
const REVENUE_MONTHS: [&str; 6] = ["Jan", "Feb", "Mar", "Apr", "May", "Jun"];

/// Counts and nested collections from `GET /api/admin/dashboard`, read
/// leniently: absent or mistyped numbers become zero, absent arrays empty.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DashboardSummary {
    pub finished_trips: f64,
    pub new_users: usize,
    pub total_earnings: f64,
    pub cancelled_trips: f64,
    pub total_revenue: f64,
    pub ongoing_trips: f64,
    pub driver_details: Vec<Value>,
    pub salary_status: Vec<Value>,
}

fn number(doc: &Value, key: &str) -> f64 {
    doc.get(key).and_then(utils::value_as_f64).unwrap_or(0.0)
}

fn array(doc: &Value, key: &str) -> Vec<Value> {
    match doc.get(key) {
        Some(Value::Array(items)) => items.clone(),
        _ => Vec::new(),
    }
}

impl DashboardSummary {
    pub fn from_value(doc: &Value) -> Self {
        Self {
            finished_trips: number(doc, "finishedTrips"),
            new_users: array(doc, "newUsers").len(),
            total_earnings: number(doc, "totalEarnings"),
            cancelled_trips: number(doc, "cancelledTrips"),
            total_revenue: number(doc, "totalRevenue"),
            ongoing_trips: number(doc, "ongoingTrips"),
            driver_details: array(doc, "driverDetails"),
            salary_status: array(doc, "salaryStatus"),
        }
    }
}

/// One point for a chart widget.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Bar,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatCard {
    pub title: String,
    pub value: String,
    pub unit: String,
    pub period: String,
    pub trend: String,
    pub chart: ChartKind,
    pub series: Vec<ChartPoint>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RevenuePoint {
    pub month: String,
    pub previous: f64,
    pub current: f64,
}

/// Input to the map widget: a single marker.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct MapMarker {
    pub latitude: f64,
    pub longitude: f64,
}

impl Default for MapMarker {
    fn default() -> Self {
        Self {
            latitude: DEFAULT_LATITUDE,
            longitude: DEFAULT_LONGITUDE,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub stats: Vec<StatCard>,
    pub revenue: Vec<RevenuePoint>,
    pub map: MapMarker,
    pub ongoing_trips: RenderedList,
    pub salary_status: RenderedList,
    pub drivers: RenderedList,
}

/// Twelve weekly points all equal to the current metric; the API has no history.
pub fn weekly_series(value: f64) -> Vec<ChartPoint> {
    (1..=WEEKS)
        .map(|week| ChartPoint {
            label: format!("Week {week}"),
            value,
        })
        .collect()
}

pub fn revenue_series(total_revenue: f64) -> Vec<RevenuePoint> {
    REVENUE_MONTHS
        .iter()
        .map(|month| RevenuePoint {
            month: month.to_string(),
            previous: 0.0,
            current: total_revenue,
        })
        .collect()
}

fn stat_card(
    title: &str,
    value: f64,
    unit: &str,
    period: &str,
    trend: &str,
    chart: ChartKind,
) -> StatCard {
    StatCard {
        title: title.to_string(),
        value: utils::format_amount(value),
        unit: unit.to_string(),
        period: period.to_string(),
        trend: trend.to_string(),
        chart,
        series: weekly_series(value),
    }
}

pub fn stat_cards(summary: &DashboardSummary) -> Vec<StatCard> {
    vec![
        stat_card(
            "Finished Trips",
            summary.finished_trips,
            "trips",
            "Monthly",
            "+25%",
            ChartKind::Line,
        ),
        stat_card(
            "New Users",
            summary.new_users as f64,
            "users",
            "Monthly",
            "+15%",
            ChartKind::Line,
        ),
        stat_card(
            "Total Earnings",
            summary.total_earnings,
            "USD",
            "Weekly",
            "+20%",
            ChartKind::Bar,
        ),
        stat_card(
            "Cancelled Trips",
            summary.cancelled_trips,
            "trips",
            "Monthly",
            "-8%",
            ChartKind::Line,
        ),
    ]
}

/// The summary only carries a count of ongoing trips, so a positive count
/// yields one placeholder row priced at total earnings, whatever the count.
pub fn ongoing_trip_records(summary: &DashboardSummary) -> Vec<Value> {
    if summary.ongoing_trips > 0.0 {
        vec![json!({
            "tripId": "#12345",
            "tripStatus": "Ongoing",
            "rideType": "Single",
            "fare": summary.total_earnings,
        })]
    } else {
        Vec::new()
    }
}

pub fn ongoing_trips_spec(rows: usize) -> ListSpec {
    ListSpec {
        title: "Ongoing Trips",
        schema: RowSchema {
            entity: EntityKind::OngoingTrip,
            id_path: "tripId",
            id_prefix: "trip",
            status_path: "tripStatus",
            status_default: NOT_AVAILABLE,
            fields: vec![
                FieldSpec::text("Trip Id", "tripId"),
                FieldSpec::text("Ride Type", "rideType"),
                FieldSpec::with("Fare", "fare", Transform::Currency).or_source("0"),
            ],
        },
        search_fields: &[],
        empty_message: "No ongoing trips",
        items_per_page: rows.max(1),
        page_window: None,
    }
}

pub fn salary_spec(rows: usize) -> ListSpec {
    ListSpec {
        title: "Salary Status",
        schema: RowSchema {
            entity: EntityKind::Salary,
            id_path: "transactionId",
            id_prefix: "salary",
            status_path: "status",
            status_default: NOT_AVAILABLE,
            fields: vec![
                FieldSpec::text("Name", "name"),
                FieldSpec::text("Transaction ID", "transactionId"),
                FieldSpec::with("Amount", "amount", Transform::Currency),
            ],
        },
        search_fields: &[],
        empty_message: "No salary data",
        items_per_page: rows.max(1),
        page_window: None,
    }
}

pub fn drivers_spec(rows: usize) -> ListSpec {
    ListSpec {
        title: "Driver's Details",
        schema: RowSchema {
            entity: EntityKind::DashboardDriver,
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
        },
        search_fields: &["Name", "Phone", "Vehicle Number"],
        empty_message: "No drivers",
        items_per_page: rows.max(1),
        page_window: None,
    }
}

// Dashboard tables are not paged: one page holds every record.
fn embedded_table(
    spec: fn(usize) -> ListSpec,
    records: &[Value],
    format: &DisplayFormat,
) -> RenderedList {
    let mut view = ListView::new(spec(records.len()), format.clone());
    view.replace_records(records);
    view.render()
}

impl DashboardView {
    pub fn build(summary: &DashboardSummary, format: &DisplayFormat) -> Self {
        Self {
            stats: stat_cards(summary),
            revenue: revenue_series(summary.total_revenue),
            map: MapMarker::default(),
            ongoing_trips: embedded_table(
                ongoing_trips_spec,
                &ongoing_trip_records(summary),
                format,
            ),
            salary_status: embedded_table(salary_spec, &summary.salary_status, format),
            drivers: embedded_table(drivers_spec, &summary.driver_details, format),
        }
    }

    /// The view shown while the summary is unavailable.
    pub fn empty(format: &DisplayFormat) -> Self {
        Self::build(&DashboardSummary::default(), format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::StyleCategory;

    #[test]
    fn embedded_tables_show_every_record() {
        let drivers: Vec<Value> = (0..12)
            .map(|i| json!({"_id": format!("d{i}"), "fullName": format!("Driver {i}")}))
            .collect();
        let salaries: Vec<Value> = (0..7)
            .map(|i| json!({"name": format!("Driver {i}"), "transactionId": format!("t{i}"), "amount": 100}))
            .collect();
        let summary = DashboardSummary::from_value(&json!({
            "driverDetails": drivers,
            "salaryStatus": salaries,
        }));
        let view = DashboardView::build(&summary, &DisplayFormat::default());
        assert_eq!(view.drivers.rows.len(), 12);
        assert_eq!(view.salary_status.rows.len(), 7);
        assert_eq!(view.drivers.rows[11].field("Name"), Some("Driver 11"));
        assert_eq!(view.salary_status.rows[6].id, "t6");
    }

    #[test]
    fn zero_ongoing_trips_is_empty_state() {
        let summary = DashboardSummary::from_value(&json!({"ongoingTrips": 0}));
        let view = DashboardView::build(&summary, &DisplayFormat::default());
        assert!(view.ongoing_trips.is_empty());
        assert_eq!(view.ongoing_trips.empty_message, "No ongoing trips");
    }

    #[test]
    fn positive_count_yields_one_placeholder_row() {
        let summary =
            DashboardSummary::from_value(&json!({"ongoingTrips": 2, "totalEarnings": 500}));
        let view = DashboardView::build(&summary, &DisplayFormat::default());
        assert_eq!(view.ongoing_trips.rows.len(), 1);
        let row = &view.ongoing_trips.rows[0];
        assert_eq!(row.id, "#12345");
        assert_eq!(row.field("Fare"), Some("₹500"));
        assert_eq!(row.derived_status.label, "Ongoing");
        assert_eq!(row.derived_status.style, StyleCategory::Positive);
    }

    #[test]
    fn summary_reads_leniently() {
        let summary = DashboardSummary::from_value(&json!({
            "finishedTrips": "14",
            "newUsers": [{}, {}, {}],
            "totalEarnings": null,
            "driverDetails": "oops"
        }));
        assert_eq!(summary.finished_trips, 14.0);
        assert_eq!(summary.new_users, 3);
        assert_eq!(summary.total_earnings, 0.0);
        assert!(summary.driver_details.is_empty());
    }

    #[test]
    fn stat_cards_and_series() {
        let summary = DashboardSummary::from_value(&json!({
            "finishedTrips": 40,
            "newUsers": [{}],
            "totalEarnings": 1200,
            "cancelledTrips": 3,
            "totalRevenue": 9000
        }));
        let cards = stat_cards(&summary);
        assert_eq!(cards.len(), 4);
        assert_eq!(cards[0].value, "40");
        assert_eq!(cards[1].value, "1");
        assert_eq!(cards[2].chart, ChartKind::Bar);
        assert_eq!(cards[3].trend, "-8%");
        assert!(cards.iter().all(|c| c.series.len() == 12));
        assert!(cards[2].series.iter().all(|p| p.value == 1200.0));

        let revenue = revenue_series(summary.total_revenue);
        assert_eq!(revenue.len(), 6);
        assert_eq!(revenue[0].month, "Jan");
        assert_eq!(revenue[5].current, 9000.0);
        assert_eq!(revenue[5].previous, 0.0);
    }

    #[test]
    fn embedded_driver_and_salary_tables() {
        let summary = DashboardSummary::from_value(&json!({
            "driverDetails": [
                {"_id": "d1", "fullName": "Asha", "status": "on-duty"},
                {"_id": "d2", "fullName": "Vikram", "status": "off-duty",
                 "vehicleDetails": {"make": "Tata", "model": "Nexon", "numberPlate": "RJ14"}}
            ],
            "salaryStatus": [
                {"name": "asha", "transactionId": "T1", "amount": 15000, "status": "paid"},
                {"name": "vikram", "transactionId": "T2", "status": "pending"}
            ]
        }));
        let view = DashboardView::build(&summary, &DisplayFormat::default());
        assert_eq!(view.drivers.rows.len(), 2);
        assert_eq!(view.drivers.rows[0].derived_status.label, "Available");
        assert_eq!(view.drivers.rows[1].derived_status.label, "On Trip");
        assert_eq!(view.drivers.rows[1].field("Vehicle Type"), Some("Tata Nexon"));

        assert_eq!(view.salary_status.rows[0].field("Amount"), Some("₹15000"));
        assert_eq!(view.salary_status.rows[1].field("Amount"), Some("N/A"));
        assert_eq!(view.salary_status.rows[0].derived_status.label, "Paid");
    }

    #[test]
    fn empty_dashboard_has_default_map_marker() {
        let view = DashboardView::empty(&DisplayFormat::default());
        assert_eq!(view.map, MapMarker::default());
        assert!(view.drivers.is_empty());
        assert!(view.salary_status.is_empty());
    }
}
