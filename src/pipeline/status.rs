use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleCategory {
    Positive,
    Warning,
    Negative,
    Info,
    Neutral,
}

impl StyleCategory {
    pub fn label(self) -> &'static str {
        match self {
            StyleCategory::Positive => "positive",
            StyleCategory::Warning => "warning",
            StyleCategory::Negative => "negative",
            StyleCategory::Info => "info",
            StyleCategory::Neutral => "neutral",
        }
    }

    pub fn badge_class(self) -> &'static str {
        match self {
            StyleCategory::Positive => "bg-green-100 text-green-600",
            StyleCategory::Warning => "bg-orange-100 text-orange-600",
            StyleCategory::Negative => "bg-red-100 text-red-600",
            StyleCategory::Info => "bg-blue-100 text-blue-600",
            StyleCategory::Neutral => "bg-gray-100 text-gray-600",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DerivedStatus {
    pub label: String,
    pub style: StyleCategory,
}

impl DerivedStatus {
    fn new(label: &str, style: StyleCategory) -> Self {
        Self {
            label: label.to_string(),
            style,
        }
    }

    fn passthrough(raw: &str) -> Self {
        Self::new(non_blank(raw), StyleCategory::Neutral)
    }
}

fn non_blank(raw: &str) -> &str {
    if raw.trim().is_empty() {
        crate::utils::NOT_AVAILABLE
    } else {
        raw
    }
}

/// Which status vocabulary a row's raw status belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Driver,
    DashboardDriver,
    Trip,
    OngoingTrip,
    NewDriver,
    Salary,
}

/// Total and deterministic: every input string maps to a label and a style.
pub fn derive_status(kind: EntityKind, raw: &str) -> DerivedStatus {
    let key = raw.trim().to_ascii_lowercase();
    match kind {
        EntityKind::Driver => match key.as_str() {
            "on-duty" => DerivedStatus::new("Available", StyleCategory::Positive),
            "off-duty" => DerivedStatus::new("On Trip", StyleCategory::Warning),
            _ => DerivedStatus::passthrough(raw),
        },
        // the dashboard table treats anything that is not on duty as busy
        EntityKind::DashboardDriver => match key.as_str() {
            "on-duty" => DerivedStatus::new("Available", StyleCategory::Positive),
            _ => DerivedStatus::new("On Trip", StyleCategory::Warning),
        },
        EntityKind::OngoingTrip => match key.as_str() {
            "ongoing" => DerivedStatus::new(raw, StyleCategory::Positive),
            "booked" => DerivedStatus::new(raw, StyleCategory::Info),
            "payment" => DerivedStatus::new(raw, StyleCategory::Warning),
            _ => DerivedStatus::passthrough(raw),
        },
        EntityKind::NewDriver => match key.as_str() {
            "pending" => DerivedStatus::new(raw, StyleCategory::Warning),
            "approved" | "active" => DerivedStatus::new(raw, StyleCategory::Positive),
            "rejected" => DerivedStatus::new(raw, StyleCategory::Negative),
            _ => DerivedStatus::passthrough(raw),
        },
        EntityKind::Salary => {
            let label = crate::utils::capitalize(non_blank(raw).trim());
            match key.as_str() {
                "paid" => DerivedStatus::new(&label, StyleCategory::Positive),
                "pending" => DerivedStatus::new(&label, StyleCategory::Warning),
                "failed" => DerivedStatus::new(&label, StyleCategory::Negative),
                _ => DerivedStatus::new(&label, StyleCategory::Neutral),
            }
        }
        EntityKind::Trip => DerivedStatus::passthrough(raw),
    }
}
