pub mod report;

use colored::{ColoredString, Colorize};
use serde::Serialize;

use crate::entities::dashboard::DashboardView;
use crate::pipeline::{RenderedList, Row, StyleCategory};
use crate::view::{Notice, NoticeLevel};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Html,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "text" | "txt" => Some(Self::Text),
            "json" => Some(Self::Json),
            "html" | "htm" => Some(Self::Html),
            _ => None,
        }
    }
}

pub fn infer_format_from_path(path: &str) -> Option<OutputFormat> {
    let lower = path.trim().to_lowercase();
    if lower.ends_with(".json") {
        return Some(OutputFormat::Json);
    }
    if lower.ends_with(".html") || lower.ends_with(".htm") {
        return Some(OutputFormat::Html);
    }
    if lower.ends_with(".txt") {
        return Some(OutputFormat::Text);
    }
    None
}

/// Everything a command can print.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Document {
    List {
        #[serde(flatten)]
        list: RenderedList,
        notice: Option<Notice>,
    },
    Dashboard {
        #[serde(flatten)]
        dashboard: DashboardView,
        notice: Option<Notice>,
    },
    Detail {
        title: String,
        id: String,
        fields: Vec<(String, String)>,
        status: String,
    },
}

pub fn badge(style: StyleCategory, label: &str) -> ColoredString {
    match style {
        StyleCategory::Positive => label.green().bold(),
        StyleCategory::Warning => label.yellow().bold(),
        StyleCategory::Negative => label.red().bold(),
        StyleCategory::Info => label.blue().bold(),
        StyleCategory::Neutral => label.normal(),
    }
}

fn notice_line(notice: &Notice) -> String {
    match notice.level {
        NoticeLevel::Info => format!("{} {}\n", "::".cyan(), notice.message),
        NoticeLevel::Error => format!("{} {}\n", "!!".red().bold(), notice.message.red()),
    }
}

fn width(value: &str) -> usize {
    value.chars().count()
}

fn pad(value: &str, to: usize) -> String {
    let fill = to.saturating_sub(width(value));
    format!("{value}{}", " ".repeat(fill))
}

fn table(columns: &[String], rows: &[Row], start_index: usize) -> String {
    let mut headers: Vec<&str> = vec!["#"];
    headers.extend(columns.iter().map(String::as_str));
    headers.push("Status");

    let numbers: Vec<String> = (0..rows.len())
        .map(|i| (start_index + i + 1).to_string())
        .collect();
    let mut widths: Vec<usize> = headers.iter().map(|h| width(h)).collect();
    for (row, number) in rows.iter().zip(numbers.iter()) {
        widths[0] = widths[0].max(width(number));
        for (i, column) in columns.iter().enumerate() {
            widths[i + 1] = widths[i + 1].max(width(row.field(column).unwrap_or("")));
        }
        let last = widths.len() - 1;
        widths[last] = widths[last].max(width(&row.derived_status.label));
    }

    let mut out = String::new();
    let header_line = headers
        .iter()
        .zip(widths.iter())
        .map(|(h, w)| pad(h, *w))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(&format!("{}\n", header_line.bold()));
    let rule: usize = widths.iter().sum::<usize>() + 2 * (widths.len() - 1);
    out.push_str(&format!("{}\n", "-".repeat(rule).dimmed()));

    for (row, number) in rows.iter().zip(numbers.iter()) {
        let mut cells = vec![pad(number, widths[0])];
        for (i, column) in columns.iter().enumerate() {
            cells.push(pad(row.field(column).unwrap_or(""), widths[i + 1]));
        }
        let status = &row.derived_status;
        cells.push(badge(status.style, &status.label).to_string());
        out.push_str(cells.join("  ").trim_end());
        out.push('\n');
    }
    out
}

fn pager(list: &RenderedList) -> String {
    let pages = list
        .visible_pages
        .iter()
        .map(|p| {
            if *p == list.current_page {
                format!("[{p}]").bold().to_string()
            } else {
                p.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ");
    format!(
        "Page {} of {} :: {} result(s) :: {}\n",
        list.current_page, list.total_pages, list.total_items, pages
    )
}

pub fn render_list_text(list: &RenderedList) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", list.title.bold().underline()));
    if !list.query.trim().is_empty() {
        out.push_str(&format!(":: Search    : {}\n", list.query.trim()));
    }
    if list.is_empty() {
        out.push_str(&format!("{}\n", list.empty_message.dimmed()));
        return out;
    }
    out.push_str(&table(&list.columns, &list.rows, list.start_index));
    out.push_str(&pager(list));
    out
}

pub fn render_dashboard_text(view: &DashboardView) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", "Dashboard".bold().underline()));
    for card in view.stats.iter() {
        let trend = if card.trend.starts_with('-') {
            card.trend.red()
        } else {
            card.trend.green()
        };
        out.push_str(&format!(
            ":: {:<16}: {} {} ({}, {})\n",
            card.title, card.value, card.unit, card.period, trend
        ));
    }
    let revenue = view
        .revenue
        .iter()
        .map(|p| format!("{} {}", p.month, crate::utils::format_amount(p.current)))
        .collect::<Vec<_>>()
        .join(", ");
    out.push_str(&format!(":: {:<16}: {}\n", "Revenue", revenue));
    out.push_str(&format!(
        ":: {:<16}: {}, {}\n\n",
        "Map", view.map.latitude, view.map.longitude
    ));
    for list in [&view.ongoing_trips, &view.salary_status, &view.drivers] {
        out.push_str(&render_list_text(list));
        out.push('\n');
    }
    out
}

fn render_detail_text(title: &str, id: &str, fields: &[(String, String)], status: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", title.bold().underline()));
    let label_width = fields.iter().map(|(k, _)| width(k)).max().unwrap_or(0).max(6);
    out.push_str(&format!("{}  {}\n", pad("Id", label_width), id));
    for (name, value) in fields {
        out.push_str(&format!("{}  {}\n", pad(name, label_width), value));
    }
    out.push_str(&format!("{}  {}\n", pad("Status", label_width), status));
    out
}

pub fn render_text(doc: &Document) -> Vec<u8> {
    let out = match doc {
        Document::List { list, notice } => {
            let mut out = notice.as_ref().map(notice_line).unwrap_or_default();
            out.push_str(&render_list_text(list));
            out
        }
        Document::Dashboard { dashboard, notice } => {
            let mut out = notice.as_ref().map(notice_line).unwrap_or_default();
            out.push_str(&render_dashboard_text(dashboard));
            out
        }
        Document::Detail {
            title,
            id,
            fields,
            status,
        } => render_detail_text(title, id, fields, status),
    };
    out.into_bytes()
}

pub fn render_json(doc: &Document) -> Vec<u8> {
    let mut out = serde_json::to_vec_pretty(doc).unwrap_or_else(|_| b"{}".to_vec());
    out.push(b'\n');
    out
}

pub fn render_html(doc: &Document) -> Vec<u8> {
    report::render_html(doc)
}

pub fn render(doc: &Document, format: OutputFormat) -> Vec<u8> {
    match format {
        OutputFormat::Text => render_text(doc),
        OutputFormat::Json => render_json(doc),
        OutputFormat::Html => render_html(doc),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::drivers;
    use crate::pipeline::ListView;
    use crate::utils::DisplayFormat;
    use serde_json::{json, Value};

    fn rendered(n: usize, page: usize) -> RenderedList {
        let records: Vec<Value> = (1..=n)
            .map(|i| json!({"_id": format!("d{i}"), "fullName": format!("Driver {i}"), "status": "on-duty"}))
            .collect();
        let mut view = ListView::new(drivers::list_spec(4), DisplayFormat::default());
        view.replace_records(&records);
        view.go_to_page(page);
        view.render()
    }

    #[test]
    fn output_format_parsing_and_inference() {
        assert_eq!(OutputFormat::parse("JSON"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::parse("htm"), Some(OutputFormat::Html));
        assert_eq!(OutputFormat::parse("xml"), None);
        assert_eq!(infer_format_from_path("out/report.HTML"), Some(OutputFormat::Html));
        assert_eq!(infer_format_from_path("rows.json"), Some(OutputFormat::Json));
        assert_eq!(infer_format_from_path("rows"), None);
    }

    #[test]
    fn text_rows_are_numbered_from_page_offset() {
        colored::control::set_override(false);
        let text = String::from_utf8(render_text(&Document::List {
            list: rendered(10, 2),
            notice: None,
        }))
        .unwrap();
        let numbered: Vec<&str> = text
            .lines()
            .filter(|l| l.starts_with(|c: char| c.is_ascii_digit()))
            .collect();
        assert_eq!(numbered.len(), 4);
        assert!(numbered[0].starts_with("5 "));
        assert!(numbered[3].starts_with("8 "));
        assert!(text.contains("Page 2 of 3"));
        assert!(text.contains("Available"));
    }

    #[test]
    fn empty_list_prints_empty_message() {
        colored::control::set_override(false);
        let text = render_list_text(&rendered(0, 1));
        assert!(text.contains("No drivers found"));
        assert!(!text.contains("Page"));
    }

    #[test]
    fn json_document_is_tagged_and_flattened() {
        let bytes = render_json(&Document::List {
            list: rendered(5, 1),
            notice: Some(Notice::error("could not load")),
        });
        let doc: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(doc["kind"], "list");
        assert_eq!(doc["totalItems"], 5);
        assert_eq!(doc["rows"].as_array().unwrap().len(), 4);
        assert_eq!(doc["rows"][0]["id"], "d1");
        assert_eq!(doc["rows"][0]["derivedStatus"]["style"], "positive");
        assert_eq!(doc["notice"]["level"], "error");
    }
}
