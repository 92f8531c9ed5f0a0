use super::Document;
use crate::entities::dashboard::DashboardView;
use crate::pipeline::RenderedList;
use crate::view::{Notice, NoticeLevel};

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn notice_html(notice: Option<&Notice>) -> String {
    let Some(notice) = notice else {
        return String::new();
    };
    let class = match notice.level {
        NoticeLevel::Info => "bg-blue-50 border-blue-200 text-blue-800",
        NoticeLevel::Error => "bg-red-50 border-red-200 text-red-800",
    };
    format!(
        "<div class=\"{class} border rounded-xl p-4 mb-6 text-sm font-medium\">{}</div>\n",
        escape_html(&notice.message)
    )
}

fn list_html(list: &RenderedList) -> String {
    let mut out = String::new();
    out.push_str("<section class=\"bg-white rounded-2xl border border-slate-200 shadow-sm mb-8 overflow-hidden\">\n");
    out.push_str(&format!(
        "  <h2 class=\"px-6 py-4 text-lg font-bold border-b border-slate-100\">{}</h2>\n",
        escape_html(&list.title)
    ));
    if list.is_empty() {
        out.push_str(&format!(
            "  <p class=\"px-6 py-8 text-center text-slate-500\">{}</p>\n</section>\n",
            escape_html(&list.empty_message)
        ));
        return out;
    }

    out.push_str("  <div class=\"overflow-x-auto\"><table class=\"w-full text-left text-sm\">\n");
    out.push_str("    <thead class=\"bg-slate-50 text-xs uppercase tracking-widest\"><tr><th class=\"px-4 py-3\">#</th>");
    for column in list.columns.iter() {
        out.push_str(&format!(
            "<th class=\"px-4 py-3\">{}</th>",
            escape_html(column)
        ));
    }
    out.push_str("<th class=\"px-4 py-3\">Status</th></tr></thead>\n    <tbody class=\"divide-y divide-slate-100\">\n");
    for (i, row) in list.rows.iter().enumerate() {
        out.push_str(&format!(
            "      <tr data-id=\"{}\"><td class=\"px-4 py-3\">{}</td>",
            escape_html(&row.id),
            list.start_index + i + 1
        ));
        for column in list.columns.iter() {
            out.push_str(&format!(
                "<td class=\"px-4 py-3\">{}</td>",
                escape_html(row.field(column).unwrap_or(""))
            ));
        }
        let status = &row.derived_status;
        out.push_str(&format!(
            "<td class=\"px-4 py-3\"><span class=\"{} px-2 py-1 rounded-full text-xs font-semibold\">{}</span></td></tr>\n",
            status.style.badge_class(),
            escape_html(&status.label)
        ));
    }
    out.push_str("    </tbody>\n  </table></div>\n");

    let pages = list
        .visible_pages
        .iter()
        .map(|p| {
            let class = if *p == list.current_page {
                "bg-blue-600 text-white"
            } else {
                "bg-slate-100 text-slate-700"
            };
            format!("<span class=\"{class} px-3 py-1 rounded-lg\">{p}</span>")
        })
        .collect::<Vec<_>>()
        .join("");
    out.push_str(&format!(
        "  <div class=\"px-6 py-4 flex justify-between items-center text-sm text-slate-500\"><span>Page {} of {} &middot; {} result(s)</span><div class=\"flex gap-2\">{pages}</div></div>\n",
        list.current_page, list.total_pages, list.total_items
    ));
    out.push_str("</section>\n");
    out
}

fn dashboard_html(view: &DashboardView) -> String {
    let mut out = String::new();
    out.push_str("<div class=\"grid grid-cols-1 md:grid-cols-4 gap-4 mb-8\">\n");
    for card in view.stats.iter() {
        let trend_class = if card.trend.starts_with('-') {
            "text-red-600"
        } else {
            "text-green-600"
        };
        out.push_str(&format!(
            "  <div class=\"bg-white rounded-2xl border border-slate-200 p-5\"><p class=\"text-sm text-slate-500\">{} &middot; {}</p><p class=\"text-3xl font-bold\">{} <span class=\"text-sm font-medium\">{}</span></p><p class=\"{trend_class} text-sm font-semibold\">{}</p></div>\n",
            escape_html(&card.title),
            escape_html(&card.period),
            escape_html(&card.value),
            escape_html(&card.unit),
            escape_html(&card.trend)
        ));
    }
    out.push_str("</div>\n");
    out.push_str(&format!(
        "<p class=\"mb-8 text-sm text-slate-500\">Map marker: {}, {}</p>\n",
        view.map.latitude, view.map.longitude
    ));
    for list in [&view.ongoing_trips, &view.salary_status, &view.drivers] {
        out.push_str(&list_html(list));
    }
    out
}

fn detail_html(title: &str, id: &str, fields: &[(String, String)], status: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "<section class=\"bg-white rounded-2xl border border-slate-200 p-6\">\n  <h2 class=\"text-lg font-bold mb-4\">{}</h2>\n  <dl class=\"grid grid-cols-2 gap-2 text-sm\">\n",
        escape_html(title)
    ));
    let id_row = ("Id".to_string(), id.to_string());
    let status_row = ("Status".to_string(), status.to_string());
    for (name, value) in std::iter::once(&id_row)
        .chain(fields.iter())
        .chain(std::iter::once(&status_row))
    {
        out.push_str(&format!(
            "    <dt class=\"text-slate-500\">{}</dt><dd>{}</dd>\n",
            escape_html(name),
            escape_html(value)
        ));
    }
    out.push_str("  </dl>\n</section>\n");
    out
}

pub fn render_html(doc: &Document) -> Vec<u8> {
    let (title, body) = match doc {
        Document::List { list, notice } => (
            list.title.clone(),
            format!("{}{}", notice_html(notice.as_ref()), list_html(list)),
        ),
        Document::Dashboard { dashboard, notice } => (
            "Dashboard".to_string(),
            format!("{}{}", notice_html(notice.as_ref()), dashboard_html(dashboard)),
        ),
        Document::Detail {
            title,
            id,
            fields,
            status,
        } => (title.clone(), detail_html(title, id, fields, status)),
    };

    let html = format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8"/>
  <meta content="width=device-width, initial-scale=1.0" name="viewport"/>
  <title>{title} | Fleetdesk</title>
  <script src="https://cdn.tailwindcss.com"></script>
</head>
<body class="bg-slate-50 text-slate-900 min-h-screen">
  <header class="border-b border-slate-200 bg-white px-8 py-4">
    <h1 class="text-xl font-bold uppercase tracking-tight">{title}</h1>
  </header>
  <main class="max-w-[1440px] mx-auto w-full px-8 py-10">
{body}  </main>
</body>
</html>
"#,
        title = escape_html(&title),
        body = body
    );
    html.into_bytes()
}
