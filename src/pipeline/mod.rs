pub mod filter;
pub mod normalize;
pub mod paginate;
pub mod status;

use serde::Serialize;
use serde_json::Value;

use crate::utils::DisplayFormat;

pub use filter::filter_rows;
pub use normalize::{normalize_collection, normalize_record, FieldSpec, Row, RowSchema, Transform};
pub use paginate::{paginate, Page, PaginationState};
pub use status::{derive_status, DerivedStatus, EntityKind, StyleCategory};

/// Static description of one listing page.
#[derive(Clone, Debug)]
pub struct ListSpec {
    pub title: &'static str,
    pub schema: RowSchema,
    pub search_fields: &'static [&'static str],
    pub empty_message: &'static str,
    pub items_per_page: usize,
    /// Number of middle page buttons; `None` shows every page.
    pub page_window: Option<usize>,
}

/// What a page shows after one pass of the pipeline.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedList {
    pub title: String,
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
    /// Offset of `rows[0]` in the filtered collection, for row numbering.
    pub start_index: usize,
    pub current_page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub visible_pages: Vec<usize>,
    pub query: String,
    pub empty_message: String,
}

impl RenderedList {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Rows for one page, owned by that page. Every refresh replaces the whole
/// collection; nothing is merged.
#[derive(Clone, Debug)]
pub struct ListView {
    spec: ListSpec,
    format: DisplayFormat,
    rows: Vec<Row>,
    filtered: Vec<Row>,
    query: String,
    pagination: PaginationState,
}

impl ListView {
    pub fn new(spec: ListSpec, format: DisplayFormat) -> Self {
        let pagination = PaginationState::new(spec.items_per_page);
        Self {
            spec,
            format,
            rows: Vec::new(),
            filtered: Vec::new(),
            query: String::new(),
            pagination,
        }
    }

    pub fn spec(&self) -> &ListSpec {
        &self.spec
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn filtered_rows(&self) -> &[Row] {
        &self.filtered
    }

    pub fn pagination(&self) -> &PaginationState {
        &self.pagination
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn replace_records(&mut self, records: &[Value]) {
        let rows = normalize_collection(records, &self.spec.schema, &self.format);
        self.replace_rows(rows);
    }

    pub fn replace_rows(&mut self, rows: Vec<Row>) {
        self.rows = rows;
        self.refilter();
    }

    pub fn clear(&mut self) {
        self.replace_rows(Vec::new());
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
        self.refilter();
    }

    pub fn go_to_page(&mut self, page: usize) -> bool {
        self.pagination.go_to(page)
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.rows.iter().any(|r| r.id == id)
    }

    fn refilter(&mut self) {
        self.filtered = filter_rows(&self.rows, &self.query, self.spec.search_fields);
        self.pagination.set_total_items(self.filtered.len());
    }

    pub fn render(&self) -> RenderedList {
        let page = paginate(
            &self.filtered,
            self.pagination.current_page(),
            self.pagination.items_per_page(),
        );
        let visible_pages = match self.spec.page_window {
            Some(window) => self.pagination.visible_pages(window),
            None => (1..=page.total_pages).collect(),
        };
        RenderedList {
            title: self.spec.title.to_string(),
            columns: self
                .spec
                .schema
                .fields
                .iter()
                .map(|f| f.column.to_string())
                .collect(),
            rows: page.items.to_vec(),
            start_index: page.start_index,
            current_page: self.pagination.current_page(),
            total_pages: page.total_pages,
            total_items: self.filtered.len(),
            visible_pages,
            query: self.query.clone(),
            empty_message: self.spec.empty_message.to_string(),
        }
    }
}
