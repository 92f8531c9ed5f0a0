//! Per-page view state around a [`ListView`]: loading flag, fetch tickets,
//! and the notice shown after a failed fetch or mutation.

use serde::Serialize;
use tracing::debug;

use crate::actions::{self, DriverForm};
use crate::fetcher::{ApiClient, ApiError, Endpoint, FetchOutcome};
use crate::pipeline::{ListSpec, ListView, RenderedList};
use crate::utils::DisplayFormat;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A non-blocking message for the operator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Issued when a fetch starts; only the newest ticket may write results.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
}

#[derive(Debug)]
pub struct ListPage {
    endpoint: Endpoint,
    list: ListView,
    loading: bool,
    generation: u64,
    mounted: bool,
    notice: Option<Notice>,
}

impl ListPage {
    pub fn new(spec: ListSpec, endpoint: Endpoint, format: DisplayFormat) -> Self {
        Self {
            endpoint,
            list: ListView::new(spec, format),
            loading: false,
            generation: 0,
            mounted: true,
            notice: None,
        }
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn list(&self) -> &ListView {
        &self.list
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    /// Any fetch still in flight resolves into nothing once the page is gone.
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.loading = false;
    }

    pub fn begin_refresh(&mut self) -> FetchTicket {
        self.generation = self.generation.wrapping_add(1);
        self.loading = true;
        FetchTicket {
            generation: self.generation,
        }
    }

    /// Writes a fetch result into the page. Returns `false` and changes
    /// nothing when the ticket is stale or the page was unmounted.
    pub fn apply(&mut self, ticket: FetchTicket, outcome: FetchOutcome) -> bool {
        if !self.mounted {
            debug!(path = %self.endpoint.path, "discarding fetch for unmounted page");
            return false;
        }
        if ticket.generation != self.generation {
            debug!(
                path = %self.endpoint.path,
                ticket = ticket.generation,
                current = self.generation,
                "discarding stale fetch"
            );
            return false;
        }
        self.loading = false;
        self.list.replace_records(&outcome.records);
        self.notice = outcome
            .error
            .map(|e| Notice::error(format!("could not load {}: {e}", self.list.spec().title)));
        true
    }

    pub async fn refresh(&mut self, client: &ApiClient) -> bool {
        let ticket = self.begin_refresh();
        let outcome = client.fetch_collection(&self.endpoint).await;
        self.apply(ticket, outcome)
    }

    pub fn set_query(&mut self, query: &str) {
        self.list.set_query(query);
    }

    pub fn go_to_page(&mut self, page: usize) -> bool {
        self.list.go_to_page(page)
    }

    pub fn render(&self) -> RenderedList {
        self.list.render()
    }

    /// On success the list is refetched in full; on failure the current
    /// rows stay and an error notice is set.
    pub async fn delete_driver(&mut self, client: &ApiClient, id: &str) -> Result<(), ApiError> {
        match actions::delete_driver(client, id).await {
            Ok(()) => {
                self.refresh(client).await;
                if self.notice.is_none() {
                    self.notice = Some(Notice::info(format!("driver {id} deleted")));
                }
                Ok(())
            }
            Err(e) => {
                self.notice = Some(Notice::error(format!("could not delete driver {id}: {e}")));
                Err(e)
            }
        }
    }

    /// Fetches the driver, merges the form, sends the full record back and
    /// refetches the list.
    pub async fn update_driver(
        &mut self,
        client: &ApiClient,
        id: &str,
        form: &DriverForm,
    ) -> Result<(), ApiError> {
        match submit_update(client, id, form).await {
            Ok(()) => {
                self.refresh(client).await;
                if self.notice.is_none() {
                    self.notice = Some(Notice::info(format!("driver {id} updated")));
                }
                Ok(())
            }
            Err(e) => {
                self.notice = Some(Notice::error(format!("could not update driver {id}: {e}")));
                Err(e)
            }
        }
    }
}

async fn submit_update(client: &ApiClient, id: &str, form: &DriverForm) -> Result<(), ApiError> {
    form.validate()?;
    let record = actions::get_driver(client, id).await?;
    let body = form.apply(&record)?;
    actions::update_driver(client, id, &body).await
}
