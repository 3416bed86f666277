use reqwest::blocking::Client;
use reqwest::{StatusCode, Url};
use std::sync::OnceLock;
use std::time::Duration;
use tracing::debug;

use crate::csv_file;
use crate::errors::{CleanseError, CleanseResult};
use crate::reference::ReferenceStore;
use crate::types::RawTable;

pub const DEFAULT_SHEETS_BASE_URL: &str = "https://docs.google.com/spreadsheets/d";

/// HTTP client for the sheet endpoint. Built on first use, then reused for the
/// life of the process; pass it by reference to every store that needs it.
#[derive(Debug)]
pub struct SheetsHandle {
    timeout: Duration,
    client: OnceLock<Client>,
}

impl SheetsHandle {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            client: OnceLock::new(),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.client.get().is_some()
    }

    pub fn client(&self) -> CleanseResult<&Client> {
        if let Some(client) = self.client.get() {
            return Ok(client);
        }
        let built = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| CleanseError::Transport(e.to_string()))?;
        debug!(timeout_secs = self.timeout.as_secs(), "created sheets client");
        Ok(self.client.get_or_init(|| built))
    }
}

/// A Google spreadsheet shared as "anyone with the link", read through its CSV export.
pub struct PublishedSheetStore<'a> {
    handle: &'a SheetsHandle,
    base_url: String,
    sheet_id: String,
}

impl<'a> PublishedSheetStore<'a> {
    pub fn new(handle: &'a SheetsHandle, sheet_id: impl Into<String>) -> Self {
        Self {
            handle,
            base_url: DEFAULT_SHEETS_BASE_URL.to_string(),
            sheet_id: sheet_id.into(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn sheet_url(&self, worksheet: &str) -> CleanseResult<Url> {
        let raw = format!(
            "{}/{}/gviz/tq",
            self.base_url.trim_end_matches('/'),
            self.sheet_id.trim()
        );
        let mut url = Url::parse(&raw).map_err(|e| CleanseError::InvalidConfig {
            field: "reference sheet url".to_string(),
            value: format!("{raw}: {e}"),
        })?;
        url.query_pairs_mut()
            .append_pair("tqx", "out:csv")
            .append_pair("sheet", worksheet);
        Ok(url)
    }
}

impl ReferenceStore for PublishedSheetStore<'_> {
    fn fetch_table(&self, worksheet: &str) -> CleanseResult<RawTable> {
        let url = self.sheet_url(worksheet)?;
        let client = self.handle.client()?;
        let response = client.get(url).send().map_err(|e| {
            CleanseError::Transport(
                if e.is_connect() || e.is_timeout() {
                    "Check your internet connection and try again.".to_string()
                } else {
                    e.to_string()
                },
            )
        })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND || status == StatusCode::BAD_REQUEST {
            return Err(CleanseError::WorksheetNotFound {
                worksheet: worksheet.to_string(),
            });
        }
        if !status.is_success() {
            return Err(CleanseError::Transport(format!("sheet fetch failed ({status})")));
        }
        let is_html = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map_or(false, |ct| ct.contains("text/html"));
        if is_html {
            return Err(CleanseError::Transport(
                "sheet returned a web page; is it shared as \"anyone with the link\"?".to_string(),
            ));
        }
        let body = response
            .text()
            .map_err(|e| CleanseError::Transport(e.to_string()))?;
        csv_file::read_table_from(body.as_bytes())
    }

    fn describe(&self) -> String {
        format!("published sheet {}", self.sheet_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_encodes_worksheet() {
        let handle = SheetsHandle::new(Duration::from_secs(5));
        let store = PublishedSheetStore::new(&handle, "abc123").with_base_url("http://localhost:9/d/");
        let url = store.sheet_url("NEW GDOC WSA").unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:9/d/abc123/gviz/tq?tqx=out%3Acsv&sheet=NEW+GDOC+WSA"
        );
        assert!(!handle.is_connected());
    }

    #[test]
    fn client_is_created_once() {
        let handle = SheetsHandle::new(Duration::from_secs(5));
        let first = handle.client().unwrap() as *const Client;
        let second = handle.client().unwrap() as *const Client;
        assert_eq!(first, second);
        assert!(handle.is_connected());
    }
}
