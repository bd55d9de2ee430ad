//! Bonus history client.
//!
//! Read-only consumer of `GET /user/bonus`, used to refresh the
//! displayed totals after a successful redemption. Paginated by `page`
//! with optional search and date-range filters.

use crate::auth::TokenProvider;
use crate::config::ApiConfig;
use crate::types::{ScanError, ScanResult};
use chrono::NaiveDate;
use log::debug;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct BonusHistoryQuery {
    /// 1-based page number; 0 is treated as 1.
    pub page: u32,
    pub search: Option<String>,
    /// Date filters are sent only when both bounds are present.
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
}

impl BonusHistoryQuery {
    pub fn page(page: u32) -> Self {
        Self {
            page,
            ..Default::default()
        }
    }

    /// Today's history only. Used for the "scanned today" counter.
    pub fn for_day(day: NaiveDate) -> Self {
        Self {
            page: 1,
            search: None,
            from_date: Some(day),
            to_date: Some(day),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BonusEntry {
    pub bonus: String,
    pub barcode_data: String,
    pub created_at: String,
}

/// One page of bonus history, as returned by the server.
#[derive(Debug, Clone, Deserialize)]
pub struct BonusHistoryPage {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<BonusEntry>,
    pub total_bonuses: u64,
    #[serde(default)]
    pub filtered_total: Option<u64>,
}

pub struct BonusHistoryClient {
    http: Client,
    base_url: String,
    tokens: Arc<dyn TokenProvider>,
}

impl BonusHistoryClient {
    pub fn new(config: &ApiConfig, tokens: Arc<dyn TokenProvider>) -> ScanResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ScanError::Http(e.to_string()))?;
        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            tokens,
        })
    }

    pub async fn fetch(&self, query: &BonusHistoryQuery) -> ScanResult<BonusHistoryPage> {
        let token = self
            .tokens
            .current_bearer_token()
            .ok_or(ScanError::NotAuthenticated)?;

        let mut params: Vec<(&str, String)> =
            vec![("page", query.page.max(1).to_string())];
        if let Some(search) = &query.search {
            params.push(("search", search.clone()));
        }
        if let (Some(from), Some(to)) = (query.from_date, query.to_date) {
            params.push(("from_date", from.to_string()));
            params.push(("to_date", to.to_string()));
        }

        debug!("Fetching bonus history page {}", query.page.max(1));
        let response = self
            .http
            .get(format!("{}/user/bonus", self.base_url))
            .bearer_auth(token)
            .header(reqwest::header::ACCEPT, "application/json")
            .query(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ScanError::Http(format!(
                "Bonus history fetch failed: HTTP {}",
                response.status()
            )));
        }

        Ok(response.json().await?)
    }
}

/// Extract the next page number from a page's `next` URL, if any.
pub fn next_page(page: &BonusHistoryPage) -> Option<u32> {
    let next = page.next.as_deref()?;
    let url = reqwest::Url::parse(next).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == "page")
        .and_then(|(_, value)| value.parse().ok())
}
