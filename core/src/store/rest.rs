//! PostgREST-style HTTP row-store (the hosted backend).

use super::RowStore;
use crate::{
    config::{BackendConfig, NOTIFICATIONS_TABLE},
    error::{SeedError, SeedResult},
    notification::Notification,
    record::InventoryRecord,
};
use reqwest::{
    blocking::{Client, Response},
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_RANGE, CONTENT_TYPE},
};
use serde::Serialize;
use std::time::Duration;

const REST_PREFIX: &str = "rest/v1";

pub struct RestStore {
    client: Client,
    base_url: String,
}

impl RestStore {
    /// Build a store with the credential baked into default headers.
    /// No request timeout is set: a hung backend hangs the run.
    pub fn new(config: &BackendConfig) -> SeedResult<Self> {
        let client = Client::builder()
            .default_headers(Self::auth_headers(config)?)
            .timeout(None::<Duration>)
            .build()?;

        Ok(Self::with_client(client, &config.endpoint))
    }

    /// Headers every insert carries: key, bearer token, JSON body, and a
    /// request for the exact affected-row count.
    pub fn auth_headers(config: &BackendConfig) -> SeedResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert("apikey", header_value(&config.credential)?);
        headers.insert(
            AUTHORIZATION,
            header_value(&format!("Bearer {}", config.credential))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert("Prefer", HeaderValue::from_static("return=minimal, count=exact"));
        Ok(headers)
    }

    /// Build from an existing client. Caller supplies auth headers.
    pub fn with_client(client: Client, endpoint: &str) -> Self {
        Self {
            client,
            base_url: format!("{}/{REST_PREFIX}", endpoint.trim_end_matches('/')),
        }
    }

    pub fn table_url(&self, table: &str) -> String {
        format!("{}/{table}", self.base_url)
    }

    fn post_rows<T: Serialize>(&self, table: &str, rows: &[T]) -> SeedResult<usize> {
        let response = self.client.post(self.table_url(table)).json(rows).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(SeedError::Backend {
                table: table.to_string(),
                status: status.as_u16(),
                message: error_message(response),
            });
        }

        let affected = response
            .headers()
            .get(CONTENT_RANGE)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_content_range_total)
            .unwrap_or(rows.len());

        if affected != rows.len() {
            return Err(SeedError::RowCountMismatch {
                expected: rows.len(),
                actual: affected,
            });
        }
        log::debug!("POST {table}: {affected} rows");
        Ok(affected)
    }
}

impl RowStore for RestStore {
    fn insert_inventory(&mut self, table: &str, rows: &[InventoryRecord]) -> SeedResult<usize> {
        self.post_rows(table, rows)
    }

    fn insert_notifications(&mut self, rows: &[Notification]) -> SeedResult<usize> {
        self.post_rows(NOTIFICATIONS_TABLE, rows)
    }
}

fn header_value(raw: &str) -> SeedResult<HeaderValue> {
    HeaderValue::from_str(raw).map_err(|e| SeedError::InvalidConfig {
        reason: format!("credential is not a valid header value: {e}"),
    })
}

/// `Content-Range: 0-999/1000` or `*/1000` -> 1000.
pub(crate) fn parse_content_range_total(raw: &str) -> Option<usize> {
    raw.rsplit_once('/')
        .and_then(|(_, total)| total.trim().parse().ok())
}

/// Prefer the backend's JSON `message`, fall back to the raw body.
fn error_message(response: Response) -> String {
    let body = response.text().unwrap_or_default();
    serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| {
            if body.is_empty() {
                "empty response body".to_string()
            } else {
                body
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_range_total_is_parsed() {
        assert_eq!(parse_content_range_total("*/1000"), Some(1000));
        assert_eq!(parse_content_range_total("0-549/550"), Some(550));
        assert_eq!(parse_content_range_total("*/*"), None);
        assert_eq!(parse_content_range_total("garbage"), None);
    }

    #[test]
    fn table_url_joins_rest_prefix() {
        let store = RestStore::with_client(Client::new(), "https://demo.supabase.co/");
        assert_eq!(
            store.table_url("inventory_data"),
            "https://demo.supabase.co/rest/v1/inventory_data"
        );
    }
}
