use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Client for the public mfapi.in mutual fund API. The base URL comes from
/// configuration so tests can point it at a mock server.
#[derive(Clone)]
pub struct MfapiClient {
    http: Client,
    base_url: String,
}

impl MfapiClient {
    pub fn new(base_url: String) -> Self {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("failed to build http client");

        Self { http, base_url }
    }

    /// Keyword search. An empty result set is a normal outcome, not an error.
    pub async fn search(&self, q: &str) -> Result<Vec<SearchItem>, String> {
        let url = format!("{}/search", self.base_url);
        let res = self
            .http
            .get(&url)
            .query(&[("q", q)])
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !res.status().is_success() {
            // status only; upstream bodies never travel further than here
            return Err(format!("mfapi search failed: {}", res.status()));
        }

        res.json::<Vec<SearchItem>>()
            .await
            .map_err(|e| e.to_string())
    }

    /// Full fund document (meta + NAV history, newest first), passed through
    /// as-is.
    pub async fn fund(&self, scheme_code: &str) -> Result<serde_json::Value, String> {
        let url = format!("{}/{}", self.base_url, scheme_code);
        let res = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !res.status().is_success() {
            return Err(format!("mfapi fund lookup failed: {}", res.status()));
        }

        res.json::<serde_json::Value>()
            .await
            .map_err(|e| e.to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchItem {
    #[serde(rename = "schemeCode")]
    pub scheme_code: i64,

    #[serde(rename = "schemeName")]
    pub scheme_name: String,
}
