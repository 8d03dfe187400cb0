use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::config::StoreSettings;
use crate::error::{AppError, Result};
use crate::models::RawRecord;

use super::{Query, RecordStore};

const USER_AGENT: &str = concat!("diary-reader/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Client for a PostgREST endpoint (Supabase's `/rest/v1`).
pub struct RestStore {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl RestStore {
    pub fn new(settings: &StoreSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            base_url: settings.base_url.clone(),
            api_key: settings.api_key.clone(),
        })
    }

    fn collection_url(&self, collection: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        let base = self.base_url.as_str();
        url.path_segments_mut()
            .map_err(|_| AppError::Config(format!("store url cannot be a base: {base}")))?
            .pop_if_empty()
            .extend(["rest", "v1", collection]);
        Ok(url)
    }
}

impl RecordStore for RestStore {
    async fn query(&self, collection: &str, query: &Query) -> Result<Vec<RawRecord>> {
        let url = self.collection_url(collection)?;

        let response = self
            .client
            .get(url)
            .query(&query.to_params())
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| AppError::query(collection, e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::query(collection, e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.message)
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| {
                    if body.trim().is_empty() {
                        format!("HTTP {status}")
                    } else {
                        body.clone()
                    }
                });
            tracing::warn!("Query on {} failed with {}: {}", collection, status, message);
            return Err(AppError::query(collection, message));
        }

        serde_json::from_str(&body)
            .map_err(|e| AppError::query(collection, format!("malformed response: {e}")))
    }
}
