use anyhow::Result;
use async_trait::async_trait;
use reqwest::Url;
use tracing::debug;

use super::RestConfig;
use crate::error::SourceError;
use crate::fetch::auth::ApiKey;
use crate::fetch::{BasicClient, HttpClient, get_json};
use crate::parser::PingRow;
use crate::services::sources::{PingSource, ViewRow, ViewSource};

/// Queries tables and views through the `/rest/v1` PostgREST API.
pub struct RestClient<C> {
    http: C,
    base_url: Url,
    table: String,
}

impl RestClient<ApiKey<ApiKey<BasicClient>>> {
    /// Builds a client that sends the key both as `apikey` and as a bearer
    /// token, which is what the hosted gateway expects.
    pub fn from_config(config: &RestConfig) -> Result<Self> {
        let basic = BasicClient::new(config.timeout)?;
        let http = ApiKey::new(
            ApiKey::bearer(basic, &config.api_key)?,
            "apikey",
            &config.api_key,
        )?;
        Ok(Self::new(http, config.base_url.clone(), &config.table))
    }
}

impl<C: HttpClient> RestClient<C> {
    pub fn new(http: C, base_url: Url, table: &str) -> Self {
        Self {
            http,
            base_url,
            table: table.to_string(),
        }
    }

    fn endpoint(&self, relation: &str, params: &[(&str, String)]) -> Result<Url, SourceError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| SourceError::Unavailable(format!("unusable base URL {}", self.base_url)))?
            .pop_if_empty()
            .extend(["rest", "v1", relation]);
        url.query_pairs_mut()
            .extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())));
        Ok(url)
    }
}

#[async_trait]
impl<C: HttpClient> PingSource for RestClient<C> {
    #[tracing::instrument(skip(self), fields(table = %self.table))]
    async fn query_raw(&self, limit: usize) -> Result<Vec<PingRow>, SourceError> {
        let url = self.endpoint(
            &self.table,
            &[
                ("select", "*".to_string()),
                ("order", "created_at.desc".to_string()),
                ("limit", limit.to_string()),
            ],
        )?;
        let rows: Vec<PingRow> = get_json(&self.http, url).await?;
        debug!(rows = rows.len(), "Raw pings fetched");
        Ok(rows)
    }
}

#[async_trait]
impl<C: HttpClient> ViewSource for RestClient<C> {
    #[tracing::instrument(skip(self))]
    async fn query_view(&self, view: &str, limit: usize) -> Result<Vec<ViewRow>, SourceError> {
        let url = self.endpoint(
            view,
            &[("select", "*".to_string()), ("limit", limit.to_string())],
        )?;
        let rows: Vec<ViewRow> = get_json(&self.http, url).await?;
        debug!(rows = rows.len(), "View rows fetched");
        Ok(rows)
    }
}
