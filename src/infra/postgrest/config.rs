use anyhow::{Context, Result, bail};
use reqwest::Url;
use std::time::Duration;

pub const DEFAULT_TABLE: &str = "realtime_subway_positions";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the hosted database's REST endpoint.
#[derive(Debug, Clone)]
pub struct RestConfig {
    pub base_url: Url,
    pub api_key: String,
    /// Table holding raw position pings.
    pub table: String,
    pub timeout: Duration,
}

impl RestConfig {
    /// Reads `SUPABASE_URL`, `SUPABASE_KEY` and the optional `PINGS_TABLE`
    /// and `HTTP_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let raw_url = lookup("SUPABASE_URL").context("SUPABASE_URL must be set")?;
        let base_url = Url::parse(&raw_url).with_context(|| format!("invalid SUPABASE_URL '{raw_url}'"))?;
        if base_url.cannot_be_a_base() {
            bail!("SUPABASE_URL '{raw_url}' cannot be used as a base URL");
        }

        let api_key = lookup("SUPABASE_KEY").context("SUPABASE_KEY must be set")?;
        let table = lookup("PINGS_TABLE").unwrap_or_else(|| DEFAULT_TABLE.to_string());
        let timeout_secs = match lookup("HTTP_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("invalid HTTP_TIMEOUT_SECS '{raw}'"))?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            base_url,
            api_key,
            table,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}
