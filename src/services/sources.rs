//! Traits for the raw ping source and the pre-aggregation source.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::error::SourceError;
use crate::parser::PingRow;

/// One row of a pre-aggregated view. Field names are view-specific.
pub type ViewRow = Map<String, Value>;

/// Provides the most recent raw ping rows.
#[async_trait]
pub trait PingSource: Send + Sync {
    /// Returns up to `limit` rows ordered by observation time, newest first.
    async fn query_raw(&self, limit: usize) -> Result<Vec<PingRow>, SourceError>;
}

/// Provides server-side pre-aggregated metric views.
#[async_trait]
pub trait ViewSource: Send + Sync {
    /// Returns up to `limit` rows of the named view.
    ///
    /// A view that does not exist is reported as an error like any other
    /// failure; callers fall back to local analysis.
    async fn query_view(&self, view: &str, limit: usize) -> Result<Vec<ViewRow>, SourceError>;
}

#[async_trait]
impl<T: PingSource + ?Sized> PingSource for Arc<T> {
    async fn query_raw(&self, limit: usize) -> Result<Vec<PingRow>, SourceError> {
        (**self).query_raw(limit).await
    }
}

#[async_trait]
impl<T: ViewSource + ?Sized> ViewSource for Arc<T> {
    async fn query_view(&self, view: &str, limit: usize) -> Result<Vec<ViewRow>, SourceError> {
        (**self).query_view(view, limit).await
    }
}
