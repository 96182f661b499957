use serde::Serialize;
use tracing::{debug, info};

use crate::analyzers::congestion::express_congestion;
use crate::analyzers::dwell::dwell_times;
use crate::analyzers::interval::interval_regularity;
use crate::analyzers::tables;
use crate::analyzers::turnaround::turnaround_waits;
use crate::analyzers::types::Table;
use crate::error::SourceError;
use crate::services::sources::{PingSource, ViewSource, ViewRow};
use crate::snapshot::{PingSnapshotCache, Snapshot};

/// Rows requested from each pre-aggregated view.
pub const VIEW_LIMIT: usize = 10;

/// The four health metrics, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    IntervalRegularity,
    DwellTime,
    Turnaround,
    ExpressCongestion,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::IntervalRegularity,
        Metric::DwellTime,
        Metric::Turnaround,
        Metric::ExpressCongestion,
    ];

    /// Name of the server-side view that pre-computes this metric.
    pub fn view_name(self) -> &'static str {
        match self {
            Metric::IntervalRegularity => "view_interval_regularity",
            Metric::DwellTime => "view_dwell_time",
            Metric::Turnaround => "view_turnaround_monitoring",
            Metric::ExpressCongestion => "view_express_local_congestion",
        }
    }

    /// Snapshot size requested when this metric falls back to local analysis.
    pub fn snapshot_size(self) -> usize {
        match self {
            Metric::ExpressCongestion => 1000,
            _ => 1500,
        }
    }

    pub fn view_table(self, rows: &[ViewRow]) -> Result<Table, SourceError> {
        match self {
            Metric::IntervalRegularity => tables::interval_view_table(rows),
            Metric::DwellTime => tables::dwell_view_table(rows),
            Metric::Turnaround => tables::turnaround_view_table(rows),
            Metric::ExpressCongestion => tables::congestion_view_table(rows),
        }
    }

    pub fn compute_local(self, snapshot: &Snapshot) -> Table {
        match self {
            Metric::IntervalRegularity => tables::interval_table(&interval_regularity(snapshot)),
            Metric::DwellTime => tables::dwell_table(&dwell_times(snapshot)),
            Metric::Turnaround => tables::turnaround_table(&turnaround_waits(snapshot)),
            Metric::ExpressCongestion => tables::congestion_table(&express_congestion(snapshot)),
        }
    }
}

/// Where a section's rows came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    View,
    Local,
}

/// Result of one metric within a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub metric: Metric,
    pub provenance: Provenance,
    pub table: Table,
}

/// Sequences the four analyses for one batch run.
///
/// Each metric is first requested from the pre-aggregation source; when that
/// fails the metric is computed from the shared ping snapshot instead.
pub struct AnalysisRunner {
    views: Option<Box<dyn ViewSource>>,
    cache: PingSnapshotCache,
    snapshot_size: Option<usize>,
}

impl AnalysisRunner {
    pub fn new(views: Option<Box<dyn ViewSource>>, pings: Box<dyn PingSource>) -> Self {
        Self {
            views,
            cache: PingSnapshotCache::new(pings),
            snapshot_size: None,
        }
    }

    /// Overrides the per-metric snapshot size.
    pub fn with_snapshot_size(mut self, size: Option<usize>) -> Self {
        self.snapshot_size = size;
        self
    }

    /// Runs all four metrics. Never fails; missing data renders as empty tables.
    #[tracing::instrument(skip(self))]
    pub async fn run_all(&mut self) -> Vec<Section> {
        info!("Analysis started");
        let mut sections = Vec::with_capacity(Metric::ALL.len());
        for metric in Metric::ALL {
            sections.push(self.run_metric(metric).await);
        }
        info!(sections = sections.len(), "Analysis finished");
        sections
    }

    pub async fn run_metric(&mut self, metric: Metric) -> Section {
        match self.try_remote(metric).await {
            Ok(table) => {
                debug!(?metric, rows = table.rows.len(), "Using pre-aggregated view");
                Section {
                    metric,
                    provenance: Provenance::View,
                    table,
                }
            }
            Err(e) => {
                if self.views.is_some() {
                    info!(
                        view = metric.view_name(),
                        error = %e,
                        "View unavailable, computing locally"
                    );
                }
                let limit = self.snapshot_size.unwrap_or(metric.snapshot_size());
                let snapshot = self.cache.snapshot(limit).await;
                Section {
                    metric,
                    provenance: Provenance::Local,
                    table: metric.compute_local(snapshot),
                }
            }
        }
    }

    async fn try_remote(&self, metric: Metric) -> Result<Table, SourceError> {
        let views = self
            .views
            .as_ref()
            .ok_or_else(|| SourceError::Unavailable("no pre-aggregation source".to_string()))?;
        let rows = views.query_view(metric.view_name(), VIEW_LIMIT).await?;
        metric.view_table(&rows)
    }
}
