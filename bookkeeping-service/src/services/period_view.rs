//! The operator's selected period and its latest summary.
//!
//! Each selection starts a fetch tied to a fresh cancellation token and
//! cancels the token of the selection before it. A fetch whose token was
//! cancelled never replaces the current snapshot, so a slow response for an
//! old period cannot overwrite a newer one.

use crate::period::Month;
use crate::services::summary::{MonthSummary, QuarterSummary, SummaryService};
use serde::Deserialize;
use service_core::error::AppError;
use tokio::sync::{Mutex, RwLock};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", content = "start", rename_all = "snake_case")]
pub enum Period {
    Month(Month),
    Quarter(Month),
}

#[derive(Debug, Clone, PartialEq)]
pub enum PeriodSnapshot {
    Month(MonthSummary),
    Quarter(QuarterSummary),
}

impl PeriodSnapshot {
    pub fn period(&self) -> Period {
        match self {
            PeriodSnapshot::Month(summary) => Period::Month(summary.month),
            PeriodSnapshot::Quarter(summary) => Period::Quarter(summary.start),
        }
    }
}

pub struct PeriodView {
    summaries: SummaryService,
    /// Latest requested period and the token of its fetch.
    inflight: Mutex<Option<(Period, CancellationToken)>>,
    current: RwLock<Option<PeriodSnapshot>>,
}

impl PeriodView {
    pub fn new(summaries: SummaryService) -> Self {
        Self {
            summaries,
            inflight: Mutex::new(None),
            current: RwLock::new(None),
        }
    }

    /// Selects `period` and fetches its summary.
    ///
    /// Returns `None` when a later selection superseded this one before it
    /// completed; the current snapshot is then left to the later selection.
    pub async fn select(&self, period: Period) -> Result<Option<PeriodSnapshot>, AppError> {
        let token = CancellationToken::new();
        if let Some((_, previous)) = self.inflight.lock().await.replace((period, token.clone())) {
            previous.cancel();
        }

        let fetch = async {
            match period {
                Period::Month(month) => self
                    .summaries
                    .month_summary(month)
                    .await
                    .map(PeriodSnapshot::Month),
                Period::Quarter(start) => self
                    .summaries
                    .quarter_summary(start)
                    .await
                    .map(PeriodSnapshot::Quarter),
            }
        };

        let snapshot = tokio::select! {
            _ = token.cancelled() => {
                tracing::debug!(?period, "Selection superseded, discarding fetch");
                return Ok(None);
            }
            result = fetch => result?,
        };

        let mut current = self.current.write().await;
        if token.is_cancelled() {
            tracing::debug!(?period, "Selection superseded, discarding response");
            return Ok(None);
        }
        *current = Some(snapshot.clone());
        Ok(Some(snapshot))
    }

    /// Re-fetches the latest requested period after a write.
    ///
    /// A selection still in flight is restarted for the same period, so the
    /// refresh never switches the view back to an older one.
    pub async fn refresh(&self) -> Result<Option<PeriodSnapshot>, AppError> {
        let period = self.inflight.lock().await.as_ref().map(|(period, _)| *period);
        match period {
            Some(period) => self.select(period).await,
            None => Ok(None),
        }
    }

    pub async fn current(&self) -> Option<PeriodSnapshot> {
        self.current.read().await.clone()
    }
}
