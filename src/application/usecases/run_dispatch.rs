use chrono::NaiveDate;
use serde::Serialize;
use tracing::{error, info};

use crate::{
    application::handlers::period_dispatcher::{PeriodDispatcher, PeriodRun},
    domain::{
        catalog::TemplateCatalog,
        errors::DomainError,
        models::{DispatchStats, PeriodCode},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    AllPeriods,
    Single(PeriodCode),
}

impl RunMode {
    /// Resolves an optional period code against the catalog. Meant to run
    /// before any connection is opened.
    pub fn from_code(code: Option<&str>) -> Result<Self, DomainError> {
        let Some(code) = code else {
            return Ok(RunMode::AllPeriods);
        };
        let catalog = TemplateCatalog::new();
        catalog
            .get(code)
            .map(|template| RunMode::Single(template.period))
            .ok_or_else(|| DomainError::NotFound(code.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PeriodOutcome {
    Completed(PeriodRun),
    Failed { period: PeriodCode, error: String },
}

/// Per-period results of one run plus totals over the completed periods.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub periods: Vec<PeriodOutcome>,
    pub totals: DispatchStats,
}

impl RunSummary {
    fn record(&mut self, outcome: PeriodOutcome) {
        if let PeriodOutcome::Completed(run) = &outcome {
            self.totals = self.totals + run.stats;
        }
        self.periods.push(outcome);
    }

    pub fn failed_periods(&self) -> usize {
        self.periods
            .iter()
            .filter(|p| matches!(p, PeriodOutcome::Failed { .. }))
            .count()
    }
}

pub struct RunDispatchUseCase {
    dispatcher: PeriodDispatcher,
}

impl RunDispatchUseCase {
    pub fn new(dispatcher: PeriodDispatcher) -> Self {
        Self { dispatcher }
    }

    /// Periods run one after another; a failing period is recorded and the
    /// run moves on to the next.
    pub async fn execute(&self, mode: RunMode, today: NaiveDate) -> RunSummary {
        let periods = match mode {
            RunMode::AllPeriods => self.dispatcher.catalog().list_periods(),
            RunMode::Single(period) => vec![period],
        };

        let mut summary = RunSummary::default();
        for period in periods {
            let outcome = match self.dispatcher.dispatch(period, today).await {
                Ok(run) => PeriodOutcome::Completed(run),
                Err(err) => {
                    error!(%period, error = %err, "period failed");
                    PeriodOutcome::Failed {
                        period,
                        error: err.to_string(),
                    }
                }
            };
            summary.record(outcome);
        }

        info!(
            sent = summary.totals.sent(),
            errors = summary.totals.errors(),
            skipped = summary.totals.skipped(),
            failed_periods = summary.failed_periods(),
            "run finished"
        );
        summary
    }
}
