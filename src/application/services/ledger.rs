use std::sync::Arc;

use chrono::{Days, NaiveDate};
use tracing::{error, info};

use crate::domain::{models::InvoiceRow, repositories::InvoiceRepository};

/// Fail-soft front of the ledger: query errors are logged and read as "no
/// candidates", so one bad query never aborts a run.
#[derive(Clone)]
pub struct LedgerReader {
    repo: Arc<dyn InvoiceRepository>,
}

impl LedgerReader {
    pub fn new(repo: Arc<dyn InvoiceRepository>) -> Self {
        Self { repo }
    }

    pub async fn find_due_on(&self, due_date: NaiveDate) -> Vec<InvoiceRow> {
        match self.repo.find_due_on(due_date).await {
            Ok(rows) => {
                info!(%due_date, count = rows.len(), "loaded invoices due on date");
                rows
            }
            Err(err) => {
                error!(%due_date, error = %err, "failed to load invoices due on date");
                Vec::new()
            }
        }
    }

    pub async fn find_overdue(&self, min_days_late: u32, today: NaiveDate) -> Vec<InvoiceRow> {
        let Some(cutoff) = today.checked_sub_days(Days::new(min_days_late.into())) else {
            error!(%today, min_days_late, "overdue cutoff out of range");
            return Vec::new();
        };
        match self.repo.find_overdue(cutoff).await {
            Ok(rows) => {
                info!(%cutoff, min_days_late, count = rows.len(), "loaded overdue invoices");
                rows
            }
            Err(err) => {
                error!(%cutoff, min_days_late, error = %err, "failed to load overdue invoices");
                Vec::new()
            }
        }
    }
}
