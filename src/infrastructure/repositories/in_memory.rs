use std::cmp::Reverse;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;

use crate::domain::{models::InvoiceRow, repositories::InvoiceRepository};

/// Ledger fixture applying the same filters and ordering as the Postgres queries.
#[derive(Default)]
pub struct InMemoryInvoiceRepository {
    rows: Arc<RwLock<Vec<InvoiceRow>>>,
}

impl InMemoryInvoiceRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: Vec<InvoiceRow>) -> Self {
        Self {
            rows: Arc::new(RwLock::new(rows)),
        }
    }

    pub async fn insert(&self, row: InvoiceRow) {
        self.rows.write().await.push(row);
    }

    /// Simulates the ledger changing a row's status behind our back.
    pub async fn update_status(&self, id: &str, status: Option<String>) {
        let mut rows = self.rows.write().await;
        if let Some(row) = rows.iter_mut().find(|r| r.id == id) {
            row.status = status;
        }
    }
}

#[async_trait]
impl InvoiceRepository for InMemoryInvoiceRepository {
    async fn find_due_on(&self, due_date: NaiveDate) -> anyhow::Result<Vec<InvoiceRow>> {
        let rows = self.rows.read().await;
        let mut found: Vec<InvoiceRow> = rows
            .iter()
            .filter(|r| r.is_candidate() && r.due_date == due_date)
            .cloned()
            .collect();
        found.sort_by_key(|r| Reverse(r.total));
        Ok(found)
    }

    async fn find_overdue(&self, cutoff: NaiveDate) -> anyhow::Result<Vec<InvoiceRow>> {
        let rows = self.rows.read().await;
        let mut found: Vec<InvoiceRow> = rows
            .iter()
            .filter(|r| r.is_candidate() && !r.is_settled() && r.due_date <= cutoff)
            .cloned()
            .collect();
        found.sort_by_key(|r| (r.due_date, Reverse(r.total)));
        Ok(found)
    }
}
