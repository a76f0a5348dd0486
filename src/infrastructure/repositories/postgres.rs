use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{ConnectOptions, FromRow, Pool, Postgres};
use thiserror::Error;
use tracing::{info, log::LevelFilter};

use crate::{
    config::DatabaseConfig,
    domain::{
        models::{InvoiceRow, SETTLED_STATUS},
        repositories::InvoiceRepository,
    },
};

pub type PgPool = Pool<Postgres>;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("could not connect to ledger at {host}:{port}/{database}: {source}")]
    Connection {
        host: String,
        port: u16,
        database: String,
        #[source]
        source: sqlx::Error,
    },
}

const DUE_ON_QUERY: &str = r#"
    SELECT id::text AS id,
           COALESCE(cliente_nome, '') AS customer_name,
           telefone AS phone,
           data_vencimento::date AS due_date,
           COALESCE(total, 0)::numeric AS total,
           link_pagamento AS payment_link,
           status::text AS status,
           nao_pago::numeric AS unpaid,
           (pago <> 0) AS paid
    FROM caz_receber
    WHERE data_vencimento = $1
      AND telefone IS NOT NULL
      AND telefone != ''
      AND pago = 0
      AND nao_pago > 0
    ORDER BY total DESC
"#;

const OVERDUE_QUERY: &str = r#"
    SELECT id::text AS id,
           COALESCE(cliente_nome, '') AS customer_name,
           telefone AS phone,
           data_vencimento::date AS due_date,
           COALESCE(total, 0)::numeric AS total,
           link_pagamento AS payment_link,
           status::text AS status,
           nao_pago::numeric AS unpaid,
           (pago <> 0) AS paid
    FROM caz_receber
    WHERE data_vencimento <= $1
      AND telefone IS NOT NULL
      AND telefone != ''
      AND pago = 0
      AND nao_pago > 0
      AND status::text IS DISTINCT FROM $2
    ORDER BY data_vencimento ASC, total DESC
"#;

/// One ledger connection held for the lifetime of a run.
pub struct PostgresLedger {
    pool: PgPool,
}

impl PostgresLedger {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, LedgerError> {
        let options = PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .database(&config.name)
            .username(&config.user)
            .password(&config.password)
            .log_slow_statements(LevelFilter::Warn, Duration::from_secs(5));

        let pool = PgPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(Duration::from_secs(10))
            .connect_with(options)
            .await
            .map_err(|source| LedgerError::Connection {
                host: config.host.clone(),
                port: config.port,
                database: config.name.clone(),
                source,
            })?;

        info!(host = %config.host, database = %config.name, "ledger connection established");
        Ok(Self { pool })
    }

    pub fn repository(&self) -> Arc<dyn InvoiceRepository> {
        PostgresInvoiceRepository::new(self.pool.clone())
    }

    pub async fn close(self) {
        self.pool.close().await;
        info!("ledger connection closed");
    }
}

/// Opens the ledger, hands its repository to `work` and closes the connection
/// whatever `work` returns.
pub async fn with_ledger<F, Fut, T>(config: &DatabaseConfig, work: F) -> Result<T, LedgerError>
where
    F: FnOnce(Arc<dyn InvoiceRepository>) -> Fut,
    Fut: Future<Output = T>,
{
    let ledger = PostgresLedger::connect(config).await?;
    let output = work(ledger.repository()).await;
    ledger.close().await;
    Ok(output)
}

#[derive(Clone)]
pub struct PostgresInvoiceRepository {
    pool: PgPool,
}

impl PostgresInvoiceRepository {
    pub fn new(pool: PgPool) -> Arc<Self> {
        Arc::new(Self { pool })
    }
}

#[async_trait]
impl InvoiceRepository for PostgresInvoiceRepository {
    async fn find_due_on(&self, due_date: NaiveDate) -> anyhow::Result<Vec<InvoiceRow>> {
        let rows = sqlx::query_as::<_, InvoiceRecord>(DUE_ON_QUERY)
            .bind(due_date)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(InvoiceRow::from).collect())
    }

    async fn find_overdue(&self, cutoff: NaiveDate) -> anyhow::Result<Vec<InvoiceRow>> {
        let rows = sqlx::query_as::<_, InvoiceRecord>(OVERDUE_QUERY)
            .bind(cutoff)
            .bind(SETTLED_STATUS)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(InvoiceRow::from).collect())
    }
}

#[derive(FromRow)]
struct InvoiceRecord {
    id: String,
    customer_name: String,
    phone: Option<String>,
    due_date: NaiveDate,
    total: Decimal,
    payment_link: Option<String>,
    status: Option<String>,
    unpaid: Decimal,
    paid: bool,
}

impl From<InvoiceRecord> for InvoiceRow {
    fn from(value: InvoiceRecord) -> Self {
        Self {
            id: value.id,
            customer_name: value.customer_name,
            phone: value.phone,
            due_date: value.due_date,
            total: value.total,
            payment_link: value.payment_link,
            status: value.status,
            unpaid: value.unpaid,
            paid: value.paid,
        }
    }
}
