use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use rand::Rng;
use serde::Serialize;
use tracing::{info, warn};

use crate::{
    application::services::{DeliveryGateway, LedgerReader, MessageRenderer},
    config::DispatchConfig,
    domain::{
        catalog::TemplateCatalog,
        errors::DomainError,
        models::{DispatchStats, PeriodCode, RowOutcome},
    },
};

/// Result of dispatching one period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodRun {
    pub period: PeriodCode,
    pub description: &'static str,
    pub target_date: NaiveDate,
    pub stats: DispatchStats,
}

/// Sends one period's messages, strictly one after another, pausing a random
/// interval between sends so the gateway never sees a burst.
pub struct PeriodDispatcher {
    ledger: LedgerReader,
    gateway: Arc<dyn DeliveryGateway>,
    catalog: TemplateCatalog,
    renderer: MessageRenderer,
    config: DispatchConfig,
}

impl PeriodDispatcher {
    pub fn new(
        ledger: LedgerReader,
        gateway: Arc<dyn DeliveryGateway>,
        config: DispatchConfig,
    ) -> Self {
        Self {
            ledger,
            gateway,
            catalog: TemplateCatalog::new(),
            renderer: MessageRenderer::new(),
            config,
        }
    }

    pub fn catalog(&self) -> &TemplateCatalog {
        &self.catalog
    }

    pub async fn dispatch(&self, period: PeriodCode, today: NaiveDate) -> Result<PeriodRun, DomainError> {
        let code = period.to_string();
        let template = self.catalog.get_message(&code)?;
        let description = self.catalog.get_description(&code);
        let target_date = period.target_date(today)?;

        info!(period = %code, description, %target_date, "processing period");

        let mut candidates = self.ledger.find_due_on(target_date).await;
        if candidates.is_empty() {
            info!(period = %code, "no invoices to notify");
        }

        if let Some(cap) = self.config.max_messages {
            if candidates.len() > cap {
                info!(period = %code, found = candidates.len(), cap, "capping messages for period");
                candidates.truncate(cap);
            }
        }

        let total = candidates.len();
        let mut outcomes = Vec::with_capacity(total);
        for (index, invoice) in candidates.iter().enumerate() {
            let position = index + 1;

            if invoice.is_settled() {
                info!(invoice_id = %invoice.id, customer = %invoice.customer_name, "invoice already settled, skipping");
                outcomes.push(RowOutcome::Skipped);
                continue;
            }

            info!(period = %code, position, total, customer = %invoice.customer_name, "sending");
            let message = self.renderer.render(template, invoice);
            let outcome = match self.gateway.send(invoice, &message).await {
                Ok(()) => RowOutcome::Sent,
                Err(err) => {
                    warn!(invoice_id = %invoice.id, error = %err, "delivery failed");
                    RowOutcome::Failed
                }
            };
            outcomes.push(outcome);

            if position < total {
                let pause = self.next_pause();
                info!(seconds = %format!("{:.1}", pause.as_secs_f64()), "waiting before next send");
                tokio::time::sleep(pause).await;
            }
        }

        let stats = DispatchStats::from_outcomes(&outcomes);
        info!(
            period = %code,
            sent = stats.sent(),
            errors = stats.errors(),
            skipped = stats.skipped(),
            "period summary"
        );

        Ok(PeriodRun {
            period,
            description,
            target_date,
            stats,
        })
    }

    /// Uniform in `[min_delay, max_delay]`.
    fn next_pause(&self) -> Duration {
        let (min, max) = (self.config.min_delay, self.config.max_delay);
        if max <= min {
            return min;
        }
        let secs = rand::rng().random_range(min.as_secs_f64()..=max.as_secs_f64());
        Duration::from_secs_f64(secs)
    }
}
