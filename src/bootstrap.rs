use std::sync::Arc;

use chrono::NaiveDate;
use thiserror::Error;
use tracing::info;

use crate::{
    application::{
        handlers::PeriodDispatcher,
        services::{DeliveryGateway, LedgerReader},
        usecases::{ListOverdueUseCase, RunDispatchUseCase, RunMode, RunSummary},
    },
    config::{Config, DatabaseConfig, DispatchConfig, GatewayConfig},
    domain::{models::InvoiceRow, repositories::InvoiceRepository},
    infrastructure::{
        messaging::{DryRunGateway, EvolutionClient},
        repositories::{LedgerError, with_ledger},
    },
};

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("failed to build gateway client: {0}")]
    Gateway(#[from] reqwest::Error),
}

pub fn build_gateway(
    config: &GatewayConfig,
    dry_run: bool,
) -> Result<Arc<dyn DeliveryGateway>, reqwest::Error> {
    if dry_run {
        info!("dry run: messages will be logged, not sent");
        return Ok(Arc::new(DryRunGateway::new()));
    }
    let client = EvolutionClient::new(config)?;
    info!(url = client.send_url(), "gateway client ready");
    Ok(Arc::new(client))
}

/// Wires a ledger and a gateway into a run. Shared by the binary and the
/// integration tests.
pub async fn dispatch_with(
    repo: Arc<dyn InvoiceRepository>,
    gateway: Arc<dyn DeliveryGateway>,
    config: DispatchConfig,
    mode: RunMode,
    today: NaiveDate,
) -> RunSummary {
    let dispatcher = PeriodDispatcher::new(LedgerReader::new(repo), gateway, config);
    RunDispatchUseCase::new(dispatcher).execute(mode, today).await
}

/// Full dispatch against Postgres. The connection lives exactly as long as
/// the run.
pub async fn run_dispatch(
    config: &Config,
    mode: RunMode,
    dry_run: bool,
    today: NaiveDate,
) -> Result<RunSummary, BootstrapError> {
    let gateway = build_gateway(&config.gateway, dry_run)?;
    let dispatch = config.dispatch.clone();
    let summary = with_ledger(&config.database, |repo| {
        dispatch_with(repo, gateway, dispatch, mode, today)
    })
    .await?;
    Ok(summary)
}

pub async fn list_overdue(
    config: &DatabaseConfig,
    min_days_late: u32,
    today: NaiveDate,
) -> Result<Vec<InvoiceRow>, LedgerError> {
    with_ledger(config, |repo| async move {
        ListOverdueUseCase::new(LedgerReader::new(repo))
            .execute(min_days_late, today)
            .await
    })
    .await
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn gateway_config() -> GatewayConfig {
        GatewayConfig {
            base_url: "https://evo.example.com".to_string(),
            instance: "turbo".to_string(),
            api_key: "secret".to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    #[tokio::test]
    async fn dry_run_gateway_is_used_when_requested() {
        use crate::infrastructure::repositories::InMemoryInvoiceRepository;

        let gateway = build_gateway(&gateway_config(), true).unwrap();
        let summary = dispatch_with(
            Arc::new(InMemoryInvoiceRepository::new()),
            gateway,
            DispatchConfig::default(),
            RunMode::AllPeriods,
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
        )
        .await;
        assert_eq!(summary.periods.len(), 6);
        assert_eq!(summary.totals.total_processed(), 0);
    }

    #[test]
    fn live_gateway_builds_from_config() {
        assert!(build_gateway(&gateway_config(), false).is_ok());
    }
}
