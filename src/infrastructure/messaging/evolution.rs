use async_trait::async_trait;
use rand::Rng;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::{
    application::services::{DeliveryError, DeliveryGateway},
    config::GatewayConfig,
    domain::{models::InvoiceRow, value_objects::PhoneNumber},
};

/// WhatsApp delivery through an Evolution API instance.
pub struct EvolutionClient {
    http: Client,
    send_url: String,
    api_key: String,
}

impl EvolutionClient {
    pub fn new(config: &GatewayConfig) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .user_agent("dunning/evolution")
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            http,
            send_url: format!("{}/message/sendText/{}", config.base_url, config.instance),
            api_key: config.api_key.clone(),
        })
    }

    pub fn send_url(&self) -> &str {
        &self.send_url
    }
}

#[async_trait]
impl DeliveryGateway for EvolutionClient {
    async fn send(&self, invoice: &InvoiceRow, message: &str) -> Result<(), DeliveryError> {
        let Some(number) = PhoneNumber::parse(invoice.phone.as_deref().unwrap_or_default()) else {
            warn!(invoice_id = %invoice.id, customer = %invoice.customer_name, "invalid phone number");
            return Err(DeliveryError::InvalidPhone {
                invoice_id: invoice.id.clone(),
            });
        };

        let payload = SendTextRequest {
            number: number.as_str(),
            options: SendOptions {
                delay: typing_delay_ms(),
                presence: "composing",
                link_preview: true,
            },
            text: message,
        };

        let response = self
            .http
            .post(&self.send_url)
            .header("apikey", &self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|err| {
                let failure = classify(err);
                error!(customer = %invoice.customer_name, phone = %number, error = %failure, "failed to reach gateway");
                failure
            })?;

        let status = response.status();
        if status == StatusCode::OK || status == StatusCode::CREATED {
            info!(customer = %invoice.customer_name, phone = %number, "message sent");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        error!(
            customer = %invoice.customer_name,
            phone = %number,
            status = status.as_u16(),
            body = %body,
            "gateway rejected message"
        );
        Err(DeliveryError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

fn classify(err: reqwest::Error) -> DeliveryError {
    if err.is_timeout() {
        DeliveryError::Timeout
    } else {
        DeliveryError::Transport(err.to_string())
    }
}

/// Gateway-side "typing" pause, in milliseconds.
fn typing_delay_ms() -> u32 {
    rand::rng().random_range(100..=300)
}

#[derive(Debug, Serialize)]
struct SendTextRequest<'a> {
    number: &'a str,
    options: SendOptions,
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendOptions {
    delay: u32,
    presence: &'static str,
    link_preview: bool,
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn builds_send_url_from_config() {
        let client = EvolutionClient::new(&GatewayConfig {
            base_url: "https://evo.example.com".to_string(),
            instance: "billing".to_string(),
            api_key: "k".to_string(),
            timeout: Duration::from_secs(30),
        })
        .unwrap();
        assert_eq!(client.send_url(), "https://evo.example.com/message/sendText/billing");
    }

    #[test]
    fn payload_matches_gateway_contract() {
        let payload = SendTextRequest {
            number: "5511999998888",
            options: SendOptions {
                delay: 150,
                presence: "composing",
                link_preview: true,
            },
            text: "hello",
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "number": "5511999998888",
                "options": {"delay": 150, "presence": "composing", "linkPreview": true},
                "text": "hello"
            })
        );
    }

    #[test]
    fn typing_delay_stays_in_range() {
        for _ in 0..200 {
            let delay = typing_delay_ms();
            assert!((100..=300).contains(&delay));
        }
    }
}
