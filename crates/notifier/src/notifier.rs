//! kwtSMS delivery.
//!
//! Renders the status template for an order and POSTs it form-encoded to the
//! kwtSMS send endpoint. The response body is never parsed: the call is
//! fire-and-forget, and only transport failures (connection, TLS) count as
//! errors. Those are logged once and swallowed by [`Notifier::notify`].

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Serialize;
use thiserror::Error;

use kwt_common::types::{OrderEvent, OutboundMessage};

use crate::settings::NotificationConfig;
use crate::template::{normalize_recipient, render};

/// kwtSMS language code for English.
const LANG_ENGLISH: u8 = 1;

/// Errors raised while sending an SMS.
#[derive(Debug, Error)]
pub enum SendError {
    #[error("SMS client setup error: {0}")]
    Client(#[source] reqwest::Error),

    #[error("SMS transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Outcome of a notification attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Delivery {
    /// The API answered; `status` is the HTTP status, recorded but not interpreted
    Sent { status: u16 },
    /// The request never completed
    TransportFailed,
}

/// Form body accepted by the kwtSMS send endpoint.
///
/// Field order matches the API documentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SmsPayload<'a> {
    pub username: &'a str,
    pub password: &'a str,
    pub sender: &'a str,
    pub mobile: &'a str,
    pub lang: u8,
    /// 0 = live send, 1 = sandbox
    pub test: u8,
    pub message: &'a str,
}

impl<'a> SmsPayload<'a> {
    pub fn new(message: &'a OutboundMessage, config: &'a NotificationConfig) -> Self {
        Self {
            username: &config.api_username,
            password: &config.api_password,
            sender: &config.sender_id,
            mobile: &message.recipient,
            lang: LANG_ENGLISH,
            test: u8::from(config.test_mode),
            message: &message.body,
        }
    }
}

/// HTTP client for the kwtSMS send endpoint.
#[derive(Debug, Clone)]
pub struct Notifier {
    client: Client,
    endpoint: String,
}

impl Notifier {
    /// Build a notifier posting to `endpoint`.
    ///
    /// TLS certificate verification stays enabled. With `timeout = None` the
    /// client's default (no timeout) applies.
    pub fn new(endpoint: impl Into<String>, timeout: Option<Duration>) -> Result<Self, SendError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build().map_err(SendError::Client)?,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Render the outbound message for an order event.
    pub fn compose(event: &OrderEvent, config: &NotificationConfig) -> OutboundMessage {
        let template = config.template_for(event.status);
        OutboundMessage {
            recipient: normalize_recipient(&event.order.billing_phone).to_string(),
            body: render(template, &event.order.order_number),
        }
    }

    /// Send one message, returning the HTTP status of the API response.
    pub async fn try_send(
        &self,
        message: &OutboundMessage,
        config: &NotificationConfig,
    ) -> Result<StatusCode, SendError> {
        let payload = SmsPayload::new(message, config);

        let response = self
            .client
            .post(&self.endpoint)
            .form(&payload)
            .send()
            .await?;

        Ok(response.status())
    }

    /// Compose and send the SMS for `event`.
    ///
    /// Transport errors are logged as a warning and reported as
    /// [`Delivery::TransportFailed`]; they never propagate.
    pub async fn notify(&self, event: &OrderEvent, config: &NotificationConfig) -> Delivery {
        let message = Self::compose(event, config);

        match self.try_send(&message, config).await {
            Ok(status) => {
                tracing::debug!(
                    order_number = %event.order.order_number,
                    status = %event.status,
                    recipient = %message.recipient,
                    http_status = status.as_u16(),
                    test_mode = config.test_mode,
                    "SMS submitted"
                );
                Delivery::Sent {
                    status: status.as_u16(),
                }
            }
            Err(e) => {
                tracing::warn!(
                    order_number = %event.order.order_number,
                    status = %event.status,
                    error = %e,
                    "SMS sending error"
                );
                Delivery::TransportFailed
            }
        }
    }
}
