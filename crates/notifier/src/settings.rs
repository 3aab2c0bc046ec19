//! Settings service: persisted SMS options.
//!
//! The admin surface writes flat key-value options into the `options` table;
//! each notification reloads them into an immutable [`NotificationConfig`].
//! No completeness validation happens here: missing credentials produce a
//! request the remote API rejects on its own.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use kwt_common::error::AppError;
use kwt_common::types::OrderStatus;

use crate::dispatch::{HANDLERS, handler_for};

pub const USERNAME_KEY: &str = "kwt_sms_username";
pub const PASSWORD_KEY: &str = "kwt_sms_password";
pub const SENDER_KEY: &str = "kwt_sms_sender";
pub const TEST_MODE_KEY: &str = "kwt_sms_test_mode";

/// Credentials and templates for one notification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationConfig {
    pub api_username: String,
    pub api_password: String,
    pub sender_id: String,
    /// Passed to the API as `test=1`; the remote side simulates delivery
    pub test_mode: bool,
    /// Admin-configured templates; absent statuses use the built-in default
    pub templates: HashMap<OrderStatus, String>,
}

impl NotificationConfig {
    /// Build a config from raw option rows.
    ///
    /// `kwt_sms_test_mode` is on only when stored as `"1"`. Empty templates
    /// count as unset.
    pub fn from_options(options: &HashMap<String, String>) -> Self {
        let get = |key: &str| options.get(key).cloned().unwrap_or_default();

        let templates = HANDLERS
            .iter()
            .filter_map(|handler| {
                options
                    .get(handler.option_key)
                    .filter(|t| !t.is_empty())
                    .map(|t| (handler.status, t.clone()))
            })
            .collect();

        Self {
            api_username: get(USERNAME_KEY),
            api_password: get(PASSWORD_KEY),
            sender_id: get(SENDER_KEY),
            test_mode: options.get(TEST_MODE_KEY).map(|v| v.trim()) == Some("1"),
            templates,
        }
    }

    /// Configured template for `status`, or its built-in default.
    pub fn template_for(&self, status: OrderStatus) -> &str {
        self.templates
            .get(&status)
            .map(String::as_str)
            .unwrap_or(handler_for(status).default_template)
    }
}

/// Partial settings update from the admin surface. `None` leaves a key untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSettingsParams {
    pub username: Option<String>,
    pub password: Option<String>,
    pub sender: Option<String>,
    pub test_mode: Option<bool>,
    pub pending_message: Option<String>,
    pub processing_message: Option<String>,
    pub completed_message: Option<String>,
}

impl UpdateSettingsParams {
    /// Option rows to upsert.
    pub fn to_options(&self) -> Vec<(&'static str, String)> {
        let template_key = |status| handler_for(status).option_key;

        [
            (USERNAME_KEY, self.username.clone()),
            (PASSWORD_KEY, self.password.clone()),
            (SENDER_KEY, self.sender.clone()),
            (
                TEST_MODE_KEY,
                self.test_mode.map(|on| if on { "1" } else { "0" }.to_string()),
            ),
            (
                template_key(OrderStatus::Pending),
                self.pending_message.clone(),
            ),
            (
                template_key(OrderStatus::Processing),
                self.processing_message.clone(),
            ),
            (
                template_key(OrderStatus::Completed),
                self.completed_message.clone(),
            ),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| (key, v)))
        .collect()
    }
}

/// Settings as shown to administrators. The password is never echoed back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettingsView {
    pub username: String,
    pub password_set: bool,
    pub sender: String,
    pub test_mode: bool,
    /// Effective template per status, defaults filled in
    pub templates: HashMap<OrderStatus, String>,
}

impl From<&NotificationConfig> for SettingsView {
    fn from(config: &NotificationConfig) -> Self {
        Self {
            username: config.api_username.clone(),
            password_set: !config.api_password.is_empty(),
            sender: config.sender_id.clone(),
            test_mode: config.test_mode,
            templates: OrderStatus::ALL
                .into_iter()
                .map(|status| (status, config.template_for(status).to_string()))
                .collect(),
        }
    }
}

/// Service layer over the `options` table.
pub struct SettingsService;

impl SettingsService {
    /// Load the current notification config.
    pub async fn load(pool: &PgPool) -> Result<NotificationConfig, AppError> {
        let rows: Vec<(String, String)> = sqlx::query_as(
            r#"
            SELECT option_name, option_value
            FROM options
            WHERE option_name LIKE 'kwt\_sms\_%'
            "#,
        )
        .fetch_all(pool)
        .await?;

        let options: HashMap<String, String> = rows.into_iter().collect();
        Ok(NotificationConfig::from_options(&options))
    }

    /// Upsert the provided settings and return the resulting config.
    pub async fn update(
        pool: &PgPool,
        params: &UpdateSettingsParams,
    ) -> Result<NotificationConfig, AppError> {
        let options = params.to_options();

        let mut tx = pool.begin().await?;
        for (key, value) in &options {
            sqlx::query(
                r#"
                INSERT INTO options (option_name, option_value)
                VALUES ($1, $2)
                ON CONFLICT (option_name)
                DO UPDATE SET option_value = EXCLUDED.option_value, updated_at = NOW()
                "#,
            )
            .bind(key)
            .bind(value)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        tracing::info!(
            keys = ?options.iter().map(|(k, _)| *k).collect::<Vec<_>>(),
            "SMS settings updated"
        );

        Self::load(pool).await
    }
}
