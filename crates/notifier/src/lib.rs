//! Order-status SMS notifications over the kwtSMS HTTP API.
//!
//! - [`dispatch`]: status -> handler table, the entry point for order events
//! - [`notifier`]: message rendering and the outbound form POST
//! - [`settings`]: persisted options mapped to a [`settings::NotificationConfig`]

pub mod dispatch;
pub mod notifier;
pub mod settings;
pub mod template;

pub use dispatch::{Dispatcher, StatusHandler};
pub use notifier::{Delivery, Notifier, SendError, SmsPayload};
pub use settings::{NotificationConfig, SettingsService, SettingsView, UpdateSettingsParams};
