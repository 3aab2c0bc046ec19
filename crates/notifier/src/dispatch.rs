//! Status dispatch table.
//!
//! Each notifying order status maps to one [`StatusHandler`] holding the option
//! key its template is stored under and the built-in default message. The order
//! subsystem calls [`Dispatcher::dispatch`] once per status transition.

use kwt_common::types::{OrderEvent, OrderStatus};

use crate::notifier::{Delivery, Notifier};
use crate::settings::NotificationConfig;

/// Per-status notification handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusHandler {
    pub status: OrderStatus,
    /// Options table key holding the admin-configured template
    pub option_key: &'static str,
    /// Message used when no template is configured
    pub default_template: &'static str,
}

const PENDING: StatusHandler = StatusHandler {
    status: OrderStatus::Pending,
    option_key: "kwt_sms_pending_message",
    default_template: "Your order #{order_number} is pending. We will notify you once it is confirmed.",
};

const PROCESSING: StatusHandler = StatusHandler {
    status: OrderStatus::Processing,
    option_key: "kwt_sms_processing_message",
    default_template: "Your order #{order_number} is being processed. Thank you for your patience.",
};

const COMPLETED: StatusHandler = StatusHandler {
    status: OrderStatus::Completed,
    option_key: "kwt_sms_completed_message",
    default_template: "Your order #{order_number} has been completed. Thank you for shopping with us!",
};

/// All registered handlers.
pub const HANDLERS: [StatusHandler; 3] = [PENDING, PROCESSING, COMPLETED];

/// Look up the handler registered for `status`.
pub fn handler_for(status: OrderStatus) -> &'static StatusHandler {
    match status {
        OrderStatus::Pending => &PENDING,
        OrderStatus::Processing => &PROCESSING,
        OrderStatus::Completed => &COMPLETED,
    }
}

/// Routes order events to the notifier.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    notifier: Notifier,
}

impl Dispatcher {
    pub fn new(notifier: Notifier) -> Self {
        Self { notifier }
    }

    /// Send the SMS for one order status transition.
    ///
    /// Never fails: transport errors are logged by the notifier and reported
    /// as [`Delivery::TransportFailed`] so the status change always proceeds.
    pub async fn dispatch(&self, event: &OrderEvent, config: &NotificationConfig) -> Delivery {
        let handler = handler_for(event.status);
        tracing::debug!(
            status = %handler.status,
            order_number = %event.order.order_number,
            configured = config.templates.contains_key(&handler.status),
            "Dispatching order status notification"
        );
        self.notifier.notify(event, config).await
    }
}
