//! Delivery tests against a local stand-in for the kwtSMS endpoint.
//!
//! ```bash
//! cargo test -p kwt-notifier --test delivery
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Form, Router};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::prelude::*;

use kwt_common::types::{OrderEvent, OrderSnapshot, OrderStatus};
use kwt_notifier::{Delivery, Dispatcher, NotificationConfig, Notifier};

type Captured = Arc<Mutex<Vec<HashMap<String, String>>>>;

// ============================================================
// Helpers
// ============================================================

/// Start a mock send endpoint answering with `reply`, returning its URL.
async fn spawn_endpoint(reply: StatusCode) -> (String, Captured) {
    let captured: Captured = Arc::default();

    let app = Router::new()
        .route(
            "/API/send/",
            post(
                move |State(captured): State<Captured>,
                      Form(fields): Form<HashMap<String, String>>| async move {
                    captured.lock().unwrap().push(fields);
                    (reply, "ERR:003")
                },
            ),
        )
        .with_state(captured.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/API/send/", addr), captured)
}

/// URL of a port nothing listens on.
async fn closed_endpoint() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/API/send/", addr)
}

/// Counts WARN events emitted by this crate.
#[derive(Clone, Default)]
struct WarnCounter(Arc<AtomicUsize>);

impl WarnCounter {
    fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

impl<S: Subscriber> Layer<S> for WarnCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        if *meta.level() == Level::WARN && meta.target().starts_with("kwt_notifier") {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}

fn config() -> NotificationConfig {
    NotificationConfig {
        api_username: "shop".to_string(),
        api_password: "secret".to_string(),
        sender_id: "KWT-SMS".to_string(),
        test_mode: true,
        templates: HashMap::from([(
            OrderStatus::Completed,
            "Order #{order_number} done, ref {order_number}".to_string(),
        )]),
    }
}

fn event(status: OrderStatus, phone: &str) -> OrderEvent {
    OrderEvent {
        order: OrderSnapshot {
            order_number: "1042".to_string(),
            billing_phone: phone.to_string(),
        },
        status,
    }
}

// ============================================================
// Tests
// ============================================================

#[tokio::test]
async fn test_notify_posts_form_fields() {
    let (url, captured) = spawn_endpoint(StatusCode::OK).await;
    let notifier = Notifier::new(url, None).unwrap();

    let delivery = notifier
        .notify(&event(OrderStatus::Completed, "+96512345678"), &config())
        .await;
    assert_eq!(delivery, Delivery::Sent { status: 200 });

    let requests = captured.lock().unwrap();
    assert_eq!(requests.len(), 1);
    let fields = &requests[0];
    assert_eq!(fields["username"], "shop");
    assert_eq!(fields["password"], "secret");
    assert_eq!(fields["sender"], "KWT-SMS");
    assert_eq!(fields["mobile"], "96512345678");
    assert_eq!(fields["lang"], "1");
    assert_eq!(fields["test"], "1");
    assert_eq!(fields["message"], "Order #1042 done, ref 1042");
    assert_eq!(fields.len(), 7);
}

#[tokio::test]
async fn test_dispatch_uses_default_template() {
    let (url, captured) = spawn_endpoint(StatusCode::OK).await;
    let dispatcher = Dispatcher::new(Notifier::new(url, None).unwrap());

    dispatcher
        .dispatch(&event(OrderStatus::Pending, "96512345678"), &config())
        .await;

    let requests = captured.lock().unwrap();
    assert_eq!(
        requests[0]["message"],
        "Your order #1042 is pending. We will notify you once it is confirmed."
    );
    assert_eq!(requests[0]["mobile"], "96512345678");
}

#[tokio::test]
async fn test_error_status_is_not_interpreted() {
    let (url, captured) = spawn_endpoint(StatusCode::INTERNAL_SERVER_ERROR).await;
    let notifier = Notifier::new(url, None).unwrap();

    let delivery = notifier
        .notify(&event(OrderStatus::Processing, "+1"), &config())
        .await;

    // Remote failures are recorded, not retried or raised
    assert_eq!(delivery, Delivery::Sent { status: 500 });
    assert_eq!(captured.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_transport_failure_is_swallowed() {
    let notifier = Notifier::new(closed_endpoint().await, None).unwrap();

    let delivery = notifier
        .notify(&event(OrderStatus::Completed, "+96512345678"), &config())
        .await;
    assert_eq!(delivery, Delivery::TransportFailed);
}

#[tokio::test]
async fn test_try_send_surfaces_transport_error() {
    let notifier = Notifier::new(closed_endpoint().await, None).unwrap();
    let message = Notifier::compose(&event(OrderStatus::Completed, "+1"), &config());

    let err = notifier.try_send(&message, &config()).await.unwrap_err();
    assert!(err.to_string().starts_with("SMS transport error"));
}

#[tokio::test]
async fn test_transport_failure_logged_once_per_dispatch() {
    let warns = WarnCounter::default();
    let _guard =
        tracing::subscriber::set_default(tracing_subscriber::registry().with(warns.clone()));

    let dispatcher = Dispatcher::new(Notifier::new(closed_endpoint().await, None).unwrap());

    let delivery = dispatcher
        .dispatch(&event(OrderStatus::Pending, "++965"), &config())
        .await;
    assert_eq!(delivery, Delivery::TransportFailed);
    assert_eq!(warns.count(), 1);

    // Each failed dispatch adds exactly one warning
    dispatcher
        .dispatch(&event(OrderStatus::Completed, "+965"), &config())
        .await;
    assert_eq!(warns.count(), 2);
}

#[tokio::test]
async fn test_remote_error_status_not_logged_as_failure() {
    let warns = WarnCounter::default();
    let _guard =
        tracing::subscriber::set_default(tracing_subscriber::registry().with(warns.clone()));

    let (url, _captured) = spawn_endpoint(StatusCode::BAD_REQUEST).await;
    let dispatcher = Dispatcher::new(Notifier::new(url, None).unwrap());

    let delivery = dispatcher
        .dispatch(&event(OrderStatus::Processing, "+965"), &config())
        .await;
    assert_eq!(delivery, Delivery::Sent { status: 400 });
    assert_eq!(warns.count(), 0);
}
