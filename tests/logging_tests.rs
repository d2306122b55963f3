//! Structured events emitted by `LoggingClient`.
#![cfg(feature = "client")]

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use ets::client::*;
use httpmock::prelude::*;
use serde_json::json;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use uuid::Uuid;

const UUID: &str = "3f2504e0-4f89-41d3-9a0c-0305e82c3301";

#[derive(Debug)]
struct Captured {
    level: Level,
    fields: HashMap<String, String>,
}

/// Layer that records every event with its level and fields.
#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<Captured>>>);

impl Capture {
    /// Events carrying an `operation` field, in emission order.
    fn calls(&self) -> Vec<Captured> {
        let mut events = self.0.lock().unwrap();
        events
            .drain(..)
            .filter(|e| e.fields.contains_key("operation"))
            .collect()
    }
}

struct Fields<'a>(&'a mut HashMap<String, String>);

impl Visit for Fields<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{value:?}"));
    }
}

impl<S: Subscriber> Layer<S> for Capture {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = HashMap::new();
        event.record(&mut Fields(&mut fields));
        self.0.lock().unwrap().push(Captured {
            level: *event.metadata().level(),
            fields,
        });
    }
}

fn client_for(server: &MockServer) -> EtsClient {
    let config = ClientConfig::new(
        server.base_url(),
        Credentials::new("key-1", "secret-1", "cust-1", "sw-1"),
    )
    .timeout(Duration::from_secs(5))
    .retry(RetryPolicy::none());
    EtsClient::new(config).unwrap()
}

#[tokio::test]
async fn one_event_per_call_with_outcome_level() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(format!("/invoices/{UUID}/status"));
            then.status(200).json_body(json!({
                "success": true,
                "data": { "uuid": UUID, "status": "DELIVERED" }
            }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(format!("/dispatches/{UUID}/status"));
            then.status(503).body("maintenance");
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(format!("/producer-receipts/{UUID}/status"));
            then.status(404).body("not found");
        })
        .await;

    let capture = Capture::default();
    let _guard =
        tracing::subscriber::set_default(tracing_subscriber::registry().with(capture.clone()));

    let client = LoggingClient::new(client_for(&server));
    let uuid: Uuid = UUID.parse().unwrap();

    client.get_invoice_status(uuid).await.unwrap();
    client.get_dispatch_status(uuid).await.unwrap_err();
    client.get_producer_receipt_status(uuid).await.unwrap_err();

    let calls = capture.calls();
    assert_eq!(calls.len(), 3, "{calls:#?}");

    let ok = &calls[0];
    assert_eq!(ok.level, Level::INFO);
    assert_eq!(ok.fields["operation"], "get_invoice_status");
    assert_eq!(ok.fields["document"], UUID);
    assert_eq!(ok.fields["outcome"], "ok");
    assert!(ok.fields["elapsed_ms"].parse::<u64>().is_ok());
    assert!(!ok.fields.contains_key("error"));

    let retryable = &calls[1];
    assert_eq!(retryable.level, Level::WARN);
    assert_eq!(retryable.fields["operation"], "get_dispatch_status");
    assert_eq!(retryable.fields["document"], UUID);
    assert_eq!(retryable.fields["outcome"], "error");
    assert_eq!(retryable.fields["status"], "503");
    assert!(retryable.fields["error"].contains("503"));

    let fatal = &calls[2];
    assert_eq!(fatal.level, Level::ERROR);
    assert_eq!(fatal.fields["operation"], "get_producer_receipt_status");
    assert_eq!(fatal.fields["outcome"], "error");
    assert_eq!(fatal.fields["status"], "404");
}

#[tokio::test]
async fn credentials_never_logged() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/users/1234567890");
            then.status(500).body("boom");
        })
        .await;

    let capture = Capture::default();
    let _guard =
        tracing::subscriber::set_default(tracing_subscriber::registry().with(capture.clone()));

    let client = LoggingClient::new(client_for(&server));
    client.check_user("1234567890").await.unwrap_err();

    let calls = capture.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].fields["document"], "1234567890");
    for value in calls[0].fields.values() {
        assert!(!value.contains("secret-1"));
        assert!(!value.contains("key-1"));
    }
}
