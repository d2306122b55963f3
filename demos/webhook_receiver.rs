//! Verifies a webhook delivery the way an HTTP handler would: raw body,
//! signature header and timestamp header in, typed event out.

use chrono::Utc;
use ets::webhook::{WebhookError, WebhookEventType, WebhookVerifier, sign};

fn handle(verifier: &WebhookVerifier, body: &[u8], signature: &str, timestamp: &str) -> u16 {
    let Ok(timestamp) = timestamp.parse::<i64>() else {
        return 400;
    };
    match verifier.verify_and_parse(body, signature, Some(timestamp)) {
        Ok(event) => {
            match event.event_type {
                WebhookEventType::InvoiceReceived => {
                    println!("  new incoming invoice {}", event.document_uuid)
                }
                WebhookEventType::InvoiceStatusChanged
                | WebhookEventType::DispatchStatusChanged
                | WebhookEventType::ProducerReceiptStatusChanged => println!(
                    "  {:?} {} is now {:?}",
                    event.document_kind, event.document_uuid, event.status
                ),
                other => println!("  {other:?} for {}", event.document_uuid),
            }
            200
        }
        Err(WebhookError::InvalidPayload(e)) => {
            println!("  unreadable event: {e}");
            422
        }
        Err(e) => {
            println!("  rejected: {e}");
            401
        }
    }
}

fn main() -> Result<(), WebhookError> {
    let secret = "whsec_demo_only";
    let verifier = WebhookVerifier::new(secret);
    let body = br#"{"eventId":"evt_7","eventType":"invoice.status_changed","documentKind":"invoice","documentUuid":"3f2504e0-4f89-41d3-9a0c-0305e82c3301","status":"ACCEPTED","occurredAt":"2024-06-20T08:15:00Z"}"#;

    let now = Utc::now().timestamp();
    let signature = format!("sha256={}", sign(secret, Some(now), body)?);

    println!("genuine delivery:");
    println!("  -> {}", handle(&verifier, body, &signature, &now.to_string()));

    println!("tampered body:");
    let tampered = String::from_utf8_lossy(body).replace("ACCEPTED", "REJECTED");
    println!(
        "  -> {}",
        handle(&verifier, tampered.as_bytes(), &signature, &now.to_string())
    );

    println!("replayed an hour later:");
    let old = now - 3600;
    let old_signature = sign(secret, Some(old), body)?;
    println!("  -> {}", handle(&verifier, body, &old_signature, &old.to_string()));
    Ok(())
}
