use std::time::Duration;

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use super::error::WebhookError;
use super::events::{WebhookEvent, parse_event};

type HmacSha256 = Hmac<Sha256>;

/// Default accepted clock difference between sender and receiver.
pub const DEFAULT_TOLERANCE: Duration = Duration::from_secs(5 * 60);

const SCHEME: &str = "sha256";

fn mac(secret: &[u8], timestamp: Option<i64>, body: &[u8]) -> Result<HmacSha256, WebhookError> {
    if secret.is_empty() {
        return Err(WebhookError::EmptySecret);
    }
    let mut mac = HmacSha256::new_from_slice(secret).map_err(|_| WebhookError::EmptySecret)?;
    if let Some(ts) = timestamp {
        mac.update(ts.to_string().as_bytes());
        mac.update(b".");
    }
    mac.update(body);
    Ok(mac)
}

/// Compute the hex signature of `body`, prefixed by `"{timestamp}."` when a
/// timestamp is given.
pub fn sign(
    secret: impl AsRef<[u8]>,
    timestamp: Option<i64>,
    body: &[u8],
) -> Result<String, WebhookError> {
    let mac = mac(secret.as_ref(), timestamp, body)?;
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Checks webhook signatures against a shared secret.
#[derive(Clone)]
pub struct WebhookVerifier {
    secret: Vec<u8>,
    tolerance: Duration,
}

impl std::fmt::Debug for WebhookVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookVerifier")
            .field("secret", &"<redacted>")
            .field("tolerance", &self.tolerance)
            .finish()
    }
}

impl WebhookVerifier {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
            tolerance: DEFAULT_TOLERANCE,
        }
    }

    /// Accepted distance between the signed timestamp and the local clock,
    /// in either direction.
    pub fn with_tolerance(mut self, tolerance: Duration) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Verify `signature` for `body` against the current time.
    ///
    /// `signature` may be `sha256=<hex>` or bare hex; several comma-separated
    /// signatures are accepted during secret rotation, and any match passes.
    pub fn verify(
        &self,
        body: &[u8],
        signature: &str,
        timestamp: Option<i64>,
    ) -> Result<(), WebhookError> {
        self.verify_at(body, signature, timestamp, Utc::now())
    }

    /// Like [`verify`](Self::verify) with an explicit clock.
    pub fn verify_at(
        &self,
        body: &[u8],
        signature: &str,
        timestamp: Option<i64>,
        now: DateTime<Utc>,
    ) -> Result<(), WebhookError> {
        if let Some(ts) = timestamp {
            let skew = now.timestamp().abs_diff(ts);
            if skew > self.tolerance.as_secs() {
                return Err(WebhookError::StaleTimestamp {
                    timestamp: ts,
                    tolerance_secs: self.tolerance.as_secs(),
                });
            }
        }

        let candidates = parse_signatures(signature)?;
        let expected = mac(&self.secret, timestamp, body)?;
        // verify_slice compares in constant time
        if candidates
            .iter()
            .any(|candidate| expected.clone().verify_slice(candidate).is_ok())
        {
            Ok(())
        } else {
            Err(WebhookError::SignatureMismatch)
        }
    }

    /// Verify, then parse the body into a [`WebhookEvent`].
    pub fn verify_and_parse(
        &self,
        body: &[u8],
        signature: &str,
        timestamp: Option<i64>,
    ) -> Result<WebhookEvent, WebhookError> {
        self.verify(body, signature, timestamp)?;
        parse_event(body)
    }
}

fn parse_signatures(header: &str) -> Result<Vec<Vec<u8>>, WebhookError> {
    let mut signatures = Vec::new();
    for part in header.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let hex_part = match part.split_once('=') {
            Some((scheme, value)) if scheme.eq_ignore_ascii_case(SCHEME) => value,
            Some((scheme, _)) => {
                return Err(WebhookError::MalformedSignature(format!(
                    "unsupported scheme '{scheme}'"
                )));
            }
            None => part,
        };
        let bytes = hex::decode(hex_part)
            .map_err(|e| WebhookError::MalformedSignature(e.to_string()))?;
        signatures.push(bytes);
    }
    if signatures.is_empty() {
        return Err(WebhookError::MalformedSignature(
            "no signature present".into(),
        ));
    }
    Ok(signatures)
}
