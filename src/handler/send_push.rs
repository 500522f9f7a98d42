//! Notification fan-out
//!
//! Queues one encrypted delivery per stored subscription, flushes them
//! concurrently and reconciles expired subscriptions from the delivery
//! reports. Transient failures are logged and the subscription is kept;
//! the next send simply tries again.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD as BASE64_URL, Engine};
use chrono::Utc;
use futures::future::join_all;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use url::Url;

use crate::{
    configuration::{AppState, Config, State},
    error::Error,
    model::PushSubscription,
    types::{Claims, ContentEncoding, PayloadData, PushHeader, PushPayload},
};

#[derive(Debug, PartialEq)]
pub struct SendSummary {
    pub sent: usize,
    pub failed: usize,
}

#[derive(Debug)]
pub struct DeliveryReport {
    pub endpoint: String,
    pub result: Result<u16, Error>,
}

#[derive(Debug)]
struct Reconciliation {
    sent: usize,
    failed: usize,
    expired: Vec<String>,
}

/// The payload every send fans out. The service worker falls back to its
/// own defaults for anything missing.
pub fn default_payload() -> PushPayload {
    PushPayload {
        title: String::from("Push Relay"),
        body: String::from("Hello Sir"),
        icon: String::from("/favicon.ico"),
        badge: String::from("/favicon.ico"),
        image: None,
        sound: None,
        data: PayloadData {
            url: String::from("/"),
        },
    }
}

pub async fn send_to_all(
    state: AppState<State>,
    payload: PushPayload,
) -> Result<SendSummary, Error> {
    if !state.config.has_vapid_keys() {
        return Err(Error::Configuration(String::from(
            "VAPID keys are not configured",
        )));
    }

    let subscriptions = state.database.push_subscription.get_all().await?;
    if subscriptions.is_empty() {
        return Ok(SendSummary { sent: 0, failed: 0 });
    }

    let push_header = PushHeader {
        ttl: state.config.ttl,
        urgency: state.config.urgency.clone(),
    };
    let body = serde_json::to_string(&payload)?;

    let (queued, queue_failed) =
        queue_messages(&state.config, subscriptions, &body);

    // Flush phase: one report per queued delivery.
    let deliveries = queued.into_iter().map(|(endpoint, token, data)| {
        let state = state.clone();
        let push_header = push_header.clone();
        async move {
            let result = state
                .http
                .post_push(endpoint.to_owned(), token, push_header, data)
                .await;
            DeliveryReport { endpoint, result }
        }
    });
    let reports = join_all(deliveries).await;

    let outcome = reconcile(&reports, &state.config.expired_status_codes);

    // Cleanup failures must not discard an otherwise completed fan-out;
    // the stale row just gets another chance on the next send.
    for endpoint in &outcome.expired {
        tracing::info!("Removing expired subscription {}", endpoint);
        let result = state
            .database
            .push_subscription
            .delete_by_endpoint(endpoint.to_owned())
            .await;
        if let Err(e) = result {
            tracing::warn!(
                "Removing expired subscription {} failed: {}",
                endpoint,
                e
            );
        }
    }

    Ok(SendSummary {
        sent: outcome.sent,
        failed: queue_failed + outcome.failed,
    })
}

/// Queue phase: sign and encrypt one message per subscription. A
/// malformed subscription fails alone and is counted; the rest of the
/// fan-out still runs. No subscriptions means nothing queued and
/// nothing failed.
fn queue_messages(
    config: &Config,
    subscriptions: Vec<PushSubscription>,
    payload: &str,
) -> (Vec<(String, String, Vec<u8>)>, usize) {
    let mut failed = 0usize;
    let mut queued = Vec::new();

    for subscription in subscriptions {
        if subscription.content_encoding
            != ContentEncoding::Aes128Gcm.to_string()
        {
            tracing::warn!(
                "Subscription {} registered {}; delivery uses aes128gcm",
                subscription.endpoint,
                subscription.content_encoding
            );
        }

        match build_message(config, &subscription, payload) {
            Ok((token, data)) => {
                queued.push((subscription.endpoint, token, data));
            },
            Err(e) => {
                failed += 1;
                tracing::warn!(
                    "Queueing push for {} failed: {}",
                    subscription.endpoint,
                    e
                );
            },
        }
    }

    (queued, failed)
}

/// Sign a VAPID token and encrypt the payload for one subscription.
fn build_message(
    config: &Config,
    subscription: &PushSubscription,
    payload: &str,
) -> Result<(String, Vec<u8>), Error> {
    let claims = vapid_claims(
        &subscription.endpoint,
        &config.subject,
        config.ttl,
        Utc::now().timestamp(),
    )?;
    let key = EncodingKey::from_ec_pem(&config.vapid_private_key)?;
    let token = encode(&Header::new(Algorithm::ES256), &claims, &key)?;

    let p256dh = BASE64_URL.decode(&subscription.public_key)?;
    let auth = BASE64_URL.decode(&subscription.auth_token)?;
    let data = ece::encrypt(&p256dh, &auth, payload.as_bytes())?;

    Ok((token, data))
}

/// The token audience is the push service origin, scheme and host only.
fn vapid_claims(
    endpoint: &str,
    subject: &str,
    ttl: i64,
    now: i64,
) -> Result<Claims, Error> {
    let url = Url::parse(endpoint)?;

    let scheme = url.scheme();
    let host = match url.host() {
        Some(h) => h.to_string(),
        None => {
            return Err(Error::Validation(format!(
                "endpoint has no host: {}",
                endpoint
            )));
        },
    };

    Ok(Claims {
        aud: format!("{}://{}", scheme, host),
        sub: subject.to_owned(),
        exp: now + ttl,
    })
}

/// Classify delivery reports: 2xx counts as sent, a status in the expired
/// set marks the subscription for deletion, anything else is a transient
/// failure that keeps the row.
fn reconcile(reports: &[DeliveryReport], expired_codes: &[u16]) -> Reconciliation {
    let mut sent = 0;
    let mut failed = 0;
    let mut expired = Vec::new();

    for report in reports {
        match &report.result {
            Ok(status) if (200..300).contains(status) => sent += 1,
            Ok(status) if expired_codes.contains(status) => {
                failed += 1;
                expired.push(report.endpoint.to_owned());
            },
            Ok(status) => {
                failed += 1;
                tracing::warn!(
                    "Push to {} failed with status {}",
                    report.endpoint,
                    status
                );
            },
            Err(e) => {
                failed += 1;
                tracing::warn!("Push to {} failed: {}", report.endpoint, e);
            },
        }
    }

    Reconciliation {
        sent,
        failed,
        expired,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Urgency;
    use chrono::Utc;

    fn test_config() -> Config {
        Config {
            server_host: String::from("127.0.0.1"),
            port: 8080,
            allowed_origins: vec![String::from("*")],
            static_dir: String::from("static"),
            database_url: String::from("postgres://localhost/test"),
            timeout: 5,
            subject: String::from("mailto:admin@example.com"),
            ttl: 3600,
            urgency: Urgency::Normal,
            expired_status_codes: vec![404, 410],
            vapid_private_key: Vec::new(),
            vapid_public_key: Vec::new(),
        }
    }

    fn subscription(endpoint: &str) -> PushSubscription {
        PushSubscription {
            id: 1,
            endpoint: String::from(endpoint),
            public_key: String::from("BPk"),
            auth_token: String::from("tok"),
            content_encoding: String::from("aesgcm"),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn report(endpoint: &str, result: Result<u16, Error>) -> DeliveryReport {
        DeliveryReport {
            endpoint: String::from(endpoint),
            result,
        }
    }

    #[test]
    fn test_vapid_claims_audience() {
        let claims = vapid_claims(
            "https://fcm.googleapis.com/fcm/send/abc123",
            "mailto:admin@example.com",
            3600,
            1_700_000_000,
        )
        .unwrap();

        assert_eq!(claims.aud, "https://fcm.googleapis.com");
        assert_eq!(claims.sub, "mailto:admin@example.com");
        assert_eq!(claims.exp, 1_700_000_000 + 3600);
    }

    #[test]
    fn test_vapid_claims_rejects_hostless_endpoint() {
        let result = vapid_claims("mailto:nope", "mailto:a@b.c", 60, 0);
        assert!(result.is_err());
    }

    #[test]
    fn test_queue_with_no_subscriptions_does_nothing() {
        let (queued, failed) =
            queue_messages(&test_config(), Vec::new(), "{}");
        assert!(queued.is_empty());
        assert_eq!(failed, 0);
    }

    #[test]
    fn test_queue_counts_malformed_subscription_and_continues() {
        // Unsignable key material: both subscriptions fail alone, the
        // loop still visits each one.
        let subscriptions = vec![
            subscription("https://push.example/a"),
            subscription("https://push.example/b"),
        ];

        let (queued, failed) =
            queue_messages(&test_config(), subscriptions, "{}");
        assert!(queued.is_empty());
        assert_eq!(failed, 2);
    }

    #[test]
    fn test_reconcile_no_reports_is_all_zero() {
        let outcome = reconcile(&[], &[404, 410]);
        assert_eq!(outcome.sent, 0);
        assert_eq!(outcome.failed, 0);
        assert!(outcome.expired.is_empty());
    }

    #[test]
    fn test_reconcile_all_delivered() {
        let reports = vec![
            report("https://push.example/a", Ok(201)),
            report("https://push.example/b", Ok(200)),
        ];

        let outcome = reconcile(&reports, &[404, 410]);
        assert_eq!(outcome.sent, 2);
        assert_eq!(outcome.failed, 0);
        assert!(outcome.expired.is_empty());
    }

    #[test]
    fn test_reconcile_expired_selects_matching_endpoint_only() {
        let reports = vec![
            report("https://push.example/a", Ok(201)),
            report("https://push.example/b", Ok(410)),
            report("https://push.example/c", Ok(404)),
        ];

        let outcome = reconcile(&reports, &[404, 410]);
        assert_eq!(outcome.sent, 1);
        assert_eq!(outcome.failed, 2);
        assert_eq!(
            outcome.expired,
            vec![
                String::from("https://push.example/b"),
                String::from("https://push.example/c"),
            ]
        );
    }

    #[test]
    fn test_reconcile_transient_failure_keeps_subscription() {
        let reports = vec![
            report("https://push.example/a", Ok(500)),
            report(
                "https://push.example/b",
                Err(Error::Validation(String::from("boom"))),
            ),
        ];

        let outcome = reconcile(&reports, &[404, 410]);
        assert_eq!(outcome.sent, 0);
        assert_eq!(outcome.failed, 2);
        assert!(outcome.expired.is_empty());
    }

    #[test]
    fn test_default_payload_shape() {
        let json =
            serde_json::to_string(&default_payload()).unwrap();
        assert!(json.contains(r#""title":"Push Relay""#));
        assert!(json.contains(r#""body":"Hello Sir""#));
        assert!(json.contains(r#""icon":"/favicon.ico""#));
        assert!(json.contains(r#""badge":"/favicon.ico""#));
    }
}
