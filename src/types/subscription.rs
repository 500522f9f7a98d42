//! Incoming subscription request bodies
//!
//! Mirrors the JSON produced by `PushSubscription.toJSON()` in the browser.

use std::str::FromStr;

use serde::Deserialize;

use crate::{error::Error, model::NewPushSubscription, types::ContentEncoding};

#[derive(Debug, Deserialize)]
pub struct SubscribeRequest {
    pub endpoint: Option<String>,
    #[serde(alias = "expirationTime")]
    pub expiration_time: Option<i64>,
    pub keys: Option<SubscriptionKeys>,
    #[serde(alias = "contentEncoding")]
    pub content_encoding: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SubscriptionKeys {
    pub p256dh: Option<String>,
    pub auth: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UnsubscribeRequest {
    pub endpoint: Option<String>,
}

fn required(value: Option<&String>, field: &str) -> Result<String, Error> {
    match value {
        Some(item) if !item.trim().is_empty() => Ok(item.to_owned()),
        _ => Err(Error::Validation(format!("{} is required", field))),
    }
}

impl SubscribeRequest {
    /// Validate the request and build the record to persist.
    /// `content_encoding` falls back to "aesgcm" when absent.
    pub fn into_record(self) -> Result<NewPushSubscription, Error> {
        let endpoint = required(self.endpoint.as_ref(), "endpoint")?;

        let keys = self
            .keys
            .as_ref()
            .ok_or_else(|| Error::Validation(String::from("keys is required")))?;
        let public_key = required(keys.p256dh.as_ref(), "keys.p256dh")?;
        let auth_token = required(keys.auth.as_ref(), "keys.auth")?;

        let content_encoding = match self.content_encoding {
            Some(value) => ContentEncoding::from_str(&value).map_err(|_| {
                Error::Validation(format!(
                    "contentEncoding not supported: {}",
                    value
                ))
            })?,
            None => ContentEncoding::default(),
        };

        Ok(NewPushSubscription {
            endpoint,
            public_key,
            auth_token,
            content_encoding,
        })
    }
}

impl UnsubscribeRequest {
    pub fn into_endpoint(self) -> Result<String, Error> {
        required(self.endpoint.as_ref(), "endpoint")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(
        endpoint: Option<&str>,
        p256dh: Option<&str>,
        auth: Option<&str>,
        content_encoding: Option<&str>,
    ) -> SubscribeRequest {
        SubscribeRequest {
            endpoint: endpoint.map(String::from),
            expiration_time: None,
            keys: Some(SubscriptionKeys {
                p256dh: p256dh.map(String::from),
                auth: auth.map(String::from),
            }),
            content_encoding: content_encoding.map(String::from),
        }
    }

    #[test]
    fn test_valid_request_defaults_encoding() {
        let record = request(
            Some("https://push.example/abc"),
            Some("BPk"),
            Some("tok"),
            None,
        )
        .into_record()
        .unwrap();

        assert_eq!(record.endpoint, "https://push.example/abc");
        assert_eq!(record.content_encoding, ContentEncoding::AesGcm);
    }

    #[test]
    fn test_explicit_encoding_is_kept() {
        let record = request(
            Some("https://push.example/abc"),
            Some("BPk"),
            Some("tok"),
            Some("aes128gcm"),
        )
        .into_record()
        .unwrap();

        assert_eq!(record.content_encoding, ContentEncoding::Aes128Gcm);
    }

    #[test]
    fn test_missing_endpoint_rejected() {
        let result =
            request(None, Some("BPk"), Some("tok"), None).into_record();
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn test_empty_endpoint_rejected() {
        let result =
            request(Some("  "), Some("BPk"), Some("tok"), None).into_record();
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn test_missing_auth_rejected() {
        let result = request(
            Some("https://push.example/abc"),
            Some("BPk"),
            None,
            None,
        )
        .into_record();
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn test_missing_keys_rejected() {
        let request = SubscribeRequest {
            endpoint: Some(String::from("https://push.example/abc")),
            expiration_time: None,
            keys: None,
            content_encoding: None,
        };
        assert!(matches!(
            request.into_record(),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_unknown_encoding_rejected() {
        let result = request(
            Some("https://push.example/abc"),
            Some("BPk"),
            Some("tok"),
            Some("rot13"),
        )
        .into_record();
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn test_unsubscribe_requires_endpoint() {
        let request = UnsubscribeRequest { endpoint: None };
        assert!(matches!(
            request.into_endpoint(),
            Err(Error::Validation(_))
        ));

        let request = UnsubscribeRequest {
            endpoint: Some(String::from("https://push.example/abc")),
        };
        assert_eq!(
            request.into_endpoint().unwrap(),
            "https://push.example/abc"
        );
    }
}
