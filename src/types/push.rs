//! Push delivery types
//!
//! Headers, urgency levels, payload shape and VAPID claims used when
//! posting a notification to a push service.

use serde::{Deserialize, Serialize};
use std::{fmt, io, str::FromStr};

#[derive(Debug, Clone)]
pub struct PushHeader {
    pub ttl: i64,
    pub urgency: Urgency,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Urgency {
    VeryLow,
    Low,
    Normal,
    High,
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Urgency::VeryLow => write!(f, "very-low"),
            Urgency::Low => write!(f, "low"),
            Urgency::Normal => write!(f, "normal"),
            Urgency::High => write!(f, "high"),
        }
    }
}

impl From<Urgency> for String {
    fn from(value: Urgency) -> Self {
        value.to_string()
    }
}

impl FromStr for Urgency {
    type Err = io::Error;

    fn from_str(value: &str) -> Result<Urgency, Self::Err> {
        match value {
            "very-low" => Ok(Urgency::VeryLow),
            "low" => Ok(Urgency::Low),
            "normal" => Ok(Urgency::Normal),
            "high" => Ok(Urgency::High),
            _ => Err(io::Error::other("Urgency not supported")),
        }
    }
}

/// Content encoding negotiated by the browser when the subscription was
/// created. Stored per subscription; older platforms report "aesgcm".
#[derive(Debug, Clone, PartialEq)]
pub enum ContentEncoding {
    AesGcm,
    Aes128Gcm,
}

impl fmt::Display for ContentEncoding {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ContentEncoding::AesGcm => write!(f, "aesgcm"),
            ContentEncoding::Aes128Gcm => write!(f, "aes128gcm"),
        }
    }
}

impl From<ContentEncoding> for String {
    fn from(value: ContentEncoding) -> Self {
        value.to_string()
    }
}

impl FromStr for ContentEncoding {
    type Err = io::Error;

    fn from_str(value: &str) -> Result<ContentEncoding, Self::Err> {
        match value {
            "aesgcm" => Ok(ContentEncoding::AesGcm),
            "aes128gcm" => Ok(ContentEncoding::Aes128Gcm),
            _ => Err(io::Error::other("ContentEncoding not supported")),
        }
    }
}

impl Default for ContentEncoding {
    fn default() -> Self {
        ContentEncoding::AesGcm
    }
}

/// Notification payload rendered by the service worker.
#[derive(Debug, Clone, Serialize)]
pub struct PushPayload {
    pub title: String,
    pub body: String,
    pub icon: String,
    pub badge: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sound: Option<String>,
    pub data: PayloadData,
}

#[derive(Debug, Clone, Serialize)]
pub struct PayloadData {
    pub url: String,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub aud: String,
    pub sub: String,
    pub exp: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urgency_round_trip() {
        for value in ["very-low", "low", "normal", "high"] {
            let urgency = Urgency::from_str(value).unwrap();
            assert_eq!(urgency.to_string(), value);
        }
        assert!(Urgency::from_str("urgent").is_err());
    }

    #[test]
    fn test_content_encoding_round_trip() {
        assert_eq!(
            ContentEncoding::from_str("aesgcm").unwrap(),
            ContentEncoding::AesGcm
        );
        assert_eq!(
            ContentEncoding::from_str("aes128gcm").unwrap(),
            ContentEncoding::Aes128Gcm
        );
        assert!(ContentEncoding::from_str("aes256gcm").is_err());
        assert_eq!(ContentEncoding::default().to_string(), "aesgcm");
    }

    #[test]
    fn test_payload_omits_absent_optional_fields() {
        let payload = PushPayload {
            title: String::from("Title"),
            body: String::from("Body"),
            icon: String::from("/favicon.ico"),
            badge: String::from("/favicon.ico"),
            image: None,
            sound: None,
            data: PayloadData {
                url: String::from("/"),
            },
        };

        let json = serde_json::to_string(&payload).unwrap();
        assert!(json.contains(r#""title":"Title""#));
        assert!(json.contains(r#""url":"/""#));
        assert!(!json.contains("image"));
        assert!(!json.contains("sound"));
    }
}
