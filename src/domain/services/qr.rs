use crate::domain::models::guest::{Guest, GuestCategory};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Signed pass payload, serialized to JSON and rendered as a QR code. Never
/// persisted: it is re-derivable at any time from the guest's current token,
/// so re-issuing after an RSVP update costs nothing. The checksum binds
/// id + token + issued_at; name and category ride along for display only.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct QrPayload {
    pub id: String,
    pub token: String,
    pub name: String,
    pub category: GuestCategory,
    pub issued_at: i64,
    pub checksum: String,
}

/// Outcome of verifying a scanned payload. Verification authenticates
/// possession of a token, nothing more; entitlement is re-checked live
/// against the guest record at check-in time.
#[derive(Debug, Clone, PartialEq)]
pub enum QrVerification {
    Valid { guest_id: String, token: String },
    Malformed,
    BadChecksum,
    Expired,
}

impl QrVerification {
    pub fn reason(&self) -> &'static str {
        match self {
            QrVerification::Valid { .. } => "valid",
            QrVerification::Malformed => "malformed",
            QrVerification::BadChecksum => "bad_checksum",
            QrVerification::Expired => "expired",
        }
    }
}

fn checksum(id: &str, token: &str, issued_at: i64, secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("{}:{}:{}:{}", id, token, issued_at, secret).as_bytes());
    let digest = hex::encode(hasher.finalize());
    digest[..16].to_string()
}

pub fn issue(guest: &Guest, secret: &str, now: DateTime<Utc>) -> QrPayload {
    let issued_at = now.timestamp_millis();
    QrPayload {
        id: guest.id.clone(),
        token: guest.token.clone(),
        name: guest.name.clone(),
        category: guest.category,
        issued_at,
        checksum: checksum(&guest.id, &guest.token, issued_at, secret),
    }
}

pub fn verify(raw: &str, secret: &str, max_age: Duration, now: DateTime<Utc>) -> QrVerification {
    let payload: QrPayload = match serde_json::from_str(raw) {
        Ok(p) => p,
        Err(_) => return QrVerification::Malformed,
    };

    if payload.id.is_empty() || payload.token.is_empty() {
        return QrVerification::Malformed;
    }

    let expected = checksum(&payload.id, &payload.token, payload.issued_at, secret);
    if expected != payload.checksum {
        return QrVerification::BadChecksum;
    }

    let age_ms = now.timestamp_millis() - payload.issued_at;
    if age_ms > max_age.num_milliseconds() {
        return QrVerification::Expired;
    }

    QrVerification::Valid {
        guest_id: payload.id,
        token: payload.token,
    }
}

/// Render URL for the scannable image. The image itself is presentation and
/// lives with an external renderer; only the encoded payload matters here.
pub fn render_url(payload: &QrPayload) -> Result<String, serde_json::Error> {
    let data = serde_json::to_string(payload)?;
    let url = reqwest::Url::parse_with_params(
        "https://api.qrserver.com/v1/create-qr-code/",
        &[("size", "300x300"), ("format", "png"), ("data", data.as_str())],
    )
    .expect("static base URL is valid");
    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::guest::{Guest, InviteType, NewGuestParams};

    const SECRET: &str = "test-qr-secret";

    fn test_guest() -> Guest {
        Guest::new(NewGuestParams {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            company: None,
            invite_type: InviteType::Named,
            category: GuestCategory::TierA,
        })
    }

    #[test]
    fn round_trip_verifies() {
        let guest = test_guest();
        let now = Utc::now();
        let payload = issue(&guest, SECRET, now);
        let raw = serde_json::to_string(&payload).unwrap();

        assert_eq!(
            verify(&raw, SECRET, Duration::days(30), now),
            QrVerification::Valid {
                guest_id: guest.id,
                token: guest.token,
            }
        );
    }

    #[test]
    fn tampered_id_fails_checksum() {
        let guest = test_guest();
        let now = Utc::now();
        let mut payload = issue(&guest, SECRET, now);
        payload.id = format!("{}x", payload.id);
        let raw = serde_json::to_string(&payload).unwrap();

        assert_eq!(verify(&raw, SECRET, Duration::days(30), now), QrVerification::BadChecksum);
    }

    #[test]
    fn tampered_token_fails_checksum() {
        let guest = test_guest();
        let now = Utc::now();
        let mut payload = issue(&guest, SECRET, now);
        payload.token = format!("{}0", &payload.token[..31]);
        let raw = serde_json::to_string(&payload).unwrap();

        if payload.token != guest.token {
            assert_eq!(verify(&raw, SECRET, Duration::days(30), now), QrVerification::BadChecksum);
        }
    }

    #[test]
    fn wrong_secret_fails_checksum() {
        let guest = test_guest();
        let now = Utc::now();
        let payload = issue(&guest, SECRET, now);
        let raw = serde_json::to_string(&payload).unwrap();

        assert_eq!(verify(&raw, "other-secret", Duration::days(30), now), QrVerification::BadChecksum);
    }

    #[test]
    fn stale_payload_expires() {
        let guest = test_guest();
        let issued = Utc::now();
        let payload = issue(&guest, SECRET, issued);
        let raw = serde_json::to_string(&payload).unwrap();

        let scanned = issued + Duration::days(31);
        assert_eq!(verify(&raw, SECRET, Duration::days(30), scanned), QrVerification::Expired);
    }

    #[test]
    fn garbage_is_malformed() {
        let now = Utc::now();
        assert_eq!(verify("not json", SECRET, Duration::days(30), now), QrVerification::Malformed);
        assert_eq!(verify("{}", SECRET, Duration::days(30), now), QrVerification::Malformed);
        assert_eq!(
            verify(r#"{"id":"a","token":"b"}"#, SECRET, Duration::days(30), now),
            QrVerification::Malformed
        );
    }

    #[test]
    fn name_is_not_bound_by_checksum() {
        // The token is the authority anchor; display fields may drift after
        // an RSVP update without invalidating the pass.
        let guest = test_guest();
        let now = Utc::now();
        let mut payload = issue(&guest, SECRET, now);
        payload.name = "Someone Else".to_string();
        let raw = serde_json::to_string(&payload).unwrap();

        assert!(matches!(
            verify(&raw, SECRET, Duration::days(30), now),
            QrVerification::Valid { .. }
        ));
    }
}
