use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod key;
pub mod store;

pub use key::derive_key;

/// Temporary credentials for an assumed role, persisted as one JSON file
/// per cache key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: String,
    pub expiration: DateTime<Utc>,
}

/// A cached record is usable only while strictly more than `grace_seconds`
/// of lifetime remain
pub fn is_valid(record: &CredentialRecord, now: DateTime<Utc>, grace_seconds: i64) -> bool {
    (record.expiration - now).num_seconds() > grace_seconds
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record_expiring_at(expiration: DateTime<Utc>) -> CredentialRecord {
        CredentialRecord {
            access_key_id: "AKIAEXAMPLE".to_string(),
            secret_access_key: "secret".to_string(),
            session_token: "token".to_string(),
            expiration,
        }
    }

    #[test]
    fn test_valid_with_ample_lifetime() {
        let now = Utc::now();
        let record = record_expiring_at(now + Duration::minutes(20));
        assert!(is_valid(&record, now, 300));
    }

    #[test]
    fn test_invalid_at_exact_grace_boundary() {
        let now = Utc::now();
        let record = record_expiring_at(now + Duration::seconds(300));
        assert!(!is_valid(&record, now, 300));
    }

    #[test]
    fn test_valid_one_second_past_boundary() {
        let now = Utc::now();
        let record = record_expiring_at(now + Duration::seconds(301));
        assert!(is_valid(&record, now, 300));
    }

    #[test]
    fn test_invalid_within_grace_window() {
        let now = Utc::now();
        let record = record_expiring_at(now + Duration::minutes(4));
        assert!(!is_valid(&record, now, 300));
    }

    #[test]
    fn test_invalid_when_already_expired() {
        let now = Utc::now();
        let record = record_expiring_at(now - Duration::minutes(10));
        assert!(!is_valid(&record, now, 300));
    }

    #[test]
    fn test_zero_grace_accepts_any_future_expiration() {
        let now = Utc::now();
        let record = record_expiring_at(now + Duration::seconds(1));
        assert!(is_valid(&record, now, 0));
    }
}
