use serde::{Deserialize, Serialize};

use crate::contract::MSG_SUCCESS;

pub const RECORD_TYPE_A: &str = "A";
pub const RECORD_TTL_SECONDS: i64 = 300;
pub const CHANGE_COMMENT: &str = "Update Minecraft server IP";

pub const MSG_SYNC_NO_PUBLIC_IP: &str = "DNS Sync Failed: No public IP";
pub const MSG_SYNC_NO_HOSTED_ZONE: &str = "DNS Sync Failed: No hosted zone found";

/// A record set as observed from the DNS provider. The provider reports
/// names fully qualified with a trailing dot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecordObservation {
    pub name: String,
    pub record_type: String,
    pub values: Vec<String>,
}

/// One UPSERT to apply against a hosted zone: create the record set if it is
/// absent, overwrite it if present. The prior value is never read first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecordChange {
    pub name: String,
    pub record_type: String,
    pub value: String,
    pub ttl_seconds: i64,
}

impl RecordChange {
    pub fn a_record(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            record_type: RECORD_TYPE_A.to_string(),
            value: value.into(),
            ttl_seconds: RECORD_TTL_SECONDS,
        }
    }
}

/// Outcome of one synchronization attempt. The message strings are part of
/// the public surface; callers dispatch on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Synced,
    NoPublicAddress,
    NoHostedZone,
}

impl SyncOutcome {
    pub fn message(self) -> &'static str {
        match self {
            Self::Synced => MSG_SUCCESS,
            Self::NoPublicAddress => MSG_SYNC_NO_PUBLIC_IP,
            Self::NoHostedZone => MSG_SYNC_NO_HOSTED_ZONE,
        }
    }

    pub fn wrote_record(self) -> bool {
        matches!(self, Self::Synced)
    }
}

/// Record names compare with trailing dots stripped: the provider stores
/// `mc.example.com.` while configuration usually says `mc.example.com`.
pub fn normalized_name(name: &str) -> &str {
    name.trim_end_matches('.')
}

pub fn names_equal(left: &str, right: &str) -> bool {
    normalized_name(left) == normalized_name(right)
}

pub fn record_matches(observation: &RecordObservation, query_name: &str, query_type: &str) -> bool {
    observation.record_type == query_type && names_equal(&observation.name, query_name)
}

/// First value of a record set. This system maintains single-value records,
/// so the first entry is the record's effective address.
pub fn record_value(observation: &RecordObservation) -> Option<&str> {
    observation.values.first().map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observation(name: &str, record_type: &str, value: &str) -> RecordObservation {
        RecordObservation {
            name: name.to_string(),
            record_type: record_type.to_string(),
            values: vec![value.to_string()],
        }
    }

    #[test]
    fn name_comparison_ignores_trailing_dots() {
        assert!(names_equal("example.com", "example.com."));
        assert!(names_equal("example.com.", "example.com"));
        assert!(names_equal("example.com..", "example.com"));
        assert!(!names_equal("example.com", "other.example.com."));
    }

    #[test]
    fn record_matches_requires_type_and_name() {
        let record = observation("mc.example.com.", "A", "203.0.113.5");
        assert!(record_matches(&record, "mc.example.com", "A"));
        assert!(!record_matches(&record, "mc.example.com", "CNAME"));
        assert!(!record_matches(&record, "other.example.com", "A"));
    }

    #[test]
    fn a_record_change_carries_fixed_ttl() {
        let change = RecordChange::a_record("mc.example.com", "203.0.113.5");
        assert_eq!(change.record_type, "A");
        assert_eq!(change.ttl_seconds, 300);
        assert_eq!(change.value, "203.0.113.5");
    }

    #[test]
    fn outcome_messages_match_the_public_surface() {
        assert_eq!(SyncOutcome::Synced.message(), "Success");
        assert_eq!(
            SyncOutcome::NoPublicAddress.message(),
            "DNS Sync Failed: No public IP"
        );
        assert_eq!(
            SyncOutcome::NoHostedZone.message(),
            "DNS Sync Failed: No hosted zone found"
        );
        assert!(SyncOutcome::Synced.wrote_record());
        assert!(!SyncOutcome::NoPublicAddress.wrote_record());
    }

    #[test]
    fn record_value_reads_the_first_entry() {
        let record = observation("mc.example.com.", "A", "203.0.113.5");
        assert_eq!(record_value(&record), Some("203.0.113.5"));

        let empty = RecordObservation {
            name: "mc.example.com.".to_string(),
            record_type: "A".to_string(),
            values: Vec::new(),
        };
        assert_eq!(record_value(&empty), None);
    }
}
