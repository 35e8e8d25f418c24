use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

pub mod logging;

// ============================================================================
// Service Result Envelope
// ============================================================================

/// Uniform success/failure wrapper returned by service operations and API
/// endpoints in place of errors for expected failure paths.
///
/// Serialized as `{ "isSuccess": ..., "message": ..., "data": ... }` to match
/// the platform's JSON contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceResult<T> {
    pub is_success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ServiceResult<T> {
    /// Successful result carrying data.
    pub fn ok(data: T) -> Self {
        Self {
            is_success: true,
            message: None,
            data: Some(data),
        }
    }

    /// Successful result with an informational message.
    pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            is_success: true,
            message: Some(message.into()),
            data: Some(data),
        }
    }

    /// Expected failure (not-found, validation) with a caller-facing message.
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            is_success: false,
            message: Some(message.into()),
            data: None,
        }
    }

    pub fn is_failure(&self) -> bool {
        !self.is_success
    }

    /// Map the carried data, preserving success flag and message.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> ServiceResult<U> {
        ServiceResult {
            is_success: self.is_success,
            message: self.message,
            data: self.data.map(f),
        }
    }
}

// ============================================================================
// Entity Lifecycle
// ============================================================================

/// Lifecycle state of a persisted record.
///
/// Deletion is two-phase: `delete` tombstones the row with an explicit purge
/// deadline, and a sweeper physically removes it once `purge_after` has
/// passed. Rows map to two nullable columns (`deleted_at`, `purge_after`);
/// both null means `Active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "state")]
pub enum Lifecycle {
    Active,
    Tombstoned {
        deleted_at: DateTime<Utc>,
        purge_after: DateTime<Utc>,
    },
}

impl Lifecycle {
    pub fn is_active(&self) -> bool {
        matches!(self, Lifecycle::Active)
    }

    /// Tombstone state starting now with the given retention window.
    pub fn tombstoned(now: DateTime<Utc>, retention: Duration) -> Self {
        Lifecycle::Tombstoned {
            deleted_at: now,
            purge_after: now + retention,
        }
    }

    /// Rebuild the state from its column representation.
    pub fn from_columns(
        deleted_at: Option<DateTime<Utc>>,
        purge_after: Option<DateTime<Utc>>,
    ) -> Self {
        match (deleted_at, purge_after) {
            (Some(deleted_at), Some(purge_after)) => Lifecycle::Tombstoned {
                deleted_at,
                purge_after,
            },
            // A row tombstoned without a purge deadline stays recoverable
            // until one is stamped.
            (Some(deleted_at), None) => Lifecycle::Tombstoned {
                deleted_at,
                purge_after: DateTime::<Utc>::MAX_UTC,
            },
            _ => Lifecycle::Active,
        }
    }

    /// Column representation `(deleted_at, purge_after)`.
    pub fn columns(&self) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
        match self {
            Lifecycle::Active => (None, None),
            Lifecycle::Tombstoned {
                deleted_at,
                purge_after,
            } => (Some(*deleted_at), Some(*purge_after)),
        }
    }

    /// Whether the retention window has elapsed and the row may be purged.
    pub fn purge_due(&self, now: DateTime<Utc>) -> bool {
        match self {
            Lifecycle::Active => false,
            Lifecycle::Tombstoned { purge_after, .. } => *purge_after <= now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_serialization() {
        let result = ServiceResult::ok(42);
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(json, r#"{"isSuccess":true,"data":42}"#);

        let result: ServiceResult<i32> = ServiceResult::fail("not found");
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(json, r#"{"isSuccess":false,"message":"not found"}"#);
    }

    #[test]
    fn test_envelope_map() {
        let result = ServiceResult::ok(2).map(|v| v * 10);
        assert!(result.is_success);
        assert_eq!(result.data, Some(20));

        let result: ServiceResult<i32> = ServiceResult::fail("nope");
        let mapped = result.map(|v| v * 10);
        assert!(mapped.is_failure());
        assert_eq!(mapped.data, None);
    }

    #[test]
    fn test_lifecycle_roundtrip() {
        let now = Utc::now();
        let state = Lifecycle::tombstoned(now, Duration::days(30));
        let (deleted_at, purge_after) = state.columns();
        assert_eq!(Lifecycle::from_columns(deleted_at, purge_after), state);

        assert_eq!(Lifecycle::from_columns(None, None), Lifecycle::Active);
        assert!(Lifecycle::Active.is_active());
        assert!(!state.is_active());
    }

    #[test]
    fn test_purge_due() {
        let now = Utc::now();
        let state = Lifecycle::tombstoned(now - Duration::days(31), Duration::days(30));
        assert!(state.purge_due(now));

        let state = Lifecycle::tombstoned(now, Duration::days(30));
        assert!(!state.purge_due(now));
        assert!(!Lifecycle::Active.purge_due(now));
    }
}
