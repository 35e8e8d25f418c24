//! Subscription Entity
//!
//! A user's plan membership. Subscriptions expire on a deadline; the
//! expired-subscription cleanup task flips lapsed Active rows to Expired and
//! tombstones them.

use chrono::{DateTime, Utc};
use el_common::Lifecycle;
use serde::{Deserialize, Serialize};

use crate::resource::{Exportable, FieldSpec, Resource};

/// Subscription status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionStatus {
    Active,
    Expired,
    Cancelled,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Active => "ACTIVE",
            SubscriptionStatus::Expired => "EXPIRED",
            SubscriptionStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "ACTIVE" => Some(SubscriptionStatus::Active),
            "EXPIRED" => Some(SubscriptionStatus::Expired),
            "CANCELLED" => Some(SubscriptionStatus::Cancelled),
            _ => None,
        }
    }
}

impl Default for SubscriptionStatus {
    fn default() -> Self {
        Self::Active
    }
}

#[derive(Debug, Clone)]
pub struct Subscription {
    pub id: i64,
    pub user_id: i64,
    pub plan_code: String,
    pub status: SubscriptionStatus,
    pub expires_at: Option<DateTime<Utc>>,
    pub lifecycle: Lifecycle,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create subscription request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubscription {
    pub user_id: i64,
    pub plan_code: String,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Partial update request; unset fields leave the entity untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSubscription {
    pub plan_code: Option<String>,
    pub status: Option<SubscriptionStatus>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Subscription response DTO
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionDetails {
    pub id: i64,
    pub user_id: i64,
    pub plan_code: String,
    pub status: SubscriptionStatus,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Resource for Subscription {
    const NAME: &'static str = "subscriptions";

    type Create = CreateSubscription;
    type Update = UpdateSubscription;
    type Details = SubscriptionDetails;

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    fn set_lifecycle(&mut self, lifecycle: Lifecycle) {
        self.lifecycle = lifecycle;
    }

    fn from_create(dto: CreateSubscription, now: DateTime<Utc>) -> Self {
        Self {
            id: 0,
            user_id: dto.user_id,
            plan_code: dto.plan_code,
            status: SubscriptionStatus::Active,
            expires_at: dto.expires_at,
            lifecycle: Lifecycle::Active,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_update(&mut self, dto: UpdateSubscription, now: DateTime<Utc>) {
        if let Some(plan_code) = dto.plan_code {
            self.plan_code = plan_code;
        }
        if let Some(status) = dto.status {
            self.status = status;
        }
        if let Some(expires_at) = dto.expires_at {
            self.expires_at = Some(expires_at);
        }
        self.updated_at = now;
    }

    fn details(&self) -> SubscriptionDetails {
        SubscriptionDetails {
            id: self.id,
            user_id: self.user_id,
            plan_code: self.plan_code.clone(),
            status: self.status,
            expires_at: self.expires_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl Exportable for SubscriptionDetails {
    const FIELDS: &'static [FieldSpec<Self>] = &[
        FieldSpec {
            name: "id",
            get: |s| s.id.to_string(),
        },
        FieldSpec {
            name: "userId",
            get: |s| s.user_id.to_string(),
        },
        FieldSpec {
            name: "planCode",
            get: |s| s.plan_code.clone(),
        },
        FieldSpec {
            name: "status",
            get: |s| s.status.as_str().to_string(),
        },
        FieldSpec {
            name: "expiresAt",
            get: |s| s.expires_at.map(|t| t.to_rfc3339()).unwrap_or_default(),
        },
        FieldSpec {
            name: "createdAt",
            get: |s| s.created_at.to_rfc3339(),
        },
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_roundtrip() {
        for status in [
            SubscriptionStatus::Active,
            SubscriptionStatus::Expired,
            SubscriptionStatus::Cancelled,
        ] {
            assert_eq!(SubscriptionStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(SubscriptionStatus::parse("bogus"), None);
    }

    #[test]
    fn test_update_preserves_unset_fields() {
        let mut sub = Subscription::from_create(
            CreateSubscription {
                user_id: 1,
                plan_code: "starter".to_string(),
                expires_at: None,
            },
            Utc::now(),
        );

        sub.apply_update(
            UpdateSubscription {
                plan_code: None,
                status: Some(SubscriptionStatus::Cancelled),
                expires_at: None,
            },
            Utc::now(),
        );

        assert_eq!(sub.plan_code, "starter");
        assert_eq!(sub.status, SubscriptionStatus::Cancelled);
        assert_eq!(sub.expires_at, None);
    }
}
