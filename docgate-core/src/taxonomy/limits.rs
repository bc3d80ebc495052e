//! Per-tier quota limits and default features

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};

use super::Feature;
use crate::error::TaxonomyError;

/// Raw table value meaning "no cap"
pub const UNLIMITED: i64 = -1;

/// Named quota field of a tier's limit table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LimitKey {
    MaxDocuments,
    MaxUsers,
    /// Storage in GB
    MaxStorage,
    MaxApiCalls,
    MaxExports,
    RetentionDays,
}

impl LimitKey {
    pub const ALL: [LimitKey; 6] = [
        LimitKey::MaxDocuments,
        LimitKey::MaxUsers,
        LimitKey::MaxStorage,
        LimitKey::MaxApiCalls,
        LimitKey::MaxExports,
        LimitKey::RetentionDays,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LimitKey::MaxDocuments => "maxDocuments",
            LimitKey::MaxUsers => "maxUsers",
            LimitKey::MaxStorage => "maxStorage",
            LimitKey::MaxApiCalls => "maxApiCalls",
            LimitKey::MaxExports => "maxExports",
            LimitKey::RetentionDays => "retentionDays",
        }
    }

    fn snake_case(self) -> &'static str {
        match self {
            LimitKey::MaxDocuments => "max_documents",
            LimitKey::MaxUsers => "max_users",
            LimitKey::MaxStorage => "max_storage",
            LimitKey::MaxApiCalls => "max_api_calls",
            LimitKey::MaxExports => "max_exports",
            LimitKey::RetentionDays => "retention_days",
        }
    }
}

impl fmt::Display for LimitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LimitKey {
    type Err = TaxonomyError;

    /// Accepts both `maxDocuments` and `max_documents`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LimitKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s || key.snake_case() == s)
            .ok_or_else(|| TaxonomyError::UnknownLimit(s.to_string()))
    }
}

/// A decoded limit value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    Finite(u64),
    Unlimited,
}

impl Limit {
    /// Decode a raw table value. `-1` (or any negative value) is unlimited.
    pub fn from_raw(raw: i64) -> Self {
        u64::try_from(raw).map_or(Limit::Unlimited, Limit::Finite)
    }

    pub fn is_unlimited(self) -> bool {
        matches!(self, Limit::Unlimited)
    }

    /// `true` when `usage` is strictly below the limit
    pub fn allows(self, usage: u64) -> bool {
        match self {
            Limit::Finite(limit) => usage < limit,
            Limit::Unlimited => true,
        }
    }
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Limit::Finite(value) => write!(f, "{value}"),
            Limit::Unlimited => f.write_str("unlimited"),
        }
    }
}

/// Finite limits serialize as numbers, unlimited as null
impl Serialize for Limit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Limit::Finite(value) => serializer.serialize_u64(*value),
            Limit::Unlimited => serializer.serialize_none(),
        }
    }
}

/// Quota record for one subscription tier
///
/// Every numeric field uses [`UNLIMITED`] (`-1`) for "no cap".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TierLimits {
    pub max_documents: i64,
    pub max_users: i64,
    /// In GB
    pub max_storage: i64,
    pub max_api_calls: i64,
    pub max_exports: i64,
    pub retention_days: i64,
    /// Features every principal on this tier gets by default
    pub features: &'static [Feature],
}

impl TierLimits {
    /// Raw table value for `key`, sentinel included
    pub fn raw(&self, key: LimitKey) -> i64 {
        match key {
            LimitKey::MaxDocuments => self.max_documents,
            LimitKey::MaxUsers => self.max_users,
            LimitKey::MaxStorage => self.max_storage,
            LimitKey::MaxApiCalls => self.max_api_calls,
            LimitKey::MaxExports => self.max_exports,
            LimitKey::RetentionDays => self.retention_days,
        }
    }

    pub fn get(&self, key: LimitKey) -> Limit {
        Limit::from_raw(self.raw(key))
    }
}

use Feature::*;

pub(crate) const FREE: TierLimits = TierLimits {
    max_documents: 10,
    max_users: 1,
    max_storage: 1,
    max_api_calls: 100,
    max_exports: 5,
    retention_days: 30,
    features: &[DocumentUpload, AiSearch],
};

pub(crate) const BASIC: TierLimits = TierLimits {
    max_documents: 100,
    max_users: 5,
    max_storage: 10,
    max_api_calls: 1_000,
    max_exports: 50,
    retention_days: 90,
    features: &[
        DocumentUpload,
        AiSearch,
        AdvancedAnalytics,
        ComplianceReports,
        DataExport,
    ],
};

pub(crate) const STANDARD: TierLimits = TierLimits {
    max_documents: 1_000,
    max_users: 25,
    max_storage: 100,
    max_api_calls: 10_000,
    max_exports: 500,
    retention_days: 365,
    features: &[
        DocumentUpload,
        AiSearch,
        AdvancedAnalytics,
        ComplianceReports,
        RiskAssessment,
        DataExport,
        BulkOperations,
        CustomFields,
    ],
};

pub(crate) const PRO: TierLimits = TierLimits {
    max_documents: 10_000,
    max_users: 100,
    max_storage: 1_000,
    max_api_calls: 100_000,
    max_exports: 5_000,
    // three years
    retention_days: 1_095,
    features: &[
        DocumentUpload,
        AiSearch,
        AdvancedAnalytics,
        ComplianceReports,
        RiskAssessment,
        UserManagement,
        ApiAccess,
        DataExport,
        BulkOperations,
        CustomFields,
        WorkflowAutomation,
        AuditLogs,
    ],
};

pub(crate) const ENTERPRISE: TierLimits = TierLimits {
    max_documents: UNLIMITED,
    max_users: UNLIMITED,
    max_storage: UNLIMITED,
    max_api_calls: UNLIMITED,
    max_exports: UNLIMITED,
    retention_days: UNLIMITED,
    features: &[
        DocumentUpload,
        AiSearch,
        AdvancedAnalytics,
        ComplianceReports,
        RiskAssessment,
        UserManagement,
        ApiAccess,
        CustomBranding,
        PrioritySupport,
        SsoIntegration,
        DataExport,
        BulkOperations,
        CustomFields,
        WorkflowAutomation,
        AuditLogs,
    ],
};
