//! Permission tags and product feature flags
//!
//! Both are closed sets. Their string forms are what upstream identity data
//! and policy files carry; parsing rejects anything not listed here.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TaxonomyError;

/// Declares a closed, string-tagged enum with `ALL`, `as_str`, `Display`,
/// `FromStr` and string serde impls.
macro_rules! tagged_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $err:ident {
            $($(#[$vmeta:meta])* $variant:ident => $tag:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $($(#[$vmeta])* $variant,)+
        }

        impl $name {
            /// Every value, in declaration order
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $tag,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = TaxonomyError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($tag => Ok($name::$variant),)+
                    other => Err(TaxonomyError::$err(other.to_string())),
                }
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

tagged_enum! {
    /// An explicitly grantable capability, tagged `resource:action`
    ///
    /// The last four variants carry no resource prefix; the role table grants
    /// them under the same names as the matching features.
    Permission, UnknownPermission {
        DocumentsRead => "documents:read",
        DocumentsWrite => "documents:write",
        DocumentsDelete => "documents:delete",
        DocumentsShare => "documents:share",
        DocumentsExport => "documents:export",
        UploadFiles => "upload:files",
        UploadBulk => "upload:bulk",
        UploadApi => "upload:api",
        SearchBasic => "search:basic",
        SearchAdvanced => "search:advanced",
        SearchAi => "search:ai",
        SearchHistory => "search:history",
        AnalyticsView => "analytics:view",
        AnalyticsExport => "analytics:export",
        AnalyticsCustom => "analytics:custom",
        ComplianceView => "compliance:view",
        ComplianceManage => "compliance:manage",
        ComplianceReports => "compliance:reports",
        RiskView => "risk:view",
        RiskAssess => "risk:assess",
        RiskManage => "risk:manage",
        UsersView => "users:view",
        UsersManage => "users:manage",
        UsersInvite => "users:invite",
        SettingsView => "settings:view",
        SettingsManage => "settings:manage",
        SettingsIntegrations => "settings:integrations",
        ApiRead => "api:read",
        ApiWrite => "api:write",
        ApiAdmin => "api:admin",
        DataExport => "data_export",
        BulkOperations => "bulk_operations",
        WorkflowAutomation => "workflow_automation",
        AuditLogs => "audit_logs",
    }
}

impl Permission {
    /// The resource half of the tag (`documents` for `documents:read`)
    pub fn resource(self) -> Option<&'static str> {
        self.as_str().split_once(':').map(|(resource, _)| resource)
    }
}

tagged_enum! {
    /// A product capability unlocked by subscription tier or explicit grant
    Feature, UnknownFeature {
        DocumentUpload => "document_upload",
        AiSearch => "ai_search",
        AdvancedAnalytics => "advanced_analytics",
        ComplianceReports => "compliance_reports",
        RiskAssessment => "risk_assessment",
        UserManagement => "user_management",
        ApiAccess => "api_access",
        CustomBranding => "custom_branding",
        PrioritySupport => "priority_support",
        SsoIntegration => "sso_integration",
        AuditLogs => "audit_logs",
        DataExport => "data_export",
        BulkOperations => "bulk_operations",
        WorkflowAutomation => "workflow_automation",
        CustomFields => "custom_fields",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_parse() {
        assert_eq!(
            "documents:write".parse::<Permission>().unwrap(),
            Permission::DocumentsWrite
        );
        assert_eq!(
            "bulk_operations".parse::<Permission>().unwrap(),
            Permission::BulkOperations
        );
    }

    #[test]
    fn test_permission_parse_unknown() {
        let err = "documents:burn".parse::<Permission>().unwrap_err();
        assert_eq!(
            err,
            TaxonomyError::UnknownPermission("documents:burn".to_string())
        );
    }

    #[test]
    fn test_permission_resource() {
        assert_eq!(Permission::RiskAssess.resource(), Some("risk"));
        assert_eq!(Permission::AuditLogs.resource(), None);
    }

    #[test]
    fn test_permission_tags_are_unique() {
        let mut tags: Vec<&str> = Permission::ALL.iter().map(|p| p.as_str()).collect();
        tags.sort_unstable();
        tags.dedup();
        assert_eq!(tags.len(), Permission::ALL.len());
        assert_eq!(Permission::ALL.len(), 34);
    }

    #[test]
    fn test_feature_parse() {
        assert_eq!("ai_search".parse::<Feature>().unwrap(), Feature::AiSearch);
        assert!(matches!(
            "teleport".parse::<Feature>(),
            Err(TaxonomyError::UnknownFeature(_))
        ));
        assert_eq!(Feature::ALL.len(), 15);
    }

    #[test]
    fn test_serde_uses_tag_text() {
        let json = serde_json::to_string(&vec![Permission::ApiWrite]).unwrap();
        assert_eq!(json, r#"["api:write"]"#);
        let feature: Feature = serde_json::from_str(r#""sso_integration""#).unwrap();
        assert_eq!(feature, Feature::SsoIntegration);
    }

    #[test]
    fn test_serde_rejects_unknown_tag() {
        let result: Result<Permission, _> = serde_json::from_str(r#""root:everything""#);
        let err = result.unwrap_err();
        assert!(err.to_string().contains("unknown permission"));
    }
}
