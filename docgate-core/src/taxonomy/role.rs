//! Job-function roles and their default permission grants

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::Permission;
use crate::error::TaxonomyError;

/// Role of a principal (ordered hierarchy, guest lowest)
///
/// The discriminant is the role's rank. Ordering comparisons between roles
/// follow rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Unauthenticated or trial visitor
    Guest = 0,
    /// Read-only access to documents and dashboards
    Viewer = 1,
    /// Works with documents, search, analytics and risk assessments
    Analyst = 2,
    /// Manages a team's documents, compliance and invitations
    Manager = 3,
    /// Full control over the workspace
    Admin = 4,
}

impl Role {
    /// All roles, lowest rank first
    pub const ALL: [Role; 5] = [
        Role::Guest,
        Role::Viewer,
        Role::Analyst,
        Role::Manager,
        Role::Admin,
    ];

    /// Position of this role in the hierarchy (0 = guest)
    pub fn rank(self) -> u8 {
        self as u8
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Guest => "guest",
            Role::Viewer => "viewer",
            Role::Analyst => "analyst",
            Role::Manager => "manager",
            Role::Admin => "admin",
        }
    }

    /// True when this role ranks at or above `required`
    pub fn includes(self, required: Role) -> bool {
        self.rank() >= required.rank()
    }

    /// Permissions granted to every principal holding this role.
    ///
    /// Rows are not supersets of lower-ranked rows; look up by exact role.
    pub fn default_permissions(self) -> &'static [Permission] {
        match self {
            Role::Guest => GUEST_PERMISSIONS,
            Role::Viewer => VIEWER_PERMISSIONS,
            Role::Analyst => ANALYST_PERMISSIONS,
            Role::Manager => MANAGER_PERMISSIONS,
            Role::Admin => ADMIN_PERMISSIONS,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = TaxonomyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| TaxonomyError::UnknownRole(s.to_string()))
    }
}

use Permission::*;

const GUEST_PERMISSIONS: &[Permission] = &[DocumentsRead, SearchBasic];

const VIEWER_PERMISSIONS: &[Permission] = &[
    DocumentsRead,
    SearchBasic,
    AnalyticsView,
    ComplianceView,
    RiskView,
];

const ANALYST_PERMISSIONS: &[Permission] = &[
    DocumentsRead,
    DocumentsWrite,
    UploadFiles,
    SearchBasic,
    SearchAdvanced,
    SearchAi,
    AnalyticsView,
    AnalyticsExport,
    ComplianceView,
    ComplianceReports,
    RiskView,
    RiskAssess,
    DataExport,
];

const MANAGER_PERMISSIONS: &[Permission] = &[
    DocumentsRead,
    DocumentsWrite,
    DocumentsShare,
    UploadFiles,
    UploadBulk,
    SearchBasic,
    SearchAdvanced,
    SearchAi,
    SearchHistory,
    AnalyticsView,
    AnalyticsExport,
    AnalyticsCustom,
    ComplianceView,
    ComplianceManage,
    ComplianceReports,
    RiskView,
    RiskAssess,
    RiskManage,
    UsersView,
    UsersInvite,
    SettingsView,
    DataExport,
    BulkOperations,
];

const ADMIN_PERMISSIONS: &[Permission] = &[
    DocumentsRead,
    DocumentsWrite,
    DocumentsDelete,
    DocumentsShare,
    DocumentsExport,
    UploadFiles,
    UploadBulk,
    UploadApi,
    SearchBasic,
    SearchAdvanced,
    SearchAi,
    SearchHistory,
    AnalyticsView,
    AnalyticsExport,
    AnalyticsCustom,
    ComplianceView,
    ComplianceManage,
    ComplianceReports,
    RiskView,
    RiskAssess,
    RiskManage,
    UsersView,
    UsersManage,
    UsersInvite,
    SettingsView,
    SettingsManage,
    SettingsIntegrations,
    ApiRead,
    ApiWrite,
    ApiAdmin,
    DataExport,
    BulkOperations,
    WorkflowAutomation,
    AuditLogs,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranks_follow_declaration_order() {
        let ranks: Vec<u8> = Role::ALL.iter().map(|r| r.rank()).collect();
        assert_eq!(ranks, vec![0, 1, 2, 3, 4]);
        assert!(Role::Guest < Role::Viewer);
        assert!(Role::Manager < Role::Admin);
    }

    #[test]
    fn test_includes_is_hierarchical() {
        assert!(Role::Admin.includes(Role::Manager));
        assert!(Role::Manager.includes(Role::Manager));
        assert!(!Role::Viewer.includes(Role::Analyst));
    }

    #[test]
    fn test_parse_roundtrips_display() {
        for role in Role::ALL {
            assert_eq!(role.to_string().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn test_parse_unknown_role() {
        let err = "owner".parse::<Role>().unwrap_err();
        assert_eq!(err, TaxonomyError::UnknownRole("owner".to_string()));
    }

    #[test]
    fn test_guest_row() {
        assert_eq!(
            Role::Guest.default_permissions(),
            &[Permission::DocumentsRead, Permission::SearchBasic]
        );
    }

    #[test]
    fn test_manager_row_lacks_admin_only_grants() {
        let row = Role::Manager.default_permissions();
        assert!(row.contains(&Permission::UsersInvite));
        assert!(!row.contains(&Permission::UsersManage));
        assert!(!row.contains(&Permission::DocumentsDelete));
        assert_eq!(row.len(), 23);
    }

    #[test]
    fn test_admin_row_size() {
        assert_eq!(Role::Admin.default_permissions().len(), 34);
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&Role::Analyst).unwrap();
        assert_eq!(json, "\"analyst\"");
        let role: Role = serde_json::from_str("\"manager\"").unwrap();
        assert_eq!(role, Role::Manager);
    }
}
