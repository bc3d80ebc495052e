//! Property tests for access decisions
//!
//! Decisions must satisfy:
//! 1. Permission checks agree with the union of explicit, custom and role grants
//! 2. Subscription checks follow tier rank
//! 3. `has_role` is exact while a query's `required_role` is hierarchical
//! 4. `can_access` is the conjunction of its criteria
//! 5. Quotas treat the limit as the first disallowed value and -1 as no cap

use std::collections::BTreeSet;

use proptest::prelude::*;

use docgate_core::{
    AccessQuery, Feature, LimitKey, Permission, Principal, Remaining, Role, SubscriptionTier,
    can_access, has_feature, has_permission, has_role, has_subscription, is_within_limit,
    remaining_limit,
};

// =============================================================================
// Strategy helpers
// =============================================================================

fn role_strategy() -> impl Strategy<Value = Role> {
    prop::sample::select(Role::ALL.to_vec())
}

fn tier_strategy() -> impl Strategy<Value = SubscriptionTier> {
    prop::sample::select(SubscriptionTier::ALL.to_vec())
}

fn permission_strategy() -> impl Strategy<Value = Permission> {
    prop::sample::select(Permission::ALL.to_vec())
}

fn feature_strategy() -> impl Strategy<Value = Feature> {
    prop::sample::select(Feature::ALL.to_vec())
}

fn limit_key_strategy() -> impl Strategy<Value = LimitKey> {
    prop::sample::select(LimitKey::ALL.to_vec())
}

/// A principal with arbitrary explicit and custom grants
fn principal_strategy() -> impl Strategy<Value = Principal> {
    (
        role_strategy(),
        tier_strategy(),
        prop::sample::subsequence(Permission::ALL.to_vec(), 0..=6),
        prop::option::of(prop::sample::subsequence(Permission::ALL.to_vec(), 0..=6)),
        prop::sample::subsequence(Feature::ALL.to_vec(), 0..=4),
    )
        .prop_map(|(role, tier, permissions, custom, features)| {
            let mut principal = Principal::new("prop", role, tier);
            principal.permissions = permissions.into_iter().collect();
            principal.custom_permissions = custom.map(|grants| grants.into_iter().collect());
            principal.features = features.into_iter().collect();
            principal
        })
}

fn basic_principal(role: Role, tier: SubscriptionTier) -> Principal {
    Principal::new("fixed", role, tier)
}

// =============================================================================
// Permission and feature membership
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn has_permission_matches_union_of_grants(
        principal in principal_strategy(),
        permission in permission_strategy(),
    ) {
        let mut union: BTreeSet<Permission> = principal.permissions.clone();
        if let Some(custom) = &principal.custom_permissions {
            union.extend(custom.iter().copied());
        }
        union.extend(principal.role.default_permissions().iter().copied());

        prop_assert_eq!(has_permission(Some(&principal), permission), union.contains(&permission));
        prop_assert_eq!(principal.effective_permissions(), union);
    }

    #[test]
    fn has_feature_matches_union_of_grants(
        principal in principal_strategy(),
        feature in feature_strategy(),
    ) {
        let expected = principal.features.contains(&feature)
            || principal.subscription_tier.limits().features.contains(&feature);
        prop_assert_eq!(has_feature(Some(&principal), feature), expected);
    }
}

// =============================================================================
// Ordering rules
// =============================================================================

proptest! {
    #[test]
    fn has_subscription_follows_rank(a in tier_strategy(), b in tier_strategy()) {
        let principal = basic_principal(Role::Viewer, a);
        prop_assert_eq!(has_subscription(Some(&principal), b), a.rank() >= b.rank());
    }

    #[test]
    fn has_role_is_exact_but_required_role_is_hierarchical(
        actual in role_strategy(),
        required in role_strategy(),
    ) {
        let principal = basic_principal(actual, SubscriptionTier::Free);
        prop_assert_eq!(has_role(Some(&principal), required), actual == required);

        let query = AccessQuery::new().require_role(required);
        prop_assert_eq!(can_access(Some(&principal), &query), actual.rank() >= required.rank());
    }
}

#[test]
fn basic_tier_subscription_examples() {
    let principal = basic_principal(Role::Viewer, SubscriptionTier::Basic);
    assert!(has_subscription(Some(&principal), SubscriptionTier::Free));
    assert!(has_subscription(Some(&principal), SubscriptionTier::Basic));
    assert!(!has_subscription(Some(&principal), SubscriptionTier::Standard));
}

#[test]
fn admin_role_asymmetry() {
    let admin = basic_principal(Role::Admin, SubscriptionTier::Free);
    assert!(!has_role(Some(&admin), Role::Manager));
    assert!(can_access(
        Some(&admin),
        &AccessQuery::new().require_role(Role::Manager)
    ));
}

// =============================================================================
// Composite checks
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn empty_query_depends_only_on_presence(principal in principal_strategy()) {
        prop_assert!(can_access(Some(&principal), &AccessQuery::new()));
        prop_assert!(!can_access(None, &AccessQuery::new()));
    }

    #[test]
    fn satisfiable_query_is_granted(
        principal in principal_strategy(),
        permission_picks in prop::collection::vec(any::<prop::sample::Index>(), 0..4),
        feature_picks in prop::collection::vec(any::<prop::sample::Index>(), 0..4),
        tier_floor in tier_strategy(),
        role_floor in role_strategy(),
    ) {
        let permissions: Vec<Permission> = principal.effective_permissions().into_iter().collect();
        let features: Vec<Feature> = principal.effective_features().into_iter().collect();

        let mut query = AccessQuery::new();
        if !permissions.is_empty() {
            query = query.require_permissions(permission_picks.iter().map(|i| *i.get(&permissions)));
        }
        if !features.is_empty() {
            query = query.require_features(feature_picks.iter().map(|i| *i.get(&features)));
        }
        query = query
            .require_subscription(tier_floor.min(principal.subscription_tier))
            .require_role(role_floor.min(principal.role));

        prop_assert!(can_access(Some(&principal), &query));
    }
}

/// Analyst on standard, no explicit grants
fn analyst_on_standard() -> Principal {
    basic_principal(Role::Analyst, SubscriptionTier::Standard)
}

/// A query the analyst on standard fully satisfies
fn satisfied_query() -> AccessQuery {
    AccessQuery::new()
        .require_permission(Permission::DocumentsWrite)
        .require_feature(Feature::RiskAssessment)
        .require_subscription(SubscriptionTier::Basic)
        .require_role(Role::Viewer)
}

#[test]
fn all_criteria_satisfied_grants_access() {
    assert!(can_access(Some(&analyst_on_standard()), &satisfied_query()));
}

#[test]
fn failing_permission_alone_denies() {
    let query = satisfied_query().require_permission(Permission::DocumentsDelete);
    assert!(!can_access(Some(&analyst_on_standard()), &query));
}

#[test]
fn failing_feature_alone_denies() {
    let query = satisfied_query().require_feature(Feature::AuditLogs);
    assert!(!can_access(Some(&analyst_on_standard()), &query));
}

#[test]
fn failing_subscription_alone_denies() {
    let query = satisfied_query().require_subscription(SubscriptionTier::Pro);
    assert!(!can_access(Some(&analyst_on_standard()), &query));
}

#[test]
fn failing_role_alone_denies() {
    let query = satisfied_query().require_role(Role::Manager);
    assert!(!can_access(Some(&analyst_on_standard()), &query));
}

#[test]
fn admin_enterprise_defaults_pass_every_role_permission() {
    let admin = Principal::from_defaults("root", Role::Admin, SubscriptionTier::Enterprise, None, None);
    for permission in Role::Admin.default_permissions() {
        let query = AccessQuery::new().require_permission(*permission);
        assert!(can_access(Some(&admin), &query), "{permission} denied");
    }
}

#[test]
fn role_table_rows_are_read_literally() {
    // Rows are not monotone supersets; only check literal contents.
    let manager = basic_principal(Role::Manager, SubscriptionTier::Free);
    assert!(has_permission(Some(&manager), Permission::UsersInvite));
    assert!(!has_permission(Some(&manager), Permission::UsersManage));

    let viewer = basic_principal(Role::Viewer, SubscriptionTier::Free);
    assert!(has_permission(Some(&viewer), Permission::RiskView));
    assert!(!has_permission(Some(&viewer), Permission::DocumentsWrite));
}

// =============================================================================
// Quotas
// =============================================================================

#[test]
fn free_documents_boundary_is_exclusive() {
    let principal = basic_principal(Role::Viewer, SubscriptionTier::Free);
    assert!(is_within_limit(Some(&principal), LimitKey::MaxDocuments, 9));
    assert!(!is_within_limit(Some(&principal), LimitKey::MaxDocuments, 10));
}

#[test]
fn basic_documents_remaining() {
    let principal = basic_principal(Role::Viewer, SubscriptionTier::Basic);
    assert_eq!(
        remaining_limit(Some(&principal), LimitKey::MaxDocuments, 12),
        Remaining::Finite(88)
    );
    assert_eq!(
        remaining_limit(Some(&principal), LimitKey::MaxDocuments, 150),
        Remaining::Finite(0)
    );
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn enterprise_is_never_over_limit(key in limit_key_strategy(), usage in any::<u64>()) {
        let principal = basic_principal(Role::Guest, SubscriptionTier::Enterprise);
        prop_assert!(is_within_limit(Some(&principal), key, usage));
        prop_assert_eq!(remaining_limit(Some(&principal), key, usage), Remaining::Unbounded);
    }

    #[test]
    fn finite_quota_arithmetic(
        tier in prop::sample::select(vec![
            SubscriptionTier::Free,
            SubscriptionTier::Basic,
            SubscriptionTier::Standard,
            SubscriptionTier::Pro,
        ]),
        key in limit_key_strategy(),
        usage in 0u64..200_000,
    ) {
        let principal = basic_principal(Role::Guest, tier);
        let limit = u64::try_from(tier.limits().raw(key)).unwrap();

        prop_assert_eq!(is_within_limit(Some(&principal), key, usage), usage < limit);
        prop_assert_eq!(
            remaining_limit(Some(&principal), key, usage),
            Remaining::Finite(limit.saturating_sub(usage))
        );
    }

    #[test]
    fn absent_principal_has_no_quota(key in limit_key_strategy(), usage in any::<u64>()) {
        prop_assert!(!is_within_limit(None, key, usage));
        prop_assert_eq!(remaining_limit(None, key, usage), Remaining::Finite(0));
    }
}
