//! docgate-core: access decisions for the document workspace
//!
//! This crate decides whether a principal may perform an operation, based on
//! its role, its subscription tier and its explicit grants:
//!
//! - **Taxonomy** - [`Role`], [`SubscriptionTier`], [`Permission`], [`Feature`]
//!   and the static role/tier tables in [`taxonomy`]
//! - **Principal** - [`Principal`], the subject a decision is about
//! - **Engine** - single-criterion checks and the composite [`can_access`]
//! - **Quota** - [`is_within_limit`] and [`remaining_limit`] over tier limits,
//!   and [`authorize_action`] for action types
//! - **Policy** - named rules ([`AccessPolicy`]) loaded from TOML
//!
//! # Quick Start
//!
//! ```
//! use docgate_core::{AccessQuery, Permission, Principal, Role, SubscriptionTier, can_access};
//!
//! let principal = Principal::from_defaults("42", Role::Analyst, SubscriptionTier::Basic, None, None);
//! let query = AccessQuery::new()
//!     .require_permission(Permission::DocumentsWrite)
//!     .require_subscription(SubscriptionTier::Basic);
//!
//! assert!(can_access(Some(&principal), &query));
//! assert!(!can_access(None, &query));
//! ```
//!
//! Every check is a pure function of its arguments and the constant tables;
//! nothing here performs I/O except [`AccessPolicy::load_from_path`].

pub mod engine;
pub mod error;
pub mod policy;
pub mod principal;
pub mod quota;
pub mod taxonomy;

// Re-export key types for convenience
pub use engine::{
    AccessQuery, Denial, Engine, EngineConfig, can_access, has_feature, has_permission,
    has_role, has_subscription,
};
pub use error::{DocgateError, PolicyError, TaxonomyError};
pub use policy::AccessPolicy;
pub use principal::Principal;
pub use quota::{
    LimitStatus, Remaining, Usage, authorize_action, feature_for_action, is_within_limit,
    limit_for_action, remaining_limit, usage_percentage, usage_report,
};
pub use taxonomy::{Feature, Limit, LimitKey, Permission, Role, SubscriptionTier, TierLimits};
