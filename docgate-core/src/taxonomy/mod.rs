//! Closed taxonomies and the static tables built over them
//!
//! Roles and subscription tiers are ordered; permissions and features are
//! flat tag sets. The role permission table and the tier limit table are
//! compile-time constants reached through [`Role::default_permissions`] and
//! [`SubscriptionTier::limits`], so every lookup is an exhaustive match.

mod capability;
mod limits;
mod role;
mod tier;

pub use capability::{Feature, Permission};
pub use limits::{Limit, LimitKey, TierLimits, UNLIMITED};
pub use role::Role;
pub use tier::SubscriptionTier;
