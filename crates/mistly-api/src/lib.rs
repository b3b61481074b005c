//! Async Rust client for the Juniper Mist cloud API.
//!
//! Scope is deliberately narrow: the handful of read-only endpoints the
//! licensing comparison needs (`/self/self`, org details, license
//! summaries, license usage by site, inventory counts). This is not a
//! general Mist SDK.
//!
//! One [`MistClient`] per API token; callers comparing orgs across
//! tokens hold several and merge the results in `mistly-core`.

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use client::{DEFAULT_HOST, MistClient};
pub use error::Error;
pub use models::{
    DeviceClass, InventoryCountSummary, LicenseAmendment, LicenseSummary, OrgInfo, Privilege,
    SelfInfo, SiteLicenseUsage,
};
pub use transport::TransportConfig;
