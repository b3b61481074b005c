//! Core domain model and aggregation for Mist license comparison.
//!
//! This crate turns raw cloud payloads into a comparable, normalized
//! view across organizations:
//!
//! - [`catalog`]: the SKU table (category, description, bundle rules)
//! - [`model`]: domain types shared by fetching and aggregation
//! - [`fetch`]: multi-token discovery and concurrent snapshot fetching
//! - [`aggregate`]: the pure normalization and comparison pass
//! - [`export`]: CSV rendering of a comparison
//!
//! The split keeps the aggregation pass free of I/O: fetch snapshots
//! with [`fetch::fetch_comparison`], then hand them to
//! [`aggregate::build_comparison`].

pub mod aggregate;
pub mod catalog;
pub mod error;
pub mod export;
pub mod fetch;
pub mod model;

pub use aggregate::{
    apply_bundle_credits, build_comparison, compute_remaining, merge_organizations, normalize,
    PurchasedCounts,
};
pub use catalog::{BundleComponent, BundleRule, SkuCatalog, SkuInfo};
pub use error::CoreError;
pub use export::{comparison_to_csv, csv_table};
pub use fetch::{discover_organizations, fetch_comparison, fetch_org_snapshot, TokenClient};
pub use model::{
    ComparisonResult, InventoryCounts, LicenseCategory, LicenseEntry, OrgRow, OrgSnapshot,
    Organization, SkuColumn, SkuTotals,
};
