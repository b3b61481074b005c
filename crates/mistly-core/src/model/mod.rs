//! Canonical domain types for the licensing comparison.

mod comparison;
mod inventory;
mod license;
mod org;

pub use comparison::{ComparisonResult, OrgRow, OrgSnapshot, SkuColumn, SkuTotals};
pub use inventory::InventoryCounts;
pub use license::{LicenseCategory, LicenseEntry};
pub use org::Organization;
