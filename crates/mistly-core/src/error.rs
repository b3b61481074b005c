use thiserror::Error;

/// Errors produced by discovery, fetching, and aggregation.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Api(#[from] mistly_api::Error),

    /// Every credential was tried and none surfaced an organization.
    #[error("no organizations discovered across {tokens} credential(s)")]
    NoOrganizations { tokens: usize },

    #[error("invalid purchased count {spec:?}: {reason}")]
    InvalidPurchased { spec: String, reason: String },
}
