// ── Organization domain type ──

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A Mist organization as discovered through a token's privilege list.
///
/// Organizations are deduplicated by `id` across tokens; the first token
/// to surface an org keeps the `token_origin` association for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub id: Uuid,
    pub name: String,
    /// Label of the credential this org was first discovered under.
    pub token_origin: String,
    /// The caller's role in this org (if the privilege entry carried one).
    pub role: Option<String>,
}
