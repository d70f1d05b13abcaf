//! Records returned by the placeholder posts API.

use serde::{Deserialize, Serialize};

/// A single post resource.
///
/// Every field is required on the wire; payloads missing one, or carrying one
/// of the wrong JSON type, fail to decode.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Identifier, unique within the origin dataset.
    pub id: u64,
    pub title: String,
    pub body: String,
    /// Reference to the authoring user. Not resolved by this client.
    pub user_id: u64,
}
