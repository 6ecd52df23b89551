//! Block types.

use serde::Deserialize;
use serde_with::{DisplayFromStr, serde_as};

use super::Identifier;

/// Block header fields needed to reference a block from a transaction.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BlockHeader {
    /// Block ID.
    pub id: Identifier,
    /// Parent block ID.
    pub parent_id: Identifier,
    /// Block height.
    #[serde_as(as = "DisplayFromStr")]
    pub height: u64,
    /// RFC 3339 timestamp as reported by the node.
    pub timestamp: String,
}

/// A block returned by the Access API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Block {
    pub header: BlockHeader,
}

impl Block {
    /// Block ID.
    pub fn id(&self) -> Identifier {
        self.header.id
    }

    /// Block height.
    pub fn height(&self) -> u64 {
        self.header.height
    }
}
