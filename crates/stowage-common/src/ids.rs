//! Typed record identifier.
//!
//! Every attachable table uses a 64-bit integer primary key. `RecordId` wraps
//! it so ids cannot be confused with counters or schema versions.

use serde::{Deserialize, Serialize};

/// Primary key of an attachable record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(i64);

impl RecordId {
    /// Raw integer value.
    pub fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<RecordId> for i64 {
    fn from(id: RecordId) -> Self {
        id.0
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_id_conversions() {
        let id = RecordId::from(42);
        assert_eq!(id.get(), 42);
        assert_eq!(i64::from(id), 42);
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn test_record_id_ordering() {
        assert!(RecordId::from(1) < RecordId::from(2));
    }

    #[test]
    fn test_record_id_serde_transparent() {
        let json = serde_json::to_string(&RecordId::from(109_000_000_000_000_001)).unwrap();
        assert_eq!(json, "109000000000000001");
    }
}
