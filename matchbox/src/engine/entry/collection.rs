//! Collection Entry Types
//!
//! A collection entry is a user's recorded status for one sticker. Stores
//! hand entries out already joined with the sticker's collector number.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::StoreError;

/// Tri-state status of one sticker in one user's collection
///
/// The wire values are the ones persisted by the collection screens:
/// `yes`, `no` and `double`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StickerStatus {
    /// The user owns exactly what they need of this sticker
    #[serde(rename = "yes")]
    Owned,
    /// The user explicitly marked this sticker as missing
    #[serde(rename = "no")]
    Missing,
    /// The user holds spare copies available for trading
    #[serde(rename = "double")]
    Duplicate,
}

impl StickerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StickerStatus::Owned => "yes",
            StickerStatus::Missing => "no",
            StickerStatus::Duplicate => "double",
        }
    }
}

impl fmt::Display for StickerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StickerStatus {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "yes" => Ok(StickerStatus::Owned),
            "no" => Ok(StickerStatus::Missing),
            "double" => Ok(StickerStatus::Duplicate),
            other => Err(StoreError::Malformed(format!(
                "unknown sticker status {:?}",
                other
            ))),
        }
    }
}

/// One sticker's status for a given user, as returned by a collection store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionEntry {
    pub sticker_number: String,
    pub status: StickerStatus,
}

impl CollectionEntry {
    pub fn new(sticker_number: impl Into<String>, status: StickerStatus) -> Self {
        Self {
            sticker_number: sticker_number.into(),
            status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_values() {
        assert_eq!("yes".parse::<StickerStatus>().unwrap(), StickerStatus::Owned);
        assert_eq!("no".parse::<StickerStatus>().unwrap(), StickerStatus::Missing);
        assert_eq!(
            "double".parse::<StickerStatus>().unwrap(),
            StickerStatus::Duplicate
        );
        assert_eq!(StickerStatus::Duplicate.to_string(), "double");
    }

    #[test]
    fn test_unknown_status_is_malformed() {
        let err = "maybe".parse::<StickerStatus>().unwrap_err();
        assert!(matches!(err, StoreError::Malformed(_)));
    }

    #[test]
    fn test_status_serde_uses_wire_values() {
        let entry = CollectionEntry::new("12", StickerStatus::Missing);
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(json, r#"{"sticker_number":"12","status":"no"}"#);
    }
}
