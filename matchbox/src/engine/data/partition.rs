use crate::engine::entry::{CollectionEntry, StickerStatus};

/// A user's collection for one album, split by what matters for trading
///
/// Both lists keep the order in which the store returned the entries. Owned
/// stickers are dropped, and a sticker without an entry is in neither list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    pub needs: Vec<String>,
    pub duplicates: Vec<String>,
}

impl Partition {
    pub fn from_entries(entries: &[CollectionEntry]) -> Self {
        let mut partition = Partition::default();
        for entry in entries {
            match entry.status {
                StickerStatus::Missing => partition.needs.push(entry.sticker_number.clone()),
                StickerStatus::Duplicate => {
                    partition.duplicates.push(entry.sticker_number.clone())
                }
                StickerStatus::Owned => {}
            }
        }
        partition
    }

    pub fn is_empty(&self) -> bool {
        self.needs.is_empty() && self.duplicates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_splits_by_status() {
        let entries = vec![
            CollectionEntry::new("1", StickerStatus::Owned),
            CollectionEntry::new("2", StickerStatus::Missing),
            CollectionEntry::new("3", StickerStatus::Duplicate),
            CollectionEntry::new("4", StickerStatus::Missing),
        ];
        let partition = Partition::from_entries(&entries);

        assert_eq!(partition.needs, vec!["2", "4"]);
        assert_eq!(partition.duplicates, vec!["3"]);
    }

    #[test]
    fn test_partition_is_exclusive() {
        let entries = vec![
            CollectionEntry::new("7", StickerStatus::Missing),
            CollectionEntry::new("8", StickerStatus::Duplicate),
            CollectionEntry::new("9", StickerStatus::Owned),
        ];
        let partition = Partition::from_entries(&entries);

        for need in &partition.needs {
            assert!(!partition.duplicates.contains(need));
        }
        assert!(!partition.needs.contains(&"9".to_string()));
        assert!(!partition.duplicates.contains(&"9".to_string()));
    }

    #[test]
    fn test_untouched_stickers_are_not_needs() {
        let partition = Partition::from_entries(&[]);
        assert!(partition.is_empty());
    }
}
