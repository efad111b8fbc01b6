use std::collections::HashMap;

use crate::{ArchiveSource, EntryInfo};

/// Archive prefix of raw asset payloads.
pub const ASSETS_PREFIX: &str = "assets/";

/// Raw bytes of one asset, keyed by its path below `assets/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRecord {
    pub path: String,
    pub bytes: Vec<u8>,
}

impl AssetRecord {
    pub fn new(path: impl Into<String>, bytes: Vec<u8>) -> Self {
        AssetRecord {
            path: path.into(),
            bytes,
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// Every raw asset of the current archive load. Bytes are stored verbatim;
/// decoding happens later, on demand.
#[derive(Debug, Default)]
pub struct AssetTable {
    records: HashMap<String, AssetRecord>,
}

impl AssetTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads every file entry under `assets/`. Unreadable entries are logged
    /// and skipped. A later entry with the same stripped path replaces an
    /// earlier one.
    pub fn build(source: &mut dyn ArchiveSource, entries: &[EntryInfo]) -> Self {
        let mut table = Self::new();

        for entry in entries {
            let Some(path) = entry.file_under(ASSETS_PREFIX) else {
                continue;
            };
            match source.read(entry) {
                Ok(bytes) => {
                    log::debug!("asset {} ({} bytes)", path, bytes.len());
                    table.insert(AssetRecord::new(path, bytes));
                }
                Err(e) => log::warn!("{}: skipping asset {:?}: {}", source.name(), path, e),
            }
        }

        table
    }

    /// Inserts a record, returning the one it replaced.
    pub fn insert(&mut self, record: AssetRecord) -> Option<AssetRecord> {
        self.records.insert(record.path.clone(), record)
    }

    pub fn get(&self, path: &str) -> Option<&AssetRecord> {
        self.records.get(path)
    }

    pub fn bytes(&self, path: &str) -> Option<&[u8]> {
        self.get(path).map(|r| r.bytes.as_slice())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.records.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Total payload size in bytes.
    pub fn total_size(&self) -> usize {
        self.records.values().map(AssetRecord::size).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AssetRecord> {
        self.records.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ZipSource, test_util::ZipBuilder};

    fn build(bytes: Vec<u8>) -> AssetTable {
        let mut source = ZipSource::from_bytes(bytes).unwrap();
        let entries = source.entries().unwrap();
        AssetTable::build(&mut source, &entries)
    }

    #[test]
    fn keys_assets_by_stripped_path() {
        let table = build(
            ZipBuilder::new()
                .file("project.toml", "window_title = \"Demo\"")
                .dir("assets/")
                .dir("assets/sprites/")
                .file("assets/hero.png", [1u8, 2, 3])
                .file("assets/sprites/slime.png", [9u8; 40])
                .file("spritesheets/hero.toml", "image_path = \"hero.png\"")
                .finish(),
        );

        assert_eq!(table.len(), 2);
        assert_eq!(table.bytes("hero.png"), Some(&[1u8, 2, 3][..]));
        assert_eq!(table.get("sprites/slime.png").unwrap().size(), 40);
        assert_eq!(table.total_size(), 43);
        assert!(!table.contains("spritesheets/hero.toml"));
        assert!(!table.contains("assets/hero.png"));
    }

    #[test]
    fn later_duplicate_wins() {
        let mut table = AssetTable::new();
        assert!(table.insert(AssetRecord::new("a.png", vec![1])).is_none());
        let replaced = table.insert(AssetRecord::new("a.png", vec![2])).unwrap();

        assert_eq!(replaced.bytes, vec![1]);
        assert_eq!(table.bytes("a.png"), Some(&[2u8][..]));
    }

    #[test]
    fn prefix_must_match_at_the_start() {
        let table = build(
            ZipBuilder::new()
                .file("extra/assets/hero.png", [1u8])
                .file("assetsx/hero.png", [2u8])
                .finish(),
        );
        assert!(table.is_empty());
    }
}
