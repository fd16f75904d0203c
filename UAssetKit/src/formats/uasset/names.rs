//! Name table
//!
//! Entries are `[i32 length][text][u32 hash]`. Existing entries keep their
//! original bytes so 8-bit and UTF-16 encodings are written back untouched;
//! new entries are always 8-bit.

use std::borrow::Cow;
use std::collections::HashMap;

use byteorder::{LittleEndian, WriteBytesExt};

use super::codec;
use crate::error::Result;

const FNV_PRIME: u32 = 0x0100_0193;

/// Hash stored with a newly inserted name.
///
/// FNV-1a style over the lowercase-folded code points, seeded with 0. This has
/// not been checked against the engine's own name hashing.
#[must_use]
pub fn name_hash(text: &str) -> u32 {
    text.to_lowercase()
        .chars()
        .fold(0u32, |hash, c| (hash ^ u32::from(c)).wrapping_mul(FNV_PRIME))
}

/// A single name table entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameEntry {
    text: String,
    hash: u32,
    wide: bool,
    raw: Vec<u8>,
}

impl NameEntry {
    /// Build a new entry for `text`; 8-bit for ASCII, UTF-16 otherwise.
    ///
    /// # Errors
    /// Only fails if writing to the in-memory buffer fails.
    pub fn new(text: &str) -> Result<Self> {
        let hash = name_hash(text);
        let mut raw = Vec::with_capacity(text.len() + 9);
        codec::write_fstring(&mut raw, text)?;
        raw.write_u32::<LittleEndian>(hash)?;
        Ok(Self {
            text: text.to_string(),
            hash,
            wide: !text.is_ascii(),
            raw,
        })
    }

    fn parse(data: &[u8], offset: usize) -> Result<Self> {
        let text = codec::read_fstring(data, offset)?;
        let hash = codec::read_u32(data, offset + text.size)?;
        let raw = codec::bytes_at(data, offset, text.size + 4)?.to_vec();
        Ok(Self {
            text: text.value,
            hash,
            wide: text.wide,
            raw,
        })
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn hash(&self) -> u32 {
        self.hash
    }

    /// True when the entry is stored as UTF-16.
    #[must_use]
    pub fn is_wide(&self) -> bool {
        self.wide
    }

    /// Encoded size in bytes, including length prefix and hash.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        self.raw.len()
    }
}

/// Ordered, append-only name table with an exact-match lookup index.
#[derive(Debug, Clone, Default)]
pub(crate) struct NameTable {
    entries: Vec<NameEntry>,
    lookup: HashMap<String, usize>,
    byte_len: usize,
}

impl NameTable {
    pub(crate) fn parse(data: &[u8], offset: usize, count: usize) -> Result<Self> {
        let mut table = Self::default();
        let mut pos = offset;
        for _ in 0..count {
            let entry = NameEntry::parse(data, pos)?;
            pos += entry.encoded_len();
            table.push(entry);
        }
        tracing::debug!("Parsed {} names ({} bytes)", table.len(), table.byte_len);
        Ok(table)
    }

    /// Append an entry and return its index.
    pub(crate) fn push(&mut self, entry: NameEntry) -> usize {
        let index = self.entries.len();
        self.byte_len += entry.encoded_len();
        // First occurrence wins when a table already carries duplicates
        self.lookup.entry(entry.text.clone()).or_insert(index);
        self.entries.push(entry);
        index
    }

    pub(crate) fn find(&self, text: &str) -> Option<usize> {
        self.lookup.get(text).copied()
    }

    pub(crate) fn get(&self, index: i64) -> Option<&NameEntry> {
        usize::try_from(index).ok().and_then(|i| self.entries.get(i))
    }

    /// Resolve an index for display, falling back to `idx_<n>`.
    pub(crate) fn resolve(&self, index: i64) -> Cow<'_, str> {
        match self.get(index) {
            Some(entry) => Cow::Borrowed(entry.text()),
            None => Cow::Owned(format!("idx_{index}")),
        }
    }

    pub(crate) fn entries(&self) -> &[NameEntry] {
        &self.entries
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Total encoded size of the table.
    pub(crate) fn byte_len(&self) -> usize {
        self.byte_len
    }

    pub(crate) fn write_to(&self, out: &mut Vec<u8>) {
        for entry in &self.entries {
            out.extend_from_slice(&entry.raw);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn encode_wide(text: &str) -> Vec<u8> {
        let units: Vec<u16> = text.encode_utf16().chain(std::iter::once(0)).collect();
        let mut out = Vec::new();
        out.extend_from_slice(&(-(units.len() as i32)).to_le_bytes());
        for unit in units {
            out.extend_from_slice(&unit.to_le_bytes());
        }
        out.extend_from_slice(&0xAABB_CCDDu32.to_le_bytes());
        out
    }

    #[test]
    fn test_hash_values() {
        assert_eq!(name_hash(""), 0);
        assert_eq!(name_hash("a"), 0x6100_98B3);
        assert_eq!(name_hash("Foo"), 0xD3F4_68F8);
        assert_eq!(name_hash("FOO"), name_hash("foo"));
    }

    #[test]
    fn test_new_entry_layout() {
        let entry = NameEntry::new("Foo").unwrap();
        let mut expected = vec![4, 0, 0, 0, b'F', b'o', b'o', 0];
        expected.extend_from_slice(&0xD3F4_68F8u32.to_le_bytes());
        assert_eq!(entry.raw, expected);
        assert_eq!(entry.encoded_len(), 12);
        assert!(!entry.is_wide());
    }

    #[test]
    fn test_new_non_ascii_entry_is_wide() {
        let entry = NameEntry::new("Größe").unwrap();
        assert!(entry.is_wide());
        assert_eq!(entry.encoded_len(), 4 + 12 + 4);

        let table = NameTable::parse(&entry.raw, 0, 1).unwrap();
        assert_eq!(table.entries()[0], entry);
    }

    #[test]
    fn test_parse_mixed_encodings() {
        let mut data = NameEntry::new("None").unwrap().raw;
        data.extend(encode_wide("Wide"));
        let table = NameTable::parse(&data, 0, 2).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.entries()[1].text(), "Wide");
        assert!(table.entries()[1].is_wide());
        assert_eq!(table.entries()[1].hash(), 0xAABB_CCDD);
        assert_eq!(table.entries()[1].encoded_len(), 4 + 10 + 4);
        assert_eq!(table.byte_len(), data.len());

        let mut out = Vec::new();
        table.write_to(&mut out);
        assert_eq!(out, data);
    }

    #[test]
    fn test_truncated_table_aborts() {
        let mut data = NameEntry::new("Foo").unwrap().raw;
        data.extend_from_slice(&NameEntry::new("Bar").unwrap().raw[..6]);
        assert!(NameTable::parse(&data, 0, 2).is_err());
    }

    #[test]
    fn test_lookup_is_case_sensitive_and_first_wins() {
        let mut table = NameTable::default();
        table.push(NameEntry::new("Foo").unwrap());
        table.push(NameEntry::new("foo").unwrap());
        table.push(NameEntry::new("Foo").unwrap());

        assert_eq!(table.find("Foo"), Some(0));
        assert_eq!(table.find("foo"), Some(1));
        assert_eq!(table.find("FOO"), None);
    }

    #[test]
    fn test_resolve_placeholder() {
        let mut table = NameTable::default();
        table.push(NameEntry::new("Foo").unwrap());
        assert_eq!(table.resolve(0), "Foo");
        assert_eq!(table.resolve(5), "idx_5");
        assert_eq!(table.resolve(-1), "idx_-1");
    }
}
