//! Extended-attribute dictionary blob serialization (§3.5).
//!
//! Same encoding family as [`crate::dirent`]: a length-prefixed count
//! followed by length-prefixed `(name, value)` pairs. Name comparison is
//! full-string equality — the historical prefix-bounded compare noted in
//! §4.7/§9 as a likely defect in the system this crate's behavior is
//! grounded on is deliberately not reproduced here.

use crate::error::{Error, Result};

/// One `(name, value)` pair in an xattr dictionary blob.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct XattrEntry {
    pub name: String,
    pub value: Vec<u8>,
}

pub fn encode(entries: &[XattrEntry]) -> Vec<u8> {
    let mut out = Vec::with_capacity(4 + entries.len() * 32);
    out.extend_from_slice(&(entries.len() as u32).to_le_bytes());
    for entry in entries {
        let name_bytes = entry.name.as_bytes();
        out.extend_from_slice(&(name_bytes.len() as u32).to_le_bytes());
        out.extend_from_slice(name_bytes);
        out.extend_from_slice(&(entry.value.len() as u32).to_le_bytes());
        out.extend_from_slice(&entry.value);
    }
    out
}

pub fn decode(bytes: &[u8]) -> Result<Vec<XattrEntry>> {
    let mut cursor = Cursor::new(bytes);
    let count = cursor.read_u32()?;
    let mut entries = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let name_len = cursor.read_u32()? as usize;
        let name = String::from_utf8(cursor.read_bytes(name_len)?.to_vec())
            .map_err(|e| Error::Backend(format!("corrupt xattr name: {e}")))?;
        let value_len = cursor.read_u32()? as usize;
        let value = cursor.read_bytes(value_len)?.to_vec();
        entries.push(XattrEntry { name, value });
    }
    Ok(entries)
}

/// Full-string equality lookup (see module docs for why this is not the
/// historical prefix-bounded compare).
pub fn find<'e>(entries: &'e [XattrEntry], name: &str) -> Option<&'e XattrEntry> {
    entries.iter().find(|e| e.name == name)
}

pub fn without(entries: &[XattrEntry], name: &str) -> Vec<XattrEntry> {
    entries.iter().filter(|e| e.name != name).cloned().collect()
}

pub fn upserted(entries: &[XattrEntry], new_entry: XattrEntry) -> Vec<XattrEntry> {
    let mut out = without(entries, &new_entry.name);
    out.push(new_entry);
    out
}

struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Cursor { bytes, pos: 0 }
    }

    fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.pos + n > self.bytes.len() {
            return Err(Error::Backend("truncated xattr blob".into()));
        }
        let slice = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn read_u32(&mut self) -> Result<u32> {
        let slice = self.read_bytes(4)?;
        Ok(u32::from_le_bytes(slice.try_into().unwrap()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_dictionary_roundtrips() {
        assert_eq!(decode(&encode(&[])).unwrap(), vec![]);
    }

    #[test]
    fn roundtrip_with_binary_value() {
        let entries = vec![XattrEntry {
            name: "user.x".into(),
            value: vec![0, 1, 2, 255],
        }];
        assert_eq!(decode(&encode(&entries)).unwrap(), entries);
    }

    #[test]
    fn name_match_is_full_string_not_prefix() {
        let entries = vec![XattrEntry {
            name: "user.x".into(),
            value: vec![1],
        }];
        // "user.x" is a prefix of nothing here, but "user" must not match
        // "user.x" under full-string comparison.
        assert!(find(&entries, "user").is_none());
        assert!(find(&entries, "user.x").is_some());
    }
}
