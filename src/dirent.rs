//! Directory blob serialization (§3.4).
//!
//! A directory blob is an ordered list of `(name, inode_log_ref)` pairs,
//! length-prefixed the way the reference ext2 implementation lays out a
//! variable-length directory entry (`inode`, `total_size`, `name_length`,
//! `name: [u8]`) — except every entry here is read through a safe cursor
//! over an owned `Vec<u8>` instead of a raw pointer cast, since this
//! layer runs in userspace rather than walking a mapped block device.

use crate::backend::Ref;
use crate::error::{Error, Result};

/// One `(name, inode_log_ref)` pair in a directory blob.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub log_ref: Ref,
}

/// Serializes `entries` into a directory blob.
///
/// An empty slice serializes to a well-formed, empty-bodied blob (a
/// 4-byte zero count), matching the invariant for a freshly `mkdir`'d
/// directory.
pub fn encode(entries: &[DirEntry]) -> Vec<u8> {
    let mut out = Vec::with_capacity(4 + entries.len() * 40);
    out.extend_from_slice(&(entries.len() as u32).to_le_bytes());
    for entry in entries {
        let name_bytes = entry.name.as_bytes();
        out.extend_from_slice(&(name_bytes.len() as u32).to_le_bytes());
        out.extend_from_slice(name_bytes);
        out.extend_from_slice(entry.log_ref.as_bytes());
    }
    out
}

/// Decodes a directory blob produced by [`encode`].
pub fn decode(bytes: &[u8]) -> Result<Vec<DirEntry>> {
    let mut cursor = Cursor::new(bytes);
    let count = cursor.read_u32()?;
    let mut entries = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let name_len = cursor.read_u32()? as usize;
        let name_bytes = cursor.read_bytes(name_len)?;
        let name = String::from_utf8(name_bytes.to_vec())
            .map_err(|e| Error::Backend(format!("corrupt directory entry name: {e}")))?;
        let log_ref = Ref(cursor.read_array::<32>()?);
        entries.push(DirEntry { name, log_ref });
    }
    Ok(entries)
}

/// Finds the entry with the given `name`, by linear scan (§4.2 step 5).
///
/// By the directory-blob name-uniqueness invariant, there is at most one
/// match; the first one found is returned.
pub fn find<'e>(entries: &'e [DirEntry], name: &str) -> Option<&'e DirEntry> {
    entries.iter().find(|e| e.name == name)
}

/// Returns a copy of `entries` with any entry named `name` removed.
pub fn without(entries: &[DirEntry], name: &str) -> Vec<DirEntry> {
    entries.iter().filter(|e| e.name != name).cloned().collect()
}

/// Returns a copy of `entries` with `new_entry` inserted, replacing any
/// prior entry of the same name (callers that must reject name
/// collisions check [`find`] first instead of using this).
pub fn upserted(entries: &[DirEntry], new_entry: DirEntry) -> Vec<DirEntry> {
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
            return Err(Error::Backend("truncated directory blob".into()));
        }
        let slice = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn read_u32(&mut self) -> Result<u32> {
        let slice = self.read_bytes(4)?;
        Ok(u32::from_le_bytes(slice.try_into().unwrap()))
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let slice = self.read_bytes(N)?;
        Ok(slice.try_into().unwrap())
    }
}
