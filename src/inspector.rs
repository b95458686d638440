//! Read-only projection decoder shared with the diagnostic inspector
//! utility (§2 point 5).
//!
//! Nothing here is required for the mounted filesystem to function —
//! every function is a pure decode of bytes already produced by
//! [`crate::node`], [`crate::dirent`], or [`crate::xattr`], re-exposed in
//! one place so a standalone tool can walk the backend without linking
//! against [`crate::fs::Filesystem`].

use crate::backend::{ObjectStore, Ref};
use crate::dirent::{self, DirEntry};
use crate::error::Result;
use crate::inode::{FileType, InodeRecord};
use crate::node::Node;
use crate::xattr::{self, XattrEntry};

/// A decoded snapshot of one node: its current inode plus, for a
/// directory, its entries and, for any node, its xattrs. Built purely by
/// reading — no permission check is applied, since the inspector is a
/// trusted, out-of-band tool (§1, bridge/inspector listed as an external
/// collaborator).
#[derive(Debug, Clone)]
pub struct Inspected {
    pub log_ref: Ref,
    pub inode: InodeRecord,
    pub entries: Option<Vec<DirEntry>>,
    pub xattrs: Vec<XattrEntry>,
}

/// Reads the current inode of `log_ref` and, if it is a directory, its
/// entries; decodes its xattr dictionary, treating the all-zero ref
/// (§3.2: "no xattrs", the case for every node created via `mkdir`/
/// `symlink`, and the root) as an empty dictionary rather than fetching it.
pub fn inspect<S: ObjectStore>(store: &S, log_ref: Ref) -> Result<Inspected> {
    let node = Node::new(log_ref);
    let inode = node.current_inode(store)?;

    let entries = if inode.file_type()? == FileType::Dir {
        let bytes = store.fetch(&inode.data_ref())?;
        Some(dirent::decode(&bytes)?)
    } else {
        None
    };

    let xattrs = if inode.xattr_ref().is_zero() {
        Vec::new()
    } else {
        let xattr_bytes = store.fetch(&inode.xattr_ref())?;
        xattr::decode(&xattr_bytes)?
    };

    Ok(Inspected { log_ref, inode, entries, xattrs })
}

/// Walks every record ever appended to `log_ref`'s inode log, oldest
/// first, decoding each into an [`InodeRecord`]. Useful for inspecting
/// history that [`Node::current_inode`] discards by only reading the
/// tail.
pub fn inspect_history<S: ObjectStore>(store: &S, log_ref: Ref) -> Result<Vec<InodeRecord>> {
    let log = store.fetch(&log_ref)?;
    let record_size = crate::inode::INODE_RECORD_SIZE;
    let mut out = Vec::with_capacity(log.len() / record_size.max(1));
    let mut offset = 0;
    while offset + record_size <= log.len() {
        out.push(InodeRecord::decode(&log[offset..offset + record_size])?);
        offset += record_size;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::memory::MemoryStore;
    use crate::config::MountConfig;
    use crate::fs::Filesystem;
    use crate::perm::Caller;

    #[test]
    fn inspect_root_reports_empty_directory() {
        let store = MemoryStore::new();
        let caller = Caller { uid: 1, gid: 1 };
        let fs = Filesystem::mount(store, &MountConfig::new("t"), caller).unwrap();

        let projected = inspect(fs.store(), fs.root()).unwrap();
        assert_eq!(projected.inode.file_type().unwrap(), FileType::Dir);
        assert_eq!(projected.entries.unwrap(), Vec::<DirEntry>::new());
    }

    #[test]
    fn inspect_history_grows_with_updates() {
        let store = MemoryStore::new();
        let caller = Caller { uid: 1, gid: 1 };
        let fs = Filesystem::mount(store, &MountConfig::new("t"), caller).unwrap();
        fs.create("/a", caller, 0o644).unwrap();
        fs.write("/a", caller, b"hi", 0).unwrap();

        let node = crate::fs::resolve::resolve(&fs, "/a", caller).unwrap();
        let history = inspect_history(fs.store(), node.log_ref()).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].size, 2);
    }
}
