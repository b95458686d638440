//! `getxattr`, `setxattr`, `removexattr`, `listxattr` (§4.7).

use crate::backend::{ObjectStore, Ref};
use crate::error::{Error, Result};
use crate::fs::{now, Filesystem};
use crate::perm::{self, mask, Caller};
use crate::xattr::{self, XattrEntry};

use super::super::resolve;

/// Decodes the xattr dictionary at `xattr_ref`, treating the all-zero
/// ref (§3.2: "no xattrs" for nodes created via `mkdir`/`symlink`, and
/// the root) as an empty dictionary rather than fetching it.
fn fetch_entries<S: ObjectStore>(fs: &Filesystem<S>, xattr_ref: Ref) -> Result<Vec<XattrEntry>> {
    if xattr_ref.is_zero() {
        return Ok(Vec::new());
    }
    let bytes = fs.store().fetch(&xattr_ref)?;
    xattr::decode(&bytes)
}

/// `val_size == 0` returns the value's byte length without copying it;
/// a non-zero but too-small buffer fails `RangeError` (§4.7).
pub fn getxattr<S: ObjectStore>(
    fs: &Filesystem<S>,
    path: &str,
    caller: Caller,
    name: &str,
    val_size: usize,
) -> Result<Vec<u8>> {
    let node = resolve::resolve(fs, path, caller)?;
    let inode = node.current_inode(fs.store())?;
    perm::check(inode.mode, inode.uid, inode.gid, caller, mask::R_OK)?;

    let entries = fetch_entries(fs, inode.xattr_ref())?;
    let entry = xattr::find(&entries, name).ok_or(Error::NoData)?;

    if val_size == 0 {
        return Ok(vec![0u8; entry.value.len()]);
    }
    if val_size < entry.value.len() {
        return Err(Error::RangeError);
    }
    Ok(entry.value.clone())
}

pub fn setxattr<S: ObjectStore>(fs: &Filesystem<S>, path: &str, caller: Caller, name: &str, value: &[u8]) -> Result<()> {
    let node = resolve::resolve(fs, path, caller)?;
    let mut inode = node.current_inode(fs.store())?;
    perm::check(inode.mode, inode.uid, inode.gid, caller, mask::W_OK)?;

    let entries = fetch_entries(fs, inode.xattr_ref())?;
    let new_entries = xattr::upserted(&entries, XattrEntry { name: name.to_string(), value: value.to_vec() });

    let fresh = Ref::generate();
    fs.store().store(&fresh, &xattr::encode(&new_entries))?;
    inode.set_xattr_ref(fresh);
    let t = now();
    inode.ctime_sec = t.0;
    inode.ctime_nsec = t.1;
    node.update(fs.store(), &inode)
}

pub fn removexattr<S: ObjectStore>(fs: &Filesystem<S>, path: &str, caller: Caller, name: &str) -> Result<()> {
    let node = resolve::resolve(fs, path, caller)?;
    let mut inode = node.current_inode(fs.store())?;
    perm::check(inode.mode, inode.uid, inode.gid, caller, mask::W_OK)?;

    let entries = fetch_entries(fs, inode.xattr_ref())?;
    let new_entries = xattr::without(&entries, name);
    if new_entries.len() == entries.len() {
        return Err(Error::NoData);
    }

    let fresh = Ref::generate();
    fs.store().store(&fresh, &xattr::encode(&new_entries))?;
    inode.set_xattr_ref(fresh);
    let t = now();
    inode.ctime_sec = t.0;
    inode.ctime_nsec = t.1;
    node.update(fs.store(), &inode)
}

pub fn listxattr<S: ObjectStore>(fs: &Filesystem<S>, path: &str, caller: Caller) -> Result<Vec<String>> {
    let node = resolve::resolve(fs, path, caller)?;
    let inode = node.current_inode(fs.store())?;
    perm::check(inode.mode, inode.uid, inode.gid, caller, mask::R_OK)?;

    let entries = fetch_entries(fs, inode.xattr_ref())?;
    Ok(entries.into_iter().map(|e| e.name).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::memory::MemoryStore;
    use crate::config::MountConfig;

    fn mounted() -> (Filesystem<MemoryStore>, Caller) {
        let caller = Caller { uid: 1, gid: 1 };
        let fs = Filesystem::mount(MemoryStore::new(), &MountConfig::new("t"), caller).unwrap();
        fs.create("/a", caller, 0o644).unwrap();
        (fs, caller)
    }

    #[test]
    fn set_get_remove_roundtrips() {
        let (fs, caller) = mounted();
        fs.setxattr("/a", caller, "user.x", b"v").unwrap();
        assert_eq!(fs.getxattr("/a", caller, "user.x", 16).unwrap(), b"v");
        fs.removexattr("/a", caller, "user.x").unwrap();
        assert!(matches!(fs.getxattr("/a", caller, "user.x", 16), Err(Error::NoData)));
    }

    #[test]
    fn getxattr_with_zero_size_returns_length_only() {
        let (fs, caller) = mounted();
        fs.setxattr("/a", caller, "user.x", b"value").unwrap();
        assert_eq!(fs.getxattr("/a", caller, "user.x", 0).unwrap().len(), 5);
    }

    #[test]
    fn getxattr_with_too_small_buffer_is_range_error() {
        let (fs, caller) = mounted();
        fs.setxattr("/a", caller, "user.x", b"value").unwrap();
        assert!(matches!(fs.getxattr("/a", caller, "user.x", 2), Err(Error::RangeError)));
    }

    #[test]
    fn setxattr_replaces_existing_value() {
        let (fs, caller) = mounted();
        fs.setxattr("/a", caller, "user.x", b"first").unwrap();
        fs.setxattr("/a", caller, "user.x", b"second").unwrap();
        assert_eq!(fs.getxattr("/a", caller, "user.x", 16).unwrap(), b"second");
    }

    #[test]
    fn listxattr_reports_all_names() {
        let (fs, caller) = mounted();
        fs.setxattr("/a", caller, "user.a", b"1").unwrap();
        fs.setxattr("/a", caller, "user.b", b"2").unwrap();
        let mut names = fs.listxattr("/a", caller).unwrap();
        names.sort();
        assert_eq!(names, vec!["user.a".to_string(), "user.b".to_string()]);
    }

    /// Directories (and the root) start with `xattr_ref == Ref::ZERO`
    /// (§3.2). Reading/listing against that must behave as an empty
    /// dictionary, not fail because nothing was ever `store`d there.
    #[test]
    fn zero_xattr_ref_reads_as_empty_not_object_does_not_exist() {
        let (fs, caller) = mounted();
        fs.mkdir("/d", caller, 0o755).unwrap();

        assert!(matches!(fs.getxattr("/d", caller, "user.x", 16), Err(Error::NoData)));
        assert!(fs.listxattr("/d", caller).unwrap().is_empty());
        assert!(matches!(fs.removexattr("/d", caller, "user.x"), Err(Error::NoData)));
    }

    #[test]
    fn setxattr_on_zero_xattr_ref_creates_first_entry() {
        let (fs, caller) = mounted();
        fs.mkdir("/d", caller, 0o755).unwrap();
        fs.setxattr("/d", caller, "user.x", b"v").unwrap();
        assert_eq!(fs.getxattr("/d", caller, "user.x", 16).unwrap(), b"v");
    }
}
