//! `getattr`, `access`, `chmod`, `chown`, `utimens` (§4.8).

use crate::backend::ObjectStore;
use crate::error::Result;
use crate::fs::{now, Attr, Filesystem};
use crate::perm::{self, mask, Caller};

use super::super::resolve;

/// `getattr` additionally requires `R_OK` on the parent directory of
/// `path`; root is its own parent.
pub fn getattr<S: ObjectStore>(fs: &Filesystem<S>, path: &str, caller: Caller) -> Result<Attr> {
    let node = resolve::resolve(fs, path, caller)?;

    let parent_path = match resolve::split_parent(path) {
        Ok((parent, _)) => parent,
        Err(_) => path.to_string(), // root: its own parent
    };
    let parent_node = resolve::resolve(fs, &parent_path, caller)?;
    let parent_inode = parent_node.current_inode(fs.store())?;
    perm::check(parent_inode.mode, parent_inode.uid, parent_inode.gid, caller, mask::R_OK)?;

    let inode = node.current_inode(fs.store())?;
    Ok(Attr::from(inode))
}

/// `F_OK` succeeds iff the path resolves; otherwise the requested bits
/// are checked against the resolved inode.
pub fn access<S: ObjectStore>(fs: &Filesystem<S>, path: &str, caller: Caller, mode: u32) -> Result<()> {
    let node = resolve::resolve(fs, path, caller)?;
    if mode == mask::F_OK {
        return Ok(());
    }
    let inode = node.current_inode(fs.store())?;
    perm::check(inode.mode, inode.uid, inode.gid, caller, mode)
}

/// Owner-only (§4.3): the standard permission check is bypassed.
pub fn chmod<S: ObjectStore>(fs: &Filesystem<S>, path: &str, caller: Caller, mode: u32) -> Result<()> {
    let node = resolve::resolve(fs, path, caller)?;
    let mut inode = node.current_inode(fs.store())?;
    perm::check_owner_only(inode.uid, caller)?;

    let type_bits = inode.mode & !0o7777;
    inode.mode = type_bits | (mode & 0o7777);
    let t = now();
    inode.ctime_sec = t.0;
    inode.ctime_nsec = t.1;
    node.update(fs.store(), &inode)
}

/// Owner-only. `None` leaves the corresponding identity unchanged — the
/// boundary translation of the `0xFFFFFFFF` sentinel described in §4.8 is
/// the caller's job, not this core's.
pub fn chown<S: ObjectStore>(
    fs: &Filesystem<S>,
    path: &str,
    caller: Caller,
    uid: Option<u32>,
    gid: Option<u32>,
) -> Result<()> {
    let node = resolve::resolve(fs, path, caller)?;
    let mut inode = node.current_inode(fs.store())?;
    perm::check_owner_only(inode.uid, caller)?;

    if let Some(uid) = uid {
        inode.uid = uid;
    }
    if let Some(gid) = gid {
        inode.gid = gid;
    }
    let t = now();
    inode.ctime_sec = t.0;
    inode.ctime_nsec = t.1;
    node.update(fs.store(), &inode)
}

/// Sets `atime`/`mtime` under the relaxed owner rule (§4.3): allowed if
/// the standard check passes, or if it fails but the caller owns the
/// file.
pub fn utimens<S: ObjectStore>(
    fs: &Filesystem<S>,
    path: &str,
    caller: Caller,
    atime: (i64, u32),
    mtime: (i64, u32),
) -> Result<()> {
    let node = resolve::resolve(fs, path, caller)?;
    let mut inode = node.current_inode(fs.store())?;
    perm::check_utimens(inode.mode, inode.uid, inode.gid, caller, mask::W_OK)?;

    inode.atime_sec = atime.0;
    inode.atime_nsec = atime.1;
    inode.mtime_sec = mtime.0;
    inode.mtime_nsec = mtime.1;
    node.update(fs.store(), &inode)
}
